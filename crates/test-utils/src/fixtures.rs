//! Common test fixtures for perimeter and cube tests.
//!
//! This module provides pre-defined test data that represents common
//! scenarios in perimeter processing.

/// Common CRS identifiers.
pub mod crs {
    /// WKT for CONUS Albers as written by GDAL
    pub const WKT_5070: &str = r#"PROJCS["NAD83 / Conus Albers",GEOGCS["NAD83",DATUM["North_American_Datum_1983",SPHEROID["GRS 1980",6378137,298.257222101]],AUTHORITY["EPSG","4269"]],PROJECTION["Albers_Conic_Equal_Area"],UNIT["metre",1],AUTHORITY["EPSG","5070"]]"#;
}

/// The three nested squares scenario: sides 1, 2, 3 on consecutive days,
/// all centred on the origin.
pub mod nested_squares {
    /// Side lengths per day
    pub const SIDES: [f64; 3] = [1.0, 2.0, 3.0];

    /// Direction count aligned with the square axes
    pub const N_THETA: usize = 4;

    /// Ring samples per day
    pub const N_RING_SAMPLES: usize = 40;

    /// Largest sampled radius (half the largest side), in the input's units
    pub const MAX_RADIUS: f64 = 1.5;
}
