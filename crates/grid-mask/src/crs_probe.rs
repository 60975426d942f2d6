//! Ordered CRS discovery on data arrays.
//!
//! Cubes declare their reference system in many places. Each probe looks in
//! one of them; [`resolve_crs`] runs the probes in [`CRS_PROBES`] order and
//! returns the first hit.

use crate::cube::{AttrValue, DataArray};
use hull_common::crs::CrsCode;
use hull_common::{HullError, HullResult};
use tracing::debug;

/// A single CRS lookup strategy.
pub type CrsProbe = fn(&DataArray) -> Option<CrsCode>;

/// Probes in priority order.
pub const CRS_PROBES: [(&str, CrsProbe); 5] = [
    ("code_attribute", from_code_attribute),
    ("scalar_coordinate", from_scalar_coordinate),
    ("projection_accessor", from_projection_accessor),
    ("text_attribute", from_text_attribute),
    ("dimension_names", from_dimension_names),
];

const CODE_ATTRS: [&str; 4] = ["epsg", "EPSG", "crs_epsg", "epsg_code"];
const CRS_COORDS: [&str; 3] = ["spatial_ref", "crs", "epsg"];
const TEXT_ATTRS: [&str; 5] = ["crs", "crs_wkt", "spatial_ref", "grid_mapping", "proj4"];

/// Resolve the CRS of an array, or fail with an input error.
pub fn resolve_crs(array: &DataArray) -> HullResult<CrsCode> {
    for (name, probe) in CRS_PROBES.iter() {
        if let Some(crs) = probe(array) {
            debug!(array = %array.name(), probe = %name, crs = %crs, "Resolved cube CRS");
            return Ok(crs);
        }
    }
    Err(HullError::input(format!("cannot determine CRS of '{}'", array.name())))
}

fn code(value: &AttrValue) -> Option<CrsCode> {
    let code = u32::try_from(value.as_int()?).ok()?;
    CrsCode::from_epsg(code).ok()
}

/// Integer EPSG code stored as an attribute.
pub fn from_code_attribute(array: &DataArray) -> Option<CrsCode> {
    CODE_ATTRS
        .iter()
        .find_map(|key| array.attrs().get(*key).and_then(code))
}

/// Scalar coordinate holding either an EPSG code or CRS text.
pub fn from_scalar_coordinate(array: &DataArray) -> Option<CrsCode> {
    CRS_COORDS.iter().find_map(|key| {
        let value = array.coords().get(*key)?;
        match value {
            AttrValue::Text(text) => CrsCode::find_in_text(text).ok(),
            other => code(other),
        }
    })
}

/// CRS declared through the array's projection accessor.
pub fn from_projection_accessor(array: &DataArray) -> Option<CrsCode> {
    array.projection()
}

/// Authority string or WKT stored in a text attribute.
pub fn from_text_attribute(array: &DataArray) -> Option<CrsCode> {
    TEXT_ATTRS.iter().find_map(|key| {
        let text = array.attrs().get(*key)?.as_text()?;
        CrsCode::find_in_text(text).ok()
    })
}

/// Latitude/longitude dimension names imply geographic WGS84.
pub fn from_dimension_names(array: &DataArray) -> Option<CrsCode> {
    let [_, y, x] = array.dims();
    let lat = matches!(y.as_str(), "lat" | "latitude");
    let lon = matches!(x.as_str(), "lon" | "longitude");
    (lat && lon).then_some(CrsCode::Epsg4326)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::InMemorySlices;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn array(dims: [&str; 3]) -> DataArray {
        let values = Arc::new(InMemorySlices::new(1, 2, 2, vec![0.0; 4]).unwrap());
        let t = vec![Utc.with_ymd_and_hms(2020, 9, 1, 0, 0, 0).unwrap()];
        DataArray::new("v", dims, t, vec![0.0, 1.0], vec![0.0, 1.0], values).unwrap()
    }

    #[test]
    fn test_code_attribute_wins() {
        let arr = array(["time", "lat", "lon"])
            .with_attr("epsg", 5070_i64)
            .with_projection(CrsCode::Epsg3857);
        assert_eq!(resolve_crs(&arr).unwrap(), CrsCode::Epsg5070);
    }

    #[test]
    fn test_scalar_coordinate() {
        let arr = array(["time", "y", "x"]).with_coord("spatial_ref", 3857_i64);
        assert_eq!(resolve_crs(&arr).unwrap(), CrsCode::Epsg3857);

        let wkt = array(["time", "y", "x"]).with_coord("crs", r#"PROJCS["x",AUTHORITY["EPSG","5070"]]"#);
        assert_eq!(resolve_crs(&wkt).unwrap(), CrsCode::Epsg5070);
    }

    #[test]
    fn test_unsupported_code_falls_through() {
        let arr = array(["time", "y", "x"])
            .with_coord("spatial_ref", 0_i64)
            .with_projection(CrsCode::Epsg4269);
        assert_eq!(resolve_crs(&arr).unwrap(), CrsCode::Epsg4269);
    }

    #[test]
    fn test_text_attribute() {
        let arr = array(["time", "y", "x"]).with_attr("crs", "EPSG:5070");
        assert_eq!(resolve_crs(&arr).unwrap(), CrsCode::Epsg5070);

        let crs84 = array(["time", "y", "x"]).with_attr("crs", "CRS:84");
        assert_eq!(resolve_crs(&crs84).unwrap(), CrsCode::Epsg4326);
    }

    #[test]
    fn test_dimension_heuristic() {
        assert_eq!(resolve_crs(&array(["time", "latitude", "longitude"])).unwrap(), CrsCode::Epsg4326);
    }

    #[test]
    fn test_unresolvable() {
        let err = resolve_crs(&array(["time", "y", "x"])).unwrap_err();
        assert_eq!(err.error_code(), "InputError");
    }
}
