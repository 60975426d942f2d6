//! Moving geometries between coordinate reference systems.
//!
//! Every supported CRS is expressed as a [`Projection`] from geographic
//! degrees, so any pair can be bridged through lon/lat.

use crate::{AlbersEqualArea, LambertAzimuthalEqualArea, WebMercator};
use geo::{coord, Coord, MapCoords, Polygon};
use hull_common::{CrsCode, HullError, HullResult};

/// A map projection from geographic (lon, lat) degrees to planar meters.
///
/// Both directions return `None` outside the projection's domain.
pub trait Projection {
    fn forward(&self, lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)>;
    fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)>;
}

/// Identity projection for geographic CRS.
#[derive(Debug, Clone, Copy, Default)]
pub struct Geographic;

impl Projection for Geographic {
    fn forward(&self, lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)> {
        if lat_deg.abs() > 90.0 || !lon_deg.is_finite() {
            return None;
        }
        Some((lon_deg, lat_deg))
    }

    fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        self.forward(x, y)
    }
}

/// Projection implementing a supported CRS.
pub fn projection_for(crs: CrsCode) -> Box<dyn Projection + Send + Sync> {
    match crs {
        CrsCode::Epsg4326 | CrsCode::Epsg4269 => Box::new(Geographic),
        CrsCode::Epsg3857 => Box::new(WebMercator),
        CrsCode::Epsg5070 => Box::new(AlbersEqualArea::conus()),
    }
}

fn map_polygon<F>(polygon: &Polygon<f64>, f: F) -> HullResult<Polygon<f64>>
where
    F: Fn(f64, f64) -> Option<(f64, f64)>,
{
    polygon.try_map_coords(|c: Coord<f64>| {
        f(c.x, c.y)
            .map(|(x, y)| coord! { x: x, y: y })
            .ok_or_else(|| HullError::projection(format!("coordinate ({}, {}) outside projection domain", c.x, c.y)))
    })
}

/// Reproject a polygon between two CRS.
pub fn reproject_polygon(polygon: &Polygon<f64>, from: CrsCode, to: CrsCode) -> HullResult<Polygon<f64>> {
    if same_frame(from, to) {
        return Ok(polygon.clone());
    }
    let source = projection_for(from);
    let target = projection_for(to);
    map_polygon(polygon, |x, y| {
        let (lon, lat) = source.inverse(x, y)?;
        target.forward(lon, lat)
    })
}

// NAD83 and WGS84 differ by about a meter, below anything a perimeter resolves.
fn same_frame(a: CrsCode, b: CrsCode) -> bool {
    a == b || (a.is_geographic() && b.is_geographic())
}

/// Metric equal-area frame centred on a series.
///
/// Inputs already in an equal-area CRS are only translated; everything else
/// goes through geographic coordinates into an azimuthal equal-area
/// projection about the centroid.
#[derive(Debug, Clone)]
pub enum LocalFrame {
    Native { crs: CrsCode, origin: (f64, f64) },
    Azimuthal { crs: CrsCode, projection: LambertAzimuthalEqualArea },
}

impl LocalFrame {
    /// Build the frame for data in `crs` whose centroid, in that CRS, is `centroid`.
    pub fn centered_on(crs: CrsCode, centroid: (f64, f64)) -> HullResult<Self> {
        if crs.is_equal_area() {
            return Ok(LocalFrame::Native { crs, origin: centroid });
        }
        let (lon, lat) = projection_for(crs)
            .inverse(centroid.0, centroid.1)
            .ok_or_else(|| HullError::projection(format!("centroid {:?} has no geographic position in {}", centroid, crs)))?;
        Ok(LocalFrame::Azimuthal {
            crs,
            projection: LambertAzimuthalEqualArea::new(lon, lat),
        })
    }

    /// Carry a polygon from the source CRS into local meters.
    pub fn to_local(&self, polygon: &Polygon<f64>) -> HullResult<Polygon<f64>> {
        match self {
            LocalFrame::Native { origin, .. } => {
                let (ox, oy) = *origin;
                Ok(polygon.map_coords(|c| coord! { x: c.x - ox, y: c.y - oy }))
            }
            LocalFrame::Azimuthal { crs, projection } => {
                let source = projection_for(*crs);
                map_polygon(polygon, |x, y| {
                    let (lon, lat) = source.inverse(x, y)?;
                    projection.forward(lon, lat)
                })
            }
        }
    }

    /// Geographic (lon, lat) of the frame origin.
    pub fn origin_geographic(&self) -> HullResult<(f64, f64)> {
        match self {
            LocalFrame::Native { crs, origin } => projection_for(*crs)
                .inverse(origin.0, origin.1)
                .ok_or_else(|| HullError::projection(format!("origin {:?} has no geographic position in {}", origin, crs))),
            LocalFrame::Azimuthal { projection, .. } => Ok(projection.center()),
        }
    }
}
