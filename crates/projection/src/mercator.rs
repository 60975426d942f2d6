//! Spherical Web Mercator (EPSG:3857).

use crate::transform::Projection;
use std::f64::consts::PI;

/// Semi-major axis used by EPSG:3857 (meters).
const WEB_MERCATOR_RADIUS: f64 = 6_378_137.0;

/// Web Mercator latitude limit (degrees).
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercator;

impl Projection for WebMercator {
    fn forward(&self, lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)> {
        if lat_deg.abs() > MAX_LATITUDE {
            return None;
        }
        let x = WEB_MERCATOR_RADIUS * lon_deg.to_radians();
        let y = WEB_MERCATOR_RADIUS * (PI / 4.0 + lat_deg.to_radians() / 2.0).tan().ln();
        Some((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let lon = (x / WEB_MERCATOR_RADIUS).to_degrees();
        let lat = (y / WEB_MERCATOR_RADIUS).sinh().atan().to_degrees();
        Some((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values() {
        let (x, y) = WebMercator.forward(180.0, 0.0).unwrap();
        assert!((x - 20_037_508.342_789_244).abs() < 1e-6);
        assert!(y.abs() < 1e-6);

        let (_, y_max) = WebMercator.forward(0.0, MAX_LATITUDE).unwrap();
        assert!((y_max - 20_037_508.342_789_244).abs() < 1e-3);
        assert!(WebMercator.forward(0.0, 89.0).is_none());
    }

    #[test]
    fn test_roundtrip() {
        let (x, y) = WebMercator.forward(-118.25, 34.05).unwrap();
        let (lon, lat) = WebMercator.inverse(x, y).unwrap();
        assert!((lon + 118.25).abs() < 1e-9);
        assert!((lat - 34.05).abs() < 1e-9);
    }
}
