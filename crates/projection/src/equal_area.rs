//! Lambert Azimuthal Equal-Area projection on an ellipsoid (oblique aspect).
//!
//! Used as the local metric frame for perimeter sampling. Latitudes go
//! through the authalic sphere, so areas are preserved on the ellipsoid and
//! shape distortion stays negligible over the extent of a single fire.
//!
//! Reference: Snyder, "Map Projections: A Working Manual", eqs. 24-11 to 24-13
//! and 24-26 to 24-30.

use crate::ellipsoid::Ellipsoid;
use crate::transform::Projection;
use std::f64::consts::PI;

/// Lambert Azimuthal Equal-Area projection about a centre point.
#[derive(Debug, Clone)]
pub struct LambertAzimuthalEqualArea {
    /// Centre longitude in radians
    pub lon0: f64,
    /// Centre latitude in radians
    pub lat0: f64,
    pub ellipsoid: Ellipsoid,
    /// Authalic sphere radius (meters)
    rq: f64,
    /// Scale balance between x and y so the centre is true to scale
    d: f64,
    sin_beta0: f64,
    cos_beta0: f64,
}

impl LambertAzimuthalEqualArea {
    /// Create a GRS 1980 projection centred on `(lon_deg, lat_deg)`.
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self::with_ellipsoid(Ellipsoid::GRS80, lon_deg, lat_deg)
    }

    pub fn with_ellipsoid(ellipsoid: Ellipsoid, lon_deg: f64, lat_deg: f64) -> Self {
        let lon0 = lon_deg.to_radians();
        let lat0 = lat_deg.to_radians();
        let rq = ellipsoid.authalic_radius();
        let beta0 = ellipsoid.authalic_latitude(lat0);
        let cos_beta0 = beta0.cos();
        // Polar centres have no meridian to balance against
        let d = if cos_beta0 < 1e-10 {
            1.0
        } else {
            ellipsoid.a * ellipsoid.m(lat0) / (rq * cos_beta0)
        };
        Self {
            lon0,
            lat0,
            ellipsoid,
            rq,
            d,
            sin_beta0: beta0.sin(),
            cos_beta0,
        }
    }

    /// Centre of the projection as (lon, lat) degrees.
    pub fn center(&self) -> (f64, f64) {
        (self.lon0.to_degrees(), self.lat0.to_degrees())
    }
}

impl Projection for LambertAzimuthalEqualArea {
    fn forward(&self, lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)> {
        if lat_deg.abs() > 90.0 || !lon_deg.is_finite() {
            return None;
        }
        let beta = self.ellipsoid.authalic_latitude(lat_deg.to_radians());
        let mut dlon = lon_deg.to_radians() - self.lon0;
        while dlon > PI {
            dlon -= 2.0 * PI;
        }
        while dlon < -PI {
            dlon += 2.0 * PI;
        }

        let (sin_b, cos_b) = beta.sin_cos();
        let denom = 1.0 + self.sin_beta0 * sin_b + self.cos_beta0 * cos_b * dlon.cos();
        // Antipode of the centre has no image
        if denom <= 1e-12 {
            return None;
        }
        let b = self.rq * (2.0 / denom).sqrt();

        let x = b * self.d * cos_b * dlon.sin();
        let y = (b / self.d) * (self.cos_beta0 * sin_b - self.sin_beta0 * cos_b * dlon.cos());
        Some((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let rho = (x / self.d).hypot(self.d * y);
        if rho < 1e-9 {
            return Some(self.center());
        }
        let ratio = rho / (2.0 * self.rq);
        if ratio > 1.0 {
            return None;
        }

        let ce = 2.0 * ratio.asin();
        let (sin_c, cos_c) = ce.sin_cos();
        let beta = (cos_c * self.sin_beta0 + self.d * y * sin_c * self.cos_beta0 / rho)
            .clamp(-1.0, 1.0)
            .asin();
        let lon = self.lon0
            + (x * sin_c).atan2(
                self.d * rho * self.cos_beta0 * cos_c - self.d * self.d * y * self.sin_beta0 * sin_c,
            );
        let lat = self.ellipsoid.geodetic_latitude(beta)?;

        Some((lon.to_degrees(), lat.to_degrees()))
    }
}
