//! Albers Equal-Area Conic projection on an ellipsoid.
//!
//! The CONUS parameters match EPSG:5070 (NAD83, GRS 1980 ellipsoid).
//!
//! Reference: Snyder, "Map Projections: A Working Manual", eqs. 14-3 to 14-21.

use crate::ellipsoid::Ellipsoid;
use crate::transform::Projection;
use std::f64::consts::PI;

/// Albers Equal-Area Conic projection parameters.
#[derive(Debug, Clone)]
pub struct AlbersEqualArea {
    /// Central meridian in radians
    pub lon0: f64,
    /// Latitude of origin in radians
    pub lat0: f64,
    /// First standard parallel in radians
    pub lat1: f64,
    /// Second standard parallel in radians
    pub lat2: f64,
    pub ellipsoid: Ellipsoid,
    /// Cone constant
    n: f64,
    c: f64,
    rho0: f64,
}

impl AlbersEqualArea {
    /// Create a projection from degree parameters.
    pub fn new(ellipsoid: Ellipsoid, lon0_deg: f64, lat0_deg: f64, lat1_deg: f64, lat2_deg: f64) -> Self {
        let lon0 = lon0_deg.to_radians();
        let lat0 = lat0_deg.to_radians();
        let lat1 = lat1_deg.to_radians();
        let lat2 = lat2_deg.to_radians();

        let (m1, m2) = (ellipsoid.m(lat1), ellipsoid.m(lat2));
        let (q1, q2) = (ellipsoid.q(lat1), ellipsoid.q(lat2));
        // Single standard parallel degenerates to the tangent cone
        let n = if (lat1 - lat2).abs() < 1e-10 {
            lat1.sin()
        } else {
            (m1 * m1 - m2 * m2) / (q2 - q1)
        };
        let c = m1 * m1 + n * q1;
        let rho0 = ellipsoid.a * (c - n * ellipsoid.q(lat0)).sqrt() / n;

        Self {
            lon0,
            lat0,
            lat1,
            lat2,
            ellipsoid,
            n,
            c,
            rho0,
        }
    }

    /// CONUS Albers (EPSG:5070): origin 23N 96W, standard parallels 29.5N/45.5N.
    pub fn conus() -> Self {
        Self::new(Ellipsoid::GRS80, -96.0, 23.0, 29.5, 45.5)
    }
}

impl Projection for AlbersEqualArea {
    fn forward(&self, lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)> {
        if lat_deg.abs() > 90.0 || !lon_deg.is_finite() {
            return None;
        }
        let lat = lat_deg.to_radians();
        let mut dlon = lon_deg.to_radians() - self.lon0;
        while dlon > PI {
            dlon -= 2.0 * PI;
        }
        while dlon < -PI {
            dlon += 2.0 * PI;
        }

        let inner = self.c - self.n * self.ellipsoid.q(lat);
        if inner < 0.0 {
            return None;
        }
        let rho = self.ellipsoid.a * inner.sqrt() / self.n;
        let theta = self.n * dlon;

        Some((rho * theta.sin(), self.rho0 - rho * theta.cos()))
    }

    fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let dy = self.rho0 - y;
        // rho and theta take the sign of n (eqs. 14-10, 14-11)
        let (rho, theta) = if self.n < 0.0 {
            (-x.hypot(dy), (-x).atan2(-dy))
        } else {
            (x.hypot(dy), x.atan2(dy))
        };

        let q = (self.c - (rho * self.n / self.ellipsoid.a).powi(2)) / self.n;
        let lat = self.ellipsoid.latitude_from_q(q)?;
        let lon = self.lon0 + theta / self.n;

        Some((lon.to_degrees(), lat.to_degrees()))
    }
}
