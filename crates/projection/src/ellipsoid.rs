//! Reference ellipsoids and the authalic (equal-area) latitude.
//!
//! Reference: Snyder, "Map Projections: A Working Manual", eqs. 3-11, 3-12,
//! 3-16 and 14-19.

/// An oblate ellipsoid of revolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis (meters)
    pub a: f64,
    /// First eccentricity squared
    pub e2: f64,
}

const GRS80_F: f64 = 1.0 / 298.257_222_101;

impl Ellipsoid {
    /// GRS 1980, the ellipsoid of NAD83 and EPSG:5070.
    pub const GRS80: Ellipsoid = Ellipsoid {
        a: 6_378_137.0,
        e2: GRS80_F * (2.0 - GRS80_F),
    };

    /// Clarke 1866, used by the worked examples in Snyder.
    pub const CLARKE_1866: Ellipsoid = Ellipsoid {
        a: 6_378_206.4,
        e2: 0.006_768_66,
    };

    pub fn e(&self) -> f64 {
        self.e2.sqrt()
    }

    /// Snyder's `q` for a geodetic latitude in radians.
    pub fn q(&self, lat: f64) -> f64 {
        let e = self.e();
        let s = lat.sin();
        let es = e * s;
        (1.0 - self.e2) * (s / (1.0 - es * es) - ((1.0 - es) / (1.0 + es)).ln() / (2.0 * e))
    }

    /// `q` at the pole.
    pub fn q_polar(&self) -> f64 {
        self.q(std::f64::consts::FRAC_PI_2)
    }

    /// Snyder's `m`, the parallel radius over `a`.
    pub fn m(&self, lat: f64) -> f64 {
        let s = lat.sin();
        lat.cos() / (1.0 - self.e2 * s * s).sqrt()
    }

    /// Radius of the sphere with the ellipsoid's surface area.
    pub fn authalic_radius(&self) -> f64 {
        self.a * (self.q_polar() / 2.0).sqrt()
    }

    /// Authalic latitude for a geodetic latitude, both in radians.
    pub fn authalic_latitude(&self, lat: f64) -> f64 {
        (self.q(lat) / self.q_polar()).clamp(-1.0, 1.0).asin()
    }

    /// Geodetic latitude for an authalic latitude, both in radians.
    pub fn geodetic_latitude(&self, beta: f64) -> Option<f64> {
        self.latitude_from_q(self.q_polar() * beta.sin())
    }

    /// Invert `q` by fixed-point iteration (eq. 14-19).
    ///
    /// Returns `None` when `|q|` exceeds its polar value or the iteration
    /// does not settle.
    pub fn latitude_from_q(&self, q: f64) -> Option<f64> {
        let qp = self.q_polar();
        if !q.is_finite() || q.abs() > qp + 1e-12 {
            return None;
        }
        if (q.abs() - qp).abs() < 1e-12 {
            return Some(std::f64::consts::FRAC_PI_2.copysign(q));
        }

        let e = self.e();
        let mut lat = (q / 2.0).asin();
        for _ in 0..25 {
            let s = lat.sin();
            let es = e * s;
            let one_minus = 1.0 - es * es;
            let delta = one_minus * one_minus / (2.0 * lat.cos())
                * (q / (1.0 - self.e2) - s / one_minus + ((1.0 - es) / (1.0 + es)).ln() / (2.0 * e));
            lat += delta;
            if delta.abs() < 1e-14 {
                return Some(lat);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_q_roundtrip() {
        let ell = Ellipsoid::GRS80;
        for deg in [-89.0_f64, -45.0, -1.0, 0.0, 12.5, 38.2, 60.0, 89.9] {
            let lat = deg.to_radians();
            let back = ell.latitude_from_q(ell.q(lat)).unwrap();
            assert!((back - lat).abs() < 1e-12, "{} -> {}", deg, back.to_degrees());
        }
    }

    #[test]
    fn test_authalic_latitude_is_below_geodetic() {
        let ell = Ellipsoid::GRS80;
        let lat = 45.0_f64.to_radians();
        let beta = ell.authalic_latitude(lat);
        // Largest difference is about 0.128 degrees near 45
        assert!((lat - beta).to_degrees() > 0.12 && (lat - beta).to_degrees() < 0.13);
        assert!((ell.geodetic_latitude(beta).unwrap() - lat).abs() < 1e-12);
    }

    #[test]
    fn test_authalic_radius() {
        assert!((Ellipsoid::GRS80.authalic_radius() - 6_371_007.18).abs() < 0.01);
    }

    #[test]
    fn test_q_beyond_pole_is_none() {
        let ell = Ellipsoid::GRS80;
        assert!(ell.latitude_from_q(ell.q_polar() * 1.01).is_none());
        assert_eq!(ell.latitude_from_q(-ell.q_polar()), Some(-std::f64::consts::FRAC_PI_2));
    }
}
