//! Discrete support-function profiles.
//!
//! For a fixed set of unit directions u(θ), the radius of a day in
//! direction θ is the farthest extent of its ring samples along u(θ):
//!
//! ```text
//! radius(day, θ) = max_p  p · u(θ)
//! ```
//!
//! This is exact for convex boundaries. Concave boundaries come out as
//! their star-shaped (convex-in-direction) envelope.

use geo::Coord;
use hull_common::{HullError, HullResult};
use nalgebra::Vector2;
use std::f64::consts::TAU;

/// `n` unit vectors evenly spaced over a full turn, starting at +x.
pub fn unit_directions(n: usize) -> Vec<Vector2<f64>> {
    (0..n)
        .map(|k| {
            let theta = TAU * k as f64 / n as f64;
            Vector2::new(theta.cos(), theta.sin())
        })
        .collect()
}

/// Radii indexed by (day, direction), row-major by day.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusTable {
    days: usize,
    n_theta: usize,
    values: Vec<f64>,
}

impl RadiusTable {
    pub fn new(days: usize, n_theta: usize) -> Self {
        Self {
            days,
            n_theta,
            values: vec![0.0; days * n_theta],
        }
    }

    /// Build from rows, which must all have the same width.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> HullResult<Self> {
        let n_theta = rows.first().map(|r| r.len()).unwrap_or(0);
        if rows.iter().any(|r| r.len() != n_theta) {
            return Err(HullError::input("radius rows have differing direction counts"));
        }
        Ok(Self {
            days: rows.len(),
            n_theta,
            values: rows.into_iter().flatten().collect(),
        })
    }

    pub fn days(&self) -> usize {
        self.days
    }

    pub fn n_theta(&self) -> usize {
        self.n_theta
    }

    pub fn get(&self, day: usize, k: usize) -> f64 {
        self.values[day * self.n_theta + k]
    }

    pub fn set(&mut self, day: usize, k: usize, value: f64) {
        self.values[day * self.n_theta + k] = value;
    }

    pub fn row(&self, day: usize) -> &[f64] {
        &self.values[day * self.n_theta..(day + 1) * self.n_theta]
    }

    /// Largest radius in the table (0 when empty).
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Centred moving average over days, padding the edges with the nearest day.
    pub fn smoothed(&self, window: usize) -> HullResult<Self> {
        if window == 0 || window % 2 == 0 {
            return Err(HullError::input(format!("smoothing window must be odd, got {}", window)));
        }
        if window == 1 || self.days == 0 {
            return Ok(self.clone());
        }

        let half = (window / 2) as isize;
        let last = self.days as isize - 1;
        let mut out = Self::new(self.days, self.n_theta);
        for day in 0..self.days {
            for k in 0..self.n_theta {
                let sum: f64 = (-half..=half)
                    .map(|offset| {
                        let d = (day as isize + offset).clamp(0, last) as usize;
                        self.get(d, k)
                    })
                    .sum();
                out.set(day, k, sum / window as f64);
            }
        }
        Ok(out)
    }
}

/// Computes support-function radii for a fixed direction set.
#[derive(Debug, Clone)]
pub struct SupportProfileBuilder {
    directions: Vec<Vector2<f64>>,
}

impl SupportProfileBuilder {
    pub fn new(n_theta: usize) -> Self {
        Self {
            directions: unit_directions(n_theta),
        }
    }

    pub fn directions(&self) -> &[Vector2<f64>] {
        &self.directions
    }

    /// Radius per direction for one day's samples.
    ///
    /// Never negative: a direction in which every sample lies behind the
    /// origin contributes a zero radius.
    pub fn support(&self, samples: &[Coord<f64>]) -> Vec<f64> {
        self.directions
            .iter()
            .map(|u| {
                samples
                    .iter()
                    .map(|p| p.x * u.x + p.y * u.y)
                    .fold(0.0, f64::max)
            })
            .collect()
    }

    /// Radius table for a sequence of days.
    pub fn build(&self, days: &[Vec<Coord<f64>>]) -> RadiusTable {
        let mut table = RadiusTable::new(days.len(), self.directions.len());
        for (d, samples) in days.iter().enumerate() {
            for (k, r) in self.support(samples).into_iter().enumerate() {
                table.set(d, k, r);
            }
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::sample_ring;
    use geo::{coord, LineString};

    fn hexagon(radius: f64) -> LineString<f64> {
        let mut coords: Vec<Coord<f64>> = (0..6)
            .map(|i| {
                let a = TAU * i as f64 / 6.0;
                coord! { x: radius * a.cos(), y: radius * a.sin() }
            })
            .collect();
        coords.push(coords[0]);
        LineString::new(coords)
    }

    #[test]
    fn test_hexagon_support_is_exact() {
        let radius = 2.0;
        let samples = sample_ring(&hexagon(radius), 60);
        let builder = SupportProfileBuilder::new(24);
        let radii = builder.support(&samples);

        for (k, r) in radii.iter().enumerate() {
            let theta = TAU * k as f64 / 24.0;
            let expected = (0..6)
                .map(|i| radius * (theta - TAU * i as f64 / 6.0).cos())
                .fold(f64::MIN, f64::max);
            assert!((r - expected).abs() < 1e-9, "direction {}: {} vs {}", k, r, expected);
        }
    }

    #[test]
    fn test_support_non_negative() {
        // Every sample lies in the +x half plane
        let samples = vec![coord! { x: 5.0, y: 0.0 }, coord! { x: 6.0, y: 1.0 }];
        let radii = SupportProfileBuilder::new(8).support(&samples);
        assert!(radii.iter().all(|&r| r >= 0.0));
        assert_eq!(radii[4], 0.0);
        assert_eq!(radii[0], 6.0);
    }

    #[test]
    fn test_smoothing_pads_with_edge_days() {
        let table = RadiusTable::from_rows(vec![vec![0.0], vec![3.0], vec![6.0]]).unwrap();
        let smooth = table.smoothed(3).unwrap();
        assert_eq!(smooth.get(0, 0), 1.0);
        assert_eq!(smooth.get(1, 0), 3.0);
        assert_eq!(smooth.get(2, 0), 5.0);
        assert!(table.smoothed(2).is_err());
        assert_eq!(table.smoothed(1).unwrap(), table);
    }

    #[test]
    fn test_directions_start_on_x_axis() {
        let dirs = unit_directions(4);
        assert!((dirs[0].x - 1.0).abs() < 1e-15);
        assert!((dirs[1].y - 1.0).abs() < 1e-15);
        assert!(dirs.iter().all(|d| (d.norm() - 1.0).abs() < 1e-15));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        assert!(RadiusTable::from_rows(vec![vec![1.0, 2.0], vec![1.0]]).is_err());
    }
}
