//! Kinematic hulls: growth speed and acceleration along each direction.

use crate::mesh::{normalize_times, surface_area, trapezoid, HullKind, HullMetrics, TimeHull};
use hull_common::{HullError, HullResult};
use nalgebra::Vector2;
use std::f64::consts::TAU;

/// Radius below which a vertex has no usable direction (km).
const DIRECTION_EPS: f64 = 1e-12;

/// Which time derivative replaces the radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivativeOrder {
    /// |d(x, y)/dt|, km/day
    Speed,
    /// |d speed/dt|, km/day²
    Acceleration,
}

impl TryFrom<u8> for DerivativeOrder {
    type Error = HullError;

    fn try_from(order: u8) -> HullResult<Self> {
        match order {
            1 => Ok(Self::Speed),
            2 => Ok(Self::Acceleration),
            other => Err(HullError::input(format!("derivative order must be 1 or 2, got {}", other))),
        }
    }
}

/// Derivative of `values` sampled at `t`.
///
/// Second-order central differences on the interior (uneven spacing
/// allowed), first-order one-sided differences at both ends.
pub fn gradient(values: &[f64], t: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n < 2 {
        return vec![0.0; n];
    }

    let mut out = vec![0.0; n];
    out[0] = (values[1] - values[0]) / (t[1] - t[0]);
    out[n - 1] = (values[n - 1] - values[n - 2]) / (t[n - 1] - t[n - 2]);
    for i in 1..n - 1 {
        let hs = t[i] - t[i - 1];
        let hd = t[i + 1] - t[i];
        out[i] = (hs * hs * values[i + 1] + (hd * hd - hs * hs) * values[i] - hd * hd * values[i - 1])
            / (hs * hd * (hd + hs));
    }
    out
}

fn shoelace(ring: &[[f64; 3]]) -> f64 {
    let n = ring.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let a = ring[i];
            let b = ring[(i + 1) % n];
            a[0] * b[1] - b[0] * a[1]
        })
        .sum();
    0.5 * twice.abs()
}

/// Rebuild `base` with each radius replaced by the magnitude of the
/// requested derivative of boundary position.
///
/// Directions are taken from the base vertices. Where the base radius is
/// zero the direction is undefined and the column's nominal angle
/// `2πk / n_theta` is used instead.
pub fn derivative_hull(base: &TimeHull, order: DerivativeOrder) -> HullResult<TimeHull> {
    let days = base.days();
    if days < 2 || base.vertices.len() % days != 0 {
        return Err(HullError::input(format!(
            "shape mismatch: {} vertices cannot be reshaped into {} days",
            base.vertices.len(),
            days
        )));
    }
    let n_theta = base.vertices.len() / days;
    let t: Vec<f64> = (0..days).map(|d| base.vertices[d * n_theta][2]).collect();
    if t.windows(2).any(|w| w[1] <= w[0]) {
        return Err(HullError::input("hull time axis is not strictly increasing"));
    }

    let mut magnitude = vec![0.0; days * n_theta];
    for k in 0..n_theta {
        let xs: Vec<f64> = (0..days).map(|d| base.vertices[d * n_theta + k][0]).collect();
        let ys: Vec<f64> = (0..days).map(|d| base.vertices[d * n_theta + k][1]).collect();
        let vx = gradient(&xs, &t);
        let vy = gradient(&ys, &t);
        let speed: Vec<f64> = vx.iter().zip(&vy).map(|(x, y)| x.hypot(*y)).collect();

        let column = match order {
            DerivativeOrder::Speed => speed,
            DerivativeOrder::Acceleration => gradient(&speed, &t).into_iter().map(f64::abs).collect(),
        };
        for (d, m) in column.into_iter().enumerate() {
            magnitude[d * n_theta + k] = m;
        }
    }

    let mut vertices = Vec::with_capacity(base.vertices.len());
    for d in 0..days {
        for k in 0..n_theta {
            let [x, y, z] = base.vertices[d * n_theta + k];
            let position = Vector2::new(x, y);
            let r = position.norm();
            let u = if r > DIRECTION_EPS {
                position / r
            } else {
                let theta = TAU * k as f64 / n_theta as f64;
                Vector2::new(theta.cos(), theta.sin())
            };
            let m = magnitude[d * n_theta + k];
            vertices.push([m * u.x, m * u.y, z]);
        }
    }

    let day_areas_km2: Vec<f64> = (0..days)
        .map(|d| shoelace(&vertices[d * n_theta..(d + 1) * n_theta]))
        .collect();
    let triangles = base.triangles.clone();
    let metrics = HullMetrics {
        scale_km: magnitude.iter().copied().fold(0.0, f64::max),
        days,
        volume_km2_days: trapezoid(&day_areas_km2, &t),
        surface_km_day: surface_area(&vertices, &triangles),
    };
    let times: Vec<f64> = vertices.iter().map(|v| v[2]).collect();

    tracing::debug!(id = %base.id, order = ?order, days, n_theta, "Derived kinematic hull");

    Ok(TimeHull {
        id: base.id.clone(),
        kind: match order {
            DerivativeOrder::Speed => HullKind::Speed,
            DerivativeOrder::Acceleration => HullKind::Acceleration,
        },
        n_theta,
        dates: base.dates.clone(),
        times_norm: normalize_times(&times),
        times,
        vertices,
        triangles,
        day_areas_km2,
        metrics,
        centroid: base.centroid,
    })
}
