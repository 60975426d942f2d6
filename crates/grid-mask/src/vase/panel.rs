//! Coarse quad panels between consecutive keyframes, for display only.

use super::definition::VaseDefinition;
use geo::{Centroid, Coord, Polygon};
use hull_common::{fractional_days, HullError, HullResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// One quad: two samples on the earlier keyframe, then the matching two on
/// the later one in reverse order. Corners are `(x, y, days)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VasePanel {
    pub corners: [[f64; 3]; 4],
}

/// Connect equal-angle boundary samples of each keyframe to the next.
///
/// z is days since the first keyframe. A single keyframe yields no panels.
pub fn build_panels(definition: &VaseDefinition, steps: usize) -> HullResult<Vec<VasePanel>> {
    if steps < 3 {
        return Err(HullError::input(format!("panel steps must be >= 3, got {}", steps)));
    }
    let frames = definition.keyframes();
    let Some(first) = frames.first() else {
        return Ok(Vec::new());
    };

    let rings = frames
        .iter()
        .map(|kf| {
            let z = fractional_days(first.time, kf.time);
            angular_samples(&kf.polygon, steps).map(|samples| (z, samples))
        })
        .collect::<HullResult<Vec<_>>>()?;

    let mut panels = Vec::with_capacity(steps * rings.len().saturating_sub(1));
    for pair in rings.windows(2) {
        let ((z0, lower), (z1, upper)) = (&pair[0], &pair[1]);
        for k in 0..steps {
            let k1 = (k + 1) % steps;
            panels.push(VasePanel {
                corners: [
                    [lower[k].x, lower[k].y, *z0],
                    [lower[k1].x, lower[k1].y, *z0],
                    [upper[k1].x, upper[k1].y, *z1],
                    [upper[k].x, upper[k].y, *z1],
                ],
            });
        }
    }
    Ok(panels)
}

/// Farthest exterior crossing of `steps` rays cast from the centroid.
///
/// A ray that misses the boundary keeps the centroid as its sample.
pub fn angular_samples(polygon: &Polygon<f64>, steps: usize) -> HullResult<Vec<Coord<f64>>> {
    let centre = polygon
        .centroid()
        .ok_or_else(|| HullError::input("keyframe polygon has no centroid"))?
        .0;

    let samples = (0..steps)
        .map(|k| {
            let angle = TAU * k as f64 / steps as f64;
            let dir = (angle.cos(), angle.sin());
            let reach = polygon
                .exterior()
                .lines()
                .filter_map(|l| ray_hit(centre, dir, l.start, l.end))
                .fold(0.0_f64, f64::max);
            Coord {
                x: centre.x + reach * dir.0,
                y: centre.y + reach * dir.1,
            }
        })
        .collect();
    Ok(samples)
}

fn cross(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.1 - a.1 * b.0
}

/// Distance along the ray `origin + s * dir` to segment `a-b`, if hit.
fn ray_hit(origin: Coord<f64>, dir: (f64, f64), a: Coord<f64>, b: Coord<f64>) -> Option<f64> {
    let edge = (b.x - a.x, b.y - a.y);
    let denom = cross(dir, edge);
    if denom.abs() < f64::EPSILON {
        return None;
    }
    let w = (a.x - origin.x, a.y - origin.y);
    let s = cross(w, edge) / denom;
    let t = cross(w, dir) / denom;
    (s >= 0.0 && (0.0..=1.0).contains(&t)).then_some(s)
}
