//! Lossless re-packaging between [`TimeHull`] and [`VaseDefinition`].
//!
//! Each hull day becomes a keyframe at that day's midnight whose polygon is
//! the day's ring. Fields with no polygon form travel in [`HullProvenance`].

use super::definition::{HullProvenance, Keyframe, VaseDefinition};
use geo::{Coord, LineString, Polygon};
use hull_common::{midnight, HullError};
use time_hull::{triangulate_strip, TimeHull};

impl From<&TimeHull> for VaseDefinition {
    fn from(hull: &TimeHull) -> Self {
        let keyframes = hull
            .dates
            .iter()
            .enumerate()
            .map(|(d, date)| {
                let ring: LineString<f64> = hull
                    .day_ring(d)
                    .iter()
                    .map(|v| Coord { x: v[0], y: v[1] })
                    .collect();
                Keyframe::new(midnight(*date), Polygon::new(ring, vec![]))
            })
            .collect();

        let provenance = HullProvenance {
            id: hull.id.clone(),
            kind: hull.kind,
            n_theta: hull.n_theta,
            metrics: hull.metrics,
            times: hull.times.clone(),
            times_norm: hull.times_norm.clone(),
            day_areas_km2: hull.day_areas_km2.clone(),
            centroid: hull.centroid,
        };
        VaseDefinition::from_hull_parts(keyframes, provenance)
    }
}

impl TryFrom<&VaseDefinition> for TimeHull {
    type Error = HullError;

    fn try_from(vase: &VaseDefinition) -> Result<Self, Self::Error> {
        let provenance = vase
            .provenance()
            .ok_or_else(|| HullError::input("vase was not built from a time hull"))?;
        let n_theta = provenance.n_theta;
        let days = vase.keyframes().len();

        if provenance.times.len() != days * n_theta {
            return Err(HullError::input(format!(
                "vase has {} keyframes but carries {} vertex times for {} directions",
                days,
                provenance.times.len(),
                n_theta
            )));
        }

        let mut vertices = Vec::with_capacity(days * n_theta);
        let mut dates = Vec::with_capacity(days);
        for (d, kf) in vase.keyframes().iter().enumerate() {
            // Polygon::new may have appended a closing vertex.
            let ring = &kf.polygon.exterior().0;
            if ring.len() < n_theta {
                return Err(HullError::input(format!(
                    "keyframe {} has {} vertices, expected {}",
                    d,
                    ring.len(),
                    n_theta
                )));
            }
            vertices.extend(
                ring[..n_theta]
                    .iter()
                    .enumerate()
                    .map(|(k, c)| [c.x, c.y, provenance.times[d * n_theta + k]]),
            );
            dates.push(kf.time.date_naive());
        }

        Ok(TimeHull {
            id: provenance.id.clone(),
            kind: provenance.kind,
            n_theta,
            dates,
            triangles: triangulate_strip(days, n_theta),
            vertices,
            times: provenance.times.clone(),
            times_norm: provenance.times_norm.clone(),
            day_areas_km2: provenance.day_areas_km2.clone(),
            metrics: provenance.metrics,
            centroid: provenance.centroid,
        })
    }
}
