//! Lofting radial profiles into a triangulated ruled surface.

use crate::config::{HullConfig, TimeAxis};
use crate::profile::{RadiusTable, SupportProfileBuilder};
use crate::ring::RingSampler;
use crate::series::PolygonTimeSeries;
use chrono::NaiveDate;
use geo::{Area, Coord};
use hull_common::{days_between, HullError, HullResult};
use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Square meters per square kilometer.
const M2_PER_KM2: f64 = 1e6;

/// Summary numbers attached to every hull.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HullMetrics {
    /// Largest radial extent (km).
    pub scale_km: f64,
    /// Number of lofted days.
    pub days: usize,
    /// Trapezoidal time integral of per-day area (km² · days).
    pub volume_km2_days: f64,
    /// Sum of triangle areas in (km, km, day) space.
    pub surface_km_day: f64,
}

impl HullMetrics {
    /// Metrics keyed by name.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("scale_km".to_string(), self.scale_km),
            ("days".to_string(), self.days as f64),
            ("volume_km2_days".to_string(), self.volume_km2_days),
            ("surface_km_day".to_string(), self.surface_km_day),
        ])
    }
}

/// What the radius of a hull measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HullKind {
    /// Boundary extent.
    Base,
    /// Magnitude of boundary velocity.
    Speed,
    /// Rate of change of speed.
    Acceleration,
}

/// A lofted boundary: one ring of `n_theta` vertices per day.
///
/// Vertices are `(x_km, y_km, t_days)` in the series' local frame, day-major,
/// so vertex `d * n_theta + k` is direction `k` on day `d`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeHull {
    pub id: String,
    pub kind: HullKind,
    pub n_theta: usize,
    pub dates: Vec<NaiveDate>,
    pub vertices: Vec<[f64; 3]>,
    pub triangles: Vec<[usize; 3]>,
    /// Per-vertex time (days).
    pub times: Vec<f64>,
    /// Per-vertex time scaled to [0, 1].
    pub times_norm: Vec<f64>,
    /// Area integrated for the volume metric, per day (km²).
    pub day_areas_km2: Vec<f64>,
    pub metrics: HullMetrics,
    /// Geographic (lon, lat) of the local frame origin.
    pub centroid: (f64, f64),
}

impl TimeHull {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn days(&self) -> usize {
        self.dates.len()
    }

    pub fn metrics_map(&self) -> BTreeMap<String, f64> {
        self.metrics.to_map()
    }

    /// Vertices of day `d`.
    pub fn day_ring(&self, d: usize) -> &[[f64; 3]] {
        &self.vertices[d * self.n_theta..(d + 1) * self.n_theta]
    }
}

/// Two triangles per angular step between each pair of adjacent days.
pub fn triangulate_strip(days: usize, n_theta: usize) -> Vec<[usize; 3]> {
    let mut triangles = Vec::with_capacity(2 * days.saturating_sub(1) * n_theta);
    for d in 0..days.saturating_sub(1) {
        for k in 0..n_theta {
            let k_next = (k + 1) % n_theta;
            let a = d * n_theta + k;
            let b = d * n_theta + k_next;
            let c = (d + 1) * n_theta + k_next;
            let e = (d + 1) * n_theta + k;
            triangles.push([a, b, c]);
            triangles.push([a, c, e]);
        }
    }
    triangles
}

/// Sum of triangle areas.
pub fn surface_area(vertices: &[[f64; 3]], triangles: &[[usize; 3]]) -> f64 {
    triangles
        .iter()
        .map(|[a, b, c]| {
            let pa = Vector3::from(vertices[*a]);
            let pb = Vector3::from(vertices[*b]);
            let pc = Vector3::from(vertices[*c]);
            0.5 * (pb - pa).cross(&(pc - pa)).norm()
        })
        .sum()
}

/// Trapezoidal integral of `values` against `t`.
pub fn trapezoid(values: &[f64], t: &[f64]) -> f64 {
    values
        .windows(2)
        .zip(t.windows(2))
        .map(|(v, t)| 0.5 * (v[0] + v[1]) * (t[1] - t[0]))
        .sum()
}

/// Scale per-vertex times into [0, 1]; a zero-length axis maps to 0.
pub fn normalize_times(times: &[f64]) -> Vec<f64> {
    let lo = times.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;
    times
        .iter()
        .map(|t| if span > 0.0 { (t - lo) / span } else { 0.0 })
        .collect()
}

/// Inputs to [`RuledMeshBuilder::loft`] beyond the radius table.
#[derive(Debug, Clone)]
pub struct LoftInput<'a> {
    pub id: &'a str,
    pub dates: &'a [NaiveDate],
    /// z coordinate per day.
    pub z: &'a [f64],
    /// True boundary area per day (km²).
    pub day_areas_km2: &'a [f64],
    pub centroid: (f64, f64),
}

/// Builds a [`TimeHull`] from a cleaned series.
#[derive(Debug, Clone)]
pub struct RuledMeshBuilder {
    config: HullConfig,
}

impl RuledMeshBuilder {
    pub fn new(config: HullConfig) -> HullResult<Self> {
        config.validate().map_err(HullError::input)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &HullConfig {
        &self.config
    }

    /// Sample, profile and loft every usable day of `series`.
    ///
    /// Days whose perimeter cannot be projected or has a degenerate ring are
    /// skipped; fewer than two remaining days is an input error.
    pub fn build(&self, series: &PolygonTimeSeries) -> HullResult<TimeHull> {
        let frame = series.local_frame()?;
        let sampler = RingSampler::new(self.config.n_ring_samples).with_recenter(self.config.recenter);

        let mut dates = Vec::with_capacity(series.len());
        let mut day_samples: Vec<Vec<Coord<f64>>> = Vec::with_capacity(series.len());
        let mut areas = Vec::with_capacity(series.len());

        for entry in series.entries() {
            let Some(polygon) = entry.largest_polygon() else {
                continue;
            };
            let local = match frame.to_local(polygon) {
                Ok(local) => local,
                Err(e) => {
                    tracing::warn!(id = %series.id(), date = %entry.date, error = %e, "Skipping day that cannot be projected");
                    continue;
                }
            };
            let samples = sampler.sample(&local);
            if samples.is_empty() {
                tracing::warn!(id = %series.id(), date = %entry.date, "Skipping day with degenerate boundary");
                continue;
            }
            dates.push(entry.date);
            areas.push(local.unsigned_area() / M2_PER_KM2);
            day_samples.push(samples);
        }

        if dates.len() < 2 {
            return Err(HullError::input(format!(
                "series '{}' has {} valid daily perimeters, at least 2 are required",
                series.id(),
                dates.len()
            )));
        }

        let z: Vec<f64> = match self.config.time_axis {
            TimeAxis::DaysSinceStart => dates.iter().map(|d| days_between(dates[0], *d)).collect(),
            TimeAxis::DayIndex => (0..dates.len()).map(|i| i as f64).collect(),
        };

        let profile = SupportProfileBuilder::new(self.config.n_theta);
        let radii = profile.build(&day_samples).smoothed(self.config.smooth_window)?;

        tracing::debug!(
            id = %series.id(),
            days = dates.len(),
            skipped = series.len() - dates.len(),
            n_theta = self.config.n_theta,
            "Lofting time hull"
        );

        Self::loft(
            &radii,
            profile.directions(),
            LoftInput {
                id: series.id(),
                dates: &dates,
                z: &z,
                day_areas_km2: &areas,
                centroid: frame.origin_geographic()?,
            },
        )
    }

    /// Turn a radius table (meters) into a hull.
    pub fn loft(radii: &RadiusTable, directions: &[Vector2<f64>], input: LoftInput<'_>) -> HullResult<TimeHull> {
        let days = radii.days();
        let n_theta = radii.n_theta();
        if directions.len() != n_theta {
            return Err(HullError::input(format!(
                "{} directions for a {}-column radius table",
                directions.len(),
                n_theta
            )));
        }
        if input.z.len() != days || input.dates.len() != days || input.day_areas_km2.len() != days {
            return Err(HullError::input("per-day inputs do not match the radius table"));
        }

        let mut vertices = Vec::with_capacity(days * n_theta);
        let mut times = Vec::with_capacity(days * n_theta);
        for d in 0..days {
            for (k, u) in directions.iter().enumerate() {
                let r = radii.get(d, k);
                vertices.push([r * u.x / 1000.0, r * u.y / 1000.0, input.z[d]]);
                times.push(input.z[d]);
            }
        }
        let triangles = triangulate_strip(days, n_theta);

        let metrics = HullMetrics {
            scale_km: radii.max() / 1000.0,
            days,
            volume_km2_days: trapezoid(input.day_areas_km2, input.z),
            surface_km_day: surface_area(&vertices, &triangles),
        };

        Ok(TimeHull {
            id: input.id.to_string(),
            kind: HullKind::Base,
            n_theta,
            dates: input.dates.to_vec(),
            times_norm: normalize_times(&times),
            times,
            vertices,
            triangles,
            day_areas_km2: input.day_areas_km2.to_vec(),
            metrics,
            centroid: input.centroid,
        })
    }
}
