//! Time-keyframed polygons.

use chrono::{DateTime, Utc};
use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Coord, Line, LineString, Polygon};
use hull_common::crs::CrsCode;
use hull_common::{fractional_days, HullError, HullResult};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use time_hull::{HullKind, HullMetrics};

/// How the polygon between keyframes is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interpolation {
    /// Closest keyframe in time (earlier one on ties).
    #[default]
    Nearest,
    /// Vertex-wise blend of the two bracketing keyframes.
    Linear,
}

impl Interpolation {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "linear" | "lerp" => Self::Linear,
            _ => Self::Nearest,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: DateTime<Utc>,
    pub polygon: Polygon<f64>,
}

impl Keyframe {
    pub fn new(time: DateTime<Utc>, polygon: Polygon<f64>) -> Self {
        Self { time, polygon }
    }
}

/// Hull fields that have no polygon form, carried so a vase built from a
/// hull can be turned back into the same hull.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HullProvenance {
    pub id: String,
    pub kind: HullKind,
    pub n_theta: usize,
    pub metrics: HullMetrics,
    pub times: Vec<f64>,
    pub times_norm: Vec<f64>,
    pub day_areas_km2: Vec<f64>,
    pub centroid: (f64, f64),
}

/// Time-sorted keyframes plus an interpolation mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaseDefinition {
    keyframes: Vec<Keyframe>,
    interpolation: Interpolation,
    crs: Option<CrsCode>,
    provenance: Option<HullProvenance>,
}

impl VaseDefinition {
    /// Validate and sort keyframes.
    ///
    /// Every polygon must be simple. Linear interpolation also needs every
    /// pair of neighbouring keyframes to share a vertex layout.
    pub fn new(mut keyframes: Vec<Keyframe>, interpolation: Interpolation) -> HullResult<Self> {
        if keyframes.is_empty() {
            return Err(HullError::input("vase needs at least one keyframe"));
        }
        for kf in &keyframes {
            if !is_simple(&kf.polygon) {
                return Err(HullError::input(format!(
                    "keyframe at {} is not a simple polygon",
                    kf.time
                )));
            }
        }
        keyframes.sort_by_key(|kf| kf.time);

        if interpolation == Interpolation::Linear {
            for pair in keyframes.windows(2) {
                if !same_layout(&pair[0].polygon, &pair[1].polygon) {
                    return Err(HullError::input(format!(
                        "keyframes at {} and {} have different vertex layouts",
                        pair[0].time, pair[1].time
                    )));
                }
            }
        }

        Ok(Self {
            keyframes,
            interpolation,
            crs: None,
            provenance: None,
        })
    }

    pub(crate) fn from_hull_parts(keyframes: Vec<Keyframe>, provenance: HullProvenance) -> Self {
        Self {
            keyframes,
            interpolation: Interpolation::Linear,
            crs: None,
            provenance: Some(provenance),
        }
    }

    /// Declare the CRS of the keyframe coordinates; cubes in another CRS get
    /// reprojected polygons.
    pub fn with_crs(mut self, crs: CrsCode) -> Self {
        self.crs = Some(crs);
        self
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn crs(&self) -> Option<CrsCode> {
        self.crs
    }

    pub fn provenance(&self) -> Option<&HullProvenance> {
        self.provenance.as_ref()
    }

    /// Polygon in effect at `t`, clamped to the end keyframes outside their range.
    pub fn polygon_at(&self, t: &DateTime<Utc>) -> Cow<'_, Polygon<f64>> {
        let frames = &self.keyframes;
        let idx = frames.partition_point(|kf| kf.time <= *t);
        if idx == 0 {
            return Cow::Borrowed(&frames[0].polygon);
        }
        if idx == frames.len() {
            return Cow::Borrowed(&frames[idx - 1].polygon);
        }

        let (lo, hi) = (&frames[idx - 1], &frames[idx]);
        match self.interpolation {
            Interpolation::Nearest => {
                let to_lo = fractional_days(lo.time, *t);
                let to_hi = fractional_days(*t, hi.time);
                if to_lo <= to_hi {
                    Cow::Borrowed(&lo.polygon)
                } else {
                    Cow::Borrowed(&hi.polygon)
                }
            }
            Interpolation::Linear => {
                let frac = fractional_days(lo.time, *t) / fractional_days(lo.time, hi.time);
                Cow::Owned(lerp_polygon(&lo.polygon, &hi.polygon, frac))
            }
        }
    }
}

fn lerp_ring(a: &LineString<f64>, b: &LineString<f64>, frac: f64) -> LineString<f64> {
    a.0.iter()
        .zip(&b.0)
        .map(|(p, q)| Coord {
            x: p.x + (q.x - p.x) * frac,
            y: p.y + (q.y - p.y) * frac,
        })
        .collect()
}

fn lerp_polygon(a: &Polygon<f64>, b: &Polygon<f64>, frac: f64) -> Polygon<f64> {
    let exterior = lerp_ring(a.exterior(), b.exterior(), frac);
    let interiors = a
        .interiors()
        .iter()
        .zip(b.interiors())
        .map(|(p, q)| lerp_ring(p, q, frac))
        .collect();
    Polygon::new(exterior, interiors)
}

fn same_layout(a: &Polygon<f64>, b: &Polygon<f64>) -> bool {
    a.exterior().0.len() == b.exterior().0.len()
        && a.interiors().len() == b.interiors().len()
        && a.interiors()
            .iter()
            .zip(b.interiors())
            .all(|(p, q)| p.0.len() == q.0.len())
}

/// True when no two ring edges cross or overlap except neighbours meeting
/// at their shared vertex.
pub fn is_simple(polygon: &Polygon<f64>) -> bool {
    let rings: Vec<&LineString<f64>> = std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .collect();

    let mut edges: Vec<(usize, usize, usize, Line<f64>)> = Vec::new();
    for (r, ring) in rings.iter().enumerate() {
        if ring.0.len() < 4 || ring.0.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return false;
        }
        let lines: Vec<Line<f64>> = ring.lines().filter(|l| l.start != l.end).collect();
        if lines.len() < 3 {
            return false;
        }
        let n = lines.len();
        edges.extend(lines.into_iter().enumerate().map(|(i, l)| (r, i, n, l)));
    }

    for (i, &(ra, ia, n, la)) in edges.iter().enumerate() {
        for &(rb, ib, _, lb) in &edges[i + 1..] {
            let neighbours = ra == rb && (ib == ia + 1 || (ia == 0 && ib == n - 1));
            match line_intersection(la, lb) {
                None => {}
                Some(LineIntersection::SinglePoint { is_proper, .. }) => {
                    if is_proper || !neighbours {
                        return false;
                    }
                }
                Some(LineIntersection::Collinear { .. }) => return false,
            }
        }
    }
    true
}
