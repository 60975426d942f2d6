//! Time hulls: lofted 3-D summaries of a boundary observed once per day.
//!
//! # Pipeline
//!
//! ```text
//! PolygonRecord[]
//!      │
//!      ▼
//! SequenceCleaner::clean          sort, union per day, drop unchanged days
//!      │
//!      ▼
//! PolygonTimeSeries
//!      │
//!      ├─► LocalFrame::to_local    equal-area meters about the centroid
//!      │
//!      ├─► RingSampler             equal arc-length samples per day
//!      │
//!      ├─► SupportProfileBuilder   radius(day, θ) = max p·u(θ)
//!      │
//!      └─► RuledMeshBuilder        strip triangulation + metrics
//!               │
//!               ▼
//!           TimeHull ──► derivative_hull ──► speed / acceleration hull
//! ```
//!
//! # Example
//!
//! ```ignore
//! use time_hull::{HullConfig, RuledMeshBuilder, SequenceCleaner};
//!
//! let series = SequenceCleaner::default().clean(&records, CrsCode::Epsg4326)?;
//! let hull = RuledMeshBuilder::new(HullConfig::default())?.build(&series)?;
//! println!("{} km² days", hull.metrics.volume_km2_days);
//! ```

pub mod config;
pub mod derivative;
pub mod mesh;
pub mod profile;
pub mod ring;
pub mod series;

pub use config::{HullConfig, TimeAxis};
pub use derivative::{derivative_hull, gradient, DerivativeOrder};
pub use mesh::{
    normalize_times, surface_area, trapezoid, triangulate_strip, HullKind, HullMetrics, LoftInput,
    RuledMeshBuilder, TimeHull,
};
pub use profile::{unit_directions, RadiusTable, SupportProfileBuilder};
pub use ring::{recenter, ring_length, sample_ring, RingSampler};
pub use series::{PolygonRecord, PolygonTimeSeries, SequenceCleaner, SeriesEntry};
