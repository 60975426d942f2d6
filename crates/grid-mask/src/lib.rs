//! Polygon-to-grid masking and raster cube sampling.
//!
//! This crate connects perimeter geometry to gridded data:
//!
//! - **Cube contract**: [`DataArray`] and [`Dataset`] carry labels eagerly and
//!   read values one time slice at a time through a [`SliceSource`]
//! - **CRS discovery**: [`resolve_crs`] walks [`CRS_PROBES`] in order
//! - **Masking**: [`PolygonGridMask`] with a pluggable preferred strategy and
//!   an exact cell-intersection fallback
//! - **Sampling**: [`ClimateSampler`] pools cube values inside and outside a
//!   perimeter series, step-function in time
//! - **Vases**: [`VaseMask`] masks arbitrary time-keyframed polygons
//!
//! # Architecture
//!
//! ```text
//! PolygonTimeSeries ──┐
//!                     ├─► ClimateSampler ──► ClimateSampling
//! DataArray ──────────┤        │
//!    │                │        └─► PolygonGridMask (Scanline ─fallback─► Exact)
//!    └─► resolve_crs ─┘
//!
//! VaseDefinition ──► VaseMask::masks(cube) ──► (time, Mask), one slice at a time
//!       ▲
//!  TimeHull (lossless round trip)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use grid_mask::{ClimateSampler, MaskConfig};
//!
//! let sampler = ClimateSampler::new(MaskConfig::default())?;
//! let result = sampler.sample(&series, &cube)?;
//! println!("anomaly {:?} over {} timesteps", result.summary.anomaly(), result.timesteps_used);
//! ```

pub mod config;
pub mod crs_probe;
pub mod cube;
pub mod grid;
pub mod mask;
pub mod sampler;
pub mod vase;

pub use config::{MaskConfig, MaskStrategyKind};
pub use crs_probe::{resolve_crs, CrsProbe, CRS_PROBES};
pub use cube::{AsDataArray, AttrValue, DataArray, Dataset, InMemorySlices, SliceSource};
pub use grid::{GridAxes, Mask, RegularSteps};
pub use mask::{CellIntersectionMask, MaskStrategy, PolygonGridMask, ScanlineMask};
pub use sampler::{ClimateSampler, ClimateSampling, HullClimateSummary};
pub use vase::{build_panels, Interpolation, Keyframe, VaseDefinition, VaseMask, VasePanel};
