//! Time-varying polygon masks ("vases").
//!
//! A vase is any sequence of time-keyframed polygons. Unlike the climate
//! sampler it knows nothing about perimeter series, and it masks a cube by
//! cell centres one time slice at a time.

mod convert;
pub mod definition;
pub mod mask;
pub mod panel;

pub use definition::{is_simple, HullProvenance, Interpolation, Keyframe, VaseDefinition};
pub use mask::{VaseMask, VaseMasks};
pub use panel::{angular_samples, build_panels, VasePanel};
