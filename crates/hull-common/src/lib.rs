//! Common types and utilities shared across the time-hull crates.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod time;

pub use bbox::BoundingBox;
pub use crs::{CrsCode, CrsParseError};
pub use error::{HullError, HullResult};
pub use time::{days_between, fractional_days, midnight, TimeSpan};
