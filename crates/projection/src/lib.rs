//! Coordinate reference system transformations.
//!
//! Implements the handful of map projections the hull pipeline needs from
//! scratch, without external projection libraries. The equal-area
//! projections work on the GRS 1980 ellipsoid; Web Mercator is spherical by
//! definition.

pub mod albers;
pub mod ellipsoid;
pub mod equal_area;
pub mod mercator;
pub mod transform;

pub use albers::AlbersEqualArea;
pub use ellipsoid::Ellipsoid;
pub use equal_area::LambertAzimuthalEqualArea;
pub use mercator::WebMercator;
pub use transform::{projection_for, reproject_polygon, Geographic, LocalFrame, Projection};
