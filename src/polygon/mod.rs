//! Polygon measures and straight-skeleton oracles.
//!
//! This module provides:
//! - Area, centroid and winding of closed point loops
//! - Point containment testing
//! - The [`SkeletonOracle`] boundary and the bundled [`WavefrontOracle`]
//!
//! # Example
//!
//! ```
//! use sweepcover::polygon::{ensure_ccw, polygon_area, polygon_centroid};
//! use sweepcover::Point2;
//!
//! // Clockwise unit square
//! let mut square = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(0.0, 1.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(1.0, 0.0),
//! ];
//!
//! ensure_ccw(&mut square);
//! assert_eq!(polygon_area(&square), 1.0);
//! assert_eq!(polygon_centroid(&square), Some(Point2::new(0.5, 0.5)));
//! ```

mod core;
mod skeleton;

pub use core::{
    bounding_box, ensure_ccw, ensure_cw, is_clockwise, polygon_area, polygon_centroid,
    polygon_contains, polygon_signed_area, vertex_average,
};
pub use skeleton::{
    SkeletonJunction, SkeletonNode, SkeletonOracle, SkeletonSubgraph, WavefrontOracle,
};
