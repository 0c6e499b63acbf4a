//! sweepcover - Boustrophedon decomposition for coverage planning
//!
//! Splits a polygonal region with holes into cells that a lawnmower sweep can
//! cover in one pass each, then links the cells into a single connected
//! waypoint graph for a path planner.
//!
//! ```
//! use sweepcover::boustrophedon::BoundaryGraph;
//! use sweepcover::{decompose, Point2};
//!
//! let field = [
//!     Point2::new(0.0, 0.0),
//!     Point2::new(6.0, 0.0),
//!     Point2::new(6.0, 3.0),
//!     Point2::new(0.0, 3.0),
//! ];
//! let boundary = BoundaryGraph::from_loops(&field, &[]).unwrap();
//! let coverage = decompose(&boundary, std::f64::consts::FRAC_PI_2).unwrap();
//! assert!(coverage.node_count() > 0);
//! assert!(coverage.is_connected());
//! ```

pub mod boustrophedon;
pub mod error;
pub mod polygon;
pub mod primitives;

pub use boustrophedon::{
    decompose, BoundaryGraph, CoverageGraph, DecomposeOptions, Decomposer, Decomposition, Event,
};
pub use error::{DecompositionError, Degeneracy, OracleError, ProbeDirection};
pub use polygon::{SkeletonOracle, WavefrontOracle};
pub use primitives::{Point2, Vec2};
