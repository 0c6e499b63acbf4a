//! Boustrophedon cellular decomposition into coverage graphs.
//!
//! The pipeline runs in five stages:
//! - rotate the region so the sweep direction becomes +x and classify every
//!   vertex as a sweep event, bridging split and merge vertices to the
//!   boundary above and below ([`line_sweep`])
//! - trace the monotone cells of the bridged graph ([`extract_cells`])
//! - link cells sharing a bridge and skeletonize each one ([`ReebGraph`])
//! - make the cell graph Eulerian and walk it ([`eulerize`])
//! - stitch the cell skeletons into one [`CoverageGraph`] ([`compose`])
//!
//! # Example
//!
//! ```
//! use sweepcover::boustrophedon::{decompose, BoundaryGraph};
//! use sweepcover::Point2;
//!
//! // Square field with a square obstacle in the middle
//! let field = [
//!     Point2::new(0.0, 0.0),
//!     Point2::new(4.0, 0.0),
//!     Point2::new(4.0, 4.0),
//!     Point2::new(0.0, 4.0),
//! ];
//! let obstacle = vec![
//!     Point2::new(1.0, 1.0),
//!     Point2::new(3.0, 1.0),
//!     Point2::new(3.0, 3.0),
//!     Point2::new(1.0, 3.0),
//! ];
//!
//! let boundary = BoundaryGraph::from_loops(&field, &[obstacle]).unwrap();
//! let coverage = decompose(&boundary, 0.0).unwrap();
//! assert!(coverage.is_connected());
//! assert_eq!(coverage.nodes().filter(|(_, n)| n.flags.middle).count(), 4);
//! ```

mod boundary;
mod cells;
mod compose;
mod coverage;
mod euler;
mod reeb;
mod sweep;

pub use boundary::{BoundaryGraph, BoundaryOrientation, EdgeRole, Vertex, VertexId};
pub use cells::{extract_cells, Cell};
pub use compose::compose;
pub use coverage::{CoverageGraph, CoverageNode, NodeFlags, NodeId};
pub use euler::{eulerize, EulerCircuit, EXACT_MATCHING_CAP};
pub use reeb::{ReebEdge, ReebGraph, ReebNode, SkeletonSource};
pub use sweep::{classify, line_sweep, sweep_order, Event, Sweep, SweepEvent};

use crate::error::DecompositionError;
use crate::polygon::{SkeletonOracle, WavefrontOracle};

/// Tolerances and limits of a decomposition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecomposeOptions {
    /// Distance below which a probe hit snaps to an existing vertex.
    pub snap_eps: f64,
    /// Per-coordinate distance below which skeleton junctions are merged.
    pub skeleton_eps: f64,
    /// Largest number of odd-degree cells matched exactly; beyond it the
    /// matching is greedy. Never exceeds [`EXACT_MATCHING_CAP`].
    pub exact_matching_limit: usize,
}

impl Default for DecomposeOptions {
    fn default() -> Self {
        Self {
            snap_eps: 1e-9,
            skeleton_eps: 1e-5,
            exact_matching_limit: 16,
        }
    }
}

impl DecomposeOptions {
    /// Creates options with the default tolerances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the probe snapping distance.
    pub fn with_snap_eps(mut self, snap_eps: f64) -> Self {
        self.snap_eps = snap_eps;
        self
    }

    /// Sets the junction merge distance.
    pub fn with_skeleton_eps(mut self, skeleton_eps: f64) -> Self {
        self.skeleton_eps = skeleton_eps;
        self
    }

    /// Sets the largest odd-cell count matched exactly.
    pub fn with_exact_matching_limit(mut self, limit: usize) -> Self {
        self.exact_matching_limit = limit;
        self
    }
}

/// Every product of a decomposition run.
#[derive(Debug, Clone)]
pub struct Decomposition {
    /// Sweep direction in radians, counter-clockwise from +x.
    pub theta: f64,
    /// Input boundary with bridges and split vertices, in the input frame.
    pub boundary: BoundaryGraph,
    /// One event per input vertex, in sweep order.
    pub events: Vec<SweepEvent>,
    pub cells: Vec<Cell>,
    /// Cell adjacency; geometry is in the sweep frame (rotated by `-theta`).
    pub reeb: ReebGraph,
    pub circuit: EulerCircuit,
    /// Coverage waypoints, in the input frame.
    pub coverage: CoverageGraph,
}

impl Decomposition {
    /// Number of events of the given kind.
    pub fn count(&self, event: Event) -> usize {
        self.events.iter().filter(|e| e.event == event).count()
    }

    /// Dead-end waypoints: skeleton nodes with a single coverage edge inside
    /// cells of more than three vertices.
    pub fn cul_de_sacs(&self) -> Vec<NodeId> {
        self.coverage
            .nodes()
            .filter(|(id, node)| {
                node.flags.original
                    && self.coverage.degree(*id) == 1
                    && node
                        .cell
                        .and_then(|c| self.reeb.node(c))
                        .is_some_and(|n| n.cell.len() > 3)
            })
            .map(|(id, _)| id)
            .collect()
    }
}

/// Runs the decomposition pipeline with a chosen skeleton oracle.
#[derive(Debug, Clone, Default)]
pub struct Decomposer<O = WavefrontOracle> {
    oracle: O,
    options: DecomposeOptions,
}

impl<O: SkeletonOracle> Decomposer<O> {
    /// Creates a decomposer with default options.
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            options: DecomposeOptions::default(),
        }
    }

    /// Replaces the options.
    pub fn with_options(mut self, options: DecomposeOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the options.
    pub fn options(&self) -> &DecomposeOptions {
        &self.options
    }

    /// Returns the skeleton oracle.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Decomposes `boundary` for a sweep along `(cos theta, sin theta)`.
    ///
    /// The input graph is not modified. Fatal errors abort the run; skeleton
    /// failures only degrade the affected cells to centroid waypoints.
    pub fn decompose(&self, boundary: &BoundaryGraph, theta: f64) -> Result<Decomposition, DecompositionError> {
        let mut graph = boundary.rotated(-theta);
        let sweep = line_sweep(&mut graph, self.options.snap_eps)?;
        let cells = extract_cells(&graph, sweep.seeds.iter().copied())?;
        let reeb = ReebGraph::build(&graph, &cells, &self.oracle, self.options.skeleton_eps);
        let circuit = eulerize(&reeb, self.options.exact_matching_limit)?;
        let coverage = compose(&reeb, &circuit).rotated(theta);

        Ok(Decomposition {
            theta,
            boundary: graph.rotated(theta),
            events: sweep.events,
            cells,
            reeb,
            circuit,
            coverage,
        })
    }
}

/// Decomposes `boundary` with default options and the [`WavefrontOracle`].
pub fn decompose(boundary: &BoundaryGraph, theta: f64) -> Result<CoverageGraph, DecompositionError> {
    Decomposer::<WavefrontOracle>::default()
        .decompose(boundary, theta)
        .map(|decomposition| decomposition.coverage)
}
