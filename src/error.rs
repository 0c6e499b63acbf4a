//! Error types for the decomposition pipeline.

use thiserror::Error;

use crate::boustrophedon::VertexId;

/// Why a polygon or cell was rejected as degenerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Degeneracy {
    /// Fewer than three distinct vertices.
    #[error("{count} vertices, at least 3 are required")]
    TooFewVertices {
        /// Number of vertices supplied.
        count: usize,
    },
    /// Two consecutive vertices coincide.
    #[error("vertex {index} duplicates its predecessor")]
    DuplicatePoint {
        /// Index of the second of the two coincident vertices.
        index: usize,
    },
    /// A coordinate is NaN or infinite.
    #[error("vertex {index} has a non-finite coordinate")]
    NonFinite {
        /// Index of the offending vertex.
        index: usize,
    },
    /// The loop encloses no area.
    #[error("loop encloses zero area")]
    ZeroArea,
}

/// Direction of a sweep probe, perpendicular to the sweep axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ProbeDirection {
    #[error("above")]
    Above,
    #[error("below")]
    Below,
}

/// Failure reported by a skeleton oracle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// The oracle produced no junctions at all.
    #[error("oracle returned no junctions")]
    Empty,

    /// Junctions were produced but none of them are connected by a ridge.
    #[error("oracle returned {junctions} junctions without ridges")]
    NoRidges {
        /// Number of distinct junctions.
        junctions: usize,
    },

    /// The oracle rejected the polygon.
    #[error("oracle rejected polygon: {0}")]
    Rejected(String),
}

/// Errors that can occur while decomposing a region into a coverage graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecompositionError {
    /// Input geometry has too few vertices, duplicate points or no area.
    #[error("degenerate geometry: {0}")]
    GeometryDegenerate(#[from] Degeneracy),

    /// A vertex's boundary neighbors match none of the sweep event categories.
    #[error("vertex {vertex} matches no sweep event category")]
    EventClassification {
        /// The offending vertex.
        vertex: VertexId,
    },

    /// A split/merge probe found no boundary to bridge to.
    #[error("sweep probe from vertex {vertex} found no boundary {direction}")]
    UnboundedSweepProbe {
        /// Vertex the probe started from.
        vertex: VertexId,
        /// Direction of the failed probe.
        direction: ProbeDirection,
    },

    /// The skeleton oracle failed for a cell.
    #[error("skeleton oracle failed: {0}")]
    SkeletonOracleFailure(#[from] OracleError),

    /// A cell walk did not close into a simple cycle.
    #[error("cell walk from vertex {start} did not close into a simple cycle")]
    UnclosedCell {
        /// Vertex the walk started from.
        start: VertexId,
    },

    /// Cells do not form a single connected Reeb graph.
    #[error("reeb graph has {components} connected components")]
    DisconnectedReebGraph {
        /// Number of connected components found.
        components: usize,
    },
}
