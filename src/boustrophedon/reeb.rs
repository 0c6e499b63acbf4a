//! Reeb graph: cells as nodes, shared bridges as edges.
//!
//! Each node also carries the skeleton of its cell. Skeletons come from a
//! [`SkeletonOracle`]; when the oracle fails or the cell is degenerate, the
//! cell is represented by a single waypoint at its centroid.

use std::collections::BTreeSet;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use super::boundary::{BoundaryGraph, VertexId};
use super::cells::Cell;
use crate::error::{Degeneracy, DecompositionError};
use crate::polygon::{
    ensure_ccw, polygon_area, polygon_centroid, vertex_average, SkeletonOracle, SkeletonSubgraph,
};
use crate::primitives::Point2;

/// Where a cell skeleton came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkeletonSource {
    /// Built from oracle junctions.
    Oracle,
    /// Single waypoint at the cell centroid.
    CentroidFallback,
}

/// A cell with its geometry and skeleton.
#[derive(Debug, Clone)]
pub struct ReebNode {
    pub cell: Cell,
    /// Cell outline, counter-clockwise.
    pub polygon: Vec<Point2<f64>>,
    /// Area centroid, or the vertex average for degenerate cells.
    pub centroid: Point2<f64>,
    pub skeleton: SkeletonSubgraph,
    pub source: SkeletonSource,
}

/// Adjacency between two cells through a bridge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReebEdge {
    /// The bridge endpoints shared by both cells, smaller id first.
    pub shared: (VertexId, VertexId),
    /// Midpoint of the shared bridge.
    pub midpoint: Point2<f64>,
    /// Distance between the two cell centroids.
    pub length: f64,
}

/// Undirected adjacency graph over cells.
///
/// Node `i` wraps the `i`-th cell handed to [`ReebGraph::build`]. Geometry is
/// expressed in the frame of the boundary graph it was built from.
#[derive(Debug, Clone, Default)]
pub struct ReebGraph {
    graph: UnGraph<ReebNode, ReebEdge>,
}

impl ReebGraph {
    /// Builds the Reeb graph and a skeleton for every cell.
    ///
    /// Two cells are adjacent when they share exactly two vertices and a
    /// bridge joins them. Skeleton failures are logged and replaced by a
    /// centroid waypoint; they never fail the build.
    pub fn build<O>(boundary: &BoundaryGraph, cells: &[Cell], oracle: &O, skeleton_eps: f64) -> Self
    where
        O: SkeletonOracle + ?Sized,
    {
        let mut graph = UnGraph::with_capacity(cells.len(), cells.len());

        for (index, cell) in cells.iter().enumerate() {
            let mut polygon = cell.points(boundary);
            ensure_ccw(&mut polygon);
            let centroid = polygon_centroid(&polygon)
                .or_else(|| vertex_average(&polygon))
                .unwrap_or_default();

            let (skeleton, source) = match cell_skeleton(&polygon, oracle, skeleton_eps) {
                Ok(skeleton) => (skeleton, SkeletonSource::Oracle),
                Err(err) => {
                    log::warn!("cell {index}: {err}; using centroid waypoint");
                    (
                        SkeletonSubgraph::single(centroid),
                        SkeletonSource::CentroidFallback,
                    )
                }
            };

            graph.add_node(ReebNode {
                cell: cell.clone(),
                polygon,
                centroid,
                skeleton,
                source,
            });
        }

        let sets: Vec<BTreeSet<VertexId>> = cells
            .iter()
            .map(|c| c.vertices().iter().copied().collect())
            .collect();
        for i in 0..cells.len() {
            for j in (i + 1)..cells.len() {
                let Some(shared) = shared_bridge(boundary, &sets[i], &sets[j]) else {
                    continue;
                };
                let (a, b) = (NodeIndex::new(i), NodeIndex::new(j));
                let edge = ReebEdge {
                    shared,
                    midpoint: boundary.point(shared.0).midpoint(boundary.point(shared.1)),
                    length: graph[a].centroid.distance(graph[b].centroid),
                };
                graph.add_edge(a, b, edge);
            }
        }

        log::debug!(
            "reeb graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Self { graph }
    }

    /// Number of cells.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of cell adjacencies.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns the node for the `index`-th cell.
    pub fn node(&self, index: usize) -> Option<&ReebNode> {
        self.graph.node_weight(NodeIndex::new(index))
    }

    /// Nodes in cell order.
    pub fn nodes(&self) -> impl Iterator<Item = &ReebNode> + '_ {
        self.graph.node_indices().map(move |i| &self.graph[i])
    }

    /// Edges as `(cell, cell, edge)`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, &ReebEdge)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index(), e.weight()))
    }

    /// Number of edges incident to the `index`-th cell.
    pub fn degree(&self, index: usize) -> usize {
        self.graph.edges(NodeIndex::new(index)).count()
    }

    /// Number of connected components.
    pub fn component_count(&self) -> usize {
        petgraph::algo::connected_components(&self.graph)
    }

    /// The underlying petgraph graph.
    pub fn graph(&self) -> &UnGraph<ReebNode, ReebEdge> {
        &self.graph
    }
}

fn shared_bridge(
    boundary: &BoundaryGraph,
    a: &BTreeSet<VertexId>,
    b: &BTreeSet<VertexId>,
) -> Option<(VertexId, VertexId)> {
    let mut shared = a.intersection(b).copied();
    let (first, second) = (shared.next()?, shared.next()?);
    if shared.next().is_some() || !boundary.has_bridge_between(first, second) {
        return None;
    }
    Some((first, second))
}

fn cell_skeleton<O>(
    polygon: &[Point2<f64>],
    oracle: &O,
    eps: f64,
) -> Result<SkeletonSubgraph, DecompositionError>
where
    O: SkeletonOracle + ?Sized,
{
    if polygon.len() < 3 {
        return Err(Degeneracy::TooFewVertices {
            count: polygon.len(),
        }
        .into());
    }
    if polygon_area(polygon) < f64::EPSILON {
        return Err(Degeneracy::ZeroArea.into());
    }

    let junctions = oracle.skeletonize(polygon, &[])?;
    Ok(SkeletonSubgraph::from_junctions(&junctions, eps)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boustrophedon::cells::extract_cells;
    use crate::boustrophedon::sweep::line_sweep;
    use crate::error::OracleError;
    use crate::polygon::{is_clockwise, SkeletonJunction, WavefrontOracle};
    use approx::assert_relative_eq;

    type Loop = Vec<(f64, f64)>;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point2<f64>> {
        coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    fn reeb_of<O: SkeletonOracle>(outer: &[(f64, f64)], holes: &[Loop], oracle: &O) -> ReebGraph {
        let holes: Vec<_> = holes.iter().map(|h| pts(h)).collect();
        let mut graph = BoundaryGraph::from_loops(&pts(outer), &holes).unwrap();
        let sweep = line_sweep(&mut graph, 1e-9).unwrap();
        let cells = extract_cells(&graph, sweep.seeds.iter().copied()).unwrap();
        ReebGraph::build(&graph, &cells, oracle, 1e-5)
    }

    fn failing(
        _: &[Point2<f64>],
        _: &[Vec<Point2<f64>>],
    ) -> Result<Vec<SkeletonJunction>, OracleError> {
        Err(OracleError::Rejected("unavailable".into()))
    }

    /// Reports a ridge between two points inside the polygon.
    fn two_point(
        polygon: &[Point2<f64>],
        _: &[Vec<Point2<f64>>],
    ) -> Result<Vec<SkeletonJunction>, OracleError> {
        let c = vertex_average(polygon).ok_or(OracleError::Empty)?;
        let a = c.lerp(polygon[0], 0.5);
        Ok(vec![
            SkeletonJunction {
                point: a,
                priority: 1.0,
                neighbors: vec![c, polygon[0]],
            },
            SkeletonJunction {
                point: c,
                priority: 2.0,
                neighbors: vec![a],
            },
        ])
    }

    const SQUARE: [(f64, f64); 4] = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];

    #[test]
    fn test_single_cell_is_one_node() {
        let reeb = reeb_of(&SQUARE, &[], &WavefrontOracle::default());
        assert_eq!(reeb.node_count(), 1);
        assert_eq!(reeb.edge_count(), 0);
        assert_eq!(reeb.component_count(), 1);

        let node = reeb.node(0).unwrap();
        assert!(!is_clockwise(&node.polygon));
        assert_relative_eq!(node.centroid.x, 2.0);
        assert_relative_eq!(node.centroid.y, 2.0);
    }

    #[test]
    fn test_square_hole_forms_cycle() {
        let hole = vec![(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0)];
        let reeb = reeb_of(&SQUARE, &[hole], &two_point);
        assert_eq!(reeb.node_count(), 4);
        assert_eq!(reeb.edge_count(), 4);
        for i in 0..4 {
            assert_eq!(reeb.degree(i), 2);
        }
        for (_, _, edge) in reeb.edges() {
            assert!(edge.shared.0 < edge.shared.1);
            assert!(edge.length > 0.0);
            // Bridges are vertical at x = 1 or x = 3.
            assert!(edge.midpoint.x == 1.0 || edge.midpoint.x == 3.0);
        }
    }

    #[test]
    fn test_arrow_adjacency() {
        let arrow = [(0.0, 0.0), (4.0, 2.0), (0.0, 4.0), (1.0, 2.0)];
        let reeb = reeb_of(&arrow, &[], &two_point);
        assert_eq!(reeb.node_count(), 3);
        assert_eq!(reeb.edge_count(), 2);
        let degrees: Vec<usize> = (0..3).map(|i| reeb.degree(i)).collect();
        assert_eq!(degrees.iter().filter(|&&d| d == 2).count(), 1);
        assert!(reeb.nodes().all(|n| n.source == SkeletonSource::Oracle));
        assert!(reeb.nodes().all(|n| n.skeleton.edges.len() == 1));
    }

    #[test]
    fn test_oracle_failure_falls_back_to_centroid() {
        let reeb = reeb_of(&SQUARE, &[], &failing);
        let node = reeb.node(0).unwrap();
        assert_eq!(node.source, SkeletonSource::CentroidFallback);
        assert_eq!(node.skeleton.nodes.len(), 1);
        assert_eq!(node.skeleton.nodes[0].point, node.centroid);
        assert!(node.skeleton.nodes[0].end);
        assert!(node.skeleton.nodes[0].original);
    }

    #[test]
    fn test_degenerate_cell_skips_oracle() {
        let sliver = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        assert_eq!(
            cell_skeleton(&sliver, &two_point, 1e-5).unwrap_err(),
            DecompositionError::GeometryDegenerate(Degeneracy::ZeroArea)
        );
        assert!(matches!(
            cell_skeleton(&sliver[..2], &two_point, 1e-5),
            Err(DecompositionError::GeometryDegenerate(
                Degeneracy::TooFewVertices { count: 2 }
            ))
        ));
        assert!(matches!(
            cell_skeleton(&pts(&SQUARE), &failing, 1e-5),
            Err(DecompositionError::SkeletonOracleFailure(_))
        ));
    }
}
