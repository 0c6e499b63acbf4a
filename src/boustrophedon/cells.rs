//! Monotone cells traced as simple cycles of the swept boundary graph.
//!
//! Every directed edge has exactly one cell on its right. Walking an edge and
//! always taking the sharpest right turn traces that cell.

use std::collections::BTreeSet;

use super::boundary::{BoundaryGraph, VertexId};
use crate::error::DecompositionError;
use crate::polygon::polygon_area;
use crate::primitives::Point2;

/// A monotone cell: a closed, simple cycle of vertex ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    vertices: Vec<VertexId>,
}

impl Cell {
    /// Vertex ids in walk order (clockwise in the sweep frame).
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    /// Number of vertices on the cycle.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the cycle has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns true if `vertex` lies on the cycle.
    pub fn contains(&self, vertex: VertexId) -> bool {
        self.vertices.contains(&vertex)
    }

    /// Sorted vertex set; two cells are the same cell iff their keys match.
    pub fn key(&self) -> Vec<VertexId> {
        let mut key = self.vertices.clone();
        key.sort_unstable();
        key
    }

    /// Positions of the cell vertices in walk order.
    pub fn points(&self, graph: &BoundaryGraph) -> Vec<Point2<f64>> {
        self.vertices.iter().map(|&v| graph.point(v)).collect()
    }

    /// Enclosed area.
    pub fn area(&self, graph: &BoundaryGraph) -> f64 {
        polygon_area(&self.points(graph))
    }

    /// Directed edges of the cycle, closing edge included.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

/// Traces every cell reachable from the seed vertices.
///
/// Each outgoing edge of each seed that is not yet part of an accepted cell
/// starts a walk. Cells are returned in discovery order.
pub fn extract_cells(
    graph: &BoundaryGraph,
    seeds: impl IntoIterator<Item = VertexId>,
) -> Result<Vec<Cell>, DecompositionError> {
    let mut cells = Vec::new();
    let mut keys = BTreeSet::new();
    let mut consumed = BTreeSet::new();

    for seed in seeds {
        let firsts: Vec<VertexId> = graph.successors(seed).collect();
        for first in firsts {
            if consumed.contains(&(seed, first)) {
                continue;
            }
            let cell = Cell {
                vertices: trace(graph, seed, first)?,
            };
            consumed.extend(cell.edges());
            if keys.insert(cell.key()) {
                cells.push(cell);
            }
        }
    }

    log::debug!("extracted {} cells", cells.len());
    Ok(cells)
}

/// Walks from `start` over the edge to `first`, turning as far clockwise as
/// possible at every vertex, until the walk returns to `start`.
fn trace(graph: &BoundaryGraph, start: VertexId, first: VertexId) -> Result<Vec<VertexId>, DecompositionError> {
    let unclosed = || DecompositionError::UnclosedCell { start };

    let mut path = vec![start];
    let mut visited = BTreeSet::from([start]);
    let (mut prev, mut current) = (start, first);

    for _ in 0..graph.edge_count() {
        if current == start {
            return Ok(path);
        }
        if !visited.insert(current) {
            return Err(unclosed());
        }
        path.push(current);

        let incoming = graph.point(current) - graph.point(prev);
        let next = graph
            .successors(current)
            .filter(|&candidate| candidate != prev)
            .map(|candidate| {
                let outgoing = graph.point(candidate) - graph.point(current);
                (incoming.signed_angle_to(outgoing), candidate)
            })
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, candidate)| candidate)
            .ok_or_else(unclosed)?;

        prev = current;
        current = next;
    }

    if current == start {
        Ok(path)
    } else {
        Err(unclosed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boustrophedon::sweep::line_sweep;
    use approx::assert_relative_eq;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point2<f64>> {
        coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    fn cells_of(outer: &[(f64, f64)], holes: &[&[(f64, f64)]]) -> (BoundaryGraph, Vec<Cell>) {
        let holes: Vec<_> = holes.iter().map(|h| pts(h)).collect();
        let mut graph = BoundaryGraph::from_loops(&pts(outer), &holes).unwrap();
        let sweep = line_sweep(&mut graph, 1e-9).unwrap();
        let cells = extract_cells(&graph, sweep.seeds.iter().copied()).unwrap();
        (graph, cells)
    }

    fn assert_simple(cell: &Cell) {
        assert_eq!(cell.key().windows(2).filter(|w| w[0] == w[1]).count(), 0);
        assert!(cell.len() >= 3);
    }

    #[test]
    fn test_square_is_one_cell() {
        let square = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
        let (graph, cells) = cells_of(&square, &[]);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].key(), vec![0, 1, 2, 3]);
        assert_relative_eq!(cells[0].area(&graph), 16.0);
    }

    #[test]
    fn test_cells_wind_clockwise() {
        let (graph, cells) = cells_of(&[(0.0, 0.0), (4.0, 2.0), (0.0, 4.0), (1.0, 2.0)], &[]);
        assert_eq!(cells.len(), 3);
        for cell in &cells {
            assert_simple(cell);
            assert!(crate::polygon::is_clockwise(&cell.points(&graph)));
        }
    }

    #[test]
    fn test_arrow_cells_partition_area() {
        let arrow = [(0.0, 0.0), (4.0, 2.0), (0.0, 4.0), (1.0, 2.0)];
        let (graph, cells) = cells_of(&arrow, &[]);
        let total: f64 = cells.iter().map(|c| c.area(&graph)).sum();
        assert_relative_eq!(total, polygon_area(&pts(&arrow)), epsilon = 1e-9);
    }

    #[test]
    fn test_l_shape_cells() {
        let (graph, cells) = cells_of(
            &[(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.0), (1.0, 2.0), (0.0, 2.0)],
            &[],
        );
        assert_eq!(cells.len(), 2);
        let mut areas: Vec<f64> = cells.iter().map(|c| c.area(&graph)).collect();
        areas.sort_by(f64::total_cmp);
        assert_relative_eq!(areas[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(areas[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_square_hole_cells() {
        let square = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
        let hole: &[(f64, f64)] = &[(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0)];
        let (graph, cells) = cells_of(&square, &[hole]);
        assert_eq!(cells.len(), 4);

        let total: f64 = cells.iter().map(|c| c.area(&graph)).sum();
        assert_relative_eq!(total, 12.0, epsilon = 1e-12);
        for cell in &cells {
            assert_simple(cell);
        }
    }

    #[test]
    fn test_every_edge_lies_on_exactly_one_cell() {
        let (graph, cells) = cells_of(
            &[
                (0.0, 0.0),
                (3.0, 1.0),
                (6.0, 0.0),
                (5.0, 2.0),
                (6.0, 4.0),
                (3.0, 3.0),
                (0.0, 4.0),
                (1.0, 2.0),
            ],
            &[],
        );
        assert_eq!(cells.len(), 5);
        let mut used: Vec<_> = cells.iter().flat_map(|c| c.edges()).collect();
        used.sort_unstable();
        let all: Vec<_> = graph.edges().map(|(key, _)| key).collect();
        assert_eq!(used, all);
    }

    #[test]
    fn test_walk_against_boundary_is_unclosed() {
        let mut graph = BoundaryGraph::default();
        graph.push_loop(
            pts(&[(0.0, 0.0), (0.0, 1.0), (1.0, 0.0)]),
            crate::boustrophedon::boundary::BoundaryOrientation::Outer,
        );
        assert_eq!(trace(&graph, 0, 1), Ok(vec![0, 1, 2]));
        // From vertex 2 the only way on leads straight back.
        assert_eq!(
            trace(&graph, 0, 2),
            Err(DecompositionError::UnclosedCell { start: 0 })
        );
    }
}
