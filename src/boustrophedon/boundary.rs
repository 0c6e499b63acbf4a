//! Id-addressed arena of boundary vertices and role-tagged directed edges.
//!
//! The outer loop runs clockwise and hole loops run counter-clockwise, so the
//! region interior always lies to the right of every boundary edge. Sweep
//! surgery splits boundary edges and adds bridge pairs; ids are never reused.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Degeneracy, DecompositionError};
use crate::polygon::{ensure_ccw, ensure_cw, polygon_area};
use crate::primitives::Point2;

/// Stable identifier of a boundary vertex.
pub type VertexId = usize;

/// Role of a directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EdgeRole {
    /// Part of the outer loop or of a hole loop.
    Boundary,
    /// Bridge direction that closes the cell behind the sweep line.
    BridgeClose,
    /// Bridge direction that opens the cell ahead of the sweep line.
    BridgeOpen,
}

impl EdgeRole {
    /// Returns true for either half of a bridge pair.
    #[inline]
    pub fn is_bridge(self) -> bool {
        !matches!(self, Self::Boundary)
    }
}

/// Which loop a vertex lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryOrientation {
    /// The clockwise outer loop.
    Outer,
    /// A counter-clockwise hole loop.
    Hole,
}

/// A boundary vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub point: Point2<f64>,
    pub orientation: BoundaryOrientation,
    /// Created by splitting an edge during the sweep.
    pub synthetic: bool,
}

/// Boundary vertices and directed edges of a region.
///
/// Every vertex has exactly one `Boundary` predecessor and one `Boundary`
/// successor, whatever bridges it carries.
#[derive(Debug, Clone, Default)]
pub struct BoundaryGraph {
    vertices: Vec<Vertex>,
    edges: BTreeMap<(VertexId, VertexId), EdgeRole>,
    outgoing: Vec<BTreeSet<VertexId>>,
    incoming: Vec<BTreeSet<VertexId>>,
}

impl BoundaryGraph {
    /// Builds a boundary-only graph from an outer loop and hole loops.
    ///
    /// Loops may be given in either winding and may repeat their first point
    /// at the end. The outer loop is stored clockwise and holes
    /// counter-clockwise.
    ///
    /// # Example
    ///
    /// ```
    /// use sweepcover::boustrophedon::BoundaryGraph;
    /// use sweepcover::Point2;
    ///
    /// let square = [
    ///     Point2::new(0.0, 0.0),
    ///     Point2::new(4.0, 0.0),
    ///     Point2::new(4.0, 4.0),
    ///     Point2::new(0.0, 4.0),
    /// ];
    /// let graph = BoundaryGraph::from_loops(&square, &[]).unwrap();
    /// assert_eq!(graph.vertex_count(), 4);
    /// assert_eq!(graph.edge_count(), 4);
    /// ```
    pub fn from_loops(
        outer: &[Point2<f64>],
        holes: &[Vec<Point2<f64>>],
    ) -> Result<Self, DecompositionError> {
        let mut graph = Self::default();
        graph.push_loop(normalize_loop(outer, true)?, BoundaryOrientation::Outer);
        for hole in holes {
            graph.push_loop(normalize_loop(hole, false)?, BoundaryOrientation::Hole);
        }
        Ok(graph)
    }

    pub(crate) fn push_loop(&mut self, points: Vec<Point2<f64>>, orientation: BoundaryOrientation) {
        let first = self.vertices.len();
        let n = points.len();
        for point in points {
            self.push_vertex(Vertex {
                point,
                orientation,
                synthetic: false,
            });
        }
        for i in 0..n {
            self.insert_edge(first + i, first + (i + 1) % n, EdgeRole::Boundary);
        }
    }

    fn push_vertex(&mut self, vertex: Vertex) -> VertexId {
        self.vertices.push(vertex);
        self.outgoing.push(BTreeSet::new());
        self.incoming.push(BTreeSet::new());
        self.vertices.len() - 1
    }

    /// Number of vertices, including synthetic ones.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the vertex with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id]
    }

    /// Position of a vertex.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    #[inline]
    pub fn point(&self, id: VertexId) -> Point2<f64> {
        self.vertices[id].point
    }

    /// Iterates over `(id, vertex)` pairs in id order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.vertices.iter().enumerate()
    }

    /// Iterates over directed edges in `(from, to)` order.
    pub fn edges(&self) -> impl Iterator<Item = ((VertexId, VertexId), EdgeRole)> + '_ {
        self.edges.iter().map(|(&key, &role)| (key, role))
    }

    /// Iterates over bridge edges.
    pub fn bridges(&self) -> impl Iterator<Item = ((VertexId, VertexId), EdgeRole)> + '_ {
        self.edges().filter(|(_, role)| role.is_bridge())
    }

    /// Role of the directed edge `from -> to`, if present.
    pub fn role(&self, from: VertexId, to: VertexId) -> Option<EdgeRole> {
        self.edges.get(&(from, to)).copied()
    }

    /// Returns true if an edge joins `a` and `b` in either direction.
    pub fn has_edge_between(&self, a: VertexId, b: VertexId) -> bool {
        self.edges.contains_key(&(a, b)) || self.edges.contains_key(&(b, a))
    }

    /// Returns true if a bridge joins `a` and `b` in either direction.
    pub fn has_bridge_between(&self, a: VertexId, b: VertexId) -> bool {
        [self.role(a, b), self.role(b, a)]
            .into_iter()
            .flatten()
            .any(EdgeRole::is_bridge)
    }

    /// Targets of the edges leaving `id`, in id order.
    pub fn successors(&self, id: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.outgoing.get(id).into_iter().flatten().copied()
    }

    /// The next vertex along the boundary loop.
    pub fn boundary_successor(&self, id: VertexId) -> Option<VertexId> {
        self.outgoing
            .get(id)?
            .iter()
            .copied()
            .find(|&to| self.role(id, to) == Some(EdgeRole::Boundary))
    }

    /// The previous vertex along the boundary loop.
    pub fn boundary_predecessor(&self, id: VertexId) -> Option<VertexId> {
        self.incoming
            .get(id)?
            .iter()
            .copied()
            .find(|&from| self.role(from, id) == Some(EdgeRole::Boundary))
    }

    /// A copy with every point rotated about the origin by `angle` radians.
    ///
    /// Positive angles rotate counter-clockwise. Ids, roles and flags are kept.
    pub fn rotated(&self, angle: f64) -> Self {
        let mut copy = self.clone();
        for vertex in &mut copy.vertices {
            vertex.point = vertex.point.rotate(angle);
        }
        copy
    }

    /// Splits the boundary edge `from -> to` at `point`.
    ///
    /// The new synthetic vertex inherits the loop orientation of `from`.
    pub(crate) fn split_edge(&mut self, from: VertexId, to: VertexId, point: Point2<f64>) -> VertexId {
        let orientation = self.vertices[from].orientation;
        let id = self.push_vertex(Vertex {
            point,
            orientation,
            synthetic: true,
        });
        self.remove_edge(from, to);
        self.insert_edge(from, id, EdgeRole::Boundary);
        self.insert_edge(id, to, EdgeRole::Boundary);
        id
    }

    pub(crate) fn insert_edge(&mut self, from: VertexId, to: VertexId, role: EdgeRole) {
        self.edges.insert((from, to), role);
        self.outgoing[from].insert(to);
        self.incoming[to].insert(from);
    }

    fn remove_edge(&mut self, from: VertexId, to: VertexId) {
        self.edges.remove(&(from, to));
        self.outgoing[from].remove(&to);
        self.incoming[to].remove(&from);
    }
}

fn normalize_loop(points: &[Point2<f64>], clockwise: bool) -> Result<Vec<Point2<f64>>, Degeneracy> {
    let mut points = points.to_vec();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }

    let n = points.len();
    if n < 3 {
        return Err(Degeneracy::TooFewVertices { count: n });
    }
    if let Some(index) = points.iter().position(|p| !(p.x.is_finite() && p.y.is_finite())) {
        return Err(Degeneracy::NonFinite { index });
    }
    if let Some(i) = (0..n).find(|&i| points[i] == points[(i + 1) % n]) {
        return Err(Degeneracy::DuplicatePoint { index: (i + 1) % n });
    }
    let area = polygon_area(&points);
    if area.is_nan() || area < f64::EPSILON {
        return Err(Degeneracy::ZeroArea);
    }

    if clockwise {
        ensure_cw(&mut points);
    } else {
        ensure_ccw(&mut points);
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::is_clockwise;
    use approx::assert_relative_eq;

    fn square(min: f64, max: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(min, min),
            Point2::new(max, min),
            Point2::new(max, max),
            Point2::new(min, max),
        ]
    }

    fn loop_points(graph: &BoundaryGraph, start: VertexId) -> Vec<Point2<f64>> {
        let mut points = vec![graph.point(start)];
        let mut v = graph.boundary_successor(start).unwrap();
        while v != start {
            points.push(graph.point(v));
            v = graph.boundary_successor(v).unwrap();
        }
        points
    }

    #[test]
    fn test_from_loops_orients_loops() {
        let graph = BoundaryGraph::from_loops(&square(0.0, 4.0), &[square(1.0, 3.0)]).unwrap();
        assert_eq!(graph.vertex_count(), 8);
        assert_eq!(graph.edge_count(), 8);

        assert!(is_clockwise(&loop_points(&graph, 0)));
        assert!(!is_clockwise(&loop_points(&graph, 4)));
        assert_eq!(graph.vertex(0).orientation, BoundaryOrientation::Outer);
        assert_eq!(graph.vertex(5).orientation, BoundaryOrientation::Hole);
        assert!(graph.vertices().all(|(_, v)| !v.synthetic));
    }

    #[test]
    fn test_every_vertex_has_one_boundary_neighbor_each_way() {
        let graph = BoundaryGraph::from_loops(&square(0.0, 4.0), &[square(1.0, 3.0)]).unwrap();
        for (id, _) in graph.vertices() {
            let succ = graph.boundary_successor(id).unwrap();
            assert_eq!(graph.boundary_predecessor(succ), Some(id));
        }
    }

    #[test]
    fn test_closing_point_is_dropped() {
        let mut closed = square(0.0, 1.0);
        closed.push(closed[0]);
        let graph = BoundaryGraph::from_loops(&closed, &[]).unwrap();
        assert_eq!(graph.vertex_count(), 4);
    }

    #[test]
    fn test_degenerate_loops() {
        let two = [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert_eq!(
            BoundaryGraph::from_loops(&two, &[]).unwrap_err(),
            DecompositionError::GeometryDegenerate(Degeneracy::TooFewVertices { count: 2 })
        );

        let duplicate = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        assert_eq!(
            BoundaryGraph::from_loops(&duplicate, &[]).unwrap_err(),
            DecompositionError::GeometryDegenerate(Degeneracy::DuplicatePoint { index: 2 })
        );

        let flat = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 2.0),
        ];
        assert_eq!(
            BoundaryGraph::from_loops(&flat, &[]).unwrap_err(),
            DecompositionError::GeometryDegenerate(Degeneracy::ZeroArea)
        );

        let mut unbounded = square(0.0, 1.0);
        unbounded[2].y = f64::NAN;
        assert_eq!(
            BoundaryGraph::from_loops(&unbounded, &[]).unwrap_err(),
            DecompositionError::GeometryDegenerate(Degeneracy::NonFinite { index: 2 })
        );
        unbounded[2].y = f64::INFINITY;
        assert!(BoundaryGraph::from_loops(&unbounded, &[]).is_err());

        // A bad hole rejects the whole region.
        assert!(BoundaryGraph::from_loops(&square(0.0, 4.0), &[two.to_vec()]).is_err());
    }

    #[test]
    fn test_split_edge() {
        let mut graph = BoundaryGraph::from_loops(&square(0.0, 4.0), &[]).unwrap();
        let (from, to) = (0, graph.boundary_successor(0).unwrap());
        let mid = graph.point(from).midpoint(graph.point(to));

        let id = graph.split_edge(from, to, mid);
        assert_eq!(id, 4);
        assert!(graph.vertex(id).synthetic);
        assert_eq!(graph.role(from, to), None);
        assert_eq!(graph.boundary_successor(from), Some(id));
        assert_eq!(graph.boundary_successor(id), Some(to));
        assert_eq!(graph.boundary_predecessor(to), Some(id));
        assert_eq!(graph.edge_count(), 5);
    }

    #[test]
    fn test_bridges_do_not_shadow_boundary_neighbors() {
        let mut graph = BoundaryGraph::from_loops(&square(0.0, 4.0), &[]).unwrap();
        graph.insert_edge(0, 2, EdgeRole::BridgeOpen);
        graph.insert_edge(2, 0, EdgeRole::BridgeClose);

        assert!(graph.has_bridge_between(0, 2));
        assert!(graph.has_edge_between(2, 0));
        assert!(!graph.has_bridge_between(0, 1));
        assert_eq!(graph.bridges().count(), 2);
        assert_eq!(graph.successors(0).count(), 2);
        assert_eq!(graph.boundary_successor(0), Some(1));
        assert_eq!(graph.boundary_predecessor(0), Some(3));
    }

    #[test]
    fn test_rotated_round_trip() {
        let graph = BoundaryGraph::from_loops(&square(0.0, 4.0), &[square(1.0, 3.0)]).unwrap();
        let back = graph.rotated(0.7).rotated(-0.7);
        for (id, v) in graph.vertices() {
            assert_relative_eq!(back.point(id).x, v.point.x, epsilon = 1e-12);
            assert_relative_eq!(back.point(id).y, v.point.y, epsilon = 1e-12);
        }
        assert_eq!(back.edge_count(), graph.edge_count());
    }
}
