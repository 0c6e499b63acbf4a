//! The coverage graph handed to path planners.

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::primitives::Point2;

/// Stable identifier of a coverage node.
pub type NodeId = usize;

/// Role flags of a coverage node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeFlags {
    /// Came from a cell skeleton rather than from stitching.
    pub original: bool,
    /// At most one ridge inside its own cell skeleton.
    pub end: bool,
    /// Stitch node at the middle of a bridge between two cells.
    pub middle: bool,
}

/// A waypoint of the coverage graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageNode {
    pub point: Point2<f64>,
    pub flags: NodeFlags,
    /// Index of the cell whose skeleton produced the node; `None` for
    /// stitch nodes.
    pub cell: Option<usize>,
}

/// Undirected waypoint graph weighted by Euclidean length.
///
/// Backed by a petgraph graph; node ids are the node indices, which stay
/// stable because nodes are never removed.
#[derive(Debug, Clone, Default)]
pub struct CoverageGraph {
    graph: UnGraph<CoverageNode, f64>,
}

impl CoverageGraph {
    /// Creates an empty coverage graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node under a fresh id.
    pub fn add_node(&mut self, node: CoverageNode) -> NodeId {
        self.graph.add_node(node).index()
    }

    /// Joins two existing nodes, weighting the edge by their distance.
    ///
    /// Self-loops and edges to unknown nodes are ignored. Returns true if a
    /// new edge was added.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        let (ia, ib) = (NodeIndex::new(a), NodeIndex::new(b));
        let (Some(pa), Some(pb)) = (self.graph.node_weight(ia), self.graph.node_weight(ib)) else {
            return false;
        };
        if a == b || self.graph.find_edge(ia, ib).is_some() {
            return false;
        }
        let length = pa.point.distance(pb.point);
        self.graph.add_edge(ia, ib, length);
        true
    }

    /// Number of waypoints.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns the node with the given id, if any.
    pub fn node(&self, id: NodeId) -> Option<&CoverageNode> {
        self.graph.node_weight(NodeIndex::new(id))
    }

    /// Nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &CoverageNode)> + '_ {
        self.graph
            .node_indices()
            .map(move |i| (i.index(), &self.graph[i]))
    }

    /// Edges as `((a, b), length)` with `a < b`, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = ((NodeId, NodeId), f64)> + '_ {
        self.graph.edge_references().map(|e| {
            let (a, b) = (e.source().index(), e.target().index());
            ((a.min(b), a.max(b)), *e.weight())
        })
    }

    /// Length of the edge between `a` and `b`, in either order.
    pub fn edge_length(&self, a: NodeId, b: NodeId) -> Option<f64> {
        self.graph
            .find_edge(NodeIndex::new(a), NodeIndex::new(b))
            .map(|e| self.graph[e])
    }

    /// Nodes sharing an edge with `id`, in id order.
    pub fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = self
            .graph
            .neighbors(NodeIndex::new(id))
            .map(|n| n.index())
            .collect();
        out.sort_unstable();
        out
    }

    /// Number of edges incident to `id`.
    pub fn degree(&self, id: NodeId) -> usize {
        self.graph.edges(NodeIndex::new(id)).count()
    }

    /// Returns true if every node is reachable from every other node.
    ///
    /// An empty graph counts as connected.
    pub fn is_connected(&self) -> bool {
        petgraph::algo::connected_components(&self.graph) <= 1
    }

    /// Sum of all edge lengths.
    pub fn total_length(&self) -> f64 {
        self.graph.edge_weights().sum()
    }

    /// Copy with every point rotated about the origin by `angle` radians.
    pub fn rotated(&self, angle: f64) -> Self {
        let mut copy = self.clone();
        for node in copy.graph.node_weights_mut() {
            node.point = node.point.rotate(angle);
        }
        copy
    }

    /// The underlying petgraph graph; node indices are the coverage ids.
    pub fn graph(&self) -> &UnGraph<CoverageNode, f64> {
        &self.graph
    }

    /// Owned petgraph graph for routing, edge weights are lengths.
    pub fn to_petgraph(&self) -> UnGraph<CoverageNode, f64> {
        self.graph.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn waypoint(x: f64, y: f64) -> CoverageNode {
        CoverageNode {
            point: Point2::new(x, y),
            flags: NodeFlags {
                original: true,
                ..NodeFlags::default()
            },
            cell: Some(0),
        }
    }

    #[test]
    fn test_edges_are_weighted_and_deduplicated() {
        let mut graph = CoverageGraph::new();
        let a = graph.add_node(waypoint(0.0, 0.0));
        let b = graph.add_node(waypoint(3.0, 4.0));
        assert!(graph.add_edge(b, a));
        assert!(!graph.add_edge(a, b));
        assert!(!graph.add_edge(a, a));
        assert!(!graph.add_edge(a, 99));

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge_length(a, b), Some(5.0));
        assert_eq!(graph.edges().next(), Some(((a, b), 5.0)));
        assert_eq!(graph.neighbors(a), vec![b]);
        assert_eq!(graph.degree(b), 1);
    }

    #[test]
    fn test_connectivity() {
        let mut graph = CoverageGraph::new();
        assert!(graph.is_connected());
        let a = graph.add_node(waypoint(0.0, 0.0));
        let b = graph.add_node(waypoint(1.0, 0.0));
        let c = graph.add_node(waypoint(2.0, 0.0));
        graph.add_edge(a, b);
        assert!(!graph.is_connected());
        graph.add_edge(c, b);
        assert!(graph.is_connected());
        assert_relative_eq!(graph.total_length(), 2.0);
    }

    #[test]
    fn test_rotated_keeps_lengths() {
        let mut graph = CoverageGraph::new();
        let a = graph.add_node(waypoint(1.0, 0.0));
        let b = graph.add_node(waypoint(1.0, 2.0));
        graph.add_edge(a, b);

        let turned = graph.rotated(std::f64::consts::FRAC_PI_2);
        let p = turned.node(a).unwrap().point;
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
        assert_eq!(turned.edge_length(a, b), Some(2.0));
    }

    #[test]
    fn test_to_petgraph() {
        let mut graph = CoverageGraph::new();
        let a = graph.add_node(waypoint(0.0, 0.0));
        let b = graph.add_node(waypoint(0.0, 2.0));
        let c = graph.add_node(waypoint(2.0, 2.0));
        graph.add_edge(a, b);
        graph.add_edge(b, c);

        let exported = graph.to_petgraph();
        assert_eq!(exported.node_count(), 3);
        assert_eq!(exported.edge_count(), 2);
        assert_eq!(exported[NodeIndex::new(c)].point, Point2::new(2.0, 2.0));
        let costs = petgraph::algo::dijkstra(&exported, NodeIndex::new(a), None, |e| *e.weight());
        assert_eq!(costs[&NodeIndex::new(c)], 4.0);
    }

    #[test]
    fn test_degree_of_hub() {
        let mut graph = CoverageGraph::new();
        let hub = graph.add_node(waypoint(0.0, 0.0));
        let spokes: Vec<NodeId> = (1..=5)
            .map(|i| graph.add_node(waypoint(i as f64, 1.0)))
            .collect();
        for &s in &spokes {
            graph.add_edge(hub, s);
        }
        assert_eq!(graph.degree(hub), 5);
        assert!(spokes.iter().all(|&s| graph.degree(s) == 1));
        assert_eq!(graph.neighbors(hub), spokes);
        assert_eq!(graph.graph().node_count(), 6);
        assert!(graph.is_connected());
    }
}
