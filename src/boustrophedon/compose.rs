//! Stitching cell skeletons into one coverage graph along the Euler circuit.

use super::coverage::{CoverageGraph, CoverageNode, NodeFlags, NodeId};
use super::euler::EulerCircuit;
use super::reeb::ReebGraph;
use crate::primitives::Point2;

/// Builds the coverage graph.
///
/// Cell skeletons are copied once, in the order the circuit first reaches
/// them, each under fresh ids. Every traversal of a Reeb edge adds a stitch
/// node at the middle of its bridge, joined to the nearest skeleton end on
/// either side, so edges duplicated by eulerization are stitched twice.
/// Cells the circuit never reaches are copied last.
pub fn compose(reeb: &ReebGraph, circuit: &EulerCircuit) -> CoverageGraph {
    let graph = reeb.graph();
    let mut coverage = CoverageGraph::new();
    let mut merged: Vec<Option<Vec<NodeId>>> = vec![None; reeb.node_count()];
    let mut stitches = 0;

    for &edge in &circuit.edges {
        let Some((a, b)) = graph.edge_endpoints(edge) else {
            continue;
        };
        merge_cell(&mut coverage, &mut merged, reeb, a.index());
        merge_cell(&mut coverage, &mut merged, reeb, b.index());

        let midpoint = graph[edge].midpoint;
        let stitch = coverage.add_node(CoverageNode {
            point: midpoint,
            flags: NodeFlags {
                original: false,
                end: false,
                middle: true,
            },
            cell: None,
        });
        stitches += 1;
        for side in [a.index(), b.index()] {
            if let Some(target) = nearest_end(reeb, &merged, side, midpoint) {
                coverage.add_edge(stitch, target);
            }
        }
    }

    for index in 0..reeb.node_count() {
        merge_cell(&mut coverage, &mut merged, reeb, index);
    }

    log::debug!(
        "coverage graph: {} nodes, {} edges, {} stitches",
        coverage.node_count(),
        coverage.edge_count(),
        stitches
    );
    coverage
}

fn merge_cell(
    coverage: &mut CoverageGraph,
    merged: &mut [Option<Vec<NodeId>>],
    reeb: &ReebGraph,
    index: usize,
) {
    if merged[index].is_some() {
        return;
    }
    let Some(node) = reeb.node(index) else {
        return;
    };

    let ids: Vec<NodeId> = node
        .skeleton
        .nodes
        .iter()
        .map(|n| {
            coverage.add_node(CoverageNode {
                point: n.point,
                flags: NodeFlags {
                    original: n.original,
                    end: n.end,
                    middle: false,
                },
                cell: Some(index),
            })
        })
        .collect();
    for &(a, b) in &node.skeleton.edges {
        coverage.add_edge(ids[a], ids[b]);
    }
    merged[index] = Some(ids);
}

fn nearest_end(
    reeb: &ReebGraph,
    merged: &[Option<Vec<NodeId>>],
    index: usize,
    point: Point2<f64>,
) -> Option<NodeId> {
    let local = reeb.node(index)?.skeleton.nearest_end(point)?;
    merged.get(index)?.as_ref()?.get(local).copied()
}
