//! Eulerian circuit over the Reeb graph.
//!
//! Odd-degree cells are paired by shortest paths (centroid distance as
//! cost) and every edge on a matched path is traversed twice. The closed
//! circuit is then found with Hierholzer's algorithm.

use petgraph::algo::astar;
use petgraph::graph::{EdgeIndex, NodeIndex};

use super::reeb::ReebGraph;
use crate::error::DecompositionError;

/// Closed walk that uses every Reeb edge at least once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EulerCircuit {
    /// Cells visited, first and last entries equal. A single cell without
    /// edges yields a one-entry walk.
    pub nodes: Vec<NodeIndex>,
    /// Reeb edges traversed, `nodes.len() - 1` entries.
    pub edges: Vec<EdgeIndex>,
    /// Reeb edges added a second time to even out node degrees.
    pub duplicated: Vec<EdgeIndex>,
}

impl EulerCircuit {
    /// Returns true if the circuit traverses no edge.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Eulerizes the Reeb graph and returns a closed circuit from cell 0.
///
/// Odd nodes are matched exactly (bitmask dynamic programming) when there
/// are at most `exact_matching_limit` of them, capped at
/// [`EXACT_MATCHING_CAP`], and greedily otherwise.
pub fn eulerize(reeb: &ReebGraph, exact_matching_limit: usize) -> Result<EulerCircuit, DecompositionError> {
    let components = reeb.component_count();
    if components != 1 {
        return Err(DecompositionError::DisconnectedReebGraph { components });
    }

    let graph = reeb.graph();
    let odd: Vec<NodeIndex> = graph
        .node_indices()
        .filter(|&n| graph.edges(n).count() % 2 == 1)
        .collect();

    let k = odd.len();
    let mut paths = vec![vec![None; k]; k];
    for i in 0..k {
        for j in (i + 1)..k {
            let path = astar(graph, odd[i], |n| n == odd[j], |e| e.weight().length, |_| 0.0);
            paths[i][j] = path.clone();
            paths[j][i] = path.map(|(cost, mut nodes)| {
                nodes.reverse();
                (cost, nodes)
            });
        }
    }
    let cost = |i: usize, j: usize| paths[i][j].as_ref().map_or(f64::INFINITY, |p| p.0);

    let pairs = if matches_exactly(k, exact_matching_limit) {
        exact_matching(k, &cost)
    } else {
        greedy_matching(k, &cost)
    };

    let mut duplicated = Vec::new();
    for (i, j) in pairs {
        let Some((_, nodes)) = &paths[i][j] else {
            continue;
        };
        for step in nodes.windows(2) {
            if let Some(edge) = graph.find_edge(step[0], step[1]) {
                duplicated.push(edge);
            }
        }
    }

    let mut multiset: Vec<EdgeIndex> = graph.edge_indices().collect();
    multiset.extend(duplicated.iter().copied());
    let (nodes, edges) = hierholzer(reeb, &multiset, NodeIndex::new(0));

    log::debug!(
        "euler circuit: {} odd cells, {} duplicated edges, {} steps",
        k,
        duplicated.len(),
        edges.len()
    );
    Ok(EulerCircuit {
        nodes,
        edges,
        duplicated,
    })
}

/// Most odd cells the bitmask matching handles, whatever the configured limit.
pub const EXACT_MATCHING_CAP: usize = 20;

/// Returns true if `k` odd cells are matched exactly under `limit`.
fn matches_exactly(k: usize, limit: usize) -> bool {
    k <= limit.min(EXACT_MATCHING_CAP)
}

/// Minimum-cost perfect matching over `k` (even) items.
fn exact_matching(k: usize, cost: &dyn Fn(usize, usize) -> f64) -> Vec<(usize, usize)> {
    if k == 0 {
        return Vec::new();
    }
    let full = (1usize << k) - 1;
    let mut best = vec![f64::INFINITY; full + 1];
    let mut choice = vec![(0, 0); full + 1];
    best[0] = 0.0;

    for mask in 0..full {
        if !best[mask].is_finite() {
            continue;
        }
        // Always pair the lowest unmatched item.
        let i = (!mask).trailing_zeros() as usize;
        for j in (i + 1)..k {
            if mask & (1 << j) != 0 {
                continue;
            }
            let next = mask | (1 << i) | (1 << j);
            let total = best[mask] + cost(i, j);
            if total < best[next] {
                best[next] = total;
                choice[next] = (i, j);
            }
        }
    }

    let mut pairs = Vec::with_capacity(k / 2);
    let mut mask = full;
    while mask != 0 && best[mask].is_finite() {
        let (i, j) = choice[mask];
        pairs.push((i, j));
        mask &= !((1 << i) | (1 << j));
    }
    pairs.reverse();
    pairs
}

/// Repeatedly pairs the cheapest remaining couple.
fn greedy_matching(k: usize, cost: &dyn Fn(usize, usize) -> f64) -> Vec<(usize, usize)> {
    let mut candidates: Vec<(f64, usize, usize)> = (0..k)
        .flat_map(|i| ((i + 1)..k).map(move |j| (i, j)))
        .map(|(i, j)| (cost(i, j), i, j))
        .collect();
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then((a.1, a.2).cmp(&(b.1, b.2))));

    let mut matched = vec![false; k];
    let mut pairs = Vec::with_capacity(k / 2);
    for (_, i, j) in candidates {
        if !matched[i] && !matched[j] {
            matched[i] = true;
            matched[j] = true;
            pairs.push((i, j));
        }
    }
    pairs
}

/// Hierholzer's algorithm over a multiset of Reeb edges.
fn hierholzer(reeb: &ReebGraph, multiset: &[EdgeIndex], start: NodeIndex) -> (Vec<NodeIndex>, Vec<EdgeIndex>) {
    let graph = reeb.graph();
    let mut adjacency: Vec<Vec<(usize, NodeIndex)>> = vec![Vec::new(); graph.node_count()];
    for (slot, &edge) in multiset.iter().enumerate() {
        if let Some((a, b)) = graph.edge_endpoints(edge) {
            adjacency[a.index()].push((slot, b));
            adjacency[b.index()].push((slot, a));
        }
    }

    let mut used = vec![false; multiset.len()];
    let mut cursor = vec![0; graph.node_count()];
    let mut stack: Vec<(NodeIndex, Option<usize>)> = vec![(start, None)];
    let mut nodes = Vec::with_capacity(multiset.len() + 1);
    let mut edges = Vec::with_capacity(multiset.len());

    while let Some(&(v, _)) = stack.last() {
        let list = &adjacency[v.index()];
        while cursor[v.index()] < list.len() && used[list[cursor[v.index()]].0] {
            cursor[v.index()] += 1;
        }
        if let Some(&(slot, w)) = list.get(cursor[v.index()]) {
            used[slot] = true;
            stack.push((w, Some(slot)));
        } else if let Some((v, via)) = stack.pop() {
            nodes.push(v);
            if let Some(slot) = via {
                edges.push(multiset[slot]);
            }
        }
    }

    nodes.reverse();
    edges.reverse();
    (nodes, edges)
}
