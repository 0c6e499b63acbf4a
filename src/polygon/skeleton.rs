//! Straight-skeleton oracles and per-cell skeleton subgraphs.
//!
//! The decomposition never computes a skeleton itself. It asks a
//! [`SkeletonOracle`] for ridge junctions of a counter-clockwise polygon and
//! turns the answer into a [`SkeletonSubgraph`] of interior waypoints.
//!
//! Oracle output follows the classic "polyskel" shape: a list of junctions,
//! each with a priority (the offset distance at which it formed) and the
//! points it is connected to. The same geometric point may be reported by
//! several junctions, so points are matched within a tolerance.
//!
//! [`WavefrontOracle`] is the bundled oracle: an approximate wavefront
//! propagation that shrinks the polygon in fixed steps and records where
//! edges collapse.
//!
//! # Example
//!
//! ```
//! use sweepcover::polygon::{SkeletonOracle, SkeletonSubgraph, WavefrontOracle};
//! use sweepcover::Point2;
//!
//! let rectangle = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(4.0, 0.0),
//!     Point2::new(4.0, 2.0),
//!     Point2::new(0.0, 2.0),
//! ];
//!
//! let junctions = WavefrontOracle::default().skeletonize(&rectangle, &[]).unwrap();
//! let skeleton = SkeletonSubgraph::from_junctions(&junctions, 1e-5).unwrap();
//! assert!(skeleton.ends().count() >= 1);
//! ```

use std::collections::{BTreeSet, VecDeque};

use super::core::{bounding_box, polygon_signed_area, vertex_average};
use crate::error::OracleError;
use crate::primitives::{Point2, Vec2};

/// One junction reported by a skeleton oracle.
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonJunction {
    /// Position of the junction.
    pub point: Point2<f64>,
    /// Offset distance at which the junction formed.
    pub priority: f64,
    /// Points this junction is connected to by a ridge.
    pub neighbors: Vec<Point2<f64>>,
}

/// Computes the straight skeleton of a simple polygon.
///
/// Implementations receive the outer loop in counter-clockwise order and hole
/// loops in clockwise order. Any error is treated as recoverable by the
/// decomposition, which substitutes a centroid waypoint for the cell.
pub trait SkeletonOracle {
    fn skeletonize(
        &self,
        polygon: &[Point2<f64>],
        holes: &[Vec<Point2<f64>>],
    ) -> Result<Vec<SkeletonJunction>, OracleError>;
}

impl<T> SkeletonOracle for T
where
    T: Fn(&[Point2<f64>], &[Vec<Point2<f64>>]) -> Result<Vec<SkeletonJunction>, OracleError>,
{
    fn skeletonize(
        &self,
        polygon: &[Point2<f64>],
        holes: &[Vec<Point2<f64>>],
    ) -> Result<Vec<SkeletonJunction>, OracleError> {
        self(polygon, holes)
    }
}

/// A waypoint of a cell skeleton.
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonNode {
    /// Position of the node.
    pub point: Point2<f64>,
    /// Highest oracle priority merged into this node.
    pub priority: f64,
    /// Node has at most one ridge.
    pub end: bool,
    /// Node came from the oracle or a centroid fallback, not from stitching.
    pub original: bool,
}

/// Skeleton of a single cell: junction nodes connected by ridges.
#[derive(Debug, Clone, Default)]
pub struct SkeletonSubgraph {
    /// Nodes of the skeleton.
    pub nodes: Vec<SkeletonNode>,
    /// Undirected ridges as `(a, b)` node indices with `a < b`.
    pub edges: Vec<(usize, usize)>,
}

impl SkeletonSubgraph {
    /// A subgraph holding one isolated waypoint.
    pub fn single(point: Point2<f64>) -> Self {
        Self {
            nodes: vec![SkeletonNode {
                point,
                priority: 0.0,
                end: true,
                original: true,
            }],
            edges: Vec::new(),
        }
    }

    /// Builds a subgraph from oracle junctions.
    ///
    /// Junctions closer than `eps` on both axes collapse into one node, and a
    /// ridge is added for every listed neighbor point that matches another
    /// node. Only the component containing the highest-priority junction is
    /// kept so that the result is always connected.
    pub fn from_junctions(junctions: &[SkeletonJunction], eps: f64) -> Result<Self, OracleError> {
        if junctions.is_empty() {
            return Err(OracleError::Empty);
        }

        let mut nodes: Vec<SkeletonNode> = Vec::new();
        let mut node_of = Vec::with_capacity(junctions.len());
        for junction in junctions {
            match nodes.iter().position(|n| n.point.approx_eq(junction.point, eps)) {
                Some(k) => {
                    nodes[k].priority = nodes[k].priority.max(junction.priority);
                    node_of.push(k);
                }
                None => {
                    node_of.push(nodes.len());
                    nodes.push(SkeletonNode {
                        point: junction.point,
                        priority: junction.priority,
                        end: false,
                        original: true,
                    });
                }
            }
        }

        let mut ridges = BTreeSet::new();
        for (i, junction) in junctions.iter().enumerate() {
            let a = node_of[i];
            for &q in &junction.neighbors {
                if let Some(b) = nodes.iter().position(|n| n.point.approx_eq(q, eps)) {
                    if a != b {
                        ridges.insert((a.min(b), a.max(b)));
                    }
                }
            }
        }
        if ridges.is_empty() {
            return Err(OracleError::NoRidges {
                junctions: nodes.len(),
            });
        }

        let mut adjacency = vec![Vec::new(); nodes.len()];
        for &(a, b) in &ridges {
            adjacency[a].push(b);
            adjacency[b].push(a);
        }

        let root = (1..nodes.len()).fold(0, |best, i| {
            if nodes[i].priority > nodes[best].priority {
                i
            } else {
                best
            }
        });
        let mut remap = vec![None; nodes.len()];
        let mut kept = Vec::new();
        let mut queue = VecDeque::from([root]);
        remap[root] = Some(0);
        while let Some(i) = queue.pop_front() {
            kept.push(i);
            for &j in &adjacency[i] {
                if remap[j].is_none() {
                    remap[j] = Some(remap.iter().flatten().count());
                    queue.push_back(j);
                }
            }
        }

        let mut subgraph = SkeletonSubgraph {
            nodes: kept.iter().map(|&i| nodes[i].clone()).collect(),
            edges: ridges
                .iter()
                .filter_map(|&(a, b)| {
                    let (a, b) = (remap[a]?, remap[b]?);
                    Some((a.min(b), a.max(b)))
                })
                .collect(),
        };
        subgraph.edges.sort_unstable();
        subgraph.refresh_end_flags();
        Ok(subgraph)
    }

    /// Number of ridges incident to `node`.
    pub fn degree(&self, node: usize) -> usize {
        self.edges
            .iter()
            .filter(|&&(a, b)| a == node || b == node)
            .count()
    }

    /// Indices of nodes flagged as ends.
    pub fn ends(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.end)
            .map(|(i, _)| i)
    }

    /// The end node nearest to `point` by squared distance.
    ///
    /// Falls back to the nearest node of any kind when no node is an end
    /// (a skeleton made of cycles only). Ties go to the lower index.
    pub fn nearest_end(&self, point: Point2<f64>) -> Option<usize> {
        let nearest = |candidates: &mut dyn Iterator<Item = usize>| {
            candidates.fold(None, |best: Option<(usize, f64)>, i| {
                let d = self.nodes[i].point.distance_squared(point);
                match best {
                    Some((_, bd)) if bd <= d => best,
                    _ => Some((i, d)),
                }
            })
        };
        nearest(&mut self.ends())
            .or_else(|| nearest(&mut (0..self.nodes.len())))
            .map(|(i, _)| i)
    }

    /// Returns the total length of all ridges.
    pub fn total_length(&self) -> f64 {
        self.to_segments()
            .iter()
            .map(|(a, b)| a.distance(*b))
            .sum()
    }

    /// Returns ridges as line segments.
    pub fn to_segments(&self) -> Vec<(Point2<f64>, Point2<f64>)> {
        self.edges
            .iter()
            .map(|&(a, b)| (self.nodes[a].point, self.nodes[b].point))
            .collect()
    }

    fn refresh_end_flags(&mut self) {
        for i in 0..self.nodes.len() {
            self.nodes[i].end = self.degree(i) <= 1;
        }
    }
}

/// Approximate straight skeleton by fixed-step wavefront propagation.
///
/// The polygon is shrunk along vertex bisectors; whenever an edge collapses a
/// junction is recorded and connected to the junctions (or corners) that
/// merged into it. Propagation stops when the front degenerates, and the
/// remaining front vertices are joined at their average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavefrontOracle {
    /// Number of steps across the smallest bounding-box side.
    pub resolution: usize,
}

impl Default for WavefrontOracle {
    fn default() -> Self {
        Self { resolution: 100 }
    }
}

impl WavefrontOracle {
    /// Creates an oracle taking `resolution` steps across the smallest
    /// bounding-box side; zero is raised to one.
    pub fn new(resolution: usize) -> Self {
        Self {
            resolution: resolution.max(1),
        }
    }
}

impl SkeletonOracle for WavefrontOracle {
    fn skeletonize(
        &self,
        polygon: &[Point2<f64>],
        holes: &[Vec<Point2<f64>>],
    ) -> Result<Vec<SkeletonJunction>, OracleError> {
        if polygon.len() < 3 {
            return Err(OracleError::Rejected(format!(
                "{} vertices, at least 3 are required",
                polygon.len()
            )));
        }
        if !holes.is_empty() {
            return Err(OracleError::Rejected("holes are not supported".into()));
        }
        if polygon_signed_area(polygon) <= 0.0 {
            return Err(OracleError::Rejected(
                "polygon must wind counter-clockwise".into(),
            ));
        }

        let (min, max) = bounding_box(polygon).ok_or(OracleError::Empty)?;
        let extent = (max.x - min.x).min(max.y - min.y);
        let step = extent / self.resolution.max(1) as f64;
        if !(step > 0.0 && step.is_finite()) {
            return Err(OracleError::Rejected("polygon has no extent".into()));
        }

        let front = propagate(polygon, step, self.resolution.max(1) * 10);
        let mut neighbors = vec![Vec::new(); front.nodes.len()];
        for &(a, b) in &front.edges {
            neighbors[a].push(front.nodes[b].point);
            neighbors[b].push(front.nodes[a].point);
        }

        let junctions: Vec<_> = front
            .nodes
            .iter()
            .zip(neighbors)
            .filter(|(node, _)| node.radius > 0.0)
            .map(|(node, neighbors)| SkeletonJunction {
                point: node.point,
                priority: node.radius,
                neighbors,
            })
            .collect();

        if junctions.is_empty() {
            return Err(OracleError::Empty);
        }
        Ok(junctions)
    }
}

#[derive(Debug, Clone, Copy)]
struct FrontNode {
    point: Point2<f64>,
    radius: f64,
}

#[derive(Debug, Default)]
struct Front {
    nodes: Vec<FrontNode>,
    edges: Vec<(usize, usize)>,
}

impl Front {
    fn push(&mut self, point: Point2<f64>, radius: f64) -> usize {
        self.nodes.push(FrontNode { point, radius });
        self.nodes.len() - 1
    }

    fn join(&mut self, tracked: &[usize], point: Point2<f64>, radius: f64) {
        let center = self.push(point, radius);
        for &idx in tracked {
            self.edges.push((idx.min(center), idx.max(center)));
        }
    }
}

/// Wavefront propagation over a CCW loop.
fn propagate(vertices: &[Point2<f64>], step: f64, max_iterations: usize) -> Front {
    let mut front = Front::default();

    let mut current = vertices.to_vec();
    let mut tracked: Vec<usize> = vertices.iter().map(|&v| front.push(v, 0.0)).collect();
    let mut offset = 0.0;
    let mut joined = false;

    for _ in 0..max_iterations {
        // A front smaller than a few steps would overshoot its own center.
        if polygon_signed_area(&current) <= 4.0 * step * step {
            break;
        }

        let bisectors = vertex_bisectors(&current);
        let mut next: Vec<Point2<f64>> = current
            .iter()
            .zip(&bisectors)
            .map(|(&p, &b)| p + b * step)
            .collect();
        offset += step;

        if next.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
            break;
        }

        let n = next.len();
        let collapse = (0..n)
            .map(|i| (i, next[i].distance(next[(i + 1) % n])))
            .filter(|&(_, len)| len < step * 0.5)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i);

        if let Some(ci) = collapse {
            let ni = (ci + 1) % n;
            let point = next[ci].midpoint(next[ni]);
            let node = front.push(point, offset);
            front.edges.push((tracked[ci], node));
            front.edges.push((tracked[ni], node));

            next.remove(ni);
            tracked.remove(ni);
            let keep = if ni < ci { ci - 1 } else { ci };
            next[keep] = point;
            tracked[keep] = node;
        }

        if next.len() < 3 {
            if let Some(center) = vertex_average(&next) {
                front.join(&tracked, center, offset);
            }
            joined = true;
            break;
        }

        current = next;
    }

    if !joined {
        if let Some(center) = vertex_average(&current) {
            front.join(&tracked, center, offset);
        }
    }

    front.edges.sort_unstable();
    front.edges.dedup();
    front
}

/// Computes inward bisector directions for each vertex of a CCW loop.
fn vertex_bisectors(vertices: &[Point2<f64>]) -> Vec<Vec2<f64>> {
    let n = vertices.len();
    (0..n)
        .map(|i| {
            let prev = vertices[(i + n - 1) % n];
            let next = vertices[(i + 1) % n];
            let d1 = (vertices[i] - prev).normalize().unwrap_or_default();
            let d2 = (next - vertices[i]).normalize().unwrap_or_default();

            // Inward normals of a CCW loop point to the left of travel.
            let inward = Vec2::new(-d1.y, d1.x) + Vec2::new(-d2.y, d2.x);
            inward.normalize().unwrap_or_default()
        })
        .collect()
}
