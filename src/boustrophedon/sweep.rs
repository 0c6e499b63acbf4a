//! Sweep-line event classification and split/merge surgery.
//!
//! The sweep runs along +x over a graph that has already been rotated into
//! the sweep frame. Points are ordered lexicographically by `(x, y)`, which
//! behaves like a sweep line tilted by an infinitesimal angle: a neighbor
//! directly above a vertex counts as ahead of it. This keeps axis-aligned
//! edges classifiable.
//!
//! At every split or merge vertex two probes run perpendicular to the sweep
//! and connect the vertex to the nearest boundary above and below with a
//! bridge pair, splitting the boundary edge that was hit when needed.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::boundary::{BoundaryGraph, EdgeRole, VertexId};
use crate::error::{DecompositionError, ProbeDirection};
use crate::primitives::{Point2, Vec2};

/// Kind of event a vertex produces when the sweep line reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Event {
    /// A new cell starts.
    Open,
    /// The last open cell ends.
    Close,
    /// An obstacle starts and divides the current cell in two.
    Split,
    /// An obstacle ends and two cells join.
    Merge,
    /// The boundary bends without changing the cell structure.
    Inflection,
}

impl Event {
    /// Every event except [`Event::Inflection`] changes the cell structure.
    #[inline]
    pub fn is_critical(self) -> bool {
        !matches!(self, Self::Inflection)
    }
}

/// A classified vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepEvent {
    pub vertex: VertexId,
    pub event: Event,
}

/// Result of a sweep.
#[derive(Debug, Clone, Default)]
pub struct Sweep {
    /// One event per original vertex, in sweep order.
    pub events: Vec<SweepEvent>,
    /// Critical vertices and bridge origins; every cell touches one of them.
    pub seeds: BTreeSet<VertexId>,
}

impl Sweep {
    /// Number of events of the given kind.
    pub fn count(&self, event: Event) -> usize {
        self.events.iter().filter(|e| e.event == event).count()
    }
}

/// Compares two points in sweep order.
#[inline]
pub fn sweep_order(a: Point2<f64>, b: Point2<f64>) -> Ordering {
    cmp_f64(a.x, b.x).then_with(|| cmp_f64(a.y, b.y))
}

#[inline]
fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Classifies a vertex against its boundary neighbors.
///
/// Fails when the vertex has no boundary neighbor on either side or when a
/// neighbor coincides with it in sweep order.
pub fn classify(graph: &BoundaryGraph, vertex: VertexId) -> Result<Event, DecompositionError> {
    let error = || DecompositionError::EventClassification { vertex };
    let pred = graph.boundary_predecessor(vertex).ok_or_else(error)?;
    let succ = graph.boundary_successor(vertex).ok_or_else(error)?;

    let (v, p, s) = (graph.point(vertex), graph.point(pred), graph.point(succ));
    let before = |other: Point2<f64>| match sweep_order(other, v) {
        Ordering::Less => Ok(true),
        Ordering::Greater => Ok(false),
        Ordering::Equal => Err(error()),
    };
    let pred_before = before(p)?;
    let succ_before = before(s)?;
    let above = (v - p).cross(v - s) >= 0.0;

    Ok(match (pred_before, succ_before, above) {
        (false, false, true) => Event::Open,
        (false, false, false) => Event::Split,
        (true, true, true) => Event::Close,
        (true, true, false) => Event::Merge,
        _ => Event::Inflection,
    })
}

/// Classifies every original vertex in sweep order and performs bridge
/// surgery at split and merge vertices.
///
/// The event queue is fixed before any mutation, so vertices created by edge
/// splits never become events themselves.
pub fn line_sweep(graph: &mut BoundaryGraph, snap_eps: f64) -> Result<Sweep, DecompositionError> {
    let mut queue: Vec<VertexId> = (0..graph.vertex_count()).collect();
    queue.sort_by(|&a, &b| sweep_order(graph.point(a), graph.point(b)).then(a.cmp(&b)));

    let mut sweep = Sweep::default();
    for vertex in queue {
        let event = classify(graph, vertex)?;
        if matches!(event, Event::Split | Event::Merge) {
            for direction in [ProbeDirection::Above, ProbeDirection::Below] {
                probe(graph, vertex, direction, snap_eps, &mut sweep.seeds)?;
            }
        }
        if event.is_critical() {
            sweep.seeds.insert(vertex);
        }
        sweep.events.push(SweepEvent { vertex, event });
    }

    log::debug!(
        "sweep: {} open, {} close, {} split, {} merge, {} bridges",
        sweep.count(Event::Open),
        sweep.count(Event::Close),
        sweep.count(Event::Split),
        sweep.count(Event::Merge),
        graph.bridges().count() / 2
    );
    Ok(sweep)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Hit {
    Vertex(VertexId),
    Edge {
        from: VertexId,
        to: VertexId,
        point: Point2<f64>,
    },
}

impl Hit {
    // Vertices win ties against edges.
    fn rank(&self) -> (u8, VertexId) {
        match *self {
            Self::Vertex(id) => (0, id),
            Self::Edge { from, .. } => (1, from),
        }
    }
}

fn probe(
    graph: &mut BoundaryGraph,
    start: VertexId,
    direction: ProbeDirection,
    eps: f64,
    seeds: &mut BTreeSet<VertexId>,
) -> Result<(), DecompositionError> {
    let unbounded = DecompositionError::UnboundedSweepProbe {
        vertex: start,
        direction,
    };

    let mut origin = start;
    for _ in 0..=graph.vertex_count() {
        let hit = nearest_hit(graph, origin, direction, eps).ok_or_else(|| unbounded.clone())?;
        let target = match hit {
            Hit::Edge { from, to, point } => graph.split_edge(from, to, point),
            Hit::Vertex(w) if is_boundary_neighbor(graph, origin, w) => {
                // The probe runs along a boundary edge; no bridge is needed
                // for it, but the probe may carry on past its far end.
                if points_into_interior(graph, w, direction) {
                    origin = w;
                    continue;
                }
                return Ok(());
            }
            Hit::Vertex(w) => w,
        };

        if !graph.has_edge_between(origin, target) {
            add_bridge(graph, origin, target, direction);
            seeds.insert(origin);
        }
        return Ok(());
    }
    Err(unbounded)
}

fn nearest_hit(
    graph: &BoundaryGraph,
    origin: VertexId,
    direction: ProbeDirection,
    eps: f64,
) -> Option<Hit> {
    let o = graph.point(origin);
    let sign = match direction {
        ProbeDirection::Above => 1.0,
        ProbeDirection::Below => -1.0,
    };

    let mut hits = Vec::new();
    for (id, vertex) in graph.vertices() {
        let p = vertex.point;
        if id != origin && (p.x - o.x).abs() <= eps {
            hits.push(((p.y - o.y) * sign, Hit::Vertex(id)));
        }
    }

    for ((from, to), role) in graph.edges() {
        if role != EdgeRole::Boundary || from == origin || to == origin {
            continue;
        }
        let (a, b) = (graph.point(from), graph.point(to));
        let (oa, ob) = (sweep_order(a, o), sweep_order(b, o));
        if oa == Ordering::Equal || ob == Ordering::Equal || oa == ob || a.x == b.x {
            continue;
        }

        let t = (o.x - a.x) / (b.x - a.x);
        let point = Point2::new(o.x, a.y + t * (b.y - a.y));
        let hit = if point.approx_eq(a, eps) {
            Hit::Vertex(from)
        } else if point.approx_eq(b, eps) {
            Hit::Vertex(to)
        } else {
            Hit::Edge { from, to, point }
        };
        hits.push(((point.y - o.y) * sign, hit));
    }

    hits.into_iter()
        .filter(|&(distance, _)| distance > eps)
        .min_by(|a, b| cmp_f64(a.0, b.0).then_with(|| a.1.rank().cmp(&b.1.rank())))
        .map(|(_, hit)| hit)
}

fn is_boundary_neighbor(graph: &BoundaryGraph, a: VertexId, b: VertexId) -> bool {
    graph.boundary_successor(a) == Some(b) || graph.boundary_predecessor(a) == Some(b)
}

/// Returns true if `direction` leaves `vertex` strictly into the region.
///
/// The interior lies clockwise from the outgoing boundary edge up to the
/// incoming one.
fn points_into_interior(graph: &BoundaryGraph, vertex: VertexId, direction: ProbeDirection) -> bool {
    let (Some(pred), Some(succ)) = (
        graph.boundary_predecessor(vertex),
        graph.boundary_successor(vertex),
    ) else {
        return false;
    };

    let u = graph.point(vertex);
    let d = match direction {
        ProbeDirection::Above => Vec2::new(0.0, 1.0),
        ProbeDirection::Below => Vec2::new(0.0, -1.0),
    };
    let d_out = graph.point(succ) - u;
    let d_back = graph.point(pred) - u;

    let turn = d_out.clockwise_angle_to(d);
    turn > 0.0 && turn < d_out.clockwise_angle_to(d_back)
}

fn add_bridge(graph: &mut BoundaryGraph, origin: VertexId, target: VertexId, direction: ProbeDirection) {
    log::trace!("bridge {origin} -> {target} ({direction})");
    match direction {
        ProbeDirection::Above => {
            graph.insert_edge(target, origin, EdgeRole::BridgeClose);
            graph.insert_edge(origin, target, EdgeRole::BridgeOpen);
        }
        ProbeDirection::Below => {
            graph.insert_edge(origin, target, EdgeRole::BridgeClose);
            graph.insert_edge(target, origin, EdgeRole::BridgeOpen);
        }
    }
}
