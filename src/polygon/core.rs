//! Area, centroid and winding of closed point loops.
//!
//! Loops are implicitly closed: the last vertex connects to the first.

use crate::primitives::Point2;
use num_traits::Float;

/// Consecutive vertex pairs of a closed loop, ending with `(last, first)`.
fn loop_edges<F: Float>(vertices: &[Point2<F>]) -> impl Iterator<Item = (Point2<F>, Point2<F>)> + '_ {
    vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .map(|(&a, &b)| (a, b))
}

/// Shoelace area; positive for counter-clockwise loops.
///
/// Loops with fewer than three vertices have zero area.
pub fn polygon_signed_area<F: Float>(vertices: &[Point2<F>]) -> F {
    if vertices.len() < 3 {
        return F::zero();
    }
    let twice = loop_edges(vertices).fold(F::zero(), |acc, (a, b)| acc + (a.x * b.y - b.x * a.y));
    twice / (F::one() + F::one())
}

/// Unsigned shoelace area.
pub fn polygon_area<F: Float>(vertices: &[Point2<F>]) -> F {
    polygon_signed_area(vertices).abs()
}

/// Returns true if the loop winds clockwise (negative signed area).
pub fn is_clockwise<F: Float>(vertices: &[Point2<F>]) -> bool {
    polygon_signed_area(vertices) < F::zero()
}

/// Reverses the loop in place if it winds clockwise.
pub fn ensure_ccw<F: Float>(vertices: &mut [Point2<F>]) {
    if is_clockwise(vertices) {
        vertices.reverse();
    }
}

/// Reverses the loop in place if it winds counter-clockwise.
pub fn ensure_cw<F: Float>(vertices: &mut [Point2<F>]) {
    if polygon_signed_area(vertices) > F::zero() {
        vertices.reverse();
    }
}

/// Arithmetic mean of the vertices.
///
/// Returns None for an empty slice.
pub fn vertex_average<F: Float>(vertices: &[Point2<F>]) -> Option<Point2<F>> {
    let n = F::from(vertices.len())?;
    if vertices.is_empty() {
        return None;
    }

    let (sx, sy) = vertices
        .iter()
        .fold((F::zero(), F::zero()), |(sx, sy), v| (sx + v.x, sy + v.y));
    Some(Point2::new(sx / n, sy / n))
}

/// Area-weighted centroid, or `None` when the loop has no area.
pub fn polygon_centroid<F: Float>(vertices: &[Point2<F>]) -> Option<Point2<F>> {
    if vertices.len() < 3 {
        return None;
    }

    let area = polygon_signed_area(vertices);
    if area.abs() < F::epsilon() {
        return None;
    }

    let (cx, cy) = loop_edges(vertices).fold((F::zero(), F::zero()), |(cx, cy), (a, b)| {
        let w = a.x * b.y - b.x * a.y;
        (cx + (a.x + b.x) * w, cy + (a.y + b.y) * w)
    });
    let scale = F::from(6.0)? * area;
    Some(Point2::new(cx / scale, cy / scale))
}

/// Even-odd containment test by horizontal ray crossing.
///
/// Points exactly on the boundary may be reported either way.
pub fn polygon_contains<F: Float>(vertices: &[Point2<F>], point: Point2<F>) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    loop_edges(vertices)
        .filter(|&(a, b)| {
            (a.y > point.y) != (b.y > point.y)
                && point.x < a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y)
        })
        .count()
        % 2
        == 1
}

/// Axis-aligned `(min, max)` corners, or `None` for an empty slice.
pub fn bounding_box<F: Float>(vertices: &[Point2<F>]) -> Option<(Point2<F>, Point2<F>)> {
    let first = *vertices.first()?;
    Some(vertices[1..].iter().fold((first, first), |(min, max), v| {
        (
            Point2::new(min.x.min(v.x), min.y.min(v.y)),
            Point2::new(max.x.max(v.x), max.y.max(v.y)),
        )
    }))
}
