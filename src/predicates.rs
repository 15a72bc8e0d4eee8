use crate::shape::Point;
use robust::{incircle, orient2d, Coord};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Orientation {
    /// Clock wise
    CW,
    /// Counter clock wise
    CCW,
    /// All three on one line
    Collinear,
}

impl Orientation {
    pub fn is_cw(&self) -> bool {
        matches!(self, Self::CW)
    }

    pub fn is_ccw(&self) -> bool {
        matches!(self, Self::CCW)
    }

    pub fn is_collinear(&self) -> bool {
        matches!(self, Self::Collinear)
    }
}

fn coord(p: Point) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

/// Exact orientation of c relative to the directed line a -> b.
pub fn orient_2d(a: Point, b: Point, c: Point) -> Orientation {
    let det = orient2d(coord(a), coord(b), coord(c));
    if det > 0. {
        Orientation::CCW
    } else if det < 0. {
        Orientation::CW
    } else {
        Orientation::Collinear
    }
}

/// Whether d lies strictly inside the circumcircle of the counter-clockwise
/// triangle (a, b, c). Exact sign via the robust incircle predicate.
pub fn in_circle(a: Point, b: Point, c: Point, d: Point) -> bool {
    incircle(coord(a), coord(b), coord(c), coord(d)) > 0.
}

/// How two closed segments relate to each other.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SegmentRelation {
    Disjoint,
    /// Interiors cross at a single point.
    Crossing,
    /// An endpoint of one lies on the other (including endpoint-endpoint
    /// contact).
    Touching,
    /// Collinear with a shared stretch longer than a point.
    Overlapping,
}

/// Classify the intersection of segments (a, b) and (c, d).
pub fn segment_relation(a: Point, b: Point, c: Point, d: Point) -> SegmentRelation {
    let d1 = orient2d(coord(c), coord(d), coord(a));
    let d2 = orient2d(coord(c), coord(d), coord(b));
    let d3 = orient2d(coord(a), coord(b), coord(c));
    let d4 = orient2d(coord(a), coord(b), coord(d));

    if ((d1 > 0. && d2 < 0.) || (d1 < 0. && d2 > 0.))
        && ((d3 > 0. && d4 < 0.) || (d3 < 0. && d4 > 0.))
    {
        return SegmentRelation::Crossing;
    }

    if d1 == 0. && d2 == 0. && d3 == 0. && d4 == 0. {
        // all four collinear, compare 1D intervals along the longer axis
        let use_x = (b.x - a.x).abs().max((d.x - c.x).abs())
            >= (b.y - a.y).abs().max((d.y - c.y).abs());
        let proj = |p: Point| if use_x { p.x } else { p.y };
        let (lo1, hi1) = min_max(proj(a), proj(b));
        let (lo2, hi2) = min_max(proj(c), proj(d));
        let lo = lo1.max(lo2);
        let hi = hi1.min(hi2);
        return if lo > hi {
            SegmentRelation::Disjoint
        } else if lo == hi {
            SegmentRelation::Touching
        } else {
            SegmentRelation::Overlapping
        };
    }

    if d1 == 0. && on_segment(c, d, a)
        || d2 == 0. && on_segment(c, d, b)
        || d3 == 0. && on_segment(a, b, c)
        || d4 == 0. && on_segment(a, b, d)
    {
        return SegmentRelation::Touching;
    }

    SegmentRelation::Disjoint
}

fn min_max(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// p is known collinear with (a, b); is it within the closed segment?
fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Circumcenter of (a, b, c) in the plane, `None` when the points are
/// (numerically) collinear. z is averaged from the corners.
pub fn circumcenter(a: Point, b: Point, c: Point) -> Option<Point> {
    let bx = b.x - a.x;
    let by = b.y - a.y;
    let cx = c.x - a.x;
    let cy = c.y - a.y;
    let d = 2. * (bx * cy - by * cx);
    if d == 0. {
        return None;
    }
    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;
    let ux = (cy * b2 - by * c2) / d;
    let uy = (bx * c2 - cx * b2) / d;
    if !ux.is_finite() || !uy.is_finite() {
        return None;
    }
    Some(Point::with_z(
        a.x + ux,
        a.y + uy,
        (a.z + b.z + c.z) / 3.,
    ))
}

/// Whether p lies strictly inside the diametral circle of segment (a, b),
/// the smallest circle containing the segment.
pub fn encroaches(a: Point, b: Point, p: Point) -> bool {
    let mx = (a.x + b.x) * 0.5;
    let my = (a.y + b.y) * 0.5;
    let dx = p.x - mx;
    let dy = p.y - my;
    dx * dx + dy * dy < a.distance_squared(&b) * 0.25
}

/// Even-odd point-in-polygon over a loop's vertex list (no closing
/// duplicate). Points on the boundary are classified arbitrarily; callers
/// pass region-interior probes (triangle centroids), never boundary points.
pub fn point_in_loop(p: Point, polygon: &[Point]) -> bool {
    let n = polygon.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = polygon[i];
        let pj = polygon[j];
        if (pi.y > p.y) != (pj.y > p.y) {
            let x_cross = pi.x + (p.y - pi.y) / (pj.y - pi.y) * (pj.x - pi.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Smallest interior angle of triangle (a, b, c), in degrees.
pub fn smallest_angle_deg(a: Point, b: Point, c: Point) -> f64 {
    let la = b.distance_squared(&c).sqrt();
    let lb = a.distance_squared(&c).sqrt();
    let lc = a.distance_squared(&b).sqrt();
    let angle = |opp: f64, s1: f64, s2: f64| -> f64 {
        let cos = ((s1 * s1 + s2 * s2 - opp * opp) / (2. * s1 * s2)).clamp(-1., 1.);
        cos.acos().to_degrees()
    };
    angle(la, lb, lc)
        .min(angle(lb, la, lc))
        .min(angle(lc, la, lb))
}
