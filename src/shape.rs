use crate::error::MeshError;

/// Coordinate tolerance for loop closure and vertex dedup. Two points
/// closer than this are one PSLG vertex.
pub const MERGE_EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    /// Carried through untouched, the triangulation itself is planar.
    pub z: f64,
}

impl Default for Point {
    fn default() -> Self {
        Self {
            x: 0.,
            y: 0.,
            z: 0.,
        }
    }
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0. }
    }

    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Planar coincidence within [`MERGE_EPS`]; z plays no role in identity.
    pub fn coincides(&self, other: &Self) -> bool {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy <= MERGE_EPS * MERGE_EPS
    }

    pub fn distance_squared(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Which part a loop plays in the PSLG. Holes carve regions out of the
/// result, building loops only force their edges through the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopRole {
    Outer,
    Hole,
    Building,
}

/// A closed polygon loop. `points` never stores the duplicate closing
/// point; closure is implied.
#[derive(Debug, Clone)]
pub struct Loop {
    points: Vec<Point>,
    role: LoopRole,
}

impl Loop {
    /// Accepts either an explicitly closed polyline (first == last within
    /// tolerance, the duplicate is stripped) or an open one (closed
    /// implicitly). Fails with `InvalidInput` for an empty polyline or one
    /// with fewer than 3 distinct vertices.
    pub fn new(polyline: Vec<Point>, role: LoopRole) -> Result<Self, MeshError> {
        if polyline.is_empty() {
            return Err(MeshError::InvalidInput(format!(
                "{} loop is empty",
                role_name(role)
            )));
        }

        let mut points = polyline;
        if points.len() > 1 {
            let first = points[0];
            let last = *points.last().unwrap();
            if first.coincides(&last) {
                points.pop();
            }
        }

        // count vertices distinct under the merge tolerance
        let mut distinct = 0usize;
        'next_point: for (i, p) in points.iter().enumerate() {
            for q in &points[..i] {
                if p.coincides(q) {
                    continue 'next_point;
                }
            }
            distinct += 1;
        }
        if distinct < 3 {
            return Err(MeshError::InvalidInput(format!(
                "{} loop has {} distinct vertices, need at least 3",
                role_name(role),
                distinct
            )));
        }

        Ok(Self { points, role })
    }

    pub fn role(&self) -> LoopRole {
        self.role
    }

    /// Loop vertices without the closing duplicate.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Signed area via the shoelace formula, positive for counter-clockwise
    /// winding. Only the planar coordinates participate.
    pub fn signed_area(&self) -> f64 {
        let pts = &self.points;
        let n = pts.len();
        let mut acc = 0.;
        for i in 0..n {
            let j = (i + 1) % n;
            acc += pts[i].x * pts[j].y - pts[j].x * pts[i].y;
        }
        acc * 0.5
    }
}

fn role_name(role: LoopRole) -> &'static str {
    match role {
        LoopRole::Outer => "outer",
        LoopRole::Hole => "hole",
        LoopRole::Building => "building",
    }
}
