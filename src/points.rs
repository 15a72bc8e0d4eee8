use std::collections::HashMap;

use crate::error::MeshError;
use crate::shape::{Point, MERGE_EPS};

/// Underlying type for PointId. Id compares sit in hot paths (edge lookup,
/// neighbor checks), so the narrower the better.
type NumType = u32;

/// New type for a PSLG/mesh vertex index. Indices are stable once assigned
/// and never reused.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct PointId(pub(crate) NumType);

impl PointId {
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

/// Vertex store. Input vertices are merged within [`MERGE_EPS`] via a
/// quantized grid; Steiner points are appended unmerged (the triangulation
/// rejects coincident insertions by point location instead).
#[derive(Debug, Clone, Default)]
pub struct PointStore {
    points: Vec<Point>,
    grid: HashMap<(i64, i64), Vec<PointId>>,
}

impl PointStore {
    pub fn with_capacity(cap: usize) -> Result<Self, MeshError> {
        let mut points = Vec::new();
        points.try_reserve(cap)?;
        Ok(Self {
            points,
            grid: HashMap::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, id: PointId) -> Point {
        self.points[id.as_usize()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PointId, &Point)> {
        self.points
            .iter()
            .enumerate()
            .map(|(idx, p)| (PointId(idx as NumType), p))
    }

    fn cell(p: &Point) -> (i64, i64) {
        ((p.x / MERGE_EPS).floor() as i64, (p.y / MERGE_EPS).floor() as i64)
    }

    /// Insert with dedup: a point coinciding with an existing one returns
    /// the existing id and keeps the first-seen coordinate.
    pub fn insert_merged(&mut self, point: Point) -> PointId {
        let (cx, cy) = Self::cell(&point);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(ids) = self.grid.get(&(cx + dx, cy + dy)) {
                    for id in ids {
                        if self.points[id.as_usize()].coincides(&point) {
                            return *id;
                        }
                    }
                }
            }
        }

        let id = PointId(self.points.len() as NumType);
        self.points.push(point);
        self.grid.entry((cx, cy)).or_default().push(id);
        id
    }

    /// Append a refinement (Steiner) point without dedup.
    pub fn insert_steiner(&mut self, point: Point) -> PointId {
        let id = PointId(self.points.len() as NumType);
        self.points.push(point);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_within_tolerance() {
        let mut store = PointStore::default();
        let a = store.insert_merged(Point::new(1., 1.));
        let b = store.insert_merged(Point::new(1. + 1e-11, 1. - 1e-11));
        let c = store.insert_merged(Point::new(1. + 1e-3, 1.));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(store.len(), 2);

        // first-seen coordinate wins
        assert_eq!(store.get(a).x, 1.);
    }

    #[test]
    fn test_merge_across_cell_boundary() {
        let mut store = PointStore::default();
        // straddle a quantization boundary by less than the tolerance
        let a = store.insert_merged(Point::new(2e-9, 0.));
        let b = store.insert_merged(Point::new(2e-9 - 0.9e-9, 0.));
        assert_eq!(a, b);
    }

    #[test]
    fn test_steiner_not_merged() {
        let mut store = PointStore::default();
        let a = store.insert_merged(Point::new(0., 0.));
        let s = store.insert_steiner(Point::new(0., 0.));
        assert_ne!(a, s);
        assert_eq!(store.len(), 2);
    }
}
