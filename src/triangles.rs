use crate::points::PointId;

#[derive(Debug, Hash, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TriangleId(u32);

impl TriangleId {
    pub const INVALID: TriangleId = TriangleId(u32::MAX);

    pub fn invalid(&self) -> bool {
        self.0 == Self::INVALID.0
    }

    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

/// Per-edge attribute bits, stored per triangle side.
#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub struct EdgeFlags(u8);

impl std::fmt::Debug for EdgeFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgeFlags")
            .field("constrained", &self.is_constrained())
            .finish()
    }
}

impl EdgeFlags {
    const CONSTRAINED: u8 = 1;

    pub fn is_constrained(&self) -> bool {
        self.0 & Self::CONSTRAINED != 0
    }

    pub fn set_constrained(&mut self, val: bool) {
        if val {
            self.0 |= Self::CONSTRAINED;
        } else {
            self.0 &= !Self::CONSTRAINED;
        }
    }
}

/// Where a triangle sits relative to the input loops. Assigned by region
/// classification, inherited through refinement splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    #[default]
    Unclassified,
    /// Outside the outer loop (hull filler), never part of the result.
    Outside,
    /// Inside an odd number of hole loops.
    Hole,
    /// Meshed domain.
    Interior,
}

/// One triangulation face.
///
/// `vertices` are counter-clockwise. Edge `i` is the edge opposite
/// `vertices[i]`, running `vertices[i+1] -> vertices[i+2]` in ccw order;
/// `neighbors[i]` and `flags[i]` belong to that edge.
#[derive(Debug, Clone, Copy)]
pub struct TriangleData {
    pub vertices: [PointId; 3],
    pub neighbors: [TriangleId; 3],
    flags: [EdgeFlags; 3],
    pub region: Region,
}

impl TriangleData {
    pub fn new(a: PointId, b: PointId, c: PointId) -> Self {
        Self {
            vertices: [a, b, c],
            neighbors: [TriangleId::INVALID; 3],
            flags: [EdgeFlags::default(); 3],
            region: Region::Unclassified,
        }
    }

    pub fn vertex_index(&self, p: PointId) -> Option<usize> {
        self.vertices.iter().position(|v| *v == p)
    }

    /// Index of the edge with endpoints {p, q}, i.e. the index of the
    /// remaining vertex.
    pub fn edge_index(&self, p: PointId, q: PointId) -> Option<usize> {
        let pi = self.vertex_index(p)?;
        let qi = self.vertex_index(q)?;
        if pi == qi {
            return None;
        }
        Some(3 - pi - qi)
    }

    /// Edge `i` endpoints in ccw direction.
    pub fn edge_vertices(&self, i: usize) -> (PointId, PointId) {
        (self.vertices[(i + 1) % 3], self.vertices[(i + 2) % 3])
    }

    pub fn neighbor_index(&self, tid: TriangleId) -> Option<usize> {
        self.neighbors.iter().position(|n| *n == tid)
    }

    pub fn is_constrained(&self, edge: usize) -> bool {
        self.flags[edge].is_constrained()
    }

    pub fn set_constrained(&mut self, edge: usize, val: bool) {
        self.flags[edge].set_constrained(val);
    }

    pub fn flags(&self, edge: usize) -> EdgeFlags {
        self.flags[edge]
    }

    pub fn set_flags(&mut self, edge: usize, flags: EdgeFlags) {
        self.flags[edge] = flags;
    }
}

/// Triangle store. Append-only: flips rotate faces in place and splits
/// reuse the parent slot, so ids stay dense and are never reclaimed.
// For n vertices there are around 2n triangles, space stays O(n).
#[derive(Debug, Default)]
pub struct TriangleStore {
    triangles: Vec<TriangleData>,
}

impl TriangleStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn insert(&mut self, triangle: TriangleData) -> TriangleId {
        let id = TriangleId::from_index(self.triangles.len());
        self.triangles.push(triangle);
        id
    }

    pub fn get(&self, id: TriangleId) -> &TriangleData {
        &self.triangles[id.as_usize()]
    }

    /// Copy out; `TriangleData` is small and `Copy`, and a copy does not
    /// hold a borrow across mutations.
    pub fn data(&self, id: TriangleId) -> TriangleData {
        self.triangles[id.as_usize()]
    }

    pub fn get_mut(&mut self, id: TriangleId) -> &mut TriangleData {
        &mut self.triangles[id.as_usize()]
    }

    pub fn try_get(&self, id: TriangleId) -> Option<&TriangleData> {
        if id.invalid() {
            None
        } else {
            self.triangles.get(id.as_usize())
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (TriangleId, &TriangleData)> {
        self.triangles
            .iter()
            .enumerate()
            .map(|(idx, t)| (TriangleId::from_index(idx), t))
    }

    /// Make two triangles neighbors across their common edge, merging the
    /// constrained flag from both sides.
    pub fn mark_neighbor(&mut self, left: TriangleId, right: TriangleId) {
        let lt = self.data(left);
        let rt = self.data(right);

        let mut common = None;
        for i in 0..3 {
            let (p, q) = lt.edge_vertices(i);
            if let Some(j) = rt.edge_index(p, q) {
                common = Some((i, j));
                break;
            }
        }
        let Some((li, ri)) = common else {
            debug_assert!(false, "mark_neighbor on non-adjacent triangles");
            return;
        };

        let constrained = lt.is_constrained(li) || rt.is_constrained(ri);
        let t = self.get_mut(left);
        t.neighbors[li] = right;
        t.set_constrained(li, constrained);
        let t = self.get_mut(right);
        t.neighbors[ri] = left;
        t.set_constrained(ri, constrained);
    }

    /// Point the neighbor that used to face `old` at `new` instead. Used
    /// when a split hands one side of an edge to a new triangle.
    pub fn replace_neighbor(&mut self, of: TriangleId, old: TriangleId, new: TriangleId) {
        if of.invalid() {
            return;
        }
        let t = self.get_mut(of);
        if let Some(i) = t.neighbor_index(old) {
            t.neighbors[i] = new;
        } else {
            debug_assert!(false, "replace_neighbor: {old:?} not a neighbor of {of:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(i: u32) -> PointId {
        PointId(i)
    }

    #[test]
    fn test_edge_index() {
        let t = TriangleData::new(pid(0), pid(1), pid(2));
        assert_eq!(t.edge_index(pid(1), pid(2)), Some(0));
        assert_eq!(t.edge_index(pid(2), pid(1)), Some(0));
        assert_eq!(t.edge_index(pid(0), pid(2)), Some(1));
        assert_eq!(t.edge_index(pid(0), pid(1)), Some(2));
        assert_eq!(t.edge_index(pid(0), pid(5)), None);
        assert_eq!(t.edge_vertices(0), (pid(1), pid(2)));
        assert_eq!(t.edge_vertices(2), (pid(0), pid(1)));
    }

    #[test]
    fn test_mark_neighbor() {
        let mut triangles = TriangleStore::default();
        let t1 = triangles.insert(TriangleData::new(pid(0), pid(1), pid(2)));
        let t2 = triangles.insert(TriangleData::new(pid(2), pid(1), pid(3)));

        triangles.mark_neighbor(t1, t2);
        // shared edge {1, 2}: opposite vertex 0 in t1, opposite vertex 3 in t2
        assert_eq!(triangles.get(t1).neighbors[0], t2);
        assert_eq!(triangles.get(t2).neighbors[2], t1);
    }

    #[test]
    fn test_constrained_flag_merges() {
        let mut triangles = TriangleStore::default();
        let t1 = triangles.insert(TriangleData::new(pid(0), pid(1), pid(2)));
        let t2 = triangles.insert(TriangleData::new(pid(2), pid(1), pid(3)));
        triangles.get_mut(t1).set_constrained(0, true);

        triangles.mark_neighbor(t1, t2);
        assert!(triangles.get(t2).is_constrained(2));
    }

    #[test]
    fn test_edge_flags() {
        let mut flags = EdgeFlags::default();
        assert!(!flags.is_constrained());
        flags.set_constrained(true);
        assert!(flags.is_constrained());
        flags.set_constrained(false);
        assert!(!flags.is_constrained());
    }
}
