use crate::error::MeshError;
use crate::points::{PointId, PointStore};
use crate::predicates::{in_circle, orient_2d, Orientation};
use crate::shape::Point;
use crate::triangles::{TriangleData, TriangleId, TriangleStore};

/// Result of walking the triangulation toward a target point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locate {
    /// Target coincides with an existing vertex.
    Vertex(PointId),
    /// Target lies on the given edge of the triangle.
    Edge(TriangleId, usize),
    /// Target lies strictly inside the triangle.
    Face(TriangleId),
    /// Walk left the convex hull.
    Outside,
    /// Walk would have to cross this constrained edge (only reported when
    /// asked to stop at constraints).
    Blocked(TriangleId, usize),
}

/// The live triangulation: vertex coordinates, faces with adjacency, and
/// one incident face per vertex for star walks. Built unconstrained, then
/// mutated in place by constraint enforcement and refinement.
pub struct TriMesh {
    pub points: PointStore,
    pub triangles: TriangleStore,
    vertex_tri: Vec<TriangleId>,
}

impl TriMesh {
    /// Incremental Delaunay construction. Points are inserted in
    /// lexicographic (x, y) order, so every new point lies outside the
    /// hull of its predecessors and attaches as a fan over the visible
    /// hull chain, followed by flip legalization.
    pub fn build(points: PointStore) -> Result<Self, MeshError> {
        let n = points.len();
        if n < 3 {
            return Err(MeshError::DegenerateGeometry);
        }

        let mut mesh = Self {
            vertex_tri: vec![TriangleId::INVALID; n],
            triangles: TriangleStore::with_capacity(2 * n),
            points,
        };

        let mut order: Vec<PointId> = mesh.points.iter().map(|(id, _)| id).collect();
        order.sort_by(|a, b| {
            let pa = mesh.points.get(*a);
            let pb = mesh.points.get(*b);
            pa.x.total_cmp(&pb.x).then(pa.y.total_cmp(&pb.y))
        });

        // leading run of collinear points forms a chain that the first
        // off-line point fans out to
        let mut chain = vec![order[0], order[1]];
        let mut rest = 2;
        while rest < n {
            let p = order[rest];
            if orient_2d(
                mesh.points.get(chain[0]),
                mesh.points.get(chain[1]),
                mesh.points.get(p),
            )
            .is_collinear()
            {
                chain.push(p);
                rest += 1;
            } else {
                break;
            }
        }
        if rest == n {
            return Err(MeshError::DegenerateGeometry);
        }

        let mut hull = Hull::new(n);
        mesh.seed_fan(&chain, order[rest], &mut hull);
        for &p in &order[rest + 1..] {
            mesh.add_hull_point(p, &mut hull);
        }
        Ok(mesh)
    }

    /// Fan the seed point out to every chain segment and initialize the
    /// hull ring.
    fn seed_fan(&mut self, chain: &[PointId], apex: PointId, hull: &mut Hull) {
        let ccw = orient_2d(
            self.points.get(chain[0]),
            self.points.get(chain[1]),
            self.points.get(apex),
        )
        .is_ccw();

        let mut fan = Vec::with_capacity(chain.len() - 1);
        for w in chain.windows(2) {
            let tri = if ccw {
                TriangleData::new(w[0], w[1], apex)
            } else {
                TriangleData::new(w[1], w[0], apex)
            };
            let tid = self.triangles.insert(tri);
            self.note(tid);
            fan.push(tid);
        }
        for w in fan.windows(2) {
            self.triangles.mark_neighbor(w[0], w[1]);
        }

        // ccw hull ring: chain order when apex is left of it, reversed
        // otherwise, with the apex closing the ring
        let ring: Vec<PointId> = if ccw {
            chain.iter().copied().chain([apex]).collect()
        } else {
            chain.iter().rev().copied().chain([apex]).collect()
        };
        let rl = ring.len();
        for (i, &v) in ring.iter().enumerate() {
            let next = ring[(i + 1) % rl];
            let prev = ring[(i + rl - 1) % rl];
            // face inside edge (v -> next)
            let tri = if i < fan.len() {
                // chain edge, in ring order (reversed when the apex sits
                // on the clockwise side)
                if ccw {
                    fan[i]
                } else {
                    fan[fan.len() - 1 - i]
                }
            } else if i == fan.len() {
                // edge (last chain endpoint in ring order -> apex)
                if ccw {
                    *fan.last().unwrap()
                } else {
                    fan[0]
                }
            } else {
                // closing edge (apex -> ring[0])
                if ccw {
                    fan[0]
                } else {
                    *fan.last().unwrap()
                }
            };
            hull.link(v, next, prev, tri);
        }
        hull.start = apex;
    }

    /// Attach a point that is lexicographically beyond every inserted one:
    /// fan over the contiguous visible hull chain, then legalize.
    fn add_hull_point(&mut self, p: PointId, hull: &mut Hull) {
        let pp = self.points.get(p);

        // gather the ring once; inputs are modest and the ring is short
        let mut ring = Vec::with_capacity(64);
        let mut v = hull.start;
        loop {
            ring.push(v);
            v = hull.next(v);
            if v == hull.start {
                break;
            }
        }
        let len = ring.len();
        let visible = |k: usize| -> bool {
            let a = ring[k];
            let b = ring[(k + 1) % len];
            orient_2d(self.points.get(a), self.points.get(b), pp).is_cw()
        };

        // rotate to the start of the (cyclically contiguous) visible run
        let mut first = None;
        for k in 0..len {
            let prev = (k + len - 1) % len;
            if visible(k) && !visible(prev) {
                first = Some(k);
                break;
            }
        }
        let first = first.expect("new lexicographic point must see part of the hull");

        let mut wall = vec![ring[first]];
        let mut k = first;
        while visible(k) {
            wall.push(ring[(k + 1) % len]);
            k = (k + 1) % len;
        }

        // one new face per visible edge, chained together
        let mut fresh = Vec::with_capacity(wall.len());
        let mut prev_tid = TriangleId::INVALID;
        let mut first_tid = TriangleId::INVALID;
        for w in wall.windows(2) {
            let (u, v) = (w[0], w[1]);
            let tid = self.triangles.insert(TriangleData::new(v, u, p));
            self.note(tid);
            self.triangles.mark_neighbor(tid, hull.edge_tri[u.as_usize()]);
            if prev_tid.invalid() {
                first_tid = tid;
            } else {
                self.triangles.mark_neighbor(tid, prev_tid);
            }
            fresh.push(tid);
            prev_tid = tid;
        }

        // shrink the hull: interior wall vertices drop out, p bridges the ends
        for w in &wall[1..wall.len() - 1] {
            hull.unlink(*w);
        }
        let (w_first, w_last) = (wall[0], *wall.last().unwrap());
        hull.splice(w_first, p, w_last);
        hull.edge_tri[w_first.as_usize()] = first_tid;
        hull.edge_tri[p.as_usize()] = prev_tid;
        hull.start = p;

        self.legalize(fresh);
    }

    /// Record `tid` as the incident triangle of all its vertices.
    fn note(&mut self, tid: TriangleId) {
        let t = self.triangles.data(tid);
        for v in t.vertices {
            self.vertex_tri[v.as_usize()] = tid;
        }
    }

    pub fn point(&self, id: PointId) -> Point {
        self.points.get(id)
    }

    /// Append a Steiner point; the caller must follow up with a face or
    /// edge split so the vertex actually joins the triangulation.
    pub fn add_steiner_vertex(&mut self, p: Point) -> PointId {
        let id = self.points.insert_steiner(p);
        self.vertex_tri.push(TriangleId::INVALID);
        id
    }

    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    /// Restore the local Delaunay property by flipping, starting from the
    /// given faces. Constrained edges are never flipped.
    pub fn legalize(&mut self, mut stack: Vec<TriangleId>) {
        while let Some(tid) = stack.pop() {
            let mut edge = 0;
            while edge < 3 {
                let t = self.triangles.data(tid);
                if t.is_constrained(edge) || t.neighbors[edge].invalid() {
                    edge += 1;
                    continue;
                }
                let n_id = t.neighbors[edge];
                let nt = self.triangles.data(n_id);
                let (p, q) = t.edge_vertices(edge);
                let j = nt
                    .edge_index(p, q)
                    .expect("neighbor does not share the edge");
                let d = nt.vertices[j];

                let illegal = in_circle(
                    self.points.get(t.vertices[edge]),
                    self.points.get(p),
                    self.points.get(q),
                    self.points.get(d),
                );
                if illegal {
                    self.flip(tid, edge);
                    stack.push(n_id);
                    // rescan this face from its first edge, it changed
                    edge = 0;
                    continue;
                }
                edge += 1;
            }
        }
    }

    /// Flip the edge `i` of `tid` with its neighbor. The caller guarantees
    /// the shared quad is strictly convex (true whenever the edge fails
    /// the in-circle test). Returns the two face ids, now holding the
    /// flipped pair.
    pub fn flip(&mut self, tid: TriangleId, i: usize) -> (TriangleId, TriangleId) {
        let t = self.triangles.data(tid);
        let n_id = t.neighbors[i];
        debug_assert!(!n_id.invalid());
        let nt = self.triangles.data(n_id);

        let a = t.vertices[i];
        let (p, q) = t.edge_vertices(i);
        let j = nt.edge_index(p, q).expect("flip: not adjacent");
        let d = nt.vertices[j];

        // quad (a, p, d, q) is ccw; diagonal a-d replaces p-q
        let t_qa = t.neighbors[(i + 1) % 3];
        let t_ap = t.neighbors[(i + 2) % 3];
        let f_qa = t.flags((i + 1) % 3);
        let f_ap = t.flags((i + 2) % 3);

        let n_pd = nt.neighbors[nt.vertex_index(q).unwrap()];
        let n_dq = nt.neighbors[nt.vertex_index(p).unwrap()];
        let f_pd = nt.flags(nt.vertex_index(q).unwrap());
        let f_dq = nt.flags(nt.vertex_index(p).unwrap());

        let mut new_t = TriangleData::new(a, p, d);
        new_t.neighbors = [n_pd, n_id, t_ap];
        new_t.set_flags(0, f_pd);
        new_t.set_flags(2, f_ap);
        new_t.region = t.region;

        let mut new_n = TriangleData::new(a, d, q);
        new_n.neighbors = [n_dq, t_qa, tid];
        new_n.set_flags(0, f_dq);
        new_n.set_flags(1, f_qa);
        new_n.region = nt.region;

        *self.triangles.get_mut(tid) = new_t;
        *self.triangles.get_mut(n_id) = new_n;

        self.triangles.replace_neighbor(n_pd, n_id, tid);
        self.triangles.replace_neighbor(t_qa, tid, n_id);
        self.note(tid);
        self.note(n_id);
        (tid, n_id)
    }

    /// Walk from `hint` toward `target`.
    pub fn locate(&self, target: Point, hint: TriangleId, stop_at_constrained: bool) -> Locate {
        let mut cur = hint;
        let mut prev = TriangleId::INVALID;
        let cap = 4 * self.triangles.len() + 16;

        for _ in 0..cap {
            let t = self.triangles.data(cur);

            for &v in &t.vertices {
                if self.points.get(v).coincides(&target) {
                    return Locate::Vertex(v);
                }
            }

            let mut cross = None;
            let mut collinear_edge = None;
            for i in 0..3 {
                let (p, q) = t.edge_vertices(i);
                match orient_2d(self.points.get(p), self.points.get(q), target) {
                    Orientation::CW => {
                        // prefer an exit that does not bounce straight back
                        if cross.is_none() || t.neighbors[i] != prev {
                            cross = Some(i);
                        }
                    }
                    Orientation::Collinear => collinear_edge = Some(i),
                    Orientation::CCW => {}
                }
            }

            match cross {
                Some(i) => {
                    if stop_at_constrained && t.is_constrained(i) {
                        return Locate::Blocked(cur, i);
                    }
                    let next = t.neighbors[i];
                    if next.invalid() {
                        return Locate::Outside;
                    }
                    prev = cur;
                    cur = next;
                }
                None => {
                    return match collinear_edge {
                        Some(i) => Locate::Edge(cur, i),
                        None => Locate::Face(cur),
                    };
                }
            }
        }
        // walk failed to settle (degenerate wandering); report outside so
        // callers skip the insertion instead of looping
        Locate::Outside
    }

    /// 1-to-3 split of a face by an interior point. Returns the three
    /// resulting faces (first reuses `tid`).
    pub fn split_face(&mut self, tid: TriangleId, m: PointId) -> [TriangleId; 3] {
        let t = self.triangles.data(tid);
        let [a, b, c] = t.vertices;
        let [n_a, n_b, n_c] = t.neighbors;
        let (f_a, f_b, f_c) = (t.flags(0), t.flags(1), t.flags(2));

        let mut t0 = TriangleData::new(a, b, m);
        let mut t1 = TriangleData::new(b, c, m);
        let mut t2 = TriangleData::new(c, a, m);
        t0.region = t.region;
        t1.region = t.region;
        t2.region = t.region;

        let id0 = tid;
        let id1 = TriangleId::from_index(self.triangles.len());
        let id2 = TriangleId::from_index(self.triangles.len() + 1);

        t0.neighbors = [id1, id2, n_c];
        t0.set_flags(2, f_c);
        t1.neighbors = [id2, id0, n_a];
        t1.set_flags(2, f_a);
        t2.neighbors = [id0, id1, n_b];
        t2.set_flags(2, f_b);

        *self.triangles.get_mut(id0) = t0;
        let got1 = self.triangles.insert(t1);
        let got2 = self.triangles.insert(t2);
        debug_assert_eq!(got1, id1);
        debug_assert_eq!(got2, id2);

        self.triangles.replace_neighbor(n_a, tid, id1);
        self.triangles.replace_neighbor(n_b, tid, id2);
        self.note(id0);
        self.note(id1);
        self.note(id2);
        [id0, id1, id2]
    }

    /// 2-to-4 (or 1-to-2 on the hull) split of edge `i` of `tid` by a
    /// point on that edge. Both halves keep the original edge flags, so a
    /// constrained edge stays constrained through subdivision. Returns the
    /// faces to legalize from.
    pub fn split_edge(&mut self, tid: TriangleId, i: usize, m: PointId) -> Vec<TriangleId> {
        let t = self.triangles.data(tid);
        let c = t.vertices[i];
        let (p, q) = t.edge_vertices(i);
        let split_flags = t.flags(i);
        let n_p = t.neighbors[(i + 1) % 3];
        let n_q = t.neighbors[(i + 2) % 3];
        let f_p = t.flags((i + 1) % 3);
        let f_q = t.flags((i + 2) % 3);
        let u_id = t.neighbors[i];

        let id_ta = tid;
        let id_tb = TriangleId::from_index(self.triangles.len());

        let mut t_a = TriangleData::new(c, p, m);
        t_a.region = t.region;
        t_a.set_flags(0, split_flags);
        t_a.neighbors = [TriangleId::INVALID, id_tb, n_q];
        t_a.set_flags(2, f_q);

        let mut t_b = TriangleData::new(c, m, q);
        t_b.region = t.region;
        t_b.set_flags(0, split_flags);
        t_b.neighbors = [TriangleId::INVALID, n_p, id_ta];
        t_b.set_flags(1, f_p);

        let mut created = vec![id_ta, id_tb];

        if !u_id.invalid() {
            let ut = self.triangles.data(u_id);
            let j = ut.edge_index(p, q).expect("split_edge: not adjacent");
            let d = ut.vertices[j];
            let u_np = ut.neighbors[ut.vertex_index(q).unwrap()];
            let u_nq = ut.neighbors[ut.vertex_index(p).unwrap()];
            let uf_p = ut.flags(ut.vertex_index(q).unwrap());
            let uf_q = ut.flags(ut.vertex_index(p).unwrap());

            let id_ua = u_id;
            let id_ub = TriangleId::from_index(self.triangles.len() + 1);

            let mut u_a = TriangleData::new(d, q, m);
            u_a.region = ut.region;
            u_a.set_flags(0, split_flags);
            u_a.neighbors = [id_tb, id_ub, u_nq];
            u_a.set_flags(2, uf_q);

            let mut u_b = TriangleData::new(d, m, p);
            u_b.region = ut.region;
            u_b.set_flags(0, split_flags);
            u_b.neighbors = [id_ta, u_np, id_ua];
            u_b.set_flags(1, uf_p);

            t_a.neighbors[0] = id_ub;
            t_b.neighbors[0] = id_ua;

            *self.triangles.get_mut(id_ta) = t_a;
            let got_b = self.triangles.insert(t_b);
            debug_assert_eq!(got_b, id_tb);
            *self.triangles.get_mut(id_ua) = u_a;
            let got_ub = self.triangles.insert(u_b);
            debug_assert_eq!(got_ub, id_ub);

            self.triangles.replace_neighbor(n_p, tid, id_tb);
            self.triangles.replace_neighbor(u_np, u_id, id_ub);
            self.note(id_ua);
            self.note(id_ub);
            created.push(id_ua);
            created.push(id_ub);
        } else {
            *self.triangles.get_mut(id_ta) = t_a;
            let got_b = self.triangles.insert(t_b);
            debug_assert_eq!(got_b, id_tb);
            self.triangles.replace_neighbor(n_p, tid, id_tb);
        }

        self.note(id_ta);
        self.note(id_tb);
        created
    }

    /// Faces around vertex `v`, in no particular order. Walks one way and,
    /// on hitting the hull, the other way from the anchor.
    pub fn star(&self, v: PointId) -> Vec<TriangleId> {
        let anchor = self.vertex_tri[v.as_usize()];
        debug_assert!(!anchor.invalid());
        let mut out = Vec::with_capacity(8);

        let mut cur = anchor;
        loop {
            out.push(cur);
            let t = self.triangles.data(cur);
            let k = t.vertex_index(v).expect("star: vertex map out of date");
            let next = t.neighbors[(k + 1) % 3];
            if next.invalid() {
                break;
            }
            if next == anchor {
                return out;
            }
            cur = next;
        }

        // hull vertex: pick up the faces on the other side
        let mut cur = anchor;
        loop {
            let t = self.triangles.data(cur);
            let k = t.vertex_index(v).expect("star: vertex map out of date");
            let next = t.neighbors[(k + 2) % 3];
            if next.invalid() || next == anchor {
                return out;
            }
            out.push(next);
            cur = next;
        }
    }

    /// Find the face carrying edge {a, b}, returning the edge index too.
    pub fn edge_between(&self, a: PointId, b: PointId) -> Option<(TriangleId, usize)> {
        for tid in self.star(a) {
            let t = self.triangles.data(tid);
            if let Some(i) = t.edge_index(a, b) {
                return Some((tid, i));
            }
        }
        None
    }

    /// The apex of the neighbor across edge `i`, when there is one.
    pub fn opposite_apex(&self, tid: TriangleId, i: usize) -> Option<(TriangleId, PointId)> {
        let t = self.triangles.data(tid);
        let n_id = t.neighbors[i];
        let nt = self.triangles.try_get(n_id)?;
        let (p, q) = t.edge_vertices(i);
        let j = nt.edge_index(p, q)?;
        Some((n_id, nt.vertices[j]))
    }
}

/// Convex hull ring used only during the initial build: doubly linked over
/// vertex ids, each entry carrying the face inside edge (v -> next).
struct Hull {
    next: Vec<PointId>,
    prev: Vec<PointId>,
    edge_tri: Vec<TriangleId>,
    start: PointId,
}

const NONE: PointId = PointId(u32::MAX);

impl Hull {
    fn new(n: usize) -> Self {
        Self {
            next: vec![NONE; n],
            prev: vec![NONE; n],
            edge_tri: vec![TriangleId::INVALID; n],
            start: NONE,
        }
    }

    fn next(&self, v: PointId) -> PointId {
        self.next[v.as_usize()]
    }

    fn link(&mut self, v: PointId, next: PointId, prev: PointId, tri: TriangleId) {
        self.next[v.as_usize()] = next;
        self.prev[v.as_usize()] = prev;
        self.edge_tri[v.as_usize()] = tri;
    }

    fn unlink(&mut self, v: PointId) {
        self.next[v.as_usize()] = NONE;
        self.prev[v.as_usize()] = NONE;
        self.edge_tri[v.as_usize()] = TriangleId::INVALID;
    }

    /// Replace the run between `a` and `b` with the single vertex `m`.
    fn splice(&mut self, a: PointId, m: PointId, b: PointId) {
        self.next[a.as_usize()] = m;
        self.next[m.as_usize()] = b;
        self.prev[m.as_usize()] = a;
        self.prev[b.as_usize()] = m;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::points::PointStore;

    fn mesh_of(points: &[(f64, f64)]) -> TriMesh {
        let mut store = PointStore::default();
        for (x, y) in points {
            store.insert_merged(Point::new(*x, *y));
        }
        TriMesh::build(store).unwrap()
    }

    /// Brute force empty-circumcircle check over all faces and vertices.
    fn assert_delaunay(mesh: &TriMesh) {
        for (_, t) in mesh.triangles.iter() {
            let [a, b, c] = t.vertices;
            for (v, p) in mesh.points.iter() {
                if v == a || v == b || v == c {
                    continue;
                }
                assert!(
                    !in_circle(
                        mesh.points.get(a),
                        mesh.points.get(b),
                        mesh.points.get(c),
                        *p
                    ),
                    "vertex {v:?} inside circumcircle of {:?}",
                    t.vertices
                );
            }
        }
    }

    fn assert_ccw(mesh: &TriMesh) {
        for (_, t) in mesh.triangles.iter() {
            let [a, b, c] = t.vertices;
            assert!(orient_2d(
                mesh.points.get(a),
                mesh.points.get(b),
                mesh.points.get(c)
            )
            .is_ccw());
        }
    }

    fn assert_neighbors_consistent(mesh: &TriMesh) {
        for (tid, t) in mesh.triangles.iter() {
            for i in 0..3 {
                let n = t.neighbors[i];
                if n.invalid() {
                    continue;
                }
                let nt = mesh.triangles.get(n);
                assert!(
                    nt.neighbor_index(tid).is_some(),
                    "{tid:?} -> {n:?} not mutual"
                );
                let (p, q) = t.edge_vertices(i);
                assert!(nt.edge_index(p, q).is_some());
            }
        }
    }

    #[test]
    fn test_square() {
        let mesh = mesh_of(&[(0., 0.), (1., 0.), (1., 1.), (0., 1.)]);
        assert_eq!(mesh.triangles.len(), 2);
        assert_ccw(&mesh);
        assert_delaunay(&mesh);
        assert_neighbors_consistent(&mesh);
    }

    #[test]
    fn test_grid() {
        let mut pts = vec![];
        for i in 0..5 {
            for j in 0..5 {
                pts.push((i as f64, j as f64 + 0.01 * i as f64));
            }
        }
        let mesh = mesh_of(&pts);
        // triangulated convex-ish point set: T = 2n - 2 - h
        assert_ccw(&mesh);
        assert_delaunay(&mesh);
        assert_neighbors_consistent(&mesh);
    }

    #[test]
    fn test_collinear_prefix() {
        // the first three points in lex order sit on a vertical line
        let mesh = mesh_of(&[(0., 0.), (0., 1.), (0., 2.), (1., 0.5), (2., 1.)]);
        assert_ccw(&mesh);
        assert_delaunay(&mesh);
        assert_neighbors_consistent(&mesh);
    }

    #[test]
    fn test_all_collinear_fails() {
        let mut store = PointStore::default();
        for i in 0..5 {
            store.insert_merged(Point::new(i as f64, 2. * i as f64));
        }
        assert!(matches!(
            TriMesh::build(store),
            Err(MeshError::DegenerateGeometry)
        ));
    }

    #[test]
    fn test_random_delaunay() {
        use rand::{Rng, SeedableRng};
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let mut store = PointStore::default();
        for _ in 0..120 {
            store.insert_merged(Point::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)));
        }
        let n = store.len();
        let mesh = TriMesh::build(store).unwrap();
        assert_ccw(&mesh);
        assert_delaunay(&mesh);
        assert_neighbors_consistent(&mesh);

        // Euler for a triangulated point set: T = 2n - 2 - h
        let hull_edges = mesh
            .triangles
            .iter()
            .map(|(_, t)| (0..3).filter(|i| t.neighbors[*i].invalid()).count())
            .sum::<usize>();
        assert_eq!(mesh.triangles.len(), 2 * n - 2 - hull_edges);
    }

    #[test]
    fn test_locate() {
        let mesh = mesh_of(&[(0., 0.), (4., 0.), (4., 4.), (0., 4.)]);
        let hint = TriangleId::from_index(0);

        match mesh.locate(Point::new(1., 0.5), hint, false) {
            Locate::Face(_) => {}
            other => panic!("expected face, got {other:?}"),
        }
        match mesh.locate(Point::new(4., 4.), hint, false) {
            Locate::Vertex(_) => {}
            other => panic!("expected vertex, got {other:?}"),
        }
        match mesh.locate(Point::new(10., 10.), hint, false) {
            Locate::Outside => {}
            other => panic!("expected outside, got {other:?}"),
        }
        // the square's center sits on the shared diagonal
        match mesh.locate(Point::new(2., 2.), hint, false) {
            Locate::Edge(..) => {}
            other => panic!("expected edge, got {other:?}"),
        }
    }

    #[test]
    fn test_split_face_and_edge() {
        let mut mesh = mesh_of(&[(0., 0.), (4., 0.), (4., 4.), (0., 4.)]);

        let m = mesh.add_steiner_vertex(Point::new(1., 0.5));
        let tid = match mesh.locate(Point::new(1., 0.5), TriangleId::from_index(0), false) {
            Locate::Face(tid) => tid,
            other => panic!("unexpected {other:?}"),
        };
        let created = mesh.split_face(tid, m);
        mesh.legalize(created.to_vec());
        assert_eq!(mesh.triangles.len(), 4);
        assert_ccw(&mesh);
        assert_neighbors_consistent(&mesh);
        assert_delaunay(&mesh);

        let (tid, i) = mesh
            .edge_between(PointId(0), PointId(1))
            .expect("bottom edge exists");
        let m2 = mesh.add_steiner_vertex(Point::new(2., 0.));
        let created = mesh.split_edge(tid, i, m2);
        mesh.legalize(created);
        assert_ccw(&mesh);
        assert_neighbors_consistent(&mesh);
        assert_delaunay(&mesh);
    }

    #[test]
    fn test_star_and_edge_between() {
        let mesh = mesh_of(&[(0., 0.), (4., 0.), (4., 4.), (0., 4.), (2., 2.01)]);
        // center vertex has a full ring
        let center = mesh
            .points
            .iter()
            .find(|(_, p)| p.x == 2.)
            .map(|(id, _)| id)
            .unwrap();
        let star = mesh.star(center);
        assert_eq!(star.len(), 4);
        for corner in 0..4 {
            assert!(mesh.edge_between(center, PointId(corner)).is_some());
        }
    }
}
