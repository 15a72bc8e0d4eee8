use std::collections::{HashMap, VecDeque};

use crate::delaunay::{Locate, TriMesh};
use crate::error::MeshError;
use crate::points::PointId;
use crate::predicates::{circumcenter, encroaches, in_circle};
use crate::region::is_kept;
use crate::shape::Point;
use crate::triangles::{Region, TriangleId};

/// Resolved refinement parameters; precedence between the preset and the
/// explicit angle already applied by the caller.
pub struct RefineParams {
    pub max_edge_length: Option<f64>,
    pub min_angle_deg: Option<f64>,
    /// Hard Steiner budget; exceeding it aborts with
    /// `RefinementDidNotConverge`.
    pub max_steiner: usize,
    /// Mirrors the call's hole handling so excluded regions are neither
    /// measured nor refined.
    pub exclude_holes: bool,
}

/// Ruppert-style Delaunay refinement.
///
/// Two queues drive the loop: fixed segments (constraint and hull edges)
/// whose diametral circle is violated or that exceed the length bound are
/// midpoint-split; remaining skinny or oversized faces get their
/// circumcenter inserted, unless doing so would encroach a fixed segment,
/// in which case that segment is split first and the face revisited. Segments are split at their midpoint the first
/// time and at positions rounded to the nearest power of two after, which
/// stops two segments meeting at an acute input angle from chasing each
/// other forever.
pub fn refine(mesh: &mut TriMesh, params: &RefineParams) -> Result<(), MeshError> {
    let mut r = Refiner {
        max_len_sq: params.max_edge_length.map(|l| l * l),
        // ratio = 1 / (2 sin theta); compare squared
        ratio_limit_sq: params.min_angle_deg.map(|deg| {
            let sin = deg.to_radians().sin();
            let ratio = 0.5 / sin;
            ratio * ratio
        }),
        exclude_holes: params.exclude_holes,
        budget: params.max_steiner,
        added: 0,
        segment_queue: VecDeque::new(),
        face_queue: VecDeque::new(),
        forced: Vec::new(),
        constraint_vertex_map: HashMap::new(),
    };

    for (tid, t) in mesh.triangles.iter() {
        if r.refinable(t.region) {
            r.face_queue.push_back(tid);
        }
        for i in 0..3 {
            if t.is_constrained(i) || t.neighbors[i].invalid() {
                r.segment_queue.push_back(t.edge_vertices(i));
            }
        }
    }

    loop {
        if let Some(seg) = r.forced.pop() {
            r.split_segment(mesh, seg)?;
            continue;
        }
        if let Some(seg) = r.segment_queue.pop_front() {
            if r.segment_needs_split(mesh, seg) {
                r.split_segment(mesh, seg)?;
            }
            continue;
        }
        if let Some(tid) = r.face_queue.pop_front() {
            r.process_face(mesh, tid)?;
            continue;
        }
        break;
    }
    Ok(())
}

struct Refiner {
    max_len_sq: Option<f64>,
    ratio_limit_sq: Option<f64>,
    exclude_holes: bool,
    budget: usize,
    added: usize,
    segment_queue: VecDeque<(PointId, PointId)>,
    face_queue: VecDeque<TriangleId>,
    forced: Vec<(PointId, PointId)>,
    /// Steiner point on an input segment -> that segment's input
    /// endpoints. Detects subsegments sharing an input apex.
    constraint_vertex_map: HashMap<PointId, [PointId; 2]>,
}

impl Refiner {
    fn refinable(&self, region: Region) -> bool {
        // unclassified means refinement runs before classification
        // (constraints not enforced): every face is fair game
        region == Region::Unclassified || is_kept(region, self.exclude_holes)
    }

    fn is_fixed(mesh: &TriMesh, tid: TriangleId, i: usize) -> bool {
        let t = mesh.triangles.data(tid);
        t.is_constrained(i) || t.neighbors[i].invalid()
    }

    /// Encroached by a refinable neighbor apex, or longer than the length
    /// bound with a refinable side.
    fn segment_needs_split(&self, mesh: &TriMesh, (p, q): (PointId, PointId)) -> bool {
        let Some((tid, i)) = mesh.edge_between(p, q) else {
            return false; // already subdivided
        };
        if !Self::is_fixed(mesh, tid, i) {
            return false;
        }
        let pp = mesh.point(p);
        let pq = mesh.point(q);

        let mut any_refinable_side = false;
        for (side_tid, side_i) in self.both_sides(mesh, tid, i, p, q) {
            let t = mesh.triangles.data(side_tid);
            if !self.refinable(t.region) {
                continue;
            }
            any_refinable_side = true;
            let apex = mesh.point(t.vertices[side_i]);
            if encroaches(pp, pq, apex) {
                return true;
            }
        }
        if !any_refinable_side {
            return false;
        }
        match self.max_len_sq {
            Some(limit) => pp.distance_squared(&pq) > limit,
            None => false,
        }
    }

    /// The (face, apex-index) pairs on both sides of an edge.
    fn both_sides(
        &self,
        mesh: &TriMesh,
        tid: TriangleId,
        i: usize,
        p: PointId,
        q: PointId,
    ) -> Vec<(TriangleId, usize)> {
        let mut sides = vec![(tid, i)];
        let t = mesh.triangles.data(tid);
        if let Some(nt) = mesh.triangles.try_get(t.neighbors[i]) {
            if let Some(j) = nt.edge_index(p, q) {
                sides.push((t.neighbors[i], j));
            }
        }
        sides
    }

    fn bump_budget(&mut self) -> Result<(), MeshError> {
        self.added += 1;
        if self.added > self.budget {
            return Err(MeshError::RefinementDidNotConverge);
        }
        Ok(())
    }

    /// Split a fixed segment, midpoint first, power-of-two shells after.
    fn split_segment(&mut self, mesh: &mut TriMesh, (p, q): (PointId, PointId)) -> Result<(), MeshError> {
        let Some((tid, i)) = mesh.edge_between(p, q) else {
            return Ok(());
        };
        if !Self::is_fixed(mesh, tid, i) {
            return Ok(());
        }
        self.bump_budget()?;

        let pp = mesh.point(p);
        let pq = mesh.point(q);

        let p_origin = self.constraint_vertex_map.get(&p).copied();
        let q_origin = self.constraint_vertex_map.get(&q).copied();

        let (w_p, w_q) = match (p_origin, q_origin) {
            (None, None) => (0.5, 0.5),
            _ => {
                // one endpoint is already a subdivision point: round the
                // split distance to the nearest power of two, oriented
                // toward the input vertex, so runaway encroachment at
                // acute input angles settles on matching shells
                let half_length = pp.distance_squared(&pq).sqrt() * 0.5;
                let shell = nearest_power_of_two(half_length);
                let w_other = 0.5 * shell / half_length;
                let w_origin = 1.0 - w_other;
                if p_origin.is_none() {
                    (w_origin, w_other)
                } else {
                    (w_other, w_origin)
                }
            }
        };

        let at = Point::with_z(
            pp.x * w_p + pq.x * w_q,
            pp.y * w_p + pq.y * w_q,
            pp.z * w_p + pq.z * w_q,
        );
        let m = mesh.add_steiner_vertex(at);
        let created = mesh.split_edge(tid, i, m);
        mesh.legalize(created);

        let origin = p_origin.or(q_origin).unwrap_or([p, q]);
        self.constraint_vertex_map.insert(m, origin);

        self.segment_queue.push_back((p, m));
        self.segment_queue.push_back((m, q));
        self.enqueue_around(mesh, m);
        Ok(())
    }

    /// Revisit everything a fresh vertex touched.
    fn enqueue_around(&mut self, mesh: &TriMesh, v: PointId) {
        for tid in mesh.star(v) {
            let t = mesh.triangles.data(tid);
            if self.refinable(t.region) {
                self.face_queue.push_back(tid);
            }
            for i in 0..3 {
                if t.is_constrained(i) || t.neighbors[i].invalid() {
                    self.segment_queue.push_back(t.edge_vertices(i));
                }
            }
        }
    }

    fn process_face(&mut self, mesh: &mut TriMesh, tid: TriangleId) -> Result<(), MeshError> {
        let t = mesh.triangles.data(tid);
        if !self.refinable(t.region) {
            return Ok(());
        }
        let [a, b, c] = t.vertices;
        let (pa, pb, pc) = (mesh.point(a), mesh.point(b), mesh.point(c));

        let l_ab = pa.distance_squared(&pb);
        let l_bc = pb.distance_squared(&pc);
        let l_ca = pc.distance_squared(&pa);
        let longest = l_ab.max(l_bc).max(l_ca);
        let shortest = l_ab.min(l_bc).min(l_ca);

        let must = matches!(self.max_len_sq, Some(limit) if longest > limit);

        let Some(center) = circumcenter(pa, pb, pc) else {
            return Ok(());
        };
        let radius_sq = center.distance_squared(&pa);
        let skinny = matches!(self.ratio_limit_sq, Some(limit) if radius_sq / shortest > limit);

        if !must && !skinny {
            return Ok(());
        }

        if skinny && !must {
            // two subsegments meeting at an acute input apex cannot be
            // improved without splitting forever; leave them be
            let (sp, sq) = if shortest == l_ab {
                (a, b)
            } else if shortest == l_bc {
                (b, c)
            } else {
                (c, a)
            };
            if let (Some(o1), Some(o2)) = (
                self.constraint_vertex_map.get(&sp),
                self.constraint_vertex_map.get(&sq),
            ) {
                if o1.iter().any(|v| o2.contains(v)) {
                    return Ok(());
                }
            }
        }

        match mesh.locate(center, tid, true) {
            Locate::Vertex(_) | Locate::Outside => Ok(()),
            Locate::Blocked(btid, bi) => {
                // a constraint stands between the face and its
                // circumcenter; split it and come back
                let seg = mesh.triangles.data(btid).edge_vertices(bi);
                self.forced.push(seg);
                self.face_queue.push_back(tid);
                Ok(())
            }
            Locate::Edge(etid, ei) => {
                if Self::is_fixed(mesh, etid, ei) {
                    let seg = mesh.triangles.data(etid).edge_vertices(ei);
                    self.forced.push(seg);
                    self.face_queue.push_back(tid);
                    return Ok(());
                }
                self.try_insert(mesh, tid, center, InsertSite::Edge(etid, ei))
            }
            Locate::Face(ftid) => self.try_insert(mesh, tid, center, InsertSite::Face(ftid)),
        }
    }

    /// Insert the circumcenter unless its cavity is bounded by a fixed
    /// segment it encroaches; then those segments split first.
    fn try_insert(
        &mut self,
        mesh: &mut TriMesh,
        origin_face: TriangleId,
        center: Point,
        site: InsertSite,
    ) -> Result<(), MeshError> {
        let seeds = match site {
            InsertSite::Face(tid) => vec![tid],
            InsertSite::Edge(tid, i) => {
                let mut seeds = vec![tid];
                let n = mesh.triangles.data(tid).neighbors[i];
                if !n.invalid() {
                    seeds.push(n);
                }
                seeds
            }
        };

        let encroached = self.encroached_by_cavity(mesh, &seeds, center);
        if !encroached.is_empty() {
            self.forced.extend(encroached);
            self.face_queue.push_back(origin_face);
            return Ok(());
        }

        self.bump_budget()?;
        let v = mesh.add_steiner_vertex(center);
        let created = match site {
            InsertSite::Face(tid) => mesh.split_face(tid, v).to_vec(),
            InsertSite::Edge(tid, i) => mesh.split_edge(tid, i, v),
        };
        mesh.legalize(created);
        self.enqueue_around(mesh, v);
        Ok(())
    }

    /// Fixed segments on the boundary of the center's Delaunay cavity
    /// whose diametral circle the center violates.
    fn encroached_by_cavity(
        &self,
        mesh: &TriMesh,
        seeds: &[TriangleId],
        center: Point,
    ) -> Vec<(PointId, PointId)> {
        let mut visited: Vec<TriangleId> = Vec::with_capacity(16);
        let mut stack: Vec<TriangleId> = seeds.to_vec();
        let mut hits = Vec::new();

        while let Some(tid) = stack.pop() {
            if visited.contains(&tid) {
                continue;
            }
            visited.push(tid);

            let t = mesh.triangles.data(tid);
            for i in 0..3 {
                let (p, q) = t.edge_vertices(i);
                if t.is_constrained(i) || t.neighbors[i].invalid() {
                    if encroaches(mesh.point(p), mesh.point(q), center) {
                        hits.push((p, q));
                    }
                    continue;
                }
                let n_id = t.neighbors[i];
                let nt = mesh.triangles.data(n_id);
                let [na, nb, nc] = nt.vertices;
                if in_circle(
                    mesh.point(na),
                    mesh.point(nb),
                    mesh.point(nc),
                    center,
                ) {
                    stack.push(n_id);
                }
            }
        }
        hits
    }
}

#[derive(Clone, Copy)]
enum InsertSite {
    Face(TriangleId),
    Edge(TriangleId, usize),
}

fn nearest_power_of_two(input: f64) -> f64 {
    input.log2().round().exp2()
}
