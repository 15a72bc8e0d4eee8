use std::collections::VecDeque;

use crate::delaunay::TriMesh;
use crate::error::MeshError;
use crate::points::PointId;
use crate::predicates::{orient_2d, Orientation};
use crate::triangles::{TriangleId, TriangleStore};

/// Force every PSLG edge to appear in the triangulation, turning the
/// unconstrained Delaunay triangulation into a CDT.
///
/// Edges already present are just flagged. Missing edges are realized by
/// collecting the edges their segment crosses and flipping them away
/// (Sloan's algorithm), then re-legalizing the newly created edges with
/// the constraint pinned. A vertex sitting exactly on a constraint
/// segment splits the constraint through that vertex.
pub fn enforce_constraints(
    mesh: &mut TriMesh,
    edges: &[(PointId, PointId)],
) -> Result<(), MeshError> {
    let mut work: Vec<(PointId, PointId)> = edges.to_vec();

    while let Some((a, b)) = work.pop() {
        if a == b {
            continue;
        }
        if let Some((tid, i)) = mesh.edge_between(a, b) {
            mark_constrained(&mut mesh.triangles, tid, i);
            continue;
        }

        match find_entry(mesh, a, b)? {
            Entry::ThroughVertex(x) => {
                work.push((a, x));
                work.push((x, b));
            }
            Entry::Crossing(tid, i) => {
                let (crossed, reached) = collect_crossings(mesh, tid, i, a, b)?;
                if reached != b {
                    work.push((reached, b));
                }
                resolve(mesh, a, reached, crossed)?;
            }
        }
    }
    Ok(())
}

fn mark_constrained(triangles: &mut TriangleStore, tid: TriangleId, i: usize) {
    let t = triangles.get_mut(tid);
    t.set_constrained(i, true);
    let n_id = t.neighbors[i];
    let (p, q) = t.edge_vertices(i);
    let other_side = triangles.try_get(n_id).and_then(|nt| nt.edge_index(p, q));
    if let Some(j) = other_side {
        triangles.get_mut(n_id).set_constrained(j, true);
    }
}

enum Entry {
    /// The segment leaves `a` straight through this vertex.
    ThroughVertex(PointId),
    /// The segment leaves `a` through the given edge of the triangle.
    Crossing(TriangleId, usize),
}

/// Find how segment a -> b leaves the star of `a`.
fn find_entry(mesh: &TriMesh, a: PointId, b: PointId) -> Result<Entry, MeshError> {
    let pa = mesh.point(a);
    let pb = mesh.point(b);

    for tid in mesh.star(a) {
        let t = mesh.triangles.data(tid);
        let k = t.vertex_index(a).expect("star face without its vertex");
        let x = t.vertices[(k + 1) % 3];
        let y = t.vertices[(k + 2) % 3];
        let px = mesh.point(x);
        let py = mesh.point(y);

        let ox = orient_2d(pa, px, pb);
        let oy = orient_2d(pa, py, pb);

        if ox.is_collinear() && between(pa, pb, px) {
            return Ok(Entry::ThroughVertex(x));
        }
        if oy.is_collinear() && between(pa, pb, py) {
            return Ok(Entry::ThroughVertex(y));
        }
        // b inside the open wedge (a->x, a->y): the segment exits through
        // the opposite edge
        if ox.is_ccw() && oy.is_cw() {
            return Ok(Entry::Crossing(tid, k));
        }
    }
    Err(MeshError::ConstraintEnforcementFailed)
}

/// p is collinear with a -> b; is it strictly between them?
fn between(a: crate::shape::Point, b: crate::shape::Point, p: crate::shape::Point) -> bool {
    let dot = (p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y);
    dot > 0. && a.distance_squared(&p) < a.distance_squared(&b)
}

/// Walk the triangles pierced by segment a -> b, gathering every crossed
/// edge. Stops early at a vertex lying exactly on the segment; returns
/// the vertex actually reached (b, or that blocker).
fn collect_crossings(
    mesh: &TriMesh,
    tid: TriangleId,
    cross_edge: usize,
    a: PointId,
    b: PointId,
) -> Result<(Vec<(PointId, PointId)>, PointId), MeshError> {
    let pa = mesh.point(a);
    let pb = mesh.point(b);

    let t = mesh.triangles.data(tid);
    // relative to the directed line a -> b
    let (mut right, mut left) = {
        let (x, y) = t.edge_vertices(cross_edge);
        (x, y)
    };
    debug_assert!(orient_2d(pa, pb, mesh.point(right)).is_cw());
    debug_assert!(orient_2d(pa, pb, mesh.point(left)).is_ccw());

    let mut crossed = vec![(right, left)];
    let mut cur = tid;
    let mut cur_edge = cross_edge;

    let cap = mesh.triangles.len() + 16;
    for _ in 0..cap {
        if mesh.triangles.data(cur).is_constrained(cur_edge) {
            return Err(MeshError::ConstraintEnforcementFailed);
        }
        let (n_id, d) = mesh
            .opposite_apex(cur, cur_edge)
            .ok_or(MeshError::ConstraintEnforcementFailed)?;
        if d == b {
            return Ok((crossed, b));
        }
        match orient_2d(pa, pb, mesh.point(d)) {
            Orientation::Collinear => {
                // d sits on the segment, constraint splits here
                return Ok((crossed, d));
            }
            Orientation::CCW => {
                // d on the left: next pierced edge is {d, right}
                crossed.push((right, d));
                left = d;
            }
            Orientation::CW => {
                crossed.push((d, left));
                right = d;
            }
        }
        let nt = mesh.triangles.data(n_id);
        cur_edge = nt
            .edge_index(right, left)
            .ok_or(MeshError::ConstraintEnforcementFailed)?;
        cur = n_id;
    }
    Err(MeshError::ConstraintEnforcementFailed)
}

/// Flip the crossed edges away until edge (a, b) materializes, then pin it
/// and restore the Delaunay property around the edges created on the way.
fn resolve(
    mesh: &mut TriMesh,
    a: PointId,
    b: PointId,
    crossed: Vec<(PointId, PointId)>,
) -> Result<(), MeshError> {
    let pa = mesh.point(a);
    let pb = mesh.point(b);

    let mut queue: VecDeque<(PointId, PointId)> = crossed.into();
    let mut new_edges: Vec<(PointId, PointId)> = Vec::new();

    let n0 = queue.len() + 2;
    let mut budget = 4 * n0 * n0 + 256;

    while let Some((x, y)) = queue.pop_front() {
        if budget == 0 {
            return Err(MeshError::ConstraintEnforcementFailed);
        }
        budget -= 1;

        let Some((tid, i)) = mesh.edge_between(x, y) else {
            // a previous flip already removed it
            continue;
        };
        let t = mesh.triangles.data(tid);
        let c = t.vertices[i];
        let Some((_, d)) = mesh.opposite_apex(tid, i) else {
            return Err(MeshError::ConstraintEnforcementFailed);
        };

        // the quad around {x, y} must be strictly convex for the flip to
        // be valid; otherwise retry after other flips reshape it
        let pc = mesh.point(c);
        let pd = mesh.point(d);
        let o1 = orient_2d(pc, pd, mesh.point(x));
        let o2 = orient_2d(pc, pd, mesh.point(y));
        let convex = (o1.is_ccw() && o2.is_cw()) || (o1.is_cw() && o2.is_ccw());
        if !convex {
            queue.push_back((x, y));
            continue;
        }

        mesh.flip(tid, i);

        if (c == a && d == b) || (c == b && d == a) {
            continue;
        }
        if crosses(pa, pb, pc, pd, a, b, c, d) {
            queue.push_back((c, d));
        } else {
            new_edges.push((c, d));
        }
    }

    let (tid, i) = mesh
        .edge_between(a, b)
        .ok_or(MeshError::ConstraintEnforcementFailed)?;
    mark_constrained(&mut mesh.triangles, tid, i);

    // swap-test the bypass edges back to Delaunay; the pinned constraint
    // is skipped by legalize
    let mut seeds = Vec::with_capacity(new_edges.len());
    for (x, y) in new_edges {
        if let Some((tid, _)) = mesh.edge_between(x, y) {
            seeds.push(tid);
        }
    }
    mesh.legalize(seeds);
    Ok(())
}

/// Does segment (c, d) properly cross segment (a, b)? Shared endpoints
/// cannot cross.
#[allow(clippy::too_many_arguments)]
fn crosses(
    pa: crate::shape::Point,
    pb: crate::shape::Point,
    pc: crate::shape::Point,
    pd: crate::shape::Point,
    a: PointId,
    b: PointId,
    c: PointId,
    d: PointId,
) -> bool {
    if c == a || c == b || d == a || d == b {
        return false;
    }
    let o1 = orient_2d(pa, pb, pc);
    let o2 = orient_2d(pa, pb, pd);
    let o3 = orient_2d(pc, pd, pa);
    let o4 = orient_2d(pc, pd, pb);
    ((o1.is_ccw() && o2.is_cw()) || (o1.is_cw() && o2.is_ccw()))
        && ((o3.is_ccw() && o4.is_cw()) || (o3.is_cw() && o4.is_ccw()))
}
