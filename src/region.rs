use std::collections::VecDeque;

use crate::delaunay::TriMesh;
use crate::predicates::point_in_loop;
use crate::shape::Point;
use crate::triangles::{Region, TriangleId};

/// Should a triangle of this region end up in the result?
pub fn is_kept(region: Region, exclude_holes: bool) -> bool {
    match region {
        Region::Interior => true,
        Region::Hole => !exclude_holes,
        Region::Outside => false,
        // only seen when constraints are not enforced and classification
        // runs after refinement; callers treat it as refinable
        Region::Unclassified => false,
    }
}

/// Tag every triangle with the region it belongs to.
///
/// With enforced constraints, triangle adjacency is flood-filled without
/// crossing a constraint edge, so each connected component is classified
/// once from a representative centroid — robust even for slivers whose
/// own centroid sits near a boundary. Without enforcement the component
/// boundaries mean nothing, so every triangle is classified from its own
/// centroid.
///
/// Membership is even-odd: outside the outer loop is `Outside`, inside an
/// odd number of hole loops is `Hole`, everything else `Interior`.
/// Building loops are deliberately transparent here; their interiors stay
/// meshed and nesting them inside holes (or holes inside them) cannot
/// flip a region's class.
pub fn classify_regions(
    mesh: &mut TriMesh,
    outer: &[Point],
    holes: &[Vec<Point>],
    flood: bool,
) {
    let n = mesh.triangles.len();

    if !flood {
        for idx in 0..n {
            let tid = TriangleId::from_index(idx);
            let centroid = triangle_centroid(mesh, tid);
            let region = classify_point(centroid, outer, holes);
            mesh.triangles.get_mut(tid).region = region;
        }
        return;
    }

    let mut component = vec![u32::MAX; n];
    let mut reps: Vec<TriangleId> = Vec::new();

    for idx in 0..n {
        if component[idx] != u32::MAX {
            continue;
        }
        let comp = reps.len() as u32;
        let seed = TriangleId::from_index(idx);
        reps.push(seed);

        let mut queue = VecDeque::new();
        queue.push_back(seed);
        component[idx] = comp;
        while let Some(tid) = queue.pop_front() {
            let t = mesh.triangles.data(tid);
            for i in 0..3 {
                if t.is_constrained(i) {
                    continue;
                }
                let n_id = t.neighbors[i];
                if n_id.invalid() {
                    continue;
                }
                if component[n_id.as_usize()] == u32::MAX {
                    component[n_id.as_usize()] = comp;
                    queue.push_back(n_id);
                }
            }
        }
    }

    let classes: Vec<Region> = reps
        .iter()
        .map(|rep| classify_point(triangle_centroid(mesh, *rep), outer, holes))
        .collect();

    for idx in 0..n {
        let tid = TriangleId::from_index(idx);
        mesh.triangles.get_mut(tid).region = classes[component[idx] as usize];
    }
}

fn classify_point(p: Point, outer: &[Point], holes: &[Vec<Point>]) -> Region {
    if !point_in_loop(p, outer) {
        return Region::Outside;
    }
    let depth = holes.iter().filter(|h| point_in_loop(p, h)).count();
    if depth % 2 == 1 {
        Region::Hole
    } else {
        Region::Interior
    }
}

fn triangle_centroid(mesh: &TriMesh, tid: TriangleId) -> Point {
    let t = mesh.triangles.get(tid);
    let [a, b, c] = t.vertices;
    Point::with_z(
        (mesh.point(a).x + mesh.point(b).x + mesh.point(c).x) / 3.,
        (mesh.point(a).y + mesh.point(b).y + mesh.point(c).y) / 3.,
        (mesh.point(a).z + mesh.point(b).z + mesh.point(c).z) / 3.,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::enforce_constraints;
    use crate::pslg::Pslg;
    use crate::shape::{Loop, LoopRole};

    fn square_loop(x0: f64, y0: f64, x1: f64, y1: f64, role: LoopRole) -> Loop {
        Loop::new(
            vec![
                Point::new(x0, y0),
                Point::new(x1, y0),
                Point::new(x1, y1),
                Point::new(x0, y1),
            ],
            role,
        )
        .unwrap()
    }

    fn build_enforced(pslg: &Pslg) -> TriMesh {
        let mut mesh = TriMesh::build(pslg.points.clone()).unwrap();
        enforce_constraints(&mut mesh, &pslg.edges).unwrap();
        mesh
    }

    #[test]
    fn test_hole_component_tagged() {
        let outer = square_loop(0., 0., 4., 4., LoopRole::Outer);
        let hole = square_loop(1., 1., 3., 3., LoopRole::Hole);
        let pslg = Pslg::assemble(&outer, &[hole], &[]).unwrap();
        let mut mesh = build_enforced(&pslg);

        classify_regions(&mut mesh, &pslg.outer_polygon, &pslg.hole_polygons, true);

        let mut saw_hole = false;
        let mut saw_interior = false;
        for (tid, t) in mesh.triangles.iter() {
            let centroid = triangle_centroid(&mesh, tid);
            let inside_hole =
                centroid.x > 1. && centroid.x < 3. && centroid.y > 1. && centroid.y < 3.;
            if inside_hole {
                assert_eq!(t.region, Region::Hole);
                saw_hole = true;
            } else {
                assert_eq!(t.region, Region::Interior);
                saw_interior = true;
            }
        }
        assert!(saw_hole && saw_interior);
    }

    #[test]
    fn test_building_loop_stays_interior() {
        let outer = square_loop(0., 0., 4., 4., LoopRole::Outer);
        let building = square_loop(1., 1., 3., 3., LoopRole::Building);
        let pslg = Pslg::assemble(&outer, &[], &[building]).unwrap();
        let mut mesh = build_enforced(&pslg);

        classify_regions(&mut mesh, &pslg.outer_polygon, &pslg.hole_polygons, true);
        for (_, t) in mesh.triangles.iter() {
            assert_eq!(t.region, Region::Interior);
        }
    }

    #[test]
    fn test_building_inside_hole_is_excluded() {
        let outer = square_loop(0., 0., 8., 8., LoopRole::Outer);
        let hole = square_loop(1., 1., 7., 7., LoopRole::Hole);
        let building = square_loop(3., 3., 5., 5., LoopRole::Building);
        let pslg = Pslg::assemble(&outer, &[hole], &[building]).unwrap();
        let mut mesh = build_enforced(&pslg);

        classify_regions(&mut mesh, &pslg.outer_polygon, &pslg.hole_polygons, true);

        // the building interior sits inside one hole loop: still a hole
        for (tid, t) in mesh.triangles.iter() {
            let c = triangle_centroid(&mesh, tid);
            if c.x > 3. && c.x < 5. && c.y > 3. && c.y < 5. {
                assert_eq!(t.region, Region::Hole);
            }
        }
    }

    #[test]
    fn test_outside_outer_tagged() {
        // non-convex outer loop: hull filler triangles lie outside it
        let outer = Loop::new(
            vec![
                Point::new(0., 0.),
                Point::new(4., 0.),
                Point::new(4., 4.),
                Point::new(2., 1.),
                Point::new(0., 4.),
            ],
            LoopRole::Outer,
        )
        .unwrap();
        let pslg = Pslg::assemble(&outer, &[], &[]).unwrap();
        let mut mesh = build_enforced(&pslg);
        classify_regions(&mut mesh, &pslg.outer_polygon, &pslg.hole_polygons, true);

        let outside = mesh
            .triangles
            .iter()
            .filter(|(_, t)| t.region == Region::Outside)
            .count();
        assert!(outside >= 1);
    }
}
