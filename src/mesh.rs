use std::collections::BTreeSet;

use crate::delaunay::TriMesh;
use crate::error::MeshError;
use crate::points::PointId;
use crate::region::is_kept;

/// The finished, immutable triangulation result.
///
/// `Mesh` is the opaque handle of the boundary contract: constructing one
/// through [`Triangulator`](crate::Triangulator) is the only way to get
/// one, the count/copy operations are repeatable pure reads, and
/// [`release`](Mesh::release) consumes the value so a second release or a
/// use-after-release is a compile error rather than undefined behavior.
/// Dropping the handle releases it just the same; `release` only makes
/// the exactly-once hand-off explicit at call sites that want it.
///
/// Indices are 0-based and contiguous; vertices referenced by no output
/// triangle and no output constraint edge are compacted away. Array order
/// is stable for the lifetime of the handle and across identical calls.
#[derive(Debug)]
pub struct Mesh {
    points: Vec<[f64; 3]>,
    triangles: Vec<[u32; 3]>,
    edges: Vec<[u32; 2]>,
}

impl Mesh {
    /// Pack the kept triangles and constraint edges into compact arrays.
    pub(crate) fn assemble(
        mesh: &TriMesh,
        recorded_edges: &[(PointId, PointId)],
        enforced: bool,
        exclude_holes: bool,
    ) -> Result<Self, MeshError> {
        let kept: Vec<_> = mesh
            .triangles
            .iter()
            .filter(|(_, t)| is_kept(t.region, exclude_holes))
            .collect();

        // with enforcement the output edges are the final, possibly
        // subdivided constrained mesh edges; without it they are the PSLG
        // edges as recorded
        let mut edge_set: BTreeSet<(PointId, PointId)> = BTreeSet::new();
        if enforced {
            for (_, t) in mesh.triangles.iter() {
                for i in 0..3 {
                    if t.is_constrained(i) {
                        let (p, q) = t.edge_vertices(i);
                        edge_set.insert(ordered(p, q));
                    }
                }
            }
        } else {
            for &(p, q) in recorded_edges {
                edge_set.insert(ordered(p, q));
            }
        }

        // compact: a vertex survives if a kept triangle or an output edge
        // references it
        let mut remap: Vec<u32> = vec![u32::MAX; mesh.points.len()];
        let mut used: Vec<PointId> = Vec::new();
        used.try_reserve(mesh.points.len())?;
        {
            let mut mark = |id: PointId, used: &mut Vec<PointId>| {
                if remap[id.as_usize()] == u32::MAX {
                    remap[id.as_usize()] = 0; // provisional
                    used.push(id);
                }
            };
            for (_, t) in &kept {
                for v in t.vertices {
                    mark(v, &mut used);
                }
            }
            for &(p, q) in &edge_set {
                mark(p, &mut used);
                mark(q, &mut used);
            }
        }
        used.sort();
        for (new, id) in used.iter().enumerate() {
            remap[id.as_usize()] = new as u32;
        }

        let mut points = Vec::new();
        points.try_reserve_exact(used.len())?;
        for id in &used {
            let p = mesh.points.get(*id);
            points.push([p.x, p.y, p.z]);
        }

        let mut triangles = Vec::new();
        triangles.try_reserve_exact(kept.len())?;
        for (_, t) in &kept {
            let [a, b, c] = t.vertices;
            triangles.push([
                remap[a.as_usize()],
                remap[b.as_usize()],
                remap[c.as_usize()],
            ]);
        }

        let mut edges = Vec::new();
        edges.try_reserve_exact(edge_set.len())?;
        for (p, q) in edge_set {
            edges.push([remap[p.as_usize()], remap[q.as_usize()]]);
        }

        Ok(Self {
            points,
            triangles,
            edges,
        })
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Copy all vertices into a buffer of exactly `point_count` entries.
    pub fn copy_points(&self, buffer: &mut [[f64; 3]]) -> Result<(), MeshError> {
        if buffer.len() != self.points.len() {
            return Err(MeshError::InvalidInput(format!(
                "point buffer holds {} entries, mesh has {}",
                buffer.len(),
                self.points.len()
            )));
        }
        buffer.copy_from_slice(&self.points);
        Ok(())
    }

    /// Copy all triangles into a buffer of exactly `triangle_count`
    /// entries. Indices are counter-clockwise.
    pub fn copy_triangles(&self, buffer: &mut [[u32; 3]]) -> Result<(), MeshError> {
        if buffer.len() != self.triangles.len() {
            return Err(MeshError::InvalidInput(format!(
                "triangle buffer holds {} entries, mesh has {}",
                buffer.len(),
                self.triangles.len()
            )));
        }
        buffer.copy_from_slice(&self.triangles);
        Ok(())
    }

    /// Copy all constraint edges into a buffer of exactly `edge_count`
    /// entries.
    pub fn copy_edges(&self, buffer: &mut [[u32; 2]]) -> Result<(), MeshError> {
        if buffer.len() != self.edges.len() {
            return Err(MeshError::InvalidInput(format!(
                "edge buffer holds {} entries, mesh has {}",
                buffer.len(),
                self.edges.len()
            )));
        }
        buffer.copy_from_slice(&self.edges);
        Ok(())
    }

    /// Borrowed views for callers that do not need caller-owned buffers.
    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn edges(&self) -> &[[u32; 2]] {
        &self.edges
    }

    /// Free the mesh. Consuming `self` gives release its exactly-once
    /// semantics; copies already taken by the caller stay valid.
    pub fn release(self) {
        drop(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::enforce_constraints;
    use crate::pslg::Pslg;
    use crate::region::classify_regions;
    use crate::shape::{Loop, LoopRole, Point};

    fn unit_square_mesh() -> Mesh {
        let outer = Loop::new(
            vec![
                Point::new(0., 0.),
                Point::new(1., 0.),
                Point::new(1., 1.),
                Point::new(0., 1.),
            ],
            LoopRole::Outer,
        )
        .unwrap();
        let pslg = Pslg::assemble(&outer, &[], &[]).unwrap();
        let mut mesh = TriMesh::build(pslg.points.clone()).unwrap();
        enforce_constraints(&mut mesh, &pslg.edges).unwrap();
        classify_regions(&mut mesh, &pslg.outer_polygon, &pslg.hole_polygons, true);
        Mesh::assemble(&mesh, &pslg.edges, true, true).unwrap()
    }

    #[test]
    fn test_counts_and_copies() {
        let mesh = unit_square_mesh();
        assert_eq!(mesh.point_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.edge_count(), 4);

        let mut points = vec![[0.0f64; 3]; mesh.point_count()];
        let mut triangles = vec![[0u32; 3]; mesh.triangle_count()];
        let mut edges = vec![[0u32; 2]; mesh.edge_count()];
        mesh.copy_points(&mut points).unwrap();
        mesh.copy_triangles(&mut triangles).unwrap();
        mesh.copy_edges(&mut edges).unwrap();

        // copies are repeatable and identical
        let mut again = vec![[0.0f64; 3]; mesh.point_count()];
        mesh.copy_points(&mut again).unwrap();
        assert_eq!(points, again);

        // all indices in range
        for t in &triangles {
            for v in t {
                assert!((*v as usize) < mesh.point_count());
            }
        }
        for e in &edges {
            for v in e {
                assert!((*v as usize) < mesh.point_count());
            }
        }

        mesh.release();
    }

    #[test]
    fn test_wrong_buffer_size_is_an_error() {
        let mesh = unit_square_mesh();
        let mut too_small = vec![[0.0f64; 3]; 2];
        assert!(matches!(
            mesh.copy_points(&mut too_small),
            Err(MeshError::InvalidInput(_))
        ));
        let mut too_big = vec![[0u32; 3]; 7];
        assert!(matches!(
            mesh.copy_triangles(&mut too_big),
            Err(MeshError::InvalidInput(_))
        ));
    }
}

fn ordered(p: PointId, q: PointId) -> (PointId, PointId) {
    if p < q {
        (p, q)
    } else {
        (q, p)
    }
}
