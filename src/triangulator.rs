use crate::config::MeshConfig;
use crate::constraint::enforce_constraints;
use crate::delaunay::TriMesh;
use crate::error::MeshError;
use crate::mesh::Mesh;
use crate::pslg::Pslg;
use crate::refine::{refine, RefineParams};
use crate::region::classify_regions;
use crate::shape::{Loop, LoopRole, Point};

/// Builder for a [`Triangulator`].
///
/// One outer loop is required; holes and building loops are optional.
///
/// # Example
/// ```rust
///    use planemesh::{MeshConfig, Point, TriangulatorBuilder};
///
///    let builder = TriangulatorBuilder::new(vec![
///        Point::new(0., 0.),
///        Point::new(10., 0.),
///        Point::new(10., 10.),
///        Point::new(0., 10.),
///    ])
///    .add_hole(vec![
///        Point::new(4., 4.),
///        Point::new(6., 4.),
///        Point::new(6., 6.),
///        Point::new(4., 6.),
///    ])
///    .with_config(MeshConfig::new().with_max_edge_length(1.0));
///    let mesh = builder.build().unwrap().triangulate().unwrap();
///    assert!(mesh.triangle_count() > 2);
/// ```
#[derive(Clone)]
pub struct TriangulatorBuilder {
    outer: Vec<Point>,
    holes: Vec<Vec<Point>>,
    buildings: Vec<Vec<Point>>,
    config: MeshConfig,
}

impl TriangulatorBuilder {
    /// Start from the outer boundary polyline, closed explicitly or not.
    pub fn new(outer: Vec<Point>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
            buildings: Vec::new(),
            config: MeshConfig::default(),
        }
    }

    /// Add a hole loop; its interior is excluded from the result unless
    /// the configuration says otherwise.
    pub fn add_hole(mut self, polyline: Vec<Point>) -> Self {
        self.holes.push(polyline);
        self
    }

    pub fn add_holes(mut self, holes: impl IntoIterator<Item = Vec<Point>>) -> Self {
        self.holes.extend(holes);
        self
    }

    /// Add a building loop: its edges are forced into the mesh but its
    /// interior stays meshed.
    pub fn add_building_loop(mut self, polyline: Vec<Point>) -> Self {
        self.buildings.push(polyline);
        self
    }

    pub fn add_building_loops(mut self, loops: impl IntoIterator<Item = Vec<Point>>) -> Self {
        self.buildings.extend(loops);
        self
    }

    pub fn with_config(mut self, config: MeshConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the loops and the configuration.
    pub fn build(self) -> Result<Triangulator, MeshError> {
        self.config.validate()?;
        let outer = Loop::new(self.outer, LoopRole::Outer)?;
        let holes = self
            .holes
            .into_iter()
            .map(|h| Loop::new(h, LoopRole::Hole))
            .collect::<Result<Vec<_>, _>>()?;
        let buildings = self
            .buildings
            .into_iter()
            .map(|b| Loop::new(b, LoopRole::Building))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Triangulator {
            outer,
            holes,
            buildings,
            config: self.config,
        })
    }
}

/// A validated triangulation request. Each [`Triangulator::triangulate`]
/// call is self-contained and synchronous; failures abort atomically
/// without producing a handle.
pub struct Triangulator {
    outer: Loop,
    holes: Vec<Loop>,
    buildings: Vec<Loop>,
    config: MeshConfig,
}

impl Triangulator {
    /// Run the pipeline: PSLG assembly, constraint validation, Delaunay
    /// construction, constraint enforcement, region classification,
    /// refinement, result assembly.
    pub fn triangulate(&self) -> Result<Mesh, MeshError> {
        let pslg = Pslg::assemble(&self.outer, &self.holes, &self.buildings)?;
        if self.config.enforce_constraints {
            pslg.validate_constraints()?;
        }
        let Pslg {
            points,
            edges,
            outer_polygon,
            hole_polygons,
        } = pslg;

        let mut mesh = TriMesh::build(points)?;

        if self.config.enforce_constraints {
            enforce_constraints(&mut mesh, &edges)?;
            // classify up front so refinement can skip excluded regions;
            // splits inherit the tag and flips never cross a constraint
            classify_regions(&mut mesh, &outer_polygon, &hole_polygons, true);
        }

        if self.config.wants_refinement() {
            let params = RefineParams {
                max_edge_length: self.config.target_max_edge_length,
                min_angle_deg: self.config.effective_min_angle_deg(),
                max_steiner: self
                    .config
                    .max_steiner_points
                    .unwrap_or_else(|| 10 * mesh.vertex_count() + 10_000),
                exclude_holes: self.config.exclude_holes,
            };
            refine(&mut mesh, &params)?;
        }

        if !self.config.enforce_constraints {
            // without enforced constraints the adjacency components mean
            // nothing; classify each face from its own centroid, after
            // refinement so Steiner faces get judged too
            classify_regions(&mut mesh, &outer_polygon, &hole_polygons, false);
        }

        Mesh::assemble(
            &mesh,
            &edges,
            self.config.enforce_constraints,
            self.config.exclude_holes,
        )
    }
}

/// One-call convenience over the builder.
pub fn triangulate(
    outer: Vec<Point>,
    holes: Vec<Vec<Point>>,
    building_loops: Vec<Vec<Point>>,
    config: MeshConfig,
) -> Result<Mesh, MeshError> {
    TriangulatorBuilder::new(outer)
        .add_holes(holes)
        .add_building_loops(building_loops)
        .with_config(config)
        .build()?
        .triangulate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QualityPreset;
    use crate::predicates::{point_in_loop, smallest_angle_deg};
    use std::collections::BTreeSet;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ]
    }

    fn edge_set(mesh: &Mesh) -> BTreeSet<(u32, u32)> {
        let mut set = BTreeSet::new();
        for t in mesh.triangles() {
            for k in 0..3 {
                let a = t[k];
                let b = t[(k + 1) % 3];
                set.insert((a.min(b), a.max(b)));
            }
        }
        set
    }

    fn min_angle(mesh: &Mesh) -> f64 {
        let pts = mesh.points();
        mesh.triangles()
            .iter()
            .map(|t| {
                let p = |i: u32| Point::new(pts[i as usize][0], pts[i as usize][1]);
                smallest_angle_deg(p(t[0]), p(t[1]), p(t[2]))
            })
            .fold(f64::INFINITY, f64::min)
    }

    fn longest_edge(mesh: &Mesh) -> f64 {
        let pts = mesh.points();
        let mut longest = 0.0f64;
        for t in mesh.triangles() {
            for k in 0..3 {
                let a = pts[t[k] as usize];
                let b = pts[t[(k + 1) % 3] as usize];
                let len = ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt();
                longest = longest.max(len);
            }
        }
        longest
    }

    #[test]
    fn test_unit_square_scenario() {
        // unit square, constraints on, no quality bounds
        let mesh = triangulate(square(0., 0., 1., 1.), vec![], vec![], MeshConfig::new()).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.point_count(), 4);
        assert_eq!(mesh.edge_count(), 4);
    }

    #[test]
    fn test_euler_relation_holds() {
        // triangulated disk: V - E + T == 1
        for config in [
            MeshConfig::new(),
            MeshConfig::new().with_max_edge_length(2.5),
            MeshConfig::new().with_quality_preset(QualityPreset::Moderate),
        ] {
            let mesh = triangulate(square(0., 0., 10., 10.), vec![], vec![], config).unwrap();
            let v = mesh.point_count() as i64;
            let e = edge_set(&mesh).len() as i64;
            let t = mesh.triangle_count() as i64;
            assert_eq!(v - e + t, 1, "V={v} E={e} T={t}");
        }
    }

    #[test]
    fn test_refined_square_with_holes_scenario() {
        // 10x10 outer, two non-overlapping holes, maxh 1.0, moderate
        let hole_a = square(2., 2., 4., 4.);
        let hole_b = square(6., 6., 8., 8.);
        let config = MeshConfig::new()
            .with_max_edge_length(1.0)
            .with_quality_preset(QualityPreset::Moderate);
        let mesh = triangulate(
            square(0., 0., 10., 10.),
            vec![hole_a.clone(), hole_b.clone()],
            vec![],
            config,
        )
        .unwrap();

        assert!(mesh.triangle_count() > 2);
        assert!(min_angle(&mesh) >= 25.0 - 1e-6);
        assert!(longest_edge(&mesh) <= 1.0 + 1e-9);

        // no kept triangle centroid inside either hole
        let pts = mesh.points();
        for t in mesh.triangles() {
            let cx = (pts[t[0] as usize][0] + pts[t[1] as usize][0] + pts[t[2] as usize][0]) / 3.;
            let cy = (pts[t[0] as usize][1] + pts[t[1] as usize][1] + pts[t[2] as usize][1]) / 3.;
            let c = Point::new(cx, cy);
            assert!(!point_in_loop(c, &hole_a));
            assert!(!point_in_loop(c, &hole_b));
        }
    }

    #[test]
    fn test_overlapping_building_edges_scenario() {
        // two building loops sharing a full side, constraints enforced
        let b1 = vec![
            Point::new(0.25, 0.25),
            Point::new(0.55, 0.25),
            Point::new(0.55, 0.75),
            Point::new(0.25, 0.75),
        ];
        let b2 = vec![
            Point::new(0.55, 0.25),
            Point::new(0.85, 0.25),
            Point::new(0.85, 0.75),
            Point::new(0.55, 0.75),
        ];
        let err = triangulate(
            square(0., 0., 1., 1.),
            vec![],
            vec![b1, b2],
            MeshConfig::new(),
        )
        .unwrap_err();
        assert!(matches!(err, MeshError::IntersectingConstraints { .. }));
    }

    #[test]
    fn test_constraint_edges_are_triangle_edges() {
        let config = MeshConfig::new().with_max_edge_length(1.5);
        let mesh = triangulate(
            square(0., 0., 10., 10.),
            vec![square(4., 4., 6., 6.)],
            vec![square(1., 1., 3., 3.)],
            config,
        )
        .unwrap();

        let edges = edge_set(&mesh);
        assert!(mesh.edge_count() > 0);
        for e in mesh.edges() {
            let key = (e[0].min(e[1]), e[0].max(e[1]));
            assert!(edges.contains(&key), "constraint edge {key:?} not in any triangle");
        }
    }

    #[test]
    fn test_building_interior_stays_meshed() {
        let mesh = triangulate(
            square(0., 0., 10., 10.),
            vec![],
            vec![square(4., 4., 6., 6.)],
            MeshConfig::new(),
        )
        .unwrap();

        // some triangle centroid inside the building loop
        let pts = mesh.points();
        let building = square(4., 4., 6., 6.);
        let covered = mesh.triangles().iter().any(|t| {
            let cx = (pts[t[0] as usize][0] + pts[t[1] as usize][0] + pts[t[2] as usize][0]) / 3.;
            let cy = (pts[t[0] as usize][1] + pts[t[1] as usize][1] + pts[t[2] as usize][1]) / 3.;
            point_in_loop(Point::new(cx, cy), &building)
        });
        assert!(covered);
    }

    #[test]
    fn test_exclude_holes_off_keeps_hole_interior() {
        let hole = square(4., 4., 6., 6.);
        let mesh = triangulate(
            square(0., 0., 10., 10.),
            vec![hole.clone()],
            vec![],
            MeshConfig::new().exclude_holes(false),
        )
        .unwrap();

        let pts = mesh.points();
        let covered = mesh.triangles().iter().any(|t| {
            let cx = (pts[t[0] as usize][0] + pts[t[1] as usize][0] + pts[t[2] as usize][0]) / 3.;
            let cy = (pts[t[0] as usize][1] + pts[t[1] as usize][1] + pts[t[2] as usize][1]) / 3.;
            point_in_loop(Point::new(cx, cy), &hole)
        });
        assert!(covered);
    }

    #[test]
    fn test_unenforced_constraints_still_recorded() {
        let mesh = triangulate(
            square(0., 0., 10., 10.),
            vec![square(4., 4., 6., 6.)],
            vec![],
            MeshConfig::new().enforce_constraints(false),
        )
        .unwrap();
        // 4 outer + 4 hole edges recorded even though nothing was forced
        assert_eq!(mesh.edge_count(), 8);
    }

    #[test]
    fn test_min_angle_override_beats_preset() {
        let config = MeshConfig::new()
            .with_quality_preset(QualityPreset::Moderate)
            .with_min_angle_degrees(30.0);
        let mesh = triangulate(square(0., 0., 10., 10.), vec![], vec![], config).unwrap();
        assert!(min_angle(&mesh) >= 30.0 - 1e-6);
    }

    #[test]
    fn test_idempotent_counts() {
        let config = MeshConfig::new()
            .with_max_edge_length(1.0)
            .with_quality_preset(QualityPreset::Moderate);
        let builder = TriangulatorBuilder::new(square(0., 0., 10., 10.))
            .add_hole(square(3., 3., 5., 5.))
            .with_config(config);
        let t = builder.build().unwrap();
        let m1 = t.triangulate().unwrap();
        let m2 = t.triangulate().unwrap();
        assert_eq!(m1.point_count(), m2.point_count());
        assert_eq!(m1.triangle_count(), m2.triangle_count());
        assert_eq!(m1.edge_count(), m2.edge_count());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            TriangulatorBuilder::new(vec![]).build(),
            Err(MeshError::InvalidInput(_))
        ));
        assert!(matches!(
            TriangulatorBuilder::new(vec![Point::new(0., 0.), Point::new(1., 0.)]).build(),
            Err(MeshError::InvalidInput(_))
        ));
        assert!(matches!(
            TriangulatorBuilder::new(square(0., 0., 1., 1.))
                .with_config(MeshConfig::new().with_min_angle_degrees(90.))
                .build(),
            Err(MeshError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_collinear_outer_is_degenerate() {
        let line = vec![
            Point::new(0., 0.),
            Point::new(1., 0.),
            Point::new(2., 0.),
            Point::new(3., 0.),
        ];
        let err = triangulate(line, vec![], vec![], MeshConfig::new()).unwrap_err();
        assert!(matches!(err, MeshError::DegenerateGeometry));
    }

    #[test]
    fn test_nonconvex_outer_trims_hull_filler() {
        // concave outer loop: the pocket between hull and boundary must
        // not be meshed
        let outer = vec![
            Point::new(0., 0.),
            Point::new(8., 0.),
            Point::new(8., 8.),
            Point::new(4., 2.),
            Point::new(0., 8.),
        ];
        let mesh = triangulate(outer.clone(), vec![], vec![], MeshConfig::new()).unwrap();
        let pts = mesh.points();
        for t in mesh.triangles() {
            let cx = (pts[t[0] as usize][0] + pts[t[1] as usize][0] + pts[t[2] as usize][0]) / 3.;
            let cy = (pts[t[0] as usize][1] + pts[t[1] as usize][1] + pts[t[2] as usize][1]) / 3.;
            assert!(point_in_loop(Point::new(cx, cy), &outer));
        }
    }

    #[test]
    fn test_z_carried_through() {
        let outer = vec![
            Point::with_z(0., 0., 5.),
            Point::with_z(1., 0., 5.),
            Point::with_z(1., 1., 5.),
            Point::with_z(0., 1., 5.),
        ];
        let mesh = triangulate(outer, vec![], vec![], MeshConfig::new()).unwrap();
        for p in mesh.points() {
            assert_eq!(p[2], 5.0);
        }
    }
}
