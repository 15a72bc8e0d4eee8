use crate::error::MeshError;
use crate::points::{PointId, PointStore};
use crate::predicates::{orient_2d, segment_relation, SegmentRelation};
use crate::shape::{Loop, LoopRole, Point};

/// The merged planar straight-line graph: one deduplicated vertex store
/// plus the constraint edge cycles contributed by every input loop. Loop
/// polygons survive (with merged coordinates) for region classification.
#[derive(Debug)]
pub struct Pslg {
    pub points: PointStore,
    /// Constraint edges as recorded, normalized so `e.0 < e.1`. Duplicates
    /// are kept here; the validator reports them, output assembly dedups.
    pub edges: Vec<(PointId, PointId)>,
    pub outer_polygon: Vec<Point>,
    pub hole_polygons: Vec<Vec<Point>>,
}

impl Pslg {
    /// Merge the loops into one graph. Loop-level validation (closure,
    /// distinct count) already happened in [`Loop::new`]; this rejects
    /// inputs that do not span two dimensions.
    pub fn assemble(outer: &Loop, holes: &[Loop], buildings: &[Loop]) -> Result<Self, MeshError> {
        debug_assert_eq!(outer.role(), LoopRole::Outer);

        let total: usize = outer.points().len()
            + holes.iter().map(|l| l.points().len()).sum::<usize>()
            + buildings.iter().map(|l| l.points().len()).sum::<usize>();

        let mut points = PointStore::with_capacity(total)?;
        let mut edges = Vec::new();
        edges.try_reserve(total)?;

        let add_loop = |l: &Loop, points: &mut PointStore, edges: &mut Vec<(PointId, PointId)>| {
            let ids: Vec<PointId> = l.points().iter().map(|p| points.insert_merged(*p)).collect();
            let n = ids.len();
            for i in 0..n {
                let a = ids[i];
                let b = ids[(i + 1) % n];
                if a != b {
                    edges.push(normalize(a, b));
                }
            }
            ids
        };

        let outer_ids = add_loop(outer, &mut points, &mut edges);
        let outer_polygon = outer_ids.iter().map(|id| points.get(*id)).collect();

        let mut hole_polygons = Vec::with_capacity(holes.len());
        for hole in holes {
            let ids = add_loop(hole, &mut points, &mut edges);
            hole_polygons.push(ids.iter().map(|id| points.get(*id)).collect());
        }
        for building in buildings {
            add_loop(building, &mut points, &mut edges);
        }

        let pslg = Self {
            points,
            edges,
            outer_polygon,
            hole_polygons,
        };
        pslg.check_spans_plane()?;
        Ok(pslg)
    }

    fn check_spans_plane(&self) -> Result<(), MeshError> {
        if self.points.len() < 3 {
            return Err(MeshError::DegenerateGeometry);
        }
        let mut iter = self.points.iter();
        let (_, &a) = iter.next().unwrap();
        let mut b = None;
        for (_, p) in iter {
            match b {
                None => {
                    if !p.coincides(&a) {
                        b = Some(*p);
                    }
                }
                Some(b) => {
                    if !orient_2d(a, b, *p).is_collinear() {
                        return Ok(());
                    }
                }
            }
        }
        Err(MeshError::DegenerateGeometry)
    }

    /// Check every pair of constraint edges for improper intersection:
    /// crossing at a non-shared point, touching another edge's interior,
    /// or overlapping collinearly (total overlap, i.e. a duplicated edge,
    /// included). Edge pairs are pruned by x-interval before the exact
    /// test; still O(n^2) in the worst case, which the contract allows.
    pub fn validate_constraints(&self) -> Result<(), MeshError> {
        #[derive(Clone, Copy)]
        struct Span {
            edge: (PointId, PointId),
            min_x: f64,
            max_x: f64,
        }

        let mut spans: Vec<Span> = self
            .edges
            .iter()
            .map(|&(p, q)| {
                let a = self.points.get(p);
                let b = self.points.get(q);
                Span {
                    edge: (p, q),
                    min_x: a.x.min(b.x),
                    max_x: a.x.max(b.x),
                }
            })
            .collect();
        spans.sort_by(|s1, s2| s1.min_x.total_cmp(&s2.min_x));

        let mut active: Vec<Span> = Vec::new();
        for span in spans {
            active.retain(|s| s.max_x >= span.min_x);
            for other in &active {
                self.check_pair(other.edge, span.edge)?;
            }
            active.push(span);
        }
        Ok(())
    }

    fn check_pair(
        &self,
        e1: (PointId, PointId),
        e2: (PointId, PointId),
    ) -> Result<(), MeshError> {
        let violation = |kind: SegmentRelation, shared: usize| match shared {
            // same vertex pair twice is a total overlap
            2 => true,
            // a shared endpoint is fine unless the edges run along each other
            1 => kind == SegmentRelation::Overlapping,
            // independent edges must not meet at all
            _ => kind != SegmentRelation::Disjoint,
        };

        let shared = [e1.0, e1.1]
            .iter()
            .filter(|v| **v == e2.0 || **v == e2.1)
            .count();
        let kind = segment_relation(
            self.points.get(e1.0),
            self.points.get(e1.1),
            self.points.get(e2.0),
            self.points.get(e2.1),
        );

        if violation(kind, shared) {
            return Err(MeshError::IntersectingConstraints {
                first: (e1.0.as_u32(), e1.1.as_u32()),
                second: (e2.0.as_u32(), e2.1.as_u32()),
            });
        }
        Ok(())
    }
}

fn normalize(a: PointId, b: PointId) -> (PointId, PointId) {
    if a.0 < b.0 {
        (a, b)
    } else {
        (b, a)
    }
}
