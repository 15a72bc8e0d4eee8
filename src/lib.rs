//! Constrained Delaunay triangulation over planar straight-line graphs,
//! with Ruppert-style quality refinement and hole exclusion.
//!
//! An outer boundary loop, optional hole loops, and optional building
//! loops go in; a compact mesh of points, counter-clockwise triangles,
//! and constraint edges comes out, behind an owned handle released
//! exactly once.
//!
//! ```rust
//! use planemesh::{MeshConfig, Point, TriangulatorBuilder};
//!
//! let mesh = TriangulatorBuilder::new(vec![
//!     Point::new(0., 0.),
//!     Point::new(1., 0.),
//!     Point::new(1., 1.),
//!     Point::new(0., 1.),
//! ])
//! .with_config(MeshConfig::new())
//! .build()
//! .unwrap()
//! .triangulate()
//! .unwrap();
//!
//! assert_eq!(mesh.triangle_count(), 2);
//! mesh.release();
//! ```

mod config;
mod constraint;
mod delaunay;
mod error;
mod mesh;
mod points;
mod predicates;
mod pslg;
mod refine;
mod region;
mod shape;
mod triangles;
mod triangulator;

pub mod loader;

pub use config::{MeshConfig, QualityPreset};
pub use error::MeshError;
pub use mesh::Mesh;
pub use points::PointId;
pub use shape::{Loop, LoopRole, Point};
pub use triangulator::{triangulate, Triangulator, TriangulatorBuilder};
