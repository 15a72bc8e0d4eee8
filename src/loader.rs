//! Textual adapter: the same parameters as the core API, as a structured
//! JSON document with the field names the surrounding tooling speaks
//! (`outer`, `inner_loops`, `maxh`, `quality`, `enforce_constraints`,
//! `min_angle`, `exclude_holes`).
//!
//! `maxh` is the target maximum edge length and maps straight onto
//! [`MeshConfig::target_max_edge_length`]; engines that only bound
//! triangle area would use `area = 0.433 * maxh^2` (the equilateral
//! triangle relationship) instead. A `maxh` of zero or less means no
//! length bound.

use serde::{Deserialize, Serialize};

use crate::config::{MeshConfig, QualityPreset};
use crate::error::MeshError;
use crate::mesh::Mesh;
use crate::shape::Point;
use crate::triangulator::TriangulatorBuilder;

#[derive(Debug, Deserialize)]
pub struct MeshDocument {
    pub outer: Vec<[f64; 2]>,
    /// Hole loops.
    #[serde(default)]
    pub inner_loops: Vec<Vec<[f64; 2]>>,
    /// Constraint loops whose interior stays meshed.
    #[serde(default)]
    pub building_loops: Vec<Vec<[f64; 2]>>,
    #[serde(default)]
    pub maxh: Option<f64>,
    #[serde(default = "default_quality")]
    pub quality: String,
    #[serde(default = "default_true")]
    pub enforce_constraints: bool,
    #[serde(default)]
    pub min_angle: Option<f64>,
    #[serde(default)]
    pub exclude_holes: Option<bool>,
}

fn default_quality() -> String {
    "default".to_string()
}

fn default_true() -> bool {
    true
}

impl MeshDocument {
    pub fn from_json(source: &str) -> Result<Self, MeshError> {
        serde_json::from_str(source)
            .map_err(|err| MeshError::InvalidInput(format!("malformed document: {err}")))
    }

    /// Map the document onto a core builder.
    pub fn into_builder(self) -> Result<TriangulatorBuilder, MeshError> {
        let preset = match self.quality.as_str() {
            "default" => QualityPreset::None,
            "moderate" => QualityPreset::Moderate,
            other => {
                return Err(MeshError::InvalidInput(format!(
                    "unknown quality preset {other:?}, expected \"default\" or \"moderate\""
                )))
            }
        };

        let mut config = MeshConfig::new()
            .with_quality_preset(preset)
            .enforce_constraints(self.enforce_constraints)
            .exclude_holes(self.exclude_holes.unwrap_or(true));
        if let Some(maxh) = self.maxh {
            if maxh > 0. {
                config = config.with_max_edge_length(maxh);
            }
        }
        if let Some(min_angle) = self.min_angle {
            config = config.with_min_angle_degrees(min_angle);
        }

        let to_points = |raw: Vec<[f64; 2]>| raw.into_iter().map(|[x, y]| Point::new(x, y)).collect();
        Ok(TriangulatorBuilder::new(to_points(self.outer))
            .add_holes(self.inner_loops.into_iter().map(to_points))
            .add_building_loops(self.building_loops.into_iter().map(to_points))
            .with_config(config))
    }
}

/// Serialized result document.
#[derive(Debug, Serialize)]
pub struct MeshOutput {
    pub points: Vec<[f64; 3]>,
    pub triangles: Vec<[u32; 3]>,
    pub constraint_edges: Vec<[u32; 2]>,
}

impl MeshOutput {
    pub fn from_mesh(mesh: &Mesh) -> Self {
        Self {
            points: mesh.points().to_vec(),
            triangles: mesh.triangles().to_vec(),
            constraint_edges: mesh.edges().to_vec(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("plain arrays always serialize")
    }
}
