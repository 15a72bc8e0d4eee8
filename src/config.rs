use crate::error::MeshError;

/// Named shorthand for a minimum-angle bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityPreset {
    /// No angle bound.
    #[default]
    None,
    /// 25 degree minimum interior angle.
    Moderate,
}

impl QualityPreset {
    pub(crate) fn min_angle_deg(&self) -> Option<f64> {
        match self {
            QualityPreset::None => None,
            QualityPreset::Moderate => Some(25.0),
        }
    }
}

/// Triangulation and refinement configuration.
///
/// `min_angle_degrees` always wins over `quality_preset` when both are
/// present.
///
/// # Example
/// ```rust
/// use planemesh::{MeshConfig, QualityPreset};
///
/// let config = MeshConfig::new()
///     .with_max_edge_length(1.0)
///     .with_quality_preset(QualityPreset::Moderate);
/// ```
#[derive(Debug, Clone)]
pub struct MeshConfig {
    /// Longest edge allowed in the refined mesh. `None` disables the
    /// length criterion.
    pub target_max_edge_length: Option<f64>,
    pub quality_preset: QualityPreset,
    /// Explicit minimum interior angle in degrees, (0, 60]. Overrides the
    /// preset.
    pub min_angle_degrees: Option<f64>,
    /// Force PSLG edges into the triangulation (the defining property of a
    /// CDT). When false, constraint edges are recorded for output only.
    pub enforce_constraints: bool,
    /// Drop triangles inside hole loops from the result.
    pub exclude_holes: bool,
    /// Refinement safety bound. `None` means 10x the input vertex count
    /// plus a floor of 10000 so tiny inputs can still refine down to fine
    /// meshes.
    pub max_steiner_points: Option<usize>,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            target_max_edge_length: None,
            quality_preset: QualityPreset::None,
            min_angle_degrees: None,
            enforce_constraints: true,
            exclude_holes: true,
            max_steiner_points: None,
        }
    }
}

impl MeshConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_edge_length(mut self, length: f64) -> Self {
        self.target_max_edge_length = Some(length);
        self
    }

    pub fn with_quality_preset(mut self, preset: QualityPreset) -> Self {
        self.quality_preset = preset;
        self
    }

    pub fn with_min_angle_degrees(mut self, degrees: f64) -> Self {
        self.min_angle_degrees = Some(degrees);
        self
    }

    pub fn enforce_constraints(mut self, enforce: bool) -> Self {
        self.enforce_constraints = enforce;
        self
    }

    pub fn exclude_holes(mut self, exclude: bool) -> Self {
        self.exclude_holes = exclude;
        self
    }

    pub fn with_max_steiner_points(mut self, count: usize) -> Self {
        self.max_steiner_points = Some(count);
        self
    }

    /// Effective minimum angle after precedence, `None` when angle
    /// refinement is off.
    pub(crate) fn effective_min_angle_deg(&self) -> Option<f64> {
        self.min_angle_degrees.or(self.quality_preset.min_angle_deg())
    }

    /// Whether any refinement criterion is active.
    pub(crate) fn wants_refinement(&self) -> bool {
        self.target_max_edge_length.is_some() || self.effective_min_angle_deg().is_some()
    }

    pub(crate) fn validate(&self) -> Result<(), MeshError> {
        if let Some(len) = self.target_max_edge_length {
            if !(len > 0.) || !len.is_finite() {
                return Err(MeshError::InvalidInput(format!(
                    "target_max_edge_length must be a positive finite number, got {len}"
                )));
            }
        }
        if let Some(angle) = self.min_angle_degrees {
            if !(angle > 0. && angle <= 60.) {
                return Err(MeshError::InvalidInput(format!(
                    "min_angle_degrees must lie in (0, 60], got {angle}"
                )));
            }
        }
        Ok(())
    }
}
