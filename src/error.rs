/// Everything that can go wrong between handing loops in and getting a
/// [`Mesh`](crate::Mesh) back. Every failure aborts the call atomically:
/// no handle is produced and nothing allocated by the failed attempt
/// survives.
#[derive(thiserror::Error, Debug)]
pub enum MeshError {
    /// Empty or unclosed loop, fewer than 3 distinct vertices, a bad
    /// configuration value, or a wrongly sized copy buffer.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Two constraint edges cross at a non-shared point or overlap.
    /// The offending edges are reported as PSLG vertex-index pairs.
    #[error("constraint edges ({}, {}) and ({}, {}) intersect improperly", first.0, first.1, second.0, second.1)]
    IntersectingConstraints {
        first: (u32, u32),
        second: (u32, u32),
    },

    /// All input points coincident or collinear, no 2D triangulation exists.
    #[error("degenerate geometry: input points do not span two dimensions")]
    DegenerateGeometry,

    /// A constraint edge could not be realized by flipping. Validation
    /// should rule this out; it guards floating point near-degeneracies.
    #[error("failed to enforce a constraint edge")]
    ConstraintEnforcementFailed,

    /// Quality refinement hit its Steiner-point budget before satisfying
    /// the requested bounds.
    #[error("refinement did not converge within the Steiner point budget")]
    RefinementDidNotConverge,

    /// Memory reservation failed while building the mesh.
    #[error("allocation failure during mesh construction")]
    AllocationFailure,
}

impl From<std::collections::TryReserveError> for MeshError {
    fn from(_: std::collections::TryReserveError) -> Self {
        MeshError::AllocationFailure
    }
}
