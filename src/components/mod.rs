//! Mesh components and their evaluation contract.

use crate::geom::{MeshError, SplineError, TransformError, WingMesh};

pub mod complex_step;
pub mod geometry_mesh;

pub use complex_step::{
    DesignVariable, MeshDerivative, complex_step_derivative, complex_step_jacobian,
    evaluate_many,
};
pub use geometry_mesh::{DEFAULT_SPAN, GeometryMesh, ParameterSet};

/// Error type for component evaluations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("expected {expected} twist control points, got {actual}")]
    TwistLengthMismatch { expected: usize, actual: usize },
    #[error("span must be positive, got {0}")]
    NonPositiveSpan(f64),
    #[error("parameter `{name}` is not finite")]
    NonFiniteParameter { name: &'static str },
    #[error("twist control point {index} does not exist ({num_twist} defined)")]
    TwistIndexOutOfRange { index: usize, num_twist: usize },
    #[error("complex step must be finite and positive, got {0}")]
    InvalidStep(f64),
    #[error("baseline mesh must be a symmetric full mesh: {0}")]
    Baseline(MeshError),
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error(transparent)]
    Spline(#[from] SplineError),
    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Result of a single component evaluation.
pub type ComponentResult = Result<WingMesh, GeometryError>;

/// A component that turns a parameter set into a deformed mesh.
///
/// Implementations must be pure: the same parameters always produce the same
/// mesh, and no evaluation observes another's working state.
pub trait MeshComponent {
    fn evaluate(&self, params: &ParameterSet) -> ComponentResult;

    /// `(num_x, num_y)` of every mesh returned by [`MeshComponent::evaluate`].
    fn output_shape(&self) -> (usize, usize);
}
