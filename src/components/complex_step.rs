//! Complex-step derivatives of mesh components.
//!
//! Perturbing one parameter by `i·h` and evaluating once yields
//! `∂mesh/∂p = Im(mesh) / h` with no subtractive cancellation, so `h` can be
//! as small as [`Tolerance::COMPLEX_STEP`](crate::geom::Tolerance::COMPLEX_STEP).

use std::fmt;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::geom::{Scalar, WingMesh};

use super::{GeometryError, MeshComponent, ParameterSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DesignVariable {
    Span,
    Sweep,
    Dihedral,
    /// Twist control point by index.
    Twist(usize),
    Taper,
}

impl DesignVariable {
    /// Every variable of a parameter set with `num_twist` control points, in
    /// Jacobian column order.
    #[must_use]
    pub fn all(num_twist: usize) -> Vec<Self> {
        let mut vars = vec![Self::Span, Self::Sweep, Self::Dihedral];
        vars.extend((0..num_twist).map(Self::Twist));
        vars.push(Self::Taper);
        vars
    }

    fn slot<'a>(self, params: &'a mut ParameterSet) -> Result<&'a mut Scalar, GeometryError> {
        match self {
            Self::Span => Ok(&mut params.span),
            Self::Sweep => Ok(&mut params.sweep),
            Self::Dihedral => Ok(&mut params.dihedral),
            Self::Taper => Ok(&mut params.taper),
            Self::Twist(index) => {
                let num_twist = params.twist.len();
                params
                    .twist
                    .get_mut(index)
                    .ok_or(GeometryError::TwistIndexOutOfRange { index, num_twist })
            }
        }
    }
}

impl fmt::Display for DesignVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Span => f.write_str("span"),
            Self::Sweep => f.write_str("sweep"),
            Self::Dihedral => f.write_str("dihedral"),
            Self::Twist(i) => write!(f, "twist[{i}]"),
            Self::Taper => f.write_str("taper"),
        }
    }
}

/// Derivative of every mesh coordinate with respect to one variable.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshDerivative {
    pub variable: DesignVariable,
    pub num_x: usize,
    pub num_y: usize,
    /// Row-major like [`WingMesh`].
    pub values: Vec<[f64; 3]>,
}

impl MeshDerivative {
    fn from_mesh(variable: DesignVariable, mesh: &WingMesh, step: f64) -> Self {
        let values = mesh
            .imag_points()
            .into_iter()
            .map(|p| [p[0] / step, p[1] / step, p[2] / step])
            .collect();
        Self {
            variable,
            num_x: mesh.num_x(),
            num_y: mesh.num_y(),
            values,
        }
    }

    #[must_use]
    pub fn get(&self, ix: usize, iy: usize) -> [f64; 3] {
        self.values[ix * self.num_y + iy]
    }

    /// Largest absolute component.
    #[must_use]
    pub fn max_abs(&self) -> f64 {
        self.values
            .iter()
            .flatten()
            .fold(0.0, |acc, v| acc.max(v.abs()))
    }
}

/// `∂mesh/∂variable` at `params` by a single complex evaluation.
///
/// # Errors
/// Returns [`GeometryError::InvalidStep`] for a non-positive step,
/// [`GeometryError::TwistIndexOutOfRange`] for an unknown twist index, and
/// any error of the evaluation itself.
pub fn complex_step_derivative<C>(
    component: &C,
    params: &ParameterSet,
    variable: DesignVariable,
    step: f64,
) -> Result<MeshDerivative, GeometryError>
where
    C: MeshComponent + ?Sized,
{
    if !step.is_finite() || step <= 0.0 {
        return Err(GeometryError::InvalidStep(step));
    }
    let mut perturbed = params.clone();
    *variable.slot(&mut perturbed)? += Scalar::new(0.0, step);

    let mesh = component.evaluate(&perturbed)?;
    Ok(MeshDerivative::from_mesh(variable, &mesh, step))
}

/// One [`MeshDerivative`] per [`DesignVariable::all`] entry.
///
/// # Errors
/// Returns the first error of any column.
pub fn complex_step_jacobian<C>(
    component: &C,
    params: &ParameterSet,
    step: f64,
) -> Result<Vec<MeshDerivative>, GeometryError>
where
    C: MeshComponent + Sync + ?Sized,
{
    let vars = DesignVariable::all(params.twist.len());
    log::debug!("complex-step jacobian: {} columns, step {step:e}", vars.len());
    jacobian_columns(component, params, vars, step)
}

#[cfg(feature = "parallel")]
fn jacobian_columns<C>(
    component: &C,
    params: &ParameterSet,
    vars: Vec<DesignVariable>,
    step: f64,
) -> Result<Vec<MeshDerivative>, GeometryError>
where
    C: MeshComponent + Sync + ?Sized,
{
    vars.into_par_iter()
        .map(|var| complex_step_derivative(component, params, var, step))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn jacobian_columns<C>(
    component: &C,
    params: &ParameterSet,
    vars: Vec<DesignVariable>,
    step: f64,
) -> Result<Vec<MeshDerivative>, GeometryError>
where
    C: MeshComponent + Sync + ?Sized,
{
    vars.into_iter()
        .map(|var| complex_step_derivative(component, params, var, step))
        .collect()
}

/// Evaluate independent components (e.g. one per flight condition) with the
/// same parameters. Results keep the order of `components`.
///
/// # Errors
/// Returns the first evaluation error.
#[cfg(feature = "parallel")]
pub fn evaluate_many<C>(components: &[C], params: &ParameterSet) -> Result<Vec<WingMesh>, GeometryError>
where
    C: MeshComponent + Sync,
{
    components.par_iter().map(|c| c.evaluate(params)).collect()
}

/// Evaluate independent components (e.g. one per flight condition) with the
/// same parameters. Results keep the order of `components`.
///
/// # Errors
/// Returns the first evaluation error.
#[cfg(not(feature = "parallel"))]
pub fn evaluate_many<C>(components: &[C], params: &ParameterSet) -> Result<Vec<WingMesh>, GeometryError>
where
    C: MeshComponent + Sync,
{
    components.iter().map(|c| c.evaluate(params)).collect()
}
