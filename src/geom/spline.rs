//! Control-point to mesh-station interpolation matrices.
//!
//! Design variables such as twist are defined at a handful of control points
//! and expanded to one value per spanwise station through a dense
//! `num_pt × num_cp` matrix. The pipeline only depends on the
//! [`SplineBuilder`] seam; [`BSplineBuilder`] is the default implementation
//! (clamped uniform knots, Cox–de Boor basis).
//!
//! Matrices depend on resolution alone, so they are real-valued even though
//! the control values they are applied to are complex.

use super::core::{Scalar, Tolerance, ZERO, linspace};
use super::mesh::WingMesh;

/// Cubic B-spline (order 4), used for twist control points.
pub const DEFAULT_ORDER: usize = 4;

/// Piecewise-linear interpolation (order 2), used for the taper profile.
pub const LINEAR_ORDER: usize = 2;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SplineError {
    #[error("interpolation needs at least one control point")]
    NoControlPoints,
    #[error("interpolation needs at least one output station")]
    NoStations,
    #[error("spline order must be at least 1")]
    ZeroOrder,
    #[error("station parameter {index} must lie in [0, 1], got {value}")]
    InvalidParameter { index: usize, value: f64 },
    #[error("expected {expected} control values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

// ============================================================================
// Interpolation matrix
// ============================================================================

/// Dense row-major `rows × cols` matrix mapping control values to stations.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolationMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl InterpolationMatrix {
    #[must_use]
    pub fn identity(n: usize) -> Self {
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            data[i * n + i] = 1.0;
        }
        Self {
            rows: n,
            cols: n,
            data,
        }
    }

    /// Number of output stations.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of control points.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    #[must_use]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Expand control values to one value per station.
    ///
    /// # Errors
    /// Returns [`SplineError::LengthMismatch`] when `values.len() != cols()`.
    pub fn apply(&self, values: &[Scalar]) -> Result<Vec<Scalar>, SplineError> {
        if values.len() != self.cols {
            return Err(SplineError::LengthMismatch {
                expected: self.cols,
                actual: values.len(),
            });
        }
        Ok((0..self.rows)
            .map(|r| {
                self.row(r)
                    .iter()
                    .zip(values)
                    .fold(ZERO, |acc, (&w, &v)| acc + v * w)
            })
            .collect())
    }
}

// ============================================================================
// Builder seam
// ============================================================================

/// Produces the interpolation matrix for a given resolution.
///
/// Implementations must reproduce linear interpolation at order 2 and return
/// the identity when `num_cp == num_pt`.
pub trait SplineBuilder {
    /// # Errors
    /// Returns a [`SplineError`] for empty resolutions or a zero order.
    fn interpolation_matrix(
        &self,
        num_cp: usize,
        num_pt: usize,
        reference: &WingMesh,
        order: usize,
    ) -> Result<InterpolationMatrix, SplineError>;
}

/// Where the output stations sit on the spline parameter axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parametrization {
    /// Stations evenly spaced in `[0, 1]`.
    #[default]
    Uniform,
    /// Normalised leading-edge `y` of the reference mesh. Falls back to
    /// uniform when the reference does not have `num_pt` stations.
    Spanwise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BSplineBuilder {
    pub parametrization: Parametrization,
}

impl BSplineBuilder {
    #[must_use]
    pub const fn new(parametrization: Parametrization) -> Self {
        Self { parametrization }
    }

    fn station_parameters(&self, num_pt: usize, reference: &WingMesh) -> Vec<f64> {
        if self.parametrization == Parametrization::Spanwise {
            if reference.num_y() == num_pt && reference.num_x() > 0 {
                if let Some(params) = spanwise_parameters(reference.leading_edge()) {
                    return params;
                }
            }
            log::debug!(
                "spanwise parametrization unavailable for {num_pt} stations, using uniform"
            );
        }
        linspace(0.0, 1.0, num_pt)
    }
}

impl SplineBuilder for BSplineBuilder {
    fn interpolation_matrix(
        &self,
        num_cp: usize,
        num_pt: usize,
        reference: &WingMesh,
        order: usize,
    ) -> Result<InterpolationMatrix, SplineError> {
        if num_cp == 0 {
            return Err(SplineError::NoControlPoints);
        }
        if num_pt == 0 {
            return Err(SplineError::NoStations);
        }
        if order == 0 {
            return Err(SplineError::ZeroOrder);
        }
        if num_cp == num_pt {
            return Ok(InterpolationMatrix::identity(num_pt));
        }
        let params = self.station_parameters(num_pt, reference);
        bspline_matrix_at(num_cp, &params, order)
    }
}

fn spanwise_parameters(leading_edge: &[[Scalar; 3]]) -> Option<Vec<f64>> {
    let first = leading_edge.first()?[1].re;
    let last = leading_edge.last()?[1].re;
    let extent = last - first;
    if extent.abs() <= Tolerance::ZERO_LENGTH.eps {
        return None;
    }
    Some(
        leading_edge
            .iter()
            .map(|p| ((p[1].re - first) / extent).clamp(0.0, 1.0))
            .collect(),
    )
}

// ============================================================================
// B-spline basis
// ============================================================================

/// Uniformly parametrised B-spline matrix (`num_pt` stations on `[0, 1]`).
///
/// # Errors
/// See [`bspline_matrix_at`].
pub fn bspline_matrix(
    num_cp: usize,
    num_pt: usize,
    order: usize,
) -> Result<InterpolationMatrix, SplineError> {
    if num_pt == 0 {
        return Err(SplineError::NoStations);
    }
    bspline_matrix_at(num_cp, &linspace(0.0, 1.0, num_pt), order)
}

/// B-spline matrix evaluated at explicit station parameters in `[0, 1]`.
///
/// The order is clamped to `num_cp`, so a single control point yields a
/// constant distribution.
///
/// # Errors
/// Returns a [`SplineError`] for empty inputs, a zero order, or parameters
/// outside `[0, 1]`.
pub fn bspline_matrix_at(
    num_cp: usize,
    params: &[f64],
    order: usize,
) -> Result<InterpolationMatrix, SplineError> {
    if num_cp == 0 {
        return Err(SplineError::NoControlPoints);
    }
    if params.is_empty() {
        return Err(SplineError::NoStations);
    }
    if order == 0 {
        return Err(SplineError::ZeroOrder);
    }
    if let Some((index, &value)) = params
        .iter()
        .enumerate()
        .find(|(_, t)| !t.is_finite() || **t < 0.0 || **t > 1.0)
    {
        return Err(SplineError::InvalidParameter { index, value });
    }

    let order = order.min(num_cp);
    let degree = order - 1;
    let knots = clamped_uniform_knots(num_cp, order);

    let mut data = vec![0.0; params.len() * num_cp];
    for (r, &t) in params.iter().enumerate() {
        for c in 0..num_cp {
            data[r * num_cp + c] = basis_function(c, degree, t, &knots);
        }
    }

    log::debug!(
        "built {}x{num_cp} b-spline matrix (order {order})",
        params.len()
    );

    Ok(InterpolationMatrix {
        rows: params.len(),
        cols: num_cp,
        data,
    })
}

/// Clamped knot vector of length `num_cp + order` with uniform interior knots.
fn clamped_uniform_knots(num_cp: usize, order: usize) -> Vec<f64> {
    let mut knots = vec![0.0; num_cp + order];
    let interior = linspace(0.0, 1.0, num_cp - order + 2);
    knots[order - 1..=num_cp].copy_from_slice(&interior);
    for knot in &mut knots[num_cp + 1..] {
        *knot = 1.0;
    }
    knots
}

/// Computes the B-spline basis function N_{i,p}(t) using the Cox-de Boor recursion.
///
/// Spans are half-open except the last non-empty one, which also owns `t == 1`.
fn basis_function(i: usize, p: usize, t: f64, knots: &[f64]) -> f64 {
    if p == 0 {
        let (lo, hi) = (knots[i], knots[i + 1]);
        if t >= lo && t < hi {
            return 1.0;
        }
        let end = knots[knots.len() - 1];
        if lo < hi && hi == end && t == end {
            return 1.0;
        }
        return 0.0;
    }

    let mut result = 0.0;

    // Left term: (t - t_i) / (t_{i+p} - t_i) * N_{i,p-1}(t)
    let denom1 = knots[i + p] - knots[i];
    if denom1 > 0.0 {
        result += (t - knots[i]) / denom1 * basis_function(i, p - 1, t, knots);
    }

    // Right term: (t_{i+p+1} - t) / (t_{i+p+1} - t_{i+1}) * N_{i+1,p-1}(t)
    let denom2 = knots[i + p + 1] - knots[i + 1];
    if denom2 > 0.0 {
        result += (knots[i + p + 1] - t) / denom2 * basis_function(i + 1, p - 1, t, knots);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knots_are_clamped() {
        assert_eq!(clamped_uniform_knots(4, 2), vec![0.0, 0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0, 1.0]);
        assert_eq!(clamped_uniform_knots(3, 3), vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        assert_eq!(clamped_uniform_knots(1, 1), vec![0.0, 1.0]);
    }

    #[test]
    fn interior_knot_is_not_double_counted() {
        let knots = clamped_uniform_knots(3, 2);
        let total: f64 = (0..3).map(|i| basis_function(i, 1, 0.5, &knots)).sum();
        assert!((total - 1.0).abs() < 1e-14);
        assert!((basis_function(1, 1, 0.5, &knots) - 1.0).abs() < 1e-14);
    }

    #[test]
    fn right_endpoint_belongs_to_last_control_point() {
        let knots = clamped_uniform_knots(5, 4);
        assert!((basis_function(4, 3, 1.0, &knots) - 1.0).abs() < 1e-14);
        assert!(basis_function(3, 3, 1.0, &knots).abs() < 1e-14);
    }
}
