//! Parametric wing deformation component.
//!
//! [`GeometryMesh`] owns an immutable full baseline mesh and, for each
//! [`ParameterSet`], derives a fresh copy, runs the fixed pipeline
//! stretch → sweep → twist → dihedral → taper and returns the half-mesh up to
//! and including the symmetry plane.

use crate::geom::{
    BSplineBuilder, DEFAULT_ORDER, InterpolationMatrix, Scalar, SplineBuilder, WingMesh, dihedral,
    is_finite, real, rotate, stretch, sweep, taper_profile_matrix, taper_with_profile,
};

use super::{ComponentResult, GeometryError, MeshComponent};

/// Full span of the CRM wing, the default design value.
pub const DEFAULT_SPAN: f64 = 58.7630524;

// ============================================================================
// Parameters
// ============================================================================

/// Design parameters for one evaluation.
///
/// Every field is complex so any of them can carry a complex-step
/// perturbation. Angles are in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    pub span: Scalar,
    pub sweep: Scalar,
    pub dihedral: Scalar,
    /// Twist at the control points, expanded to stations by the spline.
    pub twist: Vec<Scalar>,
    pub taper: Scalar,
}

impl ParameterSet {
    /// Defaults: span [`DEFAULT_SPAN`], no sweep, dihedral or twist, taper 1.
    #[must_use]
    pub fn new(num_twist: usize) -> Self {
        Self {
            span: real(DEFAULT_SPAN),
            sweep: real(0.0),
            dihedral: real(0.0),
            twist: vec![real(0.0); num_twist],
            taper: real(1.0),
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: f64) -> Self {
        self.span = real(span);
        self
    }

    #[must_use]
    pub fn with_sweep(mut self, degrees: f64) -> Self {
        self.sweep = real(degrees);
        self
    }

    #[must_use]
    pub fn with_dihedral(mut self, degrees: f64) -> Self {
        self.dihedral = real(degrees);
        self
    }

    #[must_use]
    pub fn with_twist(mut self, degrees: &[f64]) -> Self {
        self.twist = degrees.iter().copied().map(real).collect();
        self
    }

    #[must_use]
    pub fn with_taper(mut self, ratio: f64) -> Self {
        self.taper = real(ratio);
        self
    }

    fn scalars(&self) -> impl Iterator<Item = (&'static str, Scalar)> + '_ {
        [
            ("span", self.span),
            ("sweep", self.sweep),
            ("dihedral", self.dihedral),
            ("taper", self.taper),
        ]
        .into_iter()
        .chain(self.twist.iter().map(|&t| ("twist", t)))
    }
}

// ============================================================================
// Component
// ============================================================================

#[derive(Debug, Clone)]
pub struct GeometryMesh {
    baseline: WingMesh,
    num_twist: usize,
    half: usize,
    twist_matrix: InterpolationMatrix,
    taper_matrix: InterpolationMatrix,
}

impl GeometryMesh {
    /// Component over a full symmetric baseline with `num_twist` twist
    /// control points, using the default B-spline builder.
    ///
    /// # Errors
    /// See [`GeometryMesh::with_builder`].
    pub fn new(baseline: WingMesh, num_twist: usize) -> Result<Self, GeometryError> {
        Self::with_builder(baseline, num_twist, &BSplineBuilder::default())
    }

    /// Component with a custom spline builder.
    ///
    /// Both interpolation matrices are derived here, once, since the baseline
    /// resolution and `num_twist` never change afterwards.
    ///
    /// # Errors
    /// Returns [`GeometryError::Baseline`] for a baseline with fewer than 2
    /// chordwise or 3 spanwise stations, an even spanwise count, non-finite
    /// points, a non-positive span or a zero root chord, and [`GeometryError::Spline`] when `num_twist` is zero.
    pub fn with_builder(
        baseline: WingMesh,
        num_twist: usize,
        builder: &impl SplineBuilder,
    ) -> Result<Self, GeometryError> {
        baseline
            .require_stations(2, 3)
            .and_then(|()| baseline.require_odd_span())
            .and_then(|()| baseline.validate_finite())
            .and_then(|()| baseline.require_planform_extent())
            .map_err(GeometryError::Baseline)?;

        let n = baseline.num_y();
        let twist_matrix = builder.interpolation_matrix(num_twist, n, &baseline, DEFAULT_ORDER)?;
        let taper_matrix = taper_profile_matrix(&baseline, builder)?;

        log::debug!(
            "GeometryMesh: baseline {}x{n}, {num_twist} twist control points",
            baseline.num_x()
        );

        Ok(Self {
            half: (n - 1) / 2,
            baseline,
            num_twist,
            twist_matrix,
            taper_matrix,
        })
    }

    #[must_use]
    pub fn baseline(&self) -> &WingMesh {
        &self.baseline
    }

    #[must_use]
    pub const fn num_twist(&self) -> usize {
        self.num_twist
    }

    /// Spanwise index of the symmetry-plane station in the baseline.
    #[must_use]
    pub const fn half_index(&self) -> usize {
        self.half
    }

    /// Leading-edge spanwise extent of the baseline.
    #[must_use]
    pub fn baseline_span(&self) -> f64 {
        let le = self.baseline.leading_edge();
        le[le.len() - 1][1].re - le[0][1].re
    }

    /// Parameters that reproduce the baseline half-mesh unchanged.
    #[must_use]
    pub fn default_parameters(&self) -> ParameterSet {
        ParameterSet::new(self.num_twist).with_span(self.baseline_span())
    }

    /// Expand twist control values to one angle per baseline station.
    ///
    /// # Errors
    /// Returns [`GeometryError::TwistLengthMismatch`] unless
    /// `twist.len() == num_twist`.
    pub fn twist_distribution(&self, twist: &[Scalar]) -> Result<Vec<Scalar>, GeometryError> {
        if twist.len() != self.num_twist {
            return Err(GeometryError::TwistLengthMismatch {
                expected: self.num_twist,
                actual: twist.len(),
            });
        }
        Ok(self.twist_matrix.apply(twist)?)
    }

    fn check(&self, params: &ParameterSet) -> Result<(), GeometryError> {
        if let Some((name, _)) = params.scalars().find(|(_, v)| !is_finite(*v)) {
            return Err(GeometryError::NonFiniteParameter { name });
        }
        if params.span.re <= 0.0 {
            return Err(GeometryError::NonPositiveSpan(params.span.re));
        }
        if params.taper.re <= 0.0 || params.taper.re > 1.0 {
            log::warn!("taper ratio {} is outside (0, 1]", params.taper.re);
        }
        if params.sweep.re.abs() >= 90.0 {
            log::warn!("sweep angle {} deg is at or beyond 90", params.sweep.re);
        }
        if params.dihedral.re.abs() >= 90.0 {
            log::warn!("dihedral angle {} deg is at or beyond 90", params.dihedral.re);
        }
        Ok(())
    }
}

impl MeshComponent for GeometryMesh {
    fn evaluate(&self, params: &ParameterSet) -> ComponentResult {
        self.check(params)?;
        let twist = self.twist_distribution(&params.twist)?;

        let mesh = stretch(self.baseline.clone(), params.span)?;
        let mesh = sweep(mesh, params.sweep)?;
        let mesh = rotate(mesh, &twist)?;
        let mesh = dihedral(mesh, params.dihedral)?;
        let mesh = taper_with_profile(mesh, params.taper, &self.taper_matrix)?;

        log::debug!(
            "GeometryMesh: evaluated span {} sweep {} dihedral {} taper {}",
            params.span.re,
            params.sweep.re,
            params.dihedral.re,
            params.taper.re
        );

        Ok(mesh.spanwise_slice(0..self.half + 1)?)
    }

    fn output_shape(&self) -> (usize, usize) {
        (self.baseline.num_x(), self.half + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{MeshError, SplineError, gen_mesh};

    fn component(num_twist: usize) -> GeometryMesh {
        GeometryMesh::new(gen_mesh(2, 7, 12.0, 2.0, 0.0).unwrap(), num_twist).unwrap()
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_is_send_and_sync() {
        assert_send_sync::<GeometryMesh>();
        assert_send_sync::<ParameterSet>();
    }

    #[test]
    fn test_output_shape() {
        let comp = component(3);
        assert_eq!(comp.half_index(), 3);
        assert_eq!(comp.output_shape(), (2, 4));
        let mesh = comp.evaluate(&comp.default_parameters()).unwrap();
        assert_eq!(mesh.shape(), comp.output_shape());
    }

    #[test]
    fn test_default_parameters_use_baseline_span() {
        let comp = component(2);
        let params = comp.default_parameters();
        assert!((params.span.re - 12.0).abs() < 1e-12);
        assert_eq!(params.twist.len(), 2);
        assert_eq!(ParameterSet::new(2).span, real(DEFAULT_SPAN));
    }

    #[test]
    fn test_twist_length_mismatch() {
        let comp = component(3);
        let params = comp.default_parameters().with_twist(&[1.0, 2.0]);
        assert_eq!(
            comp.evaluate(&params),
            Err(GeometryError::TwistLengthMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_non_positive_span() {
        let comp = component(1);
        let params = comp.default_parameters().with_span(0.0);
        assert_eq!(comp.evaluate(&params), Err(GeometryError::NonPositiveSpan(0.0)));
    }

    #[test]
    fn test_non_finite_parameter() {
        let comp = component(2);
        let params = comp.default_parameters().with_twist(&[0.0, f64::NAN]);
        assert_eq!(
            comp.evaluate(&params),
            Err(GeometryError::NonFiniteParameter { name: "twist" })
        );
    }

    #[test]
    fn test_bad_baselines() {
        let even = WingMesh::zeros(2, 4);
        assert_eq!(
            GeometryMesh::new(even, 2).unwrap_err(),
            GeometryError::Baseline(MeshError::EvenSpanwiseCount { num_y: 4 })
        );
        assert_eq!(
            GeometryMesh::new(WingMesh::zeros(2, 5), 1).unwrap_err(),
            GeometryError::Baseline(MeshError::DegenerateSpan { span: 0.0 })
        );

        // Stations ordered right tip to left tip.
        let reversed = WingMesh::from_fn(2, 5, |ix, iy| {
            [real(ix as f64), real(2.0 - iy as f64), real(0.0)]
        });
        assert_eq!(
            GeometryMesh::new(reversed, 1).unwrap_err(),
            GeometryError::Baseline(MeshError::DegenerateSpan { span: -4.0 })
        );

        let sliver = WingMesh::from_fn(2, 5, |_, iy| [real(0.0), real(iy as f64), real(0.0)]);
        assert_eq!(
            GeometryMesh::new(sliver, 1).unwrap_err(),
            GeometryError::Baseline(MeshError::DegenerateChord { iy: 2 })
        );

        let baseline = gen_mesh(2, 5, 4.0, 1.0, 0.0).unwrap();
        assert_eq!(
            GeometryMesh::new(baseline, 0).unwrap_err(),
            GeometryError::Spline(SplineError::NoControlPoints)
        );
    }

    #[test]
    fn test_baseline_is_not_mutated() {
        let comp = component(2);
        let before = comp.baseline().clone();
        let params = comp
            .default_parameters()
            .with_sweep(20.0)
            .with_twist(&[3.0, -1.0])
            .with_taper(0.4);
        let first = comp.evaluate(&params).unwrap();
        let second = comp.evaluate(&params).unwrap();
        assert_eq!(comp.baseline(), &before);
        assert_eq!(first, second);
    }
}
