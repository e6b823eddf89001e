use std::f64::consts::PI;

use num_complex::Complex64;

// ─────────────────────────────────────────────────────────────────────────────
// Scalar
// ─────────────────────────────────────────────────────────────────────────────

/// Scalar type carried through every mesh operation.
///
/// The real part is the physical coordinate; the imaginary part carries the
/// derivative signal when an input has been perturbed by a complex step.
pub type Scalar = Complex64;

/// One mesh point `[x, y, z]`.
pub type Coord = [Scalar; 3];

pub const ZERO: Scalar = Scalar::new(0.0, 0.0);
pub const ONE: Scalar = Scalar::new(1.0, 0.0);

/// Lift a real value into the scalar type with a zero imaginary part.
#[must_use]
pub const fn real(value: f64) -> Scalar {
    Scalar::new(value, 0.0)
}

/// Lift a real point into a complex coordinate.
#[must_use]
pub const fn coord(p: [f64; 3]) -> Coord {
    [real(p[0]), real(p[1]), real(p[2])]
}

/// Real parts of a coordinate.
#[must_use]
pub fn coord_re(c: Coord) -> [f64; 3] {
    [c[0].re, c[1].re, c[2].re]
}

/// Imaginary parts of a coordinate.
#[must_use]
pub fn coord_im(c: Coord) -> [f64; 3] {
    [c[0].im, c[1].im, c[2].im]
}

/// Degrees to radians without leaving the complex domain.
#[must_use]
pub fn deg_to_rad(angle: Scalar) -> Scalar {
    angle * (PI / 180.0)
}

/// `a * wa + b * wb`, component-wise.
#[must_use]
pub fn blend(a: Coord, wa: f64, b: Coord, wb: f64) -> Coord {
    [
        a[0] * wa + b[0] * wb,
        a[1] * wa + b[1] * wb,
        a[2] * wa + b[2] * wb,
    ]
}

/// Both parts finite.
#[must_use]
pub fn is_finite(value: Scalar) -> bool {
    value.re.is_finite() && value.im.is_finite()
}

/// `n` evenly spaced values from `start` to `end` inclusive.
#[must_use]
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tolerance
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub eps: f64,
}

impl Tolerance {
    /// Default geometric tolerance (1e-9).
    pub const DEFAULT: Self = Self { eps: 1e-9 };

    /// Tolerance for detecting coincident breakpoints and zero spans (1e-12).
    pub const ZERO_LENGTH: Self = Self { eps: 1e-12 };

    /// Loose tolerance for coarse comparisons (1e-6).
    pub const LOOSE: Self = Self { eps: 1e-6 };

    /// Imaginary step used for complex-step derivatives (1e-30).
    ///
    /// There is no subtractive cancellation, so the step can sit far below
    /// machine epsilon.
    pub const COMPLEX_STEP: Self = Self { eps: 1e-30 };

    #[must_use]
    pub const fn new(eps: f64) -> Self {
        Self { eps }
    }

    #[must_use]
    pub const fn default_geom() -> Self {
        Self::DEFAULT
    }

    #[must_use]
    pub fn approx_eq_f64(self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.eps
    }

    /// Compares real and imaginary parts independently.
    #[must_use]
    pub fn approx_eq(self, a: Scalar, b: Scalar) -> bool {
        self.approx_eq_f64(a.re, b.re) && self.approx_eq_f64(a.im, b.im)
    }

    #[must_use]
    pub fn approx_eq_coord(self, a: Coord, b: Coord) -> bool {
        a.iter().zip(b.iter()).all(|(&p, &q)| self.approx_eq(p, q))
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
