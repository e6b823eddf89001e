//! Planform diagnostics for deformed meshes.
//!
//! A [`PlanformSummary`] condenses a mesh into the handful of numbers a
//! designer checks after each evaluation: span, root and tip chord, projected
//! area, and whether any derivative signal is riding on the imaginary parts.
//!
//! # Example
//!
//! ```ignore
//! use wingmesh_engine::geom::{gen_mesh, PlanformSummary};
//!
//! let mesh = gen_mesh(2, 5, 10.0, 2.0, 0.0)?;
//! let summary = PlanformSummary::from_mesh(&mesh);
//! assert_eq!(summary.root_chord, 2.0);
//! log::debug!("{}", summary.summary());
//! ```
//!
//! All quantities use real parts only.

use std::fmt;

use super::core::coord_re;
use super::mesh::WingMesh;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PlanformSummary {
    /// Chordwise station count.
    pub num_x: usize,

    /// Spanwise station count.
    pub num_y: usize,

    /// Leading-edge spanwise extent, `max y - min y`.
    pub span: f64,

    /// Leading-edge to trailing-edge distance at each spanwise station.
    pub chords: Vec<f64>,

    /// Chord at the station closest to the symmetry plane.
    pub root_chord: f64,

    /// Chord at the station furthest from the symmetry plane.
    pub tip_chord: f64,

    /// Area of the LE/TE outline projected onto the x-y plane.
    ///
    /// Summed over the quadrilateral strips between neighbouring stations, so
    /// swept and tapered planforms are measured exactly.
    pub projected_area: f64,

    /// Whether the leading-edge `y` never decreases from station to station.
    pub monotonic_span: bool,

    /// Largest absolute imaginary component over all points.
    ///
    /// Zero for a purely real mesh; non-zero after a complex-step evaluation.
    pub max_imag: f64,
}

impl PlanformSummary {
    /// Summarise `mesh`. Meshes without stations produce an all-zero summary.
    #[must_use]
    pub fn from_mesh(mesh: &WingMesh) -> Self {
        let (num_x, num_y) = mesh.shape();
        if num_x == 0 || num_y == 0 {
            return Self {
                num_x,
                num_y,
                monotonic_span: true,
                ..Self::default()
            };
        }

        let le: Vec<[f64; 3]> = mesh.leading_edge().iter().copied().map(coord_re).collect();
        let te: Vec<[f64; 3]> = mesh.trailing_edge().iter().copied().map(coord_re).collect();

        let chords: Vec<f64> = le.iter().zip(&te).map(|(a, b)| distance(*a, *b)).collect();

        let (min_y, max_y) = le
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p[1]), hi.max(p[1])));

        let root = argmin_by(&le, |p| p[1].abs());
        let tip = argmin_by(&le, |p| -p[1].abs());

        let projected_area = (0..num_y.saturating_sub(1))
            .map(|j| quad_area_xy([le[j], le[j + 1], te[j + 1], te[j]]))
            .sum();

        let monotonic_span = le.windows(2).all(|w| w[1][1] >= w[0][1]);

        let max_imag = mesh
            .points()
            .iter()
            .flat_map(|p| p.iter().map(|c| c.im.abs()))
            .fold(0.0, f64::max);

        Self {
            num_x,
            num_y,
            span: max_y - min_y,
            root_chord: chords[root],
            tip_chord: chords[tip],
            chords,
            projected_area,
            monotonic_span,
            max_imag,
        }
    }

    /// `tip_chord / root_chord`, or `None` for a zero root chord.
    #[must_use]
    pub fn taper_ratio(&self) -> Option<f64> {
        (self.root_chord > 0.0).then(|| self.tip_chord / self.root_chord)
    }

    /// `span² / area`, or `None` for a zero area.
    #[must_use]
    pub fn aspect_ratio(&self) -> Option<f64> {
        (self.projected_area > 0.0).then(|| self.span * self.span / self.projected_area)
    }

    #[must_use]
    pub fn has_derivative_signal(&self) -> bool {
        self.max_imag > 0.0
    }

    /// One-line summary suitable for logging.
    ///
    /// Format: `"{num_x}x{num_y} span:{span} root:{c} tip:{c} area:{a}"`, with
    /// `non-monotonic` and `imag:{max}` appended when relevant.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!("{}x{}", self.num_x, self.num_y),
            format!("span:{:.6}", self.span),
            format!("root:{:.6}", self.root_chord),
            format!("tip:{:.6}", self.tip_chord),
            format!("area:{:.6}", self.projected_area),
        ];
        if !self.monotonic_span {
            parts.push("non-monotonic".to_string());
        }
        if self.has_derivative_signal() {
            parts.push(format!("imag:{:.3e}", self.max_imag));
        }
        parts.join(" ")
    }
}

impl fmt::Display for PlanformSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Planform:")?;
        writeln!(f, "  Stations: {} chordwise x {} spanwise", self.num_x, self.num_y)?;
        writeln!(f, "  Span: {:.6}", self.span)?;
        writeln!(f, "  Root chord: {:.6}", self.root_chord)?;
        writeln!(f, "  Tip chord: {:.6}", self.tip_chord)?;
        writeln!(f, "  Projected area: {:.6}", self.projected_area)?;
        if let Some(ar) = self.aspect_ratio() {
            writeln!(f, "  Aspect ratio: {ar:.6}")?;
        }
        if !self.monotonic_span {
            writeln!(f, "  Warning: spanwise stations are not monotonic")?;
        }
        if self.has_derivative_signal() {
            writeln!(f, "  Max imaginary part: {:.3e}", self.max_imag)?;
        }
        Ok(())
    }
}

fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2) + (b[2] - a[2]).powi(2)).sqrt()
}

/// First index minimising `key`.
fn argmin_by(points: &[[f64; 3]], key: impl Fn(&[f64; 3]) -> f64) -> usize {
    let mut best = 0;
    let mut best_key = f64::INFINITY;
    for (i, p) in points.iter().enumerate() {
        let k = key(p);
        if k < best_key {
            best = i;
            best_key = k;
        }
    }
    best
}

/// Shoelace area of a quadrilateral in the x-y plane.
fn quad_area_xy(q: [[f64; 3]; 4]) -> f64 {
    let mut twice = 0.0;
    for i in 0..4 {
        let (a, b) = (q[i], q[(i + 1) % 4]);
        twice += a[0] * b[1] - b[0] * a[1];
    }
    0.5 * twice.abs()
}
