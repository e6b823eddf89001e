//! Baseline mesh generators.
//!
//! [`gen_mesh`] builds a flat rectangular wing; [`gen_crm_mesh`] builds a
//! kinked, tapered wing from a three-breakpoint reference planform. Both return
//! full meshes with spanwise stations ordered from the left tip to the right
//! tip.

use std::f64::consts::FRAC_PI_2;
use std::fmt;

use super::core::{Tolerance, blend, coord, linspace};
use super::mesh::{Axis, MeshError, WingMesh};
use super::symmetry::mirror;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeneratorError {
    #[error("generator needs at least {min} {axis} stations, got {count}")]
    TooFewStations { axis: Axis, count: usize, min: usize },
    #[error("spanwise station count must be odd, got {num_y}")]
    EvenSpanwiseCount { num_y: usize },
    #[error("span must be finite and positive, got {0}")]
    InvalidSpan(f64),
    #[error("chord must be finite and positive, got {0}")]
    InvalidChord(f64),
    #[error("cosine spacing weight must lie in [0, 1], got {0}")]
    InvalidCosineSpacing(f64),
    #[error("{edge} breakpoints {first} and {second} share the same spanwise position")]
    DegenerateBreakpoints {
        edge: Edge,
        first: Breakpoint,
        second: Breakpoint,
    },
    #[error("{edge} root must lie on the symmetry plane y = 0, got y = {y}")]
    RootOffPlane { edge: Edge, y: f64 },
    #[error("reference planform must be a 2x3 mesh, got {num_x}x{num_y}")]
    ReferenceShape { num_x: usize, num_y: usize },
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

fn require(axis: Axis, count: usize, min: usize) -> Result<(), GeneratorError> {
    if count < min {
        return Err(GeneratorError::TooFewStations { axis, count, min });
    }
    Ok(())
}

// ============================================================================
// Rectangular wing
// ============================================================================

/// Flat rectangular wing centred on the origin.
///
/// Spanwise stations blend cosine and uniform spacing with weight
/// `cosine_spacing` (0 is uniform, 1 clusters stations at the tips). Chordwise
/// stations run from `-chord / 2` to `chord / 2`.
///
/// # Errors
/// Returns a [`GeneratorError`] for `num_x < 2`, an even or too small
/// `num_y`, a non-positive span or chord, or a weight outside `[0, 1]`.
pub fn gen_mesh(
    num_x: usize,
    num_y: usize,
    span: f64,
    chord: f64,
    cosine_spacing: f64,
) -> Result<WingMesh, GeneratorError> {
    require(Axis::Chordwise, num_x, 2)?;
    require(Axis::Spanwise, num_y, 3)?;
    if num_y % 2 == 0 {
        return Err(GeneratorError::EvenSpanwiseCount { num_y });
    }
    if !span.is_finite() || span <= 0.0 {
        return Err(GeneratorError::InvalidSpan(span));
    }
    if !chord.is_finite() || chord <= 0.0 {
        return Err(GeneratorError::InvalidChord(chord));
    }
    if !(0.0..=1.0).contains(&cosine_spacing) {
        return Err(GeneratorError::InvalidCosineSpacing(cosine_spacing));
    }

    let h = num_y.div_ceil(2);
    let uniform = linspace(0.5, 0.0, h);
    let mut half: Vec<f64> = linspace(0.0, FRAC_PI_2, h)
        .into_iter()
        .zip(uniform)
        .map(|(beta, u)| cosine_spacing * 0.5 * beta.cos() + (1.0 - cosine_spacing) * u)
        .collect();
    // cos(pi / 2) is not exactly zero.
    half[h - 1] = 0.0;

    let stations: Vec<f64> = half[..h - 1]
        .iter()
        .map(|v| -v)
        .chain(half.iter().rev().copied())
        .map(|v| v * span)
        .collect();

    log::debug!("gen_mesh: {num_x}x{num_y}, span {span}, chord {chord}, w {cosine_spacing}");

    Ok(WingMesh::from_fn(num_x, num_y, |ix, iy| {
        let x = ix as f64 / (num_x - 1) as f64 * chord - chord / 2.0;
        coord([x, stations[iy], 0.0])
    }))
}

// ============================================================================
// Chordwise subdivision
// ============================================================================

/// Resample a mesh to `num_x` chordwise stations between its leading and
/// trailing edges. Both edges are reproduced exactly.
///
/// # Errors
/// Returns [`GeneratorError::TooFewStations`] for `num_x < 2` or an input
/// without both edges.
pub fn add_chordwise_panels(mesh: &WingMesh, num_x: usize) -> Result<WingMesh, GeneratorError> {
    require(Axis::Chordwise, num_x, 2)?;
    mesh.require_stations(2, 1)?;
    let le = mesh.leading_edge();
    let te = mesh.trailing_edge();

    Ok(WingMesh::from_fn(num_x, mesh.num_y(), |ix, iy| {
        if ix == 0 {
            le[iy]
        } else if ix == num_x - 1 {
            te[iy]
        } else {
            let w = ix as f64 / (num_x - 1) as f64;
            blend(le[iy], 1.0 - w, te[iy], w)
        }
    }))
}

// ============================================================================
// Kinked planform
// ============================================================================

/// Spanwise breakpoint of a [`ReferencePlanform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakpoint {
    Root,
    Yehudi,
    Tip,
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("root"),
            Self::Yehudi => f.write_str("yehudi"),
            Self::Tip => f.write_str("tip"),
        }
    }
}

/// Planform edge of a [`ReferencePlanform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Leading,
    Trailing,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leading => f.write_str("leading-edge"),
            Self::Trailing => f.write_str("trailing-edge"),
        }
    }
}

/// Right-half planform outline: leading and trailing edge points at the root,
/// the yehudi break and the tip, each `[x, y, z]`. Only `x` and `y` are used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePlanform {
    pub leading_edge: [[f64; 3]; 3],
    pub trailing_edge: [[f64; 3]; 3],
}

impl ReferencePlanform {
    /// Approximate Common Research Model wing, in metres.
    pub const CRM: Self = Self {
        leading_edge: [[0.0, 0.0, 0.0], [8.192, 10.812, 0.0], [22.26, 29.38, 0.0]],
        trailing_edge: [[13.6161, 0.0, 0.0], [15.45, 10.812, 0.0], [24.99, 29.38, 0.0]],
    };

    /// Read a planform from a 2x3 mesh (rows LE/TE, stations root/yehudi/tip).
    ///
    /// # Errors
    /// Returns [`GeneratorError::ReferenceShape`] for any other shape.
    pub fn from_mesh(mesh: &WingMesh) -> Result<Self, GeneratorError> {
        if mesh.shape() != (2, 3) {
            return Err(GeneratorError::ReferenceShape {
                num_x: mesh.num_x(),
                num_y: mesh.num_y(),
            });
        }
        let pts = mesh.real_points();
        Ok(Self {
            leading_edge: [pts[0], pts[1], pts[2]],
            trailing_edge: [pts[3], pts[4], pts[5]],
        })
    }

    fn edge(&self, edge: Edge) -> &[[f64; 3]; 3] {
        match edge {
            Edge::Leading => &self.leading_edge,
            Edge::Trailing => &self.trailing_edge,
        }
    }

    fn require_root_on_plane(&self) -> Result<(), GeneratorError> {
        for edge in [Edge::Leading, Edge::Trailing] {
            let y = self.edge(edge)[Breakpoint::Root as usize][1];
            if y.abs() > Tolerance::ZERO_LENGTH.eps {
                return Err(GeneratorError::RootOffPlane { edge, y });
            }
        }
        Ok(())
    }

    /// Slope `dx/dy` between two breakpoints on one edge.
    fn slope(&self, edge: Edge, first: Breakpoint, second: Breakpoint) -> Result<f64, GeneratorError> {
        let pts = self.edge(edge);
        let (a, b) = (pts[first as usize], pts[second as usize]);
        let dy = b[1] - a[1];
        if dy.abs() <= Tolerance::ZERO_LENGTH.eps {
            return Err(GeneratorError::DegenerateBreakpoints {
                edge,
                first,
                second,
            });
        }
        Ok((b[0] - a[0]) / dy)
    }
}

impl Default for ReferencePlanform {
    fn default() -> Self {
        Self::CRM
    }
}

/// Full kinked wing from a reference planform.
///
/// The right half gets `n_points_inboard` stations from root to yehudi and
/// `n_points_outboard` from yehudi to tip, sharing the break station. It is
/// then mirrored and subdivided into `num_x` chordwise stations.
///
/// # Errors
/// Returns [`GeneratorError::TooFewStations`] for fewer than 2 points in
/// either segment or `num_x < 2`, and
/// [`GeneratorError::DegenerateBreakpoints`] when two breakpoints share a
/// spanwise position, and [`GeneratorError::RootOffPlane`] when a root point
/// is not on `y = 0`.
pub fn gen_crm_mesh(
    n_points_inboard: usize,
    n_points_outboard: usize,
    num_x: usize,
    planform: &ReferencePlanform,
) -> Result<WingMesh, GeneratorError> {
    use Breakpoint::{Root, Tip, Yehudi};

    require(Axis::Spanwise, n_points_inboard, 2)?;
    require(Axis::Spanwise, n_points_outboard, 2)?;
    require(Axis::Chordwise, num_x, 2)?;
    planform.require_root_on_plane()?;

    let s1 = planform.slope(Edge::Leading, Root, Yehudi)?;
    let s2 = planform.slope(Edge::Trailing, Root, Yehudi)?;
    let s3 = planform.slope(Edge::Leading, Yehudi, Tip)?;
    let s4 = planform.slope(Edge::Trailing, Yehudi, Tip)?;

    let le = &planform.leading_edge;
    let te = &planform.trailing_edge;
    // Checked above; pin it so the mirrored plane station is exactly y = 0.
    let y_root = 0.0;
    let y_break = le[1][1];
    let y_tip = le[2][1];

    let n_total = n_points_inboard + n_points_outboard - 1;
    let mut lead = Vec::with_capacity(n_total);
    let mut trail = Vec::with_capacity(n_total);

    let dy = (y_break - y_root) / (n_points_inboard - 1) as f64;
    for i in 0..n_points_inboard {
        let y = y_root + i as f64 * dy;
        lead.push([le[0][0] + s1 * (y - le[0][1]), y, 0.0]);
        trail.push([te[0][0] + s2 * (y - te[0][1]), y, 0.0]);
    }

    let dy = (y_tip - y_break) / (n_points_outboard - 1) as f64;
    for j in 1..n_points_outboard {
        let y = y_break + j as f64 * dy;
        lead.push([le[2][0] + s3 * (y - le[2][1]), y, 0.0]);
        trail.push([te[2][0] + s4 * (y - te[2][1]), y, 0.0]);
    }

    log::debug!(
        "gen_crm_mesh: {n_points_inboard} inboard + {n_points_outboard} outboard stations, num_x {num_x}"
    );

    lead.extend(trail);
    let half = WingMesh::from_real(2, n_total, &lead)?;
    let full = mirror(&half, true)?;
    add_chordwise_panels(&full, num_x)
}
