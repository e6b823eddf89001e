//! Planform transformations driven by design parameters.
//!
//! Every function takes ownership of a working mesh, deforms it in place and
//! hands it back:
//!
//! - **Stretch**: rescale the span to a target length.
//! - **Sweep**: shear in `x` proportional to the distance from the centerline.
//! - **Dihedral**: the same shear applied to `z`.
//! - **Rotate**: twist each spanwise station about its quarter-chord point.
//! - **Taper**: scale each station's chord about its chord-center.
//!
//! All arithmetic stays in the complex domain so that an imaginary
//! perturbation of any parameter propagates to the output unchanged. Nothing
//! here branches on the value of a complex quantity.
//!
//! # Example
//!
//! ```ignore
//! use wingmesh_engine::geom::{gen_mesh, real, stretch, sweep, taper};
//!
//! let mesh = gen_mesh(2, 5, 10.0, 2.0, 0.0)?;
//! let mesh = stretch(mesh, real(12.0))?;
//! let mesh = sweep(mesh, real(30.0))?;
//! let mesh = taper(mesh, real(0.5))?;
//! ```

use super::core::{Coord, ONE, Scalar, ZERO, blend, deg_to_rad, linspace, real};
use super::mesh::{MeshError, WingMesh};
use super::spline::{BSplineBuilder, InterpolationMatrix, LINEAR_ORDER, SplineBuilder, SplineError};

// ============================================================================
// Error types
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransformError {
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error(transparent)]
    Spline(#[from] SplineError),
    #[error("expected one twist angle per spanwise station ({expected}), got {actual}")]
    TwistLengthMismatch { expected: usize, actual: usize },
    #[error("taper profile matrix must be {expected}x{expected}, got {rows}x{cols}")]
    TaperProfileShape {
        expected: usize,
        rows: usize,
        cols: usize,
    },
}

// ============================================================================
// Centerline indices
// ============================================================================

/// Centerline station used by [`sweep`]: `(num_y - 1) / 2`, or 0 for an
/// empty mesh.
#[must_use]
pub const fn sweep_center_index(num_y: usize) -> usize {
    num_y.saturating_sub(1) / 2
}

/// Centerline station used by [`dihedral`] and the taper profile length:
/// `(num_y + 1) / 2`.
///
/// This is one station outboard of [`sweep_center_index`] for odd meshes.
#[must_use]
pub const fn dihedral_center_index(num_y: usize) -> usize {
    (num_y + 1) / 2
}

// ============================================================================
// Stretch
// ============================================================================

/// Stretch the mesh spanwise so the leading edge spans `length`.
///
/// Station 0 stays put; station `j` moves by `(length - span) / (num_y - 1) * j`
/// on every chordwise row.
///
/// # Errors
/// Returns [`MeshError::TooFewStations`] for fewer than 2 stations in either
/// direction.
pub fn stretch(mut mesh: WingMesh, length: Scalar) -> Result<WingMesh, TransformError> {
    mesh.require_stations(2, 2)?;
    let num_y = mesh.num_y();

    let le = mesh.leading_edge();
    let span = le[num_y - 1][1] - le[0][1];
    let step = (length - span) / real((num_y - 1) as f64);

    for row in mesh.rows_mut() {
        for (j, point) in row.iter_mut().enumerate().skip(1) {
            point[1] += step * j as f64;
        }
    }
    Ok(mesh)
}

// ============================================================================
// Sweep / dihedral
// ============================================================================

/// Shear the mesh aft by `angle` degrees. Positive sweeps back.
///
/// # Errors
/// Returns [`MeshError::TooFewStations`] for fewer than 2 stations in either
/// direction.
pub fn sweep(mut mesh: WingMesh, angle: Scalar) -> Result<WingMesh, TransformError> {
    mesh.require_stations(2, 2)?;
    let center = sweep_center_index(mesh.num_y());
    let offsets = shear_offsets(mesh.leading_edge(), center, deg_to_rad(angle).tan());
    add_offsets(&mut mesh, 0, &offsets);
    Ok(mesh)
}

/// Shear the mesh upward by `angle` degrees. Positive bends up.
///
/// Uses [`dihedral_center_index`] rather than the sweep centerline.
///
/// # Errors
/// Returns [`MeshError::TooFewStations`] for fewer than 2 stations in either
/// direction.
pub fn dihedral(mut mesh: WingMesh, angle: Scalar) -> Result<WingMesh, TransformError> {
    mesh.require_stations(2, 2)?;
    let center = dihedral_center_index(mesh.num_y());
    let offsets = shear_offsets(mesh.leading_edge(), center, deg_to_rad(angle).tan());
    add_offsets(&mut mesh, 2, &offsets);
    Ok(mesh)
}

/// Offsets for a V-shaped shear about `center`.
///
/// Stations at and outboard of `center` get `(y - y0) * tan`; inboard stations
/// get the negated value, so both halves of a symmetric wing move the same way.
fn shear_offsets(leading_edge: &[Coord], center: usize, tan_theta: Scalar) -> Vec<Scalar> {
    let y0 = leading_edge[center][1];
    leading_edge
        .iter()
        .enumerate()
        .map(|(j, p)| {
            let d = (p[1] - y0) * tan_theta;
            if j < center { -d } else { d }
        })
        .collect()
}

fn add_offsets(mesh: &mut WingMesh, component: usize, offsets: &[Scalar]) {
    for row in mesh.rows_mut() {
        for (point, &d) in row.iter_mut().zip(offsets) {
            point[component] += d;
        }
    }
}

// ============================================================================
// Rotate
// ============================================================================

/// Twist each spanwise station by `thetas[j]` degrees about its quarter-chord.
///
/// The rotation is in the x-z plane; `y` is untouched. Quarter-chord points
/// are `0.25 * TE + 0.75 * LE`, taken before any row moves.
///
/// # Errors
/// Returns [`TransformError::TwistLengthMismatch`] unless there is exactly one
/// angle per spanwise station, and [`MeshError::TooFewStations`] for a mesh
/// without both a leading and trailing edge.
pub fn rotate(mut mesh: WingMesh, thetas: &[Scalar]) -> Result<WingMesh, TransformError> {
    mesh.require_stations(2, 1)?;
    if thetas.len() != mesh.num_y() {
        return Err(TransformError::TwistLengthMismatch {
            expected: mesh.num_y(),
            actual: thetas.len(),
        });
    }

    let quarter_chord: Vec<Coord> = mesh
        .trailing_edge()
        .iter()
        .zip(mesh.leading_edge())
        .map(|(&te, &le)| blend(te, 0.25, le, 0.75))
        .collect();

    let mats: Vec<[[Scalar; 3]; 3]> = thetas
        .iter()
        .map(|&theta| {
            let rad = deg_to_rad(theta);
            let (sin, cos) = (rad.sin(), rad.cos());
            [[cos, ZERO, sin], [ZERO, ONE, ZERO], [-sin, ZERO, cos]]
        })
        .collect();

    for row in mesh.rows_mut() {
        for ((point, mat), qc) in row.iter_mut().zip(&mats).zip(&quarter_chord) {
            let rel = [point[0] - qc[0], point[1] - qc[1], point[2] - qc[2]];
            for k in 0..3 {
                point[k] = mat[k][0] * rel[0] + mat[k][1] * rel[1] + mat[k][2] * rel[2] + qc[k];
            }
        }
    }
    Ok(mesh)
}

// ============================================================================
// Taper
// ============================================================================

/// Taper the chord linearly from 1 at the root to `taper_ratio` at both tips.
///
/// Builds the order-2 profile matrix on every call; the pipeline uses
/// [`taper_with_profile`] with a matrix computed once.
///
/// # Errors
/// Returns [`MeshError::EvenSpanwiseCount`] for a mesh without a centre
/// station, [`MeshError::TooFewStations`] for fewer than 2 stations in
/// either direction.
pub fn taper(mesh: WingMesh, taper_ratio: Scalar) -> Result<WingMesh, TransformError> {
    mesh.require_stations(2, 2)?;
    let matrix = taper_profile_matrix(&mesh, &BSplineBuilder::default())?;
    taper_with_profile(mesh, taper_ratio, &matrix)
}

/// Order-2 `h × h` profile matrix for [`taper_with_profile`], with
/// `h = (num_y + 1) / 2`.
///
/// # Errors
/// Propagates [`SplineError`] from the builder.
pub fn taper_profile_matrix(
    mesh: &WingMesh,
    builder: &impl SplineBuilder,
) -> Result<InterpolationMatrix, TransformError> {
    let half = dihedral_center_index(mesh.num_y());
    Ok(builder.interpolation_matrix(half, half, mesh, LINEAR_ORDER)?)
}

/// [`taper`] with a precomputed profile matrix.
///
/// # Errors
/// Returns [`TransformError::TaperProfileShape`] when the matrix does not
/// match the mesh, and the same mesh errors as [`taper`].
pub fn taper_with_profile(
    mut mesh: WingMesh,
    taper_ratio: Scalar,
    profile: &InterpolationMatrix,
) -> Result<WingMesh, TransformError> {
    mesh.require_stations(2, 2)?;
    mesh.require_odd_span()?;
    let half = dihedral_center_index(mesh.num_y());
    if profile.rows() != half || profile.cols() != half {
        return Err(TransformError::TaperProfileShape {
            expected: half,
            rows: profile.rows(),
            cols: profile.cols(),
        });
    }

    // Tip first, root last.
    let ramp: Vec<Scalar> = linspace(0.0, 1.0, half)
        .into_iter()
        .rev()
        .map(|w| ONE + (taper_ratio - ONE) * w)
        .collect();
    let ramp = profile.apply(&ramp)?;

    let factors: Vec<Scalar> = ramp
        .iter()
        .copied()
        .chain(ramp.iter().rev().skip(1).copied())
        .collect();

    let center_chord: Vec<Coord> = mesh
        .trailing_edge()
        .iter()
        .zip(mesh.leading_edge())
        .map(|(&te, &le)| blend(te, 0.5, le, 0.5))
        .collect();

    for row in mesh.rows_mut() {
        for ((point, &factor), center) in row.iter_mut().zip(&factors).zip(&center_chord) {
            for k in 0..3 {
                point[k] = (point[k] - center[k]) * factor + center[k];
            }
        }
    }
    Ok(mesh)
}
