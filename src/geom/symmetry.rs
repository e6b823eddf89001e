//! Reflection about the `y = 0` symmetry plane.
//!
//! A half-mesh of `n` stations includes the station on the plane; its full
//! mesh has `2n - 1` stations with the plane station shared.

use super::core::Coord;
use super::mesh::{MeshError, WingMesh};

fn reflect(p: Coord) -> Coord {
    [p[0], -p[1], p[2]]
}

/// Mirror a half-mesh into a full mesh.
///
/// With `right_side` the first station lies on the plane and the half is
/// reflected to the left; otherwise the last station lies on the plane and the
/// half is reflected to the right. The plane station is not duplicated.
///
/// # Errors
/// Returns [`MeshError::TooFewStations`] for an empty mesh.
pub fn mirror(mesh: &WingMesh, right_side: bool) -> Result<WingMesh, MeshError> {
    mesh.require_stations(1, 1)?;
    let (num_x, n) = mesh.shape();
    let full_y = 2 * n - 1;

    let mut points = Vec::with_capacity(num_x * full_y);
    for ix in 0..num_x {
        let row = mesh.row(ix);
        if right_side {
            points.extend(row.iter().rev().copied().map(reflect));
            points.extend_from_slice(&row[1..]);
        } else {
            points.extend_from_slice(row);
            points.extend(row.iter().rev().skip(1).copied().map(reflect));
        }
    }

    WingMesh::new(num_x, full_y, points)
}

/// Extract the half of a full mesh that [`mirror`] would rebuild it from.
///
/// With `right_side` this keeps stations `half..`, otherwise `..=half`, where
/// `half = (num_y - 1) / 2` is the plane station.
///
/// # Errors
/// Returns [`MeshError::EvenSpanwiseCount`] when there is no plane station.
pub fn half_mesh(full: &WingMesh, right_side: bool) -> Result<WingMesh, MeshError> {
    full.require_stations(1, 1)?;
    full.require_odd_span()?;
    let half = (full.num_y() - 1) / 2;
    if right_side {
        full.spanwise_slice(half..full.num_y())
    } else {
        full.spanwise_slice(0..half + 1)
    }
}
