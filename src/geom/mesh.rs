//! Structured lifting-surface mesh.
//!
//! A [`WingMesh`] is a `num_x × num_y` grid of complex 3-D points indexed
//! `[chordwise station, spanwise station]`. Chordwise station 0 is the leading
//! edge and the last one is the trailing edge; spanwise stations are ordered
//! monotonically in `y`.
//!
//! Points are stored row-major (`ix * num_y + iy`) so each chordwise row is a
//! contiguous slice.

use std::fmt;
use std::ops::Range;

use super::core::{Coord, Tolerance, ZERO, coord, coord_im, coord_re, is_finite};

/// Mesh dimension used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Chordwise,
    Spanwise,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chordwise => f.write_str("chordwise"),
            Self::Spanwise => f.write_str("spanwise"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("mesh of {num_x}x{num_y} stations needs {expected} points, got {actual}")]
    PointCountMismatch {
        num_x: usize,
        num_y: usize,
        expected: usize,
        actual: usize,
    },
    #[error("mesh needs at least {min} {axis} stations, got {count}")]
    TooFewStations { axis: Axis, count: usize, min: usize },
    #[error("spanwise station count must be odd for a symmetric mesh, got {num_y}")]
    EvenSpanwiseCount { num_y: usize },
    #[error("spanwise range {start}..{end} is outside 0..{num_y}")]
    SpanwiseRange {
        start: usize,
        end: usize,
        num_y: usize,
    },
    #[error("leading-edge span {span} is not positive")]
    DegenerateSpan { span: f64 },
    #[error("chord at spanwise station {iy} is zero")]
    DegenerateChord { iy: usize },
    #[error("mesh point ({ix}, {iy}) is not finite")]
    NonFinitePoint { ix: usize, iy: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct WingMesh {
    num_x: usize,
    num_y: usize,
    points: Vec<Coord>,
}

impl WingMesh {
    /// Wrap an existing point buffer.
    ///
    /// # Errors
    /// Returns [`MeshError::PointCountMismatch`] when `points.len()` is not
    /// `num_x * num_y`.
    pub fn new(num_x: usize, num_y: usize, points: Vec<Coord>) -> Result<Self, MeshError> {
        let expected = num_x * num_y;
        if points.len() != expected {
            return Err(MeshError::PointCountMismatch {
                num_x,
                num_y,
                expected,
                actual: points.len(),
            });
        }
        Ok(Self {
            num_x,
            num_y,
            points,
        })
    }

    /// Build a mesh from real coordinates; imaginary parts start at zero.
    ///
    /// # Errors
    /// Returns [`MeshError::PointCountMismatch`] on a wrong buffer length.
    pub fn from_real(num_x: usize, num_y: usize, points: &[[f64; 3]]) -> Result<Self, MeshError> {
        Self::new(num_x, num_y, points.iter().copied().map(coord).collect())
    }

    #[must_use]
    pub fn zeros(num_x: usize, num_y: usize) -> Self {
        Self {
            num_x,
            num_y,
            points: vec![[ZERO; 3]; num_x * num_y],
        }
    }

    /// Build a mesh by evaluating `f(ix, iy)` at every station.
    #[must_use]
    pub fn from_fn(num_x: usize, num_y: usize, mut f: impl FnMut(usize, usize) -> Coord) -> Self {
        let mut points = Vec::with_capacity(num_x * num_y);
        for ix in 0..num_x {
            for iy in 0..num_y {
                points.push(f(ix, iy));
            }
        }
        Self {
            num_x,
            num_y,
            points,
        }
    }

    #[must_use]
    pub const fn num_x(&self) -> usize {
        self.num_x
    }

    #[must_use]
    pub const fn num_y(&self) -> usize {
        self.num_y
    }

    /// `(num_x, num_y)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.num_x, self.num_y)
    }

    #[must_use]
    pub fn points(&self) -> &[Coord] {
        &self.points
    }

    #[must_use]
    pub fn into_points(self) -> Vec<Coord> {
        self.points
    }

    #[inline]
    const fn index(&self, ix: usize, iy: usize) -> usize {
        ix * self.num_y + iy
    }

    /// Point at `(ix, iy)`. Panics when out of range, like slice indexing.
    #[must_use]
    pub fn get(&self, ix: usize, iy: usize) -> Coord {
        self.points[self.index(ix, iy)]
    }

    pub fn get_mut(&mut self, ix: usize, iy: usize) -> &mut Coord {
        let idx = self.index(ix, iy);
        &mut self.points[idx]
    }

    pub fn set(&mut self, ix: usize, iy: usize, value: Coord) {
        let idx = self.index(ix, iy);
        self.points[idx] = value;
    }

    /// One chordwise row (all spanwise stations).
    #[must_use]
    pub fn row(&self, ix: usize) -> &[Coord] {
        let start = self.index(ix, 0);
        &self.points[start..start + self.num_y]
    }

    pub fn row_mut(&mut self, ix: usize) -> &mut [Coord] {
        let start = self.index(ix, 0);
        let end = start + self.num_y;
        &mut self.points[start..end]
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [Coord]> {
        self.points.chunks_exact_mut(self.num_y.max(1))
    }

    /// Leading-edge row (chordwise station 0).
    #[must_use]
    pub fn leading_edge(&self) -> &[Coord] {
        self.row(0)
    }

    /// Trailing-edge row (last chordwise station).
    #[must_use]
    pub fn trailing_edge(&self) -> &[Coord] {
        self.row(self.num_x - 1)
    }

    /// Copy of spanwise stations `range` for every chordwise row.
    ///
    /// # Errors
    /// Returns [`MeshError::SpanwiseRange`] for an empty or out-of-bounds range.
    pub fn spanwise_slice(&self, range: Range<usize>) -> Result<Self, MeshError> {
        if range.start >= range.end || range.end > self.num_y {
            return Err(MeshError::SpanwiseRange {
                start: range.start,
                end: range.end,
                num_y: self.num_y,
            });
        }
        let width = range.end - range.start;
        let mut points = Vec::with_capacity(self.num_x * width);
        for ix in 0..self.num_x {
            points.extend_from_slice(&self.row(ix)[range.clone()]);
        }
        Ok(Self {
            num_x: self.num_x,
            num_y: width,
            points,
        })
    }

    /// Real parts of every point, row-major.
    #[must_use]
    pub fn real_points(&self) -> Vec<[f64; 3]> {
        self.points.iter().copied().map(coord_re).collect()
    }

    /// Imaginary parts of every point, row-major.
    #[must_use]
    pub fn imag_points(&self) -> Vec<[f64; 3]> {
        self.points.iter().copied().map(coord_im).collect()
    }

    /// Largest component-wise distance between two meshes of equal shape.
    ///
    /// Returns `f64::INFINITY` when the shapes differ.
    #[must_use]
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        if self.shape() != other.shape() {
            return f64::INFINITY;
        }
        self.points
            .iter()
            .zip(other.points.iter())
            .flat_map(|(a, b)| (0..3).map(move |k| (a[k] - b[k]).norm()))
            .fold(0.0, f64::max)
    }

    /// Fail unless the mesh has at least `min_x` chordwise and `min_y`
    /// spanwise stations.
    ///
    /// # Errors
    /// Returns [`MeshError::TooFewStations`] naming the short axis.
    pub fn require_stations(&self, min_x: usize, min_y: usize) -> Result<(), MeshError> {
        if self.num_x < min_x {
            return Err(MeshError::TooFewStations {
                axis: Axis::Chordwise,
                count: self.num_x,
                min: min_x,
            });
        }
        if self.num_y < min_y {
            return Err(MeshError::TooFewStations {
                axis: Axis::Spanwise,
                count: self.num_y,
                min: min_y,
            });
        }
        Ok(())
    }

    /// Fail unless the spanwise count is odd (symmetry plane in the middle).
    ///
    /// # Errors
    /// Returns [`MeshError::EvenSpanwiseCount`].
    pub fn require_odd_span(&self) -> Result<(), MeshError> {
        if self.num_y % 2 == 0 {
            return Err(MeshError::EvenSpanwiseCount { num_y: self.num_y });
        }
        Ok(())
    }

    /// Fail when the leading edge has no positive spanwise extent or the
    /// chord at the centre station is zero. Real parts only.
    ///
    /// # Errors
    /// Returns [`MeshError::DegenerateSpan`] or [`MeshError::DegenerateChord`].
    pub fn require_planform_extent(&self) -> Result<(), MeshError> {
        self.require_stations(2, 1)?;
        let le = self.leading_edge();
        let span = le[self.num_y - 1][1].re - le[0][1].re;
        if span <= Tolerance::ZERO_LENGTH.eps {
            return Err(MeshError::DegenerateSpan { span });
        }

        let iy = (self.num_y - 1) / 2;
        let (a, b) = (coord_re(le[iy]), coord_re(self.trailing_edge()[iy]));
        let chord = ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2) + (b[2] - a[2]).powi(2)).sqrt();
        if chord <= Tolerance::ZERO_LENGTH.eps {
            return Err(MeshError::DegenerateChord { iy });
        }
        Ok(())
    }

    /// Fail on the first point with a NaN or infinite component.
    ///
    /// # Errors
    /// Returns [`MeshError::NonFinitePoint`].
    pub fn validate_finite(&self) -> Result<(), MeshError> {
        for (idx, p) in self.points.iter().enumerate() {
            if !p.iter().copied().all(is_finite) {
                let (ix, iy) = (idx / self.num_y, idx % self.num_y);
                return Err(MeshError::NonFinitePoint { ix, iy });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::core::real;

    fn grid() -> WingMesh {
        WingMesh::from_fn(2, 3, |ix, iy| {
            [real(ix as f64), real(iy as f64), real(0.0)]
        })
    }

    #[test]
    fn rows_are_contiguous() {
        let mesh = grid();
        assert_eq!(mesh.row(1).len(), 3);
        assert_eq!(mesh.row(1)[2], [real(1.0), real(2.0), real(0.0)]);
        assert_eq!(mesh.trailing_edge(), mesh.row(1));
    }

    #[test]
    fn wrong_buffer_length_is_rejected() {
        let err = WingMesh::from_real(2, 3, &[[0.0; 3]; 5]).unwrap_err();
        assert_eq!(
            err,
            MeshError::PointCountMismatch {
                num_x: 2,
                num_y: 3,
                expected: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn spanwise_slice_keeps_every_row() {
        let mesh = grid();
        let half = mesh.spanwise_slice(0..2).unwrap();
        assert_eq!(half.shape(), (2, 2));
        assert_eq!(half.get(1, 1), mesh.get(1, 1));
        assert!(mesh.spanwise_slice(2..4).is_err());
        assert!(mesh.spanwise_slice(1..1).is_err());
    }

    #[test]
    fn station_requirements_name_the_axis() {
        let mesh = WingMesh::zeros(1, 3);
        match mesh.require_stations(2, 2) {
            Err(MeshError::TooFewStations { axis, count, min }) => {
                assert_eq!(axis, Axis::Chordwise);
                assert_eq!((count, min), (1, 2));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(WingMesh::zeros(2, 4).require_odd_span().is_err());
    }

    #[test]
    fn planform_extent_rejects_flat_meshes() {
        assert_eq!(
            WingMesh::zeros(2, 5).require_planform_extent(),
            Err(MeshError::DegenerateSpan { span: 0.0 })
        );

        // Spanwise extent but LE == TE everywhere.
        let sliver = WingMesh::from_fn(2, 3, |_, iy| [real(0.0), real(iy as f64), real(0.0)]);
        assert_eq!(
            sliver.require_planform_extent(),
            Err(MeshError::DegenerateChord { iy: 1 })
        );

        assert_eq!(grid().require_planform_extent(), Ok(()));
    }

    #[test]
    fn non_finite_points_are_located() {
        let mut mesh = grid();
        mesh.get_mut(1, 2)[0] = real(f64::NAN);
        assert_eq!(
            mesh.validate_finite(),
            Err(MeshError::NonFinitePoint { ix: 1, iy: 2 })
        );
    }
}
