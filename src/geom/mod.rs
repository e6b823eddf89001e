mod core;
mod diagnostics;
mod generate;
mod mesh;
mod spline;
mod symmetry;
mod transform;

pub use core::{
    Coord, ONE, Scalar, Tolerance, ZERO, blend, coord, coord_im, coord_re, deg_to_rad,
    is_finite, linspace, real,
};
pub use diagnostics::PlanformSummary;
pub use generate::{
    Breakpoint, Edge, GeneratorError, ReferencePlanform, add_chordwise_panels, gen_crm_mesh,
    gen_mesh,
};
pub use mesh::{Axis, MeshError, WingMesh};
pub use spline::{
    BSplineBuilder, DEFAULT_ORDER, InterpolationMatrix, LINEAR_ORDER, Parametrization,
    SplineBuilder, SplineError, bspline_matrix, bspline_matrix_at,
};
pub use symmetry::{half_mesh, mirror};
pub use transform::{
    TransformError, dihedral, dihedral_center_index, rotate, stretch, sweep, sweep_center_index,
    taper, taper_profile_matrix, taper_with_profile,
};
