#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss, clippy::many_single_char_names)]

//! Parametric wing mesh deformation.
//!
//! - [`geom`]: the mesh type, baseline generators, symmetry helpers, spline
//!   interpolation and the five planform transforms.
//! - [`components`]: [`GeometryMesh`](components::GeometryMesh), which runs the
//!   fixed deformation pipeline, and complex-step derivative helpers.
//! - [`config`]: JSON run configuration and presets.
//!
//! All geometry is complex-valued so derivatives can be taken by complex step.
//! The crate logs through the `log` facade and never installs a logger itself.

pub mod components;
pub mod config;
pub mod geom;

pub use components::{GeometryError, GeometryMesh, MeshComponent, ParameterSet};
pub use config::{ConfigError, GeometryConfig};
pub use geom::WingMesh;
