//! JSON run configuration and built-in presets.
//!
//! A [`GeometryConfig`] names a baseline generator, the number of twist
//! control points and a set of real design values. Omitted design values fall
//! back to the neutral ones, so `{"name": "w", "baseline": {...}}` evaluates to
//! the baseline half-mesh.

use serde::{Deserialize, Serialize};

use crate::components::{GeometryError, GeometryMesh, ParameterSet};
use crate::geom::{GeneratorError, ReferencePlanform, WingMesh, gen_crm_mesh, gen_mesh};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown preset `{0}`")]
    UnknownPreset(String),
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Baseline mesh generator and its resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BaselineConfig {
    Rectangular {
        num_x: usize,
        num_y: usize,
        span: f64,
        chord: f64,
        #[serde(default)]
        cosine_spacing: f64,
    },
    Crm {
        n_points_inboard: usize,
        n_points_outboard: usize,
        num_x: usize,
    },
}

/// Real-valued design parameters as written in a configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignValues {
    /// `None` keeps the baseline span.
    pub span: Option<f64>,
    pub sweep: f64,
    pub dihedral: f64,
    /// Empty means zero twist at every control point.
    pub twist: Vec<f64>,
    pub taper: f64,
}

impl Default for DesignValues {
    fn default() -> Self {
        Self {
            span: None,
            sweep: 0.0,
            dihedral: 0.0,
            twist: Vec::new(),
            taper: 1.0,
        }
    }
}

fn default_num_twist() -> usize {
    3
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryConfig {
    pub name: String,
    pub baseline: BaselineConfig,
    #[serde(default = "default_num_twist")]
    pub num_twist: usize,
    #[serde(default)]
    pub design: DesignValues,
}

/// Names accepted by [`GeometryConfig::preset`].
pub const PRESET_NAMES: &[&str] = &["rect_identity", "rect_tapered", "crm_swept"];

impl GeometryConfig {
    /// # Errors
    /// Returns [`ConfigError::Json`] for malformed input.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        log::debug!("loaded configuration `{}`", config.name);
        Ok(config)
    }

    /// # Errors
    /// Returns [`ConfigError::Json`] if serialisation fails.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Built-in configuration by name.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownPreset`] for names not in
    /// [`PRESET_NAMES`].
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        let rect = BaselineConfig::Rectangular {
            num_x: 2,
            num_y: 5,
            span: 10.0,
            chord: 2.0,
            cosine_spacing: 0.0,
        };
        let config = match name {
            "rect_identity" => Self {
                name: name.to_string(),
                baseline: rect,
                num_twist: 3,
                design: DesignValues::default(),
            },
            "rect_tapered" => Self {
                name: name.to_string(),
                baseline: rect,
                num_twist: 3,
                design: DesignValues {
                    taper: 0.5,
                    ..DesignValues::default()
                },
            },
            "crm_swept" => Self {
                name: name.to_string(),
                baseline: BaselineConfig::Crm {
                    n_points_inboard: 3,
                    n_points_outboard: 4,
                    num_x: 3,
                },
                num_twist: 5,
                design: DesignValues {
                    span: Some(crate::components::DEFAULT_SPAN),
                    sweep: 10.0,
                    dihedral: 3.0,
                    twist: vec![-2.0, -1.0, 0.0, 1.0, 2.0],
                    taper: 0.8,
                },
            },
            other => return Err(ConfigError::UnknownPreset(other.to_string())),
        };
        Ok(config)
    }

    /// Generate the full baseline mesh.
    ///
    /// # Errors
    /// Returns [`ConfigError::Generator`] for invalid generator input.
    pub fn build_baseline(&self) -> Result<WingMesh, ConfigError> {
        let mesh = match self.baseline {
            BaselineConfig::Rectangular {
                num_x,
                num_y,
                span,
                chord,
                cosine_spacing,
            } => gen_mesh(num_x, num_y, span, chord, cosine_spacing)?,
            BaselineConfig::Crm {
                n_points_inboard,
                n_points_outboard,
                num_x,
            } => gen_crm_mesh(
                n_points_inboard,
                n_points_outboard,
                num_x,
                &ReferencePlanform::CRM,
            )?,
        };
        Ok(mesh)
    }

    /// # Errors
    /// Propagates baseline and component construction errors.
    pub fn build_component(&self) -> Result<GeometryMesh, ConfigError> {
        Ok(GeometryMesh::new(self.build_baseline()?, self.num_twist)?)
    }

    /// Complex parameter set for `component`.
    ///
    /// # Errors
    /// Returns [`GeometryError::TwistLengthMismatch`] (wrapped) when a
    /// non-empty twist list does not have `num_twist` entries.
    pub fn parameters(&self, component: &GeometryMesh) -> Result<ParameterSet, ConfigError> {
        let design = &self.design;
        let twist = if design.twist.is_empty() {
            vec![0.0; self.num_twist]
        } else if design.twist.len() == self.num_twist {
            design.twist.clone()
        } else {
            return Err(GeometryError::TwistLengthMismatch {
                expected: self.num_twist,
                actual: design.twist.len(),
            }
            .into());
        };

        Ok(ParameterSet::new(self.num_twist)
            .with_span(design.span.unwrap_or_else(|| component.baseline_span()))
            .with_sweep(design.sweep)
            .with_dihedral(design.dihedral)
            .with_twist(&twist)
            .with_taper(design.taper))
    }
}
