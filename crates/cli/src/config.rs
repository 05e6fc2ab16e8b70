//! The YAML configuration of a gravity run: everything lives below the
//! top-level `gravityModel` key.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::CliError;
use gravity_kernel::IntegrityPolicy;

/// The whole configuration file.
#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    #[serde(rename = "gravityModel")]
    pub gravity_model: GravityModelConfig,
}

#[derive(Debug, Deserialize)]
pub struct GravityModelConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct InputConfig {
    /// The mesh file list handed to the mesh reader.
    pub polyhedron: Vec<PathBuf>,
    /// Constant density in kg/m^3.
    pub density: f64,
    /// Field points, each a `[x, y, z]` triple.
    pub points: Vec<[f64; 3]>,
    /// Whether to verify the mesh before evaluating. Off by default, as
    /// the check costs quadratic time in the face count.
    #[serde(default)]
    pub check_mesh: bool,
}

impl InputConfig {
    pub fn integrity_policy(&self) -> IntegrityPolicy {
        if self.check_mesh {
            IntegrityPolicy::Verify
        } else {
            IntegrityPolicy::Disable
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Optional CSV output path; results are only echoed to the log when
    /// absent.
    pub filename: Option<PathBuf>,
}

/// Loads and deserializes a configuration file.
pub fn load(path: &Path) -> Result<ConfigFile, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content, path)
}

fn parse(content: &str, path: &Path) -> Result<ConfigFile, CliError> {
    serde_yaml::from_str(content).map_err(|source| CliError::InvalidConfig {
        path: path.to_path_buf(),
        source,
    })
}
