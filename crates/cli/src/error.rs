use std::path::PathBuf;

use gravity_kernel::PolyhedronError;
use mesh_io::MeshReadError;

/// Everything that can end a gravity run with a non-zero exit.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("could not read configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration '{path}': {source}")]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Mesh(#[from] MeshReadError),

    #[error(transparent)]
    Polyhedron(#[from] PolyhedronError),

    #[error("could not write results to '{path}': {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
