use std::path::PathBuf;

/// Errors while turning mesh files into a (vertices, faces) pair.
#[derive(Debug, thiserror::Error)]
pub enum MeshReadError {
    #[error("could not open '{path}' for reading: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no mesh file given")]
    NoFiles,

    #[error(
        "{count} mesh files given; no supported mesh format spans more than two files, \
         the polyhedron would be over-specified"
    )]
    TooManyFiles { count: usize },

    #[error("unsupported mesh file suffix in '{path}'")]
    UnsupportedSuffix { path: PathBuf },

    #[error(
        "a single '{path}' does not define a polyhedron; supply the .node file \
         followed by its .face companion"
    )]
    MissingCompanion { path: PathBuf },

    #[error(
        "expected a .node file followed by a .face file, got '{first}' and '{second}'"
    )]
    MismatchedPair { first: PathBuf, second: PathBuf },

    #[error("{path}:{line}: {reason}")]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

impl MeshReadError {
    pub(crate) fn malformed(
        path: impl Into<PathBuf>,
        line: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::Malformed {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }
}
