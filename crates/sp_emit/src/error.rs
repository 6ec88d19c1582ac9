use std::io;
use std::path::PathBuf;

use sp_parser::SyntaxError;
use thiserror::Error;

/// Fatal failures of one preprocessing run.
#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("cannot write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("no class, interface or enum declaration names the output class")]
    UnrecognizedStructure,
}

impl PreprocessError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PreprocessError::Io {
            path: path.into(),
            source,
        }
    }
}
