//! Fatal error kinds
//!
//! Per-file read failures are not errors at this level: they are recorded in
//! the report and the run continues.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlattenError {
    #[error("source directory does not exist: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("source is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),

    #[error("source directory has no name to derive an output directory from: {}", .0.display())]
    SourceUnnamed(PathBuf),

    #[error("output directory {} overlaps source {}", output.display(), root.display())]
    OutputOverlapsSource { output: PathBuf, root: PathBuf },

    #[error("failed to write output {}: {cause}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    #[error("invalid join token {0:?}: must be non-empty and contain no path separator")]
    InvalidJoinToken(String),

    #[error("{first} and {second} both flatten to {name}")]
    Collision {
        name: String,
        first: String,
        second: String,
    },
}

impl FlattenError {
    pub fn output_write(path: impl Into<PathBuf>, cause: std::io::Error) -> Self {
        FlattenError::OutputWrite {
            path: path.into(),
            cause,
        }
    }

    /// Short machine-readable code, used in structured reports
    pub fn code(&self) -> &'static str {
        match self {
            FlattenError::SourceMissing(_)
            | FlattenError::SourceNotDirectory(_)
            | FlattenError::SourceUnnamed(_) => "INVALID_SOURCE",
            FlattenError::OutputOverlapsSource { .. } => "OUTPUT_OVERLAPS_SOURCE",
            FlattenError::OutputWrite { .. } => "OUTPUT_WRITE_FAILURE",
            FlattenError::InvalidJoinToken(_) => "INVALID_CONFIG",
            FlattenError::Collision { .. } => "COLLISION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(
            FlattenError::SourceMissing(PathBuf::from("/nope")).code(),
            "INVALID_SOURCE"
        );
        assert_eq!(
            FlattenError::InvalidJoinToken("/".into()).code(),
            "INVALID_CONFIG"
        );
    }

    #[test]
    fn test_collision_message() {
        let err = FlattenError::Collision {
            name: "a__b.txt".into(),
            first: "a/b.txt".into(),
            second: "a__b.txt".into(),
        };
        assert_eq!(err.to_string(), "a/b.txt and a__b.txt both flatten to a__b.txt");
    }
}
