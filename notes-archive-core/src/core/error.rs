//! Error types for the notes archive core library.

use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur while encoding or decoding a notes package.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The package tree does not have the expected shape: a container is not
    /// a directory, `info.json` is missing, or a recorded payload file is absent.
    #[error("Invalid package: {0}")]
    InvalidPackage(String),

    /// An `info.json` document could not be decoded into its metadata record.
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(#[source] serde_json::Error),

    /// A folder identifier is neither a well-known sentinel nor a UUID.
    #[error("Invalid folder identifier: {0}")]
    InvalidFolderIdentifier(String),

    /// A color space name is not one of the registered color spaces.
    #[error("Unknown color space: {0}")]
    UnknownColorSpace(String),

    /// A metadata record could not be serialized.
    #[error("Failed to encode metadata: {0}")]
    Encode(#[from] serde_json::Error),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A media source supplied by the caller could not be read.
    #[error("Cannot read attachment source {}: {reason}", path.display())]
    SourceRead { path: PathBuf, reason: String },
}

/// Convenience alias that pins the error type to [`ArchiveError`].
pub type Result<T> = std::result::Result<T, ArchiveError>;

impl ArchiveError {
    /// Returns `true` for errors caused by the package's directory structure.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::InvalidPackage(_))
    }

    /// Returns `true` for errors caused by a field that failed to decode.
    #[must_use]
    pub fn is_field_decode(&self) -> bool {
        matches!(
            self,
            Self::InvalidMetadata(_) | Self::InvalidFolderIdentifier(_) | Self::UnknownColorSpace(_)
        )
    }

    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidPackage(_) => "This is not a valid notes archive".to_string(),
            Self::InvalidMetadata(e) => format!("The archive contains unreadable data: {e}"),
            Self::InvalidFolderIdentifier(id) => format!("Unrecognised folder: {id}"),
            Self::UnknownColorSpace(name) => format!("Unsupported color space: {name}"),
            Self::Encode(e) => format!("Failed to save: {e}"),
            Self::Io(e) => format!("File error: {e}"),
            Self::SourceRead { path, .. } => {
                format!("Could not read {}", path.display())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_classification() {
        let e = ArchiveError::InvalidPackage("missing info.json".to_string());
        assert!(e.is_structural());
        assert!(!e.is_field_decode());
        assert!(e.to_string().contains("info.json"));
    }

    #[test]
    fn test_field_decode_classification() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert!(ArchiveError::InvalidMetadata(json_err).is_field_decode());
        assert!(ArchiveError::UnknownColorSpace("x".into()).is_field_decode());
        assert!(ArchiveError::InvalidFolderIdentifier("x".into()).is_field_decode());
        assert!(!ArchiveError::Io(std::io::Error::other("disk")).is_field_decode());
    }

    #[test]
    fn test_source_read_message_names_path() {
        let e = ArchiveError::SourceRead {
            path: PathBuf::from("/tmp/photo.jpg"),
            reason: "not a regular file".to_string(),
        };
        assert!(e.to_string().contains("/tmp/photo.jpg"));
        assert!(e.user_message().contains("photo.jpg"));
    }
}
