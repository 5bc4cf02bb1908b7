//! The archive: root of an exported notes package.

use crate::core::error::{ArchiveError, Result};
use crate::core::folder::Folder;
use crate::core::folder_id::FolderIdentifier;
use crate::core::package::{unique_identifiers, PackageDirectory, PackageNode};
use crate::core::storage;
use crate::core::timestamp::iso8601;
use crate::core::type_identifier::{TypeIdentifier, PACKAGE};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ARCHIVE_CONTENT_TYPE: &str = "com.apple.notes.archive";

/// Format revision written by this crate.
pub const CURRENT_REVISION: u32 = 1;

/// The software that produced an archive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software_version_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software_version: Option<String>,
}

impl Creator {
    /// Describes this crate.
    pub fn this_crate() -> Self {
        Self {
            software_version_name: Some(env!("CARGO_PKG_VERSION").to_string()),
            software_identifier: Some(env!("CARGO_PKG_NAME").to_string()),
            software_version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }
    }
}

/// The root `info.json` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveMetadata {
    #[serde(default = "Archive::content_type")]
    type_identifier: TypeIdentifier,
    #[serde(default = "current_revision")]
    revision: u32,
    #[serde(with = "iso8601")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Creator>,
    /// Derived from [`Archive::folders`] on encode.
    #[serde(default)]
    pub folder_identifiers: Vec<FolderIdentifier>,
}

fn current_revision() -> u32 {
    CURRENT_REVISION
}

impl ArchiveMetadata {
    #[must_use]
    pub fn type_identifier(&self) -> &TypeIdentifier {
        &self.type_identifier
    }

    /// The revision recorded in the package. New archives are always
    /// [`CURRENT_REVISION`].
    #[must_use]
    pub fn revision(&self) -> u32 {
        self.revision
    }
}

impl Default for ArchiveMetadata {
    fn default() -> Self {
        Self {
            type_identifier: Archive::content_type(),
            revision: CURRENT_REVISION,
            created_at: Utc::now(),
            created_by: None,
            folder_identifiers: Vec::new(),
        }
    }
}

/// An exported notes archive and all the folders in it.
///
/// ```no_run
/// use notes_archive_core::{Archive, Folder, Note};
/// use std::path::Path;
///
/// let mut folder = Folder::new("Notes");
/// folder.notes.push(Note::with_text("Groceries"));
///
/// let mut archive = Archive::default();
/// archive.folders.push(folder);
/// archive.write_to(Path::new("Export.notesarchive"))?;
///
/// let reopened = Archive::open(Path::new("Export.notesarchive"))?;
/// assert_eq!(reopened.folders.len(), 1);
/// # Ok::<(), notes_archive_core::ArchiveError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Archive {
    pub metadata: ArchiveMetadata,
    pub folders: Vec<Folder>,
}

impl Archive {
    pub fn new(metadata: ArchiveMetadata, folders: Vec<Folder>) -> Self {
        Self { metadata, folders }
    }

    /// Reads the archive package at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidPackage`] if `path` is not a directory or
    /// any container is malformed, [`ArchiveError::InvalidMetadata`] if an
    /// `info.json` does not decode, and [`ArchiveError::Io`] if reading fails.
    pub fn open(path: &Path) -> Result<Self> {
        log::debug!("opening archive at {}", path.display());
        storage::load(path).map_err(|e| match e {
            ArchiveError::InvalidPackage(reason) => {
                ArchiveError::InvalidPackage(format!("{}: {reason}", path.display()))
            }
            other => other,
        })
    }

    /// Writes the archive to `path`, atomically replacing anything there.
    ///
    /// # Errors
    ///
    /// Returns any encode error from the tree, or [`ArchiveError::Io`] if the
    /// package cannot be written. On failure `path` is left as it was.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        log::debug!("writing archive to {}", path.display());
        storage::save(self, path)
    }

    /// Recomputes every derived identifier list in the tree, in place.
    pub fn refresh_identifiers(&mut self) {
        for folder in &mut self.folders {
            folder.refresh_identifiers();
        }
        self.metadata.folder_identifiers = self.folders.iter().map(|f| f.metadata.identifier).collect();
    }
}

impl PackageNode for Archive {
    type Metadata = ArchiveMetadata;

    fn content_type() -> TypeIdentifier {
        TypeIdentifier::imported(ARCHIVE_CONTENT_TYPE, PACKAGE)
    }

    fn metadata(&self) -> &ArchiveMetadata {
        &self.metadata
    }

    fn encode(&self) -> Result<PackageDirectory> {
        let mut metadata = self.metadata.clone();
        metadata.folder_identifiers =
            unique_identifiers("folder", self.folders.iter().map(|f| f.metadata.identifier))?;
        let mut dir = PackageDirectory::with_metadata(&metadata)?;
        dir.encode_children(&self.folders)?;
        Ok(dir)
    }

    fn decode(container: &PackageDirectory) -> Result<Self> {
        Ok(Self {
            metadata: container.metadata()?,
            folders: container.decode_children()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::folder_id::QUICK_NOTES_SENTINEL;
    use crate::core::package::{PackageEntry, METADATA_FILENAME};

    #[test]
    fn test_new_metadata_defaults() {
        let metadata = ArchiveMetadata::default();
        assert_eq!(metadata.revision(), CURRENT_REVISION);
        assert_eq!(metadata.type_identifier().identifier(), ARCHIVE_CONTENT_TYPE);
        assert_eq!(metadata.type_identifier().supertype(), PACKAGE);
    }

    #[test]
    fn test_encode_writes_folder_identifiers() {
        let mut quick = Folder::new("Quick Notes");
        quick.metadata.identifier = FolderIdentifier::QuickNotes;
        let archive = Archive::new(
            ArchiveMetadata {
                created_by: Some(Creator::this_crate()),
                ..ArchiveMetadata::default()
            },
            vec![quick],
        );

        let dir = archive.encode().unwrap();
        assert!(dir.contains("Quick Notes.folder"));
        let value: serde_json::Value = dir.metadata().unwrap();
        assert_eq!(value["revision"], 1);
        assert_eq!(value["folderIdentifiers"], serde_json::json!([QUICK_NOTES_SENTINEL]));
        assert_eq!(value["createdBy"]["softwareIdentifier"], env!("CARGO_PKG_NAME"));
    }

    #[test]
    fn test_decode_keeps_recorded_revision() {
        let json = r#"{"revision":7,"createdAt":"2021-01-01T00:00:00Z","folderIdentifiers":[]}"#;
        let mut dir = PackageDirectory::new();
        dir.insert(METADATA_FILENAME, PackageEntry::File(json.as_bytes().to_vec()))
            .unwrap();
        let archive = Archive::decode(&dir).unwrap();
        assert_eq!(archive.metadata.revision(), 7);
        assert!(archive.folders.is_empty());
    }

    #[test]
    fn test_duplicate_folder_identifiers_fail() {
        let mut first = Folder::new("A");
        first.metadata.identifier = FolderIdentifier::Default;
        let mut second = Folder::new("B");
        second.metadata.identifier = FolderIdentifier::Default;
        let archive = Archive::new(ArchiveMetadata::default(), vec![first, second]);
        let err = archive.encode().unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains(crate::core::folder_id::DEFAULT_FOLDER_SENTINEL));
    }

    #[test]
    fn test_refresh_identifiers_matches_encoded_lists() {
        let mut archive = Archive::default();
        archive.folders.push(Folder::new("One"));
        archive.folders.push(Folder::new("Two"));
        archive.refresh_identifiers();
        let decoded = Archive::decode(&archive.encode().unwrap()).unwrap();
        assert_eq!(decoded.metadata.folder_identifiers, archive.metadata.folder_identifiers);
    }
}
