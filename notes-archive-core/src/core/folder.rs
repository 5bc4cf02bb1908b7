//! Folders: titled containers of subfolders and notes.

use crate::core::error::Result;
use crate::core::folder_id::FolderIdentifier;
use crate::core::note::Note;
use crate::core::package::{unique_identifiers, PackageChild, PackageDirectory, PackageNode};
use crate::core::type_identifier::{TypeIdentifier, PACKAGE};
use serde::{Deserialize, Serialize};

pub const FOLDER_CONTENT_TYPE: &str = "com.apple.notes.folder";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOrder {
    CreatedAt,
    ModifiedAt,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A folder's preferred note ordering. Recorded only; never applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSorting {
    pub order: SortOrder,
    pub direction: SortDirection,
}

/// The `info.json` record of a folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderMetadata {
    #[serde(default = "Folder::content_type")]
    type_identifier: TypeIdentifier,
    pub identifier: FolderIdentifier,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_sorting: Option<NoteSorting>,
    /// Derived from [`Folder::subfolders`] on encode.
    #[serde(default)]
    pub subfolder_identifiers: Vec<FolderIdentifier>,
}

impl FolderMetadata {
    pub fn new(identifier: FolderIdentifier, title: impl Into<String>) -> Self {
        Self {
            type_identifier: Folder::content_type(),
            identifier,
            title: title.into(),
            note_sorting: None,
            subfolder_identifiers: Vec::new(),
        }
    }

    #[must_use]
    pub fn type_identifier(&self) -> &TypeIdentifier {
        &self.type_identifier
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    pub metadata: FolderMetadata,
    pub subfolders: Vec<Folder>,
    pub notes: Vec<Note>,
}

impl Folder {
    /// An empty folder with a freshly generated identifier.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_contents(
            FolderMetadata::new(FolderIdentifier::generate(), title),
            Vec::new(),
            Vec::new(),
        )
    }

    pub fn with_contents(metadata: FolderMetadata, subfolders: Vec<Folder>, notes: Vec<Note>) -> Self {
        Self {
            metadata,
            subfolders,
            notes,
        }
    }

    /// Recomputes derived metadata throughout this subtree.
    pub fn refresh_identifiers(&mut self) {
        for subfolder in &mut self.subfolders {
            subfolder.refresh_identifiers();
        }
        for note in &mut self.notes {
            note.refresh_identifiers();
        }
        self.metadata.subfolder_identifiers =
            self.subfolders.iter().map(|f| f.metadata.identifier).collect();
    }
}

impl PackageNode for Folder {
    type Metadata = FolderMetadata;

    fn content_type() -> TypeIdentifier {
        TypeIdentifier::imported(FOLDER_CONTENT_TYPE, PACKAGE)
    }

    fn metadata(&self) -> &FolderMetadata {
        &self.metadata
    }

    fn encode(&self) -> Result<PackageDirectory> {
        let mut metadata = self.metadata.clone();
        metadata.subfolder_identifiers = unique_identifiers(
            "subfolder",
            self.subfolders.iter().map(|f| f.metadata.identifier),
        )?;
        unique_identifiers("note", self.notes.iter().map(|n| n.metadata.identifier))?;
        let mut dir = PackageDirectory::with_metadata(&metadata)?;
        dir.encode_children(&self.subfolders)?;
        dir.encode_children(&self.notes)?;
        Ok(dir)
    }

    fn decode(container: &PackageDirectory) -> Result<Self> {
        Ok(Self {
            metadata: container.metadata()?,
            subfolders: container.decode_children()?,
            notes: container.decode_children()?,
        })
    }
}

impl PackageChild for Folder {
    const PATH_EXTENSION: &'static str = "folder";
    const TYPE_NAME: &'static str = "Folder";

    fn preferred_name(&self) -> Option<&str> {
        Some(&self.metadata.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::folder_id::DEFAULT_FOLDER_SENTINEL;

    #[test]
    fn test_encode_derives_subfolder_identifiers() {
        let mut parent = Folder::new("Projects");
        parent.subfolders = vec![Folder::new("Alpha"), Folder::new("Beta")];
        let expected: Vec<_> = parent.subfolders.iter().map(|f| f.metadata.identifier).collect();

        let dir = parent.encode().unwrap();
        let metadata: FolderMetadata = dir.metadata().unwrap();
        assert_eq!(metadata.subfolder_identifiers, expected);
        assert!(parent.metadata.subfolder_identifiers.is_empty());
        assert!(dir.contains("Alpha.folder"));
        assert!(dir.contains("Beta.folder"));
    }

    #[test]
    fn test_stale_identifier_list_is_ignored_on_decode() {
        let mut folder = Folder::new("Inbox");
        folder.notes.push(Note::with_text("one"));
        let mut dir = folder.encode().unwrap();

        let mut metadata: FolderMetadata = dir.metadata().unwrap();
        metadata.subfolder_identifiers = vec![FolderIdentifier::generate()];
        let mut rewritten = PackageDirectory::with_metadata(&metadata).unwrap();
        for (name, entry) in dir.entries().filter(|(name, _)| *name != "info.json") {
            rewritten.insert(name, entry.clone()).unwrap();
        }
        dir = rewritten;

        let decoded = Folder::decode(&dir).unwrap();
        assert!(decoded.subfolders.is_empty());
        assert_eq!(decoded.notes.len(), 1);
        assert_eq!(decoded.metadata.subfolder_identifiers.len(), 1);
    }

    #[test]
    fn test_sentinel_identifier_and_sorting_wire_format() {
        let mut folder = Folder::with_contents(
            FolderMetadata::new(FolderIdentifier::Default, "Notes"),
            Vec::new(),
            Vec::new(),
        );
        folder.metadata.note_sorting = Some(NoteSorting {
            order: SortOrder::ModifiedAt,
            direction: SortDirection::Descending,
        });

        let value: serde_json::Value = folder.encode().unwrap().metadata().unwrap();
        assert_eq!(value["identifier"], DEFAULT_FOLDER_SENTINEL);
        assert_eq!(value["typeIdentifier"], FOLDER_CONTENT_TYPE);
        assert_eq!(value["noteSorting"]["order"], "MODIFIED_AT");
        assert_eq!(value["noteSorting"]["direction"], "DESCENDING");
        assert_eq!(value["subfolderIdentifiers"], serde_json::json!([]));
    }

    #[test]
    fn test_bad_folder_identifier_is_field_decode_error() {
        let json = r#"{"identifier":"not-a-folder","title":"x","subfolderIdentifiers":[]}"#;
        let mut dir = PackageDirectory::new();
        dir.insert(
            "info.json",
            crate::core::package::PackageEntry::File(json.as_bytes().to_vec()),
        )
        .unwrap();
        assert!(Folder::decode(&dir).unwrap_err().is_field_decode());
    }

    #[test]
    fn test_nested_round_trip() {
        let mut inner = Folder::new("Recipes");
        inner.notes.push(Note::with_text("Pancakes"));
        let mut outer = Folder::new("Home");
        outer.subfolders.push(inner);
        outer.notes.push(Note::with_text("Chores"));
        outer.refresh_identifiers();

        let decoded = Folder::decode(&outer.encode().unwrap()).unwrap();
        assert_eq!(decoded, outer);
    }

    #[test]
    fn test_duplicate_subfolder_identifiers_fail() {
        let child = Folder::new("Twin");
        let mut parent = Folder::new("Parent");
        parent.subfolders = vec![child.clone(), child];
        assert!(parent.encode().unwrap_err().is_structural());
    }

    #[test]
    fn test_duplicate_note_identifiers_fail() {
        let note = Note::with_text("Copied");
        let mut folder = Folder::new("Inbox");
        folder.notes = vec![note.clone(), note];
        let err = folder.encode().unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("duplicate note identifier"));
    }
}
