//! The directory-package codec shared by every entity.
//!
//! Each entity is stored as a directory holding an `info.json` metadata
//! document plus one sub-directory per child entity:
//!
//! ```text
//! Notes.folder/
//! ├── info.json
//! ├── Groceries.note/
//! │   ├── info.json
//! │   └── receipt.jpg.attachment/
//! │       ├── info.json
//! │       └── receipt.jpg
//! └── Note.note/
//!     └── info.json
//! ```
//!
//! Encoding and decoding operate on [`PackageDirectory`], an in-memory tree;
//! moving a tree to and from disk is the job of [`storage`](super::storage).
//!
//! Children are discovered on decode by path extension alone, in the order
//! the tree lists them (byte-wise by name). The derived identifier lists in
//! metadata are never used to reorder or filter them.

use crate::core::error::{ArchiveError, Result};
use crate::core::filename::{available_filename, sanitized_filename};
use crate::core::type_identifier::TypeIdentifier;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt::Display;
use std::hash::Hash;

/// Fixed name of the metadata document inside every container.
pub const METADATA_FILENAME: &str = "info.json";

/// A node in a package tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageEntry {
    Directory(PackageDirectory),
    File(Vec<u8>),
}

impl PackageEntry {
    /// Returns the directory, or a structural error if this entry is a file.
    pub fn container(&self) -> Result<&PackageDirectory> {
        match self {
            Self::Directory(dir) => Ok(dir),
            Self::File(_) => Err(ArchiveError::InvalidPackage(
                "expected a directory but found a file".to_string(),
            )),
        }
    }

    #[must_use]
    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory(_))
    }
}

/// An in-memory directory: named entries in byte-wise name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageDirectory {
    entries: BTreeMap<String, PackageEntry>,
}

impl PackageDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a container whose only entry is `info.json` holding `metadata`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Encode`] if `metadata` cannot be serialized.
    pub fn with_metadata<M: Serialize>(metadata: &M) -> Result<Self> {
        let document = serde_json::to_vec_pretty(metadata)?;
        let mut dir = Self::new();
        dir.insert(METADATA_FILENAME, PackageEntry::File(document))?;
        Ok(dir)
    }

    /// Decodes this container's `info.json`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidPackage`] if `info.json` is missing or is
    /// not a regular file, and [`ArchiveError::InvalidMetadata`] if it does not
    /// decode into `M`.
    pub fn metadata<M: DeserializeOwned>(&self) -> Result<M> {
        match self.entries.get(METADATA_FILENAME) {
            Some(PackageEntry::File(document)) => {
                serde_json::from_slice(document).map_err(ArchiveError::InvalidMetadata)
            }
            Some(PackageEntry::Directory(_)) => Err(ArchiveError::InvalidPackage(format!(
                "{METADATA_FILENAME} is a directory"
            ))),
            None => Err(ArchiveError::InvalidPackage(format!(
                "container has no {METADATA_FILENAME}"
            ))),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PackageEntry> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Adds an entry under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidPackage`] if `name` is not a single path
    /// component or is already in use.
    pub fn insert(&mut self, name: impl Into<String>, entry: PackageEntry) -> Result<()> {
        let name = name.into();
        if !is_valid_entry_name(&name) {
            return Err(ArchiveError::InvalidPackage(format!(
                "`{name}` is not a valid entry name"
            )));
        }
        if self.entries.contains_key(&name) {
            return Err(ArchiveError::InvalidPackage(format!(
                "duplicate entry `{name}`"
            )));
        }
        self.entries.insert(name, entry);
        Ok(())
    }

    /// Entries in byte-wise name order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &PackageEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encodes `child` and adds it under a unique name derived from its
    /// preferred display name. Returns the name used.
    pub fn insert_child<T: PackageChild>(&mut self, child: &T) -> Result<String> {
        let encoded = child.encode()?;
        let name = available_filename(&child.path_component(), T::PATH_EXTENSION, |candidate| {
            self.contains(candidate)
        });
        log::debug!("encoded {} as `{name}`", T::TYPE_NAME);
        self.insert(name.clone(), PackageEntry::Directory(encoded))?;
        Ok(name)
    }

    /// Encodes every child in order. Stops at the first failure.
    pub fn encode_children<T: PackageChild>(&mut self, children: &[T]) -> Result<()> {
        for child in children {
            self.insert_child(child)?;
        }
        Ok(())
    }

    /// Decodes every direct entry whose name ends in `.<T::PATH_EXTENSION>`.
    ///
    /// # Errors
    ///
    /// Propagates the first child's decode failure. A matching entry that is a
    /// file rather than a directory is an [`ArchiveError::InvalidPackage`].
    pub fn decode_children<T: PackageChild>(&self) -> Result<Vec<T>> {
        let suffix = format!(".{}", T::PATH_EXTENSION);
        self.entries()
            .filter(|(name, _)| name.ends_with(&suffix))
            .map(|(name, entry)| {
                log::debug!("decoding {} from `{name}`", T::TYPE_NAME);
                T::decode_entry(entry).map_err(|e| match e {
                    ArchiveError::InvalidPackage(reason) => {
                        ArchiveError::InvalidPackage(format!("{name}: {reason}"))
                    }
                    other => other,
                })
            })
            .collect()
    }
}

/// `true` when `name` is usable as a single directory entry.
#[must_use]
pub fn is_valid_entry_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\0'])
}

/// Collects `identifiers` in order, failing on the first repeat.
///
/// # Errors
///
/// Returns [`ArchiveError::InvalidPackage`] naming the duplicated `kind` identifier.
pub fn unique_identifiers<I>(kind: &str, identifiers: impl IntoIterator<Item = I>) -> Result<Vec<I>>
where
    I: Eq + Hash + Clone + Display,
{
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for identifier in identifiers {
        if !seen.insert(identifier.clone()) {
            return Err(ArchiveError::InvalidPackage(format!(
                "duplicate {kind} identifier {identifier}"
            )));
        }
        ordered.push(identifier);
    }
    Ok(ordered)
}

/// An entity that round-trips through a package directory.
pub trait PackageNode: Sized {
    /// The record written to `info.json`.
    type Metadata: Serialize + DeserializeOwned;

    /// Stable type tag, stored in metadata but never used for dispatch.
    fn content_type() -> TypeIdentifier;

    fn metadata(&self) -> &Self::Metadata;

    /// Builds the container for this entity, recomputing derived metadata
    /// from the children it currently holds.
    fn encode(&self) -> Result<PackageDirectory>;

    /// Rebuilds the entity from a container.
    fn decode(container: &PackageDirectory) -> Result<Self>;

    /// Like [`decode`](Self::decode), but first checks that `entry` is a directory.
    fn decode_entry(entry: &PackageEntry) -> Result<Self> {
        Self::decode(entry.container()?)
    }
}

/// A [`PackageNode`] that lives inside a parent container.
pub trait PackageChild: PackageNode {
    /// Suffix of this entity's container names, without the dot.
    const PATH_EXTENSION: &'static str;

    /// Fallback container name when the entity has no usable display name.
    const TYPE_NAME: &'static str;

    /// The human-readable name to derive a container name from, if any.
    fn preferred_name(&self) -> Option<&str> {
        None
    }

    /// The sanitized base name for this entity's container.
    fn path_component(&self) -> String {
        self.preferred_name()
            .map(sanitized_filename)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| Self::TYPE_NAME.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct LeafMetadata {
        label: String,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Leaf {
        metadata: LeafMetadata,
    }

    impl Leaf {
        fn new(label: &str) -> Self {
            Self {
                metadata: LeafMetadata {
                    label: label.to_string(),
                },
            }
        }
    }

    impl PackageNode for Leaf {
        type Metadata = LeafMetadata;

        fn content_type() -> TypeIdentifier {
            TypeIdentifier::content("org.example.leaf")
        }

        fn metadata(&self) -> &LeafMetadata {
            &self.metadata
        }

        fn encode(&self) -> Result<PackageDirectory> {
            PackageDirectory::with_metadata(&self.metadata)
        }

        fn decode(container: &PackageDirectory) -> Result<Self> {
            Ok(Self {
                metadata: container.metadata()?,
            })
        }
    }

    impl PackageChild for Leaf {
        const PATH_EXTENSION: &'static str = "leaf";
        const TYPE_NAME: &'static str = "Leaf";

        fn preferred_name(&self) -> Option<&str> {
            Some(&self.metadata.label)
        }
    }

    #[test]
    fn test_with_metadata_writes_info_json() {
        let dir = PackageDirectory::with_metadata(&LeafMetadata {
            label: "x".to_string(),
        })
        .unwrap();
        assert_eq!(dir.len(), 1);
        let Some(PackageEntry::File(bytes)) = dir.get(METADATA_FILENAME) else {
            panic!("info.json should be a file");
        };
        let value: serde_json::Value = serde_json::from_slice(bytes).unwrap();
        assert_eq!(value["label"], "x");
    }

    #[test]
    fn test_missing_metadata_is_structural() {
        let err = PackageDirectory::new().metadata::<LeafMetadata>().unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_metadata_directory_is_structural() {
        let mut dir = PackageDirectory::new();
        dir.insert(METADATA_FILENAME, PackageEntry::Directory(PackageDirectory::new()))
            .unwrap();
        assert!(dir.metadata::<LeafMetadata>().unwrap_err().is_structural());
    }

    #[test]
    fn test_malformed_metadata_is_field_decode() {
        let mut dir = PackageDirectory::new();
        dir.insert(METADATA_FILENAME, PackageEntry::File(b"{ not json".to_vec()))
            .unwrap();
        assert!(dir.metadata::<LeafMetadata>().unwrap_err().is_field_decode());
    }

    #[test]
    fn test_decode_entry_rejects_files() {
        let err = Leaf::decode_entry(&PackageEntry::File(Vec::new())).unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_insert_rejects_bad_names_and_duplicates() {
        let mut dir = PackageDirectory::new();
        for bad in ["", ".", "..", "a/b"] {
            assert!(dir.insert(bad, PackageEntry::File(Vec::new())).is_err());
        }
        dir.insert("a", PackageEntry::File(Vec::new())).unwrap();
        assert!(dir.insert("a", PackageEntry::File(Vec::new())).unwrap_err().is_structural());
    }

    #[test]
    fn test_colliding_children_get_counters() {
        let mut dir = PackageDirectory::new();
        let leaves = vec![Leaf::new("Work"), Leaf::new("Work"), Leaf::new(" Work\nmore")];
        dir.encode_children(&leaves).unwrap();
        assert!(dir.contains("Work.leaf"));
        assert!(dir.contains("Work 2.leaf"));
        assert!(dir.contains("Work 3.leaf"));
    }

    #[test]
    fn test_empty_name_falls_back_to_type_name() {
        let mut dir = PackageDirectory::new();
        assert_eq!(dir.insert_child(&Leaf::new("  ")).unwrap(), "Leaf.leaf");
        assert_eq!(dir.insert_child(&Leaf::new("::")).unwrap(), "Leaf 2.leaf");
    }

    #[test]
    fn test_decode_children_matches_suffix_only() {
        let mut dir = PackageDirectory::with_metadata(&LeafMetadata {
            label: "parent".to_string(),
        })
        .unwrap();
        dir.encode_children(&[Leaf::new("b"), Leaf::new("a")]).unwrap();
        dir.insert("stray.txt", PackageEntry::File(b"ignored".to_vec()))
            .unwrap();

        let decoded: Vec<Leaf> = dir.decode_children().unwrap();
        let labels: Vec<_> = decoded.iter().map(|l| l.metadata.label.as_str()).collect();
        assert_eq!(labels, ["a", "b"]);
    }

    #[test]
    fn test_unique_identifiers_preserves_order() {
        assert_eq!(unique_identifiers("leaf", [3, 1, 2]).unwrap(), vec![3, 1, 2]);
        let err = unique_identifiers("leaf", [1, 2, 1]).unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("duplicate leaf identifier 1"));
    }

    #[test]
    fn test_decode_children_reports_file_with_matching_suffix() {
        let mut dir = PackageDirectory::new();
        dir.insert("broken.leaf", PackageEntry::File(Vec::new())).unwrap();
        let err = dir.decode_children::<Leaf>().unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("broken.leaf"));
    }
}
