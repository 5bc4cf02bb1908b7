//! Folder identifiers: two well-known sentinel folders plus generated UUIDs.

use crate::core::error::{ArchiveError, Result};
use serde::de::{Deserializer, Error as DeError};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Wire form of [`FolderIdentifier::Default`].
pub const DEFAULT_FOLDER_SENTINEL: &str = "DefaultFolder-CloudKit";

/// Wire form of [`FolderIdentifier::QuickNotes`].
pub const QUICK_NOTES_SENTINEL: &str = "SystemPaper-CloudKit";

/// Identifies a folder within an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FolderIdentifier {
    /// The account's default "Notes" folder.
    Default,
    /// The system Quick Notes folder.
    QuickNotes,
    /// Any user-created folder.
    Custom(Uuid),
}

impl FolderIdentifier {
    /// A fresh custom identifier.
    pub fn generate() -> Self {
        Self::Custom(Uuid::new_v4())
    }
}

impl Default for FolderIdentifier {
    fn default() -> Self {
        Self::generate()
    }
}

/// Sentinels are matched before UUID parsing, exactly and case-sensitively.
impl FromStr for FolderIdentifier {
    type Err = ArchiveError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw {
            DEFAULT_FOLDER_SENTINEL => Ok(Self::Default),
            QUICK_NOTES_SENTINEL => Ok(Self::QuickNotes),
            _ => Uuid::parse_str(raw)
                .map(Self::Custom)
                .map_err(|_| ArchiveError::InvalidFolderIdentifier(raw.to_string())),
        }
    }
}

impl fmt::Display for FolderIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str(DEFAULT_FOLDER_SENTINEL),
            Self::QuickNotes => f.write_str(QUICK_NOTES_SENTINEL),
            Self::Custom(uuid) => {
                f.write_str(uuid.hyphenated().encode_upper(&mut Uuid::encode_buffer()))
            }
        }
    }
}

impl Serialize for FolderIdentifier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FolderIdentifier {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}
