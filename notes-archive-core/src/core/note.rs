//! Notes: a rich-text body, display preferences, and owned attachments.

use crate::core::attachment::Attachment;
use crate::core::binary;
use crate::core::content::Content;
use crate::core::error::Result;
use crate::core::filename::sanitized_filename;
use crate::core::package::{unique_identifiers, PackageChild, PackageDirectory, PackageNode};
use crate::core::timestamp::{iso8601, SanitizedTimestamp};
use crate::core::type_identifier::{TypeIdentifier, PACKAGE};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const NOTE_CONTENT_TYPE: &str = "com.apple.notes.note";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaperStyle {
    None,
    SmallGrid,
    MediumGrid,
    LargeGrid,
    SmallLines,
    MediumLines,
    LargeLines,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Background {
    Default,
    Light,
}

/// How attachments are shown inline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttachmentViewType {
    #[default]
    Preview,
    Thumbnail,
}

/// Envelope of a password-protected note. The codec carries it opaquely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedData {
    pub iteration_count: i64,
    #[serde(with = "binary")]
    pub salt: Vec<u8>,
    #[serde(with = "binary")]
    pub initialization_vector: Vec<u8>,
    #[serde(with = "binary")]
    pub tag: Vec<u8>,
    #[serde(with = "binary")]
    pub wrapped_key: Vec<u8>,
    pub password_hint: String,
    #[serde(default, with = "binary::optional", skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<u8>>,
}

/// The `info.json` record of a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteMetadata {
    pub identifier: Uuid,
    #[serde(default = "Note::content_type")]
    type_identifier: TypeIdentifier,
    #[serde(with = "iso8601")]
    pub created_at: DateTime<Utc>,
    pub modified_at: SanitizedTimestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_style: Option<PaperStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_background: Option<Background>,
    #[serde(default)]
    pub attachment_view_type: AttachmentViewType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_data: Option<EncryptedData>,
    /// Absent in some exports; read as empty text.
    #[serde(default)]
    pub content: Content,
}

impl NoteMetadata {
    #[must_use]
    pub fn type_identifier(&self) -> &TypeIdentifier {
        &self.type_identifier
    }
}

impl Default for NoteMetadata {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            identifier: Uuid::new_v4(),
            type_identifier: Note::content_type(),
            created_at: now,
            modified_at: SanitizedTimestamp::new(now),
            title: None,
            is_pinned: false,
            paper_style: None,
            preferred_background: None,
            attachment_view_type: AttachmentViewType::default(),
            encrypted_data: None,
            content: Content::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub metadata: NoteMetadata,
    pub attachments: Vec<Attachment>,
}

impl Note {
    pub fn new(metadata: NoteMetadata, attachments: Vec<Attachment>) -> Self {
        Self {
            metadata,
            attachments,
        }
    }

    /// A new, unattached note with plain-text content.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::new(
            NoteMetadata {
                content: Content::plain(text),
                ..NoteMetadata::default()
            },
            Vec::new(),
        )
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.metadata.content.text
    }

    /// Recomputes derived metadata on every attachment.
    pub fn refresh_identifiers(&mut self) {
        for attachment in &mut self.attachments {
            attachment.refresh_identifiers();
        }
    }
}

impl PackageNode for Note {
    type Metadata = NoteMetadata;

    fn content_type() -> TypeIdentifier {
        TypeIdentifier::imported(NOTE_CONTENT_TYPE, PACKAGE)
    }

    fn metadata(&self) -> &NoteMetadata {
        &self.metadata
    }

    fn encode(&self) -> Result<PackageDirectory> {
        unique_identifiers(
            "attachment",
            self.attachments.iter().map(|a| a.metadata.identifier),
        )?;
        let mut dir = PackageDirectory::with_metadata(&self.metadata)?;
        dir.encode_children(&self.attachments)?;
        Ok(dir)
    }

    fn decode(container: &PackageDirectory) -> Result<Self> {
        Ok(Self {
            metadata: container.metadata()?,
            attachments: container.decode_children()?,
        })
    }
}

impl PackageChild for Note {
    const PATH_EXTENSION: &'static str = "note";
    const TYPE_NAME: &'static str = "Note";

    fn preferred_name(&self) -> Option<&str> {
        Some(self.text())
    }

    // The first line of the body is the usual display name; an empty body
    // falls back to the title before the type name.
    fn path_component(&self) -> String {
        [Some(self.text()), self.metadata.title.as_deref()]
            .into_iter()
            .flatten()
            .map(sanitized_filename)
            .find(|name| !name.is_empty())
            .unwrap_or_else(|| Self::TYPE_NAME.to_string())
    }
}
