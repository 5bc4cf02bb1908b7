//! Attachments: media, links, tables, galleries and drawings embedded in a note.
//!
//! An attachment container holds its `info.json`, an optional payload file
//! named by `mediaFilename`, and nested attachments for composite kinds
//! (a gallery's images, a table's cell attachments).

use crate::core::content::Content;
use crate::core::error::{ArchiveError, Result};
use crate::core::package::{
    unique_identifiers, PackageChild, PackageDirectory, PackageEntry, PackageNode,
    METADATA_FILENAME,
};
use crate::core::timestamp::{iso8601, SanitizedTimestamp};
use crate::core::type_identifier::{TypeIdentifier, COMPOSITE_CONTENT};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use uuid::Uuid;

pub const ATTACHMENT_CONTENT_TYPE: &str = "com.apple.notes.attachment";

/// Well-known values of [`AttachmentMetadata::attachment_type_identifier`].
pub mod attachment_types {
    pub const TABLE: &str = "com.apple.notes.table";
    pub const GALLERY: &str = "com.apple.notes.gallery";
    pub const SKETCH: &str = "com.apple.notes.sketch";
    pub const DRAWING: &str = "com.apple.drawing.2";
    pub const URL: &str = "public.url";

    /// Kinds that are assembled from sub-attachments.
    pub const COMPOSITE: &[&str] = &[TABLE, GALLERY, SKETCH, DRAWING];
}

/// A point, stored as `[x, y]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

/// A size, stored as `[width, height]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl From<[f64; 2]> for Size {
    fn from([width, height]: [f64; 2]) -> Self {
        Self { width, height }
    }
}

impl From<Size> for [f64; 2] {
    fn from(size: Size) -> Self {
        [size.width, size.height]
    }
}

/// A rectangle, stored as `[[x, y], [width, height]]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "(Point, Size)", into = "(Point, Size)")]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl From<(Point, Size)> for Rect {
    fn from((origin, size): (Point, Size)) -> Self {
        Self { origin, size }
    }
}

impl From<Rect> for (Point, Size) {
    fn from(rect: Rect) -> Self {
        (rect.origin, rect.size)
    }
}

/// Perspective-correction corners for a scanned document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cropping {
    pub bottom_right: Point,
    pub top_right: Point,
    pub top_left: Point,
    pub bottom_left: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Orientation {
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageFilter {
    Color,
    Grayscale,
    BlackAndWhite,
    Whiteboard,
}

/// The `info.json` record of an attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentMetadata {
    #[serde(default = "Attachment::content_type")]
    type_identifier: TypeIdentifier,
    pub identifier: Uuid,
    pub attachment_type_identifier: TypeIdentifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    media_filename: Option<String>,
    #[serde(with = "iso8601")]
    pub created_at: DateTime<Utc>,
    pub modified_at: SanitizedTimestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Rect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cropping: Option<Cropping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_filter: Option<ImageFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Cell contents, row by row, when the attachment is a table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Vec<Content>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_right_to_left: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subattachment_identifiers: Option<Vec<Uuid>>,
}

impl AttachmentMetadata {
    /// Metadata for a new attachment of the given kind, created now.
    pub fn new(attachment_type_identifier: TypeIdentifier) -> Self {
        let now = Utc::now();
        Self {
            type_identifier: Attachment::content_type(),
            identifier: Uuid::new_v4(),
            attachment_type_identifier,
            media_filename: None,
            created_at: now,
            modified_at: SanitizedTimestamp::new(now),
            title: None,
            bounds: None,
            cropping: None,
            orientation: None,
            image_filter: None,
            url: None,
            rows: None,
            is_right_to_left: None,
            subattachment_identifiers: None,
        }
    }

    #[must_use]
    pub fn type_identifier(&self) -> &TypeIdentifier {
        &self.type_identifier
    }

    /// Name of the payload file, kept in step with [`Attachment::contents`].
    #[must_use]
    pub fn media_filename(&self) -> Option<&str> {
        self.media_filename.as_deref()
    }
}

/// The media bytes of an attachment and the filename they are stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentContents {
    pub filename: String,
    pub data: Vec<u8>,
}

/// An attachment and any attachments nested inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub metadata: AttachmentMetadata,
    pub subattachments: Vec<Attachment>,
    contents: Option<AttachmentContents>,
}

impl Attachment {
    /// An attachment with no payload. Any `media_filename` in `metadata` is
    /// cleared; use [`set_contents`](Self::set_contents) to add one.
    pub fn new(metadata: AttachmentMetadata, subattachments: Vec<Attachment>) -> Self {
        let mut attachment = Self {
            metadata,
            subattachments,
            contents: None,
        };
        attachment.metadata.media_filename = None;
        attachment
    }

    /// A web link attachment.
    pub fn link(url: Option<String>, title: Option<String>) -> Self {
        let mut metadata = AttachmentMetadata::new(TypeIdentifier::content(attachment_types::URL));
        metadata.url = url;
        metadata.title = title;
        Self::new(metadata, Vec::new())
    }

    #[must_use]
    pub fn contents(&self) -> Option<&AttachmentContents> {
        self.contents.as_ref()
    }

    /// Uses `data` as the payload, stored as `filename`.
    pub fn set_contents(&mut self, data: Vec<u8>, filename: impl Into<String>) {
        let filename = filename.into();
        self.metadata.media_filename = Some(filename.clone());
        self.contents = Some(AttachmentContents { filename, data });
    }

    /// Reads the payload from the regular file at `path`, keeping its filename.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::SourceRead`] if `path` cannot be read, is not a
    /// regular file, or has no filename.
    pub fn set_contents_from_path(&mut self, path: &Path) -> Result<()> {
        let source_error = |reason: String| ArchiveError::SourceRead {
            path: path.to_path_buf(),
            reason,
        };
        let metadata = fs::metadata(path).map_err(|e| source_error(e.to_string()))?;
        if !metadata.is_file() {
            return Err(source_error("not a regular file".to_string()));
        }
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| source_error("has no usable file name".to_string()))?
            .to_string();
        let data = fs::read(path).map_err(|e| source_error(e.to_string()))?;
        self.set_contents(data, filename);
        Ok(())
    }

    pub fn clear_contents(&mut self) {
        self.metadata.media_filename = None;
        self.contents = None;
    }

    /// `true` for tables, galleries, sketches and drawings.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        attachment_types::COMPOSITE.contains(&self.metadata.attachment_type_identifier.identifier())
    }

    /// Recomputes derived metadata throughout this subtree.
    pub fn refresh_identifiers(&mut self) {
        for subattachment in &mut self.subattachments {
            subattachment.refresh_identifiers();
        }
        self.metadata.media_filename = self.contents.as_ref().map(|c| c.filename.clone());
        self.metadata.subattachment_identifiers = Some(
            self.subattachments
                .iter()
                .map(|a| a.metadata.identifier)
                .collect(),
        );
    }

    fn derived_metadata(&self) -> Result<AttachmentMetadata> {
        let mut metadata = self.metadata.clone();
        metadata.media_filename = self.contents.as_ref().map(|c| c.filename.clone());
        metadata.subattachment_identifiers = Some(unique_identifiers(
            "subattachment",
            self.subattachments.iter().map(|a| a.metadata.identifier),
        )?);
        Ok(metadata)
    }

    fn check_payload_name(filename: &str) -> Result<()> {
        let suffix = format!(".{}", Self::PATH_EXTENSION);
        if filename == METADATA_FILENAME || filename.ends_with(&suffix) {
            return Err(ArchiveError::InvalidPackage(format!(
                "`{filename}` cannot be used as a media filename"
            )));
        }
        Ok(())
    }
}

impl PackageNode for Attachment {
    type Metadata = AttachmentMetadata;

    fn content_type() -> TypeIdentifier {
        TypeIdentifier::imported(ATTACHMENT_CONTENT_TYPE, COMPOSITE_CONTENT)
    }

    fn metadata(&self) -> &AttachmentMetadata {
        &self.metadata
    }

    fn encode(&self) -> Result<PackageDirectory> {
        let metadata = self.derived_metadata()?;
        let mut dir = PackageDirectory::with_metadata(&metadata)?;
        if let Some(contents) = &self.contents {
            Self::check_payload_name(&contents.filename)?;
            dir.insert(
                contents.filename.clone(),
                PackageEntry::File(contents.data.clone()),
            )?;
        }
        dir.encode_children(&self.subattachments)?;
        Ok(dir)
    }

    fn decode(container: &PackageDirectory) -> Result<Self> {
        let metadata: AttachmentMetadata = container.metadata()?;
        let subattachments = container.decode_children()?;
        let contents = match metadata.media_filename.as_deref() {
            None => None,
            Some(filename) => {
                Self::check_payload_name(filename)?;
                match container.get(filename) {
                    Some(PackageEntry::File(data)) => Some(AttachmentContents {
                        filename: filename.to_string(),
                        data: data.clone(),
                    }),
                    Some(PackageEntry::Directory(_)) => {
                        return Err(ArchiveError::InvalidPackage(format!(
                            "media file `{filename}` is a directory"
                        )))
                    }
                    None => {
                        return Err(ArchiveError::InvalidPackage(format!(
                            "media file `{filename}` is missing"
                        )))
                    }
                }
            }
        };
        Ok(Self {
            metadata,
            subattachments,
            contents,
        })
    }
}

impl PackageChild for Attachment {
    const PATH_EXTENSION: &'static str = "attachment";
    const TYPE_NAME: &'static str = "Attachment";

    fn preferred_name(&self) -> Option<&str> {
        self.contents
            .as_ref()
            .map(|c| c.filename.as_str())
            .or(self.metadata.title.as_deref())
    }
}
