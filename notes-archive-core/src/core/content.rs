//! Rich-text note content: a string plus attribute runs over it.
//!
//! These records pass through the codec unchanged; nothing here interprets
//! or renders them.

use crate::core::color_space::ColorSpace;
use crate::core::timestamp::iso8601;
use crate::core::type_identifier::TypeIdentifier;
use chrono::{DateTime, Utc};
use serde::de::{Deserializer, Error as DeError};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Well-known inline attachment types.
pub mod inline_attachment_types {
    pub const UNKNOWN: &str = "com.apple.notes.inlinetextattachment";
    pub const MENTION: &str = "com.apple.notes.inlinetextattachment.mention";
    pub const HASHTAG: &str = "com.apple.notes.inlinetextattachment.hashtag";
}

/// Text with styling runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub text: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl Content {
    /// Unstyled text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attributes: Vec::new(),
        }
    }
}

/// A half-open run `[starts_at, starts_at + length)` over the content text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub starts_at: usize,
    pub length: usize,
}

impl Range {
    /// One past the last position, or `None` if the run does not fit in `usize`.
    #[must_use]
    pub fn end(&self) -> Option<usize> {
        self.starts_at.checked_add(self.length)
    }
}

/// Styling applied to one [`Range`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub range: Range,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_style: Option<ParagraphStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writing_direction: Option<WritingDirection>,
    /// Identifier of the [`Attachment`](super::attachment::Attachment) shown at this position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_identifier: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_attachment: Option<InlineAttachment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WritingDirection {
    Natural,
    LeftToRight,
    LeftToRightOverride,
    RightToLeft,
    RightToLeftOverride,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Font {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_strikethrough: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superscript: Option<Superscript>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

/// Baseline offset, stored as `1`, `0` or `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Superscript {
    Superscript,
    UseDefault,
    Subscript,
}

impl Superscript {
    fn raw_value(self) -> i64 {
        match self {
            Self::Superscript => 1,
            Self::UseDefault => 0,
            Self::Subscript => -1,
        }
    }
}

impl Serialize for Superscript {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.raw_value())
    }
}

impl<'de> Deserialize<'de> for Superscript {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match i64::deserialize(deserializer)? {
            1 => Ok(Self::Superscript),
            0 => Ok(Self::UseDefault),
            -1 => Ok(Self::Subscript),
            other => Err(D::Error::custom(format!("invalid superscript value {other}"))),
        }
    }
}

/// A color as components in a named color space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub space: ColorSpace,
    pub components: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    pub name: ParagraphStyleName,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default)]
    pub indent: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_item_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checklist_item: Option<ChecklistItem>,
}

impl Default for ParagraphStyle {
    fn default() -> Self {
        Self {
            name: ParagraphStyleName::Body,
            alignment: Alignment::Natural,
            indent: 0,
            starting_item_number: None,
            checklist_item: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParagraphStyleName {
    Title,
    Heading,
    Subheading,
    Body,
    Caption,
    Monospaced,
    BulletList,
    DashedList,
    NumberedList,
    Checklist,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Alignment {
    #[default]
    Natural,
    Center,
    Right,
    Left,
    Justified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub identifier: Uuid,
    pub is_done: bool,
}

/// A mention, hashtag or similar token embedded in the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineAttachment {
    pub identifier: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    pub attachment_type_identifier: TypeIdentifier,
    #[serde(with = "iso8601")]
    pub created_at: DateTime<Utc>,
}
