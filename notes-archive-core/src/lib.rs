//! Reading and writing exported notes archives.
//!
//! An archive is a directory package: every entity (archive, folder, note,
//! attachment) is a directory holding an `info.json` metadata document plus
//! one sub-directory per child. The primary entry point is [`Archive`]; use
//! [`Archive::open`] to read a package and [`Archive::write_to`] to write one
//! atomically.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    archive::{Archive, ArchiveMetadata, Creator, ARCHIVE_CONTENT_TYPE, CURRENT_REVISION},
    attachment::{
        attachment_types, Attachment, AttachmentContents, AttachmentMetadata, Cropping,
        ImageFilter, Orientation, Point, Rect, Size, ATTACHMENT_CONTENT_TYPE,
    },
    color_space::ColorSpace,
    content::{
        inline_attachment_types, Alignment, Attribute, ChecklistItem, Color, Content, Font,
        InlineAttachment, ParagraphStyle, ParagraphStyleName, Range, Superscript, WritingDirection,
    },
    error::{ArchiveError, Result},
    filename::{available_filename, sanitized_filename, FilenameRules},
    folder::{Folder, FolderMetadata, NoteSorting, SortDirection, SortOrder, FOLDER_CONTENT_TYPE},
    folder_id::FolderIdentifier,
    note::{
        AttachmentViewType, Background, EncryptedData, Note, NoteMetadata, PaperStyle,
        NOTE_CONTENT_TYPE,
    },
    package::{PackageChild, PackageDirectory, PackageEntry, PackageNode, METADATA_FILENAME},
    storage::{read_package, write_package},
    timestamp::SanitizedTimestamp,
    type_identifier::TypeIdentifier,
};
