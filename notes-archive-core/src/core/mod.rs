//! Internal modules of the notes archive codec.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod archive;
pub mod attachment;
pub mod binary;
pub mod color_space;
pub mod content;
pub mod error;
pub mod filename;
pub mod folder;
pub mod folder_id;
pub mod note;
pub mod package;
pub mod storage;
pub mod timestamp;
pub mod type_identifier;

#[doc(inline)]
pub use archive::{Archive, ArchiveMetadata, Creator};
#[doc(inline)]
pub use attachment::{Attachment, AttachmentContents, AttachmentMetadata};
#[doc(inline)]
pub use color_space::ColorSpace;
#[doc(inline)]
pub use content::Content;
#[doc(inline)]
pub use error::{ArchiveError, Result};
#[doc(inline)]
pub use filename::FilenameRules;
#[doc(inline)]
pub use folder::{Folder, FolderMetadata};
#[doc(inline)]
pub use folder_id::FolderIdentifier;
#[doc(inline)]
pub use note::{Note, NoteMetadata};
#[doc(inline)]
pub use package::{PackageChild, PackageDirectory, PackageEntry, PackageNode};
#[doc(inline)]
pub use timestamp::SanitizedTimestamp;
#[doc(inline)]
pub use type_identifier::TypeIdentifier;
