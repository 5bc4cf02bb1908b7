//! Namespaced content-type identifiers such as `com.apple.notes.folder`.
//!
//! Identifiers are classification tags for interoperability; nothing in the
//! codec dispatches on them. Decoding accepts any string so that archives
//! written by newer software with unfamiliar types still load.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Root of all user content types. Decoded identifiers conform to this.
pub const CONTENT: &str = "public.content";

/// Directory-backed document types.
pub const PACKAGE: &str = "com.apple.package";

/// Content assembled from several child items.
pub const COMPOSITE_CONTENT: &str = "public.composite-content";

/// A content-type identifier together with the supertype it was declared under.
///
/// Equality and hashing consider only the identifier string, so a type built
/// in code compares equal to the same type read back from a document.
#[derive(Debug, Clone)]
pub struct TypeIdentifier {
    identifier: String,
    supertype: String,
}

impl TypeIdentifier {
    /// Declares `identifier` as conforming to `supertype`.
    pub fn imported(identifier: impl Into<String>, supertype: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            supertype: supertype.into(),
        }
    }

    /// Declares `identifier` as plain content. This is what decoding produces.
    pub fn content(identifier: impl Into<String>) -> Self {
        Self::imported(identifier, CONTENT)
    }

    /// The canonical string form.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The declared supertype.
    #[must_use]
    pub fn supertype(&self) -> &str {
        &self.supertype
    }
}

impl PartialEq for TypeIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}

impl Eq for TypeIdentifier {}

impl Hash for TypeIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
    }
}

impl fmt::Display for TypeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)
    }
}

impl Serialize for TypeIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.identifier)
    }
}

impl<'de> Deserialize<'de> for TypeIdentifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::content)
    }
}
