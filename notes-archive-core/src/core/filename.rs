//! Filesystem-safe names for child containers.
//!
//! A display name (folder title, note text, attachment filename) is reduced to
//! a single line with no path-hostile characters and a bounded length, then
//! given a numeric suffix if a sibling already uses it:
//!
//! ```text
//! "Work"  ->  Work.folder
//! "Work"  ->  Work 2.folder
//! "Work"  ->  Work 3.folder
//! ```

/// Characters that never appear in a generated filename.
pub const ILLEGAL_FILENAME_CHARACTERS: &[char] =
    &['/', '\\', '?', '%', '*', '|', '<', '>', ':', '\u{FFFC}'];

/// Longest sanitized name, in UTF-16 code units, before the truncation marker.
pub const MAX_FILENAME_UTF16_LEN: usize = 128;

/// Appended to a name that was shortened.
pub const TRUNCATION_MARKER: char = '\u{2026}';

/// Tunable sanitization rules. The codec always uses [`FilenameRules::STANDARD`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilenameRules {
    pub illegal_characters: &'static [char],
    pub max_utf16_len: usize,
    pub truncation_marker: char,
}

impl FilenameRules {
    pub const STANDARD: Self = Self {
        illegal_characters: ILLEGAL_FILENAME_CHARACTERS,
        max_utf16_len: MAX_FILENAME_UTF16_LEN,
        truncation_marker: TRUNCATION_MARKER,
    };

    #[must_use]
    pub fn is_allowed(&self, c: char) -> bool {
        !self.illegal_characters.contains(&c)
    }

    /// Reduces `name` to a single-line, filesystem-safe name.
    ///
    /// Steps: trim whitespace, drop leading dots, cut at the first line break,
    /// remove illegal characters, then cap the length. The first four steps are
    /// repeated until they no longer change the name (removing a character can
    /// expose new leading whitespace or dots), which makes the whole function
    /// idempotent. The result may be empty.
    #[must_use]
    pub fn sanitize(&self, name: &str) -> String {
        let mut current = self.clean(name);
        loop {
            let next = self.clean(&current);
            if next == current {
                break;
            }
            current = next;
        }
        self.truncate(&current)
    }

    fn clean(&self, name: &str) -> String {
        name.trim()
            .trim_start_matches('.')
            .split(is_line_break)
            .next()
            .unwrap_or_default()
            .chars()
            .filter(|c| self.is_allowed(*c))
            .collect()
    }

    // Never splits a surrogate pair: a character that does not fit whole is dropped.
    fn truncate(&self, name: &str) -> String {
        let mut used = 0;
        let mut truncated = String::with_capacity(name.len());
        for c in name.chars() {
            used += c.len_utf16();
            if used > self.max_utf16_len {
                truncated.push(self.truncation_marker);
                return truncated;
            }
            truncated.push(c);
        }
        truncated
    }
}

impl Default for FilenameRules {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Sanitizes `name` with [`FilenameRules::STANDARD`].
#[must_use]
pub fn sanitized_filename(name: &str) -> String {
    FilenameRules::STANDARD.sanitize(name)
}

/// Returns the first of `base.ext`, `base 2.ext`, `base 3.ext`, … for which
/// `is_taken` returns `false`.
pub fn available_filename(base: &str, extension: &str, is_taken: impl Fn(&str) -> bool) -> String {
    let mut attempt = 1usize;
    loop {
        let candidate = filename_for_attempt(base, extension, attempt);
        if !is_taken(&candidate) {
            return candidate;
        }
        attempt += 1;
    }
}

fn filename_for_attempt(base: &str, extension: &str, attempt: usize) -> String {
    let stem = if attempt > 1 {
        format!("{base} {attempt}")
    } else {
        base.to_string()
    };
    if extension.is_empty() {
        stem
    } else {
        format!("{stem}.{extension}")
    }
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\u{000B}' | '\u{000C}' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}
