//! Moving package trees between memory and the filesystem.

use crate::core::error::{ArchiveError, Result};
use crate::core::package::{is_valid_entry_name, PackageDirectory, PackageEntry, PackageNode};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Reads the file or directory tree at `path` into memory.
///
/// `path` itself may be a symlink to the package, but symlinks inside the
/// package are never followed. Such links are skipped with a warning, as are
/// entries whose names are not valid UTF-8 and anything else that is not a
/// regular file or directory.
///
/// # Errors
///
/// Returns [`ArchiveError::Io`] if any part of the tree cannot be read.
pub fn read_package(path: &Path) -> Result<PackageEntry> {
    let metadata = fs::metadata(path)?;
    if metadata.is_dir() {
        read_directory(path).map(PackageEntry::Directory)
    } else {
        Ok(PackageEntry::File(fs::read(path)?))
    }
}

fn read_directory(path: &Path) -> Result<PackageDirectory> {
    let mut dir = PackageDirectory::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                log::warn!("skipping entry {:?} in {}: name is not UTF-8", raw, path.display());
                continue;
            }
        };
        let child_path = entry.path();
        let file_type = entry.file_type()?;
        let child = if file_type.is_symlink() {
            log::warn!("skipping symlink {}", child_path.display());
            continue;
        } else if file_type.is_dir() {
            PackageEntry::Directory(read_directory(&child_path)?)
        } else if file_type.is_file() {
            PackageEntry::File(fs::read(&child_path)?)
        } else {
            log::warn!("skipping special file {}", child_path.display());
            continue;
        };
        dir.insert(name, child)?;
    }
    Ok(dir)
}

/// Writes `root` to `destination`, replacing whatever is there.
///
/// The tree is written in full to a hidden sibling directory first and only
/// then swapped into place, so readers never see a partial package. When
/// `destination` already exists it is moved aside, the new tree is renamed
/// in, and the old one is removed. If the swap fails the original is put back.
///
/// # Errors
///
/// Returns [`ArchiveError::Io`] for filesystem failures and
/// [`ArchiveError::InvalidPackage`] if `destination` has no final component.
pub fn write_package(root: &PackageDirectory, destination: &Path) -> Result<()> {
    let name = destination
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            ArchiveError::InvalidPackage(format!(
                "{} is not a usable package path",
                destination.display()
            ))
        })?;
    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let stem = sibling_stem(name);
    let staging = parent.join(format!(".{stem}-{}.tmp", Uuid::new_v4()));
    if let Err(e) = write_directory(&staging, root) {
        discard(&staging);
        return Err(e);
    }

    swap_into_place(&staging, destination, &parent, stem)
}

/// Longest prefix of the destination name reused in staging and backup names.
const SIBLING_STEM_MAX_BYTES: usize = 64;

// Keeps `.{stem}-{uuid}.tmp` within filename limits for any valid destination name.
fn sibling_stem(name: &str) -> &str {
    if name.len() <= SIBLING_STEM_MAX_BYTES {
        return name;
    }
    let mut end = SIBLING_STEM_MAX_BYTES;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

fn write_directory(path: &Path, dir: &PackageDirectory) -> Result<()> {
    fs::create_dir(path)?;
    for (name, entry) in dir.entries() {
        if !is_valid_entry_name(name) {
            return Err(ArchiveError::InvalidPackage(format!(
                "`{name}` is not a valid entry name"
            )));
        }
        let child_path = path.join(name);
        match entry {
            PackageEntry::Directory(child) => write_directory(&child_path, child)?,
            PackageEntry::File(bytes) => fs::write(&child_path, bytes)?,
        }
    }
    Ok(())
}

fn swap_into_place(staging: &Path, destination: &Path, parent: &Path, stem: &str) -> Result<()> {
    if fs::symlink_metadata(destination).is_err() {
        log::debug!("moving {} into place", destination.display());
        return fs::rename(staging, destination).map_err(|e| {
            discard(staging);
            e.into()
        });
    }

    let backup = parent.join(format!(".{stem}-{}.old", Uuid::new_v4()));
    if let Err(e) = fs::rename(destination, &backup) {
        discard(staging);
        return Err(e.into());
    }
    if let Err(e) = fs::rename(staging, destination) {
        if let Err(restore) = fs::rename(&backup, destination) {
            log::warn!(
                "could not restore {} from {}: {restore}",
                destination.display(),
                backup.display()
            );
        }
        discard(staging);
        return Err(e.into());
    }
    log::debug!("replaced {}", destination.display());
    discard(&backup);
    Ok(())
}

// Best-effort cleanup; the caller is already returning the error that matters.
fn discard(path: &Path) {
    let result = match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(_) => return,
    };
    if let Err(e) = result {
        log::warn!("failed to remove {}: {e}", path.display());
    }
}

/// Reads and decodes the entity package at `path`.
///
/// # Errors
///
/// Returns [`ArchiveError::InvalidPackage`] if `path` is not a directory or
/// lacks `info.json`, plus any read or decode error from the tree.
pub fn load<T: PackageNode>(path: &Path) -> Result<T> {
    let entry = read_package(path)?;
    T::decode_entry(&entry)
}

/// Encodes `node` and writes it to `path` with [`write_package`].
pub fn save<T: PackageNode>(node: &T, path: &Path) -> Result<()> {
    let root = node.encode()?;
    write_package(&root, path)
}
