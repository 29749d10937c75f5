//! Discovery of folders holding DICOM files
//!
//! A folder qualifies when at least one of its immediate files parses as
//! DICOM. The walk itself is recursive, so nested qualifying folders are
//! found at any depth.

use crate::error::Result;
use dicom_dictionary_std::tags::PIXEL_DATA;
use dicom_object::OpenFileOptions;
use log::{debug, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Checks whether the file at `path` parses as DICOM
///
/// Parsing stops before the pixel data. Unreadable or malformed files are
/// reported as non-matching, never as errors.
pub fn is_dicom_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }

    match OpenFileOptions::new().read_until(PIXEL_DATA).open_file(path) {
        Ok(_) => true,
        Err(e) => {
            debug!("Not a DICOM file {}: {}", path.display(), e);
            false
        }
    }
}

/// Finds every folder under `root` (inclusive) that directly contains a DICOM file
///
/// The result is deduplicated and sorted lexicographically by path.
pub fn find_dicom_folders(root: &Path) -> Result<Vec<PathBuf>> {
    let mut folders = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        if contains_dicom_file(entry.path()) {
            folders.push(entry.into_path());
        }
    }

    sort_paths(&mut folders);
    folders.dedup();
    Ok(folders)
}

/// Lists the DICOM files directly inside `folder`, sorted by file name
pub fn list_dicom_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in readable_entries(fs::read_dir(folder)?, folder) {
        let path = entry.path();
        if is_dicom_file(&path) {
            files.push(path);
        }
    }

    sort_paths(&mut files);
    Ok(files)
}

fn contains_dicom_file(folder: &Path) -> bool {
    let entries = match fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Skipping unreadable folder {}: {}", folder.display(), e);
            return false;
        }
    };

    readable_entries(entries, folder).any(|entry| is_dicom_file(&entry.path()))
}

/// Drops directory entries that fail to read, logging each one
fn readable_entries<T>(
    entries: impl IntoIterator<Item = io::Result<T>>,
    folder: &Path,
) -> impl Iterator<Item = T> {
    let folder = folder.to_path_buf();
    entries.into_iter().filter_map(move |entry| match entry {
        Ok(entry) => Some(entry),
        Err(e) => {
            warn!("Skipping unreadable entry in {}: {}", folder.display(), e);
            None
        }
    })
}

/// Byte-wise ordering of the full path string
fn sort_paths(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
}
