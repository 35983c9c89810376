//! RF2 file discovery.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::types::{ReleaseKind, Rf2Error, Rf2Files, Rf2Result};

/// Discovers the RF2 files of one release kind under `path`.
///
/// The directory is searched recursively, so both the unpacked release root
/// and any of its subdirectories are accepted. Every matching description
/// and language refset file is collected; concept and relationship files
/// take the first match in path order.
///
/// # Errors
/// Fails if `path` is not a directory or if the concept, description or
/// relationship file is missing.
pub fn discover_rf2_files<P: AsRef<Path>>(path: P, kind: ReleaseKind) -> Rf2Result<Rf2Files> {
    let path = path.as_ref();

    if !path.is_dir() {
        return Err(Rf2Error::DirectoryNotFound {
            path: path.display().to_string(),
        });
    }

    let mut candidates = Vec::new();
    collect_txt_files(path, &mut candidates)?;
    candidates.sort();

    let token = kind.file_token();
    let concept_prefix = format!("sct2_Concept_{token}");
    let description_prefix = format!("sct2_Description_{token}");
    let relationship_prefix = format!("sct2_Relationship_{token}");
    let language_marker = format!("Language{token}");

    let mut files = Rf2Files::new(kind);

    for candidate in candidates {
        let Some(filename) = candidate.file_name().map(|f| f.to_string_lossy().into_owned())
        else {
            continue;
        };

        if filename.starts_with(&concept_prefix) {
            if files.concept_file.is_none() {
                files.release_date = extract_release_date(&filename);
                files.concept_file = Some(candidate);
            }
        } else if filename.starts_with(&description_prefix) {
            files.description_files.push(candidate);
        } else if filename.starts_with(&relationship_prefix) {
            if files.relationship_file.is_none() {
                files.relationship_file = Some(candidate);
            }
        } else if filename.starts_with("der2_") && filename.contains(&language_marker) {
            files.language_refset_files.push(candidate);
        }
    }

    if !files.has_required_files() {
        return Err(Rf2Error::RequiredFileMissing {
            file_type: files.missing_files().join(", "),
            directory: path.display().to_string(),
        });
    }

    debug!(
        kind = token,
        descriptions = files.description_files.len(),
        language_refsets = files.language_refset_files.len(),
        release_date = files.release_date.as_deref().unwrap_or("unknown"),
        "discovered RF2 files"
    );

    Ok(files)
}

fn collect_txt_files(dir: &Path, out: &mut Vec<PathBuf>) -> Rf2Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_txt_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "txt") {
            out.push(path);
        }
    }
    Ok(())
}

/// Extracts the release date from an RF2 file name.
///
/// RF2 files have names like `sct2_Concept_Snapshot_INT_20251201.txt`.
fn extract_release_date(filename: &str) -> Option<String> {
    let without_ext = filename.trim_end_matches(".txt");
    let last = without_ext.rsplit('_').next()?;

    if last.len() == 8 && last.chars().all(|c| c.is_ascii_digit()) {
        Some(last.to_string())
    } else {
        None
    }
}

/// Formats a byte count as a human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
