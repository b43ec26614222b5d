//! Generated-artifact discovery and probe-target derivation.
//!
//! Artifacts are produced by an external generation process and only read
//! here: the existence check wants at least one match, the probe wants the
//! newest match and the identifier before the first delimiter in its name.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRef {
    pub path: PathBuf,
    #[serde(skip)]
    pub modified: SystemTime,
}

impl ArtifactRef {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

pub trait DirectoryLister {
    /// List files in `dir` whose names end with `suffix`. Any listing
    /// failure (absent or unreadable directory) yields an empty list, so
    /// "command failed" and "no matches" collapse into one case.
    fn list(&self, dir: &Path, suffix: &str) -> Vec<ArtifactRef>;
}

/// Real implementation reading the local filesystem.
pub struct FsLister;

impl DirectoryLister for FsLister {
    fn list(&self, dir: &Path, suffix: &str) -> Vec<ArtifactRef> {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };

        entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let path = entry.path();
                if !path.is_file() {
                    return None;
                }
                let name = path.file_name()?.to_string_lossy().to_string();
                if !name.ends_with(suffix) {
                    return None;
                }
                let modified = entry.metadata().and_then(|m| m.modified()).ok()?;
                Some(ArtifactRef { path, modified })
            })
            .collect()
    }
}

/// Existence check: at least one artifact must match, otherwise the run
/// fails naming the expected directory.
pub fn require_artifacts(
    lister: &dyn DirectoryLister,
    dir: &Path,
    suffix: &str,
) -> Result<Vec<ArtifactRef>> {
    let mut found = lister.list(dir, suffix);
    if found.is_empty() {
        return Err(Error::NoArtifacts {
            dir: dir.display().to_string(),
        });
    }
    found.sort_by(compare_newest_first);
    Ok(found)
}

/// Select the most recently modified artifact. Ties on modification time
/// are broken by file name, lexicographically descending, so selection is
/// deterministic where the original automation left it to sort stability.
pub fn newest(mut artifacts: Vec<ArtifactRef>) -> Option<ArtifactRef> {
    artifacts.sort_by(compare_newest_first);
    artifacts.into_iter().next()
}

fn compare_newest_first(a: &ArtifactRef, b: &ArtifactRef) -> std::cmp::Ordering {
    b.modified
        .cmp(&a.modified)
        .then_with(|| b.file_name().cmp(&a.file_name()))
}

/// Derive the probe target from an artifact path: the basename truncated at
/// the first occurrence of `delimiter`. Fails when the delimiter is absent
/// or nothing precedes it.
pub fn derive_identifier(path: &Path, delimiter: char) -> Result<String> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| {
            Error::Identifier(format!("artifact path '{}' has no file name", path.display()))
        })?;

    let identifier = match name.find(delimiter) {
        Some(pos) => &name[..pos],
        None => {
            return Err(Error::Identifier(format!(
                "'{}' contains no '{}' delimiter",
                name, delimiter
            )))
        }
    };

    if identifier.is_empty() {
        return Err(Error::Identifier(format!(
            "'{}' has nothing before the '{}' delimiter",
            name, delimiter
        )));
    }

    Ok(identifier.to_string())
}
