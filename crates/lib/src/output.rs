//! Output sets on disk.
//!
//! Writing a planned output set under a root, comparing an existing tree against
//! one, and reading the checked-in build files that get merged into generated ones.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::consts::HANDCRAFTED_BUILD_FILE_NAME;
use crate::plan::OutputFile;

#[derive(Debug, Error)]
pub enum OutputError {
  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: io::Error },

  #[error("failed to read file {}: {source}", path.display())]
  ReadFile { path: PathBuf, source: io::Error },

  #[error("failed to remove directory {}: {source}", path.display())]
  RemoveDir { path: PathBuf, source: io::Error },

  #[error("failed to walk directory {}: {source}", path.display())]
  Walk { path: PathBuf, source: walkdir::Error },
}

/// Write every file under `root`, creating directories as needed.
///
/// Returns the number of files written.
pub fn write_files(root: &Path, files: &[OutputFile]) -> Result<usize, OutputError> {
  for file in files {
    let path = root.join(file.relative_path());
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).map_err(|e| OutputError::CreateDir {
        path: parent.to_path_buf(),
        source: e,
      })?;
    }
    fs::write(&path, &file.contents).map_err(|e| OutputError::WriteFile {
      path: path.clone(),
      source: e,
    })?;
    debug!(path = %path.display(), bytes = file.contents.len(), "wrote file");
  }
  Ok(files.len())
}

/// Remove `root` and everything under it. A missing root is not an error.
pub fn clean_dir(root: &Path) -> Result<(), OutputError> {
  match fs::remove_dir_all(root) {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(e) => Err(OutputError::RemoveDir {
      path: root.to_path_buf(),
      source: e,
    }),
  }
}

/// How an existing tree differs from a planned output set.
///
/// All paths are relative to the tree root and sorted.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
  /// Planned but not on disk.
  pub missing: Vec<PathBuf>,
  /// On disk with different contents.
  pub changed: Vec<PathBuf>,
  pub unchanged: Vec<PathBuf>,
  /// On disk but not planned.
  pub stale: Vec<PathBuf>,
}

impl CheckReport {
  pub fn is_up_to_date(&self) -> bool {
    self.missing.is_empty() && self.changed.is_empty() && self.stale.is_empty()
  }
}

/// Compare the tree under `root` with `files`.
pub fn check_files(root: &Path, files: &[OutputFile]) -> Result<CheckReport, OutputError> {
  let mut report = CheckReport::default();
  let mut planned = BTreeSet::new();

  for file in files {
    let relative = file.relative_path();
    let path = root.join(&relative);
    match fs::read_to_string(&path) {
      Ok(existing) if existing == file.contents => report.unchanged.push(relative.clone()),
      Ok(_) => report.changed.push(relative.clone()),
      Err(e) if e.kind() == io::ErrorKind::NotFound => report.missing.push(relative.clone()),
      Err(e) => return Err(OutputError::ReadFile { path, source: e }),
    }
    planned.insert(relative);
  }

  if root.is_dir() {
    for entry in WalkDir::new(root).sort_by_file_name() {
      let entry = entry.map_err(|e| OutputError::Walk {
        path: root.to_path_buf(),
        source: e,
      })?;
      if entry.file_type().is_dir() {
        continue;
      }
      // Entries from the walk always live under the root.
      let Ok(relative) = entry.path().strip_prefix(root) else {
        continue;
      };
      if !planned.contains(relative) {
        report.stale.push(relative.to_path_buf());
      }
    }
  }

  report.missing.sort();
  report.changed.sort();
  report.unchanged.sort();
  report.stale.sort();
  Ok(report)
}

/// Read the checked-in `BUILD` file of each directory under `src_root`.
///
/// Directories without one are logged and left out.
pub fn read_handcrafted(src_root: &Path, dirs: &[String]) -> Result<BTreeMap<String, String>, OutputError> {
  let mut contents = BTreeMap::new();
  for dir in dirs {
    let path = src_root.join(dir).join(HANDCRAFTED_BUILD_FILE_NAME);
    match fs::read_to_string(&path) {
      Ok(content) => {
        contents.insert(dir.clone(), content);
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        warn!(dir = %dir, path = %path.display(), "no handcrafted BUILD file, ignoring directory");
      }
      Err(e) => return Err(OutputError::ReadFile { path, source: e }),
    }
  }
  Ok(contents)
}
