//! Content digests of output sets.
//!
//! A digest identifies the exact bytes a conversion run produces, independent of
//! the order files were planned in. Two runs over the same inputs must report
//! the same digest.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A full 64-character SHA-256 hash, lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl fmt::Display for ContentHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Hash a set of `(path, contents)` entries.
///
/// Entries are sorted by path first. Each path and each content is followed by
/// a NUL byte so moving bytes between adjacent entries changes the hash.
pub fn hash_entries<'a>(entries: impl IntoIterator<Item = (String, &'a str)>) -> ContentHash {
  let mut entries: Vec<(String, &str)> = entries.into_iter().collect();
  entries.sort_by(|a, b| a.0.cmp(&b.0));

  let mut hasher = Sha256::new();
  for (path, contents) in entries {
    hasher.update(path.as_bytes());
    hasher.update([0u8]);
    hasher.update(contents.as_bytes());
    hasher.update([0u8]);
  }
  ContentHash(format!("{:x}", hasher.finalize()))
}
