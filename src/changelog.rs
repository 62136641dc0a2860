//! Changelog read-state.
//!
//! The save snapshot remembers a checksum of the changelog the user last saw.
//! When the shipped changelog's checksum differs, the viewer should open.

#[cfg(test)]
#[path = "changelog_test.rs"]
mod changelog_test;

use sha2::{Digest, Sha256};

/// Changelog shipped with this build.
pub const CHANGELOG: &str = include_str!("../CHANGELOG.md");

/// SHA-256 of `text` as lowercase hex.
#[must_use]
pub fn checksum(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let bytes = hasher.finalize();
    bytes.iter().map(|b| format!("{b:02x}")).collect::<String>()
}

/// Whether the viewer should open, given the checksum stored in the save.
///
/// First-time users (no stored checksum) are not interrupted.
#[must_use]
pub fn should_open(saved: Option<&str>, current: &str) -> bool {
    saved.is_some_and(|s| s != current)
}

/// Read-state of the shipped changelog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogState {
    pub checksum: String,
    pub open: bool,
}

impl ChangelogState {
    /// Evaluate `content` against the checksum stored in the save.
    #[must_use]
    pub fn new(content: &str, saved: Option<&str>) -> Self {
        let checksum = checksum(content);
        let open = should_open(saved, &checksum);
        Self { checksum, open }
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}
