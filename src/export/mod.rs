//! Export of placed locations to external tracker formats.

pub mod emo_tracker;

use canvas::doc::{Location, MapData};

pub use emo_tracker::EmoTrackerExporter;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("export JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A target format for location export.
pub trait Exporter {
    /// Display name of the format.
    fn name(&self) -> &'static str;

    /// Export one location. With `descendants` set, its subtree is included
    /// (drawn from that list); without it the output has no children.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if encoding fails.
    fn export_location(
        &self,
        maps: &[MapData],
        location: &Location,
        descendants: Option<&[Location]>,
    ) -> Result<String, ExportError>;

    /// Export every root location with its subtree.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if encoding fails.
    fn export_locations(&self, maps: &[MapData], locations: &[Location]) -> Result<String, ExportError>;
}
