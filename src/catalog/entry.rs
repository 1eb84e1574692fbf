use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One item of a directory listing
///
/// Serialized in the shape the browser UI consumes: a `type` tag of
/// `folder` or `audio` plus the fields below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CatalogEntry {
    #[serde(rename = "folder")]
    Folder {
        name: String,

        #[serde(rename = "path")]
        relative_path: String,

        /// Immediate files inside the folder (0 when it cannot be read)
        #[serde(rename = "fileCount")]
        child_file_count: usize,
    },

    #[serde(rename = "audio")]
    AudioItem {
        /// File name with the audio extension stripped
        #[serde(rename = "name")]
        display_name: String,

        #[serde(rename = "path")]
        relative_path: String,

        #[serde(rename = "audioFile")]
        audio_relative_path: String,

        #[serde(rename = "jsonFile")]
        transcript_relative_path: Option<String>,
    },
}

impl CatalogEntry {
    pub fn name(&self) -> &str {
        match self {
            Self::Folder { name, .. } => name,
            Self::AudioItem { display_name, .. } => display_name,
        }
    }

    pub fn relative_path(&self) -> &str {
        match self {
            Self::Folder { relative_path, .. } | Self::AudioItem { relative_path, .. } => {
                relative_path
            }
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder { .. })
    }
}

/// Folders first, then case-insensitive by name, raw name as tie-break.
pub fn sort_for_display(entries: &mut [CatalogEntry]) {
    entries.sort_by(display_order);
}

fn display_order(a: &CatalogEntry, b: &CatalogEntry) -> Ordering {
    b.is_folder()
        .cmp(&a.is_folder())
        .then_with(|| a.name().to_lowercase().cmp(&b.name().to_lowercase()))
        .then_with(|| a.name().cmp(b.name()))
}
