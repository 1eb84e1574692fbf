use super::entry::CatalogEntry;
use super::pairing::{audio_stem, is_audio, is_sidecar, pair_transcript};
use crate::error::ApiError;
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

/// List one directory level as catalog entries.
///
/// `dir` must already be confined to the library root; `relative_dir` is its
/// normalized client form and prefixes every returned path. Entries come back
/// in enumeration order: folders as they are met, then audio items.
pub async fn list(dir: &Path, relative_dir: &str) -> Result<Vec<CatalogEntry>, ApiError> {
    ensure_directory(dir).await?;

    let mut reader = fs::read_dir(dir)
        .await
        .map_err(|e| ApiError::from_io(e, "Directory"))?;

    let mut entries = Vec::new();
    let mut audio_files = Vec::new();
    let mut sidecars = Vec::new();
    let mut other_files = 0usize;

    while let Some(item) = reader.next_entry().await.map_err(ApiError::Io)? {
        let Ok(name) = item.file_name().into_string() else {
            warn!("Skipping non UTF-8 entry in {}", dir.display());
            continue;
        };
        let file_type = item.file_type().await.map_err(ApiError::Io)?;

        if file_type.is_dir() {
            let child_file_count = count_files(&item.path()).await;
            entries.push(CatalogEntry::Folder {
                relative_path: join_relative(relative_dir, &name),
                name,
                child_file_count,
            });
        } else if is_audio(&name) {
            audio_files.push(name);
        } else if is_sidecar(&name) {
            sidecars.push(name);
        } else {
            other_files += 1;
        }
    }

    // Stable tie-break for pairing regardless of filesystem order
    sidecars.sort();

    debug!(
        "Scanned {}: {} folders, {} audio, {} sidecars, {} other",
        dir.display(),
        entries.len(),
        audio_files.len(),
        sidecars.len(),
        other_files
    );

    for audio in audio_files {
        let pairing = pair_transcript(&audio, &sidecars);
        if let Some(pairing) = &pairing {
            debug!(
                "Paired {} with {} ({:?})",
                audio, pairing.sidecar, pairing.strategy
            );
        }

        let audio_relative_path = join_relative(relative_dir, &audio);
        entries.push(CatalogEntry::AudioItem {
            display_name: audio_stem(&audio).to_string(),
            relative_path: audio_relative_path.clone(),
            audio_relative_path,
            transcript_relative_path: pairing.map(|p| join_relative(relative_dir, p.sidecar)),
        });
    }

    Ok(entries)
}

/// Immediate files in `dir`; 0 when it cannot be read.
pub async fn count_files(dir: &Path) -> usize {
    let mut reader = match fs::read_dir(dir).await {
        Ok(reader) => reader,
        Err(e) => {
            debug!("Cannot count files in {}: {}", dir.display(), e);
            return 0;
        }
    };

    let mut count = 0;
    loop {
        match reader.next_entry().await {
            Ok(Some(item)) => {
                if item.file_type().await.is_ok_and(|t| t.is_file()) {
                    count += 1;
                }
            }
            Ok(None) => break,
            Err(e) => {
                debug!("Stopped counting files in {}: {}", dir.display(), e);
                return 0;
            }
        }
    }
    count
}

/// Raw view of a directory for the diagnostics endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryReport {
    pub path: String,
    pub total_items: usize,
    pub directories: Vec<String>,
    pub files: Vec<FileReport>,
}

#[derive(Debug, Serialize)]
pub struct FileReport {
    pub name: String,
    pub size: u64,
    /// Lowercase extension with its dot, empty when there is none
    pub extension: String,
}

impl DirectoryReport {
    /// Inspect `dir` without classification or pairing.
    pub async fn scan(dir: &Path, relative_dir: &str) -> Result<Self, ApiError> {
        ensure_directory(dir).await?;

        let mut reader = fs::read_dir(dir)
            .await
            .map_err(|e| ApiError::from_io(e, "Directory"))?;

        let mut report = Self {
            path: relative_dir.to_string(),
            total_items: 0,
            directories: Vec::new(),
            files: Vec::new(),
        };

        while let Some(item) = reader.next_entry().await.map_err(ApiError::Io)? {
            report.total_items += 1;
            let name = item.file_name().to_string_lossy().into_owned();
            let metadata = item.metadata().await.map_err(ApiError::Io)?;

            if metadata.is_dir() {
                report.directories.push(name);
            } else {
                let extension = Path::new(&name)
                    .extension()
                    .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
                    .unwrap_or_default();
                report.files.push(FileReport {
                    name,
                    size: metadata.len(),
                    extension,
                });
            }
        }

        Ok(report)
    }
}

async fn ensure_directory(dir: &Path) -> Result<(), ApiError> {
    let metadata = fs::metadata(dir)
        .await
        .map_err(|e| ApiError::from_io(e, "Directory"))?;
    if !metadata.is_dir() {
        return Err(ApiError::NotFound("Directory"));
    }
    Ok(())
}

fn join_relative(relative_dir: &str, name: &str) -> String {
    if relative_dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", relative_dir, name)
    }
}
