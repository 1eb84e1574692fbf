//! Confinement of client-supplied paths to the library root.

use crate::error::{is_missing, ApiError};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Normalize a client path to forward slashes with no empty segments.
///
/// Backslashes become `/`, repeated separators collapse and leading or
/// trailing separators are dropped. `.` and `..` segments are kept as-is.
pub fn normalize_relative(raw: &str) -> String {
    raw.replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Normalize `raw` and fold away `.` and `..` segments.
///
/// Fails with `PathEscape` when a `..` would climb above the root. The result
/// is the canonical client form of the path.
pub fn clean_relative(raw: &str) -> Result<String, ApiError> {
    let normalized = normalize_relative(raw);

    let mut segments: Vec<&str> = Vec::new();
    for segment in normalized.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    warn!("Rejected path escaping library root: {:?}", raw);
                    return Err(ApiError::PathEscape);
                }
            }
            other => segments.push(other),
        }
    }

    Ok(segments.join("/"))
}

/// Resolves relative paths against a fixed root and refuses anything that
/// lands outside of it.
#[derive(Debug, Clone)]
pub struct PathSandbox {
    root: PathBuf,
}

impl PathSandbox {
    /// Canonicalize `root` once; every later check compares against it.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let canonical = std::fs::canonicalize(root)
            .with_context(|| format!("Failed to resolve library root {}", root.display()))?;

        if !canonical.is_dir() {
            anyhow::bail!("Library root {} is not a directory", canonical.display());
        }

        Ok(Self { root: canonical })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lexically resolve `relative` under the root without touching the disk.
    pub fn join(&self, relative: &str) -> Result<PathBuf, ApiError> {
        let clean = clean_relative(relative)?;

        let mut path = self.root.clone();
        for segment in clean.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }

        if !path.starts_with(&self.root) {
            warn!("Rejected path escaping library root: {:?}", relative);
            return Err(ApiError::PathEscape);
        }

        Ok(path)
    }

    /// Resolve `relative` to an absolute path inside the root.
    ///
    /// Existing targets are canonicalized as well so a symlink pointing out
    /// of the root is refused. Missing targets pass through; the read that
    /// follows reports them as not found.
    pub async fn resolve(&self, relative: &str) -> Result<PathBuf, ApiError> {
        let candidate = self.join(relative)?;

        match tokio::fs::canonicalize(&candidate).await {
            Ok(canonical) if canonical.starts_with(&self.root) => Ok(candidate),
            Ok(_) => {
                warn!("Rejected symlink escaping library root: {:?}", relative);
                Err(ApiError::PathEscape)
            }
            Err(e) if is_missing(&e) => Ok(candidate),
            Err(e) => Err(ApiError::from_io(e, "Path")),
        }
    }
}
