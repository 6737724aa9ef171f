//! Build manifest: the inventory of a build output directory.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::AppError;
use crate::utils::fs::walk_files;

/// File name of the manifest inside the output directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Deployment artifacts written at the output root by the build stage or the
/// Docker target. They describe the site, they are not part of it.
pub const GENERATED_ARTIFACTS: &[&str] = &[
    MANIFEST_FILE,
    "nginx.conf",
    "Dockerfile",
    "docker-compose.yml",
    ".dockerignore",
    "deploy.sh",
    "README_DEPLOY.md",
];

/// Inventory of a completed build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildManifest {
    /// Directory the manifest describes. Not serialized.
    #[serde(skip)]
    pub output_dir: PathBuf,
    pub name: String,
    pub version: String,
    pub build_time: DateTime<Utc>,
    pub files: Vec<ManifestEntry>,
    pub total_size: u64,
}

/// One deployable file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Path relative to the output root, `/`-separated.
    pub path: String,
    pub size: u64,
    /// Lowercase extension without the dot, or `unknown`.
    #[serde(rename = "type")]
    pub file_type: String,
}

impl BuildManifest {
    /// Scans `root` and builds a manifest of every deployable file.
    /// Entries are sorted by path; generated artifacts at the root are skipped.
    pub fn scan(root: &Path, name: &str, version: &str) -> Result<Self, AppError> {
        let mut files = Vec::new();
        for (relative, absolute) in walk_files(root)? {
            if GENERATED_ARTIFACTS.contains(&relative.as_str()) {
                continue;
            }
            let size = fs::metadata(&absolute)?.len();
            files.push(ManifestEntry {
                file_type: file_type(&relative),
                path: relative,
                size,
            });
        }

        let total_size = files.iter().map(|f| f.size).sum();
        Ok(Self {
            output_dir: root.to_path_buf(),
            name: name.to_string(),
            version: version.to_string(),
            build_time: Utc::now(),
            files,
            total_size,
        })
    }

    /// Writes the manifest as pretty JSON into `root`.
    pub fn write_to(&self, root: &Path) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Build(format!("Failed to serialize manifest: {}", e)))?;
        fs::write(root.join(MANIFEST_FILE), json)?;
        Ok(())
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.iter().any(|f| f.path == path)
    }
}

fn file_type(path: &str) -> String {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_string(),
        _ => "unknown".to_string(),
    }
}

/// Formats a byte count for display.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let bytes_f = bytes as f64;
    if bytes_f >= MB {
        format!("{:.1} MB", bytes_f / MB)
    } else if bytes_f >= KB {
        format!("{:.1} KB", bytes_f / KB)
    } else {
        format!("{} B", bytes)
    }
}
