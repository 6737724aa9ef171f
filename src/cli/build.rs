//! `vizdeploy build`.

use std::path::Path;

use crate::core::error::AppError;
use crate::core::manifest::format_size;
use crate::core::orchestrator::Orchestrator;
use crate::ui;

/// Builds the bundle from scratch and prints what went into it.
pub fn build(source: &Path, config_path: Option<&Path>) -> Result<(), AppError> {
    let (source_root, config) = super::load_project(source, config_path)?;
    ui::section(&format!("Building {} {}", config.project_name, config.version));

    let mut orchestrator = Orchestrator::new(&source_root, &config, Vec::new());
    let report = orchestrator.build()?;

    let manifest = &report.manifest;
    if report.excluded > 0 {
        ui::info(&format!("Excluded {} files", report.excluded));
    }
    ui::info(&format!(
        "{} files, {}",
        manifest.file_count(),
        format_size(manifest.total_size)
    ));
    ui::success(&format!("Output ready in {}", manifest.output_dir.display()));
    Ok(())
}
