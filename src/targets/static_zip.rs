use std::path::Path;

use crate::core::config::DeployConfig;
use crate::core::error::AppError;
use crate::core::manifest::BuildManifest;
use crate::core::result::DeployResult;
use crate::providers::archive::zip_directory;
use crate::targets::{DeployTarget, TargetKind};
use crate::ui;

/// Packages the build output as a zip next to the project.
pub struct StaticZipTarget<'a> {
    project_root: &'a Path,
    dry_run: bool,
}

impl<'a> StaticZipTarget<'a> {
    pub fn new(project_root: &'a Path, dry_run: bool) -> Self {
        Self {
            project_root,
            dry_run,
        }
    }

    fn deploy_inner(
        &self,
        manifest: &BuildManifest,
        config: &DeployConfig,
    ) -> Result<DeployResult, AppError> {
        let target = self.project_root.join(config.package_file_name());

        if self.dry_run {
            ui::info(&format!("[DRY-RUN] write {}", target.display()));
            return Ok(DeployResult::success(self.name(), "Dry run, nothing written"));
        }

        let entries = zip_directory(&manifest.output_dir, &target)?;
        Ok(DeployResult::success(
            self.name(),
            format!("{} ({} files)", target.display(), entries),
        ))
    }
}

impl DeployTarget for StaticZipTarget<'_> {
    fn kind(&self) -> TargetKind {
        TargetKind::StaticZip
    }

    fn probe(&self) -> bool {
        true
    }

    fn deploy(&self, manifest: &BuildManifest, config: &DeployConfig) -> DeployResult {
        DeployResult::from_outcome(self.name(), self.deploy_inner(manifest, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_package_written_next_to_project() {
        let project = tempdir().unwrap();
        let out = project.path().join("dist");
        fs::create_dir_all(out.join("css")).unwrap();
        fs::write(out.join("index.html"), "<html></html>").unwrap();
        fs::write(out.join("css/style.css"), "body{}").unwrap();
        let manifest = BuildManifest::scan(&out, "plant-viz", "1.0.0").unwrap();

        let mut config = DeployConfig::default();
        config.project_name = "plant-viz".into();
        let result = StaticZipTarget::new(project.path(), false).deploy(&manifest, &config);

        assert!(result.succeeded, "{}", result.message);
        assert!(result.message.contains("2 files"));
        assert!(project.path().join("plant-viz-static.zip").is_file());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let project = tempdir().unwrap();
        fs::write(project.path().join("index.html"), "x").unwrap();
        let manifest = BuildManifest::scan(project.path(), "plant-viz", "1.0.0").unwrap();

        let result =
            StaticZipTarget::new(project.path(), true).deploy(&manifest, &DeployConfig::default());
        assert!(result.succeeded);
        assert!(!project.path().join("3d-desulfurization-tower-static.zip").exists());
    }

    #[test]
    fn test_always_available() {
        assert!(StaticZipTarget::new(Path::new("."), false).probe());
    }
}
