//! Build stage: assembles the deployable directory.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::core::config::DeployConfig;
use crate::core::error::AppError;
use crate::core::manifest::BuildManifest;
use crate::templates;

/// Entry page every build must contain.
pub const ENTRY_POINT: &str = "index.html";

/// Top-level items copied from the source root.
pub const WHITELIST: &[&str] = &[ENTRY_POINT, "css", "js", "assets", "config", "data"];

/// Result of a build.
#[derive(Debug)]
pub struct BuildReport {
    pub manifest: BuildManifest,
    /// Whitelisted items that did not exist in the source root.
    pub skipped: Vec<String>,
    /// Number of paths dropped by exclude patterns.
    pub excluded: usize,
}

/// Assembles the output directory for a source root.
pub struct BuildStage<'a> {
    source_root: &'a Path,
    config: &'a DeployConfig,
}

impl<'a> BuildStage<'a> {
    pub fn new(source_root: &'a Path, config: &'a DeployConfig) -> Self {
        Self {
            source_root,
            config,
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.config.output_dir(self.source_root)
    }

    /// Returns the manifest of a previous build, if its output still exists.
    pub fn existing(&self) -> Result<Option<BuildManifest>, AppError> {
        let output = self.output_dir();
        if !output.join(ENTRY_POINT).is_file() {
            return Ok(None);
        }
        BuildManifest::scan(&output, &self.config.project_name, &self.config.version).map(Some)
    }

    /// Runs the build from scratch.
    ///
    /// Nothing is written unless the source root has an entry page and the
    /// output directory is a safe place to wipe.
    pub fn run(&self) -> Result<BuildReport, AppError> {
        let output = self.output_dir();

        if !self.source_root.join(ENTRY_POINT).is_file() {
            return Err(AppError::Build(format!(
                "Entry page '{}' not found in {}",
                ENTRY_POINT,
                self.source_root.display()
            )));
        }

        if crate::utils::fs::is_same_or_ancestor(&output, self.source_root) {
            return Err(AppError::Build(format!(
                "Output directory {} would overwrite the source tree",
                output.display()
            )));
        }

        let excludes = self.exclude_matcher()?;

        if output.exists() {
            tracing::debug!("removing previous output {}", output.display());
            fs::remove_dir_all(&output)?;
        }
        fs::create_dir_all(&output)?;

        match self.populate(&output, &excludes) {
            Ok(report) => Ok(report),
            Err(e) => {
                if let Err(cleanup) = fs::remove_dir_all(&output) {
                    tracing::warn!(
                        "failed to remove partial output {}: {}",
                        output.display(),
                        cleanup
                    );
                }
                Err(e)
            }
        }
    }

    fn populate(&self, output: &Path, excludes: &Gitignore) -> Result<BuildReport, AppError> {
        let mut skipped = Vec::new();
        let mut excluded = 0;

        for item in WHITELIST {
            let source = self.source_root.join(item);
            if !source.exists() {
                tracing::debug!("skipping missing item {}", item);
                skipped.push(item.to_string());
                continue;
            }
            let is_dir = source.is_dir();
            if excludes.matched(Path::new(item), is_dir).is_ignore() {
                excluded += 1;
                continue;
            }
            if is_dir {
                excluded += copy_filtered(
                    &source,
                    &output.join(item),
                    Path::new(item),
                    excludes,
                    output,
                )?;
            } else {
                fs::copy(&source, output.join(item))?;
            }
        }

        if self.config.optimization.optimize_html {
            self.optimize_entry_page(output)?;
        }

        let manifest =
            BuildManifest::scan(output, &self.config.project_name, &self.config.version)?;
        self.write_artifacts(output, &manifest)?;

        Ok(BuildReport {
            manifest,
            skipped,
            excluded,
        })
    }

    fn exclude_matcher(&self) -> Result<Gitignore, AppError> {
        let mut builder = GitignoreBuilder::new(self.source_root);
        for pattern in &self.config.exclude_files {
            builder.add_line(None, pattern).map_err(|e| {
                AppError::Config(format!("Invalid exclude pattern '{}': {}", pattern, e))
            })?;
        }
        builder
            .build()
            .map_err(|e| AppError::Config(format!("Invalid exclude patterns: {}", e)))
    }

    fn optimize_entry_page(&self, output: &Path) -> Result<(), AppError> {
        let entry = output.join(ENTRY_POINT);
        let html = fs::read_to_string(&entry)
            .map_err(|e| AppError::Build(format!("Failed to read {}: {}", ENTRY_POINT, e)))?;

        let optimized = templates::inject_head_tags(
            &html,
            output.join("js/main.js").is_file(),
            output.join("css/style.css").is_file(),
            &self.config.cdn_origins(),
        );
        if optimized != html {
            fs::write(&entry, optimized)?;
        }
        Ok(())
    }

    fn write_artifacts(&self, output: &Path, manifest: &BuildManifest) -> Result<(), AppError> {
        let config = self.config;

        if config.optimization.generate_manifest {
            manifest.write_to(output)?;
        }
        fs::write(
            output.join("nginx.conf"),
            templates::generate_nginx_config(config.optimization.compress_assets),
        )?;
        fs::write(output.join("Dockerfile"), templates::generate_dockerfile())?;
        fs::write(output.join(".dockerignore"), templates::generate_dockerignore())?;
        fs::write(
            output.join("docker-compose.yml"),
            templates::generate_compose(config.docker_container(), config.docker_host_port()),
        )?;

        let script = output.join("deploy.sh");
        fs::write(&script, templates::generate_deploy_script(config))?;
        make_executable(&script)?;

        fs::write(output.join("README_DEPLOY.md"), templates::generate_readme(config))?;
        Ok(())
    }
}

/// Copies `source` into `target`, skipping excluded paths.
/// `relative` is the path of `source` from the source root.
/// Returns the number of excluded entries.
fn copy_filtered(
    source: &Path,
    target: &Path,
    relative: &Path,
    excludes: &Gitignore,
    output: &Path,
) -> Result<usize, AppError> {
    fs::create_dir_all(target)?;
    let mut excluded = 0;

    let mut entries = fs::read_dir(source)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        // Output nested inside a whitelisted directory must not copy itself.
        if path == output {
            continue;
        }
        let child = relative.join(entry.file_name());
        let is_dir = fs::metadata(&path)?.is_dir();

        if excludes.matched(&child, is_dir).is_ignore() {
            tracing::debug!("excluded {}", child.display());
            excluded += 1;
            continue;
        }

        let destination = target.join(entry.file_name());
        if is_dir {
            excluded += copy_filtered(&path, &destination, &child, excludes, output)?;
        } else {
            fs::copy(&path, &destination)?;
        }
    }

    Ok(excluded)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), AppError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<(), AppError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::MANIFEST_FILE;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn plain_config() -> DeployConfig {
        let mut config = DeployConfig::default();
        config.optimization.optimize_html = false;
        config
    }

    #[test]
    fn test_scenario_three_files() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(root, "index.html", "<html><head></head><body></body></html>");
        write(root, "js/main.js", "import * as THREE from 'three';");
        write(root, "css/style.css", "body { margin: 0; }");
        write(root, "README.md", "# notes");
        write(root, "js/NOTES.md", "internal");

        let config = plain_config();
        let report = BuildStage::new(root, &config).run().unwrap();
        let manifest = report.manifest;

        let paths: Vec<&str> = manifest.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["css/style.css", "index.html", "js/main.js"]);
        assert_eq!(manifest.files[0].size, 19);
        assert_eq!(manifest.files[1].size, 39);
        assert_eq!(manifest.files[2].size, 31);
        assert_eq!(manifest.total_size, 19 + 39 + 31);
        assert_eq!(report.excluded, 1);
        assert!(report.skipped.contains(&"assets".to_string()));
    }

    #[test]
    fn test_missing_entry_page_leaves_no_output() {
        let dir = tempdir().unwrap();
        write(dir.path(), "js/main.js", "x");

        let config = DeployConfig::default();
        let err = BuildStage::new(dir.path(), &config).run().unwrap_err();
        assert!(matches!(err, AppError::Build(_)));
        assert!(!dir.path().join("dist").exists());
    }

    #[test]
    fn test_excluded_paths_never_in_manifest() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(root, "index.html", "<html></html>");
        write(root, "debug-tower.html", "x");
        write(root, "data/tower.json", "{}");
        write(root, "data/raw/export.py", "print()");
        write(root, "assets/models/test-scene.html", "x");
        write(root, "assets/models/tower.glb", "glb");
        write(root, "assets/cache/blob.bin", "x");

        let mut config = plain_config();
        config.exclude_files.push("cache/".to_string());
        let manifest = BuildStage::new(root, &config).run().unwrap().manifest;

        for entry in &manifest.files {
            assert!(!entry.path.ends_with(".py"), "{}", entry.path);
            assert!(!entry.path.contains("test-"), "{}", entry.path);
            assert!(!entry.path.contains("cache/"), "{}", entry.path);
        }
        assert!(manifest.contains("assets/models/tower.glb"));
        assert!(manifest.contains("data/tower.json"));
        assert!(!manifest.contains("debug-tower.html"));
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(root, "index.html", "<html><head></head></html>");
        write(root, "js/main.js", "x");

        let config = DeployConfig::default();
        let stage = BuildStage::new(root, &config);
        let first = stage.run().unwrap().manifest;
        write(&stage.output_dir(), "js/stale.js", "left over");
        let second = stage.run().unwrap().manifest;

        assert_eq!(first.files, second.files);
        assert_eq!(first.total_size, second.total_size);
        assert!(!second.contains("js/stale.js"));
    }

    #[test]
    fn test_artifacts_written_but_not_listed() {
        let dir = tempdir().unwrap();
        write(dir.path(), "index.html", "<html><head></head></html>");

        let config = DeployConfig::default();
        let stage = BuildStage::new(dir.path(), &config);
        let manifest = stage.run().unwrap().manifest;
        let out = stage.output_dir();

        for artifact in [MANIFEST_FILE, "nginx.conf", "Dockerfile", "deploy.sh", "README_DEPLOY.md"] {
            assert!(out.join(artifact).is_file(), "{}", artifact);
        }
        assert_eq!(manifest.file_count(), 1);

        let html = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(html.contains("https://cdn.skypack.dev"));
        assert!(html.contains("name=\"viewport\""));
    }

    #[test]
    fn test_refuses_output_over_source() {
        let dir = tempdir().unwrap();
        write(dir.path(), "index.html", "<html></html>");

        let mut config = DeployConfig::default();
        config.build_dir = PathBuf::from(".");
        let err = BuildStage::new(dir.path(), &config).run().unwrap_err();
        assert!(matches!(err, AppError::Build(_)));
        assert!(dir.path().join("index.html").exists());
    }

    #[test]
    fn test_existing_rescans_previous_output() {
        let dir = tempdir().unwrap();
        write(dir.path(), "index.html", "<html></html>");

        let config = DeployConfig::default();
        let stage = BuildStage::new(dir.path(), &config);
        assert!(stage.existing().unwrap().is_none());

        let built = stage.run().unwrap().manifest;
        let reused = stage.existing().unwrap().unwrap();
        assert_eq!(built.files, reused.files);
    }
}
