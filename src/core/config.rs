//! Deployment configuration, loaded once from the project root.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::AppError;
use crate::utils::validation::{validate_port, validate_project_name};

/// Config file names looked up in the source root, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    "deploy-config.json",
    "deploy-config.yml",
    "deploy-config.yaml",
];

/// Deployment configuration.
///
/// Loaded once at startup and passed by reference everywhere afterwards.
/// Unknown keys are ignored so older config files keep working.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DeployConfig {
    pub project_name: String,
    pub version: String,
    /// Output directory, relative to the source root unless absolute.
    pub build_dir: PathBuf,
    /// Gitignore-style patterns excluded from the build.
    #[serde(alias = "exclude_patterns")]
    pub exclude_files: Vec<String>,
    /// Library name to CDN URL.
    pub cdn: BTreeMap<String, String>,
    pub optimization: OptimizationConfig,
    pub docker: DockerConfig,
    pub server: ServerConfig,
    pub github_pages: GithubPagesConfig,
    pub netlify: NetlifyConfig,
    pub package: PackageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OptimizationConfig {
    /// Inject cache/preload/preconnect tags into index.html.
    pub optimize_html: bool,
    /// Enable gzip in the generated nginx config.
    pub compress_assets: bool,
    /// Write manifest.json into the build output.
    pub generate_manifest: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DockerConfig {
    /// Image name, defaults to the project name.
    pub image: Option<String>,
    /// Container name, defaults to the project name.
    pub container: Option<String>,
    pub host_port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GithubPagesConfig {
    pub remote: String,
    pub branch: String,
    /// Custom domain written to a CNAME file.
    pub cname: Option<String>,
    pub force_push: ForcePush,
}

/// What to do when the pages branch push is rejected as non-fast-forward.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ForcePush {
    #[default]
    Ask,
    Always,
    Never,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct NetlifyConfig {
    /// Site ID or name passed as `--site`.
    pub site: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct PackageConfig {
    pub file_name: Option<String>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        let mut cdn = BTreeMap::new();
        cdn.insert(
            "three_js".to_string(),
            "https://cdn.skypack.dev/three@0.132.2".to_string(),
        );
        cdn.insert(
            "orbit_controls".to_string(),
            "https://cdn.skypack.dev/three@0.132.2/examples/jsm/controls/OrbitControls.js"
                .to_string(),
        );

        Self {
            project_name: "3d-desulfurization-tower".to_string(),
            version: "1.0.0".to_string(),
            build_dir: PathBuf::from("dist"),
            exclude_files: [
                "*.md",
                "*.py",
                "*.bat",
                "requirements.txt",
                "debug-*.html",
                "test-*.html",
                "minimal-debug.html",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            cdn,
            optimization: OptimizationConfig::default(),
            docker: DockerConfig::default(),
            server: ServerConfig::default(),
            github_pages: GithubPagesConfig::default(),
            netlify: NetlifyConfig::default(),
            package: PackageConfig::default(),
        }
    }
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            optimize_html: true,
            compress_assets: true,
            generate_manifest: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8000,
        }
    }
}

impl Default for GithubPagesConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            branch: "gh-pages".to_string(),
            cname: None,
            force_push: ForcePush::Ask,
        }
    }
}

impl DeployConfig {
    /// Loads the configuration for a source root.
    ///
    /// An explicit path must exist. Otherwise the first of
    /// [`CONFIG_FILE_NAMES`] found in `source_root` is used, falling back to
    /// defaults when none exists.
    pub fn load(source_root: &Path, explicit: Option<&Path>) -> Result<Self, AppError> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Some(path.to_path_buf())
            }
            None => CONFIG_FILE_NAMES
                .iter()
                .map(|name| source_root.join(name))
                .find(|p| p.exists()),
        };

        let config = match path {
            Some(path) => {
                tracing::debug!("loading config from {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Parses a JSON or YAML config file, chosen by extension.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yml") | Some("yaml")
        );

        if is_yaml {
            serde_yaml::from_str(&content)
                .map_err(|e| AppError::Config(format!("Failed to parse {}: {}", path.display(), e)))
        } else {
            serde_json::from_str(&content)
                .map_err(|e| AppError::Config(format!("Failed to parse {}: {}", path.display(), e)))
        }
    }

    /// Checks values that would otherwise fail deep inside a deploy.
    pub fn validate(&self) -> Result<(), AppError> {
        validate_project_name(&self.project_name)?;

        if self.version.trim().is_empty() {
            return Err(AppError::Validation("Version cannot be empty".into()));
        }

        if self.build_dir.as_os_str().is_empty() {
            return Err(AppError::Validation("build_dir cannot be empty".into()));
        }

        validate_port(self.server.port)?;
        if let Some(port) = self.docker.host_port {
            validate_port(port)?;
        }

        if self.github_pages.branch.trim().is_empty() || self.github_pages.remote.trim().is_empty()
        {
            return Err(AppError::Validation(
                "github_pages.remote and github_pages.branch cannot be empty".into(),
            ));
        }

        Ok(())
    }

    /// Absolute output directory for a source root.
    pub fn output_dir(&self, source_root: &Path) -> PathBuf {
        if self.build_dir.is_absolute() {
            self.build_dir.clone()
        } else {
            source_root.join(&self.build_dir)
        }
    }

    pub fn docker_image(&self) -> &str {
        self.docker.image.as_deref().unwrap_or(&self.project_name)
    }

    pub fn docker_container(&self) -> &str {
        self.docker.container.as_deref().unwrap_or(&self.project_name)
    }

    pub fn docker_host_port(&self) -> u16 {
        self.docker.host_port.unwrap_or(80)
    }

    /// File name of the static zip package.
    pub fn package_file_name(&self) -> String {
        self.package
            .file_name
            .clone()
            .unwrap_or_else(|| format!("{}-static.zip", self.project_name))
    }

    /// Distinct `scheme://host` origins of the configured CDN URLs.
    pub fn cdn_origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = self
            .cdn
            .values()
            .filter_map(|url| {
                let (scheme, rest) = url.split_once("://")?;
                let host = rest.split('/').next()?;
                (!host.is_empty()).then(|| format!("{}://{}", scheme, host))
            })
            .collect();
        origins.sort();
        origins.dedup();
        origins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_when_no_file() {
        let dir = tempdir().unwrap();
        let config = DeployConfig::load(dir.path(), None).unwrap();

        assert_eq!(config.project_name, "3d-desulfurization-tower");
        assert_eq!(config.build_dir, PathBuf::from("dist"));
        assert!(config.exclude_files.contains(&"*.md".to_string()));
        assert_eq!(config.docker_host_port(), 80);
        assert_eq!(config.docker_container(), "3d-desulfurization-tower");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("deploy-config.json"),
            r#"{
  "project_name": "plant-viz",
  "version": "2.1.0",
  "exclude_patterns": ["*.map"],
  "optimization": {"minify_js": false, "compress_assets": false},
  "docker": {"host_port": 8080}
}"#,
        )
        .unwrap();

        let config = DeployConfig::load(dir.path(), None).unwrap();
        assert_eq!(config.project_name, "plant-viz");
        assert_eq!(config.exclude_files, vec!["*.map"]);
        assert!(!config.optimization.compress_assets);
        assert!(config.optimization.generate_manifest);
        assert_eq!(config.docker_host_port(), 8080);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_yaml_config() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("deploy-config.yml"),
            "project_name: plant-viz\ngithub_pages:\n  branch: pages\n  force_push: never\n",
        )
        .unwrap();

        let config = DeployConfig::load(dir.path(), None).unwrap();
        assert_eq!(config.github_pages.branch, "pages");
        assert_eq!(config.github_pages.force_push, ForcePush::Never);
        assert_eq!(config.github_pages.remote, "origin");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("deploy-config.json"),
            r#"{"project_name": "Plant Viz"}"#,
        )
        .unwrap();
        assert!(matches!(
            DeployConfig::load(dir.path(), None),
            Err(AppError::Validation(_))
        ));

        assert!(matches!(
            DeployConfig::load(dir.path(), Some(&dir.path().join("missing.json"))),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_cdn_origins_are_deduplicated() {
        let config = DeployConfig::default();
        assert_eq!(config.cdn_origins(), vec!["https://cdn.skypack.dev"]);
    }
}
