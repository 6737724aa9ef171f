use std::fs;
use std::path::Path;

use crate::core::config::DeployConfig;
use crate::core::context::CommandRunner;
use crate::core::error::AppError;
use crate::core::manifest::BuildManifest;
use crate::core::result::DeployResult;
use crate::providers::container::{
    remove_previous, Cleanup, ContainerConfig, ContainerRuntime, DockerRuntime,
};
use crate::providers::Tool;
use crate::targets::{DeployTarget, TargetKind};
use crate::templates;
use crate::ui;

/// Port nginx listens on inside the image.
const CONTAINER_PORT: u16 = 80;

/// Builds an nginx image from the output and (re)starts its container.
pub struct DockerTarget<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> DockerTarget<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    fn deploy_inner(
        &self,
        manifest: &BuildManifest,
        config: &DeployConfig,
    ) -> Result<DeployResult, AppError> {
        let output_dir = &manifest.output_dir;
        ensure_image_files(output_dir, config)?;

        let runtime = DockerRuntime::new(self.runner);
        let image = format!("{}:latest", config.docker_image());
        let container = config.docker_container();
        let host_port = config.docker_host_port();

        ui::info(&format!("Building image {}", image));
        runtime.build_image(&image, output_dir)?;

        match remove_previous(&runtime, container) {
            Cleanup::NothingToRemove => {
                tracing::debug!("no previous container '{}' to remove", container)
            }
            Cleanup::Removed => ui::info(&format!("Replaced previous container {}", container)),
            Cleanup::Failed(reason) => ui::warning(&format!(
                "Could not remove previous container {}: {}",
                container, reason
            )),
        }

        let run = ContainerConfig::new(container, &image)
            .port(host_port, CONTAINER_PORT)
            .label("vizdeploy.project", &config.project_name)
            .label("vizdeploy.version", &config.version);
        let id = runtime.run_container(&run)?;

        let message = if id.is_empty() {
            format!("Container {} running", container)
        } else {
            let short: String = id.chars().take(12).collect();
            format!("Container {} running ({})", container, short)
        };
        Ok(DeployResult::success(self.name(), message).with_url(local_url(host_port)))
    }
}

/// Writes the Dockerfile and nginx config when a build did not leave them.
fn ensure_image_files(output_dir: &Path, config: &DeployConfig) -> Result<(), AppError> {
    let dockerfile = output_dir.join("Dockerfile");
    if !dockerfile.exists() {
        fs::write(&dockerfile, templates::generate_dockerfile())?;
    }
    let nginx = output_dir.join("nginx.conf");
    if !nginx.exists() {
        fs::write(
            &nginx,
            templates::generate_nginx_config(config.optimization.compress_assets),
        )?;
    }
    Ok(())
}

fn local_url(port: u16) -> String {
    if port == 80 {
        "http://localhost".to_string()
    } else {
        format!("http://localhost:{}", port)
    }
}

impl DeployTarget for DockerTarget<'_> {
    fn kind(&self) -> TargetKind {
        TargetKind::Docker
    }

    fn tool(&self) -> Option<Tool> {
        Some(Tool::Docker)
    }

    fn probe(&self) -> bool {
        Tool::Docker.probe(self.runner)
    }

    fn deploy(&self, manifest: &BuildManifest, config: &DeployConfig) -> DeployResult {
        DeployResult::from_outcome(self.name(), self.deploy_inner(manifest, config))
    }
}
