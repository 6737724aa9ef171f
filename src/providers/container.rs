use std::path::Path;

use crate::core::context::CommandRunner;
use crate::core::error::AppError;

/// Trait for container runtime operations.
pub trait ContainerRuntime {
    /// Builds an image from the Dockerfile in `context_dir`.
    fn build_image(&self, tag: &str, context_dir: &Path) -> Result<(), AppError>;

    /// Runs a container with the specified configuration.
    fn run_container(&self, config: &ContainerConfig) -> Result<String, AppError>;

    /// Stops a container by name or ID.
    fn stop_container(&self, name: &str) -> Result<(), AppError>;

    /// Removes a container by name or ID.
    fn remove_container(&self, name: &str) -> Result<(), AppError>;

    /// Checks if a container exists, running or not.
    fn container_exists(&self, name: &str) -> Result<bool, AppError>;
}

/// Outcome of removing a previous container before a redeploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cleanup {
    /// No container with that name existed.
    NothingToRemove,
    /// The old container was stopped and removed.
    Removed,
    /// Removal failed; the new `run` will report the name clash if it matters.
    Failed(String),
}

/// Removes the previous container named `name`, if any.
///
/// Absence of the container is not an error and a failed `stop` does not
/// prevent the forced removal.
pub fn remove_previous(runtime: &dyn ContainerRuntime, name: &str) -> Cleanup {
    match runtime.container_exists(name) {
        Ok(false) => return Cleanup::NothingToRemove,
        Ok(true) => {}
        Err(e) => tracing::warn!("could not check for container '{}': {}", name, e),
    }

    if let Err(e) = runtime.stop_container(name) {
        tracing::warn!("stop '{}' failed, removing anyway: {}", name, e);
    }

    match runtime.remove_container(name) {
        Ok(()) => Cleanup::Removed,
        Err(e) => {
            tracing::warn!("remove '{}' failed: {}", name, e);
            Cleanup::Failed(e.to_string())
        }
    }
}

/// Configuration for running a container.
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    pub name: String,
    pub image: String,
    pub ports: Vec<PortMapping>,
    pub labels: Vec<(String, String)>,
}

impl ContainerConfig {
    pub fn new(name: &str, image: &str) -> Self {
        Self {
            name: name.to_string(),
            image: image.to_string(),
            ports: Vec::new(),
            labels: Vec::new(),
        }
    }

    pub fn port(mut self, host: u16, container: u16) -> Self {
        self.ports.push(PortMapping { host, container });
        self
    }

    pub fn label(mut self, key: &str, value: &str) -> Self {
        self.labels.push((key.to_string(), value.to_string()));
        self
    }

    /// Arguments for `docker run`.
    pub fn run_args(&self) -> Vec<String> {
        let mut args = vec![
            "run".to_string(),
            "-d".to_string(),
            "--name".to_string(),
            self.name.clone(),
            "--restart".to_string(),
            "unless-stopped".to_string(),
        ];

        for port in &self.ports {
            args.push("-p".to_string());
            args.push(format!("{}:{}", port.host, port.container));
        }

        for (key, value) in &self.labels {
            args.push("-l".to_string());
            args.push(format!("{}={}", key, value));
        }

        args.push(self.image.clone());
        args
    }
}

#[derive(Debug, Clone)]
pub struct PortMapping {
    pub host: u16,
    pub container: u16,
}

/// Docker implementation of ContainerRuntime.
pub struct DockerRuntime<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> DockerRuntime<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }
}

impl ContainerRuntime for DockerRuntime<'_> {
    fn build_image(&self, tag: &str, context_dir: &Path) -> Result<(), AppError> {
        let context = context_dir.to_str().ok_or_else(|| {
            AppError::Docker(format!(
                "Build context is not valid UTF-8: {}",
                context_dir.display()
            ))
        })?;
        self.runner
            .run_command("docker", &["build", "-t", tag, context])?
            .ensure_success(&format!("Failed to build image '{}'", tag))
    }

    fn run_container(&self, config: &ContainerConfig) -> Result<String, AppError> {
        let args = config.run_args();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        let output = self.runner.run_command("docker", &args)?;
        output.ensure_success(&format!("Failed to run container '{}'", config.name))?;

        Ok(output.stdout.trim().to_string())
    }

    fn stop_container(&self, name: &str) -> Result<(), AppError> {
        self.runner
            .run_command("docker", &["stop", name])?
            .ensure_success(&format!("Failed to stop container '{}'", name))
    }

    fn remove_container(&self, name: &str) -> Result<(), AppError> {
        self.runner
            .run_command("docker", &["rm", "-f", name])?
            .ensure_success(&format!("Failed to remove container '{}'", name))
    }

    fn container_exists(&self, name: &str) -> Result<bool, AppError> {
        let output = self.runner.run_command(
            "docker",
            &["ps", "-a", "--filter", &format!("name=^{}$", name), "-q"],
        )?;
        output.ensure_success("Failed to list containers")?;
        Ok(!output.stdout.trim().is_empty())
    }
}
