use thiserror::Error;

/// Application-level errors for vizdeploy operations.
#[derive(Debug, Error)]
pub enum AppError {
    // Tooling errors
    #[error("'{tool}' is not installed or not on PATH")]
    PrerequisiteMissing { tool: String, hint: String },

    #[error("Command execution failed: {0}")]
    Command(String),

    // Build errors
    #[error("Build failed: {0}")]
    Build(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // Provider errors
    #[error("Git error: {0}")]
    Git(String),

    #[error("Push to {remote}/{branch} was rejected: the branch has diverged")]
    PushRejected { remote: String, branch: String },

    #[error("Docker error: {0}")]
    Docker(String),

    #[error("Archive error: {0}")]
    Archive(String),

    // Preview server errors
    #[error("Port {port} is already in use")]
    PortInUse { port: u16 },

    #[error("Server error: {0}")]
    Server(String),

    // Other errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Returns an actionable suggestion for the user, if one exists.
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::PrerequisiteMissing { hint, .. } => Some(hint.clone()),
            Self::PortInUse { port } => Some(format!(
                "Try another port: vizdeploy serve --port {}",
                port.saturating_add(1)
            )),
            Self::PushRejected { .. } => Some(
                "Re-run with --force-push or set github_pages.force_push to \"always\"".into(),
            ),
            Self::Build(_) => Some("Run vizdeploy from the project root, next to index.html".into()),
            Self::Config(_) | Self::Validation(_) => {
                Some("Check deploy-config.json in the project root".into())
            }
            _ => None,
        }
    }

    /// Returns true for errors that must end the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Build(_) | Self::Config(_) | Self::Validation(_) | Self::PortInUse { .. }
        )
    }
}
