//! Outcome of a single target run.

use serde::Serialize;

use crate::core::error::AppError;

/// Why a target did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    PrerequisiteMissing,
    CommandFailed,
    PortInUse,
    Error,
}

/// Result of running one deploy target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployResult {
    pub target: String,
    pub succeeded: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl DeployResult {
    pub fn success(target: &str, message: impl Into<String>) -> Self {
        Self {
            target: target.to_string(),
            succeeded: true,
            message: message.into(),
            url: None,
            failure: None,
            hint: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Converts an adapter error into a failed result.
    pub fn from_error(target: &str, error: &AppError) -> Self {
        let failure = match error {
            AppError::PrerequisiteMissing { .. } => FailureKind::PrerequisiteMissing,
            AppError::Command(_)
            | AppError::Git(_)
            | AppError::PushRejected { .. }
            | AppError::Docker(_) => FailureKind::CommandFailed,
            AppError::PortInUse { .. } => FailureKind::PortInUse,
            _ => FailureKind::Error,
        };

        Self {
            target: target.to_string(),
            succeeded: false,
            message: error.to_string(),
            url: None,
            failure: Some(failure),
            hint: error.hint(),
        }
    }

    /// Folds an adapter outcome into a result.
    pub fn from_outcome(target: &str, outcome: Result<DeployResult, AppError>) -> Self {
        outcome.unwrap_or_else(|e| Self::from_error(target, &e))
    }

    /// One-line status cell for the summary table.
    pub fn status_label(&self) -> &'static str {
        match (self.succeeded, self.failure) {
            (true, _) => "ok",
            (false, Some(FailureKind::PrerequisiteMissing)) => "missing tool",
            (false, _) => "failed",
        }
    }

    /// Details cell for the summary table: URL when there is one.
    pub fn details(&self) -> &str {
        self.url.as_deref().unwrap_or(&self.message)
    }
}

/// Returns true if every result succeeded.
pub fn all_succeeded(results: &[DeployResult]) -> bool {
    results.iter().all(|r| r.succeeded)
}
