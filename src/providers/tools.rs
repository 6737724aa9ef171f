//! External tools the deploy targets depend on.

use crate::core::context::CommandRunner;

/// A command-line tool invoked by one of the deploy targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Git,
    Docker,
    Vercel,
    Netlify,
}

impl Tool {
    /// Executable name on PATH.
    pub fn binary(&self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Docker => "docker",
            Self::Vercel => "vercel",
            Self::Netlify => "netlify",
        }
    }

    /// Checks whether the tool is present and runnable.
    /// Runs `<tool> --version` and never mutates anything.
    pub fn probe(&self, runner: &dyn CommandRunner) -> bool {
        match runner.run_command(self.binary(), &["--version"]) {
            Ok(output) => output.success,
            Err(e) => {
                tracing::debug!("probe for {} failed: {}", self.binary(), e);
                false
            }
        }
    }
}

/// Returns an install suggestion for a tool binary.
pub fn install_hint(binary: &str) -> &'static str {
    match binary {
        "git" => "Install Git: https://git-scm.com/downloads",
        "docker" => "Install Docker: https://www.docker.com/get-started",
        "vercel" => "Install the Vercel CLI: npm i -g vercel",
        "netlify" => "Install the Netlify CLI: npm i -g netlify-cli",
        _ => "Install the missing tool and make sure it is on PATH",
    }
}
