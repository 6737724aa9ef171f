use crate::core::config::DeployConfig;
use crate::core::context::CommandRunner;
use crate::core::error::AppError;
use crate::core::manifest::BuildManifest;
use crate::core::result::DeployResult;
use crate::providers::Tool;
use crate::targets::{find_url, DeployTarget, TargetKind};

/// Publishes the build output with the Vercel CLI.
pub struct VercelTarget<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> VercelTarget<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    fn deploy_inner(&self, manifest: &BuildManifest) -> Result<DeployResult, AppError> {
        let output = self.runner.run_in(
            Some(&manifest.output_dir),
            Tool::Vercel.binary(),
            &["--prod", "--yes"],
        )?;
        output.ensure_success("vercel --prod failed")?;

        if output.dry_run {
            return Ok(DeployResult::success(self.name(), "Dry run, nothing deployed"));
        }

        let url = find_url(&output.stdout, "vercel.app")
            .or_else(|| find_url(&output.stderr, "vercel.app"));
        let result = DeployResult::success(self.name(), "Deployed to production");
        Ok(match url {
            Some(url) => result.with_url(url),
            None => result,
        })
    }
}

impl DeployTarget for VercelTarget<'_> {
    fn kind(&self) -> TargetKind {
        TargetKind::Vercel
    }

    fn tool(&self) -> Option<Tool> {
        Some(Tool::Vercel)
    }

    fn probe(&self) -> bool {
        Tool::Vercel.probe(self.runner)
    }

    fn deploy(&self, manifest: &BuildManifest, _config: &DeployConfig) -> DeployResult {
        DeployResult::from_outcome(self.name(), self.deploy_inner(manifest))
    }
}
