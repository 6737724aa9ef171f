use crate::core::config::DeployConfig;
use crate::core::context::CommandRunner;
use crate::core::error::AppError;
use crate::core::manifest::BuildManifest;
use crate::core::result::DeployResult;
use crate::providers::Tool;
use crate::targets::{DeployTarget, TargetKind};

/// Labels the Netlify CLI prints in front of the deployed URL.
const URL_LABELS: &[&str] = &["Website URL:", "Live Draft URL:", "Website draft URL:"];

/// Publishes the build output with the Netlify CLI.
pub struct NetlifyTarget<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> NetlifyTarget<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    fn deploy_inner(
        &self,
        manifest: &BuildManifest,
        config: &DeployConfig,
    ) -> Result<DeployResult, AppError> {
        let dir = manifest.output_dir.to_string_lossy();
        let mut args = vec!["deploy", "--prod", "--dir", &*dir];
        if let Some(site) = &config.netlify.site {
            args.push("--site");
            args.push(site.as_str());
        }

        let output = self
            .runner
            .run_in(Some(&manifest.output_dir), Tool::Netlify.binary(), &args)?;
        output.ensure_success("netlify deploy failed")?;

        if output.dry_run {
            return Ok(DeployResult::success(self.name(), "Dry run, nothing deployed"));
        }

        let result = DeployResult::success(self.name(), "Deployed to production");
        Ok(match parse_site_url(&output.stdout) {
            Some(url) => result.with_url(url),
            None => result,
        })
    }
}

/// Extracts the site URL from `netlify deploy` output.
pub fn parse_site_url(stdout: &str) -> Option<String> {
    for label in URL_LABELS {
        let found = stdout.lines().find_map(|line| {
            let (_, rest) = line.split_once(label)?;
            let url = rest.trim();
            (!url.is_empty()).then(|| url.to_string())
        });
        if found.is_some() {
            return found;
        }
    }
    None
}

impl DeployTarget for NetlifyTarget<'_> {
    fn kind(&self) -> TargetKind {
        TargetKind::Netlify
    }

    fn tool(&self) -> Option<Tool> {
        Some(Tool::Netlify)
    }

    fn probe(&self) -> bool {
        Tool::Netlify.probe(self.runner)
    }

    fn deploy(&self, manifest: &BuildManifest, config: &DeployConfig) -> DeployResult {
        DeployResult::from_outcome(self.name(), self.deploy_inner(manifest, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::CommandOutput;
    use crate::core::testing::ScriptedRunner;
    use std::path::PathBuf;

    const DEPLOY_OUTPUT: &str = "Deploy path: /srv/tower/dist
Deploying to main site URL...
✔ Deploy is live!

Logs:              https://app.netlify.com/sites/tower/deploys/65f
Unique deploy URL: https://65f--tower.netlify.app
Website URL:       https://tower.netlify.app";

    fn manifest() -> BuildManifest {
        BuildManifest {
            output_dir: PathBuf::from("/srv/tower/dist"),
            name: "plant-viz".into(),
            version: "1.0.0".into(),
            build_time: chrono::Utc::now(),
            files: Vec::new(),
            total_size: 0,
        }
    }

    #[test]
    fn test_parse_site_url() {
        assert_eq!(
            parse_site_url(DEPLOY_OUTPUT).as_deref(),
            Some("https://tower.netlify.app")
        );
        assert_eq!(
            parse_site_url("Live Draft URL: https://draft--tower.netlify.app").as_deref(),
            Some("https://draft--tower.netlify.app")
        );
        assert_eq!(parse_site_url("Deploy failed"), None);
    }

    #[test]
    fn test_deploy_passes_dir_and_site() {
        let runner = ScriptedRunner::new().on("netlify deploy", CommandOutput::ok(DEPLOY_OUTPUT));
        let mut config = DeployConfig::default();
        config.netlify.site = Some("tower".into());

        let result = NetlifyTarget::new(&runner).deploy(&manifest(), &config);
        assert!(result.succeeded);
        assert_eq!(result.url.as_deref(), Some("https://tower.netlify.app"));
        assert_eq!(
            runner.calls(),
            vec!["netlify deploy --prod --dir /srv/tower/dist --site tower"]
        );
    }

    #[test]
    fn test_missing_cli_gives_install_hint() {
        let runner = ScriptedRunner::new().missing("netlify");
        let result = NetlifyTarget::new(&runner).deploy(&manifest(), &DeployConfig::default());
        assert!(!result.succeeded);
        assert!(result.hint.unwrap().contains("netlify-cli"));
    }
}
