//! Deployment targets.
//!
//! Every target implements [`DeployTarget`]. Targets run external tools only
//! through the injected [`CommandRunner`] and convert their own failures
//! into a [`DeployResult`], so a failing target never stops the others.

pub mod docker;
pub mod github_pages;
pub mod local_server;
pub mod netlify;
pub mod static_zip;
pub mod vercel;

use std::fmt;
use std::path::Path;

use crate::core::config::DeployConfig;
use crate::core::context::CommandRunner;
use crate::core::manifest::BuildManifest;
use crate::core::result::DeployResult;
use crate::providers::Tool;

pub use docker::DockerTarget;
pub use github_pages::GithubPagesTarget;
pub use local_server::LocalServerTarget;
pub use netlify::NetlifyTarget;
pub use static_zip::StaticZipTarget;
pub use vercel::VercelTarget;

/// Known deploy targets, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Vercel,
    Netlify,
    Docker,
    GithubPages,
    StaticZip,
    LocalServer,
}

impl TargetKind {
    pub const ALL: [TargetKind; 6] = [
        Self::Vercel,
        Self::Netlify,
        Self::Docker,
        Self::GithubPages,
        Self::StaticZip,
        Self::LocalServer,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Vercel => "Vercel",
            Self::Netlify => "Netlify",
            Self::Docker => "Docker",
            Self::GithubPages => "GitHub Pages",
            Self::StaticZip => "Static package",
            Self::LocalServer => "Local server",
        }
    }

    /// Name accepted on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Vercel => "vercel",
            Self::Netlify => "netlify",
            Self::Docker => "docker",
            Self::GithubPages => "github-pages",
            Self::StaticZip => "package",
            Self::LocalServer => "serve",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|k| {
            k.key() == key || (*k == Self::GithubPages && (key == "gh-pages" || key == "pages"))
        })
    }

    /// Blocking targets are never part of a "deploy to all" run.
    pub fn runs_in_batch(&self) -> bool {
        !matches!(self, Self::LocalServer)
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A place the build output can be published to.
pub trait DeployTarget {
    fn kind(&self) -> TargetKind;

    fn name(&self) -> &'static str {
        self.kind().display_name()
    }

    /// External tool the target shells out to, if any.
    fn tool(&self) -> Option<Tool> {
        None
    }

    /// Checks that the target's tooling is available. Never mutates state.
    fn probe(&self) -> bool;

    /// Publishes the build output. Failures are reported in the result.
    fn deploy(&self, manifest: &BuildManifest, config: &DeployConfig) -> DeployResult;

    fn runs_in_batch(&self) -> bool {
        self.kind().runs_in_batch()
    }
}

/// Options shared by the default target set.
#[derive(Debug, Clone)]
pub struct TargetOptions {
    /// Force-push the pages branch without asking.
    pub force_push: bool,
    pub serve_host: String,
    pub serve_port: u16,
    pub open_browser: bool,
}

impl TargetOptions {
    pub fn from_config(config: &DeployConfig) -> Self {
        Self {
            force_push: false,
            serve_host: config.server.host.clone(),
            serve_port: config.server.port,
            open_browser: false,
        }
    }
}

/// Builds every target in menu order.
pub fn default_targets<'a>(
    runner: &'a dyn CommandRunner,
    source_root: &'a Path,
    options: &TargetOptions,
) -> Vec<Box<dyn DeployTarget + 'a>> {
    vec![
        Box::new(VercelTarget::new(runner)),
        Box::new(NetlifyTarget::new(runner)),
        Box::new(DockerTarget::new(runner)),
        Box::new(GithubPagesTarget::new(runner, source_root).force(options.force_push)),
        Box::new(StaticZipTarget::new(source_root, runner.is_dry_run())),
        Box::new(LocalServerTarget::new(
            &options.serve_host,
            options.serve_port,
            options.open_browser,
        )),
    ]
}

/// First `https://` URL in `text`, preferring one containing `preferred`.
pub(crate) fn find_url(text: &str, preferred: &str) -> Option<String> {
    let urls: Vec<&str> = text
        .split_whitespace()
        .filter_map(|token| token.find("https://").map(|i| &token[i..]))
        .map(|url| url.trim_end_matches(|c: char| matches!(c, ')' | ']' | ',' | '.' | '"' | '\'')))
        .collect();

    urls.iter()
        .find(|url| url.contains(preferred))
        .or_else(|| urls.first())
        .map(|url| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip_in_order() {
        let keys: Vec<&str> = TargetKind::ALL.iter().map(|k| k.key()).collect();
        assert_eq!(
            keys,
            vec!["vercel", "netlify", "docker", "github-pages", "package", "serve"]
        );
        assert_eq!(TargetKind::from_key("GH-PAGES"), Some(TargetKind::GithubPages));
        assert_eq!(TargetKind::from_key("heroku"), None);
    }

    #[test]
    fn test_local_server_not_in_batch() {
        let batch: Vec<TargetKind> = TargetKind::ALL
            .into_iter()
            .filter(|k| k.runs_in_batch())
            .collect();
        assert_eq!(batch.len(), 5);
        assert!(!batch.contains(&TargetKind::LocalServer));
    }

    #[test]
    fn test_find_url_prefers_domain() {
        let text = "Inspect: https://vercel.com/acme/tower/abc\nProduction: https://tower-acme.vercel.app [2s]";
        assert_eq!(
            find_url(text, "vercel.app").as_deref(),
            Some("https://tower-acme.vercel.app")
        );
        assert_eq!(
            find_url("see (https://example.org).", "vercel.app").as_deref(),
            Some("https://example.org")
        );
        assert_eq!(find_url("no links here", "vercel.app"), None);
    }
}
