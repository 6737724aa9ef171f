//! Publishing to a GitHub Pages branch through a temporary worktree.
//!
//! The pages branch is checked out in a linked worktree under a temp
//! directory, so the user's own checkout and index are never touched. A
//! repository without any commit cannot host a linked worktree; the branch
//! is then built in a standalone repository and pushed to the same remote.

use std::fs;
use std::path::Path;

use crate::core::config::{DeployConfig, ForcePush, GithubPagesConfig};
use crate::core::context::CommandRunner;
use crate::core::error::AppError;
use crate::core::manifest::BuildManifest;
use crate::core::result::DeployResult;
use crate::providers::git::{is_non_fast_forward, pages_url, GitProvider};
use crate::providers::Tool;
use crate::targets::{DeployTarget, TargetKind};
use crate::ui;
use crate::utils::fs::{clear_dir_except, copy_dir_contents};

type ConfirmFn<'a> = Box<dyn Fn(&str) -> bool + 'a>;

/// How the pages branch was checked out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Checkout {
    /// A worktree linked to the source repository.
    Linked,
    /// A separate repository in the temp directory.
    Standalone,
}

pub struct GithubPagesTarget<'a> {
    runner: &'a dyn CommandRunner,
    repo_dir: &'a Path,
    force: bool,
    confirm: ConfirmFn<'a>,
}

impl<'a> GithubPagesTarget<'a> {
    pub fn new(runner: &'a dyn CommandRunner, repo_dir: &'a Path) -> Self {
        Self {
            runner,
            repo_dir,
            force: false,
            confirm: Box::new(|question: &str| ui::confirm(question, false).unwrap_or(false)),
        }
    }

    /// Force-push on rejection regardless of the configured policy.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Replaces the interactive force-push prompt.
    pub fn with_confirm(mut self, confirm: impl Fn(&str) -> bool + 'a) -> Self {
        self.confirm = Box::new(confirm);
        self
    }

    fn deploy_inner(
        &self,
        manifest: &BuildManifest,
        config: &DeployConfig,
    ) -> Result<DeployResult, AppError> {
        let git = GitProvider::new(self.repo_dir, self.runner);
        if !git.is_repo()? {
            return Err(AppError::Git(format!(
                "{} is not a git repository",
                self.repo_dir.display()
            )));
        }

        let pages = &config.github_pages;
        let tmp = tempfile::Builder::new()
            .prefix("vizdeploy-pages-")
            .tempdir()?;
        let worktree = tmp.path().join("site");

        let outcome = match self.checkout(&git, &worktree, pages) {
            Ok(checkout) => {
                let published = self.publish(&git, &worktree, manifest, pages);
                if checkout == Checkout::Linked {
                    git.remove_worktree(&worktree);
                }
                published
            }
            Err(e) => {
                if worktree.exists() {
                    git.remove_worktree(&worktree);
                }
                Err(e)
            }
        };
        outcome?;

        let url = match &pages.cname {
            Some(domain) => Some(format!("https://{}/", domain.trim())),
            None => git
                .remote_url(&pages.remote)?
                .and_then(|remote| pages_url(&remote)),
        };

        let result = DeployResult::success(
            self.name(),
            format!(
                "Published {} files to {}/{}",
                manifest.file_count(),
                pages.remote,
                pages.branch
            ),
        );
        Ok(match url {
            Some(url) => result.with_url(url),
            None => result,
        })
    }

    /// Checks out the pages branch into `worktree`, creating it if needed.
    fn checkout(
        &self,
        git: &GitProvider,
        worktree: &Path,
        pages: &GithubPagesConfig,
    ) -> Result<Checkout, AppError> {
        let branch = pages.branch.as_str();

        if git.has_local_branch(branch)? {
            tracing::debug!("using local branch {}", branch);
            git.add_worktree(worktree, branch)?;
        } else if git.has_remote_branch(&pages.remote, branch)? {
            tracing::debug!("tracking {}/{}", pages.remote, branch);
            git.add_tracking_worktree(worktree, branch, &format!("{}/{}", pages.remote, branch))?;
        } else if !git.has_commits()? {
            let url = git.remote_url(&pages.remote)?.ok_or_else(|| {
                AppError::Git(format!("Remote '{}' is not configured", pages.remote))
            })?;
            ui::info(&format!("Creating branch {} in a fresh repository", branch));
            git.init_standalone(worktree, branch, &pages.remote, &url)?;
            return Ok(Checkout::Standalone);
        } else {
            ui::info(&format!("Creating orphan branch {}", branch));
            git.add_detached_worktree(worktree)?;
            git.checkout_orphan(worktree, branch)?;
        }
        Ok(Checkout::Linked)
    }

    fn publish(
        &self,
        git: &GitProvider,
        worktree: &Path,
        manifest: &BuildManifest,
        pages: &GithubPagesConfig,
    ) -> Result<(), AppError> {
        fs::create_dir_all(worktree)?;
        clear_dir_except(worktree, &[".git"])?;
        copy_dir_contents(&manifest.output_dir, worktree)?;
        fs::write(worktree.join(".nojekyll"), "")?;
        if let Some(domain) = &pages.cname {
            fs::write(worktree.join("CNAME"), format!("{}\n", domain.trim()))?;
        }

        git.add_all(worktree)?;
        if git.has_changes(worktree)? {
            let message = format!(
                "Deploy to GitHub Pages - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
            );
            git.commit(worktree, &message)?;
        } else {
            ui::info("No changes since the last deploy");
        }

        self.push(git, worktree, pages)
    }

    fn push(
        &self,
        git: &GitProvider,
        worktree: &Path,
        pages: &GithubPagesConfig,
    ) -> Result<(), AppError> {
        let output = git.push(worktree, &pages.remote, &pages.branch, false)?;
        if output.success || output.dry_run {
            return Ok(());
        }
        if !is_non_fast_forward(&output) {
            return Err(AppError::Git(format!(
                "Push to {} failed: {}",
                pages.remote, output.stderr
            )));
        }

        let policy = if self.force {
            ForcePush::Always
        } else {
            pages.force_push
        };
        let force = match policy {
            ForcePush::Always => true,
            ForcePush::Never => false,
            ForcePush::Ask => (self.confirm)(&format!(
                "{}/{} has diverged. Overwrite it with a force push?",
                pages.remote, pages.branch
            )),
        };

        if !force {
            return Err(AppError::PushRejected {
                remote: pages.remote.clone(),
                branch: pages.branch.clone(),
            });
        }

        ui::warning(&format!("Force pushing {}/{}", pages.remote, pages.branch));
        git.push(worktree, &pages.remote, &pages.branch, true)?
            .ensure_success("Force push failed")
    }
}

impl DeployTarget for GithubPagesTarget<'_> {
    fn kind(&self) -> TargetKind {
        TargetKind::GithubPages
    }

    fn tool(&self) -> Option<Tool> {
        Some(Tool::Git)
    }

    fn probe(&self) -> bool {
        Tool::Git.probe(self.runner)
    }

    fn deploy(&self, manifest: &BuildManifest, config: &DeployConfig) -> DeployResult {
        DeployResult::from_outcome(self.name(), self.deploy_inner(manifest, config))
    }
}
