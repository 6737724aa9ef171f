//! Git operations provider for publishing the build to a pages branch.

use std::path::Path;

use crate::core::context::{CommandOutput, CommandRunner};
use crate::core::error::AppError;

/// Git provider bound to a repository directory.
pub struct GitProvider<'a> {
    repo_dir: &'a Path,
    runner: &'a dyn CommandRunner,
}

impl<'a> GitProvider<'a> {
    pub fn new(repo_dir: &'a Path, runner: &'a dyn CommandRunner) -> Self {
        Self { repo_dir, runner }
    }

    fn git(&self, args: &[&str]) -> Result<CommandOutput, AppError> {
        self.runner.run_in(Some(self.repo_dir), "git", args)
    }

    fn git_in(&self, dir: &Path, args: &[&str]) -> Result<CommandOutput, AppError> {
        self.runner.run_in(Some(dir), "git", args)
    }

    /// Checks if the directory is inside a git work tree.
    pub fn is_repo(&self) -> Result<bool, AppError> {
        let output = self.git(&["rev-parse", "--is-inside-work-tree"])?;
        Ok(output.dry_run || (output.success && output.stdout.trim() == "true"))
    }

    /// Checks if a local branch exists.
    pub fn has_local_branch(&self, branch: &str) -> Result<bool, AppError> {
        let output = self.git(&["branch", "--list", branch])?;
        output.ensure_success("Failed to list local branches")?;
        Ok(branch_listed(&output.stdout, branch))
    }

    /// Checks if a remote-tracking branch exists.
    pub fn has_remote_branch(&self, remote: &str, branch: &str) -> Result<bool, AppError> {
        let output = self.git(&["branch", "-r"])?;
        output.ensure_success("Failed to list remote branches")?;
        Ok(branch_listed(&output.stdout, &format!("{}/{}", remote, branch)))
    }

    /// Gets the URL configured for a remote.
    pub fn remote_url(&self, remote: &str) -> Result<Option<String>, AppError> {
        let output = self.git(&["remote", "get-url", remote])?;
        if output.success && !output.stdout.is_empty() {
            Ok(Some(output.stdout.trim().to_string()))
        } else {
            Ok(None)
        }
    }

    /// Adds a linked worktree at `path` checked out on an existing local branch.
    pub fn add_worktree(&self, path: &Path, branch: &str) -> Result<(), AppError> {
        let path = path_arg(path)?;
        self.git(&["worktree", "add", path, branch])?
            .ensure_success(&format!("Failed to check out '{}'", branch))
            .map_err(git_error)
    }

    /// Adds a linked worktree with a new local branch tracking `start_point`.
    pub fn add_tracking_worktree(
        &self,
        path: &Path,
        branch: &str,
        start_point: &str,
    ) -> Result<(), AppError> {
        let path = path_arg(path)?;
        self.git(&["worktree", "add", "-b", branch, path, start_point])?
            .ensure_success(&format!("Failed to create '{}' from {}", branch, start_point))
            .map_err(git_error)
    }

    /// Adds a detached linked worktree at `path`.
    pub fn add_detached_worktree(&self, path: &Path) -> Result<(), AppError> {
        let path = path_arg(path)?;
        self.git(&["worktree", "add", "--detach", path])?
            .ensure_success("Failed to create worktree")
            .map_err(git_error)
    }

    /// Starts an orphan branch inside `worktree` and clears its index.
    pub fn checkout_orphan(&self, worktree: &Path, branch: &str) -> Result<(), AppError> {
        self.git_in(worktree, &["checkout", "--orphan", branch])?
            .ensure_success(&format!("Failed to create orphan branch '{}'", branch))
            .map_err(git_error)?;
        self.git_in(worktree, &["rm", "-rf", "--quiet", "--ignore-unmatch", "."])?
            .ensure_success("Failed to clear orphan branch")
            .map_err(git_error)
    }

    /// Returns true once HEAD points at a commit.
    pub fn has_commits(&self) -> Result<bool, AppError> {
        let output = self.git(&["rev-parse", "--verify", "-q", "HEAD"])?;
        Ok(output.dry_run || output.success)
    }

    /// Reads a config value as seen from the repository.
    pub fn config_value(&self, key: &str) -> Result<Option<String>, AppError> {
        let output = self.git(&["config", "--get", key])?;
        let value = output.stdout.trim();
        if !output.success || value.is_empty() {
            return Ok(None);
        }
        Ok(Some(value.to_string()))
    }

    /// Initializes a standalone repository at `dir` whose unborn HEAD is
    /// `branch` and whose `remote` points at `url`.
    ///
    /// Used when the source repository has no commit to branch a worktree
    /// from. The committer identity is carried over from the source.
    pub fn init_standalone(
        &self,
        dir: &Path,
        branch: &str,
        remote: &str,
        url: &str,
    ) -> Result<(), AppError> {
        std::fs::create_dir_all(dir)?;
        let head = format!("refs/heads/{}", branch);
        let steps: [(&[&str], &str); 3] = [
            (&["init", "--quiet"], "Failed to initialize publish repository"),
            (&["symbolic-ref", "HEAD", &head], "Failed to select pages branch"),
            (&["remote", "add", remote, url], "Failed to add remote"),
        ];
        for (args, context) in steps {
            self.git_in(dir, args)?
                .ensure_success(context)
                .map_err(git_error)?;
        }

        for key in ["user.name", "user.email"] {
            if let Some(value) = self.config_value(key)? {
                self.git_in(dir, &["config", key, &value])?
                    .ensure_success(&format!("Failed to set {}", key))
                    .map_err(git_error)?;
            }
        }
        Ok(())
    }

    /// Stages every change in `worktree`.
    pub fn add_all(&self, worktree: &Path) -> Result<(), AppError> {
        self.git_in(worktree, &["add", "--all"])?
            .ensure_success("Failed to stage files")
            .map_err(git_error)
    }

    /// Returns true if `worktree` has staged or unstaged changes.
    pub fn has_changes(&self, worktree: &Path) -> Result<bool, AppError> {
        let output = self.git_in(worktree, &["status", "--porcelain"])?;
        output.ensure_success("Failed to read status").map_err(git_error)?;
        Ok(output.dry_run || !output.stdout.trim().is_empty())
    }

    /// Commits staged changes in `worktree`.
    pub fn commit(&self, worktree: &Path, message: &str) -> Result<(), AppError> {
        self.git_in(worktree, &["commit", "-m", message])?
            .ensure_success("Failed to commit")
            .map_err(git_error)
    }

    /// Pushes `branch` to `remote`, optionally forcing.
    /// Returns the raw output so callers can inspect rejections.
    pub fn push(
        &self,
        worktree: &Path,
        remote: &str,
        branch: &str,
        force: bool,
    ) -> Result<CommandOutput, AppError> {
        if force {
            self.git_in(worktree, &["push", "-f", remote, branch])
        } else {
            self.git_in(worktree, &["push", "-u", remote, branch])
        }
    }

    /// Removes a linked worktree. Best effort.
    pub fn remove_worktree(&self, path: &Path) {
        let Some(path) = path.to_str() else {
            return;
        };
        match self.git(&["worktree", "remove", "--force", path]) {
            Ok(output) if output.success => {}
            Ok(output) => tracing::warn!("failed to remove worktree {}: {}", path, output.stderr),
            Err(e) => tracing::warn!("failed to remove worktree {}: {}", path, e),
        }
    }
}

/// Returns true if a push was rejected because the remote has diverged.
pub fn is_non_fast_forward(output: &CommandOutput) -> bool {
    let stderr = output.stderr.to_lowercase();
    stderr.contains("non-fast-forward") || stderr.contains("fetch first")
}

/// Derives the GitHub Pages URL from a GitHub remote URL.
/// Supports `git@github.com:owner/repo.git` and `https://github.com/owner/repo(.git)`.
pub fn pages_url(remote_url: &str) -> Option<String> {
    let path = remote_url
        .strip_prefix("git@github.com:")
        .or_else(|| remote_url.strip_prefix("https://github.com/"))
        .or_else(|| remote_url.strip_prefix("ssh://git@github.com/"))?;
    let path = path.trim_end_matches('/').trim_end_matches(".git");
    let (owner, repo) = path.split_once('/')?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }

    let owner = owner.to_lowercase();
    if repo.eq_ignore_ascii_case(&format!("{}.github.io", owner)) {
        Some(format!("https://{}.github.io/", owner))
    } else {
        Some(format!("https://{}.github.io/{}/", owner, repo))
    }
}

fn branch_listed(listing: &str, name: &str) -> bool {
    listing
        .lines()
        .map(|line| line.trim_start_matches(['*', '+']).trim())
        .any(|line| line == name)
}

fn path_arg(path: &Path) -> Result<&str, AppError> {
    path.to_str()
        .ok_or_else(|| AppError::Git(format!("Path is not valid UTF-8: {}", path.display())))
}

fn git_error(e: AppError) -> AppError {
    match e {
        AppError::Command(msg) => AppError::Git(msg),
        other => other,
    }
}
