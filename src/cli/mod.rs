use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use crate::core::config::DeployConfig;
use crate::core::error::AppError;
use crate::core::orchestrator::Selection;
use crate::targets::TargetKind;

pub mod build;
pub mod deploy;
pub mod menu;
pub mod serve;
pub mod status;

/// vizdeploy - build and ship a static visualization site
#[derive(Parser)]
#[command(
    name = "vizdeploy",
    version,
    about = "Build a static site bundle and deploy it to several hosting targets",
    long_about = None,
    after_help = "Run without a command to open the interactive menu."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory containing index.html
    #[arg(short, long, global = true, default_value = ".")]
    pub source: PathBuf,

    /// Configuration file (defaults to deploy-config.json or deploy-config.yml in the project)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive menu
    Menu,

    /// Build the deployable bundle
    Build,

    /// Deploy the bundle to one target or to all of them
    Deploy {
        /// Where to deploy
        #[arg(value_enum)]
        target: TargetArg,

        /// Rebuild even if a previous build exists
        #[arg(long)]
        rebuild: bool,

        /// Print external commands instead of running them
        #[arg(long)]
        dry_run: bool,

        /// Force-push the GitHub Pages branch if it has diverged
        #[arg(long)]
        force_push: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve a directory locally for preview
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Interface to bind
        #[arg(long)]
        host: Option<String>,

        /// Directory to serve (defaults to the build output)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Open the page in a browser
        #[arg(long)]
        open: bool,
    },

    /// Check tools and project files
    Status,
}

/// Targets accepted by `vizdeploy deploy`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetArg {
    Vercel,
    Netlify,
    Docker,
    #[value(alias = "gh-pages")]
    GithubPages,
    Package,
    All,
}

impl TargetArg {
    pub fn selection(self) -> Selection {
        match self {
            Self::Vercel => Selection::Target(TargetKind::Vercel),
            Self::Netlify => Selection::Target(TargetKind::Netlify),
            Self::Docker => Selection::Target(TargetKind::Docker),
            Self::GithubPages => Selection::Target(TargetKind::GithubPages),
            Self::Package => Selection::Target(TargetKind::StaticZip),
            Self::All => Selection::All,
        }
    }
}

/// Resolves the project directory and loads its configuration.
pub fn load_project(
    source: &Path,
    config: Option<&Path>,
) -> Result<(PathBuf, DeployConfig), AppError> {
    if !source.is_dir() {
        return Err(AppError::Config(format!(
            "Project directory {} does not exist",
            source.display()
        )));
    }
    let source_root = source.canonicalize()?;
    let config = DeployConfig::load(&source_root, config)?;
    tracing::debug!(
        project = %config.project_name,
        build_dir = %config.build_dir.display(),
        "loaded configuration"
    );
    Ok((source_root, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_deploy_target_parsing() {
        let cli = Cli::parse_from(["vizdeploy", "deploy", "gh-pages", "--force-push"]);
        match cli.command {
            Some(Commands::Deploy {
                target, force_push, ..
            }) => {
                assert_eq!(target, TargetArg::GithubPages);
                assert!(force_push);
            }
            _ => panic!("expected deploy"),
        }
        assert_eq!(
            TargetArg::Package.selection(),
            Selection::Target(TargetKind::StaticZip)
        );
    }

    #[test]
    fn test_load_project_missing_directory() {
        let dir = tempdir().unwrap();
        let err = load_project(&dir.path().join("nope"), None).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_load_project_reads_config() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("deploy-config.yml"), "project_name: tower\n").unwrap();
        let (root, config) = load_project(dir.path(), None).unwrap();
        assert!(root.is_absolute());
        assert_eq!(config.project_name, "tower");
    }
}
