use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use vizdeploy::cli::deploy::DeployOptions;
use vizdeploy::cli::serve::ServeOptions;
use vizdeploy::cli::{Cli, Commands};
use vizdeploy::core::AppError;
use vizdeploy::{server, ui};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    server::shutdown::install_handler();

    match run_command(&cli) {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(e) => {
            match e.hint() {
                Some(hint) => ui::error_with_hint(&e.to_string(), &hint),
                None => ui::error(&e.to_string()),
            }
            std::process::exit(1);
        }
    }
}

/// Logs go to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "vizdeploy=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run_command(cli: &Cli) -> Result<i32, AppError> {
    let source = cli.source.as_path();
    let config = cli.config.as_deref();

    match &cli.command {
        None | Some(Commands::Menu) => vizdeploy::cli::menu::run(source, config, cli.verbose),

        Some(Commands::Build) => {
            vizdeploy::cli::build::build(source, config)?;
            Ok(0)
        }

        Some(Commands::Deploy {
            target,
            rebuild,
            dry_run,
            force_push,
            json,
        }) => vizdeploy::cli::deploy::deploy(
            source,
            config,
            *target,
            DeployOptions {
                rebuild: *rebuild,
                dry_run: *dry_run,
                force_push: *force_push,
                json: *json,
            },
            cli.verbose,
        ),

        Some(Commands::Serve {
            port,
            host,
            dir,
            open,
        }) => {
            vizdeploy::cli::serve::serve(
                source,
                config,
                ServeOptions {
                    port: *port,
                    host: host.clone(),
                    dir: dir.clone(),
                    open: *open,
                },
            )?;
            Ok(0)
        }

        Some(Commands::Status) => {
            vizdeploy::cli::status::status(source, config, cli.verbose)?;
            Ok(0)
        }
    }
}
