//! `vizdeploy serve`.

use std::path::{Path, PathBuf};

use crate::core::error::AppError;
use crate::core::orchestrator::Orchestrator;
use crate::server::{self, PreviewServer, ServingGuard};
use crate::targets::local_server::announce;
use crate::ui;
use crate::utils::validation::validate_port;

/// Flags of the `serve` command. Unset values come from the config.
#[derive(Debug, Clone, Default)]
pub struct ServeOptions {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub dir: Option<PathBuf>,
    pub open: bool,
}

/// Serves a directory until Ctrl+C. Without `--dir` the build output is
/// served, building it first when it does not exist yet.
pub fn serve(
    source: &Path,
    config_path: Option<&Path>,
    options: ServeOptions,
) -> Result<(), AppError> {
    let (source_root, config) = super::load_project(source, config_path)?;
    let port = options.port.unwrap_or(config.server.port);
    validate_port(port)?;
    let host = options.host.as_deref().unwrap_or(&config.server.host);

    let root = match options.dir {
        Some(dir) if dir.is_dir() => dir,
        Some(dir) => {
            return Err(AppError::Config(format!(
                "{} is not a directory",
                dir.display()
            )))
        }
        None => {
            let mut orchestrator = Orchestrator::new(&source_root, &config, Vec::new());
            orchestrator.ensure_build(false)?.output_dir
        }
    };

    let preview = PreviewServer::bind(host, port, &root)?;
    announce(&preview, &root);
    if options.open {
        server::open_browser(&preview.url());
    }

    let served = {
        let _guard = ServingGuard::enter();
        preview.serve_until(server::stop_flag())?
    };
    ui::success(&format!("Server stopped after {} requests", served));
    Ok(())
}
