use crate::core::config::DeployConfig;
use crate::core::error::AppError;
use crate::core::manifest::BuildManifest;
use crate::core::result::DeployResult;
use crate::server::{self, PreviewServer, ServingGuard};
use crate::targets::{DeployTarget, TargetKind};
use crate::ui;

/// Serves the build output locally until Ctrl+C.
pub struct LocalServerTarget {
    host: String,
    port: u16,
    open_browser: bool,
}

impl LocalServerTarget {
    pub fn new(host: &str, port: u16, open_browser: bool) -> Self {
        Self {
            host: host.to_string(),
            port,
            open_browser,
        }
    }

    fn deploy_inner(&self, manifest: &BuildManifest) -> Result<DeployResult, AppError> {
        let preview = PreviewServer::bind(&self.host, self.port, &manifest.output_dir)?;
        let url = preview.url();

        announce(&preview, &manifest.output_dir);
        if self.open_browser {
            server::open_browser(&url);
        }

        let served = {
            let _guard = ServingGuard::enter();
            preview.serve_until(server::stop_flag())?
        };

        Ok(DeployResult::success(
            self.name(),
            format!("Stopped after {} requests", served),
        )
        .with_url(url))
    }
}

/// Prints the startup banner shared by the menu and `vizdeploy serve`.
pub fn announce(preview: &PreviewServer, root: &std::path::Path) {
    ui::success(&format!("Serving {}", root.display()));
    ui::url(&preview.url());
    for page in server::other_pages(root) {
        ui::info(&format!("Also available: {}{}", preview.url(), page));
    }
    ui::output::plain("Press Ctrl+C to stop the server.\n");
}

impl DeployTarget for LocalServerTarget {
    fn kind(&self) -> TargetKind {
        TargetKind::LocalServer
    }

    fn probe(&self) -> bool {
        true
    }

    fn deploy(&self, manifest: &BuildManifest, _config: &DeployConfig) -> DeployResult {
        DeployResult::from_outcome(self.name(), self.deploy_inner(manifest))
    }
}
