pub mod build;
pub mod config;
pub mod context;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod result;

#[cfg(test)]
pub(crate) mod testing;

pub use build::{BuildReport, BuildStage};
pub use config::{DeployConfig, ForcePush};
pub use context::{CommandOutput, CommandRunner, ExecutionContext};
pub use error::AppError;
pub use manifest::{format_size, BuildManifest, ManifestEntry};
pub use orchestrator::{render_summary, MenuEvent, MenuState, Orchestrator, Selection, StatusReport};
pub use result::{all_succeeded, DeployResult, FailureKind};
