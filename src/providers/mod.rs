pub mod archive;
pub mod container;
pub mod git;
pub mod tools;

pub use container::{ContainerConfig, ContainerRuntime, DockerRuntime};
pub use git::GitProvider;
pub use tools::{install_hint, Tool};
