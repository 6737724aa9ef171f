pub mod docker;
pub mod html;
pub mod nginx;
pub mod script;

pub use docker::{generate_compose, generate_dockerfile, generate_dockerignore};
pub use html::inject_head_tags;
pub use nginx::generate as generate_nginx_config;
pub use script::{generate_deploy_script, generate_readme};
