pub mod fs;
pub mod validation;

pub use validation::{parse_port, validate_port, validate_project_name};
