pub mod cli;
pub mod core;
pub mod providers;
pub mod server;
pub mod targets;
pub mod templates;
pub mod ui;
pub mod utils;
