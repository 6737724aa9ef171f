//! Validation utilities for configuration values.

use crate::core::error::AppError;

/// Validates a project name.
/// It doubles as the Docker image and container name, so it must be
/// lowercase alphanumeric with `-`, `_` or `.`, 2-64 characters.
pub fn validate_project_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() {
        return Err(AppError::Validation("Project name cannot be empty".into()));
    }

    if name.len() < 2 {
        return Err(AppError::Validation(
            "Project name must be at least 2 characters".into(),
        ));
    }

    if name.len() > 64 {
        return Err(AppError::Validation(
            "Project name must be at most 64 characters".into(),
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.'))
    {
        return Err(AppError::Validation(
            "Project name must contain only lowercase letters, numbers, '-', '_' and '.'".into(),
        ));
    }

    let is_separator = |c: char| matches!(c, '-' | '_' | '.');
    if name.starts_with(is_separator) || name.ends_with(is_separator) {
        return Err(AppError::Validation(
            "Project name cannot start or end with a separator".into(),
        ));
    }

    Ok(())
}

/// Validates a TCP port taken from configuration or the command line.
pub fn validate_port(port: u16) -> Result<(), AppError> {
    if port == 0 {
        return Err(AppError::Validation("Port must be between 1 and 65535".into()));
    }
    Ok(())
}

/// Parses a port typed at a prompt, falling back to `default` on empty input.
pub fn parse_port(input: &str, default: u16) -> Result<u16, AppError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(default);
    }

    let port: u16 = input
        .parse()
        .map_err(|_| AppError::Validation(format!("'{}' is not a valid port number", input)))?;
    validate_port(port)?;
    Ok(port)
}
