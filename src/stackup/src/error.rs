//! Error type for provisioning operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Privilege error: {0}")]
    Privilege(String),

    #[error("Unsupported OS: {0}")]
    UnsupportedOs(String),

    #[error("Address error: {0}")]
    Address(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Command `{program}` failed (exit {exit_code}): {stderr}")]
    Command {
        program: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("Template error: {0}")]
    Template(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
