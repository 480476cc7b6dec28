// Errors raised while loading or validating settings

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load settings: {0}")]
    Load(String),

    #[error("Failed to parse settings: {0}")]
    Parse(String),

    #[error("Invalid setting: {0}")]
    Validation(String),

    #[error("Settings do not match the expected shape: {0}")]
    Deserialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
