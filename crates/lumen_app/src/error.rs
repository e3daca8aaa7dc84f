//! Error types for the application runtime

use crate::config::ConfigError;
use lumen_layout::LayoutError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LumenError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("unknown lesson '{0}'")]
    UnknownLesson(String),
}

pub type Result<T> = std::result::Result<T, LumenError>;
