//! Error types for the theme pipeline.

use thiserror::Error;

use crate::scheme::Role;

/// Result type alias for theme operations
pub type Result<T> = std::result::Result<T, ThemeError>;

#[derive(Error, Debug)]
pub enum ThemeError {
    /// No usable pixels, or the image could not be decoded
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Cluster count is zero or larger than the clusterer supports
    #[error("Invalid cluster count: {k} (expected 1..={max})")]
    InvalidClusterCount { k: usize, max: usize },

    #[error("Dominant color list is empty")]
    EmptyDominantList,

    /// A role needed for contrast analysis is absent from the palette
    #[error("Palette is missing required role `{role}`")]
    IncompletePalette { role: Role },

    #[error("Invalid hex color `{value}`")]
    InvalidColor { value: String },
}

impl ThemeError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap a lower-level decode or IO failure as invalid input
    pub fn invalid_input_from<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::InvalidInput {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
