//! Error types for labelscope operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the label store.
#[derive(Error, Debug)]
pub enum LabelError {
    /// I/O error while reading or writing a label file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Key cannot be used as a label file name
    #[error("Invalid label key '{key}'")]
    InvalidKey {
        /// The rejected key
        key: String,
    },

    /// Store root is missing or not a directory
    #[error("Label directory not found: {path:?}")]
    DirectoryNotFound {
        /// Path that was expected to be a directory
        path: PathBuf,
    },
}

impl LabelError {
    /// Create an invalid key error.
    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey { key: key.into() }
    }
}

/// Errors from crop and overlay rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Image decoding or encoding failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Label index does not address a label
    #[error("Label index {index} out of range ({len} labels)")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of labels available
        len: usize,
    },

    /// Decoder thread ended without sending a result
    #[error("Image decoder thread stopped unexpectedly")]
    DecoderLost,

    /// Crop window has no pixels inside the image
    #[error("Crop window is empty for a {width}x{height} image")]
    EmptyCrop {
        /// Image width in pixels
        width: u32,
        /// Image height in pixels
        height: u32,
    },
}

/// Errors from loading or saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A setting is out of range
    #[error("Invalid config value for {field}: {message}")]
    InvalidValue {
        /// Name of the offending setting
        field: &'static str,
        /// Description of the problem
        message: String,
    },

    /// Config was written by an incompatible version
    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Supported version
        expected: u32,
        /// Version found in the file
        found: u32,
    },
}

/// Errors reported by a detection backend.
#[derive(Error, Debug)]
pub enum DetectionError {
    /// The backend refused or failed the request
    #[error("Detection request rejected: {message}")]
    Rejected {
        /// Message from the backend
        message: String,
    },

    /// Detection configuration is out of range
    #[error("Invalid detection config: {message}")]
    InvalidConfig {
        /// Description of the problem
        message: String,
    },
}

impl DetectionError {
    /// Create a rejected request error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Create an invalid config error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
