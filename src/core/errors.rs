//! Error types for the MRZ scan pipeline.
//!
//! This module defines the errors that can occur while preparing an image
//! for decoding, invoking the external decode capability, or dispatching
//! watched files. Expected per-item failures (an image that cannot be
//! decoded) are not errors; they are modeled as outcomes in the pipeline.

use thiserror::Error;

/// Enum representing different stages of processing in the scan pipeline.
///
/// This enum is used to identify which stage of the pipeline an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProcessingStage {
    /// Error occurred while normalizing image orientation.
    Orientation,
    /// Error occurred while enhancing the MRZ band.
    Enhancement,
    /// Error occurred while denoising.
    Denoise,
    /// Error occurred during local contrast equalization.
    Equalization,
    /// Error occurred while writing or removing a derived artifact.
    ArtifactIo,
    /// Generic processing error.
    Generic,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Orientation => write!(f, "orientation"),
            ProcessingStage::Enhancement => write!(f, "enhancement"),
            ProcessingStage::Denoise => write!(f, "denoise"),
            ProcessingStage::Equalization => write!(f, "equalization"),
            ProcessingStage::ArtifactIo => write!(f, "artifact io"),
            ProcessingStage::Generic => write!(f, "processing"),
        }
    }
}

/// Enum representing the errors that can occur in the scan pipeline.
#[derive(Error, Debug)]
pub enum MrzError {
    /// Error occurred while loading an image.
    #[error("image load")]
    ImageLoad(#[from] image::ImageError),

    /// Error occurred during processing.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Unexpected fault raised by the external decode capability.
    #[error("decode capability")]
    Decode(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error from the filesystem event source.
    #[error("watch")]
    Watch(#[from] notify::Error),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl MrzError {
    /// Creates an MrzError for a processing failure with stage context.
    pub fn processing_error(
        kind: ProcessingStage,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates an MrzError for an unexpected decoder fault.
    pub fn decode_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Decode(Box::new(error))
    }

    /// Creates an MrzError for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an MrzError for configuration errors.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Creates an MrzError for configuration errors with field context.
    pub fn config_error_with_context(field: &str, value: &str, reason: &str) -> Self {
        Self::ConfigError {
            message: format!(
                "Configuration error in field '{}' with value '{}': {}",
                field, value, reason
            ),
        }
    }
}

/// Convenient result alias for scan pipeline operations.
pub type MrzResult<T> = Result<T, MrzError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_stage_display() {
        assert_eq!(ProcessingStage::Enhancement.to_string(), "enhancement");
        assert_eq!(ProcessingStage::Generic.to_string(), "processing");
    }

    #[test]
    fn test_processing_error_message() {
        let err = MrzError::processing_error(
            ProcessingStage::Enhancement,
            "band crop produced zero height",
            std::io::Error::new(std::io::ErrorKind::InvalidData, "zero height"),
        );
        assert_eq!(
            err.to_string(),
            "enhancement failed: band crop produced zero height"
        );
    }

    #[test]
    fn test_config_error_with_context() {
        let err = MrzError::config_error_with_context("max_workers", "0", "must be at least 1");
        assert!(err.to_string().contains("max_workers"));
        assert!(err.to_string().contains("must be at least 1"));
    }
}
