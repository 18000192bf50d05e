//! Core error and configuration types shared across the scan pipeline.

pub mod config;
pub mod errors;

pub use config::{ConfigValidator, EnhanceConfig, PipelineConfig, WatcherConfig};
pub use errors::{MrzError, MrzResult, ProcessingStage};
