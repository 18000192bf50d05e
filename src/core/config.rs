//! Configuration types for the scan pipeline.
//!
//! All configuration structs are serde-deserializable with per-field
//! defaults, so a partial configuration file is always valid. Validation
//! is explicit via [`ConfigValidator`]; construction never fails.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::errors::MrzError;

/// Trait for validating configuration values after deserialization.
pub trait ConfigValidator {
    /// Validates the configuration, returning a configuration error on the
    /// first invalid field.
    fn validate(&self) -> Result<(), MrzError>;
}

/// Configuration for the MRZ band enhancement pipeline.
///
/// The defaults reproduce the reference enhancement parameters: bottom 25%
/// band, 3.0x cubic upscale, non-local-means strength 10 with 7px template
/// and 21px search windows, and CLAHE over an 8x8 tile grid with clip
/// limit 2.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhanceConfig {
    /// Fraction of image height, measured from the bottom, that contains the MRZ band.
    #[serde(default = "EnhanceConfig::default_band_fraction")]
    pub band_fraction: f32,

    /// Upscale factor applied to the cropped band before denoising.
    #[serde(default = "EnhanceConfig::default_scale_factor")]
    pub scale_factor: f32,

    /// Filter strength for non-local-means denoising.
    #[serde(default = "EnhanceConfig::default_denoise_strength")]
    pub denoise_strength: f32,

    /// Template (patch) window side length in pixels for denoising.
    #[serde(default = "EnhanceConfig::default_template_window")]
    pub denoise_template_window: u32,

    /// Search window side length in pixels for denoising.
    #[serde(default = "EnhanceConfig::default_search_window")]
    pub denoise_search_window: u32,

    /// Number of CLAHE tiles along each axis.
    #[serde(default = "EnhanceConfig::default_clahe_grid")]
    pub clahe_grid: u32,

    /// CLAHE contrast clip limit.
    #[serde(default = "EnhanceConfig::default_clahe_clip_limit")]
    pub clahe_clip_limit: f32,
}

impl EnhanceConfig {
    fn default_band_fraction() -> f32 {
        0.25
    }

    fn default_scale_factor() -> f32 {
        3.0
    }

    fn default_denoise_strength() -> f32 {
        10.0
    }

    fn default_template_window() -> u32 {
        7
    }

    fn default_search_window() -> u32 {
        21
    }

    fn default_clahe_grid() -> u32 {
        8
    }

    fn default_clahe_clip_limit() -> f32 {
        2.0
    }
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            band_fraction: Self::default_band_fraction(),
            scale_factor: Self::default_scale_factor(),
            denoise_strength: Self::default_denoise_strength(),
            denoise_template_window: Self::default_template_window(),
            denoise_search_window: Self::default_search_window(),
            clahe_grid: Self::default_clahe_grid(),
            clahe_clip_limit: Self::default_clahe_clip_limit(),
        }
    }
}

impl ConfigValidator for EnhanceConfig {
    fn validate(&self) -> Result<(), MrzError> {
        if !(0.0..=1.0).contains(&self.band_fraction) || self.band_fraction == 0.0 {
            return Err(MrzError::config_error_with_context(
                "band_fraction",
                &self.band_fraction.to_string(),
                "must be in (0.0, 1.0]",
            ));
        }
        if self.scale_factor < 1.0 {
            return Err(MrzError::config_error_with_context(
                "scale_factor",
                &self.scale_factor.to_string(),
                "must be at least 1.0",
            ));
        }
        if self.denoise_template_window == 0 || self.denoise_template_window % 2 == 0 {
            return Err(MrzError::config_error_with_context(
                "denoise_template_window",
                &self.denoise_template_window.to_string(),
                "must be a positive odd number",
            ));
        }
        if self.denoise_search_window < self.denoise_template_window
            || self.denoise_search_window % 2 == 0
        {
            return Err(MrzError::config_error_with_context(
                "denoise_search_window",
                &self.denoise_search_window.to_string(),
                "must be an odd number no smaller than the template window",
            ));
        }
        if self.clahe_grid == 0 {
            return Err(MrzError::config_error_with_context(
                "clahe_grid",
                "0",
                "must be at least 1",
            ));
        }
        if self.clahe_clip_limit <= 0.0 {
            return Err(MrzError::config_error_with_context(
                "clahe_clip_limit",
                &self.clahe_clip_limit.to_string(),
                "must be positive",
            ));
        }
        Ok(())
    }
}

/// Configuration for the folder watch dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// Delay in milliseconds between detecting a new file and reading it,
    /// giving the writer time to finish.
    #[serde(default = "WatcherConfig::default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Maximum number of concurrent decode workers. Events arriving while
    /// all workers are busy queue up; the watch loop itself never blocks.
    #[serde(default = "WatcherConfig::default_max_workers")]
    pub max_workers: usize,
}

impl WatcherConfig {
    fn default_settle_delay_ms() -> u64 {
        500
    }

    fn default_max_workers() -> usize {
        4
    }
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: Self::default_settle_delay_ms(),
            max_workers: Self::default_max_workers(),
        }
    }
}

impl ConfigValidator for WatcherConfig {
    fn validate(&self) -> Result<(), MrzError> {
        if self.max_workers == 0 {
            return Err(MrzError::config_error_with_context(
                "max_workers",
                "0",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Top-level pipeline configuration.
///
/// The two directory paths are supplied and persisted by the embedding
/// application; `processed_dir` is carried for that application and is not
/// consumed by the scan core itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory observed for newly created images.
    #[serde(default)]
    pub watch_dir: PathBuf,

    /// Destination directory for images the application has finished with.
    #[serde(default)]
    pub processed_dir: PathBuf,

    /// MRZ band enhancement parameters.
    #[serde(default)]
    pub enhance: EnhanceConfig,

    /// Folder watch dispatcher parameters.
    #[serde(default)]
    pub watcher: WatcherConfig,
}

impl ConfigValidator for PipelineConfig {
    fn validate(&self) -> Result<(), MrzError> {
        self.enhance.validate()?;
        self.watcher.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enhance_defaults_are_valid() {
        let config = EnhanceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.band_fraction, 0.25);
        assert_eq!(config.scale_factor, 3.0);
        assert_eq!(config.denoise_strength, 10.0);
        assert_eq!(config.denoise_template_window, 7);
        assert_eq!(config.denoise_search_window, 21);
        assert_eq!(config.clahe_grid, 8);
        assert_eq!(config.clahe_clip_limit, 2.0);
    }

    #[test]
    fn test_enhance_rejects_even_windows() {
        let config = EnhanceConfig {
            denoise_template_window: 6,
            ..EnhanceConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_watcher_rejects_zero_workers() {
        let config = WatcherConfig {
            max_workers: 0,
            ..WatcherConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: PipelineConfig = serde_json::from_str(
            r#"{
                "watch_dir": "/tmp/inbox",
                "watcher": { "settle_delay_ms": 250 }
            }"#,
        )
        .expect("partial config should deserialize");

        assert_eq!(config.watch_dir, PathBuf::from("/tmp/inbox"));
        assert_eq!(config.watcher.settle_delay_ms, 250);
        assert_eq!(config.watcher.max_workers, 4);
        assert_eq!(config.enhance.band_fraction, 0.25);
        assert!(config.validate().is_ok());
    }
}
