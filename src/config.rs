//! Extraction configuration
//!
//! All tunables of the pipeline with their defaults. A config can be loaded
//! from a YAML or JSON file; missing keys fall back to the defaults.
//!
//! ```yaml
//! slice_radius: 50
//! max_freq_bins: 8000
//! min_separation: 250
//! formant_count: 5
//! smoothing_window: 20
//! smoothing_shape: hanning
//! line_policy: skip
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::annotation::LinePolicy;
use crate::window::WindowShape;
use crate::{FormantError, Result};

/// Samples on either side of the vowel center fed to the FFT
pub const DEFAULT_SLICE_RADIUS: usize = 50;
/// Largest accepted `slice_radius` (about 17 minutes either side at 16 kHz)
pub const MAX_SLICE_RADIUS: usize = 1 << 24;
/// Assumed maximum frequency; TIMIT is sampled at 16 kHz
pub const DEFAULT_MAX_FREQ_BINS: usize = 8000;
/// Minimum distance in Hz-bins between two formants
pub const DEFAULT_MIN_SEPARATION: usize = 250;
pub const DEFAULT_FORMANT_COUNT: usize = 5;
pub const DEFAULT_SMOOTHING_WINDOW: usize = 20;
pub const DEFAULT_SAMPLE_RATE: u32 = 16000;

/// Tunables of the formant extraction pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractionConfig {
    pub slice_radius: usize,
    pub max_freq_bins: usize,
    pub min_separation: usize,
    pub formant_count: usize,
    pub smoothing_window: usize,
    pub smoothing_shape: WindowShape,
    /// Expected sample rate; other rates are processed but logged
    pub sample_rate: u32,
    pub line_policy: LinePolicy,
    /// Worker threads; 0 means one per CPU
    pub num_threads: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            slice_radius: DEFAULT_SLICE_RADIUS,
            max_freq_bins: DEFAULT_MAX_FREQ_BINS,
            min_separation: DEFAULT_MIN_SEPARATION,
            formant_count: DEFAULT_FORMANT_COUNT,
            smoothing_window: DEFAULT_SMOOTHING_WINDOW,
            smoothing_shape: WindowShape::Hanning,
            sample_rate: DEFAULT_SAMPLE_RATE,
            line_policy: LinePolicy::Skip,
            num_threads: 0,
        }
    }
}

impl ExtractionConfig {
    /// Load a config from a `.yaml`/`.yml` or `.json` file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FormantError::NotFound(path.to_path_buf()),
            _ => FormantError::Io(e),
        })?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let config: Self = match ext.as_str() {
            "json" => serde_json::from_str(&data)
                .map_err(|e| FormantError::Config(format!("parse {}: {}", path.display(), e)))?,
            "yaml" | "yml" => serde_yaml::from_str(&data)
                .map_err(|e| FormantError::Config(format!("parse {}: {}", path.display(), e)))?,
            _ => {
                return Err(FormantError::InvalidParameter(format!(
                    "unsupported config extension: {}",
                    ext
                )))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Check that the parameters describe a runnable pipeline
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("slice_radius", self.slice_radius),
            ("max_freq_bins", self.max_freq_bins),
            ("formant_count", self.formant_count),
            ("smoothing_window", self.smoothing_window),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(FormantError::InvalidParameter(format!(
                    "{} must be positive",
                    name
                )));
            }
        }

        if self.slice_radius > MAX_SLICE_RADIUS {
            return Err(FormantError::InvalidParameter(format!(
                "slice_radius ({}) exceeds {}",
                self.slice_radius, MAX_SLICE_RADIUS
            )));
        }
        if self.smoothing_window > self.max_freq_bins {
            return Err(FormantError::InvalidParameter(format!(
                "smoothing_window ({}) exceeds max_freq_bins ({})",
                self.smoothing_window, self.max_freq_bins
            )));
        }
        if self.sample_rate == 0 {
            return Err(FormantError::InvalidParameter(
                "sample_rate must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ExtractionConfig::default();
        assert_eq!(config.slice_radius, 50);
        assert_eq!(config.max_freq_bins, 8000);
        assert_eq!(config.min_separation, 250);
        assert_eq!(config.formant_count, 5);
        assert_eq!(config.smoothing_window, 20);
        assert_eq!(config.smoothing_shape, WindowShape::Hanning);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_partial_override() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "slice_radius: 128").unwrap();
        writeln!(file, "smoothing_shape: blackman").unwrap();
        writeln!(file, "line_policy: fail").unwrap();

        let config = ExtractionConfig::from_file(file.path()).unwrap();
        assert_eq!(config.slice_radius, 128);
        assert_eq!(config.smoothing_shape, WindowShape::Blackman);
        assert_eq!(config.line_policy, LinePolicy::Fail);
        assert_eq!(config.min_separation, 250);
    }

    #[test]
    fn test_json_config() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"min_separation": 100, "smoothing_shape": "flat"}}"#).unwrap();

        let config = ExtractionConfig::from_file(file.path()).unwrap();
        assert_eq!(config.min_separation, 100);
        assert_eq!(config.smoothing_shape, WindowShape::Rectangular);
    }

    #[test]
    fn test_rejects_unknown_keys_and_extensions() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "slice_radios: 10").unwrap();
        assert!(matches!(
            ExtractionConfig::from_file(file.path()),
            Err(FormantError::Config(_))
        ));

        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        assert!(matches!(
            ExtractionConfig::from_file(file.path()),
            Err(FormantError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_validation() {
        let config = ExtractionConfig {
            formant_count: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ExtractionConfig {
            smoothing_window: 100,
            max_freq_bins: 50,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_slice_radius_cap() {
        let config = ExtractionConfig {
            slice_radius: MAX_SLICE_RADIUS,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = ExtractionConfig {
            slice_radius: isize::MAX as usize,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(FormantError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ExtractionConfig::from_file(dir.path().join("config.yaml")),
            Err(FormantError::NotFound(_))
        ));
    }
}
