//! Tunable parameters for the theme pipeline.
//!
//! Every field has a default matching the reference tool, and the whole
//! structure (de)serializes with serde so a partial JSON file only needs the
//! values it overrides:
//!
//! ```
//! use logo_theme_wasm::ThemeConfig;
//!
//! let config: ThemeConfig =
//!     serde_json::from_str(r#"{ "extraction": { "n_colors": 6 } }"#).unwrap();
//! assert_eq!(config.extraction.n_colors, 6);
//! assert_eq!(config.extraction.seed, 42);
//! ```

use serde::{Deserialize, Serialize};

/// Default number of dominant colors to extract.
pub const DEFAULT_N_COLORS: usize = 5;
/// Default HSV value shift for the dark/light primary variants.
pub const DEFAULT_BRIGHTNESS_DELTA: f64 = 0.3;
/// Half a turn around the hue circle.
pub const DEFAULT_COMPLEMENTARY_OFFSET: f64 = 0.5;
/// A quarter turn around the hue circle.
pub const DEFAULT_ACCENT_OFFSET: f64 = 0.25;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub extraction: ExtractionConfig,
    pub palette: PaletteConfig,
}

/// Clustering parameters for the dominant color extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Number of clusters (k)
    pub n_colors: usize,
    /// Side of the square sampling grid the image is resized to
    pub sample_size: u32,
    /// Skip samples whose alpha is zero
    pub ignore_transparent: bool,
    /// Seed of the first k-means run; run `i` uses `seed + i`
    pub seed: u64,
    /// Number of independently seeded k-means runs
    pub runs: usize,
    /// Iteration cap per run
    pub max_iterations: usize,
    /// Convergence threshold on centroid movement
    pub converge: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            n_colors: DEFAULT_N_COLORS,
            sample_size: 100,
            ignore_transparent: true,
            seed: 42,
            runs: 10,
            max_iterations: 300,
            converge: 1e-4,
        }
    }
}

/// Hue and brightness transforms used to derive the palette.
///
/// Offsets are fractions of a full hue turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub brightness_delta: f64,
    pub complementary_offset: f64,
    pub accent_offset: f64,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            brightness_delta: DEFAULT_BRIGHTNESS_DELTA,
            complementary_offset: DEFAULT_COMPLEMENTARY_OFFSET,
            accent_offset: DEFAULT_ACCENT_OFFSET,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ThemeConfig::default();
        assert_eq!(config.extraction.n_colors, 5);
        assert_eq!(config.extraction.sample_size, 100);
        assert_eq!(config.extraction.runs, 10);
        assert_eq!(config.palette.brightness_delta, 0.3);
        assert_eq!(config.palette.complementary_offset, 0.5);
        assert_eq!(config.palette.accent_offset, 0.25);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "palette": { "brightness_delta": 0.2 } }"#;
        let config: ThemeConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.palette.brightness_delta, 0.2);
        assert_eq!(config.palette.accent_offset, 0.25);
        assert_eq!(config.extraction, ExtractionConfig::default());
    }

    #[test]
    fn test_config_serialization() {
        let config = ThemeConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: ThemeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
