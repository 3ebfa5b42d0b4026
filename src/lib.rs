//! Derive an accessible UI color theme from the dominant colors of a logo.
//!
//! The pipeline has three pure stages, each consuming the previous stage's
//! result:
//!
//! 1. [`extract_dominant_colors`]: k-means over a fixed sampling grid.
//! 2. [`generate_palette`]: primary/secondary/accent/neutral roles via HSV.
//! 3. [`analyze_contrast`]: WCAG ratios of text roles over background roles.
//!
//! ```no_run
//! use logo_theme_wasm::{ThemeConfig, build_theme_from_bytes};
//! use logo_theme_wasm::stylesheet::{StylesheetFormat, render};
//!
//! let bytes = std::fs::read("logo.png")?;
//! let theme = build_theme_from_bytes(&bytes, &ThemeConfig::default())?;
//! println!("{}", render(&theme.palette, StylesheetFormat::Scss));
//! for entry in theme.contrast.entries() {
//!     println!("{}: {} - {}", entry.label(), entry.rounded_ratio(), entry.rating);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use image::DynamicImage;
use js_sys::{Array, Object, Reflect};
use tracing::info;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod contrast;
pub mod error;
pub mod extract;
pub mod load;
pub mod preview;
pub mod scheme;
pub mod stylesheet;

pub use config::{ExtractionConfig, PaletteConfig, ThemeConfig};
pub use contrast::{ContrastEntry, ContrastReport, Rating, RoleColors, analyze_contrast};
pub use error::{Result, ThemeError};
pub use extract::{DominantColor, cluster_samples, extract_dominant_colors};
pub use scheme::{ColorPalette, HexColor, Role, generate_palette};

/// Results of one full pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub dominant: Vec<DominantColor>,
    pub palette: ColorPalette,
    pub contrast: ContrastReport,
}

/// Run extraction, palette generation and contrast analysis on a decoded
/// image. Stops at the first failing stage.
pub fn build_theme(img: &DynamicImage, config: &ThemeConfig) -> Result<Theme> {
    let dominant = extract_dominant_colors(img, &config.extraction)?;
    let palette = generate_palette(&dominant, &config.palette)?;
    let contrast = analyze_contrast(&palette)?;

    info!(
        colors = dominant.len(),
        primary = %palette.primary,
        insufficient = contrast
            .entries()
            .iter()
            .filter(|e| e.rating == Rating::Insufficient)
            .count(),
        "built theme"
    );
    Ok(Theme {
        dominant,
        palette,
        contrast,
    })
}

/// Decode an encoded image (PNG, JPEG, ...) and build its theme.
pub fn build_theme_from_bytes(input: &[u8], config: &ThemeConfig) -> Result<Theme> {
    let img = load::decode_image(input)?;
    build_theme(&img, config)
}

/// Build a theme from encoded image bytes.
///
/// Returns a JS object with:
/// - `dominant`: hex strings, most frequent first
/// - `palette`: role name → hex string
/// - `scss`: the palette as SCSS variables
/// - `contrast`: array of `{ label, ratio, rating }`
#[wasm_bindgen]
pub fn design_system(input: Vec<u8>, n_colors: usize) -> std::result::Result<Object, JsValue> {
    let mut config = ThemeConfig::default();
    config.extraction.n_colors = n_colors;
    let theme =
        build_theme_from_bytes(&input, &config).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let dominant_js = Array::new();
    for d in &theme.dominant {
        dominant_js.push(&JsValue::from_str(&HexColor::from(d.color).to_string()));
    }

    let palette_js = Object::new();
    for (role, color) in theme.palette.entries() {
        Reflect::set(
            &palette_js,
            &JsValue::from_str(role.name()),
            &JsValue::from_str(&color.to_string()),
        )?;
    }

    let contrast_js = Array::new();
    for entry in theme.contrast.entries() {
        let item = Object::new();
        Reflect::set(&item, &JsValue::from_str("label"), &JsValue::from_str(&entry.label()))?;
        Reflect::set(&item, &JsValue::from_str("ratio"), &JsValue::from_f64(entry.rounded_ratio()))?;
        Reflect::set(
            &item,
            &JsValue::from_str("rating"),
            &JsValue::from_str(&entry.rating.to_string()),
        )?;
        contrast_js.push(&item);
    }

    let scss = stylesheet::render(&theme.palette, stylesheet::StylesheetFormat::Scss);

    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("dominant"), &dominant_js)?;
    Reflect::set(&result, &JsValue::from_str("palette"), &palette_js)?;
    Reflect::set(&result, &JsValue::from_str("scss"), &JsValue::from_str(&scss))?;
    Reflect::set(&result, &JsValue::from_str("contrast"), &contrast_js)?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_build_theme_pure_red() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, Rgb([255, 0, 0])));
        let theme = build_theme(&img, &ThemeConfig::default()).unwrap();

        assert_eq!(theme.dominant.len(), 1);
        assert_eq!(theme.palette.primary.to_string(), "#ff0000");
        assert_eq!(theme.palette.secondary.to_string(), "#00ffff");
        assert_eq!(theme.contrast.len(), 8);
    }

    #[test]
    fn test_build_theme_stops_on_bad_cluster_count() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([1, 2, 3])));
        let mut config = ThemeConfig::default();
        config.extraction.n_colors = 0;

        let err = build_theme(&img, &config).unwrap_err();
        assert!(matches!(err, ThemeError::InvalidClusterCount { .. }));
    }
}
