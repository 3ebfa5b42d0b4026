//! Swatch preview image of a palette.

use image::{ImageFormat, ImageResult, Rgba, RgbaImage};

use crate::scheme::{ColorPalette, HexColor};

const SWATCH_WIDTH: u32 = 80;
const SWATCH_GAP: u32 = 10;
const SWATCH_HEIGHT: u32 = 240;
const LABEL_BAND: u32 = 24;

/// Channel sum below which a swatch gets a white label band.
const DARK_SWATCH_SUM: u32 = 380;

/// One bar per palette entry, left to right in canonical order, on a
/// transparent background. The bottom band of each bar is white on dark
/// swatches and black on light ones.
pub fn render_swatches(palette: &ColorPalette) -> RgbaImage {
    let colors: Vec<HexColor> = palette.entries().map(|(_, color)| color).collect();
    let count = colors.len() as u32;
    let width = count * SWATCH_WIDTH + count.saturating_sub(1) * SWATCH_GAP;

    RgbaImage::from_fn(width, SWATCH_HEIGHT, |x, y| {
        let slot = x / (SWATCH_WIDTH + SWATCH_GAP);
        if x % (SWATCH_WIDTH + SWATCH_GAP) >= SWATCH_WIDTH {
            return Rgba([0, 0, 0, 0]);
        }
        let color = colors[slot as usize];
        if y >= SWATCH_HEIGHT - LABEL_BAND {
            label_color(color)
        } else {
            let [r, g, b] = color.channels();
            Rgba([r, g, b, 255])
        }
    })
}

fn label_color(color: HexColor) -> Rgba<u8> {
    let sum: u32 = color.channels().iter().map(|&c| u32::from(c)).sum();
    if sum < DARK_SWATCH_SUM {
        Rgba([255, 255, 255, 255])
    } else {
        Rgba([0, 0, 0, 255])
    }
}

pub fn encode_png(img: &RgbaImage) -> ImageResult<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut cursor = std::io::Cursor::new(&mut buf);
        img.write_to(&mut cursor, ImageFormat::Png)?;
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PaletteConfig;
    use crate::extract::DominantColor;
    use crate::scheme::generate_palette;
    use palette::Srgb;

    fn red_palette() -> ColorPalette {
        let dominant = [DominantColor {
            color: Srgb::new(255, 0, 0),
            count: 1,
        }];
        generate_palette(&dominant, &PaletteConfig::default()).unwrap()
    }

    #[test]
    fn test_layout() {
        let img = render_swatches(&red_palette());
        assert_eq!(img.width(), 8 * SWATCH_WIDTH + 7 * SWATCH_GAP);
        assert_eq!(img.height(), SWATCH_HEIGHT);

        assert_eq!(*img.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        // gap after the first bar
        assert_eq!(img.get_pixel(SWATCH_WIDTH, 0)[3], 0);
        // fourth bar is the complementary cyan
        let x = 3 * (SWATCH_WIDTH + SWATCH_GAP);
        assert_eq!(*img.get_pixel(x, 0), Rgba([0, 255, 255, 255]));
    }

    #[test]
    fn test_label_band_contrast() {
        let img = render_swatches(&red_palette());
        let y = SWATCH_HEIGHT - 1;
        // red: sum 255, dark
        assert_eq!(*img.get_pixel(0, y), Rgba([255, 255, 255, 255]));
        // cyan: sum 510, light
        let x = 3 * (SWATCH_WIDTH + SWATCH_GAP);
        assert_eq!(*img.get_pixel(x, y), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_encode_png_signature() {
        let png = encode_png(&render_swatches(&red_palette())).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
