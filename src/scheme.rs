//! Semantic palette synthesis.
//!
//! The most frequent dominant color becomes `primary`; darker, lighter,
//! complementary and accent variants are derived from it in HSV, and up to
//! three further dominant colors are carried over as-is.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeMap};
use tracing::debug;

use crate::config::PaletteConfig;
use crate::error::{Result, ThemeError};
use crate::extract::DominantColor;

pub const GRAY_LIGHT: HexColor = HexColor::new(240, 240, 240);
pub const GRAY_MEDIUM: HexColor = HexColor::new(150, 150, 150);
pub const GRAY_DARK: HexColor = HexColor::new(50, 50, 50);

/// Number of `additional-N` slots.
pub const ADDITIONAL_SLOTS: usize = 3;

/// An opaque 8-bit sRGB color, displayed as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexColor(Srgb<u8>);

impl HexColor {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self(Srgb::new(red, green, blue))
    }

    pub fn rgb(&self) -> Srgb<u8> {
        self.0
    }

    pub fn channels(&self) -> [u8; 3] {
        [self.0.red, self.0.green, self.0.blue]
    }
}

impl From<Srgb<u8>> for HexColor {
    fn from(color: Srgb<u8>) -> Self {
        Self(color)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.channels();
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl FromStr for HexColor {
    type Err = ThemeError;

    /// Accepts `#rrggbb` or `rrggbb`, any case.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ThemeError::InvalidColor {
            value: s.to_string(),
        };
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Semantic slot of a palette color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Primary,
    PrimaryDark,
    PrimaryLight,
    Secondary,
    Accent,
    GrayLight,
    GrayMedium,
    GrayDark,
    Additional1,
    Additional2,
    Additional3,
}

impl Role {
    /// Roles every palette carries, in canonical order.
    pub const REQUIRED: [Role; 8] = [
        Role::Primary,
        Role::PrimaryDark,
        Role::PrimaryLight,
        Role::Secondary,
        Role::Accent,
        Role::GrayLight,
        Role::GrayMedium,
        Role::GrayDark,
    ];

    /// Optional slots for the dominant colors after the primary.
    pub const ADDITIONAL: [Role; ADDITIONAL_SLOTS] =
        [Role::Additional1, Role::Additional2, Role::Additional3];

    pub fn name(&self) -> &'static str {
        match self {
            Role::Primary => "primary",
            Role::PrimaryDark => "primary-dark",
            Role::PrimaryLight => "primary-light",
            Role::Secondary => "secondary",
            Role::Accent => "accent",
            Role::GrayLight => "gray-light",
            Role::GrayMedium => "gray-medium",
            Role::GrayDark => "gray-dark",
            Role::Additional1 => "additional-1",
            Role::Additional2 => "additional-2",
            Role::Additional3 => "additional-3",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The generated theme colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPalette {
    pub primary: HexColor,
    pub primary_dark: HexColor,
    pub primary_light: HexColor,
    pub secondary: HexColor,
    pub accent: HexColor,
    pub gray_light: HexColor,
    pub gray_medium: HexColor,
    pub gray_dark: HexColor,
    pub additional: [Option<HexColor>; ADDITIONAL_SLOTS],
}

impl ColorPalette {
    pub fn get(&self, role: Role) -> Option<HexColor> {
        match role {
            Role::Primary => Some(self.primary),
            Role::PrimaryDark => Some(self.primary_dark),
            Role::PrimaryLight => Some(self.primary_light),
            Role::Secondary => Some(self.secondary),
            Role::Accent => Some(self.accent),
            Role::GrayLight => Some(self.gray_light),
            Role::GrayMedium => Some(self.gray_medium),
            Role::GrayDark => Some(self.gray_dark),
            Role::Additional1 => self.additional[0],
            Role::Additional2 => self.additional[1],
            Role::Additional3 => self.additional[2],
        }
    }

    /// Present roles in canonical order: required roles, then filled
    /// additional slots.
    pub fn entries(&self) -> impl Iterator<Item = (Role, HexColor)> + '_ {
        Role::REQUIRED
            .into_iter()
            .chain(Role::ADDITIONAL)
            .filter_map(|role| self.get(role).map(|color| (role, color)))
    }
}

impl Serialize for ColorPalette {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (role, color) in self.entries() {
            map.serialize_entry(role.name(), &color)?;
        }
        map.end()
    }
}

/// Derive the full palette from dominant colors ordered by frequency.
pub fn generate_palette(dominant: &[DominantColor], config: &PaletteConfig) -> Result<ColorPalette> {
    let (primary, rest) = dominant.split_first().ok_or(ThemeError::EmptyDominantList)?;
    let base = PrimaryHsv::from_rgb(primary.color);

    let mut additional = [None; ADDITIONAL_SLOTS];
    for (slot, color) in additional.iter_mut().zip(rest) {
        *slot = Some(HexColor::from(color.color));
    }

    let palette = ColorPalette {
        primary: primary.color.into(),
        primary_dark: base.with_value_shift(-config.brightness_delta),
        primary_light: base.with_value_shift(config.brightness_delta),
        secondary: base.with_hue_shift(config.complementary_offset),
        accent: base.with_hue_shift(config.accent_offset),
        gray_light: GRAY_LIGHT,
        gray_medium: GRAY_MEDIUM,
        gray_dark: GRAY_DARK,
        additional,
    };
    debug!(
        primary = %palette.primary,
        secondary = %palette.secondary,
        additional = rest.len().min(ADDITIONAL_SLOTS),
        "generated palette"
    );
    Ok(palette)
}

/// HSV form of the primary color, every component in [0, 1].
#[derive(Debug, Clone, Copy)]
struct PrimaryHsv {
    hue: f64,
    saturation: f64,
    value: f64,
}

impl PrimaryHsv {
    fn from_rgb(color: Srgb<u8>) -> Self {
        let [r, g, b] = [color.red, color.green, color.blue].map(|c| f64::from(c) / 255.0);
        let [hue, saturation, value] = rgb_to_hsv(r, g, b);
        Self {
            hue,
            saturation,
            value,
        }
    }

    fn with_value_shift(&self, delta: f64) -> HexColor {
        to_hex(self.hue, self.saturation, (self.value + delta).clamp(0.0, 1.0))
    }

    /// Rotate the hue by `turns` of the color wheel.
    fn with_hue_shift(&self, turns: f64) -> HexColor {
        to_hex((self.hue + turns).rem_euclid(1.0), self.saturation, self.value)
    }
}

/// Hexcone RGB -> HSV with hue as a fraction of a turn.
///
/// Achromatic input (including black) has no defined hue and gets 0.
fn rgb_to_hsv(r: f64, g: f64, b: f64) -> [f64; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max == min {
        return [0.0, 0.0, max];
    }
    let range = max - min;
    let rc = (max - r) / range;
    let gc = (max - g) / range;
    let bc = (max - b) / range;
    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    [(h / 6.0).rem_euclid(1.0), range / max, max]
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [f64; 3] {
    if s == 0.0 {
        return [v, v, v];
    }
    let sector = (h * 6.0) as i64;
    let f = h * 6.0 - sector as f64;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match sector.rem_euclid(6) {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

/// Convert HSV back to 8-bit RGB, truncating each channel.
fn to_hex(hue: f64, saturation: f64, value: f64) -> HexColor {
    let [r, g, b] = hsv_to_rgb(hue, saturation, value).map(|c| (c * 255.0).clamp(0.0, 255.0) as u8);
    HexColor::new(r, g, b)
}
