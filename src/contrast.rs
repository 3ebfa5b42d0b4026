//! WCAG contrast analysis between text and background roles.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;

use serde::{Serialize, Serializer, ser::SerializeMap};
use tracing::debug;

use crate::error::{Result, ThemeError};
use crate::scheme::{ColorPalette, HexColor, Role};

/// Minimum ratio rated [`Rating::Good`] (WCAG AAA, normal text).
pub const GOOD_RATIO: f64 = 7.0;
/// Minimum ratio rated [`Rating::Acceptable`] (WCAG AA, normal text).
pub const ACCEPTABLE_RATIO: f64 = 4.5;

/// Text roles and the labels used for them in reports.
pub const TEXT_ROLES: [(Role, &str); 2] = [
    (Role::GrayLight, "light text"),
    (Role::GrayDark, "dark text"),
];

pub const BACKGROUND_ROLES: [Role; 4] = [
    Role::Primary,
    Role::Secondary,
    Role::PrimaryLight,
    Role::PrimaryDark,
];

/// Anything that can hand out a color for a palette role.
pub trait RoleColors {
    fn role_color(&self, role: Role) -> Option<HexColor>;
}

impl RoleColors for ColorPalette {
    fn role_color(&self, role: Role) -> Option<HexColor> {
        self.get(role)
    }
}

impl<S: BuildHasher> RoleColors for HashMap<String, HexColor, S> {
    fn role_color(&self, role: Role) -> Option<HexColor> {
        self.get(role.name()).copied()
    }
}

impl RoleColors for BTreeMap<String, HexColor> {
    fn role_color(&self, role: Role) -> Option<HexColor> {
        self.get(role.name()).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rating {
    Good,
    Acceptable,
    Insufficient,
}

impl Rating {
    pub fn classify(ratio: f64) -> Self {
        if ratio >= GOOD_RATIO {
            Rating::Good
        } else if ratio >= ACCEPTABLE_RATIO {
            Rating::Acceptable
        } else {
            Rating::Insufficient
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rating::Good => "Good",
            Rating::Acceptable => "Acceptable",
            Rating::Insufficient => "Insufficient",
        };
        f.write_str(s)
    }
}

/// Contrast of one text role over one background role.
#[derive(Debug, Clone, PartialEq)]
pub struct ContrastEntry {
    pub text_role: Role,
    pub text_label: &'static str,
    pub background_role: Role,
    /// Full precision; use [`ContrastEntry::rounded_ratio`] for display.
    pub ratio: f64,
    pub rating: Rating,
}

impl ContrastEntry {
    /// e.g. `dark text on primary-light`
    pub fn label(&self) -> String {
        format!("{} on {}", self.text_label, self.background_role)
    }

    /// Ratio rounded to two decimals.
    pub fn rounded_ratio(&self) -> f64 {
        (self.ratio * 100.0).round() / 100.0
    }
}

#[derive(Serialize)]
struct EntryView {
    ratio: f64,
    rating: Rating,
}

/// All text/background pairs, text role major.
#[derive(Debug, Clone, PartialEq)]
pub struct ContrastReport {
    entries: Vec<ContrastEntry>,
}

impl ContrastReport {
    pub fn entries(&self) -> &[ContrastEntry] {
        &self.entries
    }

    pub fn get(&self, label: &str) -> Option<&ContrastEntry> {
        self.entries.iter().find(|e| e.label() == label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ContrastReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            let view = EntryView {
                ratio: entry.rounded_ratio(),
                rating: entry.rating,
            };
            map.serialize_entry(&entry.label(), &view)?;
        }
        map.end()
    }
}

/// Rate every text role against every background role.
pub fn analyze_contrast<P: RoleColors + ?Sized>(palette: &P) -> Result<ContrastReport> {
    let lookup = |role: Role| {
        palette
            .role_color(role)
            .ok_or(ThemeError::IncompletePalette { role })
    };

    let mut entries = Vec::with_capacity(TEXT_ROLES.len() * BACKGROUND_ROLES.len());
    for (text_role, text_label) in TEXT_ROLES {
        let text = lookup(text_role)?;
        for background_role in BACKGROUND_ROLES {
            let background = lookup(background_role)?;
            let ratio = contrast_ratio(text, background);
            entries.push(ContrastEntry {
                text_role,
                text_label,
                background_role,
                ratio,
                rating: Rating::classify(ratio),
            });
        }
    }

    debug!(
        pairs = entries.len(),
        insufficient = entries
            .iter()
            .filter(|e| e.rating == Rating::Insufficient)
            .count(),
        "analyzed contrast"
    );
    Ok(ContrastReport { entries })
}

/// WCAG relative luminance in [0, 1].
pub fn relative_luminance(color: HexColor) -> f64 {
    let [r, g, b] = color.channels().map(linearize);
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

fn linearize(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// WCAG contrast ratio; symmetric and always >= 1.
pub fn contrast_ratio(a: HexColor, b: HexColor) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}
