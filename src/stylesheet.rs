//! Stylesheet variable export.

use crate::scheme::ColorPalette;

const HEADER: &str = "// Auto-adaptive design system - generated colors";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StylesheetFormat {
    /// `$color-primary: #rrggbb;`
    #[default]
    Scss,
    /// `--color-primary: #rrggbb;` inside `:root`
    Css,
}

impl StylesheetFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            StylesheetFormat::Scss => "scss",
            StylesheetFormat::Css => "css",
        }
    }
}

/// Render one variable per palette entry, in canonical role order.
pub fn render(palette: &ColorPalette, format: StylesheetFormat) -> String {
    let (open, prefix, close) = match format {
        StylesheetFormat::Scss => ("", "$", ""),
        StylesheetFormat::Css => (":root {\n", "  --", "}\n"),
    };
    let vars: String = palette
        .entries()
        .map(|(role, color)| format!("{prefix}color-{role}: {color};\n"))
        .collect();

    let mut out = format!("{HEADER}\n\n");
    out.push_str(open);
    out.push_str(&vars);
    out.push_str(close);
    out
}
