//! Design token synthesis.
//!
//! Reduces a [`RawSnapshot`] and a screenshot [`Palette`] to one
//! [`DesignTokenSet`]. Every field always resolves: a missing upstream
//! signal falls back to the constants below.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capture::RawSnapshot;
use crate::color::{parse_css_color, Rgb};
use crate::config::SynthesisConfig;
use crate::swatch::Palette;

pub const DEFAULT_BRAND: Rgb = Rgb::new(0x7c, 0x3a, 0xed);
pub const DEFAULT_ACCENT: Rgb = Rgb::new(0x22, 0xd3, 0xee);
pub const DEFAULT_BG: Rgb = Rgb::new(0xff, 0xff, 0xff);
pub const DEFAULT_FG: Rgb = Rgb::new(0x11, 0x18, 0x27);
pub const DEFAULT_RADIUS_PX: f64 = 12.0;
pub const MIN_PREFERRED_RADIUS_PX: f64 = 8.0;
pub const DEFAULT_FONT_SANS: &str =
    "\"Noto Sans KR\", ui-sans-serif, system-ui, -apple-system, sans-serif";
pub const SPACE_BASE: &str = "1rem";
pub const SHADOW_CARD: &str = "0 4px 24px rgba(0,0,0,0.08)";

const GENERIC_FAMILIES: [&str; 3] = ["sans-serif", "serif", "monospace"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignTokenSet {
    pub bg: Rgb,
    pub fg: Rgb,
    pub brand: Rgb,
    pub accent: Rgb,
    pub radius: String,
    pub font_sans: String,
    pub space_base: String,
    pub shadow_card: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeMeta {
    pub source: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// The persisted `data/themes/latest.json` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeDocument {
    pub meta: ThemeMeta,
    pub tokens: DesignTokenSet,
}

impl ThemeDocument {
    pub fn new(snapshot: &RawSnapshot, tokens: DesignTokenSet) -> Self {
        Self {
            meta: ThemeMeta {
                source: snapshot.url.clone(),
                title: snapshot.title.clone(),
                created_at: Utc::now(),
            },
            tokens,
        }
    }
}

pub fn synthesize(snapshot: &RawSnapshot, palette: &Palette, cfg: &SynthesisConfig) -> DesignTokenSet {
    let brand = palette.vibrant.map(|s| s.rgb).unwrap_or(DEFAULT_BRAND);
    let accent = palette
        .light_vibrant
        .or(palette.muted)
        .map(|s| s.rgb)
        .unwrap_or(DEFAULT_ACCENT);
    let (bg, fg) = pick_bg_fg(&snapshot.colors, cfg.skip_transparent_colors);

    let tokens = DesignTokenSet {
        bg,
        fg,
        brand,
        accent,
        radius: pick_radius(&snapshot.radii),
        font_sans: pick_font(&snapshot.fonts),
        space_base: SPACE_BASE.to_string(),
        shadow_card: SHADOW_CARD.to_string(),
    };
    debug!(?tokens, "synthesized tokens");
    tokens
}

/// Darkest sampled color becomes `bg`, lightest becomes `fg`.
///
/// Open question: on light pages with strong dark accents this picks a dark
/// background. Kept as-is; see DESIGN.md.
pub fn pick_bg_fg(colors: &[String], skip_transparent: bool) -> (Rgb, Rgb) {
    let mut parsed: Vec<(Rgb, f32)> = colors
        .iter()
        .filter_map(|c| parse_css_color(c))
        .filter(|c| !(skip_transparent && c.is_transparent()))
        .map(|c| (c.rgb, c.rgb.lightness()))
        .collect();
    parsed.sort_by(|a, b| a.1.total_cmp(&b.1));

    let bg = parsed.first().map(|(c, _)| *c).unwrap_or(DEFAULT_BG);
    let fg = parsed.last().map(|(c, _)| *c).unwrap_or(DEFAULT_FG);
    (bg, fg)
}

/// Smallest radius ≥ 8px, else the largest observed, else 12px.
pub fn pick_radius(radii: &[String]) -> String {
    let mut values: Vec<f64> = radii.iter().filter_map(|r| parse_leading_number(r)).collect();
    values.sort_by(f64::total_cmp);

    let chosen = values
        .iter()
        .copied()
        .find(|v| *v >= MIN_PREFERRED_RADIUS_PX)
        .or_else(|| values.last().copied())
        .unwrap_or(DEFAULT_RADIUS_PX);
    format!("{}px", chosen)
}

/// First font-family stack that names at least one non-generic family.
pub fn pick_font(fonts: &[String]) -> String {
    fonts
        .iter()
        .map(|f| f.trim())
        .find(|f| !f.is_empty() && !is_generic_stack(f))
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_FONT_SANS.to_string())
}

fn is_generic_stack(stack: &str) -> bool {
    stack.split(',').all(|family| {
        let name = family.trim().trim_matches(|c| c == '"' || c == '\'');
        GENERIC_FAMILIES
            .iter()
            .any(|generic| name.eq_ignore_ascii_case(generic))
    })
}

/// Leading decimal number of a CSS value (`"10px"` → 10, `"50%"` → 50, `"auto"` → None).
fn parse_leading_number(value: &str) -> Option<f64> {
    let s = value.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > digits_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            has_digits = true;
            end = frac_end;
        }
    }
    if !has_digits {
        return None;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Empty dark-theme block appended after `:root` for hand-written overrides.
pub const DARK_THEME_PLACEHOLDER: &str =
    "[data-theme=\"dark\"] {\n  /* dark token overrides go here */\n}\n";

/// Renders the custom-property block persisted as `styles/tokens.css`.
pub fn tokens_css(tokens: &DesignTokenSet) -> String {
    format!(
        ":root {{\n  --bg: {};\n  --fg: {};\n  --brand: {};\n  --accent: {};\n  --radius: {};\n  --font-sans: {};\n  --space-base: {};\n  --shadow-card: {};\n}}\n\n{}",
        tokens.bg,
        tokens.fg,
        tokens.brand,
        tokens.accent,
        tokens.radius,
        tokens.font_sans,
        tokens.space_base,
        tokens.shadow_card,
        DARK_THEME_PLACEHOLDER,
    )
}
