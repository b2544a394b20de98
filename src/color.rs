//! Color values shared by every pipeline stage.
//!
//! Computed styles arrive as arbitrary CSS color strings (`rgb(…)`,
//! `rgba(…)`, hex, named colors). Everything downstream of the synthesizer
//! works with [`Rgb`], whose canonical serialized form is the RGB triplet
//! `"r g b"` so it can be interpolated into `rgb(var(--x) / alpha)`.

use std::fmt;
use std::str::FromStr;

use palette::{FromColor, Hsl, Srgb};
use serde::{Deserialize, Serialize};

use crate::error::DtxError;

/// An opaque 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A parsed CSS color with its alpha channel (0.0–1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl Rgba {
    pub fn is_transparent(&self) -> bool {
        self.alpha <= 0.0
    }
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Serializes as three space-separated decimal channels, e.g. `"124 58 237"`.
    pub fn triplet(&self) -> String {
        format!("{} {} {}", self.r, self.g, self.b)
    }

    /// Parses the strict triplet form produced by [`Rgb::triplet`].
    pub fn from_triplet(input: &str) -> Result<Self, DtxError> {
        let parts: Vec<&str> = input.split(' ').collect();
        if parts.len() != 3 {
            return Err(DtxError::Color(format!(
                "expected three space-separated channels, got {:?}",
                input
            )));
        }
        let mut channels = [0u8; 3];
        for (slot, part) in channels.iter_mut().zip(&parts) {
            if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(DtxError::Color(format!("invalid channel {:?} in {:?}", part, input)));
            }
            *slot = part
                .parse::<u8>()
                .map_err(|_| DtxError::Color(format!("channel {:?} out of range in {:?}", part, input)))?;
        }
        Ok(Self::new(channels[0], channels[1], channels[2]))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn to_hsl(self) -> Hsl {
        let srgb: Srgb<f32> = Srgb::new(self.r, self.g, self.b).into_format();
        Hsl::from_color(srgb)
    }

    /// HSL lightness in `0.0..=1.0`.
    pub fn lightness(&self) -> f32 {
        self.to_hsl().lightness
    }

    /// HSL saturation in `0.0..=1.0`.
    pub fn saturation(&self) -> f32 {
        self.to_hsl().saturation
    }

    /// WCAG relative luminance.
    pub fn relative_luminance(&self) -> f64 {
        fn channel(value: u8) -> f64 {
            let c = value as f64 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * channel(self.r) + 0.7152 * channel(self.g) + 0.0722 * channel(self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.triplet())
    }
}

impl TryFrom<String> for Rgb {
    type Error = DtxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_triplet(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.triplet()
    }
}

impl FromStr for Rgb {
    type Err = DtxError;

    /// Accepts any CSS color syntax understood by [`parse_css_color`]; alpha is dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_css_color(s)
            .map(|c| c.rgb)
            .ok_or_else(|| DtxError::Color(format!("unrecognized CSS color {:?}", s)))
    }
}

/// Parses a CSS color string into RGBA.
///
/// Supports hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`), `rgb()`/`rgba()`
/// in comma or space syntax, `hsl()`/`hsla()`, named colors and
/// `transparent`. Returns `None` for anything else (`inherit`, `var(...)`,
/// gradients, ...).
pub fn parse_css_color(input: &str) -> Option<Rgba> {
    let value = input.trim().to_ascii_lowercase();
    if value.is_empty() {
        return None;
    }
    if value == "transparent" {
        return Some(Rgba {
            rgb: Rgb::new(0, 0, 0),
            alpha: 0.0,
        });
    }
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some((name, args)) = split_function(&value) {
        return match name {
            "rgb" | "rgba" => parse_rgb_args(args),
            "hsl" | "hsla" => parse_hsl_args(args),
            _ => None,
        };
    }
    palette::named::from_str(&value).map(|c: Srgb<u8>| Rgba {
        rgb: Rgb::new(c.red, c.green, c.blue),
        alpha: 1.0,
    })
}

fn split_function(value: &str) -> Option<(&str, &str)> {
    let open = value.find('(')?;
    let inner = value[open + 1..].strip_suffix(')')?;
    Some((value[..open].trim(), inner))
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let expand = |c: &str| u8::from_str_radix(&c.repeat(2), 16).ok();
    let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let (r, g, b, a) = match hex.len() {
        3 | 4 => (
            expand(&hex[0..1])?,
            expand(&hex[1..2])?,
            expand(&hex[2..3])?,
            if hex.len() == 4 { expand(&hex[3..4])? } else { 255 },
        ),
        6 | 8 => (
            pair(0)?,
            pair(2)?,
            pair(4)?,
            if hex.len() == 8 { pair(6)? } else { 255 },
        ),
        _ => return None,
    };
    Some(Rgba {
        rgb: Rgb::new(r, g, b),
        alpha: a as f32 / 255.0,
    })
}

/// Splits `"1, 2, 3 / 0.5"` or `"1 2 3 / 50%"` into channel tokens and an optional alpha token.
fn split_args(args: &str) -> (Vec<&str>, Option<&str>) {
    let (channels, alpha) = match args.split_once('/') {
        Some((c, a)) => (c, Some(a.trim())),
        None => (args, None),
    };
    let mut parts: Vec<&str> = channels
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    if alpha.is_none() && parts.len() == 4 {
        let a = parts.pop();
        return (parts, a);
    }
    (parts, alpha)
}

fn parse_number(token: &str) -> Option<f32> {
    token.parse::<f32>().ok().filter(|v| v.is_finite())
}

fn parse_alpha(token: Option<&str>) -> Option<f32> {
    match token {
        None => Some(1.0),
        Some(t) => {
            let value = match t.strip_suffix('%') {
                Some(pct) => parse_number(pct)? / 100.0,
                None => parse_number(t)?,
            };
            Some(value.clamp(0.0, 1.0))
        }
    }
}

fn parse_rgb_args(args: &str) -> Option<Rgba> {
    let (parts, alpha) = split_args(args);
    if parts.len() != 3 {
        return None;
    }
    let mut channels = [0u8; 3];
    for (slot, token) in channels.iter_mut().zip(parts) {
        let value = match token.strip_suffix('%') {
            Some(pct) => parse_number(pct)? * 2.55,
            None => parse_number(token)?,
        };
        *slot = value.round().clamp(0.0, 255.0) as u8;
    }
    Some(Rgba {
        rgb: Rgb::new(channels[0], channels[1], channels[2]),
        alpha: parse_alpha(alpha)?,
    })
}

fn parse_hsl_args(args: &str) -> Option<Rgba> {
    let (parts, alpha) = split_args(args);
    if parts.len() != 3 {
        return None;
    }
    let hue = parse_number(parts[0].trim_end_matches("deg"))?;
    let saturation = parse_number(parts[1].strip_suffix('%').unwrap_or(parts[1]))? / 100.0;
    let lightness = parse_number(parts[2].strip_suffix('%').unwrap_or(parts[2]))? / 100.0;
    let hsl: Hsl = Hsl::new(hue, saturation.clamp(0.0, 1.0), lightness.clamp(0.0, 1.0));
    let srgb: Srgb<f32> = Srgb::from_color(hsl);
    let srgb: Srgb<u8> = srgb.into_format();
    Some(Rgba {
        rgb: Rgb::new(srgb.red, srgb.green, srgb.blue),
        alpha: parse_alpha(alpha)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(input: &str) -> Rgb {
        parse_css_color(input)
            .unwrap_or_else(|| panic!("expected {input} to parse"))
            .rgb
    }

    #[test]
    fn parses_computed_style_rgb() {
        assert_eq!(rgb("rgb(17, 24, 39)"), Rgb::new(17, 24, 39));
        assert_eq!(rgb("rgb(17,24,39)"), Rgb::new(17, 24, 39));
        assert_eq!(rgb("rgb(17 24 39 / 50%)"), Rgb::new(17, 24, 39));
    }

    #[test]
    fn rgba_keeps_alpha() {
        let c = parse_css_color("rgba(0, 0, 0, 0)").unwrap();
        assert_eq!(c.rgb, Rgb::new(0, 0, 0));
        assert!(c.is_transparent());
        let half = parse_css_color("rgba(10, 20, 30, 0.5)").unwrap();
        assert!((half.alpha - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn parses_hex_forms() {
        assert_eq!(rgb("#7c3aed"), Rgb::new(124, 58, 237));
        assert_eq!(rgb("#22D3EE"), Rgb::new(34, 211, 238));
        assert_eq!(rgb("#fff"), Rgb::new(255, 255, 255));
        let short_alpha = parse_css_color("#0008").unwrap();
        assert!((short_alpha.alpha - 136.0 / 255.0).abs() < 1e-6);
        assert!(parse_css_color("#12345").is_none());
        assert!(parse_css_color("#zzzzzz").is_none());
    }

    #[test]
    fn parses_named_and_hsl() {
        assert_eq!(rgb("white"), Rgb::new(255, 255, 255));
        assert_eq!(rgb("CornflowerBlue"), Rgb::new(100, 149, 237));
        assert_eq!(rgb("hsl(0, 100%, 50%)"), Rgb::new(255, 0, 0));
        assert_eq!(rgb("hsla(240deg 100% 50% / 0.3)"), Rgb::new(0, 0, 255));
    }

    #[test]
    fn rejects_non_colors() {
        for value in ["", "inherit", "var(--bg)", "linear-gradient(red, blue)", "rgb(1, 2)"] {
            assert!(parse_css_color(value).is_none(), "{value} should not parse");
        }
    }

    #[test]
    fn triplet_round_trips_through_serde() {
        let color = Rgb::new(124, 58, 237);
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"124 58 237\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, color);
    }

    #[test]
    fn from_triplet_is_strict() {
        assert!(Rgb::from_triplet("1 2 3").is_ok());
        assert!(Rgb::from_triplet("256 0 0").is_err());
        assert!(Rgb::from_triplet("1  2 3").is_err());
        assert!(Rgb::from_triplet("1 2").is_err());
        assert!(Rgb::from_triplet("-1 2 3").is_err());
        assert!(Rgb::from_triplet("0001 2 3").is_err());
    }

    #[test]
    fn lightness_orders_dark_to_light() {
        let dark = rgb("rgb(17,24,39)");
        let brand = rgb("rgb(124,58,237)");
        let white = rgb("rgb(255,255,255)");
        assert!(dark.lightness() < brand.lightness());
        assert!(brand.lightness() < white.lightness());
        assert!((white.lightness() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn hex_output_is_lowercase_padded() {
        assert_eq!(Rgb::new(1, 2, 255).to_hex(), "#0102ff");
    }
}
