//! WCAG contrast audit of a token set.
//!
//! The audit only records ratios; it never fails a build.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::tokens::DesignTokenSet;
use crate::Result;

/// WCAG AA minimum contrast for body text.
pub const AA_BODY_TEXT: f64 = 4.5;

pub const AUDIT_NOTE: &str = "Ratios of 4.5 or higher pass WCAG AA for body text";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub pairs: BTreeMap<String, f64>,
    pub notes: String,
}

impl AuditReport {
    /// Pair names whose ratio is below [`AA_BODY_TEXT`].
    pub fn failing_pairs(&self) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(_, ratio)| **ratio < AA_BODY_TEXT)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// `(L1 + 0.05) / (L2 + 0.05)` with `L1` the lighter luminance.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = a.relative_luminance();
    let lb = b.relative_luminance();
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Contrast between two hex colors (`#rrggbb` or `#rgb`).
pub fn contrast_ratio_hex(a: &str, b: &str) -> Result<f64> {
    Ok(contrast_ratio(a.parse()?, b.parse()?))
}

/// Ratios of fg, brand and accent against bg, each compared in hex form.
pub fn audit(tokens: &DesignTokenSet) -> Result<AuditReport> {
    let bg = tokens.bg.to_hex();
    let mut pairs = BTreeMap::new();
    for (name, color) in [
        ("fg_on_bg", tokens.fg),
        ("brand_on_bg", tokens.brand),
        ("accent_on_bg", tokens.accent),
    ] {
        pairs.insert(name.to_string(), contrast_ratio_hex(&color.to_hex(), &bg)?);
    }

    Ok(AuditReport {
        pairs,
        notes: AUDIT_NOTE.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{DEFAULT_ACCENT, DEFAULT_BRAND, DEFAULT_FG};

    fn tokens(bg: Rgb, fg: Rgb) -> DesignTokenSet {
        DesignTokenSet {
            bg,
            fg,
            brand: DEFAULT_BRAND,
            accent: DEFAULT_ACCENT,
            radius: "12px".into(),
            font_sans: "Inter".into(),
            space_base: "1rem".into(),
            shadow_card: "none".into(),
        }
    }

    #[test]
    fn black_on_white_is_twenty_one() {
        let ratio = contrast_ratio(Rgb::new(0, 0, 0), Rgb::new(255, 255, 255));
        assert!((ratio - 21.0).abs() < 1e-9, "got {ratio}");
    }

    #[test]
    fn ratio_is_symmetric() {
        let pairs = [
            (Rgb::new(17, 24, 39), Rgb::new(255, 255, 255)),
            (Rgb::new(124, 58, 237), Rgb::new(34, 211, 238)),
            (Rgb::new(1, 2, 3), Rgb::new(250, 0, 128)),
        ];
        for (a, b) in pairs {
            assert_eq!(contrast_ratio(a, b), contrast_ratio(b, a));
        }
    }

    #[test]
    fn ratio_against_self_is_one() {
        for c in [Rgb::new(0, 0, 0), Rgb::new(124, 58, 237), Rgb::new(255, 255, 255)] {
            assert_eq!(contrast_ratio(c, c), 1.0);
        }
    }

    #[test]
    fn hex_helper_matches_rgb() {
        let via_hex = contrast_ratio_hex("#111827", "#ffffff").unwrap();
        assert_eq!(via_hex, contrast_ratio(DEFAULT_FG, Rgb::new(255, 255, 255)));
        assert!(contrast_ratio_hex("#nothex", "#fff").is_err());
    }

    #[test]
    fn audit_reports_three_pairs_against_bg() {
        let report = audit(&tokens(Rgb::new(255, 255, 255), DEFAULT_FG)).unwrap();
        assert_eq!(report.pairs.len(), 3);
        assert!(report.pairs["fg_on_bg"] > 17.0);
        assert!(report.pairs.contains_key("brand_on_bg"));
        assert!(report.pairs.contains_key("accent_on_bg"));
        assert_eq!(report.notes, AUDIT_NOTE);
        // Cyan accent on white is well below AA.
        assert_eq!(report.failing_pairs(), vec!["accent_on_bg"]);
    }

    #[test]
    fn audit_matches_direct_rgb_ratios() {
        let set = tokens(Rgb::new(15, 23, 42), Rgb::new(248, 250, 252));
        let report = audit(&set).unwrap();
        assert_eq!(report.pairs["fg_on_bg"], contrast_ratio(set.fg, set.bg));
        assert_eq!(report.pairs["brand_on_bg"], contrast_ratio(set.brand, set.bg));
        assert_eq!(report.pairs["accent_on_bg"], contrast_ratio(set.accent, set.bg));
    }

    #[test]
    fn report_serializes_flat_pairs() {
        let report = audit(&tokens(Rgb::new(0, 0, 0), Rgb::new(255, 255, 255))).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        let ratio = json["pairs"]["fg_on_bg"].as_f64().unwrap();
        assert!((ratio - 21.0).abs() < 1e-9);
        assert!(json["notes"].is_string());
    }
}
