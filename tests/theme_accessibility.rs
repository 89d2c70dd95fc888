//! WCAG AA compliance tests for page palette contrast ratios
//!
//! Validates both variants against accessibility standards:
//! - Text/panel: ≥4.5:1 (WCAG AA for normal text)
//! - Accent and feed badge on panel: ≥3.0:1 (WCAG AA for UI components)

use bentogrid::theme::{tokens::audit_theme_for_contrast, Rgb, Theme};

/// Calculate relative luminance for sRGB color (WCAG formula)
fn relative_luminance(Rgb(r, g, b): Rgb) -> f64 {
    let channel = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b)
}

/// Calculate contrast ratio between two colors (WCAG formula)
fn contrast_ratio(fg: Rgb, bg: Rgb) -> f64 {
    let l1 = relative_luminance(fg);
    let l2 = relative_luminance(bg);

    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

fn variants() -> [(&'static str, Theme); 2] {
    [("light", Theme::light()), ("dark", Theme::dark())]
}

#[test]
fn text_on_panel_meets_wcag_aa() {
    for (name, theme) in variants() {
        let contrast = contrast_ratio(theme.text, theme.panel);
        assert!(
            contrast >= 4.5,
            "{name}: text/panel contrast {:.2}:1 fails WCAG AA (need ≥4.5:1)",
            contrast
        );
    }
}

#[test]
fn text_dim_on_panel_meets_wcag_aa() {
    for (name, theme) in variants() {
        let contrast = contrast_ratio(theme.text_dim, theme.panel);
        assert!(
            contrast >= 4.5,
            "{name}: text-dim/panel contrast {:.2}:1 fails WCAG AA (need ≥4.5:1)",
            contrast
        );
    }
}

#[test]
fn accent_and_badge_meet_ui_component_contrast() {
    for (name, theme) in variants() {
        let accent = contrast_ratio(theme.accent, theme.panel);
        assert!(accent >= 3.0, "{name}: accent/panel {:.2}:1 (need ≥3.0:1)", accent);
        let badge = contrast_ratio(theme.feed_badge, theme.panel);
        assert!(badge >= 3.0, "{name}: feed-badge/panel {:.2}:1 (need ≥3.0:1)", badge);
    }
}

#[test]
fn audit_agrees_with_wcag_formula() {
    let theme = Theme::default();
    let audited = audit_theme_for_contrast(theme.text.tuple(), theme.panel.tuple(), "text/panel");
    let expected = contrast_ratio(theme.text, theme.panel);
    assert!((audited as f64 - expected).abs() < 0.05, "audit {audited} vs {expected}");
}

#[test]
fn profile_background_overrides_page_only() {
    let theme = Theme::from_profile(Some("dark"), Some("#123456"));
    assert_eq!(theme.page_bg, Rgb(0x12, 0x34, 0x56));
    assert_eq!(theme.panel, Theme::dark().panel);

    let fallback = Theme::from_profile(None, Some("not-a-color"));
    assert_eq!(fallback, Theme::light());
}
