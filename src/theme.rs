//! Page palette and CSS export.
//!
//! Block surfaces use tailwind-style class names from the dataset; the
//! palette here covers the page chrome and the fallback block colors.

pub mod tokens;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Parse `#rgb` or `#rrggbb`.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#')?;
        let byte = |i: usize| u8::from_str_radix(s.get(i..i + 2)?, 16).ok();
        match s.len() {
            6 => Some(Rgb(byte(0)?, byte(2)?, byte(4)?)),
            3 => {
                let nib = |i: usize| u8::from_str_radix(s.get(i..i + 1)?, 16).ok().map(|v| v * 17);
                Some(Rgb(nib(0)?, nib(1)?, nib(2)?))
            }
            _ => None,
        }
    }

    pub fn tuple(self) -> (u8, u8, u8) {
        (self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}

/// Light/dark page variant, from the profile's `theme` hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    #[default]
    Light,
    Dark,
}

impl Variant {
    pub fn from_hint(hint: Option<&str>) -> Self {
        match hint.map(str::to_ascii_lowercase).as_deref() {
            Some("dark") => Variant::Dark,
            _ => Variant::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Page background behind the grid.
    pub page_bg: Rgb,
    /// Default block surface.
    pub panel: Rgb,
    pub text: Rgb,
    pub text_dim: Rgb,
    /// Links and focus rings.
    pub accent: Rgb,
    /// Feed grid header badge.
    pub feed_badge: Rgb,
    pub ring: Rgb,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            page_bg: Rgb(0xf9, 0xfa, 0xfb),
            panel: Rgb(0xff, 0xff, 0xff),
            text: Rgb(0x11, 0x18, 0x27),
            text_dim: Rgb(0x4b, 0x55, 0x63),
            accent: Rgb(0x25, 0x63, 0xeb),
            feed_badge: Rgb(0xdc, 0x26, 0x26),
            ring: Rgb(0xe5, 0xe7, 0xeb),
        }
    }

    pub fn dark() -> Self {
        Self {
            page_bg: Rgb(0x0b, 0x0f, 0x19),
            panel: Rgb(0x11, 0x18, 0x27),
            text: Rgb(0xf9, 0xfa, 0xfb),
            text_dim: Rgb(0xd1, 0xd5, 0xdb),
            accent: Rgb(0x60, 0xa5, 0xfa),
            feed_badge: Rgb(0xf8, 0x71, 0x71),
            ring: Rgb(0x37, 0x41, 0x51),
        }
    }

    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Light => Self::light(),
            Variant::Dark => Self::dark(),
        }
    }

    /// Profile hints: `theme` selects the variant, `backgroundColor` (hex)
    /// overrides the page background.
    pub fn from_profile(theme_hint: Option<&str>, background: Option<&str>) -> Self {
        let mut theme = Self::for_variant(Variant::from_hint(theme_hint));
        if let Some(bg) = background.and_then(Rgb::parse_hex) {
            theme.page_bg = bg;
        }
        theme
    }

    /// `:root` custom properties for the page stylesheet.
    pub fn to_css_vars(&self) -> String {
        let t = tokens::tokens();
        let mut css = String::from(":root{");
        for (name, color) in [
            ("page-bg", self.page_bg),
            ("panel", self.panel),
            ("text", self.text),
            ("text-dim", self.text_dim),
            ("accent", self.accent),
            ("feed-badge", self.feed_badge),
            ("ring", self.ring),
        ] {
            css.push_str(&format!("--bento-{name}:{color};"));
        }
        css.push_str(&format!("--bento-sidebar:{}px;", t.layout.sidebar_px));
        for (i, radius) in t.visuals.radius_buckets.iter().enumerate() {
            css.push_str(&format!("--bento-radius-{}:{radius};", i + 1));
        }
        css.push('}');
        css
    }

    /// Log the text/panel pairs that matter for legibility.
    pub fn audit(&self) {
        tokens::audit_theme_for_contrast(self.text.tuple(), self.panel.tuple(), "text/panel");
        tokens::audit_theme_for_contrast(self.text_dim.tuple(), self.panel.tuple(), "text-dim/panel");
        tokens::audit_theme_for_contrast(self.text.tuple(), self.page_bg.tuple(), "text/page");
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}
