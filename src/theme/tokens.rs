//! Design tokens shared across targets. No IO, no platform deps.
//! Units: CSS px unless noted.

/// One grid variant: column count, row track height, gap.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridSpec {
    pub columns: u32,
    pub row_height_px: u32,
    pub gap_px: u32,
}

impl GridSpec {
    pub fn to_css(&self) -> String {
        format!(
            "display:grid;grid-template-columns:repeat({}, minmax(0, 1fr));grid-auto-rows:{}px;gap:{}px;",
            self.columns, self.row_height_px, self.gap_px
        )
    }
}

#[derive(Copy, Clone, Debug)]
pub struct LayoutTokens {
    pub desktop: GridSpec,
    pub narrow: GridSpec,
    /// Profile sidebar width on desktop.
    pub sidebar_px: u32,
    /// Width at which the desktop grid takes over.
    pub breakpoint_px: u32,
}

/// Corner radius per `min(colSpan, rowSpan)` bucket: 1, 2, 3, 4+.
pub const RADIUS_BUCKETS: [&str; 4] = ["0.5rem", "0.625rem", "0.75rem", "0.875rem"];

#[derive(Copy, Clone, Debug)]
pub struct VisualTokens {
    pub radius_buckets: [&'static str; 4],
    /// Default tailwind background class for blocks without a color.
    pub block_color_class: &'static str,
    pub text_color_class: &'static str,
    /// Glare overlay gradient, positioned by the tilt custom properties.
    pub glare_gradient: &'static str,
    /// Bottom-up scrim under titles laid over imagery.
    pub overlay_gradient: &'static str,
    /// Diameter of the rich-preview play button.
    pub play_button_px: u32,
    pub icon_size_px: u32,
}

#[derive(Copy, Clone, Debug)]
pub struct Tokens {
    pub layout: LayoutTokens,
    pub visuals: VisualTokens,
}

impl Default for Tokens {
    fn default() -> Self {
        Self {
            layout: LayoutTokens {
                desktop: GridSpec {
                    columns: 9,
                    row_height_px: 64,
                    gap_px: 8,
                },
                narrow: GridSpec {
                    columns: crate::ui_core::layout::NARROW_COLUMNS,
                    row_height_px: 80,
                    gap_px: 12,
                },
                sidebar_px: 420,
                breakpoint_px: crate::ui_core::policy::DESKTOP_MIN_WIDTH_PX,
            },
            visuals: VisualTokens {
                radius_buckets: RADIUS_BUCKETS,
                block_color_class: "bg-white",
                text_color_class: "text-gray-900",
                glare_gradient: "radial-gradient(circle at var(--glare-x, 50%) var(--glare-y, 50%), rgba(255,255,255,0.25) 0%, transparent 60%)",
                overlay_gradient: "linear-gradient(to top, rgba(0,0,0,0.7) 0%, rgba(0,0,0,0.2) 50%, transparent 100%)",
                play_button_px: 56,
                icon_size_px: 24,
            },
        }
    }
}

/// Global accessor used by both targets.
#[inline]
pub fn tokens() -> Tokens {
    Tokens::default()
}

/// A11y audit (non-fatal): log when a pair falls below WCAG AA.
pub fn audit_theme_for_contrast(rgb_fg: (u8, u8, u8), rgb_bg: (u8, u8, u8), label: &str) -> f32 {
    fn lum(c: (u8, u8, u8)) -> f32 {
        let to_l = |x: u8| {
            let xf = (x as f32) / 255.0;
            if xf <= 0.03928 {
                xf / 12.92
            } else {
                ((xf + 0.055) / 1.055).powf(2.4)
            }
        };
        let (r, g, b) = c;
        0.2126 * to_l(r) + 0.7152 * to_l(g) + 0.0722 * to_l(b)
    }
    let l1 = lum(rgb_fg);
    let l2 = lum(rgb_bg);
    let (hi, lo) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
    let ratio = (hi + 0.05) / (lo + 0.05);
    if ratio < 4.5 {
        log::warn!("[theme] {label} contrast {ratio:.2}:1 below WCAG AA 4.5:1");
    } else {
        log::debug!("[theme] {label} contrast {ratio:.2}:1");
    }
    ratio
}
