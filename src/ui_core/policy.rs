use serde::{Deserialize, Serialize};

/// Viewport class shared by targets. Web picks it from the window width;
/// the native renderer takes it from config.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportClass {
    Desktop,
    Narrow,
}

impl Default for ViewportClass {
    fn default() -> Self {
        ViewportClass::Desktop
    }
}

/// Widths at or above this are desktop (the `lg` breakpoint).
pub const DESKTOP_MIN_WIDTH_PX: u32 = 1024;

impl ViewportClass {
    pub fn from_width(width_px: u32) -> Self {
        if width_px >= DESKTOP_MIN_WIDTH_PX {
            ViewportClass::Desktop
        } else {
            ViewportClass::Narrow
        }
    }
}

impl std::str::FromStr for ViewportClass {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "desktop" | "wide" | "lg" => Ok(ViewportClass::Desktop),
            "narrow" | "mobile" => Ok(ViewportClass::Narrow),
            _ => Err(anyhow::anyhow!("Invalid viewport '{s}'. Valid options: desktop, narrow")),
        }
    }
}

impl std::fmt::Display for ViewportClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewportClass::Desktop => write!(f, "desktop"),
            ViewportClass::Narrow => write!(f, "narrow"),
        }
    }
}
