//! Page feature toggles
//!
//! Opt-in/opt-out switches for the optional behaviours around the core
//! renderer. Every combination renders a complete page; turning a flag off
//! only removes the enhancement.

/// Page feature flags
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageFlags {
    /// Pointer-driven 3-D tilt on interactive blocks.
    ///
    /// Default: `true` on wasm32 (live pointer events), `false` on native
    /// (static markup has nothing to drive it).
    pub tilt: bool,

    /// Fetch recent videos for channel-backed SOCIAL blocks on mount.
    ///
    /// Default: `true`
    pub enrich_feeds: bool,

    /// Emit `page_view` / `click` beacons when the profile enables them.
    ///
    /// Default: `true` on wasm32, `false` on native
    pub analytics: bool,
}

impl Default for PageFlags {
    fn default() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            PageFlags {
                tilt: true,
                enrich_feeds: true,
                analytics: true,
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            PageFlags {
                tilt: false,
                enrich_feeds: true,
                analytics: false,
            }
        }
    }
}

impl PageFlags {
    /// Create flags with all features enabled
    pub fn all_enabled() -> Self {
        PageFlags {
            tilt: true,
            enrich_feeds: true,
            analytics: true,
        }
    }

    /// Create flags with all features disabled: no network, no motion
    pub fn all_disabled() -> Self {
        PageFlags {
            tilt: false,
            enrich_feeds: false,
            analytics: false,
        }
    }

    /// Static output: enrichment only, no tilt, no beacons
    pub fn static_only() -> Self {
        PageFlags {
            tilt: false,
            enrich_feeds: true,
            analytics: false,
        }
    }
}
