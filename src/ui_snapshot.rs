//! UI snapshot and action types for DOM-based rendering
//!
//! Boundary between the headless [`PageSession`](crate::app::PageSession)
//! and any frontend: the session serializes state as JSON, the frontend
//! sends back [`UiAction`]s.

use crate::render::mode::RenderMode;
use crate::render::style::Background;
use crate::tilt::Rect;
use crate::types::BlockKind;
use crate::ui_core::{Placement, ViewportClass};
use serde::{Deserialize, Serialize};

/// Page state for one viewport class (one-way data flow: Rust → JS).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    pub viewport: ViewportClass,
    /// Container declarations for the active grid.
    pub grid_css: String,
    pub header: HeaderView,
    /// Blocks in paint order for `viewport`.
    pub blocks: Vec<BlockView>,
    pub tilt_enabled: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderView {
    pub name: String,
    pub bio: String,
    pub avatar_url: Option<String>,
    /// Empty when the profile hides the header row.
    pub socials: Vec<SocialLinkView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinkView {
    pub platform: String,
    pub icon: String,
    pub brand_color: String,
    pub url: String,
    /// Formatted count, empty when hidden or unknown.
    pub followers: String,
}

/// One block, fully resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockView {
    pub id: String,
    pub kind: BlockKind,
    #[serde(flatten)]
    pub mode: RenderMode,
    pub placement: Placement,
    pub placement_css: String,
    pub radius: &'static str,
    pub background: Background,
    pub text_class: String,
    pub title: Option<String>,
    pub subtext: Option<String>,
    /// Navigable destination; `None` means clicks are inert.
    pub destination: Option<String>,
    /// Inline tilt declarations, when tilt is on for this block.
    pub tilt_css: Option<String>,
    pub z_index: Option<i32>,
}

/// User actions from DOM (data flow: JS → Rust)
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum UiAction {
    /// Pointer moved over a block; coordinates are client px.
    PointerMove {
        block_id: String,
        rect: Rect,
        x: f32,
        y: f32,
    },
    PointerLeave {
        block_id: String,
    },
    /// Click on the block body.
    Click {
        block_id: String,
    },
    /// Click on one feed-grid thumbnail; never bubbles to the block.
    ThumbnailClick {
        block_id: String,
        video_id: String,
    },
    /// Window resized; may switch the viewport class.
    Resize {
        width: u32,
    },
}
