//! Render mode dispatch.
//!
//! Every block is resolved exactly once into a [`RenderMode`]; markup and
//! snapshot code match on the variant instead of re-deriving the
//! conditions. Precedence, first match wins:
//!
//! 1. SPACER
//! 2. SOCIAL_ICON
//! 3. SOCIAL + channel + grid/list mode → feed grid
//! 4. SOCIAL + channel + active video id → rich preview
//! 5. LINK + image → image card
//! 6. MEDIA → media frame, MAP → embedded map
//! 7. anything else → content panel

use crate::render::style::{map_embed_url, media_kind, MediaKind};
use crate::social::{PlatformDescriptor, PlatformRegistry};
use crate::types::{non_empty, BlockKind, BlockRecord, FeedEntry, MediaPosition};
use crate::feed::FEED_LIMIT;
use serde::Serialize;

/// Text color class that paints the leading icon in the brand color.
pub const BRAND_TEXT_CLASS: &str = "text-brand";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconView {
    pub platform: String,
    pub icon: String,
    pub brand_color: String,
    /// Paint the glyph in `brand_color` instead of the text color.
    pub tinted: bool,
}

impl IconView {
    fn from_descriptor(descriptor: &PlatformDescriptor, tinted: bool) -> Self {
        Self {
            platform: descriptor.key.to_string(),
            icon: descriptor.icon.to_string(),
            brand_color: descriptor.brand_color.to_string(),
            tinted,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum RenderMode {
    Spacer,
    SocialIcon {
        icon: IconView,
    },
    FeedGrid {
        channel_title: String,
        /// At most four entries, in feed order.
        videos: Vec<FeedEntry>,
        loading: bool,
    },
    RichPreview {
        video_id: String,
        label: Option<String>,
    },
    ImageCard {
        image_url: String,
        position: MediaPosition,
    },
    Media {
        media: MediaKind,
        position: MediaPosition,
    },
    Map {
        embed_url: String,
    },
    Panel {
        icon: Option<IconView>,
        /// Wrapped body copy; TEXT blocks only.
        body: Option<String>,
    },
}

impl RenderMode {
    pub fn name(&self) -> &'static str {
        match self {
            RenderMode::Spacer => "spacer",
            RenderMode::SocialIcon { .. } => "social_icon",
            RenderMode::FeedGrid { .. } => "feed_grid",
            RenderMode::RichPreview { .. } => "rich_preview",
            RenderMode::ImageCard { .. } => "image_card",
            RenderMode::Media { .. } => "media",
            RenderMode::Map { .. } => "map",
            RenderMode::Panel { .. } => "panel",
        }
    }

    /// Spacers take no clicks and no tilt.
    pub fn is_interactive(&self) -> bool {
        !matches!(self, RenderMode::Spacer)
    }

    /// Image-backed modes overlay their text on a bottom gradient.
    pub fn has_overlay_text(&self) -> bool {
        matches!(self, RenderMode::RichPreview { .. } | RenderMode::ImageCard { .. })
    }
}

pub const DEFAULT_CHANNEL_TITLE: &str = "YouTube";

/// Video that drives the rich preview: the authored id, else the first
/// enrichment entry.
pub fn active_video_id<'a>(block: &'a BlockRecord, videos: &'a [FeedEntry]) -> Option<&'a str> {
    non_empty(&block.youtube_video_id).or_else(|| videos.first().map(|v| v.id.as_str()).filter(|id| !id.is_empty()))
}

/// Resolve the single render mode for `block`.
///
/// `videos` is the block's effective entry list (preloaded or enriched) and
/// `loading` whether a fetch for this instance is still outstanding.
pub fn resolve_mode(
    block: &BlockRecord,
    videos: &[FeedEntry],
    loading: bool,
    registry: &PlatformRegistry,
) -> RenderMode {
    match block.kind {
        BlockKind::Spacer => return RenderMode::Spacer,
        BlockKind::SocialIcon => {
            let descriptor = registry.resolve(block.social_platform().unwrap_or(crate::social::CUSTOM.key));
            return RenderMode::SocialIcon {
                icon: IconView::from_descriptor(descriptor, true),
            };
        }
        _ => {}
    }

    let youtube = block.kind == BlockKind::Social && block.channel_id().is_some();
    let feed_layout = block.youtube_mode.map(|m| m.is_feed()).unwrap_or(false);

    if youtube && feed_layout {
        return RenderMode::FeedGrid {
            channel_title: non_empty(&block.channel_title)
                .unwrap_or(DEFAULT_CHANNEL_TITLE)
                .to_string(),
            videos: videos.iter().take(FEED_LIMIT).cloned().collect(),
            loading,
        };
    }

    if youtube {
        if let Some(video_id) = active_video_id(block, videos) {
            return RenderMode::RichPreview {
                video_id: video_id.to_string(),
                label: non_empty(&block.channel_title)
                    .or_else(|| non_empty(&block.title))
                    .map(str::to_string),
            };
        }
    }

    if block.kind == BlockKind::Link {
        if let Some(image_url) = block.image_url() {
            return RenderMode::ImageCard {
                image_url: image_url.to_string(),
                position: block.media_position(),
            };
        }
    }

    match block.kind {
        BlockKind::Media => RenderMode::Media {
            media: media_kind(block.image_url()),
            position: block.media_position(),
        },
        BlockKind::Map => RenderMode::Map {
            embed_url: map_embed_url(non_empty(&block.content)),
        },
        _ => {
            let icon = match (block.kind, block.social_platform()) {
                (BlockKind::Social, Some(platform)) => Some(IconView::from_descriptor(
                    registry.resolve(platform),
                    non_empty(&block.text_color) == Some(BRAND_TEXT_CLASS),
                )),
                _ => None,
            };
            let body = match block.kind {
                BlockKind::Text => non_empty(&block.content).map(str::to_string),
                _ => None,
            };
            RenderMode::Panel { icon, body }
        }
    }
}
