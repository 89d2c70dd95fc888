//! Derived styles applied after mode selection.

use crate::feed::preview_image_url;
use crate::render::mode::RenderMode;
use crate::theme::tokens::RADIUS_BUCKETS;
use crate::types::{non_empty, BlockRecord, MediaPosition};
use serde::Serialize;

/// Radius bucket index (0..4) for `min(colSpan, rowSpan)`.
pub fn radius_bucket(col_span: u32, row_span: u32) -> usize {
    match col_span.min(row_span) {
        0 | 1 => 0,
        2 => 1,
        3 => 2,
        _ => 3,
    }
}

pub fn corner_radius(col_span: u32, row_span: u32) -> &'static str {
    RADIUS_BUCKETS[radius_bucket(col_span, row_span)]
}

/// Block surface after precedence is applied.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Background {
    /// Tailwind-style color class from the dataset.
    Class { class: String },
    /// Raw CSS `background` value.
    Custom { css: String },
    /// Cover image positioned at a focal point.
    Image { url: String, position: MediaPosition },
}

impl Background {
    pub fn class(&self) -> Option<&str> {
        match self {
            Background::Class { class } => Some(class.as_str()),
            _ => None,
        }
    }

    pub fn to_css(&self) -> String {
        match self {
            Background::Class { .. } => String::new(),
            Background::Custom { css } => format!("background:{css};"),
            Background::Image { url, position } => format!(
                "background-image:url(\"{}\");background-size:cover;background-position:{}% {}%;",
                crate::util_text::escape_css_string(url),
                position.x,
                position.y
            ),
        }
    }
}

fn color_class(block: &BlockRecord) -> String {
    non_empty(&block.color)
        .unwrap_or(crate::theme::tokens::tokens().visuals.block_color_class)
        .to_string()
}

/// Background precedence: rich preview and image card use their image,
/// the feed grid always uses its own surface, everything else honours
/// `customBackground` over the color class.
pub fn background_for(block: &BlockRecord, mode: &RenderMode) -> Background {
    match mode {
        RenderMode::RichPreview { video_id, .. } => Background::Image {
            url: preview_image_url(video_id),
            position: MediaPosition::default(),
        },
        RenderMode::ImageCard { image_url, position } => Background::Image {
            url: image_url.clone(),
            position: *position,
        },
        RenderMode::FeedGrid { .. } => Background::Class {
            class: color_class(block),
        },
        _ => match block.custom_background() {
            Some(css) => Background::Custom { css: css.to_string() },
            None => Background::Class {
                class: color_class(block),
            },
        },
    }
}

pub fn text_class(block: &BlockRecord) -> String {
    non_empty(&block.text_color)
        .unwrap_or(crate::theme::tokens::tokens().visuals.text_color_class)
        .to_string()
}

/// What a MEDIA block shows, decided by filename suffix only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "src", rename_all = "snake_case")]
pub enum MediaKind {
    Image(String),
    /// Autoplaying, looping, muted, inline.
    Video(String),
    Empty,
}

const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "webm", "ogg", "mov"];

pub fn is_video_url(url: &str) -> bool {
    match url.rsplit_once('.') {
        Some((_, ext)) => VIDEO_EXTENSIONS.iter().any(|v| ext.eq_ignore_ascii_case(v)),
        None => false,
    }
}

pub fn media_kind(url: Option<&str>) -> MediaKind {
    match url {
        None => MediaKind::Empty,
        Some(url) if is_video_url(url) => MediaKind::Video(url.to_string()),
        Some(url) => MediaKind::Image(url.to_string()),
    }
}

pub const DEFAULT_MAP_QUERY: &str = "Paris";

pub fn map_embed_url(query: Option<&str>) -> String {
    let query = query.filter(|q| !q.is_empty()).unwrap_or(DEFAULT_MAP_QUERY);
    format!(
        "https://maps.google.com/maps?q={}&t=&z=13&ie=UTF8&iwloc=&output=embed",
        urlencoding::encode(query)
    )
}
