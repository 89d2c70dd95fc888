use serde::{Deserialize, Serialize};

/// Primary category of a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockKind {
    Link,
    Text,
    Media,
    Social,
    SocialIcon,
    Map,
    Spacer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YoutubeMode {
    Single,
    Grid,
    List,
}

impl YoutubeMode {
    /// Grid and list both render as the multi-thumbnail feed grid.
    pub fn is_feed(self) -> bool {
        matches!(self, YoutubeMode::Grid | YoutubeMode::List)
    }
}

/// Background focal point in percent (0..=100 on each axis).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MediaPosition {
    pub x: f32,
    pub y: f32,
}

impl Default for MediaPosition {
    fn default() -> Self {
        Self { x: 50.0, y: 50.0 }
    }
}

/// One recent video attached to a SOCIAL block, either preloaded in the
/// dataset or fetched at runtime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub id: String,
    pub title: String,
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
}

fn one() -> u32 {
    1
}

/// One authored block of the profile grid. Read-only for the lifetime of
/// a render session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtext: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub media_position: Option<MediaPosition>,
    #[serde(default = "one")]
    pub col_span: u32,
    #[serde(default = "one")]
    pub row_span: u32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub custom_background: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub grid_column: Option<u32>,
    #[serde(default)]
    pub grid_row: Option<u32>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub youtube_video_id: Option<String>,
    #[serde(default)]
    pub channel_title: Option<String>,
    #[serde(default)]
    pub youtube_mode: Option<YoutubeMode>,
    #[serde(default)]
    pub youtube_videos: Vec<FeedEntry>,
    #[serde(default)]
    pub social_platform: Option<String>,
    #[serde(default)]
    pub social_handle: Option<String>,
    #[serde(default)]
    pub z_index: Option<i32>,
}

/// Treat `Some("")` the same as `None`; the authoring tool writes empty
/// strings for cleared fields.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl BlockRecord {
    /// Minimal record with the given id and kind, 1x1, everything else unset.
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            kind,
            title: None,
            subtext: None,
            content: None,
            image_url: None,
            media_position: None,
            col_span: 1,
            row_span: 1,
            color: None,
            custom_background: None,
            text_color: None,
            grid_column: None,
            grid_row: None,
            channel_id: None,
            youtube_video_id: None,
            channel_title: None,
            youtube_mode: None,
            youtube_videos: Vec::new(),
            social_platform: None,
            social_handle: None,
            z_index: None,
        }
    }

    pub fn media_position(&self) -> MediaPosition {
        self.media_position.unwrap_or_default()
    }

    pub fn channel_id(&self) -> Option<&str> {
        non_empty(&self.channel_id)
    }

    pub fn social_platform(&self) -> Option<&str> {
        non_empty(&self.social_platform)
    }

    pub fn social_handle(&self) -> Option<&str> {
        non_empty(&self.social_handle)
    }

    pub fn image_url(&self) -> Option<&str> {
        non_empty(&self.image_url)
    }

    pub fn custom_background(&self) -> Option<&str> {
        non_empty(&self.custom_background)
    }

    /// True when this block should trigger a feed fetch on mount.
    pub fn wants_feed(&self) -> bool {
        self.kind == BlockKind::Social && self.channel_id().is_some() && self.youtube_videos.is_empty()
    }
}

/// One entry of the header social row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialAccount {
    pub platform: String,
    pub handle: String,
    #[serde(default)]
    pub follower_count: Option<u64>,
}

fn default_site_id() -> String {
    "bentogrid".to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Base URL of the analytics backend; the track function path is appended.
    #[serde(default)]
    pub supabase_url: Option<String>,
    #[serde(default = "default_site_id")]
    pub site_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraph {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub site_name: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub analytics: Option<AnalyticsConfig>,
    #[serde(default)]
    pub social_accounts: Vec<SocialAccount>,
    #[serde(default = "default_true")]
    pub show_social_in_header: bool,
    #[serde(default)]
    pub show_follower_count: bool,
    #[serde(default)]
    pub open_graph: Option<OpenGraph>,
}

/// The complete read-only input: profile plus ordered block list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub profile: Profile,
    pub blocks: Vec<BlockRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_record_from_authoring_json() {
        let json = r#"{"id":"o125le600","type":"SOCIAL","title":"Telegram","content":"https://t.me/x",
            "colSpan":2,"rowSpan":3,"color":"bg-white","textColor":"text-brand","gridColumn":1,"gridRow":18,
            "socialPlatform":"telegram","socialHandle":"bl1tz2200","subtext":"@bl1tz2200"}"#;
        let block: BlockRecord = serde_json::from_str(json).unwrap();
        assert_eq!(block.kind, BlockKind::Social);
        assert_eq!(block.col_span, 2);
        assert_eq!(block.grid_row, Some(18));
        assert_eq!(block.social_platform(), Some("telegram"));
        assert!(block.youtube_videos.is_empty());
        assert_eq!(block.media_position(), MediaPosition { x: 50.0, y: 50.0 });
    }

    #[test]
    fn test_social_icon_kind_name() {
        let kind: BlockKind = serde_json::from_str("\"SOCIAL_ICON\"").unwrap();
        assert_eq!(kind, BlockKind::SocialIcon);
    }

    #[test]
    fn test_wants_feed() {
        let mut block = BlockRecord::new("yt", BlockKind::Social);
        assert!(!block.wants_feed());
        block.channel_id = Some(String::new());
        assert!(!block.wants_feed());
        block.channel_id = Some("UC123".into());
        assert!(block.wants_feed());
        block.youtube_videos.push(FeedEntry {
            id: "a".into(),
            title: "A".into(),
            thumbnail_url: "t".into(),
        });
        assert!(!block.wants_feed());
    }

    #[test]
    fn test_preloaded_videos_use_thumbnail_key() {
        let json = r#"{"id":"v","title":"T","thumbnail":"https://img/x.jpg"}"#;
        let entry: FeedEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.thumbnail_url, "https://img/x.jpg");
    }
}
