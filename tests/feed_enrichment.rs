//! Feed enrichment tests - stub fetcher, per-instance results, stale drops

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use bentogrid::feed::{thumbnail_url, FeedFetcher, FeedService, DEFAULT_PROXY_TEMPLATE};
use bentogrid::flags::PageFlags;
use bentogrid::render::RenderMode;
use bentogrid::types::{Profile, YoutubeMode};
use bentogrid::ui_snapshot::UiAction;
use bentogrid::{BlockKind, BlockRecord, Dataset, Effect, PageSession, PlatformRegistry, ViewportClass};

fn atom(n: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns:yt="http://www.youtube.com/xml/schemas/2015" xmlns="http://www.w3.org/2005/Atom">
 <title>Some Channel</title>"#,
    );
    for i in 0..n {
        xml.push_str(&format!(
            "\n <entry><yt:videoId>clip{i}</yt:videoId><title>Clip {i}</title></entry>"
        ));
    }
    xml.push_str("\n</feed>");
    xml
}

/// Returns the same body for every URL and records what was asked for.
struct StubFetcher {
    body: Option<String>,
    requests: Mutex<Vec<String>>,
}

impl StubFetcher {
    fn ok(body: String) -> Arc<Self> {
        Arc::new(Self {
            body: Some(body),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            body: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl FeedFetcher for StubFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        self.body.clone().ok_or_else(|| anyhow!("connection refused"))
    }
}

fn channel_block(id: &str, mode: YoutubeMode) -> BlockRecord {
    let mut block = BlockRecord::new(id, BlockKind::Social);
    block.channel_id = Some("UC123".into());
    block.youtube_mode = Some(mode);
    block.col_span = 4;
    block.row_span = 4;
    block
}

fn session(blocks: Vec<BlockRecord>) -> PageSession {
    let profile: Profile = serde_json::from_str(r#"{"name":"Feed Tester"}"#).unwrap();
    PageSession::new(
        Dataset { profile, blocks },
        PlatformRegistry::builtin(),
        PageFlags {
            enrich_feeds: true,
            ..PageFlags::all_disabled()
        },
        ViewportClass::Desktop,
    )
}

#[tokio::test]
async fn six_entries_store_four() {
    let fetcher = StubFetcher::ok(atom(6));
    let service = FeedService::new(fetcher.clone(), DEFAULT_PROXY_TEMPLATE);
    let mut s = session(vec![channel_block("yt", YoutubeMode::Grid)]);

    assert_eq!(s.enrich_all(&service).await, 1);
    assert_eq!(fetcher.request_count(), 1);

    let block = s.dataset().blocks[0].clone();
    let videos = s.videos_for(&block);
    assert_eq!(videos.len(), 4);
    for (i, video) in videos.iter().enumerate() {
        assert_eq!(video.id, format!("clip{i}"));
        assert_eq!(video.thumbnail_url, thumbnail_url(&video.id));
    }

    // Authored record untouched
    assert!(s.dataset().blocks[0].youtube_videos.is_empty());
}

#[tokio::test]
async fn preloaded_videos_skip_the_fetch() {
    let fetcher = StubFetcher::ok(atom(2));
    let service = FeedService::new(fetcher.clone(), DEFAULT_PROXY_TEMPLATE);
    let mut block = channel_block("yt", YoutubeMode::Grid);
    block.youtube_videos = serde_json::from_str(
        r#"[{"id":"pre","title":"Preloaded","thumbnail":"https://img.example/pre.jpg"}]"#,
    )
    .unwrap();
    let mut s = session(vec![block]);

    assert_eq!(s.enrich_all(&service).await, 0);
    assert_eq!(fetcher.request_count(), 0);
    match &s.snapshot().blocks[0].mode {
        RenderMode::FeedGrid { videos, loading, .. } => {
            assert_eq!(videos.len(), 1);
            assert!(!loading);
        }
        other => panic!("unexpected mode {other:?}"),
    }
}

#[tokio::test]
async fn failure_degrades_to_empty() {
    let service = FeedService::new(StubFetcher::failing(), DEFAULT_PROXY_TEMPLATE);
    let mut s = session(vec![channel_block("yt", YoutubeMode::Single)]);

    s.enrich_all(&service).await;
    let snap = s.snapshot();
    // No active video id: the block falls back to the content panel
    assert!(matches!(snap.blocks[0].mode, RenderMode::Panel { .. }));
    assert_eq!(
        snap.blocks[0].destination.as_deref(),
        Some("https://youtube.com/channel/UC123")
    );
}

#[tokio::test]
async fn result_after_unmount_is_dropped() {
    let service = FeedService::new(StubFetcher::ok(atom(3)), DEFAULT_PROXY_TEMPLATE);
    let mut s = session(vec![channel_block("yt", YoutubeMode::Grid)]);

    let requests = s.start();
    assert_eq!(requests.len(), 1);
    let request = requests[0].clone();

    s.unmount("yt");
    let result = service.try_load(&request.channel_id).await;
    assert!(!s.complete_feed(&request, result));

    // Remount issues a new ticket; the old one stays stale
    let fresh = s.mount("yt").expect("remount should fetch again");
    assert_ne!(fresh.generation, request.generation);
    assert!(!s.complete_feed(&request, Ok(Vec::new())));
    let result = service.try_load(&fresh.channel_id).await;
    assert!(s.complete_feed(&fresh, result));

    let block = s.dataset().blocks[0].clone();
    assert_eq!(s.videos_for(&block).len(), 3);
}

#[tokio::test]
async fn thumbnail_click_navigates_to_video() {
    let service = FeedService::new(StubFetcher::ok(atom(4)), DEFAULT_PROXY_TEMPLATE);
    let mut s = session(vec![channel_block("yt", YoutubeMode::List)]);
    s.enrich_all(&service).await;

    let effect = s.handle(UiAction::ThumbnailClick {
        block_id: "yt".into(),
        video_id: "clip2".into(),
    });
    assert_eq!(effect, Effect::Navigate("https://youtube.com/watch?v=clip2".into()));

    let unknown = s.handle(UiAction::ThumbnailClick {
        block_id: "yt".into(),
        video_id: "elsewhere".into(),
    });
    assert_eq!(unknown, Effect::None);
}

#[tokio::test]
async fn enrichment_off_never_fetches() {
    let fetcher = StubFetcher::ok(atom(4));
    let service = FeedService::new(fetcher.clone(), DEFAULT_PROXY_TEMPLATE);
    let profile: Profile = serde_json::from_str(r#"{"name":"Quiet"}"#).unwrap();
    let mut s = PageSession::new(
        Dataset {
            profile,
            blocks: vec![channel_block("yt", YoutubeMode::Grid)],
        },
        PlatformRegistry::builtin(),
        PageFlags::all_disabled(),
        ViewportClass::Narrow,
    );
    assert_eq!(s.enrich_all(&service).await, 0);
    assert_eq!(fetcher.request_count(), 0);
}
