//! Headless page session.
//!
//! [`PageSession`] owns all runtime state for one rendered page: the
//! read-only dataset, the per-block enrichment side table, per-block tilt
//! state and the analytics tracker. Frontends feed it [`UiAction`]s and
//! draw its [`PageSnapshot`]s; nothing here touches a DOM or a socket.

use crate::analytics::Tracker;
use crate::feed::{video_url, FeedRequest, FeedService, EnrichmentTable};
use crate::flags::PageFlags;
use crate::render::{self, html};
use crate::social::PlatformRegistry;
use crate::theme::tokens::tokens;
use crate::theme::Theme;
use crate::tilt::{TiltTracker, TiltTransform};
use crate::types::{BlockRecord, Dataset, FeedEntry};
use crate::ui_core::{layout, ViewportClass};
use crate::ui_snapshot::{BlockView, PageSnapshot, UiAction};
use anyhow::Result;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// What the frontend should do after an action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "url")]
pub enum Effect {
    None,
    /// Open the URL in a new browsing context.
    Navigate(String),
    /// State changed; take a new snapshot.
    Rerender,
}

pub struct PageSession {
    dataset: Dataset,
    registry: PlatformRegistry,
    flags: PageFlags,
    viewport: ViewportClass,
    enrichment: EnrichmentTable,
    tilt: HashMap<String, TiltTracker>,
    mounted: HashSet<String>,
    tracker: Option<Tracker>,
    started: bool,
}

impl PageSession {
    pub fn new(dataset: Dataset, registry: PlatformRegistry, flags: PageFlags, viewport: ViewportClass) -> Self {
        Self {
            dataset,
            registry,
            flags,
            viewport,
            enrichment: EnrichmentTable::new(),
            tilt: HashMap::new(),
            mounted: HashSet::new(),
            tracker: None,
            started: false,
        }
    }

    /// Attach a tracker; ignored unless the analytics flag is on.
    pub fn with_tracker(mut self, tracker: Tracker) -> Self {
        if self.flags.analytics {
            self.tracker = Some(tracker);
        }
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn viewport(&self) -> ViewportClass {
        self.viewport
    }

    pub fn flags(&self) -> PageFlags {
        self.flags
    }

    fn block(&self, block_id: &str) -> Option<&BlockRecord> {
        self.dataset.blocks.iter().find(|b| b.id == block_id)
    }

    /// Emit `page_view` and mount every block. Returns the feed fetches to
    /// run. Calling it again is a no-op.
    pub fn start(&mut self) -> Vec<FeedRequest> {
        if self.started {
            return Vec::new();
        }
        self.started = true;
        if let Some(tracker) = &self.tracker {
            tracker.page_view();
        }
        let ids: Vec<String> = self.dataset.blocks.iter().map(|b| b.id.clone()).collect();
        ids.iter().filter_map(|id| self.mount(id)).collect()
    }

    /// Mount one block instance. Eligible SOCIAL blocks come back with a
    /// fetch ticket; mounting an already mounted block does nothing.
    pub fn mount(&mut self, block_id: &str) -> Option<FeedRequest> {
        let block = self.block(block_id)?;
        let wants_feed = self.flags.enrich_feeds && block.wants_feed();
        let channel_id = block.channel_id().map(str::to_string);
        if !self.mounted.insert(block_id.to_string()) {
            return None;
        }
        self.tilt.insert(block_id.to_string(), TiltTracker::new(self.flags.tilt));
        match channel_id {
            Some(channel_id) if wants_feed => {
                log::debug!("[feed] mount {block_id} -> {channel_id}");
                Some(self.enrichment.begin(block_id, &channel_id))
            }
            _ => None,
        }
    }

    /// Discard the instance; any fetch still in flight for it is dropped
    /// when it completes.
    pub fn unmount(&mut self, block_id: &str) {
        if self.mounted.remove(block_id) {
            self.enrichment.dispose(block_id);
            self.tilt.remove(block_id);
        }
    }

    /// Apply a finished fetch. Failures and empty results leave the block
    /// without entries. Returns true when the result was applied.
    pub fn complete_feed(&mut self, request: &FeedRequest, result: Result<Vec<FeedEntry>>) -> bool {
        let entries = match result {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("[feed] {}: {e:#}", request.channel_id);
                Vec::new()
            }
        };
        self.enrichment.complete(request, entries)
    }

    /// Preloaded entries win; otherwise whatever this instance fetched.
    pub fn videos_for<'a>(&'a self, block: &'a BlockRecord) -> &'a [FeedEntry] {
        if !block.youtube_videos.is_empty() {
            &block.youtube_videos
        } else {
            self.enrichment.entries(&block.id)
        }
    }

    /// Start the session and run every feed fetch concurrently, applying
    /// results as they land.
    pub async fn enrich_all(&mut self, service: &FeedService) -> usize {
        let requests = self.start();
        let results = futures::future::join_all(requests.iter().map(|req| service.try_load(&req.channel_id))).await;
        let mut applied = 0;
        for (request, result) in requests.iter().zip(results) {
            if self.complete_feed(request, result) {
                applied += 1;
            }
        }
        log::info!("[feed] enriched {applied}/{} blocks", requests.len());
        applied
    }

    pub fn handle(&mut self, action: UiAction) -> Effect {
        match action {
            UiAction::PointerMove { block_id, rect, x, y } => {
                let Some(tracker) = self.tilt.get_mut(&block_id).filter(|t| t.enabled()) else {
                    return Effect::None;
                };
                let t = tracker.pointer_move(rect, x, y);
                crate::debug::log_with(crate::debug::cat::TILT, || {
                    format!("{block_id} rx={:.1} ry={:.1}", t.rotate_x, t.rotate_y)
                });
                Effect::Rerender
            }
            UiAction::PointerLeave { block_id } => match self.tilt.get_mut(&block_id) {
                Some(tracker) if tracker.enabled() => {
                    tracker.pointer_leave();
                    Effect::Rerender
                }
                _ => Effect::None,
            },
            UiAction::Click { block_id } => {
                let Some(block) = self.block(&block_id) else {
                    return Effect::None;
                };
                match render::click_target(block, &self.registry) {
                    Some(url) => {
                        crate::debug::log_with(crate::debug::cat::CLICK, || format!("{block_id} -> {url}"));
                        if let Some(tracker) = &self.tracker {
                            tracker.click(&block_id, &url);
                        }
                        Effect::Navigate(url)
                    }
                    None => Effect::None,
                }
            }
            UiAction::ThumbnailClick { block_id, video_id } => {
                let known = self
                    .block(&block_id)
                    .map(|block| self.videos_for(block).iter().any(|v| v.id == video_id))
                    .unwrap_or(false);
                if known {
                    Effect::Navigate(video_url(&video_id))
                } else {
                    Effect::None
                }
            }
            UiAction::Resize { width } => {
                let next = ViewportClass::from_width(width);
                if next == self.viewport {
                    Effect::None
                } else {
                    log::debug!("[layout] viewport {} -> {next}", self.viewport);
                    self.viewport = next;
                    Effect::Rerender
                }
            }
        }
    }

    /// Resolved views for `viewport`, in paint order.
    pub fn views(&self, viewport: ViewportClass) -> Vec<BlockView> {
        let blocks = &self.dataset.blocks;
        let neutral = TiltTransform::neutral();
        layout(blocks, viewport)
            .iter()
            .map(|placement| {
                let block = &blocks[placement.index];
                let tilt = if self.flags.tilt {
                    Some(self.tilt.get(&block.id).map(|t| t.current()).unwrap_or(neutral))
                } else {
                    None
                };
                render::block_view(
                    block,
                    placement,
                    self.videos_for(block),
                    self.enrichment.is_loading(&block.id),
                    &self.registry,
                    tilt.as_ref(),
                )
            })
            .collect()
    }

    pub fn snapshot(&self) -> PageSnapshot {
        let t = tokens();
        let grid = match self.viewport {
            ViewportClass::Desktop => t.layout.desktop,
            ViewportClass::Narrow => t.layout.narrow,
        };
        PageSnapshot {
            viewport: self.viewport,
            grid_css: grid.to_css(),
            header: render::header_view(&self.dataset.profile, &self.registry),
            blocks: self.views(self.viewport),
            tilt_enabled: self.flags.tilt,
        }
    }

    /// Full HTML document with both grids.
    pub fn render_page(&self) -> String {
        let profile = &self.dataset.profile;
        let theme = Theme::from_profile(profile.theme.as_deref(), profile.background_color.as_deref());
        theme.audit();
        let header = render::header_view(profile, &self.registry);
        let desktop = self.views(ViewportClass::Desktop);
        let narrow = self.views(ViewportClass::Narrow);
        log::info!("[render] page with {} blocks", desktop.len());
        html::render_page(&html::PageDocument {
            profile,
            header: &header,
            desktop: &desktop,
            narrow: &narrow,
            theme,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{ClientInfo, EventKind, MemoryBeacon};
    use crate::tilt::Rect;
    use crate::types::{BlockKind, Profile, YoutubeMode};
    use std::sync::Arc;

    fn dataset() -> Dataset {
        let profile: Profile = serde_json::from_str(r#"{"name":"JB"}"#).unwrap();
        let mut yt = BlockRecord::new("yt", BlockKind::Social);
        yt.channel_id = Some("UC123".into());
        yt.youtube_mode = Some(YoutubeMode::Grid);
        let mut link = BlockRecord::new("link", BlockKind::Link);
        link.content = Some("https://example.com/x".into());
        let mut text = BlockRecord::new("text", BlockKind::Text);
        text.content = Some("not-a-url".into());
        Dataset {
            profile,
            blocks: vec![yt, link, text],
        }
    }

    fn session(flags: PageFlags) -> PageSession {
        PageSession::new(dataset(), PlatformRegistry::builtin(), flags, ViewportClass::Desktop)
    }

    fn entries(n: usize) -> Vec<FeedEntry> {
        (0..n)
            .map(|i| FeedEntry {
                id: format!("v{i}"),
                title: format!("t{i}"),
                thumbnail_url: crate::feed::thumbnail_url(&format!("v{i}")),
            })
            .collect()
    }

    #[test]
    fn test_start_mounts_once() {
        let mut s = session(PageFlags::all_enabled());
        let requests = s.start();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].channel_id, "UC123");
        assert!(s.start().is_empty());
        assert!(s.mount("yt").is_none());
    }

    #[test]
    fn test_enrichment_disabled() {
        let mut s = session(PageFlags::all_disabled());
        assert!(s.start().is_empty());
    }

    #[test]
    fn test_late_result_after_unmount_is_dropped() {
        let mut s = session(PageFlags::all_enabled());
        let req = s.start().remove(0);
        s.unmount("yt");
        assert!(!s.complete_feed(&req, Ok(entries(3))));
        let block = s.dataset().blocks[0].clone();
        assert!(s.videos_for(&block).is_empty());
    }

    #[test]
    fn test_loading_then_ready() {
        let mut s = session(PageFlags::all_enabled());
        let req = s.start().remove(0);
        let snap = s.snapshot();
        assert!(matches!(&snap.blocks[0].mode, render::RenderMode::FeedGrid { loading: true, .. }));

        assert!(s.complete_feed(&req, Ok(entries(6))));
        match &s.snapshot().blocks[0].mode {
            render::RenderMode::FeedGrid { videos, loading, .. } => {
                assert!(!loading);
                assert_eq!(videos.len(), 4);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_failed_fetch_leaves_empty_grid() {
        let mut s = session(PageFlags::all_enabled());
        let req = s.start().remove(0);
        assert!(s.complete_feed(&req, Err(anyhow::anyhow!("timeout"))));
        match &s.snapshot().blocks[0].mode {
            render::RenderMode::FeedGrid { videos, loading, .. } => {
                assert!(!loading);
                assert!(videos.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_clicks_and_tracking() {
        let sink = MemoryBeacon::new();
        let tracker = Tracker::new("site", ClientInfo::default(), Arc::new(sink.clone()));
        let mut s = session(PageFlags::all_enabled()).with_tracker(tracker);
        s.start();

        assert_eq!(
            s.handle(UiAction::Click { block_id: "link".into() }),
            Effect::Navigate("https://example.com/x".into())
        );
        assert_eq!(s.handle(UiAction::Click { block_id: "text".into() }), Effect::None);
        assert_eq!(s.handle(UiAction::Click { block_id: "missing".into() }), Effect::None);

        let sent = sink.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].event, EventKind::PageView);
        assert_eq!(sent[1].block_id.as_deref(), Some("link"));
    }

    #[test]
    fn test_thumbnail_click_only_for_known_videos() {
        let mut s = session(PageFlags::all_enabled());
        let req = s.start().remove(0);
        s.complete_feed(&req, Ok(entries(2)));
        assert_eq!(
            s.handle(UiAction::ThumbnailClick {
                block_id: "yt".into(),
                video_id: "v1".into()
            }),
            Effect::Navigate("https://youtube.com/watch?v=v1".into())
        );
        assert_eq!(
            s.handle(UiAction::ThumbnailClick {
                block_id: "yt".into(),
                video_id: "zzz".into()
            }),
            Effect::None
        );
    }

    #[test]
    fn test_tilt_and_resize() {
        let mut s = session(PageFlags::all_enabled());
        s.start();
        let rect = Rect {
            left: 0.0,
            top: 0.0,
            width: 100.0,
            height: 100.0,
        };
        let effect = s.handle(UiAction::PointerMove {
            block_id: "link".into(),
            rect,
            x: 100.0,
            y: 0.0,
        });
        assert_eq!(effect, Effect::Rerender);
        let css = s.snapshot().blocks[1].tilt_css.clone().unwrap();
        assert!(css.contains("rotateX(10.00deg) rotateY(10.00deg)"));

        s.handle(UiAction::PointerLeave { block_id: "link".into() });
        let css = s.snapshot().blocks[1].tilt_css.clone().unwrap();
        assert!(css.contains("rotateX(0deg) rotateY(0deg) scale3d(1, 1, 1)"));

        assert_eq!(s.handle(UiAction::Resize { width: 1300 }), Effect::None);
        assert_eq!(s.handle(UiAction::Resize { width: 600 }), Effect::Rerender);
        assert_eq!(s.snapshot().viewport, ViewportClass::Narrow);
    }

    #[test]
    fn test_tilt_disabled_ignores_pointer() {
        let mut s = session(PageFlags::static_only());
        s.start();
        let rect = Rect {
            left: 0.0,
            top: 0.0,
            width: 10.0,
            height: 10.0,
        };
        let effect = s.handle(UiAction::PointerMove {
            block_id: "link".into(),
            rect,
            x: 1.0,
            y: 1.0,
        });
        assert_eq!(effect, Effect::None);
        assert!(s.snapshot().blocks.iter().all(|b| b.tilt_css.is_none()));
    }
}
