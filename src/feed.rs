//! Feed enrichment: recent videos for SOCIAL blocks tied to a channel.
//!
//! The network side goes through the [`FeedFetcher`] seam so tests run
//! against canned documents. Per-block results live in an
//! [`EnrichmentTable`] keyed by block id; the authored [`BlockRecord`]
//! is never touched.
//!
//! [`BlockRecord`]: crate::types::BlockRecord

use crate::types::FeedEntry;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// Entries consulted per feed document.
pub const FEED_LIMIT: usize = 4;

/// Public CORS relay used when nothing else is configured. `{url}` is
/// replaced by the url-encoded feed document URL.
pub const DEFAULT_PROXY_TEMPLATE: &str = "https://api.allorigins.win/raw?url={url}";

pub fn feed_url(channel_id: &str) -> String {
    format!("https://www.youtube.com/feeds/videos.xml?channel_id={channel_id}")
}

/// Small thumbnail shown in the feed grid.
pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/mqdefault.jpg")
}

/// High-resolution frame used as the rich-preview background.
pub fn preview_image_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/maxresdefault.jpg")
}

pub fn video_url(video_id: &str) -> String {
    format!("https://youtube.com/watch?v={video_id}")
}

pub fn channel_url(channel_id: &str) -> String {
    format!("https://youtube.com/channel/{channel_id}")
}

/// Wrap `target` in a proxy template. Templates without `{url}` get the
/// encoded URL appended.
pub fn proxied_url(template: &str, target: &str) -> String {
    let encoded = urlencoding::encode(target);
    if template.contains("{url}") {
        template.replace("{url}", &encoded)
    } else {
        format!("{template}{encoded}")
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Capture {
    None,
    VideoId,
    Title,
}

/// Parse an Atom video feed, keeping the first `limit` entries in document
/// order. Each entry yields its `yt:videoId` and first `title`; missing
/// fields become empty strings. The thumbnail is derived from the id.
pub fn parse_feed(xml: &str, limit: usize) -> Result<Vec<FeedEntry>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut in_entry = false;
    let mut capture = Capture::None;
    let mut id: Option<String> = None;
    let mut title: Option<String> = None;

    loop {
        if entries.len() >= limit {
            break;
        }
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"entry" => {
                    in_entry = true;
                    id = None;
                    title = None;
                }
                b"yt:videoId" if in_entry && id.is_none() => capture = Capture::VideoId,
                b"title" if in_entry && title.is_none() => capture = Capture::Title,
                _ => {}
            },
            Ok(Event::Text(t)) if capture != Capture::None => {
                let text = t.unescape().context("feed text")?.into_owned();
                match capture {
                    Capture::VideoId => id = Some(text),
                    Capture::Title => title = Some(text),
                    Capture::None => {}
                }
            }
            Ok(Event::CData(t)) if capture == Capture::Title => {
                title = Some(String::from_utf8_lossy(&t.into_inner()).into_owned());
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"entry" if in_entry => {
                    in_entry = false;
                    let id = id.take().unwrap_or_default();
                    entries.push(FeedEntry {
                        thumbnail_url: thumbnail_url(&id),
                        title: title.take().unwrap_or_default(),
                        id,
                    });
                }
                b"yt:videoId" | b"title" => {
                    if capture == Capture::VideoId && id.is_none() {
                        id = Some(String::new());
                    }
                    if capture == Capture::Title && title.is_none() {
                        title = Some(String::new());
                    }
                    capture = Capture::None;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(anyhow!(
                    "feed parse error at {}: {e}",
                    reader.buffer_position()
                ))
            }
        }
    }
    Ok(entries)
}

/// Fetches a feed document body. Implementations must not retry.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait FeedFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

static HTTP: OnceLock<reqwest::Client> = OnceLock::new();

fn http_client() -> &'static reqwest::Client {
    HTTP.get_or_init(|| {
        #[cfg(not(target_arch = "wasm32"))]
        {
            reqwest::Client::builder()
                .pool_max_idle_per_host(4)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new())
        }

        #[cfg(target_arch = "wasm32")]
        {
            reqwest::Client::new()
        }
    })
}

/// GET over the shared reqwest client.
#[derive(Clone, Debug)]
pub struct HttpFeedFetcher {
    pub timeout_ms: u64,
}

impl HttpFeedFetcher {
    pub fn new(timeout_ms: u64) -> Self {
        Self { timeout_ms }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let res = http_client()
            .get(url)
            .timeout(Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;
        if !res.status().is_success() {
            return Err(anyhow!("feed http {}", res.status()));
        }
        Ok(res.text().await?)
    }
}

/// Resolves a channel id to its recent entries through a proxy.
#[derive(Clone)]
pub struct FeedService {
    fetcher: Arc<dyn FeedFetcher>,
    proxy_template: String,
}

impl FeedService {
    pub fn new(fetcher: Arc<dyn FeedFetcher>, proxy_template: impl Into<String>) -> Self {
        Self {
            fetcher,
            proxy_template: proxy_template.into(),
        }
    }

    pub fn http(timeout_ms: u64, proxy_template: impl Into<String>) -> Self {
        Self::new(Arc::new(HttpFeedFetcher::new(timeout_ms)), proxy_template)
    }

    pub fn request_url(&self, channel_id: &str) -> String {
        proxied_url(&self.proxy_template, &feed_url(channel_id))
    }

    pub async fn try_load(&self, channel_id: &str) -> Result<Vec<FeedEntry>> {
        let url = self.request_url(channel_id);
        let body = self.fetcher.fetch_text(&url).await?;
        parse_feed(&body, FEED_LIMIT)
    }

    /// One fetch, no retry. Any failure degrades to an empty list.
    pub async fn load(&self, channel_id: &str) -> Vec<FeedEntry> {
        match self.try_load(channel_id).await {
            Ok(entries) => {
                log::info!("[feed] {channel_id}: {} entries", entries.len());
                entries
            }
            Err(e) => {
                log::warn!("[feed] {channel_id}: {e:#}");
                Vec::new()
            }
        }
    }
}

/// Ticket for one outstanding fetch, tied to a single mounted instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedRequest {
    pub block_id: String,
    pub channel_id: String,
    pub generation: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnrichmentState {
    Loading,
    Ready(Vec<FeedEntry>),
    /// Fetch finished with nothing usable.
    Empty,
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u64,
    state: EnrichmentState,
}

/// Per-instance enrichment results keyed by block id.
///
/// Each mount gets a fresh generation; completions carrying a stale
/// generation (the instance was unmounted, or remounted since) are dropped.
#[derive(Clone, Debug, Default)]
pub struct EnrichmentTable {
    slots: HashMap<String, Slot>,
    next_generation: u64,
}

impl EnrichmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `block_id` loading and hand out the ticket for its fetch.
    pub fn begin(&mut self, block_id: &str, channel_id: &str) -> FeedRequest {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.slots.insert(
            block_id.to_string(),
            Slot {
                generation,
                state: EnrichmentState::Loading,
            },
        );
        FeedRequest {
            block_id: block_id.to_string(),
            channel_id: channel_id.to_string(),
            generation,
        }
    }

    /// Apply a finished fetch. Returns false when the ticket is stale.
    pub fn complete(&mut self, request: &FeedRequest, entries: Vec<FeedEntry>) -> bool {
        match self.slots.get_mut(&request.block_id) {
            Some(slot) if slot.generation == request.generation => {
                slot.state = if entries.is_empty() {
                    EnrichmentState::Empty
                } else {
                    EnrichmentState::Ready(entries)
                };
                true
            }
            _ => {
                log::debug!(
                    "[feed] dropping stale result for {} (gen {})",
                    request.block_id,
                    request.generation
                );
                false
            }
        }
    }

    pub fn dispose(&mut self, block_id: &str) {
        self.slots.remove(block_id);
    }

    pub fn state(&self, block_id: &str) -> Option<&EnrichmentState> {
        self.slots.get(block_id).map(|s| &s.state)
    }

    pub fn entries(&self, block_id: &str) -> &[FeedEntry] {
        match self.state(block_id) {
            Some(EnrichmentState::Ready(entries)) => entries,
            _ => &[],
        }
    }

    pub fn is_loading(&self, block_id: &str) -> bool {
        matches!(self.state(block_id), Some(EnrichmentState::Loading))
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    pub(crate) fn atom(n: usize) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns:yt="http://www.youtube.com/xml/schemas/2015" xmlns:media="http://search.yahoo.com/mrss/" xmlns="http://www.w3.org/2005/Atom">
 <title>Channel</title>"#,
        );
        for i in 0..n {
            xml.push_str(&format!(
                r#"
 <entry>
  <id>yt:video:vid{i}</id>
  <yt:videoId>vid{i}</yt:videoId>
  <title>Video &amp; {i}</title>
  <media:group><media:title>Media {i}</media:title></media:group>
 </entry>"#
            ));
        }
        xml.push_str("\n</feed>");
        xml
    }

    struct Canned {
        body: Result<String, String>,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl FeedFetcher for Canned {
        async fn fetch_text(&self, url: &str) -> Result<String> {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(url.to_string());
            }
            self.body.clone().map_err(|e| anyhow!(e))
        }
    }

    #[test]
    fn test_parse_takes_first_four() {
        let entries = parse_feed(&atom(6), FEED_LIMIT).unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].id, "vid0");
        assert_eq!(entries[0].title, "Video & 0");
        assert_eq!(entries[3].thumbnail_url, "https://img.youtube.com/vi/vid3/mqdefault.jpg");
    }

    #[test]
    fn test_parse_feed_title_is_not_entry_title() {
        let entries = parse_feed(&atom(1), FEED_LIMIT).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Video & 0");
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_feed("<feed><entry></feed>", FEED_LIMIT).is_err());
        assert!(parse_feed("not xml at all", FEED_LIMIT).unwrap().is_empty());
    }

    #[test]
    fn test_proxied_url() {
        assert_eq!(
            proxied_url(DEFAULT_PROXY_TEMPLATE, &feed_url("UC1")),
            "https://api.allorigins.win/raw?url=https%3A%2F%2Fwww.youtube.com%2Ffeeds%2Fvideos.xml%3Fchannel_id%3DUC1"
        );
        assert_eq!(proxied_url("http://localhost:3040/feed?u=", "a b"), "http://localhost:3040/feed?u=a%20b");
    }

    #[tokio::test]
    async fn test_service_loads_through_proxy() {
        let fetcher = Arc::new(Canned {
            body: Ok(atom(6)),
            seen: Mutex::new(Vec::new()),
        });
        let service = FeedService::new(fetcher.clone(), DEFAULT_PROXY_TEMPLATE);
        let entries = service.load("UC123").await;
        assert_eq!(entries.len(), 4);
        let seen = fetcher.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("channel_id%3DUC123"));
    }

    #[tokio::test]
    async fn test_service_swallows_errors() {
        let fetcher = Arc::new(Canned {
            body: Err("connection refused".into()),
            seen: Mutex::new(Vec::new()),
        });
        let service = FeedService::new(fetcher, DEFAULT_PROXY_TEMPLATE);
        assert!(service.load("UC123").await.is_empty());
        assert!(service.try_load("UC123").await.is_err());
    }

    #[test]
    fn test_table_generation_guard() {
        let mut table = EnrichmentTable::new();
        let first = table.begin("yt", "UC1");
        assert!(table.is_loading("yt"));

        table.dispose("yt");
        let entries = parse_feed(&atom(2), FEED_LIMIT).unwrap();
        assert!(!table.complete(&first, entries.clone()));
        assert!(table.state("yt").is_none());

        // remount: the old ticket is still stale
        let second = table.begin("yt", "UC1");
        assert!(!table.complete(&first, entries.clone()));
        assert!(table.is_loading("yt"));
        assert!(table.complete(&second, entries));
        assert_eq!(table.entries("yt").len(), 2);
    }

    #[test]
    fn test_table_empty_result() {
        let mut table = EnrichmentTable::new();
        let req = table.begin("yt", "UC1");
        assert!(table.complete(&req, Vec::new()));
        assert_eq!(table.state("yt"), Some(&EnrichmentState::Empty));
        assert!(table.entries("yt").is_empty());
        assert!(!table.is_loading("yt"));
    }
}
