//! Usage beacon: `page_view` once per session, `click` for navigable clicks.
//!
//! Delivery is best-effort. Sinks never report failures back to the caller
//! and never block rendering or navigation.

use crate::types::AnalyticsConfig;
use serde::Serialize;
use std::sync::{Arc, Mutex};

/// Path of the tracking function below the backend base URL.
pub const TRACK_PATH: &str = "/functions/v1/openbento-analytics-track";

/// `{base without trailing slashes}{TRACK_PATH}`
pub fn endpoint_for(base_url: &str) -> String {
    format!("{}{TRACK_PATH}", base_url.trim_end_matches('/'))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PageView,
    Click,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Utm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Utm {
    /// `utm_*` query parameters of `page_url`; empty values are dropped.
    pub fn from_page_url(page_url: &str) -> Self {
        let mut utm = Utm::default();
        let Ok(url) = url::Url::parse(page_url) else {
            return utm;
        };
        for (key, value) in url.query_pairs() {
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_ref() {
                "utm_source" => &mut utm.source,
                "utm_medium" => &mut utm.medium,
                "utm_campaign" => &mut utm.campaign,
                "utm_term" => &mut utm.term,
                "utm_content" => &mut utm.content,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        utm
    }
}

/// Facts about the viewing client, gathered once per session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub page_url: String,
    pub referrer: Option<String>,
    pub language: Option<String>,
    pub screen_w: Option<u32>,
    pub screen_h: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeaconPayload {
    pub site_id: String,
    pub event: EventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_url: Option<String>,
    pub page_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    pub utm: Utm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_w: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_h: Option<u32>,
}

impl BeaconPayload {
    pub fn new(site_id: &str, event: EventKind, client: &ClientInfo) -> Self {
        Self {
            site_id: site_id.to_string(),
            event,
            block_id: None,
            destination_url: None,
            page_url: client.page_url.clone(),
            referrer: client.referrer.clone().filter(|r| !r.is_empty()),
            utm: Utm::from_page_url(&client.page_url),
            language: client.language.clone(),
            screen_w: client.screen_w,
            screen_h: client.screen_h,
        }
    }
}

/// Where payloads go. `send` returns immediately.
pub trait BeaconSink: Send + Sync {
    fn send(&self, payload: BeaconPayload);
}

/// POSTs JSON to the tracking endpoint on a detached task.
#[derive(Clone, Debug)]
pub struct HttpBeacon {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpBeacon {
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoint: endpoint_for(base_url),
            client: reqwest::Client::new(),
        }
    }

    /// Beacon for an enabled config with a backend URL.
    pub fn from_config(config: &AnalyticsConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        crate::types::non_empty(&config.supabase_url).map(Self::new)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl BeaconSink for HttpBeacon {
    fn send(&self, payload: BeaconPayload) {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        crate::platform::spawn_detached(async move {
            let event = payload.event;
            match client.post(&endpoint).json(&payload).send().await {
                Ok(res) if res.status().is_success() => {
                    log::debug!("[analytics] {event:?} delivered");
                }
                Ok(res) => log::debug!("[analytics] {event:?} rejected: {}", res.status()),
                Err(e) => log::debug!("[analytics] {event:?} failed: {e}"),
            }
        });
    }
}

/// Keeps payloads in memory; used by headless sessions and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryBeacon {
    sent: Arc<Mutex<Vec<BeaconPayload>>>,
}

impl MemoryBeacon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<BeaconPayload> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl BeaconSink for MemoryBeacon {
    fn send(&self, payload: BeaconPayload) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(payload);
        }
    }
}

/// Session-scoped tracker: site id, client facts and a sink.
#[derive(Clone)]
pub struct Tracker {
    site_id: String,
    client: ClientInfo,
    sink: Arc<dyn BeaconSink>,
}

impl Tracker {
    pub fn new(site_id: impl Into<String>, client: ClientInfo, sink: Arc<dyn BeaconSink>) -> Self {
        Self {
            site_id: site_id.into(),
            client,
            sink,
        }
    }

    pub fn page_view(&self) {
        crate::debug::log(crate::debug::cat::ANALYTICS, "page_view");
        self.sink
            .send(BeaconPayload::new(&self.site_id, EventKind::PageView, &self.client));
    }

    pub fn click(&self, block_id: &str, destination: &str) {
        crate::debug::log_with(crate::debug::cat::ANALYTICS, || format!("click {block_id}"));
        let mut payload = BeaconPayload::new(&self.site_id, EventKind::Click, &self.client);
        payload.block_id = Some(block_id.to_string());
        payload.destination_url = Some(destination.to_string());
        self.sink.send(payload);
    }
}
