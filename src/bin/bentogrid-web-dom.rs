#![cfg_attr(target_arch = "wasm32", no_main)]

// DOM-based web frontend for bentogrid.
//
// JS side:
//   import init, { WasmPage } from "./bentogrid-web-dom.js";
//   const page = new WasmPage(datasetJson, null);
//   let snap = JSON.parse(page.start());
//   // each frame: if (page.poll_feeds()) snap = JSON.parse(page.snapshot_json());
//   snap = JSON.parse(page.handle_action_json(JSON.stringify({ type: "Click", block_id: "a" })));

#[cfg(target_arch = "wasm32")]
mod web {
    use std::sync::Arc;

    use tokio::sync::mpsc::{error::TryRecvError, unbounded_channel, UnboundedReceiver, UnboundedSender};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::window;

    use bentogrid::{
        analytics::{ClientInfo, HttpBeacon, Tracker},
        dataset::{self, Format},
        feed::{FeedRequest, FeedService},
        flags::PageFlags,
        theme::Theme,
        ui_core::policy::DESKTOP_MIN_WIDTH_PX,
        ui_snapshot::UiAction,
        webshim, Config, Effect, FeedEntry, PageSession, PlatformRegistry, ViewportClass,
    };

    type FeedResult = (FeedRequest, anyhow::Result<Vec<FeedEntry>>);

    /// Runs once when the module loads.
    #[wasm_bindgen(start)]
    pub fn wasm_start() {
        console_error_panic_hook::set_once();
        wasm_logger::init(wasm_logger::Config::default());
        bentogrid::debug::init_once();
    }

    fn window_width() -> u32 {
        window()
            .and_then(|w| w.inner_width().ok())
            .and_then(|v| v.as_f64())
            .map(|w| w.max(0.0) as u32)
            .unwrap_or(DESKTOP_MIN_WIDTH_PX)
    }

    fn client_info() -> ClientInfo {
        let Some(win) = window() else {
            return ClientInfo::default();
        };
        let (screen_w, screen_h) = match win.screen() {
            Ok(s) => (
                s.width().ok().map(|w| w.max(0) as u32),
                s.height().ok().map(|h| h.max(0) as u32),
            ),
            Err(_) => (None, None),
        };
        ClientInfo {
            page_url: win.location().href().unwrap_or_default(),
            referrer: win.document().map(|d| d.referrer()).filter(|r| !r.is_empty()),
            language: win.navigator().language(),
            screen_w,
            screen_h,
        }
    }

    /// Inject the palette as `:root` custom properties.
    fn inject_theme(theme: &Theme) {
        let Some(doc) = window().and_then(|w| w.document()) else {
            return;
        };
        let style = match doc.create_element("style") {
            Ok(el) => el,
            Err(e) => {
                log::warn!("[theme] Failed to create style element: {:?}", e);
                return;
            }
        };
        style.set_text_content(Some(&theme.to_css_vars()));
        if let Some(head) = doc.head() {
            if let Err(e) = head.append_child(&style) {
                log::warn!("[theme] Failed to inject CSS vars: {:?}", e);
            }
        }
    }

    /// Wasm-exposed page wrapper.
    ///
    /// Holds the headless session and a receiver for finished feed fetches.
    #[wasm_bindgen]
    pub struct WasmPage {
        session: PageSession,
        service: FeedService,
        feed_tx: UnboundedSender<FeedResult>,
        feed_rx: UnboundedReceiver<FeedResult>,
    }

    #[wasm_bindgen]
    impl WasmPage {
        /// Parse the dataset and set up the session. `feed_proxy` overrides
        /// the public relay template.
        #[wasm_bindgen(constructor)]
        pub fn new(dataset_json: String, feed_proxy: Option<String>) -> Result<WasmPage, JsValue> {
            let data = dataset::parse(&dataset_json, Format::Json)
                .map_err(|e| JsValue::from_str(&format!("{e:#}")))?;

            let profile = &data.profile;
            let theme = Theme::from_profile(profile.theme.as_deref(), profile.background_color.as_deref());
            theme.audit();
            inject_theme(&theme);

            let tracker = profile.analytics.as_ref().and_then(|cfg| {
                HttpBeacon::from_config(cfg)
                    .map(|beacon| Tracker::new(cfg.site_id.clone(), client_info(), Arc::new(beacon)))
            });

            let viewport = ViewportClass::from_width(window_width());
            let mut session = PageSession::new(data, PlatformRegistry::builtin(), PageFlags::default(), viewport);
            if let Some(tracker) = tracker {
                session = session.with_tracker(tracker);
            }

            let defaults = Config::default();
            let template = feed_proxy.filter(|p| !p.is_empty()).unwrap_or(defaults.feed_proxy);
            let (feed_tx, feed_rx) = unbounded_channel();

            log::info!("[session] page ready ({viewport})");
            Ok(WasmPage {
                session,
                service: FeedService::http(defaults.feed_timeout_ms, template),
                feed_tx,
                feed_rx,
            })
        }

        /// Mount every block, kick off feed fetches, return the first snapshot.
        #[wasm_bindgen]
        pub fn start(&mut self) -> String {
            for request in self.session.start() {
                self.spawn_fetch(request);
            }
            self.snapshot_json()
        }

        #[wasm_bindgen]
        pub fn mount(&mut self, block_id: String) {
            if let Some(request) = self.session.mount(&block_id) {
                self.spawn_fetch(request);
            }
        }

        #[wasm_bindgen]
        pub fn unmount(&mut self, block_id: String) {
            self.session.unmount(&block_id);
        }

        /// Apply finished fetches. True when a re-render is due.
        #[wasm_bindgen]
        pub fn poll_feeds(&mut self) -> bool {
            self.drain_feeds()
        }

        /// Get a fresh snapshot as JSON (drains finished fetches first).
        #[wasm_bindgen]
        pub fn snapshot_json(&mut self) -> String {
            self.drain_feeds();
            serde_json::to_string(&self.session.snapshot()).unwrap_or_else(|e| {
                log::error!("Failed to serialize PageSnapshot: {e}");
                "{}".to_string()
            })
        }

        /// Full static document, for pre-rendering.
        #[wasm_bindgen]
        pub fn render_html(&mut self) -> String {
            self.drain_feeds();
            self.session.render_page()
        }

        /// Apply an action (JSON-encoded UiAction) and return an updated snapshot.
        #[wasm_bindgen]
        pub fn handle_action_json(&mut self, action_json: String) -> String {
            match serde_json::from_str::<UiAction>(&action_json) {
                Ok(action) => match self.session.handle(action) {
                    Effect::Navigate(url) => webshim::open_external(&url),
                    Effect::Rerender | Effect::None => {}
                },
                Err(e) => {
                    log::warn!("Failed to deserialize UiAction ({e}): {action_json:?}");
                }
            }
            self.snapshot_json()
        }
    }

    impl WasmPage {
        fn spawn_fetch(&self, request: FeedRequest) {
            let service = self.service.clone();
            let tx = self.feed_tx.clone();
            spawn_local(async move {
                let result = service.try_load(&request.channel_id).await;
                let _ = tx.send((request, result));
            });
        }

        fn drain_feeds(&mut self) -> bool {
            let mut applied = false;
            loop {
                match self.feed_rx.try_recv() {
                    Ok((request, result)) => {
                        applied |= self.session.complete_feed(&request, result);
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        log::warn!("[feed] channel disconnected");
                        break;
                    }
                }
            }
            applied
        }
    }
}

// Native builds: just provide a stub main so `cargo build --all-features` doesn't explode.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("bentogrid-web-dom is only supported on wasm32 (browser) target.");
}
