//! Page server and feed relay for the bentogrid web frontend
//!
//! Serves the rendered page for one dataset and relays YouTube channel
//! feeds with permissive CORS, so the wasm frontend can point its feed
//! proxy template at this server instead of a public relay.
//!
//! ## Endpoints
//! - GET /health - Health check
//! - GET / - Rendered page (feeds enriched per request)
//! - GET /snapshot?viewport=narrow - Page snapshot as JSON
//! - GET /feed/:channel_id - Raw Atom feed for a channel
//! - GET /feed/:channel_id/entries - Parsed recent entries as JSON
//! - GET /raw?url=<feed url> - Same relay, addressed the way proxy
//!   templates address it (`http://host:3040/raw?url={url}`)
//!
//! ## Usage
//! ```bash
//! cargo run --bin bentogrid-proxy --features proxy -- --data bento.json
//! ```

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, Method, StatusCode},
    response::{Html, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use bentogrid::{
    config::load,
    dataset, debug,
    feed::{self, FeedFetcher, FeedService, HttpFeedFetcher, FEED_LIMIT},
    ui_snapshot::PageSnapshot,
    Dataset, FeedEntry, PageSession, PlatformRegistry, ViewportClass,
};

/// Application state shared across handlers
struct AppState {
    dataset: Dataset,
    registry: PlatformRegistry,
    flags: bentogrid::flags::PageFlags,
    viewport: ViewportClass,
    /// Pages enrich through this (honors the configured proxy template).
    service: FeedService,
    /// The relay endpoints fetch YouTube directly.
    direct: HttpFeedFetcher,
}

type Shared = Arc<AppState>;

#[derive(Debug, Deserialize)]
struct SnapshotQuery {
    viewport: Option<ViewportClass>,
}

#[derive(Debug, Deserialize)]
struct RawQuery {
    url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    debug::init_once();

    let cfg = load()?;
    let data = dataset::load(&cfg.data_path)?;

    log::info!("bentogrid proxy");
    log::info!("Dataset: {} ({} blocks)", cfg.data_path.display(), data.blocks.len());
    log::info!("Feed proxy: {}", cfg.feed_proxy);
    log::info!("Feed timeout: {}ms", cfg.feed_timeout_ms);
    log::info!("Port: {}", cfg.port);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    let state = Arc::new(AppState {
        dataset: data,
        registry: PlatformRegistry::builtin(),
        flags: cfg.flags(),
        viewport: cfg.viewport,
        service: FeedService::http(cfg.feed_timeout_ms, cfg.feed_proxy.clone()),
        direct: HttpFeedFetcher::new(cfg.feed_timeout_ms),
    });

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/", get(page_handler))
        .route("/snapshot", get(snapshot_handler))
        .route("/feed/:channel_id", get(feed_xml_handler))
        .route("/feed/:channel_id/entries", get(feed_entries_handler))
        .route("/raw", get(raw_handler))
        .layer(cors)
        .with_state(state);

    let addr = format!("0.0.0.0:{}", cfg.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("[proxy] listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

/// Fresh session per request; enrichment state never outlives a page.
async fn session_for(state: &AppState, viewport: ViewportClass) -> PageSession {
    let mut session = PageSession::new(state.dataset.clone(), state.registry.clone(), state.flags, viewport);
    if state.flags.enrich_feeds {
        session.enrich_all(&state.service).await;
    } else {
        session.start();
    }
    session
}

async fn page_handler(State(state): State<Shared>) -> Html<String> {
    let session = session_for(&state, state.viewport).await;
    Html(session.render_page())
}

async fn snapshot_handler(
    State(state): State<Shared>,
    Query(q): Query<SnapshotQuery>,
) -> Json<PageSnapshot> {
    let session = session_for(&state, q.viewport.unwrap_or(state.viewport)).await;
    Json(session.snapshot())
}

fn valid_channel_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Relay the channel's Atom feed unchanged
async fn feed_xml_handler(
    Path(channel_id): Path<String>,
    State(state): State<Shared>,
) -> Result<Response<Body>, StatusCode> {
    if !valid_channel_id(&channel_id) {
        return Err(StatusCode::BAD_REQUEST);
    }
    relay(&state, &feed::feed_url(&channel_id)).await
}

/// Template-style relay; only YouTube channel feeds are forwarded.
async fn raw_handler(
    State(state): State<Shared>,
    Query(q): Query<RawQuery>,
) -> Result<Response<Body>, StatusCode> {
    let channel_id = q
        .url
        .strip_prefix(&feed::feed_url(""))
        .filter(|id| valid_channel_id(id))
        .ok_or(StatusCode::BAD_REQUEST)?;
    relay(&state, &feed::feed_url(channel_id)).await
}

async fn relay(state: &AppState, url: &str) -> Result<Response<Body>, StatusCode> {
    log::debug!("[proxy] relaying {}", url);

    let body = state.direct.fetch_text(url).await.map_err(|e| {
        log::warn!("[proxy] relay {}: {e:#}", url);
        StatusCode::BAD_GATEWAY
    })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/atom+xml; charset=utf-8")
        .body(Body::from(body))
        .map_err(|e| {
            log::error!("Failed to build response: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// Parsed entries; an unreachable or malformed feed is a 502
async fn feed_entries_handler(
    Path(channel_id): Path<String>,
    State(state): State<Shared>,
) -> Result<Json<Vec<FeedEntry>>, StatusCode> {
    if !valid_channel_id(&channel_id) {
        return Err(StatusCode::BAD_REQUEST);
    }

    let body = state
        .direct
        .fetch_text(&feed::feed_url(&channel_id))
        .await
        .map_err(|e| {
            log::warn!("[proxy] entries {}: {e:#}", channel_id);
            StatusCode::BAD_GATEWAY
        })?;

    let entries = feed::parse_feed(&body, FEED_LIMIT).map_err(|e| {
        log::warn!("[proxy] parse {}: {e:#}", channel_id);
        StatusCode::BAD_GATEWAY
    })?;

    Ok(Json(entries))
}
