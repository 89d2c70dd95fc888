//! bentogrid - link-in-bio bento grid renderer
//!
//! Turns a declarative profile dataset (a profile record plus an ordered
//! list of heterogeneous blocks) into a responsive grid page.
//!
//! ## Architecture
//!
//! The core is headless and shared by every target:
//! - **Layout** (`ui_core`): explicit desktop placement, deterministic
//!   narrow-viewport reflow
//! - **Renderer** (`render`): one tagged render mode per block, derived
//!   styles, click destinations, HTML
//! - **Enrichment** (`feed`): best-effort recent-video fetch for channel
//!   blocks, kept in a side table keyed by block id
//! - **Session** (`app`): owns runtime state, handles UI actions
//!
//! Targets:
//! - **Native** (`bentogrid`): render a dataset to static HTML or JSON
//! - **Proxy** (`bentogrid-proxy`): axum server for pages and feed relay
//! - **Web** (`bentogrid-web-dom`): wasm façade driving the DOM
//!
//! ```bash
//! cargo run --bin bentogrid -- --data bento.json --out index.html
//! cargo run --bin bentogrid-proxy --features proxy
//! ```

// Core modules (available on all platforms)
pub mod config;
pub mod dataset;
pub mod social;
pub mod types;
pub mod util_text;

// Layout engine and viewport policy
pub mod ui_core;

// Renderer: mode dispatch, styles, destinations, markup
pub mod render;

// Feed enrichment (reqwest on both platforms)
pub mod feed;

// Pointer tilt math
pub mod tilt;

// Usage beacon
pub mod analytics;

// Headless page session
pub mod app;

// Theme system (design tokens + palette)
pub mod theme;

// Page feature flags (available on all platforms)
pub mod flags;

// Debug logging system (available on all platforms)
pub mod debug;

// UI snapshot types for DOM-based rendering (all platforms)
pub mod ui_snapshot;

// Platform abstraction layer
pub mod platform;

// Browser navigation bridge (no-op on native)
pub mod webshim;

// Re-export commonly used types
pub use app::{Effect, PageSession};
pub use config::Config;
pub use social::PlatformRegistry;
pub use types::{BlockKind, BlockRecord, Dataset, FeedEntry};
pub use ui_core::ViewportClass;
