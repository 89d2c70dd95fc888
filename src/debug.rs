//! Filterable debug logging for high-frequency paths
//!
//! Categories: LAYOUT, RENDER, FEED, TILT, CLICK, ANALYTICS
//! Enable via: ?bentodebug=all or localStorage.setItem('bento.debug','tilt,feed') on web,
//! BENTO_DEBUG=layout,render on native.

use std::sync::atomic::{AtomicU32, Ordering};

pub mod cat {
    pub const LAYOUT: u32 = 1 << 0;
    pub const RENDER: u32 = 1 << 1;
    pub const FEED: u32 = 1 << 2;
    pub const TILT: u32 = 1 << 3;
    pub const CLICK: u32 = 1 << 4;
    pub const ANALYTICS: u32 = 1 << 5;
    pub const ALL: u32 = 0xffff_ffff;
}

static MASK: AtomicU32 = AtomicU32::new(0);

#[inline]
pub fn mask() -> u32 {
    MASK.load(Ordering::Relaxed)
}

#[inline]
pub fn set(mask: u32) {
    MASK.store(mask, Ordering::Relaxed)
}

#[inline]
pub fn enable(bits: u32) {
    MASK.fetch_or(bits, Ordering::Relaxed);
}

#[inline]
pub fn disable(bits: u32) {
    MASK.fetch_and(!bits, Ordering::Relaxed);
}

#[inline]
pub fn is(cat: u32) -> bool {
    (MASK.load(Ordering::Relaxed) & cat) != 0
}

#[inline]
pub fn cat_name(cat: u32) -> &'static str {
    match cat {
        c if c == cat::LAYOUT => "layout",
        c if c == cat::RENDER => "render",
        c if c == cat::FEED => "feed",
        c if c == cat::TILT => "tilt",
        c if c == cat::CLICK => "click",
        c if c == cat::ANALYTICS => "analytics",
        _ => "misc",
    }
}

/// Parse a comma-separated category list into a mask.
pub fn parse_list(list: &str) -> u32 {
    let mut m: u32 = 0;
    for tok in list.split(',').map(|s| s.trim().to_ascii_lowercase()) {
        match tok.as_str() {
            "" | "none" => m = 0,
            "all" => m = cat::ALL,
            "layout" => m |= cat::LAYOUT,
            "render" => m |= cat::RENDER,
            "feed" => m |= cat::FEED,
            "tilt" => m |= cat::TILT,
            "click" => m |= cat::CLICK,
            "analytics" => m |= cat::ANALYTICS,
            _ => {}
        }
    }
    m
}

#[inline]
pub fn set_from_list(list: &str) {
    set(parse_list(list));
}

#[cfg(target_arch = "wasm32")]
pub fn init_once() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        use web_sys::window;
        if let Some(win) = window() {
            // URL query: ?bentodebug=tilt,feed
            if let Ok(search) = win.location().search() {
                let qs = search.trim_start_matches('?');
                for part in qs.split('&') {
                    let mut it = part.splitn(2, '=');
                    let key = it.next().unwrap_or_default();
                    let val = it.next().unwrap_or_default();
                    if key.eq_ignore_ascii_case("bentodebug") {
                        if let Ok(decoded) = urlencoding::decode(val) {
                            set_from_list(&decoded);
                        }
                    }
                }
            }
            if let Ok(Some(storage)) = win.local_storage() {
                if let Ok(Some(v)) = storage.get_item("bento.debug") {
                    set_from_list(&v);
                }
            }
        }
        log(cat::RENDER, "debug init (wasm) complete");
    });
}

#[cfg(not(target_arch = "wasm32"))]
pub fn init_once() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        if let Ok(list) = std::env::var("BENTO_DEBUG") {
            set_from_list(&list);
        }
    });
}

/// Route a categorized message to the `log` facade when its category is on.
#[inline]
pub fn log(cat: u32, msg: impl AsRef<str>) {
    if !is(cat) {
        return;
    }
    log::debug!("[{}] {}", cat_name(cat), msg.as_ref());
}

/// Like [`log`], but only builds the message when its category is on.
/// Use on per-event paths (pointer moves, per-block rendering).
#[inline]
pub fn log_with(cat: u32, msg: impl FnOnce() -> String) {
    if is(cat) {
        log::debug!("[{}] {}", cat_name(cat), msg());
    }
}
