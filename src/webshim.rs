//! Browser bridge for navigation.

#[cfg(target_arch = "wasm32")]
use web_sys::window;

/// Open `url` in a new tab. Callers check navigability first.
#[cfg(target_arch = "wasm32")]
#[inline]
pub fn open_external(url: &str) {
    let Some(win) = window() else {
        log::warn!("[session] no window to open {url}");
        return;
    };
    if let Err(e) = win.open_with_url_and_target_and_features(url, "_blank", NEW_TAB_FEATURES) {
        log::warn!("[session] window.open failed for {url}: {e:?}");
    }
}

/// Native builds have no browsing context; the request is logged.
#[cfg(not(target_arch = "wasm32"))]
pub fn open_external(url: &str) {
    log::info!("[session] open {url}");
}

/// Window features for every external navigation; the opened page gets
/// no handle back to this one.
pub const NEW_TAB_FEATURES: &str = "noopener,noreferrer";
