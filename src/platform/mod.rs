//! Platform abstraction: detached tasks on the native or browser executor.

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        mod runtime_wasm;
        pub use runtime_wasm::*;
    } else {
        mod runtime_native;
        pub use runtime_native::*;
    }
}
