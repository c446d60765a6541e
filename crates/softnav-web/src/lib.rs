#![forbid(unsafe_code)]

//! WASM surface for softnav.
//!
//! This crate is intentionally host-specific (web/WASM). It wires the
//! host-agnostic engine in `softnav-core` to the real browser:
//! - delegated click interception and `popstate` handling,
//! - fragment fetching and the fade transition around content swaps,
//! - the page controllers (chat, admin, info) re-created on every route
//!   entry,
//! - consent banner, current-user badge, and microphone capture.
//!
//! Everything browser-facing lives behind `cfg(target_arch = "wasm32")`.

pub mod ids;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::app::navigate_to;

/// Native builds compile this crate as a stub so `cargo check --workspace`
/// stays green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
pub fn navigate_to(url: String) {
    let _ = url;
}
