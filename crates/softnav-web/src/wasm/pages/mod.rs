#![forbid(unsafe_code)]

//! Page controllers, one per route prefix.
//!
//! A controller is a value owning its DOM handles and listener closures.
//! Every route entry rebuilds the value from scratch and drops the previous
//! one; nothing is patched incrementally, so repeated initializations cannot
//! accumulate listeners.

pub(crate) mod admin;
pub(crate) mod chat;
pub(crate) mod info;

use softnav_core::RouteInitializers;
use softnav_core::admin::ADMIN_PATH;
use softnav_core::chat::CHAT_FALLBACK_PATH;
use softnav_core::notes::INFO_PATH;
use web_sys::Document;

/// The fixed route table, built once at boot and handed to the app.
pub(crate) fn default_registry() -> RouteInitializers<fn(&Document)> {
    RouteInitializers::new()
        .with(CHAT_FALLBACK_PATH, chat::init as fn(&Document))
        .with(INFO_PATH, info::init as fn(&Document))
        .with(ADMIN_PATH, admin::init as fn(&Document))
}
