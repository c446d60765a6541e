#![forbid(unsafe_code)]

//! Element ids the page fragments are expected to carry.
//!
//! A controller whose ids are absent from the current fragment aborts its
//! initialization silently; that is the normal case whenever another route's
//! fragment is displayed.

/// Chat panel.
pub const CHAT_FORM: &str = "chat-form";
pub const CHAT_MESSAGES: &str = "messages";
pub const CHAT_INPUT: &str = "message-input";
pub const CHAT_RECORD: &str = "record-btn";

/// Admin panel.
pub const ADMIN_USER_SELECT: &str = "user-select";
pub const ADMIN_REFRESH: &str = "refresh-logs";
pub const ADMIN_EXPORT: &str = "export-btn";
pub const ADMIN_CLEAR: &str = "clear-btn";

/// Info panel.
pub const INFO_ABOUT: &str = "about-me";
pub const INFO_PROJECT: &str = "project-summary";
pub const INFO_SAVE: &str = "save-summary";
pub const INFO_CLEAR: &str = "clear-summary";

/// Shell chrome.
pub const COOKIE_BANNER: &str = "cookie-banner";
pub const COOKIE_ACCEPT: &str = "accept-cookies";
pub const COOKIE_DECLINE: &str = "decline-cookies";
pub const CURRENT_USER_BADGE: &str = "current-user";
