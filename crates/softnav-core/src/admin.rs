#![forbid(unsafe_code)]

//! Admin panel rules: user listing, log-view URLs, and the gated clear
//! action.
//!
//! The destructive clear is gated twice. A user must be selected, and the
//! host must obtain an explicit confirmation; [`clear_decision`] encodes that
//! order, so a declined confirmation (or no selection) yields a decision
//! under which the host issues zero network requests.

use serde::{Deserialize, Serialize};

/// Log view, also the partial-fragment endpoint.
pub const ADMIN_PATH: &str = "/admin";
/// JSON user list.
pub const ADMIN_USERS_PATH: &str = "/admin/users";
/// CSV export, opened in a new tab.
pub const ADMIN_EXPORT_PATH: &str = "/admin/export";
/// Destructive clear endpoint.
pub const ADMIN_CLEAR_PATH: &str = "/admin/clear";

/// Alert shown when clear is used with no user selected.
pub const SELECT_USER_NOTICE: &str = "Select a user first";
/// Alert shown after a successful clear.
pub const CLEARED_NOTICE: &str = "Events cleared";
/// Alert shown when the clear request itself failed.
pub const CLEAR_REQUEST_FAILED: &str = "Request failed";

/// One row of the user selector.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdminUser {
    pub id: String,
    #[serde(default)]
    pub info: Option<String>,
}

impl AdminUser {
    /// Label shown in the selector option.
    #[must_use]
    pub fn option_label(&self) -> String {
        match self.info.as_deref() {
            Some(info) if !info.is_empty() => format!("{} — {info}", self.id),
            _ => self.id.clone(),
        }
    }
}

/// Log-view URL for an optional user filter.
#[must_use]
pub fn logs_url(user_id: Option<&str>) -> String {
    with_user_param(ADMIN_PATH, user_id)
}

/// Export URL for an optional user filter.
#[must_use]
pub fn export_url(user_id: Option<&str>) -> String {
    with_user_param(ADMIN_EXPORT_PATH, user_id)
}

fn with_user_param(base: &str, user_id: Option<&str>) -> String {
    match user_id {
        Some(id) if !id.is_empty() => format!("{base}?user_id={}", urlencoding::encode(id)),
        _ => base.to_string(),
    }
}

/// Confirmation prompt for clearing one user's events.
#[must_use]
pub fn clear_prompt(user_id: &str) -> String {
    format!("Clear all events for user {user_id}? This cannot be undone.")
}

/// Body of `POST /admin/clear`.
#[derive(Debug, Serialize)]
pub struct ClearRequest<'a> {
    pub user_id: &'a str,
}

/// Response of `POST /admin/clear`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClearOutcome {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl ClearOutcome {
    /// Alert text for a server-reported failure.
    #[must_use]
    pub fn failure_message(&self) -> String {
        format!("Failed: {}", self.error.as_deref().unwrap_or("unknown"))
    }
}

/// Result of the clear gating sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearDecision<'a> {
    /// No user selected; notify and stop.
    NoUserSelected,
    /// Confirmation declined; stop silently.
    Declined,
    /// Both gates passed; issue the request for this user.
    Proceed(&'a str),
}

/// Run the gating sequence. `confirm` is only consulted once a user is
/// selected.
pub fn clear_decision<'a>(
    selected: Option<&'a str>,
    confirm: impl FnOnce(&str) -> bool,
) -> ClearDecision<'a> {
    let Some(id) = selected.filter(|id| !id.is_empty()) else {
        return ClearDecision::NoUserSelected;
    };
    if confirm(id) {
        ClearDecision::Proceed(id)
    } else {
        ClearDecision::Declined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn option_label_includes_info_when_present() {
        let user: AdminUser =
            serde_json::from_str(r#"{"id":"42","info":"first visit"}"#).expect("valid json");
        assert_eq!(user.option_label(), "42 — first visit");

        let bare: AdminUser = serde_json::from_str(r#"{"id":"42"}"#).expect("valid json");
        assert_eq!(bare.option_label(), "42");
    }

    #[test]
    fn urls_encode_the_user_filter() {
        assert_eq!(logs_url(None), "/admin");
        assert_eq!(logs_url(Some("")), "/admin");
        assert_eq!(logs_url(Some("42")), "/admin?user_id=42");
        assert_eq!(
            logs_url(Some("a b&c")),
            "/admin?user_id=a%20b%26c"
        );
        assert_eq!(export_url(Some("42")), "/admin/export?user_id=42");
    }

    #[test]
    fn clear_without_selection_never_asks_for_confirmation() {
        let decision = clear_decision(None, |_| panic!("confirm must not run"));
        assert_eq!(decision, ClearDecision::NoUserSelected);
        let decision = clear_decision(Some(""), |_| panic!("confirm must not run"));
        assert_eq!(decision, ClearDecision::NoUserSelected);
    }

    #[test]
    fn declined_confirmation_stops_the_clear() {
        assert_eq!(clear_decision(Some("42"), |_| false), ClearDecision::Declined);
        assert_eq!(
            clear_decision(Some("42"), |_| true),
            ClearDecision::Proceed("42")
        );
    }

    #[test]
    fn clear_request_serializes_as_json_object() {
        let body = serde_json::to_string(&ClearRequest { user_id: "42" }).expect("serializable");
        assert_eq!(body, r#"{"user_id":"42"}"#);
    }

    #[test]
    fn failure_message_falls_back_to_unknown() {
        let outcome: ClearOutcome = serde_json::from_str(r#"{"ok":false}"#).expect("valid json");
        assert_eq!(outcome.failure_message(), "Failed: unknown");
        let outcome: ClearOutcome =
            serde_json::from_str(r#"{"ok":false,"error":"no such user"}"#).expect("valid json");
        assert_eq!(outcome.failure_message(), "Failed: no such user");
    }
}
