#![forbid(unsafe_code)]

//! Current-user badge payload.
//!
//! Loaded once at boot, best-effort: any failure is logged and the badge is
//! simply left empty.

use serde::Deserialize;

/// JSON endpoint returning the current user, if any.
pub const CURRENT_USER_PATH: &str = "/current_user";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CurrentUser {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub short: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
}

/// Envelope of [`CURRENT_USER_PATH`]; an anonymous visitor gets `{}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentUserEnvelope {
    #[serde(default)]
    pub user: Option<CurrentUser>,
}

impl CurrentUser {
    /// Badge text, preferring the short id.
    #[must_use]
    pub fn badge_text(&self) -> String {
        let short = self
            .short
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.id);
        match self.info.as_deref() {
            Some(info) if !info.is_empty() => format!("User: {short} — {info}"),
            _ => format!("User: {short}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_prefers_short_id_and_appends_info() {
        let envelope: CurrentUserEnvelope = serde_json::from_str(
            r#"{"user":{"id":"abcde-1234","short":"abcde","info":"returning"}}"#,
        )
        .expect("valid json");
        let user = envelope.user.expect("user present");
        assert_eq!(user.badge_text(), "User: abcde — returning");
    }

    #[test]
    fn badge_falls_back_to_full_id() {
        let user = CurrentUser {
            id: "xyz".into(),
            short: None,
            info: None,
        };
        assert_eq!(user.badge_text(), "User: xyz");
    }

    #[test]
    fn anonymous_envelope_has_no_user() {
        let envelope: CurrentUserEnvelope = serde_json::from_str("{}").expect("valid json");
        assert!(envelope.user.is_none());
    }
}
