#![forbid(unsafe_code)]

//! Cookie-consent state, read straight from the document cookie string.
//!
//! The banner shows only while consent is undecided. Accepting or declining
//! writes a client-visible cookie immediately (so the UI settles without a
//! round-trip) and then notifies the server, fire-and-forget.

/// Cookie name holding the consent flag.
pub const CONSENT_COOKIE: &str = "consent";
/// Acknowledgement endpoint after accepting.
pub const ACCEPT_PATH: &str = "/accept_cookies";
/// Acknowledgement endpoint after declining.
pub const DECLINE_PATH: &str = "/decline_cookies";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentState {
    Accepted,
    Declined,
    Undecided,
}

impl ConsentState {
    #[must_use]
    pub const fn needs_banner(self) -> bool {
        matches!(self, Self::Undecided)
    }
}

/// Extract a cookie value from a `name=value; name2=value2` header string.
#[must_use]
pub fn cookie_value(cookie_header: &str, name: &str) -> Option<String> {
    cookie_header
        .split(';')
        .map(str::trim)
        .find_map(|pair| match pair.split_once('=') {
            Some((key, value)) if key == name => Some(value.to_string()),
            _ => None,
        })
}

/// Read the consent flag. Anything other than the exact values written by
/// [`consent_cookie`] counts as undecided.
#[must_use]
pub fn consent_state(cookie_header: &str) -> ConsentState {
    match cookie_value(cookie_header, CONSENT_COOKIE).as_deref() {
        Some("true") => ConsentState::Accepted,
        Some("false") => ConsentState::Declined,
        _ => ConsentState::Undecided,
    }
}

/// Client-visible consent cookie written on accept/decline.
#[must_use]
pub fn consent_cookie(accepted: bool) -> String {
    format!("{CONSENT_COOKIE}={accepted}; path=/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_the_consent_pair_among_other_cookies() {
        let header = "session=abc123; consent=true; theme=dark";
        assert_eq!(consent_state(header), ConsentState::Accepted);
        assert_eq!(cookie_value(header, "theme").as_deref(), Some("dark"));
    }

    #[test]
    fn decline_and_absence_are_distinguished() {
        assert_eq!(consent_state("consent=false"), ConsentState::Declined);
        assert_eq!(consent_state("session=abc123"), ConsentState::Undecided);
        assert_eq!(consent_state(""), ConsentState::Undecided);
    }

    #[test]
    fn unexpected_values_keep_the_banner_up() {
        assert_eq!(consent_state("consent=maybe"), ConsentState::Undecided);
        assert!(consent_state("consent=maybe").needs_banner());
        assert!(!consent_state("consent=true").needs_banner());
    }

    #[test]
    fn written_cookie_round_trips() {
        assert_eq!(consent_cookie(true), "consent=true; path=/");
        assert_eq!(consent_state(&consent_cookie(true)), ConsentState::Accepted);
        assert_eq!(
            consent_state(&consent_cookie(false)),
            ConsentState::Declined
        );
    }
}
