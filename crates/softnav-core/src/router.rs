#![forbid(unsafe_code)]

//! Partial-navigation state machine.
//!
//! The router owns the decision logic of in-app navigation: whether a link
//! click is intercepted at all, and what to do with the fragment (or failure)
//! the host's fetch eventually produces. It deliberately performs no I/O; the
//! host calls [`Router::begin`] when a navigation starts and
//! [`Router::resolve`] when its fetch settles.
//!
//! Rapid navigations race: the host never cancels an in-flight fetch, so a
//! slow response for an old navigation can arrive after a newer one already
//! started. Each navigation gets a monotonically increasing sequence number,
//! and resolving a ticket that is no longer the latest yields
//! [`NavResolution::Stale`], which the host must drop before any DOM write.

use log::{debug, warn};

/// Header added to fragment requests so the server can answer with a partial
/// document instead of a full page.
pub const AJAX_HEADER_NAME: &str = "X-Requested-With";
/// Value sent with [`AJAX_HEADER_NAME`].
pub const AJAX_HEADER_VALUE: &str = "XMLHttpRequest";

/// Selector of the single content container swapped on navigation.
pub const CONTENT_CONTAINER: &str = "main";

/// Anchors carrying this attribute opt out of interception and take the
/// default browser navigation.
pub const OPT_OUT_ATTR: &str = "data-no-ajax";

/// What started a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTrigger {
    /// An intercepted click on an internal anchor.
    Link,
    /// A browser back/forward event. The browser already moved its history
    /// stack, so a successful swap must not push a new entry.
    PopState,
}

impl NavTrigger {
    /// Whether a successful navigation for this trigger pushes a history
    /// entry.
    #[must_use]
    pub const fn pushes_history(self) -> bool {
        matches!(self, Self::Link)
    }
}

/// Whether a clicked anchor is handled in-app or left to the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDisposition {
    /// Prevent the default navigation and fetch the target as a fragment.
    Intercept,
    /// Let the browser navigate normally.
    Browser,
}

/// Classify an anchor click.
///
/// An anchor qualifies for interception only when its origin equals the
/// current page's origin and it does not carry the opt-out marker. No path
/// normalization happens here; origins are compared as the host reports them.
#[must_use]
pub fn link_disposition(
    page_origin: &str,
    anchor_origin: &str,
    opted_out: bool,
) -> LinkDisposition {
    if opted_out || page_origin != anchor_origin {
        LinkDisposition::Browser
    } else {
        LinkDisposition::Intercept
    }
}

/// Result of the host's fragment fetch, as pushed into [`Router::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response contained the content container; payload is its inner
    /// HTML.
    Fragment(String),
    /// The response parsed but had no content container.
    MissingContainer,
    /// The fetch itself failed (network error, unparsable body).
    Failed(String),
}

/// Handle for one in-flight navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavTicket {
    seq: u64,
    url: String,
    push_history: bool,
}

impl NavTicket {
    /// Target URL of this navigation.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether a successful swap for this ticket pushes a history entry.
    #[must_use]
    pub const fn pushes_history(&self) -> bool {
        self.push_history
    }
}

/// What the host must do after a navigation settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavResolution {
    /// Replace the content container with `html`, then run route
    /// initializers for `url`, then (if `push_history`) push `{path: url}`.
    Swap {
        html: String,
        url: String,
        push_history: bool,
    },
    /// Abandon the partial flow and perform a full browser load of `url`.
    FullLoad { url: String },
    /// The ticket is no longer current (superseded by a newer navigation or
    /// already settled); drop the response.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Navigating { seq: u64 },
}

/// Two-phase navigation state machine: Idle (showing some path) and
/// Navigating (fetch and transition in flight).
#[derive(Debug)]
pub struct Router {
    seq: u64,
    phase: Phase,
}

impl Router {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            seq: 0,
            phase: Phase::Idle,
        }
    }

    /// Start a navigation to `url`, superseding any navigation still in
    /// flight.
    pub fn begin(&mut self, url: impl Into<String>, trigger: NavTrigger) -> NavTicket {
        let url = url.into();
        self.seq += 1;
        self.phase = Phase::Navigating { seq: self.seq };
        debug!("navigation {} -> {url} ({trigger:?})", self.seq);
        NavTicket {
            seq: self.seq,
            url,
            push_history: trigger.pushes_history(),
        }
    }

    /// Whether `ticket` is still the latest navigation.
    #[must_use]
    pub fn is_latest(&self, ticket: &NavTicket) -> bool {
        ticket.seq == self.seq
    }

    /// Settle a navigation with its fetch outcome.
    ///
    /// A ticket that is not the in-flight latest resolves to
    /// [`NavResolution::Stale`] without touching the phase; whatever
    /// superseded it still owns the state machine.
    pub fn resolve(&mut self, ticket: &NavTicket, outcome: FetchOutcome) -> NavResolution {
        if !self.is_navigating() || !self.is_latest(ticket) {
            debug!(
                "navigation {} no longer current (latest {}); dropping response",
                ticket.seq, self.seq
            );
            return NavResolution::Stale;
        }
        self.phase = Phase::Idle;
        match outcome {
            FetchOutcome::Fragment(html) => NavResolution::Swap {
                html,
                url: ticket.url.clone(),
                push_history: ticket.push_history,
            },
            FetchOutcome::MissingContainer => {
                warn!("no content container in response for {}", ticket.url);
                NavResolution::FullLoad {
                    url: ticket.url.clone(),
                }
            }
            FetchOutcome::Failed(err) => {
                warn!("navigation to {} failed: {err}", ticket.url);
                NavResolution::FullLoad {
                    url: ticket.url.clone(),
                }
            }
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    #[must_use]
    pub fn is_navigating(&self) -> bool {
        matches!(self.phase, Phase::Navigating { .. })
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn link_click_swaps_and_pushes_history() {
        let mut router = Router::new();
        let ticket = router.begin("/info", NavTrigger::Link);
        assert!(router.is_navigating());

        let resolution = router.resolve(&ticket, FetchOutcome::Fragment("<p>hi</p>".into()));
        assert_eq!(
            resolution,
            NavResolution::Swap {
                html: "<p>hi</p>".into(),
                url: "/info".into(),
                push_history: true,
            }
        );
        assert!(router.is_idle());
    }

    #[test]
    fn popstate_suppresses_history_push() {
        let mut router = Router::new();
        let ticket = router.begin("/bot", NavTrigger::PopState);
        match router.resolve(&ticket, FetchOutcome::Fragment(String::new())) {
            NavResolution::Swap { push_history, .. } => assert!(!push_history),
            other => panic!("expected swap, got {other:?}"),
        }
    }

    #[test]
    fn missing_container_falls_back_to_full_load() {
        let mut router = Router::new();
        let ticket = router.begin("/admin", NavTrigger::Link);
        let resolution = router.resolve(&ticket, FetchOutcome::MissingContainer);
        assert_eq!(
            resolution,
            NavResolution::FullLoad {
                url: "/admin".into()
            }
        );
    }

    #[test]
    fn fetch_failure_falls_back_to_full_load() {
        let mut router = Router::new();
        let ticket = router.begin("/info", NavTrigger::Link);
        let resolution = router.resolve(&ticket, FetchOutcome::Failed("timeout".into()));
        assert_eq!(resolution, NavResolution::FullLoad { url: "/info".into() });
    }

    #[test]
    fn superseded_response_is_discarded() {
        let mut router = Router::new();
        let first = router.begin("/bot", NavTrigger::Link);
        let second = router.begin("/info", NavTrigger::Link);

        // The slow first response arrives after the second navigation began.
        let late = router.resolve(&first, FetchOutcome::Fragment("old".into()));
        assert_eq!(late, NavResolution::Stale);
        assert!(router.is_navigating());

        let current = router.resolve(&second, FetchOutcome::Fragment("new".into()));
        match current {
            NavResolution::Swap { html, .. } => assert_eq!(html, "new"),
            other => panic!("expected swap, got {other:?}"),
        }
        assert!(router.is_idle());
    }

    #[test]
    fn settling_the_same_ticket_twice_is_stale() {
        let mut router = Router::new();
        let ticket = router.begin("/bot", NavTrigger::Link);
        assert!(matches!(
            router.resolve(&ticket, FetchOutcome::Fragment(String::new())),
            NavResolution::Swap { .. }
        ));
        assert_eq!(
            router.resolve(&ticket, FetchOutcome::Fragment(String::new())),
            NavResolution::Stale
        );
    }

    #[test]
    fn internal_links_intercepted_external_and_opted_out_are_not() {
        let origin = "https://app.example";
        assert_eq!(
            link_disposition(origin, origin, false),
            LinkDisposition::Intercept
        );
        assert_eq!(
            link_disposition(origin, "https://elsewhere.example", false),
            LinkDisposition::Browser
        );
        assert_eq!(
            link_disposition(origin, origin, true),
            LinkDisposition::Browser
        );
    }
}
