//! End-to-end navigation cycles against a scripted host.
//!
//! The harness below stands in for the wasm surface: it owns a "content
//! container" string, applies resolutions the way the web layer does (swap
//! vs. full load), and re-runs route initializers after every swap.

use std::cell::RefCell;
use std::rc::Rc;

use softnav_core::transition::{GateSignal, TransitionGate};
use softnav_core::{FetchOutcome, NavResolution, NavTrigger, RouteInitializers, Router};

type InitFn = Box<dyn Fn()>;

struct Host {
    router: Router,
    registry: RouteInitializers<InitFn>,
    container: Option<String>,
    full_loads: Vec<String>,
    history: Vec<String>,
}

impl Host {
    fn new(registry: RouteInitializers<InitFn>) -> Self {
        Self {
            router: Router::new(),
            registry,
            container: Some(String::new()),
            full_loads: Vec::new(),
            history: Vec::new(),
        }
    }

    fn navigate(&mut self, url: &str, trigger: NavTrigger, outcome: FetchOutcome) {
        let ticket = self.router.begin(url, trigger);
        self.settle(&ticket, outcome);
    }

    fn settle(&mut self, ticket: &softnav_core::NavTicket, outcome: FetchOutcome) {
        match self.router.resolve(ticket, outcome) {
            NavResolution::Swap {
                html,
                url,
                push_history,
            } => {
                let mut gate = TransitionGate::new();
                assert!(gate.complete(GateSignal::Timeout));
                self.container = Some(html);
                for init in self.registry.matching(&url) {
                    init();
                }
                if push_history {
                    self.history.push(url);
                }
            }
            NavResolution::FullLoad { url } => {
                self.container = None;
                self.full_loads.push(url);
            }
            NavResolution::Stale => {}
        }
    }
}

#[test]
fn swap_reinitializes_and_pushes_history() {
    let chat_inits = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&chat_inits);
    let registry = RouteInitializers::new().with(
        "/bot",
        Box::new(move || *counter.borrow_mut() += 1) as InitFn,
    );

    let mut host = Host::new(registry);
    host.navigate(
        "/bot",
        NavTrigger::Link,
        FetchOutcome::Fragment("<form id=\"chat-form\"></form>".into()),
    );

    assert_eq!(host.container.as_deref(), Some("<form id=\"chat-form\"></form>"));
    assert_eq!(*chat_inits.borrow(), 1);
    assert_eq!(host.history, vec!["/bot".to_string()]);

    // Back/forward re-fetches but must not grow the history again.
    host.navigate(
        "/bot",
        NavTrigger::PopState,
        FetchOutcome::Fragment("<form id=\"chat-form\"></form>".into()),
    );
    assert_eq!(*chat_inits.borrow(), 2);
    assert_eq!(host.history.len(), 1);
}

#[test]
fn missing_container_degrades_to_full_load_without_a_swap() {
    let registry: RouteInitializers<InitFn> = RouteInitializers::new();
    let mut host = Host::new(registry);
    host.navigate("/info", NavTrigger::Link, FetchOutcome::MissingContainer);

    assert_eq!(host.full_loads, vec!["/info".to_string()]);
    assert!(host.container.is_none());
    assert!(host.history.is_empty());
}

#[test]
fn rapid_navigation_keeps_only_the_last_response() {
    let registry: RouteInitializers<InitFn> = RouteInitializers::new();
    let mut host = Host::new(registry);

    // Two clicks in quick succession; the slow first response lands last.
    let first = host.router.begin("/bot", NavTrigger::Link);
    let second = host.router.begin("/info", NavTrigger::Link);
    host.settle(&second, FetchOutcome::Fragment("info page".into()));
    host.settle(&first, FetchOutcome::Fragment("bot page".into()));

    assert_eq!(host.container.as_deref(), Some("info page"));
    assert_eq!(host.history, vec!["/info".to_string()]);
}
