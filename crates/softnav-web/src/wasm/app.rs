#![forbid(unsafe_code)]

//! App shell: boot wiring, navigation orchestration, history.
//!
//! One delegated click handler on the document and one `popstate` handler on
//! the window drive the whole lifecycle. The router and registry live in a
//! thread-local slot; closures attached at boot stay alive for the lifetime
//! of the tab.

use std::cell::RefCell;

use softnav_core::router::{LinkDisposition, OPT_OUT_ATTR, link_disposition};
use softnav_core::{FetchOutcome, NavResolution, NavTicket, NavTrigger, RouteInitializers, Router};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlAnchorElement, MouseEvent, PopStateEvent};

use super::{consent, dom, fetcher, pages, transition, user_badge};

struct App {
    router: Router,
    registry: RouteInitializers<fn(&Document)>,
    _click: Closure<dyn FnMut(MouseEvent)>,
    _popstate: Closure<dyn FnMut(PopStateEvent)>,
    _dom_ready: Option<Closure<dyn FnMut(web_sys::Event)>>,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    if let Err(err) = boot() {
        log::error!("boot failed: {err:?}");
    }
}

/// Programmatic navigation entry point for JS callers.
#[wasm_bindgen]
pub fn navigate_to(url: String) {
    navigate(url, NavTrigger::Link);
}

fn boot() -> Result<(), JsValue> {
    let window = dom::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let click = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(on_document_click));
    document.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;

    let popstate = Closure::<dyn FnMut(PopStateEvent)>::wrap(Box::new(on_popstate));
    window.add_event_listener_with_callback("popstate", popstate.as_ref().unchecked_ref())?;

    // Route initializers need the landing fragment present.
    let dom_loading = document.ready_state() == "loading";
    let dom_ready = if dom_loading {
        let handler = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(|_| on_dom_ready()));
        document.add_event_listener_with_callback(
            "DOMContentLoaded",
            handler.as_ref().unchecked_ref(),
        )?;
        Some(handler)
    } else {
        None
    };

    APP.with(|slot| {
        *slot.borrow_mut() = Some(App {
            router: Router::new(),
            registry: pages::default_registry(),
            _click: click,
            _popstate: popstate,
            _dom_ready: dom_ready,
        });
    });

    consent::init(&document);
    user_badge::init(&document);

    if !dom_loading {
        on_dom_ready();
    }
    Ok(())
}

fn on_dom_ready() {
    let Some(href) = dom::window().and_then(|window| window.location().href().ok()) else {
        return;
    };
    run_initializers(&href);
    // Give the landing entry a state object so the first back-navigation
    // carries a usable path.
    replace_history_state(&href);
}

fn on_document_click(event: MouseEvent) {
    let Some(anchor) = event
        .target()
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
        .and_then(|element| element.closest("a").ok().flatten())
        .and_then(|element| element.dyn_into::<HtmlAnchorElement>().ok())
    else {
        return;
    };
    let Some(page_origin) = dom::page_origin() else {
        return;
    };
    let opted_out = anchor.has_attribute(OPT_OUT_ATTR);
    match link_disposition(&page_origin, &anchor.origin(), opted_out) {
        LinkDisposition::Intercept => {
            event.prevent_default();
            navigate(anchor.href(), NavTrigger::Link);
        }
        LinkDisposition::Browser => {}
    }
}

fn on_popstate(event: PopStateEvent) {
    let path = stored_path(&event.state())
        .or_else(|| dom::window().and_then(|window| window.location().pathname().ok()))
        .unwrap_or_else(|| "/".to_string());
    navigate(path, NavTrigger::PopState);
}

fn stored_path(state: &JsValue) -> Option<String> {
    if state.is_null() || state.is_undefined() {
        return None;
    }
    js_sys::Reflect::get(state, &JsValue::from_str("path"))
        .ok()?
        .as_string()
}

pub(crate) fn navigate(url: String, trigger: NavTrigger) {
    let Some(ticket) = APP.with(|slot| {
        slot.borrow_mut()
            .as_mut()
            .map(|app| app.router.begin(url.as_str(), trigger))
    }) else {
        return;
    };
    spawn_local(async move {
        let outcome = fetcher::fetch_fragment(ticket.url()).await;
        settle(&ticket, outcome).await;
    });
}

async fn settle(ticket: &NavTicket, outcome: FetchOutcome) {
    let Some(resolution) = APP.with(|slot| {
        slot.borrow_mut()
            .as_mut()
            .map(|app| app.router.resolve(ticket, outcome))
    }) else {
        return;
    };
    match resolution {
        NavResolution::Swap {
            html,
            url,
            push_history,
        } => {
            let Some(document) = dom::document() else {
                return;
            };
            let Some(container) = dom::content_container(&document) else {
                // Nothing to swap into; navigate outright.
                dom::full_load(&url);
                return;
            };
            transition::swap_content(&container, &html).await;
            run_initializers(&url);
            if push_history {
                push_history_state(&url);
            }
        }
        NavResolution::FullLoad { url } => dom::full_load(&url),
        NavResolution::Stale => {}
    }
}

/// Run every registered initializer whose prefix matches the path of `url`.
pub(crate) fn run_initializers(url: &str) {
    let Some(path) = dom::pathname_of(url) else {
        return;
    };
    let initializers: Vec<fn(&Document)> = APP.with(|slot| {
        slot.borrow()
            .as_ref()
            .map(|app| app.registry.matching(&path).copied().collect())
            .unwrap_or_default()
    });
    let Some(document) = dom::document() else {
        return;
    };
    for initializer in initializers {
        initializer(&document);
    }
}

pub(crate) fn push_history_state(url: &str) {
    update_history(url, false);
}

fn replace_history_state(url: &str) {
    update_history(url, true);
}

fn update_history(url: &str, replace: bool) {
    let Some(window) = dom::window() else {
        return;
    };
    let Ok(history) = window.history() else {
        return;
    };
    let state = js_sys::Object::new();
    if js_sys::Reflect::set(
        &state,
        &JsValue::from_str("path"),
        &JsValue::from_str(url),
    )
    .is_err()
    {
        return;
    }
    let result = if replace {
        history.replace_state_with_url(&state, "", Some(url))
    } else {
        history.push_state_with_url(&state, "", Some(url))
    };
    if let Err(err) = result {
        log::warn!("history update for {url} failed: {err:?}");
    }
}
