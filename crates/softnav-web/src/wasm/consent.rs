#![forbid(unsafe_code)]

//! Cookie-consent banner.
//!
//! Shown only while consent is undecided. Accepting or declining writes the
//! client-visible cookie first (so the banner disappears without waiting on
//! the network), then acknowledges to the server, fire-and-forget.

use std::cell::RefCell;

use gloo_net::http::Request;
use softnav_core::consent::{ACCEPT_PATH, DECLINE_PATH, consent_cookie, consent_state};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Event, HtmlDocument, HtmlElement};

use super::dom;
use crate::ids;

struct ConsentBanner {
    _accept: Option<Closure<dyn FnMut(Event)>>,
    _decline: Option<Closure<dyn FnMut(Event)>>,
}

thread_local! {
    static CONSENT: RefCell<Option<ConsentBanner>> = const { RefCell::new(None) };
}

pub(crate) fn init(document: &Document) {
    let Some(html_document) = document.dyn_ref::<HtmlDocument>().cloned() else {
        return;
    };
    let cookies = html_document.cookie().unwrap_or_default();
    if !consent_state(&cookies).needs_banner() {
        return;
    }
    let Some(banner) = dom::element_by_id::<HtmlElement>(document, ids::COOKIE_BANNER) else {
        return;
    };
    let _ = banner.style().set_property("display", "block");

    let accept = wire_choice(
        document,
        ids::COOKIE_ACCEPT,
        html_document.clone(),
        banner.clone(),
        true,
    );
    let decline = wire_choice(document, ids::COOKIE_DECLINE, html_document, banner, false);

    CONSENT.with(|slot| {
        *slot.borrow_mut() = Some(ConsentBanner {
            _accept: accept,
            _decline: decline,
        });
    });
}

fn wire_choice(
    document: &Document,
    id: &str,
    html_document: HtmlDocument,
    banner: HtmlElement,
    accepted: bool,
) -> Option<Closure<dyn FnMut(Event)>> {
    let button = dom::element_by_id::<HtmlElement>(document, id)?;
    let closure = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_event: Event| {
        if let Err(err) = html_document.set_cookie(&consent_cookie(accepted)) {
            log::warn!("consent cookie write failed: {err:?}");
        }
        let _ = banner.style().set_property("display", "none");

        let path = if accepted { ACCEPT_PATH } else { DECLINE_PATH };
        spawn_local(async move {
            if let Err(err) = Request::get(path).send().await {
                log::warn!("consent acknowledgement failed: {err}");
            }
        });
    }));
    button
        .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
        .ok()?;
    Some(closure)
}
