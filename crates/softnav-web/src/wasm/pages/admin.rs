#![forbid(unsafe_code)]

//! Admin panel controller: user selector, log refresh, export, gated clear.
//!
//! The log view itself is server-rendered; refreshing re-fetches the admin
//! fragment into the content container and rebinds this panel against the
//! fresh subtree. The user list load is best-effort and only logs on
//! failure.

use std::cell::RefCell;

use gloo_net::http::Request;
use softnav_core::FetchOutcome;
use softnav_core::admin::{
    ADMIN_CLEAR_PATH, ADMIN_USERS_PATH, AdminUser, CLEAR_REQUEST_FAILED, CLEARED_NOTICE,
    ClearDecision, ClearOutcome, ClearRequest, SELECT_USER_NOTICE, clear_decision, clear_prompt,
    export_url, logs_url,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Event, HtmlElement, HtmlOptionElement, HtmlSelectElement};

use crate::ids;
use crate::wasm::{app, dom, fetcher};

struct AdminPage {
    _change: Closure<dyn FnMut(Event)>,
    _refresh: Option<Closure<dyn FnMut(Event)>>,
    _export: Option<Closure<dyn FnMut(Event)>>,
    _clear: Option<Closure<dyn FnMut(Event)>>,
}

thread_local! {
    static ADMIN: RefCell<Option<AdminPage>> = const { RefCell::new(None) };
}

/// Wire the admin fragment. Aborts silently when the selector is absent.
pub(crate) fn init(document: &Document) {
    let Some(select) = dom::element_by_id::<HtmlSelectElement>(document, ids::ADMIN_USER_SELECT)
    else {
        return;
    };
    let Some(select) = dom::reclone(&select) else {
        return;
    };

    let change = {
        let select = select.clone();
        Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_event: Event| {
            let selected = non_empty(select.value());
            app::push_history_state(&logs_url(selected.as_deref()));
            refresh_logs(selected);
        }))
    };
    if select
        .add_event_listener_with_callback("change", change.as_ref().unchecked_ref())
        .is_err()
    {
        return;
    }

    let refresh = wire_button(document, ids::ADMIN_REFRESH, {
        let select = select.clone();
        move || refresh_logs(non_empty(select.value()))
    });

    let export = wire_button(document, ids::ADMIN_EXPORT, {
        let select = select.clone();
        move || open_export(non_empty(select.value()))
    });

    let clear = wire_button(document, ids::ADMIN_CLEAR, {
        let select = select.clone();
        move || request_clear(non_empty(select.value()))
    });

    load_users(select);

    ADMIN.with(|slot| {
        *slot.borrow_mut() = Some(AdminPage {
            _change: change,
            _refresh: refresh,
            _export: export,
            _clear: clear,
        });
    });
}

/// Rebind a click action to a (recloned) button, if the fragment carries it.
fn wire_button(
    document: &Document,
    id: &str,
    action: impl Fn() + 'static,
) -> Option<Closure<dyn FnMut(Event)>> {
    let button = dom::element_by_id::<HtmlElement>(document, id)?;
    let button = dom::reclone(&button)?;
    let closure = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_event: Event| action()));
    button
        .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
        .ok()?;
    Some(closure)
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

fn load_users(select: HtmlSelectElement) {
    spawn_local(async move {
        match fetch_users().await {
            Ok(users) => populate_users(&select, &users),
            Err(err) => log::error!("failed to load user list: {err}"),
        }
    });
}

async fn fetch_users() -> Result<Vec<AdminUser>, String> {
    let response = Request::get(ADMIN_USERS_PATH)
        .send()
        .await
        .map_err(|err| err.to_string())?;
    if !response.ok() {
        return Err(format!("status {}", response.status()));
    }
    response.json().await.map_err(|err| err.to_string())
}

fn populate_users(select: &HtmlSelectElement, users: &[AdminUser]) {
    let Some(document) = select.owner_document() else {
        return;
    };
    select.set_inner_html("");
    for user in users {
        let Ok(option) = document.create_element("option") else {
            continue;
        };
        let Ok(option) = option.dyn_into::<HtmlOptionElement>() else {
            continue;
        };
        option.set_value(&user.id);
        option.set_text_content(Some(&user.option_label()));
        let _ = select.append_child(&option);
    }
    // A user filter carried in the query string wins the initial selection.
    if let Some(requested) = query_user_id() {
        select.set_value(&requested);
    }
}

fn query_user_id() -> Option<String> {
    let search = dom::window()?.location().search().ok()?;
    web_sys::UrlSearchParams::new_with_str(&search)
        .ok()?
        .get("user_id")
}

fn refresh_logs(user_id: Option<String>) {
    spawn_local(async move {
        let url = logs_url(user_id.as_deref());
        match fetcher::fetch_fragment(&url).await {
            FetchOutcome::Fragment(html) => {
                let Some(document) = dom::document() else {
                    return;
                };
                let Some(container) = dom::content_container(&document) else {
                    return;
                };
                container.set_inner_html(&html);
                init(&document);
            }
            FetchOutcome::MissingContainer => log::error!("log refresh returned no container"),
            FetchOutcome::Failed(err) => log::error!("log refresh failed: {err}"),
        }
    });
}

fn open_export(user_id: Option<String>) {
    let url = export_url(user_id.as_deref());
    let Some(window) = dom::window() else {
        return;
    };
    if let Err(err) = window.open_with_url_and_target(&url, "_blank") {
        log::warn!("export tab failed to open: {err:?}");
    }
}

fn request_clear(selected: Option<String>) {
    match clear_decision(selected.as_deref(), |id| dom::confirm(&clear_prompt(id))) {
        ClearDecision::NoUserSelected => dom::alert(SELECT_USER_NOTICE),
        ClearDecision::Declined => {}
        ClearDecision::Proceed(id) => clear_events(id.to_string()),
    }
}

fn clear_events(user_id: String) {
    spawn_local(async move {
        match post_clear(&user_id).await {
            Ok(outcome) if outcome.ok => {
                dom::alert(CLEARED_NOTICE);
                refresh_logs(Some(user_id));
            }
            Ok(outcome) => dom::alert(&outcome.failure_message()),
            Err(err) => {
                log::error!("clear request failed: {err}");
                dom::alert(CLEAR_REQUEST_FAILED);
            }
        }
    });
}

async fn post_clear(user_id: &str) -> Result<ClearOutcome, String> {
    let response = Request::post(ADMIN_CLEAR_PATH)
        .json(&ClearRequest { user_id })
        .map_err(|err| err.to_string())?
        .send()
        .await
        .map_err(|err| err.to_string())?;
    response.json().await.map_err(|err| err.to_string())
}
