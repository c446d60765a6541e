#![forbid(unsafe_code)]

//! Current-user badge, filled in at boot. Best-effort: failures log and the
//! badge stays empty.

use gloo_net::http::Request;
use softnav_core::session::{CURRENT_USER_PATH, CurrentUser, CurrentUserEnvelope};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlElement};

use super::dom;
use crate::ids;

pub(crate) fn init(document: &Document) {
    let Some(badge) = dom::element_by_id::<HtmlElement>(document, ids::CURRENT_USER_BADGE) else {
        return;
    };
    spawn_local(async move {
        match fetch_current_user().await {
            Ok(Some(user)) => badge.set_text_content(Some(&user.badge_text())),
            Ok(None) => {}
            Err(err) => log::debug!("current user lookup failed: {err}"),
        }
    });
}

async fn fetch_current_user() -> Result<Option<CurrentUser>, String> {
    let response = Request::get(CURRENT_USER_PATH)
        .send()
        .await
        .map_err(|err| err.to_string())?;
    if !response.ok() {
        return Err(format!("status {}", response.status()));
    }
    let envelope: CurrentUserEnvelope = response.json().await.map_err(|err| err.to_string())?;
    Ok(envelope.user)
}
