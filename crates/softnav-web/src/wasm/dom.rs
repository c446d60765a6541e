#![forbid(unsafe_code)]

//! Small DOM lookup and dialog helpers shared by the controllers.

use softnav_core::router::CONTENT_CONTAINER;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Node, Window};

pub(crate) fn window() -> Option<Window> {
    web_sys::window()
}

pub(crate) fn document() -> Option<Document> {
    web_sys::window().and_then(|window| window.document())
}

/// Look an element up by id and downcast it, `None` when either step fails.
pub(crate) fn element_by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<T>().ok())
}

/// The single content container swapped on navigation.
pub(crate) fn content_container(document: &Document) -> Option<HtmlElement> {
    document
        .query_selector(CONTENT_CONTAINER)
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
}

pub(crate) fn page_origin() -> Option<String> {
    window().and_then(|window| window.location().origin().ok())
}

/// Pathname of `url` resolved against the current origin.
pub(crate) fn pathname_of(url: &str) -> Option<String> {
    let base = page_origin()?;
    web_sys::Url::new_with_base(url, &base)
        .ok()
        .map(|parsed| parsed.pathname())
}

/// Abandon the partial flow and let the browser navigate.
pub(crate) fn full_load(url: &str) {
    if let Some(window) = window() {
        if let Err(err) = window.location().assign(url) {
            log::error!("full page load of {url} failed: {err:?}");
        }
    }
}

pub(crate) fn alert(message: &str) {
    if let Some(window) = window() {
        let _ = window.alert_with_message(message);
    }
}

#[must_use]
pub(crate) fn confirm(message: &str) -> bool {
    window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Build a typed `Blob` from raw bytes.
pub(crate) fn blob_from_bytes(bytes: &[u8], mime: &str) -> Result<web_sys::Blob, String> {
    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes).into());
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime);
    web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|err| format!("{err:?}"))
}

/// Replace `element` with a deep clone of itself and return the clone.
///
/// The clone carries no listeners, so controllers can re-attach handlers
/// without accumulating stale ones across repeated initializations.
pub(crate) fn reclone<T>(element: &T) -> Option<T>
where
    T: JsCast + AsRef<Node>,
{
    let node: &Node = element.as_ref();
    let clone = node.clone_node_with_deep(true).ok()?;
    let parent = node.parent_node()?;
    parent.replace_child(&clone, node).ok()?;
    clone.dyn_into::<T>().ok()
}
