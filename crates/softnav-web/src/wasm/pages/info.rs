#![forbid(unsafe_code)]

//! Info page controller: two note fields mirrored into local storage.
//!
//! The about region autosaves on every edit; the project summary saves on an
//! explicit action (with short button feedback) and can be cleared, which
//! removes the stored key entirely.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use softnav_core::notes::{NotesPanel, SAVE_LABEL, SAVED_LABEL, SAVED_REVERT_AFTER};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, HtmlElement, HtmlTextAreaElement};

use crate::ids;
use crate::wasm::{dom, storage};

struct InfoPage {
    _about_input: Option<Closure<dyn FnMut(Event)>>,
    _save: Option<Closure<dyn FnMut(Event)>>,
    _clear: Option<Closure<dyn FnMut(Event)>>,
}

thread_local! {
    static INFO: RefCell<Option<InfoPage>> = const { RefCell::new(None) };
}

type SharedPanel = Rc<RefCell<NotesPanel<storage::BrowserStore>>>;

/// Wire whichever note fields the fragment carries.
pub(crate) fn init(document: &Document) {
    let Some(store) = storage::BrowserStore::new() else {
        log::warn!("local storage unavailable; notes disabled");
        return;
    };
    let panel: SharedPanel = Rc::new(RefCell::new(NotesPanel::new(store)));

    let about_input = wire_about(document, &panel);
    let (save, clear) = wire_project(document, &panel);

    INFO.with(|slot| {
        *slot.borrow_mut() = Some(InfoPage {
            _about_input: about_input,
            _save: save,
            _clear: clear,
        });
    });
}

fn wire_about(document: &Document, panel: &SharedPanel) -> Option<Closure<dyn FnMut(Event)>> {
    let about = dom::element_by_id::<HtmlElement>(document, ids::INFO_ABOUT)?;
    let about = dom::reclone(&about)?;
    if let Some(saved) = panel.borrow().about() {
        about.set_inner_text(&saved);
    }

    let closure = {
        let panel = Rc::clone(panel);
        let about = about.clone();
        Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_event: Event| {
            panel.borrow_mut().autosave_about(&about.inner_text());
        }))
    };
    about
        .add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())
        .ok()?;
    Some(closure)
}

type ProjectClosures = (
    Option<Closure<dyn FnMut(Event)>>,
    Option<Closure<dyn FnMut(Event)>>,
);

fn wire_project(document: &Document, panel: &SharedPanel) -> ProjectClosures {
    let Some(project) = dom::element_by_id::<HtmlTextAreaElement>(document, ids::INFO_PROJECT)
    else {
        return (None, None);
    };
    if let Some(saved) = panel.borrow().project() {
        project.set_value(&saved);
    }

    let save = dom::element_by_id::<HtmlElement>(document, ids::INFO_SAVE)
        .and_then(|button| dom::reclone(&button))
        .and_then(|button| {
            let closure = {
                let panel = Rc::clone(panel);
                let project = project.clone();
                let button = button.clone();
                Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_event: Event| {
                    panel.borrow_mut().save_project(&project.value());
                    button.set_inner_text(SAVED_LABEL);
                    let revert = button.clone();
                    Timeout::new(SAVED_REVERT_AFTER.as_millis() as u32, move || {
                        revert.set_inner_text(SAVE_LABEL);
                    })
                    .forget();
                }))
            };
            button
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
                .ok()?;
            Some(closure)
        });

    let clear = dom::element_by_id::<HtmlElement>(document, ids::INFO_CLEAR)
        .and_then(|button| dom::reclone(&button))
        .and_then(|button| {
            let closure = {
                let panel = Rc::clone(panel);
                let project = project.clone();
                Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_event: Event| {
                    project.set_value("");
                    panel.borrow_mut().clear_project();
                }))
            };
            button
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
                .ok()?;
            Some(closure)
        });

    (save, clear)
}
