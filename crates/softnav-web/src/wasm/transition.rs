#![forbid(unsafe_code)]

//! Fade driver around content swaps.
//!
//! The wait for the fade-out resolves on whichever comes first: a
//! `transitionend` event from the container itself, or the fallback timer.
//! Both paths feed the core [`TransitionGate`], which accepts exactly one
//! signal, so the oneshot below fires at most once.

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use gloo_timers::future::TimeoutFuture;
use softnav_core::transition::{
    FADE_FALLBACK_TIMEOUT, FADE_IN_CLASS, FADE_OUT_CLASS, GateSignal, TransitionGate,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlElement;

/// Fade the container out, replace its content, and fade it back in.
pub(crate) async fn swap_content(container: &HtmlElement, html: &str) {
    fade_out(container).await;
    container.set_inner_html(html);

    // Force a reflow between the DOM write and the class change so the
    // renderer observes the enter transition.
    let _ = container.offset_height();

    let class_list = container.class_list();
    let _ = class_list.remove_1(FADE_OUT_CLASS);
    let _ = class_list.add_1(FADE_IN_CLASS);
}

async fn fade_out(container: &HtmlElement) {
    let class_list = container.class_list();
    let _ = class_list.remove_1(FADE_IN_CLASS);
    let _ = class_list.add_1(FADE_OUT_CLASS);

    let gate = Rc::new(RefCell::new(TransitionGate::new()));
    let (sender, receiver) = oneshot::channel::<()>();
    let sender = Rc::new(RefCell::new(Some(sender)));

    let listener = {
        let gate = Rc::clone(&gate);
        let sender = Rc::clone(&sender);
        let container = container.clone();
        Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |event: web_sys::Event| {
            let on_container = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlElement>().ok())
                .is_some_and(|target| target == container);
            if gate
                .borrow_mut()
                .complete(GateSignal::TransitionEnd { on_container })
            {
                if let Some(sender) = sender.borrow_mut().take() {
                    let _ = sender.send(());
                }
            }
        }))
    };
    let _ = container
        .add_event_listener_with_callback("transitionend", listener.as_ref().unchecked_ref());

    {
        let gate = Rc::clone(&gate);
        let sender = Rc::clone(&sender);
        spawn_local(async move {
            TimeoutFuture::new(FADE_FALLBACK_TIMEOUT.as_millis() as u32).await;
            if gate.borrow_mut().complete(GateSignal::Timeout) {
                if let Some(sender) = sender.borrow_mut().take() {
                    let _ = sender.send(());
                }
            }
        });
    }

    let _ = receiver.await;
    let _ = container
        .remove_event_listener_with_callback("transitionend", listener.as_ref().unchecked_ref());
}
