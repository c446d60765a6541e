#![forbid(unsafe_code)]

//! Chat panel controller.
//!
//! Submission flow: append the user bubble and a loading placeholder, POST
//! the message, then settle the placeholder in place (same DOM node, class
//! and text change) with the reply or an error string. A successful reply
//! additionally triggers fire-and-forget TTS playback; its failure never
//! touches the chat flow.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_net::http::Request;
use softnav_core::chat::{
    BotReply, CHAT_FALLBACK_PATH, ChatOutcome, Entry, MESSAGE_FIELD, Speaker, TTS_PATH,
    TTS_TEXT_FIELD, Transcript,
};
use softnav_core::wav::WAV_MIME;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Document, Event, FormData, HtmlElement, HtmlFormElement, HtmlInputElement};

use crate::ids;
use crate::wasm::{dom, recorder};

const ASSISTANT_AVATAR: (&str, &str) = ("/img/assistant.png", "Assistant");
const USER_AVATAR: (&str, &str) = ("/img/user.png", "User");

struct ChatPage {
    _transcript: Rc<RefCell<Transcript>>,
    _submit: Closure<dyn FnMut(Event)>,
    _recorder: Option<recorder::RecorderHandle>,
}

thread_local! {
    static CHAT: RefCell<Option<ChatPage>> = const { RefCell::new(None) };
}

/// Wire the chat fragment. Aborts silently when the fragment is not the one
/// currently displayed.
pub(crate) fn init(document: &Document) {
    let Some(form) = dom::element_by_id::<HtmlFormElement>(document, ids::CHAT_FORM) else {
        return;
    };
    let Some(messages) = dom::element_by_id::<HtmlElement>(document, ids::CHAT_MESSAGES) else {
        return;
    };
    if document.get_element_by_id(ids::CHAT_INPUT).is_none() {
        return;
    }

    // Replace the form with a deep clone to shed listeners from any earlier
    // initialization of this same subtree.
    let Some(form) = dom::reclone(&form) else {
        return;
    };
    let Some(input) = form
        .query_selector(&format!("#{}", ids::CHAT_INPUT))
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
    else {
        return;
    };

    let transcript = Rc::new(RefCell::new(Transcript::new()));

    let submit = {
        let transcript = Rc::clone(&transcript);
        let messages = messages.clone();
        let input = input.clone();
        Closure::<dyn FnMut(Event)>::wrap(Box::new(move |event: Event| {
            event.prevent_default();
            submit_text(&transcript, &messages, &input);
        }))
    };
    if form
        .add_event_listener_with_callback("submit", submit.as_ref().unchecked_ref())
        .is_err()
    {
        return;
    }

    let recorder = dom::element_by_id::<HtmlElement>(document, ids::CHAT_RECORD)
        .and_then(|button| recorder::attach(button, Rc::clone(&transcript), messages.clone()));

    let _ = input.focus();

    CHAT.with(|slot| {
        *slot.borrow_mut() = Some(ChatPage {
            _transcript: transcript,
            _submit: submit,
            _recorder: recorder,
        });
    });
}

fn submit_text(
    transcript: &Rc<RefCell<Transcript>>,
    messages: &HtmlElement,
    input: &HtmlInputElement,
) {
    let Some(pending) = transcript.borrow_mut().submit(&input.value()) else {
        return;
    };
    input.set_value("");

    let (user_entry, placeholder_entry) = {
        let transcript = transcript.borrow();
        (
            transcript.entry(pending.user).cloned(),
            transcript.entry(pending.placeholder).cloned(),
        )
    };
    let Some(user_entry) = user_entry else { return };
    let _ = append_message(messages, &user_entry);
    let Some(placeholder_entry) = placeholder_entry else {
        return;
    };
    let Some(placeholder) = append_message(messages, &placeholder_entry) else {
        return;
    };

    let transcript = Rc::clone(transcript);
    let messages = messages.clone();
    spawn_local(async move {
        let outcome = post_text_message(&user_entry.text).await;
        settle_placeholder(&placeholder, &outcome);
        let _ = transcript.borrow_mut().settle(pending, &outcome);
        if let ChatOutcome::Reply(Some(reply)) = &outcome {
            speak_reply(reply.clone());
        }
        scroll_to_latest(&messages);
    });
}

/// A message's wrapper and bubble nodes, kept so the loading placeholder can
/// be mutated in place.
pub(crate) struct RenderedMessage {
    wrapper: HtmlElement,
    bubble: HtmlElement,
}

pub(crate) fn append_message(messages: &HtmlElement, entry: &Entry) -> Option<RenderedMessage> {
    let document = messages.owner_document()?;
    let wrapper = create_div(&document, &format!("message {}", entry.speaker.css_class()))?;
    let bubble = create_div(&document, &format!("bubble {}", entry.speaker.css_class()))?;
    bubble.set_text_content(Some(&entry.text));

    match entry.speaker {
        Speaker::Assistant => {
            if let Some(avatar) = create_avatar(&document, ASSISTANT_AVATAR) {
                let _ = wrapper.append_child(&avatar);
            }
            let _ = wrapper.append_child(&bubble);
        }
        Speaker::User => {
            let _ = wrapper.append_child(&bubble);
            if let Some(avatar) = create_avatar(&document, USER_AVATAR) {
                let _ = wrapper.append_child(&avatar);
            }
        }
        Speaker::Loading => {
            let _ = wrapper.append_child(&bubble);
        }
    }

    messages.append_child(&wrapper).ok()?;
    scroll_to_latest(messages);
    Some(RenderedMessage { wrapper, bubble })
}

/// Mutate the placeholder into its terminal state. Server and network
/// failures get static error text; only real replies get an avatar.
pub(crate) fn settle_placeholder(placeholder: &RenderedMessage, outcome: &ChatOutcome) {
    let class = Speaker::Assistant.css_class();
    placeholder.wrapper.set_class_name(&format!("message {class}"));
    placeholder.bubble.set_class_name(&format!("bubble {class}"));
    placeholder
        .bubble
        .set_text_content(Some(outcome.bubble_text()));

    if matches!(outcome, ChatOutcome::Reply(_)) {
        if let Some(document) = placeholder.wrapper.owner_document() {
            if let Some(avatar) = create_avatar(&document, ASSISTANT_AVATAR) {
                let _ = placeholder
                    .wrapper
                    .insert_before(&avatar, placeholder.wrapper.first_child().as_ref());
            }
        }
    }
}

pub(crate) fn scroll_to_latest(messages: &HtmlElement) {
    messages.set_scroll_top(messages.scroll_height());
}

async fn post_text_message(text: &str) -> ChatOutcome {
    let Ok(form) = FormData::new() else {
        return ChatOutcome::NetworkError;
    };
    if form.append_with_str(MESSAGE_FIELD, text).is_err() {
        return ChatOutcome::NetworkError;
    }
    post_chat_form(form).await
}

/// POST a prepared chat payload to the current path (the server answers the
/// page's own path), falling back to the bot endpoint.
pub(crate) async fn post_chat_form(form: FormData) -> ChatOutcome {
    let url = dom::window()
        .and_then(|window| window.location().pathname().ok())
        .filter(|path| !path.is_empty())
        .unwrap_or_else(|| CHAT_FALLBACK_PATH.to_string());

    let request = match Request::post(&url).body(form) {
        Ok(request) => request,
        Err(err) => {
            log::error!("chat request build failed: {err}");
            return ChatOutcome::NetworkError;
        }
    };
    match request.send().await {
        Ok(response) if response.ok() => match response.json::<BotReply>().await {
            Ok(body) => ChatOutcome::Reply(body.reply),
            Err(err) => {
                log::error!("chat reply parse failed: {err}");
                ChatOutcome::NetworkError
            }
        },
        Ok(response) => {
            log::warn!("chat request returned status {}", response.status());
            ChatOutcome::ServerError
        }
        Err(err) => {
            log::warn!("chat request failed: {err}");
            ChatOutcome::NetworkError
        }
    }
}

/// Fire-and-forget TTS for an assistant reply; failures only log.
pub(crate) fn speak_reply(text: String) {
    spawn_local(async move {
        if let Err(err) = play_tts(&text).await {
            log::warn!("tts playback failed: {err}");
        }
    });
}

async fn play_tts(text: &str) -> Result<(), String> {
    let form = FormData::new().map_err(|err| format!("{err:?}"))?;
    form.append_with_str(TTS_TEXT_FIELD, text)
        .map_err(|err| format!("{err:?}"))?;
    let response = Request::post(TTS_PATH)
        .body(form)
        .map_err(|err| err.to_string())?
        .send()
        .await
        .map_err(|err| err.to_string())?;
    if !response.ok() {
        return Err(format!("status {}", response.status()));
    }
    let bytes = response.binary().await.map_err(|err| err.to_string())?;
    play_audio(&bytes, WAV_MIME)
}

fn play_audio(bytes: &[u8], mime: &str) -> Result<(), String> {
    let blob = dom::blob_from_bytes(bytes, mime)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(|err| format!("{err:?}"))?;
    let audio =
        web_sys::HtmlAudioElement::new_with_src(&url).map_err(|err| format!("{err:?}"))?;

    // The object URL holds the blob alive; release it once playback ends.
    let revoke = Closure::once_into_js(move || {
        let _ = web_sys::Url::revoke_object_url(&url);
    });
    audio.set_onended(Some(revoke.unchecked_ref()));

    let playback = audio.play().map_err(|err| format!("{err:?}"))?;
    spawn_local(async move {
        let _ = JsFuture::from(playback).await;
    });
    Ok(())
}

fn create_div(document: &Document, class_name: &str) -> Option<HtmlElement> {
    let element = document.create_element("div").ok()?;
    element.set_class_name(class_name);
    element.dyn_into::<HtmlElement>().ok()
}

fn create_avatar(document: &Document, (src, alt): (&str, &str)) -> Option<web_sys::Element> {
    let img = document.create_element("img").ok()?;
    img.set_class_name("avatar");
    img.set_attribute("src", src).ok()?;
    img.set_attribute("alt", alt).ok()?;
    Some(img)
}
