#![forbid(unsafe_code)]

//! Microphone capture as a secondary chat input.
//!
//! The capture node posts sample chunks to the main thread in delivery
//! order; stopping frames them as WAV and posts the blob as the chat payload
//! in place of text. One session at a time: a start request while a session
//! is live (or still acquiring the microphone) is ignored.

use std::cell::RefCell;
use std::rc::Rc;

use softnav_core::chat::{AUDIO_FIELD, AUDIO_FILENAME, ChatOutcome, Transcript};
use softnav_core::wav::{RecordingBuffer, WAV_MIME};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    AudioContext, AudioProcessingEvent, Event, FormData, HtmlElement, MediaStream,
    MediaStreamAudioSourceNode, MediaStreamConstraints, MediaStreamTrack, ScriptProcessorNode,
};

use crate::wasm::dom;
use crate::wasm::pages::chat;

const CAPTURE_BUFFER_SIZE: u32 = 4096;
const START_LABEL: &str = "Record";
const STOP_LABEL: &str = "Stop";
/// Shown in the user bubble for an audio submission.
const VOICE_MESSAGE_TEXT: &str = "(voice message)";
const MIC_FAILED_NOTICE: &str = "Microphone access failed";

pub(crate) struct RecorderHandle {
    _state: Rc<RefCell<RecorderState>>,
    _toggle: Closure<dyn FnMut(Event)>,
}

enum RecorderState {
    Idle,
    /// `getUserMedia` is in flight; further clicks are ignored.
    Starting,
    Recording(LiveSession),
}

struct LiveSession {
    context: AudioContext,
    stream: MediaStream,
    source: MediaStreamAudioSourceNode,
    processor: ScriptProcessorNode,
    buffer: Rc<RefCell<RecordingBuffer>>,
    _on_audio: Closure<dyn FnMut(AudioProcessingEvent)>,
}

/// Wire the record toggle, if the fragment carries one.
pub(crate) fn attach(
    button: HtmlElement,
    transcript: Rc<RefCell<Transcript>>,
    messages: HtmlElement,
) -> Option<RecorderHandle> {
    let button = dom::reclone(&button)?;
    button.set_text_content(Some(START_LABEL));

    let state = Rc::new(RefCell::new(RecorderState::Idle));
    let toggle = {
        let state = Rc::clone(&state);
        let button = button.clone();
        Closure::<dyn FnMut(Event)>::wrap(Box::new(move |event: Event| {
            event.prevent_default();
            on_toggle(&state, &button, &transcript, &messages);
        }))
    };
    button
        .add_event_listener_with_callback("click", toggle.as_ref().unchecked_ref())
        .ok()?;

    Some(RecorderHandle {
        _state: state,
        _toggle: toggle,
    })
}

fn on_toggle(
    state: &Rc<RefCell<RecorderState>>,
    button: &HtmlElement,
    transcript: &Rc<RefCell<Transcript>>,
    messages: &HtmlElement,
) {
    let current = std::mem::replace(&mut *state.borrow_mut(), RecorderState::Starting);
    match current {
        RecorderState::Starting => {
            log::debug!("recorder toggle ignored; session change in progress");
        }
        RecorderState::Idle => {
            let state = Rc::clone(state);
            let button = button.clone();
            spawn_local(async move {
                match start_capture().await {
                    Ok(session) => {
                        button.set_text_content(Some(STOP_LABEL));
                        *state.borrow_mut() = RecorderState::Recording(session);
                    }
                    Err(err) => {
                        log::warn!("microphone capture failed to start: {err}");
                        dom::alert(MIC_FAILED_NOTICE);
                        *state.borrow_mut() = RecorderState::Idle;
                    }
                }
            });
        }
        RecorderState::Recording(session) => {
            button.set_text_content(Some(START_LABEL));
            *state.borrow_mut() = RecorderState::Idle;
            finish(session, transcript, messages);
        }
    }
}

async fn start_capture() -> Result<LiveSession, String> {
    let window = dom::window().ok_or_else(|| "no window".to_string())?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|err| format!("{err:?}"))?;

    let constraints = MediaStreamConstraints::new();
    constraints.set_audio(&JsValue::TRUE);
    let request = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(|err| format!("{err:?}"))?;
    let stream: MediaStream = JsFuture::from(request)
        .await
        .map_err(|err| format!("{err:?}"))?
        .dyn_into()
        .map_err(|_| "unexpected getUserMedia result".to_string())?;

    let context = AudioContext::new().map_err(|err| format!("{err:?}"))?;
    let buffer = Rc::new(RefCell::new(RecordingBuffer::new(
        context.sample_rate() as u32
    )));

    let source = context
        .create_media_stream_source(&stream)
        .map_err(|err| format!("{err:?}"))?;
    let processor = context
        .create_script_processor_with_buffer_size_and_number_of_input_channels_and_number_of_output_channels(
            CAPTURE_BUFFER_SIZE,
            1,
            1,
        )
        .map_err(|err| format!("{err:?}"))?;

    let on_audio = {
        let buffer = Rc::clone(&buffer);
        Closure::<dyn FnMut(AudioProcessingEvent)>::wrap(Box::new(
            move |event: AudioProcessingEvent| {
                let Ok(input) = event.input_buffer() else {
                    return;
                };
                let Ok(chunk) = input.get_channel_data(0) else {
                    return;
                };
                buffer.borrow_mut().push_chunk(&chunk);
            },
        ))
    };
    processor.set_onaudioprocess(Some(on_audio.as_ref().unchecked_ref()));

    source
        .connect_with_audio_node(&processor)
        .map_err(|err| format!("{err:?}"))?;
    processor
        .connect_with_audio_node(&context.destination())
        .map_err(|err| format!("{err:?}"))?;

    Ok(LiveSession {
        context,
        stream,
        source,
        processor,
        buffer,
        _on_audio: on_audio,
    })
}

fn finish(
    session: LiveSession,
    transcript: &Rc<RefCell<Transcript>>,
    messages: &HtmlElement,
) {
    let LiveSession {
        context,
        stream,
        source,
        processor,
        buffer,
        _on_audio,
    } = session;

    processor.set_onaudioprocess(None);
    let _ = source.disconnect();
    let _ = processor.disconnect();
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
    if let Ok(closing) = context.close() {
        spawn_local(async move {
            let _ = JsFuture::from(closing).await;
        });
    }

    let wav = {
        let recording = buffer.borrow();
        if recording.is_empty() {
            log::warn!("recording session captured no samples");
            return;
        }
        log::debug!(
            "recorded {:.1}s at {} Hz",
            recording.duration_secs(),
            recording.sample_rate()
        );
        recording.encode_wav()
    };

    post_recording(wav, transcript, messages);
}

fn post_recording(wav: Vec<u8>, transcript: &Rc<RefCell<Transcript>>, messages: &HtmlElement) {
    let Some(pending) = transcript.borrow_mut().submit(VOICE_MESSAGE_TEXT) else {
        return;
    };
    let (user_entry, placeholder_entry) = {
        let transcript = transcript.borrow();
        (
            transcript.entry(pending.user).cloned(),
            transcript.entry(pending.placeholder).cloned(),
        )
    };
    let Some(user_entry) = user_entry else { return };
    let _ = chat::append_message(messages, &user_entry);
    let Some(placeholder_entry) = placeholder_entry else {
        return;
    };
    let Some(placeholder) = chat::append_message(messages, &placeholder_entry) else {
        return;
    };

    let transcript = Rc::clone(transcript);
    let messages = messages.clone();
    spawn_local(async move {
        let outcome = match audio_form(&wav) {
            Ok(form) => chat::post_chat_form(form).await,
            Err(err) => {
                log::error!("audio payload build failed: {err}");
                ChatOutcome::NetworkError
            }
        };
        chat::settle_placeholder(&placeholder, &outcome);
        let _ = transcript.borrow_mut().settle(pending, &outcome);
        if let ChatOutcome::Reply(Some(reply)) = &outcome {
            chat::speak_reply(reply.clone());
        }
        chat::scroll_to_latest(&messages);
    });
}

fn audio_form(wav: &[u8]) -> Result<FormData, String> {
    let blob = dom::blob_from_bytes(wav, WAV_MIME)?;
    let form = FormData::new().map_err(|err| format!("{err:?}"))?;
    form.append_with_blob_and_filename(AUDIO_FIELD, &blob, AUDIO_FILENAME)
        .map_err(|err| format!("{err:?}"))?;
    Ok(form)
}
