#![forbid(unsafe_code)]

//! Chat transcript lifecycle.
//!
//! A submission appends a user entry and a provisional loading placeholder,
//! then the placeholder is settled **in place** once the bot request
//! finishes: the same entry changes speaker and text, nothing new is
//! appended. Blank input is rejected before any entry or request exists.
//!
//! The host renders entries however it likes (the web layer keeps one DOM
//! node per entry) and is responsible for actually issuing the POST.

use serde::Deserialize;

/// POST target when the current path is unusable.
pub const CHAT_FALLBACK_PATH: &str = "/bot";
/// Form field carrying the typed message.
pub const MESSAGE_FIELD: &str = "message";
/// Form field carrying a recorded audio payload.
pub const AUDIO_FIELD: &str = "audio";
/// Filename attached to the recorded audio payload.
pub const AUDIO_FILENAME: &str = "recording.wav";
/// Placeholder text shown while the bot reply is in flight.
pub const LOADING_TEXT: &str = "AI is thinking...";

/// TTS endpoint for assistant replies.
pub const TTS_PATH: &str = "/tts";
/// Form field carrying the TTS input text.
pub const TTS_TEXT_FIELD: &str = "text";

/// Who a transcript entry belongs to. Doubles as the CSS class on the
/// rendered bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
    Loading,
}

impl Speaker {
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Loading => "loading",
        }
    }
}

/// Body of a successful bot response.
#[derive(Debug, Clone, Deserialize)]
pub struct BotReply {
    #[serde(default)]
    pub reply: Option<String>,
}

/// Terminal outcome of one chat request. Neither failure is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    /// HTTP OK with a parsed body.
    Reply(Option<String>),
    /// Non-OK HTTP status.
    ServerError,
    /// Transport failure before any status arrived.
    NetworkError,
}

impl ChatOutcome {
    /// Text the settled bubble displays.
    #[must_use]
    pub fn bubble_text(&self) -> &str {
        match self {
            Self::Reply(Some(text)) => text,
            Self::Reply(None) => "(no reply)",
            Self::ServerError => "(error from server)",
            Self::NetworkError => "(network error)",
        }
    }
}

/// One rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub speaker: Speaker,
    pub text: String,
}

/// Stable index of an entry within its transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryId(usize);

/// Handle returned by [`Transcript::submit`], consumed by
/// [`Transcript::settle`].
#[derive(Debug, Clone, Copy)]
pub struct PendingExchange {
    pub user: EntryId,
    pub placeholder: EntryId,
}

/// Append-then-mutate transcript; entries are never removed.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Accept a submission. Returns `None` for blank input, in which case the
    /// transcript is untouched and the host must not issue a request.
    pub fn submit(&mut self, input: &str) -> Option<PendingExchange> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }
        let user = EntryId(self.entries.len());
        self.entries.push(Entry {
            speaker: Speaker::User,
            text: text.to_string(),
        });
        let placeholder = EntryId(self.entries.len());
        self.entries.push(Entry {
            speaker: Speaker::Loading,
            text: LOADING_TEXT.to_string(),
        });
        Some(PendingExchange { user, placeholder })
    }

    /// Settle the loading placeholder in place. Returns the settled entry, or
    /// `None` if the handle does not point at a live placeholder.
    pub fn settle(&mut self, pending: PendingExchange, outcome: &ChatOutcome) -> Option<&Entry> {
        let entry = self.entries.get_mut(pending.placeholder.0)?;
        if entry.speaker != Speaker::Loading {
            return None;
        }
        entry.speaker = Speaker::Assistant;
        entry.text = outcome.bubble_text().to_string();
        Some(&self.entries[pending.placeholder.0])
    }

    #[must_use]
    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries.get(id.0)
    }

    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
