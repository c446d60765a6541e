#![forbid(unsafe_code)]

//! Completion gate for the fade-out wait.
//!
//! Swapping the content container is preceded by a fade-out that ends either
//! with a `transitionend` event from the container or, if the renderer never
//! delivers one, with a fallback timeout slightly longer than the CSS
//! transition. Both signals can fire; the gate accepts exactly one.
//!
//! `transitionend` bubbles, so events targeting a descendant of the container
//! are rejected without completing the gate.

use core::time::Duration;

/// Class applied while the container is visible.
pub const FADE_IN_CLASS: &str = "fade-in";
/// Class applied while the container fades out.
pub const FADE_OUT_CLASS: &str = "fade-out";

/// Must match the CSS transition duration on the content container.
pub const FADE_DURATION: Duration = Duration::from_millis(220);

/// Fallback wait: [`FADE_DURATION`] plus slack for event delivery.
pub const FADE_FALLBACK_TIMEOUT: Duration = Duration::from_millis(250);

/// A signal that may end the fade-out wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateSignal {
    /// A `transitionend` event. `on_container` is true only when the event
    /// targeted the container itself rather than a descendant.
    TransitionEnd { on_container: bool },
    /// The fallback timer fired.
    Timeout,
}

/// One-shot completion guard.
///
/// [`TransitionGate::complete`] returns `true` for the first accepted signal
/// and `false` for everything after it, so the host resolves its wait exactly
/// once no matter how the signals interleave.
#[derive(Debug, Default)]
pub struct TransitionGate {
    completed: bool,
}

impl TransitionGate {
    #[must_use]
    pub const fn new() -> Self {
        Self { completed: false }
    }

    /// Feed a signal. Returns `true` when this signal completes the gate.
    pub fn complete(&mut self, signal: GateSignal) -> bool {
        if self.completed {
            return false;
        }
        match signal {
            GateSignal::TransitionEnd { on_container: false } => false,
            GateSignal::TransitionEnd { on_container: true } | GateSignal::Timeout => {
                self.completed = true;
                true
            }
        }
    }

    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }
}
