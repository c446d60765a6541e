#![forbid(unsafe_code)]

//! Host-agnostic engine for soft (partial) page navigation and the panels it
//! re-initializes.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment (the wasm surface in
//!   `softnav-web`, or a test harness) performs fetches, DOM writes, and
//!   storage access, then pushes the outcomes into this crate.
//! - **Decisions, not effects**: every module returns a value describing what
//!   the host should do next (swap a fragment, fall back to a full page load,
//!   drop a stale response, issue or suppress a request).
//! - **No browser types**: suitable for native unit and property tests.
//!
//! The navigation core is [`router::Router`] + [`transition::TransitionGate`]
//! + [`registry::RouteInitializers`]. Panel state machines live in [`chat`],
//! [`admin`], and [`notes`]; small wire helpers in [`consent`] and
//! [`session`]; microphone capture framing in [`wav`].

pub mod admin;
pub mod chat;
pub mod consent;
pub mod notes;
pub mod registry;
pub mod router;
pub mod session;
pub mod transition;
pub mod wav;

pub use registry::RouteInitializers;
pub use router::{FetchOutcome, LinkDisposition, NavResolution, NavTicket, NavTrigger, Router};
pub use transition::{GateSignal, TransitionGate};
