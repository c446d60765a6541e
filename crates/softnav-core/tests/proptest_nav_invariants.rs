//! Property-based invariant tests for the navigation core.
//!
//! Verifies:
//! 1. Only the latest ticket of any begin-sequence can resolve to a swap;
//!    every superseded ticket resolves to `Stale` for every outcome.
//! 2. A swap echoes its ticket's URL, and pushes history iff the trigger was
//!    a link click.
//! 3. Failure outcomes for the latest ticket always degrade to a full load of
//!    the same URL, never a partial swap.
//! 4. The transition gate accepts exactly one signal from any signal
//!    sequence, and never a descendant `transitionend`.
//! 5. Registry matches preserve registration order.
//! 6. WAV framing: total length is header + 2 bytes per sample, and the RIFF
//!    and data size fields agree with it.

use proptest::prelude::*;
use softnav_core::transition::{GateSignal, TransitionGate};
use softnav_core::wav::{encode_wav_pcm16, WAV_HEADER_LEN};
use softnav_core::{FetchOutcome, NavResolution, NavTrigger, RouteInitializers, Router};

fn arb_trigger() -> impl Strategy<Value = NavTrigger> {
    prop_oneof![Just(NavTrigger::Link), Just(NavTrigger::PopState)]
}

fn arb_outcome() -> impl Strategy<Value = FetchOutcome> {
    prop_oneof![
        ".*".prop_map(FetchOutcome::Fragment),
        Just(FetchOutcome::MissingContainer),
        ".*".prop_map(FetchOutcome::Failed),
    ]
}

fn arb_gate_signal() -> impl Strategy<Value = GateSignal> {
    prop_oneof![
        Just(GateSignal::TransitionEnd { on_container: true }),
        Just(GateSignal::TransitionEnd {
            on_container: false
        }),
        Just(GateSignal::Timeout),
    ]
}

proptest! {
    #[test]
    fn only_the_latest_ticket_swaps(
        navs in prop::collection::vec(("/[a-z]{1,8}", arb_trigger()), 1..8),
        outcome in arb_outcome(),
    ) {
        let mut router = Router::new();
        let tickets: Vec<_> = navs
            .iter()
            .map(|(url, trigger)| router.begin(url.clone(), *trigger))
            .collect();

        for stale in &tickets[..tickets.len() - 1] {
            prop_assert_eq!(
                router.resolve(stale, outcome.clone()),
                NavResolution::Stale
            );
        }

        let latest = tickets.last().expect("at least one navigation");
        let resolution = router.resolve(latest, outcome.clone());
        match (&outcome, resolution) {
            (FetchOutcome::Fragment(_), NavResolution::Swap { url, push_history, .. }) => {
                prop_assert_eq!(url.as_str(), latest.url());
                prop_assert_eq!(push_history, latest.pushes_history());
            }
            (FetchOutcome::MissingContainer | FetchOutcome::Failed(_),
             NavResolution::FullLoad { url }) => {
                prop_assert_eq!(url.as_str(), latest.url());
            }
            (_, resolution) => prop_assert!(false, "unexpected resolution {resolution:?}"),
        }
    }

    #[test]
    fn push_history_tracks_the_trigger(url in "/[a-z]{1,8}", trigger in arb_trigger()) {
        let mut router = Router::new();
        let ticket = router.begin(url, trigger);
        prop_assert_eq!(
            ticket.pushes_history(),
            matches!(trigger, NavTrigger::Link)
        );
    }

    #[test]
    fn gate_accepts_exactly_one_signal(
        signals in prop::collection::vec(arb_gate_signal(), 0..12),
    ) {
        let mut gate = TransitionGate::new();
        let mut accepted = 0usize;
        for signal in &signals {
            if gate.complete(*signal) {
                accepted += 1;
                prop_assert_ne!(
                    *signal,
                    GateSignal::TransitionEnd { on_container: false },
                    "descendant transitions must never complete the gate"
                );
            }
        }
        let has_completing_signal = signals.iter().any(|s| {
            !matches!(s, GateSignal::TransitionEnd { on_container: false })
        });
        prop_assert_eq!(accepted, usize::from(has_completing_signal));
        prop_assert_eq!(gate.is_completed(), has_completing_signal);
    }

    #[test]
    fn registry_matches_preserve_registration_order(
        prefixes in prop::collection::vec("/[a-z]{1,4}", 1..6),
        path in "/[a-z]{1,4}",
    ) {
        let mut registry = RouteInitializers::new();
        for (index, prefix) in prefixes.iter().enumerate() {
            registry.register(prefix.clone(), index);
        }
        let matched: Vec<usize> = registry.matching(&path).copied().collect();
        prop_assert!(matched.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn wav_size_fields_agree(
        samples in prop::collection::vec(-2.0f32..2.0, 0..256),
        sample_rate in 1u32..=96_000,
    ) {
        let wav = encode_wav_pcm16(&samples, sample_rate);
        let data_len = samples.len() * 2;
        prop_assert_eq!(wav.len(), WAV_HEADER_LEN + data_len);

        let riff_len = u32::from_le_bytes(wav[4..8].try_into().unwrap());
        prop_assert_eq!(riff_len as usize, 36 + data_len);
        let declared_data = u32::from_le_bytes(wav[40..44].try_into().unwrap());
        prop_assert_eq!(declared_data as usize, data_len);
    }
}
