//! Arrival-order and last-message properties.

#![allow(clippy::unwrap_used)]

mod support;

use parentline_api::{Message, UserId};
use parentline_core::{Engine, EngineOptions};
use proptest::prelude::*;
use support::{FakeApi, LOCAL, message_at};

const PEERS: [&str; 3] = ["t1", "t2", "t3"];

/// (peer index, incoming?, seconds offset)
fn pushes() -> impl Strategy<Value = Vec<(usize, bool, i64)>> {
    prop::collection::vec((0..PEERS.len(), any::<bool>(), 0..1_000i64), 0..40)
}

fn build(pushes: &[(usize, bool, i64)]) -> Vec<Message> {
    pushes
        .iter()
        .enumerate()
        .map(|(i, &(peer, incoming, secs))| {
            let id = format!("m{i}");
            if incoming {
                message_at(&id, PEERS[peer], LOCAL, secs)
            } else {
                message_at(&id, LOCAL, PEERS[peer], secs)
            }
        })
        .collect()
}

fn opened_engine() -> Engine {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let mut engine = Engine::new(LOCAL.into(), EngineOptions::default());
    runtime
        .block_on(engine.open_conversation(&FakeApi::new(), "t1".into()))
        .unwrap();
    engine
}

proptest! {
    #[test]
    fn timeline_follows_arrival_order(pushes in pushes()) {
        let messages = build(&pushes);
        let mut engine = opened_engine();
        for message in &messages {
            engine.apply_incoming(message.clone());
        }

        let open = UserId::from("t1");
        let expected: Vec<_> = messages
            .iter()
            .filter(|m| m.other_party(&LOCAL.into()) == &open)
            .cloned()
            .collect();
        prop_assert_eq!(engine.timeline(), expected.as_slice());
    }

    #[test]
    fn last_message_is_newest_observed(pushes in pushes()) {
        let messages = build(&pushes);
        let mut engine = opened_engine();
        for message in &messages {
            engine.apply_incoming(message.clone());
        }

        for peer in PEERS {
            let peer = UserId::from(peer);
            let newest = messages
                .iter()
                .filter(|m| m.other_party(&LOCAL.into()) == &peer)
                .map(|m| m.created_at)
                .max();
            let last = engine
                .conversation(&peer)
                .and_then(|c| c.last_message.as_ref())
                .map(|m| m.created_at);
            prop_assert_eq!(last, newest);
        }
    }

    #[test]
    fn replayed_pushes_change_nothing(pushes in pushes()) {
        let messages = build(&pushes);
        let mut engine = opened_engine();
        for message in &messages {
            engine.apply_incoming(message.clone());
        }
        let timeline = engine.timeline().to_vec();
        for message in &messages {
            prop_assert!(!engine.apply_incoming(message.clone()));
        }
        prop_assert_eq!(engine.timeline(), timeline.as_slice());
    }
}
