#![allow(dead_code)]

use std::collections::HashSet;

use slideplay_core::{
    CompletionTicket, Deck, EffectApplier, EffectRequest, Notice, Playback, PlaybackConfig,
    PlaybackEvent,
};
use slideplay_test_fixtures::decks;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Apply {
        element: String,
        effect: String,
        ticket: CompletionTicket,
    },
    Clear {
        element: String,
    },
}

/// Effect applier that records every call. Nodes are element ids.
#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
    /// Elements that locate() reports as absent.
    pub missing: HashSet<String>,
    pending: Vec<CompletionTicket>,
}

impl Recorder {
    /// Tickets handed out since the last call, in apply order.
    pub fn take_tickets(&mut self) -> Vec<CompletionTicket> {
        std::mem::take(&mut self.pending)
    }

    pub fn applied(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Apply { effect, .. } => Some(effect.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn applied_elements(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Apply { element, .. } => Some(element.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn cleared(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Clear { element } => Some(element.clone()),
                _ => None,
            })
            .collect()
    }

    /// Effect currently showing on each element: last apply not followed by a clear.
    pub fn residual(&self) -> Vec<String> {
        let mut live: Vec<String> = Vec::new();
        for call in &self.calls {
            match call {
                Call::Apply { element, .. } => {
                    live.retain(|e| e != element);
                    live.push(element.clone());
                }
                Call::Clear { element } => live.retain(|e| e != element),
            }
        }
        live
    }

    pub fn reset(&mut self) {
        self.calls.clear();
        self.pending.clear();
    }
}

impl EffectApplier for Recorder {
    type Node = String;

    fn locate(&mut self, element_id: &str) -> Option<String> {
        (!self.missing.contains(element_id)).then(|| element_id.to_string())
    }

    fn apply(&mut self, node: &String, request: &EffectRequest, ticket: CompletionTicket) {
        self.calls.push(Call::Apply {
            element: node.clone(),
            effect: request.effect_name.clone(),
            ticket,
        });
        self.pending.push(ticket);
    }

    fn clear(&mut self, node: &String) {
        self.calls.push(Call::Clear {
            element: node.clone(),
        });
    }
}

pub type TestPlayback = Playback<Deck, Recorder>;

pub fn deck(name: &str) -> Deck {
    let json = decks::json(name).expect("fixture deck");
    Deck::from_json(&json).expect("deck parses")
}

pub fn playback(name: &str, cfg: PlaybackConfig) -> TestPlayback {
    Playback::new(cfg, deck(name), Recorder::default()).expect("valid config")
}

pub fn started(name: &str) -> TestPlayback {
    let mut pb = playback(name, PlaybackConfig::default());
    pb.start();
    pb
}

/// Complete every outstanding effect, including steps chained by completion.
pub fn finish_all(pb: &mut TestPlayback) {
    loop {
        let tickets = pb.effects_mut().take_tickets();
        if tickets.is_empty() {
            break;
        }
        for ticket in tickets {
            pb.complete(ticket);
        }
    }
}

/// advance() then let the step finish.
pub fn click(pb: &mut TestPlayback) {
    pb.advance();
    finish_all(pb);
}

pub fn position(pb: &TestPlayback) -> (usize, usize) {
    let cursor = pb.cursor();
    (cursor.slide_index, cursor.step_index)
}

pub fn notices(events: &[PlaybackEvent]) -> Vec<Notice> {
    events
        .iter()
        .filter_map(|e| match e {
            PlaybackEvent::Notice(n) => Some(*n),
            _ => None,
        })
        .collect()
}
