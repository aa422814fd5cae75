//! Per-event handlers
//!
//! Each handler reads the positions it needs from the message array and
//! returns the guidance text. Payload shapes, by position:
//!
//! | Event            | Shape                                                   |
//! |------------------|---------------------------------------------------------|
//! | GameStarted      | `["GameStarted", player]`                               |
//! | GameEnded        | `["GameEnded", player, [[_, outcome], [opponent, ..]]]` |
//! | DraftPack        | `["DraftPack", player, [card, card, ..]]`               |
//! | DraftCardPicked  | `["DraftCardPicked", player, [card]]`                   |
//! | Collection       | `["Collection", player, [card, card, ..]]`              |
//! | SaveDeck         | `["SaveDeck", player, [deck, champion, [..], [..]]]`    |
//! | Logout           | `["Logout", player]`                                    |
//!
//! All payload reads happen before any state is touched, so a malformed
//! message never leaves a half-applied update behind.

use tracing::debug;

use super::pack::PackAnalysis;
use super::GuidanceEngine;
use crate::domain::format_timestamp;
use crate::error::{GuideError, Result};
use crate::events::{describe_path, strings, Event, EventKind, Payload};

pub const UNKNOWN_MESSAGE_PREFIX: &str = "Unknown Message Type: ";

pub type Handler = fn(&mut GuidanceEngine, &Event) -> Result<String>;

const DISPATCH_TABLE: [(EventKind, Handler); 7] = [
    (EventKind::GameStarted, game_started),
    (EventKind::GameEnded, game_ended),
    (EventKind::DraftPack, draft_pack),
    (EventKind::DraftCardPicked, draft_card_picked),
    (EventKind::Collection, collection),
    (EventKind::SaveDeck, save_deck),
    (EventKind::Logout, logout),
];

/// Handler for a decoded kind; unrecognized tags get the unknown-type handler.
pub fn handler_for(kind: Option<EventKind>) -> Handler {
    kind.and_then(|kind| {
        DISPATCH_TABLE
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, handler)| *handler)
    })
    .unwrap_or(unhandled)
}

fn unhandled(_: &mut GuidanceEngine, event: &Event) -> Result<String> {
    Ok(format!("{}{}", UNKNOWN_MESSAGE_PREFIX, event.tag))
}

fn required_str<'e>(event: &'e Event, path: &[usize]) -> Result<&'e str> {
    event.body.str_at(path).ok_or_else(|| {
        GuideError::malformed_payload(
            &event.tag,
            format!("expected a string at {}", describe_path(path)),
        )
    })
}

fn required_list<'e>(event: &'e Event, path: &[usize]) -> Result<&'e [Payload]> {
    event.body.list_at(path).ok_or_else(|| {
        GuideError::malformed_payload(
            &event.tag,
            format!("expected a list at {}", describe_path(path)),
        )
    })
}

fn game_started(engine: &mut GuidanceEngine, _event: &Event) -> Result<String> {
    let now = engine.clock.now();
    engine.session.start(now);
    Ok(format!("Starting game at {}", format_timestamp(&now)))
}

fn game_ended(engine: &mut GuidanceEngine, event: &Event) -> Result<String> {
    let outcome = required_str(event, &[2, 0, 1])?;
    let opponent = required_str(event, &[2, 1, 0])?;

    let now = engine.clock.now();
    let began = engine
        .session
        .game_started_at
        .map(|ts| format_timestamp(&ts))
        .unwrap_or_else(|| "unknown".to_string());
    let elapsed = engine.session.end(now);

    let verdict = if outcome == "Won" {
        format!("Congratulations on your win against {}!", opponent)
    } else {
        format!("Condolences on your loss to {}.", opponent)
    };

    Ok(format!(
        "Ending game at {}\nBegan game at {}\n{}\n{}",
        format_timestamp(&now),
        began,
        elapsed,
        verdict
    ))
}

fn draft_pack(engine: &mut GuidanceEngine, event: &Event) -> Result<String> {
    let cards = required_list(event, &[2])?;
    match PackAnalysis::analyze(&engine.catalog, strings(cards))? {
        Some(analysis) => Ok(format!("DraftPack: {}", analysis)),
        None => Ok("DraftPack: no cards in pack".to_string()),
    }
}

fn draft_card_picked(engine: &mut GuidanceEngine, event: &Event) -> Result<String> {
    let name = required_str(event, &[2, 0])?;
    let card = engine.catalog.lookup(name)?;
    Ok(format!("Drafted card '{}' : {}", name, card))
}

fn collection(engine: &mut GuidanceEngine, event: &Event) -> Result<String> {
    let entries = required_list(event, &[2])?;
    engine.pending_snapshot = Some(entries.to_vec());
    engine.reconciliation_pending = true;
    debug!("Captured collection snapshot of {} entries", entries.len());
    Ok("Processing Collection Event".to_string())
}

fn save_deck(_engine: &mut GuidanceEngine, event: &Event) -> Result<String> {
    let deck = required_str(event, &[2, 0])?;
    let champion = required_str(event, &[2, 1])?;
    Ok(format!("Saved deck '{}' with Champion of {}", deck, champion))
}

fn logout(_engine: &mut GuidanceEngine, event: &Event) -> Result<String> {
    let player = required_str(event, &[1])?;
    Ok(format!(
        "Logging out player {}. Hope to see you again soon!",
        player
    ))
}
