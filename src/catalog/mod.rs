//! Card catalog and the two text feeds that populate it
//!
//! - `prices` parses the market price feed (price fields only)
//! - `collection` reads and writes the collection cache and reconciles
//!   collection snapshots (ownership quantity only)

pub mod collection;
pub mod prices;

use std::collections::BTreeMap;

use crate::domain::Card;
use crate::error::{GuideError, Result};

pub use collection::{
    is_reserved_resource, load_cache, parse_cache, reconcile_snapshot, serialize_cache,
    tally_snapshot, CacheEntry, ReconcileReport, RESERVED_RESOURCES,
};
pub use prices::{ingest_prices, parse_price_line, IngestReport, PriceLine};

/// Authoritative mapping from card name to its market/ownership record.
///
/// Entries are never removed. Iteration is ordered by name, so two
/// consecutive dumps always agree.
#[derive(Debug, Clone, Default)]
pub struct CardCatalog {
    cards: BTreeMap<String, Card>,
}

impl CardCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Card> {
        self.cards.get(name)
    }

    /// Like `get`, but a missing card is a hard error.
    pub fn lookup(&self, name: &str) -> Result<&Card> {
        self.cards
            .get(name)
            .ok_or_else(|| GuideError::CardNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cards.contains_key(name)
    }

    /// Create the card if absent, then apply `mutate` to it.
    pub fn upsert<F>(&mut self, name: &str, mutate: F) -> &Card
    where
        F: FnOnce(&mut Card),
    {
        let card = self
            .cards
            .entry(name.to_string())
            .or_insert_with(|| Card::new(name));
        mutate(card);
        card
    }

    /// Update an existing card only. Returns false when the name is unknown.
    pub fn update<F>(&mut self, name: &str, mutate: F) -> bool
    where
        F: FnOnce(&mut Card),
    {
        match self.cards.get_mut(name) {
            Some(card) => {
                mutate(card);
                true
            }
            None => false,
        }
    }

    pub fn all(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    pub fn owned(&self) -> impl Iterator<Item = &Card> {
        self.cards.values().filter(|c| c.is_owned())
    }

    pub fn zero_quantities(&mut self) {
        for card in self.cards.values_mut() {
            card.quantity_owned = 0;
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Price table, one `<qty> - '<name>' - <plat>p - <gold>g` line per card
    pub fn dump_prices(&self) -> String {
        self.all()
            .map(|c| {
                format!(
                    "{} - '{}' - {}p - {}g\n",
                    c.quantity_owned, c.name, c.platinum_price, c.gold_price
                )
            })
            .collect()
    }

    /// Owned cards only, one display line each
    pub fn dump_collection(&self) -> String {
        self.owned().map(|c| format!("{}\n", c)).collect()
    }
}
