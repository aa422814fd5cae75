//! Draft pack analysis: which card to take for value or for collection gaps

use std::fmt;
use tracing::debug;

use crate::catalog::CardCatalog;
use crate::domain::Card;
use crate::error::Result;

/// What "best" means when comparing two cards in a pack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    FewestOwned,
    MostGold,
    MostPlat,
}

impl Criterion {
    /// True when `candidate` strictly beats `current`. Ties keep `current`.
    pub fn improves_on(&self, current: &Card, candidate: &Card) -> bool {
        match self {
            Criterion::FewestOwned => candidate.quantity_owned < current.quantity_owned,
            Criterion::MostGold => candidate.gold_price > current.gold_price,
            Criterion::MostPlat => candidate.platinum_price > current.platinum_price,
        }
    }
}

/// Running best-so-far pick for one criterion
#[derive(Debug)]
struct Best<'a> {
    criterion: Criterion,
    card: Option<&'a Card>,
}

impl<'a> Best<'a> {
    fn new(criterion: Criterion) -> Self {
        Self {
            criterion,
            card: None,
        }
    }

    fn offer(&mut self, candidate: &'a Card) {
        match self.card {
            None => self.card = Some(candidate),
            Some(current) if self.criterion.improves_on(current, candidate) => {
                self.card = Some(candidate)
            }
            Some(_) => {}
        }
    }
}

/// Result of comparing every card in a draft pack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackAnalysis {
    pub most_gold: Card,
    pub most_plat: Card,
    pub fewest_owned: Card,
}

impl PackAnalysis {
    /// Compare every card in the pack against the catalog.
    ///
    /// Returns `Ok(None)` for an empty pack. Any card missing from the
    /// catalog fails the whole analysis.
    pub fn analyze<'n, I>(catalog: &CardCatalog, names: I) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = &'n str>,
    {
        let mut most_gold = Best::new(Criterion::MostGold);
        let mut most_plat = Best::new(Criterion::MostPlat);
        let mut fewest_owned = Best::new(Criterion::FewestOwned);

        for name in names {
            let card = catalog.lookup(name)?;
            debug!("Comparing {}", card);
            fewest_owned.offer(card);
            most_gold.offer(card);
            most_plat.offer(card);
        }

        Ok(match (most_gold.card, most_plat.card, fewest_owned.card) {
            (Some(gold), Some(plat), Some(owned)) => Some(Self {
                most_gold: gold.clone(),
                most_plat: plat.clone(),
                fewest_owned: owned.clone(),
            }),
            _ => None,
        })
    }
}

impl fmt::Display for PackAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\nWorth the most Gold: {}\nWorth the most Plat: {}\nFewest owned: {}",
            self.most_gold, self.most_plat, self.fewest_owned
        )
    }
}
