use std::fmt;

/// Substring that marks a booster pack in the price feed.
pub const BOOSTER_PACK_MARKER: &str = "Booster Pack";

/// One tradeable card with its last known market prices and owned quantity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub name: String,
    pub platinum_price: u32,
    pub gold_price: u32,
    pub quantity_owned: u32,
}

impl Card {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            platinum_price: 0,
            gold_price: 0,
            quantity_owned: 0,
        }
    }

    pub fn with_prices(name: impl Into<String>, platinum_price: u32, gold_price: u32) -> Self {
        Self {
            platinum_price,
            gold_price,
            ..Self::new(name)
        }
    }

    pub fn is_owned(&self) -> bool {
        self.quantity_owned > 0
    }

    pub fn is_booster_pack(&self) -> bool {
        self.name.contains(BOOSTER_PACK_MARKER)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' [Qty: {}] - {}p and {}g",
            self.name, self.quantity_owned, self.platinum_price, self.gold_price
        )
    }
}
