//! Price feed ingestion
//!
//! Example feed line:
//!
//! ```text
//! Accursed Jerkin ... 1 PLATINUM [23 auctions] ... 247 GOLD [50 auctions]
//! ```

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

use super::CardCatalog;

static PRICE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*)\s+\.\.\. (\d+) PLATINUM.*\.\.\.\s+(\d+) GOLD.*")
        .expect("price line pattern is valid")
});

/// Fields captured from one price feed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLine {
    pub name: String,
    pub platinum: u32,
    pub gold: u32,
}

/// Outcome of one ingest pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Lines applied to the catalog
    pub applied: usize,
    /// Cards seen for the first time
    pub created: usize,
    /// Non-blank lines that did not match the feed pattern
    pub skipped: usize,
}

/// Parse a single feed line. Returns `None` for anything that does not match,
/// including an empty name or a price too large to represent.
pub fn parse_price_line(line: &str) -> Option<PriceLine> {
    let caps = PRICE_LINE.captures(line)?;
    let name = caps.get(1)?.as_str();
    if name.is_empty() {
        return None;
    }
    let platinum = caps.get(2)?.as_str().parse().ok()?;
    let gold = caps.get(3)?.as_str().parse().ok()?;
    Some(PriceLine {
        name: name.to_string(),
        platinum,
        gold,
    })
}

/// Apply a raw price feed to the catalog.
///
/// Only price fields are touched on existing cards. Booster packs are always
/// counted as owned once so they can be valued.
pub fn ingest_prices(catalog: &mut CardCatalog, text: &str) -> IngestReport {
    let mut report = IngestReport::default();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Some(price) = parse_price_line(line) else {
            warn!("Did not match price line: {}", line);
            report.skipped += 1;
            continue;
        };

        if !catalog.contains(&price.name) {
            report.created += 1;
        }
        let card = catalog.upsert(&price.name, |c| {
            c.platinum_price = price.platinum;
            c.gold_price = price.gold;
            if c.is_booster_pack() {
                c.quantity_owned = 1;
            }
        });
        debug!("Priced {}", card);
        report.applied += 1;
    }

    info!(
        "Ingested {} price lines ({} new cards, {} skipped)",
        report.applied, report.created, report.skipped
    );
    report
}
