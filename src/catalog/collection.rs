//! Collection cache format and snapshot reconciliation
//!
//! The cache holds one `<qty> : <name>` line per owned card, no header.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

use super::CardCatalog;

static CACHE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s:\s(.*?)\s*$").expect("cache line pattern is valid")
});

/// Basic resources that show up in collection snapshots but are not cards.
pub const RESERVED_RESOURCES: [&str; 5] = [
    "Blood Shard",
    "Ruby Shard",
    "Sapphire Shard",
    "Diamond Shard",
    "Wild Shard",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub quantity: u32,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Tally entries written onto catalog cards
    pub applied: usize,
    /// Tally names with no catalog entry (no price data), dropped
    pub unmatched: Vec<String>,
}

/// Parse cache text. Lines that do not match are skipped.
pub fn parse_cache(text: &str) -> Vec<CacheEntry> {
    text.lines()
        .filter_map(|line| {
            let caps = CACHE_LINE.captures(line)?;
            let quantity = caps[1].parse().ok()?;
            let name = &caps[2];
            if name.is_empty() {
                return None;
            }
            Some(CacheEntry {
                quantity,
                name: name.to_string(),
            })
        })
        .collect()
}

/// Overwrite ownership quantities from cache text, creating unpriced cards as needed.
pub fn load_cache(catalog: &mut CardCatalog, text: &str) -> usize {
    let entries = parse_cache(text);
    for entry in &entries {
        catalog.upsert(&entry.name, |c| c.quantity_owned = entry.quantity);
    }
    debug!("Loaded {} collection cache entries", entries.len());
    entries.len()
}

/// Render every owned card as a cache line, in catalog order.
pub fn serialize_cache(catalog: &CardCatalog) -> String {
    catalog
        .owned()
        .map(|c| format!("{} : {}\n", c.quantity_owned, c.name))
        .collect()
}

pub fn is_reserved_resource(name: &str) -> bool {
    RESERVED_RESOURCES.contains(&name)
}

/// Count snapshot entries per name. Commas are stripped (the price feed has
/// none) and basic resources are discarded.
pub fn tally_snapshot<'a, I>(entries: I) -> BTreeMap<String, u32>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut tally = BTreeMap::new();
    for raw in entries {
        let name = raw.replace(',', "");
        if is_reserved_resource(&name) {
            continue;
        }
        *tally.entry(name).or_insert(0) += 1;
    }
    tally
}

/// Zero every quantity, then apply the tally. Quantities always reflect the
/// latest full snapshot.
pub fn reconcile_snapshot(
    catalog: &mut CardCatalog,
    tally: &BTreeMap<String, u32>,
) -> ReconcileReport {
    let mut report = ReconcileReport::default();
    catalog.zero_quantities();

    for (name, count) in tally {
        if catalog.update(name, |c| c.quantity_owned = *count) {
            report.applied += 1;
        } else {
            warn!("Owned card {} has no price data, dropping it", name);
            report.unmatched.push(name.clone());
        }
    }

    info!(
        "Reconciled collection: {} cards owned, {} unmatched",
        report.applied,
        report.unmatched.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cache_lines() {
        let text = "5 : Adamanthian Scrivener\n12 : Burn   \nnot a line\n3: Bad Spacing\n";
        let entries = parse_cache(text);
        assert_eq!(
            entries,
            vec![
                CacheEntry {
                    quantity: 5,
                    name: "Adamanthian Scrivener".into()
                },
                CacheEntry {
                    quantity: 12,
                    name: "Burn".into()
                },
            ]
        );
    }

    #[test]
    fn test_load_overwrites_quantity_and_creates_unpriced() {
        let mut catalog = CardCatalog::new();
        catalog.upsert("Burn", |c| {
            c.gold_price = 9;
            c.quantity_owned = 1;
        });

        let loaded = load_cache(&mut catalog, "4 : Burn\n2 : Alwyn\n");
        assert_eq!(loaded, 2);

        let burn = catalog.get("Burn").unwrap();
        assert_eq!((burn.quantity_owned, burn.gold_price), (4, 9));
        let alwyn = catalog.get("Alwyn").unwrap();
        assert_eq!((alwyn.quantity_owned, alwyn.gold_price), (2, 0));
    }

    #[test]
    fn test_serialize_round_trip() {
        let mut catalog = CardCatalog::new();
        catalog.upsert("Burn", |c| c.quantity_owned = 3);
        catalog.upsert("Unowned", |c| c.gold_price = 50);
        catalog.upsert("Zoltog", |c| c.quantity_owned = 1);

        let text = serialize_cache(&catalog);
        assert_eq!(text, "3 : Burn\n1 : Zoltog\n");

        let mut reloaded = CardCatalog::new();
        load_cache(&mut reloaded, &text);
        assert_eq!(reloaded.get("Burn").unwrap().quantity_owned, 3);
        assert_eq!(reloaded.get("Zoltog").unwrap().quantity_owned, 1);
        assert!(reloaded.get("Unowned").is_none());
    }

    #[test]
    fn test_tally_strips_commas_and_shards() {
        let tally = tally_snapshot([
            "Gortezuma, High Cleric",
            "Blood Shard",
            "Gortezuma, High Cleric",
            "Wild Shard",
            "Burn",
        ]);
        assert_eq!(tally.get("Gortezuma High Cleric"), Some(&2));
        assert_eq!(tally.get("Burn"), Some(&1));
        assert!(RESERVED_RESOURCES.iter().all(|r| !tally.contains_key(*r)));
    }

    #[test]
    fn test_reconcile_zeroes_missing_cards() {
        let mut catalog = CardCatalog::new();
        catalog.upsert("A", |c| c.quantity_owned = 3);
        catalog.upsert("B", |c| c.quantity_owned = 5);

        let tally = tally_snapshot(["A", "A"]);
        let report = reconcile_snapshot(&mut catalog, &tally);

        assert_eq!(report.applied, 1);
        assert!(report.unmatched.is_empty());
        assert_eq!(catalog.get("A").unwrap().quantity_owned, 2);
        assert_eq!(catalog.get("B").unwrap().quantity_owned, 0);
    }

    #[test]
    fn test_reconcile_reports_unmatched() {
        let mut catalog = CardCatalog::new();
        catalog.upsert("A", |_| {});

        let tally = tally_snapshot(["A", "Mystery"]);
        let report = reconcile_snapshot(&mut catalog, &tally);

        assert_eq!(report.unmatched, vec!["Mystery".to_string()]);
        assert!(catalog.get("Mystery").is_none());
    }
}
