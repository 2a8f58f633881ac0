use std::collections::BTreeMap;

use serde::Deserialize;

/// Running ability totals, keyed by ability name. A missing key means 0.
pub type Abilities = BTreeMap<String, i64>;

/// Ability data as it appears in story files: either a single mapping or an
/// arbitrarily nested list of mappings. Anything else is kept as `Ignored` so
/// loosely-structured files still load.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AbilityDelta {
    Map(Abilities),
    List(Vec<AbilityDelta>),
    Ignored(serde_json::Value),
}

impl AbilityDelta {
    /// Every mapping reachable inside this delta, in document order.
    pub fn mappings(&self) -> Vec<&Abilities> {
        let mut out = Vec::new();
        self.collect(&mut out, &mut Vec::new());
        out
    }

    /// Every entry that is neither a mapping nor a list of mappings.
    pub fn ignored(&self) -> Vec<&serde_json::Value> {
        let mut out = Vec::new();
        self.collect(&mut Vec::new(), &mut out);
        out
    }

    fn collect<'a>(
        &'a self,
        maps: &mut Vec<&'a Abilities>,
        ignored: &mut Vec<&'a serde_json::Value>,
    ) {
        match self {
            AbilityDelta::Map(map) => maps.push(map),
            AbilityDelta::List(items) => {
                for item in items {
                    item.collect(maps, ignored);
                }
            }
            AbilityDelta::Ignored(value) => ignored.push(value),
        }
    }
}

impl From<Abilities> for AbilityDelta {
    fn from(map: Abilities) -> Self {
        AbilityDelta::Map(map)
    }
}

/// Merge a delta of any supported shape into `base`, returning new totals.
///
/// `base` is never touched: callers on sibling branches each get their own
/// copy. Unrecognized entries contribute nothing.
pub fn merge(base: &Abilities, delta: &AbilityDelta) -> Abilities {
    delta
        .mappings()
        .into_iter()
        .fold(base.clone(), |acc, map| add(&acc, map))
}

/// Merge a canonical mapping into `base`, returning new totals.
///
/// Totals saturate at the `i64` bounds instead of overflowing.
pub fn add(base: &Abilities, delta: &Abilities) -> Abilities {
    let mut merged = base.clone();
    for (name, &value) in delta {
        let total = merged.entry(name.clone()).or_insert(0);
        *total = total.saturating_add(value);
    }
    merged
}
