//! Asset to sector mapping.

use std::collections::HashMap;

/// Ordered association from asset identifier to sector name.
///
/// Iteration follows insertion order. Re-inserting an asset replaces its
/// sector but keeps its original position, so the distinct sector list is
/// reproducible for a given input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectorMapping {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl SectorMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `asset` to `sector`.
    pub fn insert(&mut self, asset: impl Into<String>, sector: impl Into<String>) {
        let asset = asset.into();
        let sector = sector.into();
        match self.index.get(&asset) {
            Some(&i) => self.entries[i].1 = sector,
            None => {
                self.index.insert(asset.clone(), self.entries.len());
                self.entries.push((asset, sector));
            }
        }
    }

    /// Sector of an asset.
    pub fn sector(&self, asset: &str) -> Option<&str> {
        self.index.get(asset).map(|&i| self.entries[i].1.as_str())
    }

    /// Check if an asset is mapped.
    pub fn contains(&self, asset: &str) -> bool {
        self.index.contains_key(asset)
    }

    /// Distinct sectors in order of first occurrence.
    pub fn sectors(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for (_, sector) in &self.entries {
            if !out.contains(&sector.as_str()) {
                out.push(sector);
            }
        }
        out
    }

    /// Assets belonging to a sector, in insertion order.
    pub fn assets_in(&self, sector: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, s)| s == sector)
            .map(|(a, _)| a.as_str())
            .collect()
    }

    /// Iterate over `(asset, sector)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(a, s)| (a.as_str(), s.as_str()))
    }

    /// Number of mapped assets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no asset is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A, S> FromIterator<(A, S)> for SectorMapping
where
    A: Into<String>,
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (A, S)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (asset, sector) in iter {
            mapping.insert(asset, sector);
        }
        mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> SectorMapping {
        [
            ("XLE", "Energy"),
            ("AAPL", "Information Technology"),
            ("XOM", "Energy"),
            ("MSFT", "Information Technology"),
            ("JPM", "Financials"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_sectors_in_first_occurrence_order() {
        assert_eq!(
            mapping().sectors(),
            vec!["Energy", "Information Technology", "Financials"]
        );
    }

    #[test]
    fn test_lookup() {
        let m = mapping();
        assert_eq!(m.sector("XOM"), Some("Energy"));
        assert_eq!(m.sector("TSLA"), None);
        assert!(m.contains("JPM"));
        assert_eq!(m.len(), 5);
        assert_eq!(m.assets_in("Energy"), vec!["XLE", "XOM"]);
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut m = mapping();
        m.insert("XLE", "Commodities");

        assert_eq!(m.len(), 5);
        assert_eq!(m.iter().next(), Some(("XLE", "Commodities")));
        assert_eq!(
            m.sectors(),
            vec![
                "Commodities",
                "Information Technology",
                "Energy",
                "Financials"
            ]
        );
    }
}
