use std::collections::HashSet;

use crate::models::ticker::{ListingEntry, MatchSource};

use super::normalize::{aggressive_clean, clean_company_name};
use super::similarity;

/// Shortest first word accepted as a symbol match; avoids initials such as "G" or "JK".
const MIN_SYMBOL_WORD_LEN: usize = 3;

/// A listing match before the symbol is turned into a provider symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingMatch {
    pub symbol: String,
    pub company_name: String,
    pub source: MatchSource,
    pub score: f64,
}

#[derive(Debug, Clone)]
struct IndexedEntry {
    entry: ListingEntry,
    cleaned: String,
}

/// The exchange listing with company names pre-cleaned for matching.
///
/// Lookup order: exact cleaned-name equality, first word of the name being a
/// listed symbol, then the best similarity ratio at or above the threshold.
#[derive(Debug, Clone, Default)]
pub struct ListingIndex {
    entries: Vec<IndexedEntry>,
    symbols: HashSet<String>,
}

impl ListingIndex {
    pub fn new(entries: Vec<ListingEntry>) -> Self {
        let symbols = entries.iter().map(|e| e.symbol.to_uppercase()).collect();
        let entries = entries
            .into_iter()
            .map(|entry| IndexedEntry {
                cleaned: clean_company_name(&entry.company_name),
                entry,
            })
            .collect();
        Self { entries, symbols }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_symbol(&self, symbol: &str) -> bool {
        self.symbols.contains(&symbol.to_uppercase())
    }

    /// Best listing match for a security name, or `None` below `fuzzy_threshold`.
    pub fn find(&self, security_name: &str, fuzzy_threshold: f64, symbol_score: f64) -> Option<ListingMatch> {
        let cleaned = clean_company_name(security_name);
        if cleaned.is_empty() {
            return None;
        }

        if let Some(hit) = self.entries.iter().find(|e| e.cleaned == cleaned) {
            return Some(Self::to_match(hit, MatchSource::Exact, 1.0));
        }

        if let Some(hit) = self.symbol_match(security_name) {
            return Some(Self::to_match(hit, MatchSource::Symbol, symbol_score));
        }

        let (best, score) = self.best_fuzzy(&cleaned)?;
        if score >= fuzzy_threshold {
            Some(Self::to_match(best, MatchSource::Fuzzy, score))
        } else {
            tracing::debug!(
                security = security_name,
                candidate = %best.entry.symbol,
                score,
                "Best listing candidate below threshold"
            );
            None
        }
    }

    fn symbol_match(&self, security_name: &str) -> Option<&IndexedEntry> {
        let cleaned = aggressive_clean(security_name);
        let first_word = cleaned.split_whitespace().next()?;
        if first_word.len() < MIN_SYMBOL_WORD_LEN || !self.symbols.contains(&first_word.to_ascii_uppercase()) {
            return None;
        }
        self.entries
            .iter()
            .find(|e| e.entry.symbol.eq_ignore_ascii_case(first_word))
    }

    /// Highest-ratio entry; the first one wins ties.
    fn best_fuzzy(&self, cleaned: &str) -> Option<(&IndexedEntry, f64)> {
        let mut best: Option<(&IndexedEntry, f64)> = None;
        for entry in &self.entries {
            let score = similarity::ratio(cleaned, &entry.cleaned);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((entry, score));
            }
        }
        best
    }

    fn to_match(hit: &IndexedEntry, source: MatchSource, score: f64) -> ListingMatch {
        ListingMatch {
            symbol: hit.entry.symbol.clone(),
            company_name: hit.entry.company_name.clone(),
            source,
            score,
        }
    }
}
