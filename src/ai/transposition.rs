use std::collections::HashMap;

/// How a stored score relates to the true minimax value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// True value >= score (the node failed high).
    Lower,
    /// True value <= score (the node failed low).
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TtEntry {
    pub score: f64,
    pub depth: u32,
    pub bound: Bound,
}

/// Search memo keyed by the raw `(red, yellow)` bitboard pair.
///
/// Scores depend on the evaluator's bias snapshot, so the owner clears the
/// table before every top-level decision.
#[derive(Debug, Default)]
pub struct TranspositionTable {
    entries: HashMap<[u64; 2], TtEntry>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for `key`, only if it was searched at least `depth` plies deep.
    pub fn probe(&self, key: [u64; 2], depth: u32) -> Option<TtEntry> {
        self.entries
            .get(&key)
            .filter(|entry| entry.depth >= depth)
            .copied()
    }

    pub fn store(&mut self, key: [u64; 2], entry: TtEntry) {
        self.entries.insert(key, entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: f64, depth: u32, bound: Bound) -> TtEntry {
        TtEntry {
            score,
            depth,
            bound,
        }
    }

    #[test]
    fn test_probe_respects_depth() {
        let mut tt = TranspositionTable::new();
        tt.store([1, 2], entry(5.0, 3, Bound::Exact));
        assert_eq!(tt.probe([1, 2], 3).map(|e| e.score), Some(5.0));
        assert_eq!(tt.probe([1, 2], 2).map(|e| e.score), Some(5.0));
        assert!(tt.probe([1, 2], 4).is_none());
        assert!(tt.probe([2, 1], 0).is_none());
    }

    #[test]
    fn test_store_overwrites_and_clear() {
        let mut tt = TranspositionTable::new();
        tt.store([0, 1], entry(1.0, 1, Bound::Lower));
        tt.store([0, 1], entry(-3.0, 2, Bound::Upper));
        assert_eq!(tt.len(), 1);
        assert_eq!(tt.probe([0, 1], 2), Some(entry(-3.0, 2, Bound::Upper)));
        tt.clear();
        assert!(tt.is_empty());
    }
}
