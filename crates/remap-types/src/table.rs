use serde::{Deserialize, Serialize};

/// Wire representation of an unmapped entry in dense integer arrays.
pub const UNMAPPED_WIRE: i32 = -1;

/// A dense source→target index mapping for one registry category.
///
/// `entries[source_index]` holds the target index, or `None` when the source
/// identifier has no valid equivalent in the target registry. A runtime
/// consumer substitutes the category [`fallback`](Self::fallback) for
/// unmapped entries.
///
/// Tables are immutable values: constructed once by the reconciliation
/// engine and never modified afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTable {
    /// Mapped target index per source index; `None` means unmapped.
    entries: Vec<Option<u32>>,
    /// Number of identifiers in the target registry.
    mapped_size: u32,
    /// Category-wide default target index applied for unmapped entries.
    fallback: Option<u32>,
}

impl CategoryTable {
    /// Create a table from dense entries and the target registry size.
    pub fn new(entries: Vec<Option<u32>>, mapped_size: u32) -> Self {
        Self {
            entries,
            mapped_size,
            fallback: None,
        }
    }

    /// Attach a category-wide fallback target index.
    pub fn with_fallback(mut self, fallback: u32) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Number of source indices covered by this table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table covers no source indices.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of identifiers in the target registry.
    pub fn mapped_size(&self) -> u32 {
        self.mapped_size
    }

    /// The configured fallback target index, if any.
    pub fn fallback(&self) -> Option<u32> {
        self.fallback
    }

    /// The raw stored entry for a source index.
    ///
    /// Outer `None` means the source index is out of bounds; inner `None`
    /// means the entry is unmapped.
    pub fn get(&self, source_index: u32) -> Option<Option<u32>> {
        self.entries.get(source_index as usize).copied()
    }

    /// Resolve a source index to a target index, applying the fallback.
    ///
    /// Returns `None` when the source index is out of bounds, or when the
    /// entry is unmapped and no fallback is configured.
    pub fn translate(&self, source_index: u32) -> Option<u32> {
        match self.get(source_index)? {
            Some(target) => Some(target),
            None => self.fallback,
        }
    }

    /// All entries in source-index order.
    pub fn entries(&self) -> &[Option<u32>] {
        &self.entries
    }

    /// Returns `true` if any entry is unmapped.
    pub fn has_unmapped(&self) -> bool {
        self.entries.iter().any(Option::is_none)
    }

    /// Returns `true` if every source index maps to itself.
    pub fn is_identity(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(i, e)| *e == Some(i as u32))
    }

    /// Entry at a source index in wire form (`-1` for unmapped).
    pub fn wire_entry(&self, source_index: usize) -> i32 {
        match self.entries[source_index] {
            Some(target) => target as i32,
            None => UNMAPPED_WIRE,
        }
    }

    /// Compute summary statistics over the table.
    pub fn stats(&self) -> TableStats {
        let mut identity_mappings = 0u32;
        let mut empty_mappings = 0u32;
        let mut shift_changes = 0u32;
        let mut previous = UNMAPPED_WIRE;
        for (i, entry) in self.entries.iter().enumerate() {
            let wire = match entry {
                Some(target) => *target as i32,
                None => UNMAPPED_WIRE,
            };
            if wire == UNMAPPED_WIRE {
                empty_mappings += 1;
            } else if wire == i as i32 {
                identity_mappings += 1;
            }

            // A shift starts wherever the mapped id is not the previous
            // mapped id + 1 (the first entry shifts unless it maps to 0).
            if i == 0 {
                if wire != 0 {
                    shift_changes += 1;
                }
            } else if wire != previous + 1 {
                shift_changes += 1;
            }
            previous = wire;
        }

        TableStats {
            size: self.entries.len() as u32,
            mapped_size: self.mapped_size,
            identity_mappings,
            empty_mappings,
            shift_changes,
        }
    }
}

/// Summary statistics for one category table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableStats {
    /// Number of source indices.
    pub size: u32,
    /// Number of identifiers in the target registry.
    pub mapped_size: u32,
    /// Entries mapping a source index to the same target index.
    pub identity_mappings: u32,
    /// Entries with no target (unmapped).
    pub empty_mappings: u32,
    /// Positions where the mapped id is not the previous mapped id + 1.
    pub shift_changes: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: Vec<Option<u32>>, mapped_size: u32) -> CategoryTable {
        CategoryTable::new(entries, mapped_size)
    }

    #[test]
    fn identity_table_stats() {
        let t = table(vec![Some(0), Some(1), Some(2)], 3);
        assert!(t.is_identity());
        let stats = t.stats();
        assert_eq!(stats.identity_mappings, 3);
        assert_eq!(stats.empty_mappings, 0);
        assert_eq!(stats.shift_changes, 0);
    }

    #[test]
    fn translate_direct_hit() {
        let t = table(vec![Some(5), None], 6);
        assert_eq!(t.translate(0), Some(5));
    }

    #[test]
    fn translate_unmapped_without_fallback() {
        let t = table(vec![Some(5), None], 6);
        assert_eq!(t.translate(1), None);
    }

    #[test]
    fn translate_unmapped_with_fallback() {
        let t = table(vec![Some(5), None], 6).with_fallback(0);
        assert_eq!(t.translate(1), Some(0));
    }

    #[test]
    fn translate_out_of_bounds() {
        let t = table(vec![Some(0)], 1).with_fallback(0);
        assert_eq!(t.translate(9), None);
    }

    #[test]
    fn shift_changes_counts_breaks() {
        // 0→0, 1→1 run; 2→5 breaks; 3→6 continues.
        let t = table(vec![Some(0), Some(1), Some(5), Some(6)], 7);
        assert_eq!(t.stats().shift_changes, 1);
    }

    #[test]
    fn shift_changes_counts_first_entry() {
        let t = table(vec![Some(3), Some(4)], 5);
        assert_eq!(t.stats().shift_changes, 1);
    }

    #[test]
    fn unmapped_breaks_a_run() {
        let t = table(vec![Some(0), None, Some(2)], 3);
        let stats = t.stats();
        assert_eq!(stats.empty_mappings, 1);
        // The None entry breaks the run, and the entry after it starts a new one.
        assert_eq!(stats.shift_changes, 2);
    }

    #[test]
    fn wire_entry_unmapped_is_minus_one() {
        let t = table(vec![None], 0);
        assert_eq!(t.wire_entry(0), UNMAPPED_WIRE);
    }
}
