use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::table::CategoryTable;
use crate::version::ProtocolVersion;

/// Metadata for one version-pair generation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Version the mappings translate from.
    pub source_version: ProtocolVersion,
    /// Version the mappings translate to.
    pub target_version: ProtocolVersion,
    /// When the document was generated. Supplied by the caller so that
    /// fixed inputs always produce identical documents.
    pub generated_at: DateTime<Utc>,
}

/// The complete output of one generation run: every category mapping table
/// plus run metadata.
///
/// Tables and identifier lists are keyed by category in a `BTreeMap` so all
/// iteration is deterministic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingDocument {
    /// Run metadata.
    pub meta: DocumentMeta,
    /// Per-category mapping tables.
    pub tables: BTreeMap<Category, CategoryTable>,
    /// Full target-registry key lists for categories configured to embed
    /// them (consumers that need string identifiers at runtime).
    pub identifiers: BTreeMap<Category, Vec<String>>,
}

impl MappingDocument {
    /// Create an empty document with the given metadata.
    pub fn new(meta: DocumentMeta) -> Self {
        Self {
            meta,
            tables: BTreeMap::new(),
            identifiers: BTreeMap::new(),
        }
    }

    /// The mapping table for a category, if present.
    pub fn table(&self, category: &Category) -> Option<&CategoryTable> {
        self.tables.get(category)
    }

    /// Resolve a source index in a category, applying the category fallback.
    ///
    /// Returns `None` for unknown categories, out-of-bounds indices, and
    /// unmapped entries without a fallback.
    pub fn translate(&self, category: &Category, source_index: u32) -> Option<u32> {
        self.table(category)?.translate(source_index)
    }

    /// Categories present in the document, in sorted order.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.tables.keys()
    }
}
