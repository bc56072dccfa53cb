use serde::{Deserialize, Serialize};

/// A registry category name, e.g. `"blockstates"`, `"items"`, `"sounds"`.
///
/// Categories partition the identifier space: each category is reconciled
/// independently and carries its own mapping table in the output document.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Create a category from a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The category name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_lexicographic() {
        let mut cats = vec![Category::new("sounds"), Category::new("blocks"), Category::new("items")];
        cats.sort();
        let names: Vec<&str> = cats.iter().map(Category::as_str).collect();
        assert_eq!(names, ["blocks", "items", "sounds"]);
    }
}
