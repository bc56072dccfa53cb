use serde::{Deserialize, Serialize};

/// A protocol version label, e.g. `"1.19.4"` or `"23w31a"`.
///
/// Versions are opaque labels: the generator never orders or compares them
/// beyond equality. The pair (source version, target version) identifies one
/// generation run.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtocolVersion(String);

impl ProtocolVersion {
    /// Create a version from a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The version label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProtocolVersion {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}
