use thiserror::Error;

/// Errors that can occur while loading a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The raw input could not be parsed into the expected record shape.
    #[error("malformed registry: {reason}")]
    Malformed { reason: String },

    /// Two records share the same key within one registry.
    #[error("duplicate registry key: {key}")]
    DuplicateKey { key: String },
}

/// Convenience alias for registry results.
pub type RegistryResult<T> = Result<T, RegistryError>;
