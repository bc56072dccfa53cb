//! Process exit codes: one per core error kind, for scripting use.

use remap_overrides::OverrideError;
use remap_pack::PackError;
use remap_reconcile::ReconcileError;
use remap_registry::RegistryError;
use remap_table::BuildError;

pub const EXIT_MALFORMED_REGISTRY: i32 = 2;
pub const EXIT_DUPLICATE_KEY: i32 = 3;
pub const EXIT_UNRESOLVED_OVERRIDE: i32 = 4;
pub const EXIT_AMBIGUOUS_MATCH: i32 = 5;
pub const EXIT_MISSING_FALLBACK: i32 = 6;
pub const EXIT_UNSUPPORTED_FORMAT: i32 = 7;
pub const EXIT_CORRUPT_ARTIFACT: i32 = 8;
pub const EXIT_UNMAPPED: i32 = 9;

/// Map an error chain to its process exit code.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<BuildError>() {
            return build_code(e);
        }
        if let Some(e) = cause.downcast_ref::<RegistryError>() {
            return registry_code(e);
        }
        if cause.downcast_ref::<OverrideError>().is_some() {
            return EXIT_UNRESOLVED_OVERRIDE;
        }
        if let Some(e) = cause.downcast_ref::<ReconcileError>() {
            return reconcile_code(e);
        }
        if let Some(e) = cause.downcast_ref::<PackError>() {
            return pack_code(e);
        }
    }
    1
}

fn registry_code(err: &RegistryError) -> i32 {
    match err {
        RegistryError::Malformed { .. } => EXIT_MALFORMED_REGISTRY,
        RegistryError::DuplicateKey { .. } => EXIT_DUPLICATE_KEY,
    }
}

fn reconcile_code(err: &ReconcileError) -> i32 {
    match err {
        ReconcileError::Ambiguous { .. } => EXIT_AMBIGUOUS_MATCH,
        ReconcileError::Unmapped { .. } => EXIT_UNMAPPED,
    }
}

fn build_code(err: &BuildError) -> i32 {
    match err {
        BuildError::Config { .. } => 1,
        BuildError::Overrides(_) => EXIT_UNRESOLVED_OVERRIDE,
        // Ambiguities outrank unmapped identifiers when both are present.
        BuildError::Reconcile(errors) => errors
            .iter()
            .map(reconcile_code)
            .min()
            .unwrap_or(EXIT_AMBIGUOUS_MATCH),
        BuildError::MissingFallback(_) | BuildError::InvalidFallback { .. } => {
            EXIT_MISSING_FALLBACK
        }
    }
}

fn pack_code(err: &PackError) -> i32 {
    match err {
        PackError::UnsupportedVersion(_) => EXIT_UNSUPPORTED_FORMAT,
        PackError::InvalidMagic { .. }
        | PackError::ChecksumMismatch
        | PackError::Corrupt { .. }
        | PackError::CompressionFailed(_)
        | PackError::DecompressionFailed(_) => EXIT_CORRUPT_ARTIFACT,
        PackError::Io(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_errors_distinct() {
        let malformed = anyhow::Error::new(RegistryError::Malformed {
            reason: "x".into(),
        });
        let duplicate = anyhow::Error::new(RegistryError::DuplicateKey { key: "k".into() });
        assert_eq!(exit_code(&malformed), EXIT_MALFORMED_REGISTRY);
        assert_eq!(exit_code(&duplicate), EXIT_DUPLICATE_KEY);
    }

    #[test]
    fn context_preserves_code() {
        use anyhow::Context;
        let err = Err::<(), _>(RegistryError::Malformed { reason: "x".into() })
            .context("loading registries")
            .unwrap_err();
        assert_eq!(exit_code(&err), EXIT_MALFORMED_REGISTRY);
    }

    #[test]
    fn unsupported_format_distinct_from_corruption() {
        let unsupported = anyhow::Error::new(PackError::UnsupportedVersion(9));
        let corrupt = anyhow::Error::new(PackError::ChecksumMismatch);
        assert_eq!(exit_code(&unsupported), EXIT_UNSUPPORTED_FORMAT);
        assert_eq!(exit_code(&corrupt), EXIT_CORRUPT_ARTIFACT);
    }

    #[test]
    fn unknown_errors_exit_one() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(exit_code(&err), 1);
    }
}
