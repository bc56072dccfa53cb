//! Artifact publication: all-or-nothing writes to disk.

use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use remap_types::MappingDocument;

use crate::decode::decode;
use crate::encode::encode;
use crate::error::{PackError, PackResult};

/// Encode a document and publish it atomically at `path`.
///
/// The artifact is written to a temporary file in the destination directory
/// and renamed over the final path only on full success; partial output is
/// never visible.
pub fn write_artifact(document: &MappingDocument, path: &Path) -> PackResult<()> {
    let bytes = encode(document)?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let temp = NamedTempFile::new_in(dir)?;
    std::fs::write(temp.path(), &bytes)?;
    temp.persist(path).map_err(|e| PackError::Io(e.error))?;

    info!(
        path = %path.display(),
        bytes = bytes.len(),
        categories = document.tables.len(),
        "wrote mapping artifact"
    );
    Ok(())
}

/// Read and decode an artifact from disk.
pub fn read_artifact(path: &Path) -> PackResult<MappingDocument> {
    let bytes = std::fs::read(path)?;
    decode(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use remap_types::{Category, CategoryTable, DocumentMeta, ProtocolVersion};

    fn document() -> MappingDocument {
        let meta = DocumentMeta {
            source_version: ProtocolVersion::new("1.19"),
            target_version: ProtocolVersion::new("1.20"),
            generated_at: chrono::Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        };
        let mut doc = MappingDocument::new(meta);
        doc.tables.insert(
            Category::new("blocks"),
            CategoryTable::new(vec![Some(1), Some(0), None], 2).with_fallback(0),
        );
        doc
    }

    #[test]
    fn disk_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mappings-1.19to1.20.rmap");

        let doc = document();
        write_artifact(&doc, &path).unwrap();
        assert!(path.exists());

        let back = read_artifact(&path).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn overwrite_replaces_previous_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.rmap");

        write_artifact(&document(), &path).unwrap();
        let mut updated = document();
        updated.meta.target_version = ProtocolVersion::new("1.21");
        write_artifact(&updated, &path).unwrap();

        let back = read_artifact(&path).unwrap();
        assert_eq!(back.meta.target_version, ProtocolVersion::new("1.21"));
    }

    #[test]
    fn read_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_artifact(&dir.path().join("absent.rmap")).unwrap_err();
        assert!(matches!(err, PackError::Io(_)));
    }
}
