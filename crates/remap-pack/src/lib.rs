//! Compact binary artifact format for remap mapping documents.
//!
//! # Layout
//!
//! - **Header**: `RMAP` magic + big-endian format version, uncompressed so
//!   consumers can reject unknown layouts before touching the payload
//! - **Payload**: zstd-compressed document body; mapping tables are dense
//!   fixed-width integer arrays in one of four storage representations
//!   (identity, shifts, changes, direct), whichever is smallest
//! - **Trailer**: CRC32 over header + payload
//!
//! Encoding and decoding form a lossless round trip:
//! `decode(encode(d)) == d` for every valid document.

pub mod artifact;
pub mod decode;
pub mod encode;
pub mod error;
pub mod format;
pub mod storage;

pub use artifact::{read_artifact, write_artifact};
pub use decode::decode;
pub use encode::encode;
pub use error::{PackError, PackResult};
pub use format::FORMAT_VERSION;
pub use storage::Storage;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use remap_types::{
        Category, CategoryTable, DocumentMeta, MappingDocument, ProtocolVersion,
    };

    fn meta() -> DocumentMeta {
        DocumentMeta {
            source_version: ProtocolVersion::new("1.19.4"),
            target_version: ProtocolVersion::new("1.20.1"),
            generated_at: chrono::Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap(),
        }
    }

    fn doc_with(tables: Vec<(&str, CategoryTable)>) -> MappingDocument {
        let mut doc = MappingDocument::new(meta());
        for (name, table) in tables {
            doc.tables.insert(Category::new(name), table);
        }
        doc
    }

    #[test]
    fn roundtrip_identity_table() {
        let doc = doc_with(vec![(
            "blocks",
            CategoryTable::new((0..50).map(Some).collect(), 50),
        )]);
        assert_eq!(decode(&encode(&doc).unwrap()).unwrap(), doc);
    }

    #[test]
    fn roundtrip_shifted_table() {
        // Ten inserted at the front of the target registry: all ids shift.
        let entries: Vec<Option<u32>> = (0..100).map(|i| Some(i + 10)).collect();
        let doc = doc_with(vec![("items", CategoryTable::new(entries, 110))]);
        assert_eq!(decode(&encode(&doc).unwrap()).unwrap(), doc);
    }

    #[test]
    fn roundtrip_sparse_changes() {
        let mut entries: Vec<Option<u32>> = (0..200).map(Some).collect();
        entries[7] = Some(150);
        entries[80] = None;
        let doc = doc_with(vec![("sounds", CategoryTable::new(entries, 200))]);
        assert_eq!(decode(&encode(&doc).unwrap()).unwrap(), doc);
    }

    #[test]
    fn roundtrip_unmapped_and_fallback() {
        let doc = doc_with(vec![(
            "blocks",
            CategoryTable::new(vec![Some(1), None, Some(0), None], 2).with_fallback(1),
        )]);
        let back = decode(&encode(&doc).unwrap()).unwrap();
        assert_eq!(back, doc);
        assert_eq!(back.translate(&Category::new("blocks"), 1), Some(1));
    }

    #[test]
    fn roundtrip_multiple_categories_and_identifiers() {
        let mut doc = doc_with(vec![
            ("blocks", CategoryTable::new(vec![Some(0)], 1)),
            ("items", CategoryTable::new(vec![Some(1), Some(0)], 2)),
            ("entities", CategoryTable::new(vec![None], 1).with_fallback(0)),
        ]);
        doc.identifiers.insert(
            Category::new("entities"),
            vec!["pig".to_string(), "camel".to_string()],
        );
        assert_eq!(decode(&encode(&doc).unwrap()).unwrap(), doc);
    }

    #[test]
    fn roundtrip_empty_document() {
        let doc = MappingDocument::new(meta());
        assert_eq!(decode(&encode(&doc).unwrap()).unwrap(), doc);
    }

    #[test]
    fn bad_magic_rejected() {
        let doc = doc_with(vec![]);
        let mut bytes = encode(&doc).unwrap();
        bytes[0..4].copy_from_slice(b"NOPE");
        assert!(matches!(
            decode(&bytes).unwrap_err(),
            PackError::InvalidMagic { .. }
        ));
    }

    #[test]
    fn unknown_format_version_rejected() {
        let doc = doc_with(vec![]);
        let mut bytes = encode(&doc).unwrap();
        bytes[4..8].copy_from_slice(&99u32.to_be_bytes());
        assert!(matches!(
            decode(&bytes).unwrap_err(),
            PackError::UnsupportedVersion(99)
        ));
    }

    #[test]
    fn flipped_payload_byte_fails_checksum() {
        let doc = doc_with(vec![("blocks", CategoryTable::new(vec![Some(0)], 1))]);
        let mut bytes = encode(&doc).unwrap();
        let middle = bytes.len() / 2;
        bytes[middle] ^= 0xFF;
        assert!(matches!(
            decode(&bytes).unwrap_err(),
            PackError::ChecksumMismatch
        ));
    }

    #[test]
    fn truncated_artifact_rejected() {
        assert!(matches!(
            decode(&[0u8; 5]).unwrap_err(),
            PackError::Corrupt { .. }
        ));
    }

    #[test]
    fn encoding_is_deterministic() {
        let mut entries: Vec<Option<u32>> = (0..64).map(Some).collect();
        entries[3] = None;
        let doc = doc_with(vec![
            ("blocks", CategoryTable::new(entries, 64).with_fallback(0)),
            ("items", CategoryTable::new(vec![Some(2), Some(0), Some(1)], 3)),
        ]);
        assert_eq!(encode(&doc).unwrap(), encode(&doc).unwrap());
    }

    #[test]
    fn sparse_table_encodes_smaller_than_direct_would() {
        // 2 changes out of 10_000 entries: the artifact must not pay for a
        // dense array.
        let mut entries: Vec<Option<u32>> = (0..10_000).map(Some).collect();
        entries[17] = Some(9_999);
        entries[18] = Some(17);
        let big = doc_with(vec![("blockstates", CategoryTable::new(entries, 10_000))]);
        let identity = doc_with(vec![(
            "blockstates",
            CategoryTable::new((0..10_000).map(Some).collect(), 10_000),
        )]);
        let big_len = encode(&big).unwrap().len();
        let identity_len = encode(&identity).unwrap().len();
        // Both stay within a small sparse footprint.
        assert!(big_len < identity_len + 100);
    }

    fn table_strategy() -> impl Strategy<Value = CategoryTable> {
        (1u32..64).prop_flat_map(|mapped_size| {
            (
                prop::collection::vec(
                    prop_oneof![
                        3 => (0..mapped_size).prop_map(Some),
                        1 => Just(None),
                    ],
                    0..48,
                ),
                prop::option::of(0..mapped_size),
            )
                .prop_map(move |(entries, fallback)| {
                    let table = CategoryTable::new(entries, mapped_size);
                    match fallback {
                        Some(f) => table.with_fallback(f),
                        None => table,
                    }
                })
        })
    }

    proptest! {
        #[test]
        fn roundtrip_any_document(
            tables in prop::collection::btree_map("[a-z]{1,12}", table_strategy(), 0..5),
        ) {
            let mut doc = MappingDocument::new(meta());
            for (name, table) in tables {
                doc.tables.insert(Category::new(name), table);
            }
            let back = decode(&encode(&doc).unwrap()).unwrap();
            prop_assert_eq!(back, doc);
        }
    }
}
