//! Encoding of mapping documents into artifact bytes.

use tracing::debug;

use remap_types::{CategoryTable, MappingDocument, UNMAPPED_WIRE};

use crate::error::{PackError, PackResult};
use crate::format::{encode_string, encode_varint, COMPRESSION_LEVEL, FORMAT_VERSION, MAGIC};
use crate::storage::Storage;

/// Encode a document into the artifact byte layout.
pub fn encode(document: &MappingDocument) -> PackResult<Vec<u8>> {
    let body = encode_body(document);
    let payload = zstd::encode_all(body.as_slice(), COMPRESSION_LEVEL)
        .map_err(|e| PackError::CompressionFailed(e.to_string()))?;

    let mut out = Vec::with_capacity(payload.len() + 12);
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_be_bytes());
    out.extend_from_slice(&payload);

    // Trailer: CRC32 of everything so far.
    let checksum = crc32fast::hash(&out);
    out.extend_from_slice(&checksum.to_be_bytes());
    Ok(out)
}

fn encode_body(document: &MappingDocument) -> Vec<u8> {
    let mut body = Vec::new();

    encode_string(&mut body, document.meta.source_version.as_str());
    encode_string(&mut body, document.meta.target_version.as_str());
    body.extend_from_slice(&document.meta.generated_at.timestamp().to_be_bytes());
    body.extend_from_slice(
        &document
            .meta
            .generated_at
            .timestamp_subsec_nanos()
            .to_be_bytes(),
    );

    body.extend_from_slice(&(document.tables.len() as u32).to_be_bytes());
    for (category, table) in &document.tables {
        encode_string(&mut body, category.as_str());
        let fallback = match table.fallback() {
            Some(index) => index as i32,
            None => UNMAPPED_WIRE,
        };
        body.extend_from_slice(&fallback.to_be_bytes());
        body.extend_from_slice(&table.mapped_size().to_be_bytes());
        encode_table(&mut body, category.as_str(), table);
    }

    body.extend_from_slice(&(document.identifiers.len() as u32).to_be_bytes());
    for (category, keys) in &document.identifiers {
        encode_string(&mut body, category.as_str());
        body.extend_from_slice(&(keys.len() as u32).to_be_bytes());
        for key in keys {
            encode_string(&mut body, key);
        }
    }

    body
}

fn encode_table(body: &mut Vec<u8>, category: &str, table: &CategoryTable) {
    let stats = table.stats();
    let storage = Storage::select(&stats);
    debug!(category, ?storage, size = stats.size, "storing table");

    body.push(storage.id());
    body.extend_from_slice(&stats.size.to_be_bytes());
    match storage {
        Storage::Identity => {}
        Storage::Direct => {
            for i in 0..table.len() {
                body.extend_from_slice(&table.wire_entry(i).to_be_bytes());
            }
        }
        Storage::Changes => {
            // Two parallel arrays of only the changed ids instead of an
            // entry for every identifier.
            let mut at = Vec::new();
            let mut val = Vec::new();
            for i in 0..table.len() {
                let wire = table.wire_entry(i);
                if wire != i as i32 {
                    at.push(i as u32);
                    val.push(wire);
                }
            }
            encode_varint(body, at.len() as u64);
            for position in &at {
                body.extend_from_slice(&position.to_be_bytes());
            }
            for value in &val {
                body.extend_from_slice(&value.to_be_bytes());
            }
        }
        Storage::Shifts => {
            // One entry at each position where the mapped id is not the
            // previous mapped id + 1.
            let mut at = Vec::new();
            let mut to = Vec::new();
            let mut previous = UNMAPPED_WIRE;
            for i in 0..table.len() {
                let wire = table.wire_entry(i);
                let shifted = if i == 0 { wire != 0 } else { wire != previous + 1 };
                if shifted {
                    at.push(i as u32);
                    to.push(wire);
                }
                previous = wire;
            }
            encode_varint(body, at.len() as u64);
            for position in &at {
                body.extend_from_slice(&position.to_be_bytes());
            }
            for value in &to {
                body.extend_from_slice(&value.to_be_bytes());
            }
        }
    }
}
