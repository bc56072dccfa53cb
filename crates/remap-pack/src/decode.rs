//! Decoding of artifact bytes back into mapping documents.
//!
//! Decoding is strict: unknown format versions, checksum mismatches, and
//! any out-of-bounds index are rejected rather than papered over.

use chrono::DateTime;

use remap_types::{
    Category, CategoryTable, DocumentMeta, MappingDocument, ProtocolVersion, UNMAPPED_WIRE,
};

use crate::error::{PackError, PackResult};
use crate::format::{Reader, FORMAT_VERSION, MAGIC};
use crate::storage::Storage;

/// Decode an artifact into its mapping document.
///
/// Forms a lossless round trip with [`encode`](crate::encode::encode).
pub fn decode(bytes: &[u8]) -> PackResult<MappingDocument> {
    if bytes.len() < 12 {
        return Err(PackError::Corrupt {
            offset: 0,
            reason: "artifact too short".into(),
        });
    }
    if &bytes[0..4] != MAGIC {
        return Err(PackError::InvalidMagic {
            expected: String::from_utf8_lossy(MAGIC).into_owned(),
            actual: String::from_utf8_lossy(&bytes[0..4]).into_owned(),
        });
    }
    let version = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if version != FORMAT_VERSION {
        return Err(PackError::UnsupportedVersion(version));
    }

    let trailer_start = bytes.len() - 4;
    let stored_checksum = u32::from_be_bytes([
        bytes[trailer_start],
        bytes[trailer_start + 1],
        bytes[trailer_start + 2],
        bytes[trailer_start + 3],
    ]);
    if crc32fast::hash(&bytes[..trailer_start]) != stored_checksum {
        return Err(PackError::ChecksumMismatch);
    }

    let body = zstd::decode_all(&bytes[8..trailer_start])
        .map_err(|e| PackError::DecompressionFailed(e.to_string()))?;
    decode_body(&body)
}

fn decode_body(body: &[u8]) -> PackResult<MappingDocument> {
    let mut reader = Reader::new(body);

    let source_version = ProtocolVersion::new(reader.string()?);
    let target_version = ProtocolVersion::new(reader.string()?);
    let seconds = reader.i64_be()?;
    let nanos = reader.u32_be()?;
    let generated_at =
        DateTime::from_timestamp(seconds, nanos).ok_or_else(|| PackError::Corrupt {
            offset: 0,
            reason: format!("invalid timestamp: {seconds}s {nanos}ns"),
        })?;

    let mut document = MappingDocument::new(DocumentMeta {
        source_version,
        target_version,
        generated_at,
    });

    let table_count = reader.u32_be()?;
    for _ in 0..table_count {
        let category = Category::new(reader.string()?);
        let fallback = reader.i32_be()?;
        let mapped_size = reader.u32_be()?;
        let entries = decode_table(&mut reader, mapped_size)?;

        let mut table = CategoryTable::new(entries, mapped_size);
        if fallback != UNMAPPED_WIRE {
            let fallback = to_index(fallback, mapped_size).ok_or_else(|| PackError::Corrupt {
                offset: 0,
                reason: format!("{category}: fallback {fallback} out of bounds"),
            })?;
            table = table.with_fallback(fallback);
        }
        document.tables.insert(category, table);
    }

    let identifier_count = reader.u32_be()?;
    for _ in 0..identifier_count {
        let category = Category::new(reader.string()?);
        let key_count = reader.u32_be()?;
        let mut keys = Vec::with_capacity(key_count as usize);
        for _ in 0..key_count {
            keys.push(reader.string()?);
        }
        document.identifiers.insert(category, keys);
    }

    if reader.remaining() != 0 {
        return Err(PackError::Corrupt {
            offset: (body.len() - reader.remaining()) as u64,
            reason: format!("{} trailing bytes after document", reader.remaining()),
        });
    }
    Ok(document)
}

fn decode_table(reader: &mut Reader<'_>, mapped_size: u32) -> PackResult<Vec<Option<u32>>> {
    let storage = Storage::from_id(reader.u8()?)?;
    let size = reader.u32_be()? as usize;

    let wire: Vec<i32> = match storage {
        Storage::Identity => (0..size as i32).collect(),
        Storage::Direct => {
            let mut values = Vec::with_capacity(size);
            for _ in 0..size {
                values.push(reader.i32_be()?);
            }
            values
        }
        Storage::Changes => {
            let count = reader.varint()? as usize;
            let mut at = Vec::with_capacity(count);
            for _ in 0..count {
                at.push(reader.u32_be()? as usize);
            }
            let mut values: Vec<i32> = (0..size as i32).collect();
            for position in at {
                let slot = values.get_mut(position).ok_or(PackError::Corrupt {
                    offset: 0,
                    reason: format!("change position {position} out of bounds"),
                })?;
                *slot = reader.i32_be()?;
            }
            values
        }
        Storage::Shifts => {
            let count = reader.varint()? as usize;
            let mut at = Vec::with_capacity(count);
            for _ in 0..count {
                at.push(reader.u32_be()? as usize);
            }
            let mut to = Vec::with_capacity(count);
            for _ in 0..count {
                to.push(reader.i32_be()?);
            }

            // Replay the shift points: between them, ids advance by one.
            let mut values = Vec::with_capacity(size);
            let mut next_shift = 0usize;
            let mut current = UNMAPPED_WIRE;
            for i in 0..size {
                if next_shift < at.len() && at[next_shift] == i {
                    current = to[next_shift];
                    next_shift += 1;
                } else if i == 0 {
                    current = 0;
                } else {
                    current += 1;
                }
                values.push(current);
            }
            if next_shift != at.len() {
                return Err(PackError::Corrupt {
                    offset: 0,
                    reason: "shift positions out of range".into(),
                });
            }
            values
        }
    };

    wire.into_iter()
        .map(|value| {
            if value == UNMAPPED_WIRE {
                Ok(None)
            } else {
                match to_index(value, mapped_size) {
                    Some(index) => Ok(Some(index)),
                    None => Err(PackError::Corrupt {
                        offset: 0,
                        reason: format!("entry {value} out of bounds for {mapped_size} targets"),
                    }),
                }
            }
        })
        .collect()
}

fn to_index(value: i32, mapped_size: u32) -> Option<u32> {
    if value >= 0 && (value as u32) < mapped_size {
        Some(value as u32)
    } else {
        None
    }
}
