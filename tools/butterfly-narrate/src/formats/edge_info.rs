//! Edge-info records - street names and tagged names shared by both directions of a way segment
//!
//! Format (little-endian), addressed by byte offset into the tile's edge-info area:
//!
//!   way_id:      i64
//!   name_count:  u8
//!   names:       name_count x (len: u16, [len]u8 UTF-8)
//!   tagged_len:  u16
//!   tagged:      [tagged_len]u8   // see tagged_names.rs
//!
//! Readers degrade instead of failing: a name that is not UTF-8 is dropped on its
//! own, and a record whose layout cannot be followed yields no names and an
//! empty tagged blob.

use thiserror::Error;

use super::tagged_names::{self, EncodeError, TaggedName};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EdgeInfoError {
    #[error("way {way_id} has {count} names, limit is {max}")]
    TooManyNames { way_id: i64, count: usize, max: usize },
    #[error("way {way_id}: name is {len} bytes, limit is {max}")]
    NameTooLong { way_id: i64, len: usize, max: usize },
    #[error("way {way_id}: tagged names take {len} bytes, limit is {max}")]
    TaggedBlobTooLong { way_id: i64, len: usize, max: usize },
    #[error(transparent)]
    Tagged(#[from] EncodeError),
}

/// Decoded view of one edge-info record. The tagged blob stays encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeInfoRecord<'a> {
    pub way_id: i64,
    pub names: Vec<String>,
    pub tagged_blob: &'a [u8],
}

pub fn encode_record(
    way_id: i64,
    names: &[String],
    tagged: &[TaggedName],
) -> Result<Vec<u8>, EdgeInfoError> {
    let name_count = u8::try_from(names.len()).map_err(|_| EdgeInfoError::TooManyNames {
        way_id,
        count: names.len(),
        max: u8::MAX as usize,
    })?;
    let blob = tagged_names::encode(tagged)?;
    let tagged_len = u16::try_from(blob.len()).map_err(|_| EdgeInfoError::TaggedBlobTooLong {
        way_id,
        len: blob.len(),
        max: u16::MAX as usize,
    })?;

    let mut record = Vec::new();
    record.extend_from_slice(&way_id.to_le_bytes());
    record.push(name_count);
    for name in names {
        let len = u16::try_from(name.len()).map_err(|_| EdgeInfoError::NameTooLong {
            way_id,
            len: name.len(),
            max: u16::MAX as usize,
        })?;
        record.extend_from_slice(&len.to_le_bytes());
        record.extend_from_slice(name.as_bytes());
    }
    record.extend_from_slice(&tagged_len.to_le_bytes());
    record.extend_from_slice(&blob);
    Ok(record)
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        let slice = self.bytes.get(self.pos..end)?;
        self.pos = end;
        Some(slice)
    }

    fn u8(&mut self) -> Option<u8> {
        self.take(1).map(|b| b[0])
    }

    fn u16(&mut self) -> Option<u16> {
        self.take(2).map(|b| u16::from_le_bytes([b[0], b[1]]))
    }

    fn i64(&mut self) -> Option<i64> {
        self.take(8)?.try_into().ok().map(i64::from_le_bytes)
    }
}

/// Decode the record at `offset` within an edge-info area
pub fn decode_record(area: &[u8], offset: usize) -> EdgeInfoRecord<'_> {
    let mut reader = Reader {
        bytes: area,
        pos: offset,
    };

    let Some(way_id) = reader.i64() else {
        tracing::warn!(offset, area_len = area.len(), "edge-info offset out of range");
        return EdgeInfoRecord::default();
    };

    let Some(names) = read_names(&mut reader, way_id) else {
        tracing::warn!(way_id, offset, "street names run past edge-info area");
        return EdgeInfoRecord {
            way_id,
            ..EdgeInfoRecord::default()
        };
    };

    let tagged_blob = match reader.u16().and_then(|len| reader.take(len as usize)) {
        Some(blob) => blob,
        None => {
            tracing::warn!(way_id, offset, "tagged-name blob runs past edge-info area");
            &[]
        }
    };

    EdgeInfoRecord {
        way_id,
        names,
        tagged_blob,
    }
}

/// Returns `None` only when the length prefixes run out of bytes, so on success
/// the reader always sits on `tagged_len`.
fn read_names(reader: &mut Reader<'_>, way_id: i64) -> Option<Vec<String>> {
    let count = reader.u8()?;
    let mut names = Vec::with_capacity(count as usize);
    for index in 0..count {
        let len = reader.u16()?;
        let bytes = reader.take(len as usize)?;
        match std::str::from_utf8(bytes) {
            Ok(name) => names.push(name.to_string()),
            Err(_) => tracing::warn!(way_id, index, "skipping street name that is not UTF-8"),
        }
    }
    Some(names)
}
