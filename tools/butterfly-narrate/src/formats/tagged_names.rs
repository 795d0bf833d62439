//! Tagged-name records - typed secondary names stored per edge-info block
//!
//! Format (little-endian), repeated until the blob is exhausted:
//!
//!   type_code:  u8         // TaggedNameKind wire code
//!   len:        u16        // byte length of value
//!   value:      [len]u8    // UTF-8
//!
//! There is no entry count; the enclosing edge-info record stores the blob
//! length. Decoding never fails: unknown type codes and invalid UTF-8 skip one
//! entry, a truncated header or value ends the blob.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Entry header: type_code(1) + len(2)
const ENTRY_HEADER_SIZE: usize = 3;

/// Kind of a tagged name. Wire codes are stable across tile versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaggedNameKind {
    /// `name:pronunciation` (IPA or other phonetic alphabet)
    Pronunciation,
    /// `tunnel:name`
    Tunnel,
    /// `bridge:name`
    Bridge,
}

impl TaggedNameKind {
    pub const fn code(self) -> u8 {
        match self {
            TaggedNameKind::Pronunciation => 0x02,
            TaggedNameKind::Tunnel => b'1',
            TaggedNameKind::Bridge => b'2',
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0x02 => Some(TaggedNameKind::Pronunciation),
            b'1' => Some(TaggedNameKind::Tunnel),
            b'2' => Some(TaggedNameKind::Bridge),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            TaggedNameKind::Pronunciation => "pronunciation",
            TaggedNameKind::Tunnel => "tunnel",
            TaggedNameKind::Bridge => "bridge",
        }
    }
}

impl fmt::Display for TaggedNameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedName {
    #[serde(rename = "type")]
    pub kind: TaggedNameKind,
    pub value: String,
}

impl TaggedName {
    pub fn new(kind: TaggedNameKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("tagged name value is {len} bytes, limit is {max}")]
    ValueTooLong { len: usize, max: usize },
}

/// A recoverable problem found while decoding a blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeIssue {
    /// Entry skipped, type code not known to this reader
    UnknownTypeCode { offset: usize, code: u8 },
    /// Entry skipped, value is not UTF-8
    InvalidUtf8 { offset: usize },
    /// Decoding stopped, header or value runs past the end of the blob
    Truncated { offset: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeOutcome {
    pub names: Vec<TaggedName>,
    pub issues: Vec<DecodeIssue>,
}

/// Encode tagged names in order
pub fn encode(names: &[TaggedName]) -> Result<Vec<u8>, EncodeError> {
    let mut blob = Vec::with_capacity(encoded_len(names));
    for name in names {
        let bytes = name.value.as_bytes();
        let len = u16::try_from(bytes.len()).map_err(|_| EncodeError::ValueTooLong {
            len: bytes.len(),
            max: u16::MAX as usize,
        })?;
        blob.push(name.kind.code());
        blob.extend_from_slice(&len.to_le_bytes());
        blob.extend_from_slice(bytes);
    }
    Ok(blob)
}

fn encoded_len(names: &[TaggedName]) -> usize {
    names
        .iter()
        .map(|n| ENTRY_HEADER_SIZE + n.value.len())
        .sum()
}

/// Decode a blob, collecting every recoverable issue
pub fn decode(blob: &[u8]) -> DecodeOutcome {
    let mut outcome = DecodeOutcome::default();
    let mut pos = 0usize;

    while pos < blob.len() {
        if pos + ENTRY_HEADER_SIZE > blob.len() {
            outcome.issues.push(DecodeIssue::Truncated { offset: pos });
            break;
        }
        let code = blob[pos];
        let len = u16::from_le_bytes([blob[pos + 1], blob[pos + 2]]) as usize;
        let value_start = pos + ENTRY_HEADER_SIZE;
        let value_end = value_start + len;
        if value_end > blob.len() {
            outcome.issues.push(DecodeIssue::Truncated { offset: pos });
            break;
        }

        match TaggedNameKind::from_code(code) {
            None => {
                tracing::trace!(offset = pos, code, "skipping tagged name with unknown type code");
                outcome
                    .issues
                    .push(DecodeIssue::UnknownTypeCode { offset: pos, code });
            }
            Some(kind) => match std::str::from_utf8(&blob[value_start..value_end]) {
                Ok(value) => outcome.names.push(TaggedName::new(kind, value)),
                Err(_) => outcome.issues.push(DecodeIssue::InvalidUtf8 { offset: pos }),
            },
        }

        pos = value_end;
    }

    outcome
}

/// Decode a blob, logging anything that had to be dropped
pub fn decode_names(blob: &[u8]) -> Vec<TaggedName> {
    let outcome = decode(blob);
    for issue in &outcome.issues {
        match issue {
            DecodeIssue::UnknownTypeCode { .. } => {}
            DecodeIssue::InvalidUtf8 { offset } => {
                tracing::warn!(offset, "dropping tagged name with invalid UTF-8");
            }
            DecodeIssue::Truncated { offset } => {
                tracing::warn!(offset, blob_len = blob.len(), "tagged name blob truncated");
            }
        }
    }
    outcome.names
}
