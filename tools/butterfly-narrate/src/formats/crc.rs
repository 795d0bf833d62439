//! CRC-64-ISO checksums for tile files

use crc::{Crc, CRC_64_GO_ISO};

pub const CRC64: Crc<u64> = Crc::<u64>::new(&CRC_64_GO_ISO);

/// Size of the `body_crc64` + `file_crc64` footer
pub const FOOTER_SIZE: usize = 16;

pub fn checksum(data: &[u8]) -> u64 {
    CRC64.checksum(data)
}

/// Append the two-checksum footer: CRC of `bytes[body_start..]` then CRC of all of `bytes`.
pub fn append_footer(bytes: &mut Vec<u8>, body_start: usize) {
    let body_crc = checksum(&bytes[body_start..]);
    let file_crc = checksum(bytes);
    bytes.extend_from_slice(&body_crc.to_le_bytes());
    bytes.extend_from_slice(&file_crc.to_le_bytes());
}

/// Split a footer-terminated buffer into (content, stored_body_crc, stored_file_crc).
pub fn split_footer(bytes: &[u8]) -> Option<(&[u8], u64, u64)> {
    if bytes.len() < FOOTER_SIZE {
        return None;
    }
    let (content, footer) = bytes.split_at(bytes.len() - FOOTER_SIZE);
    let body_crc = u64::from_le_bytes(footer[0..8].try_into().ok()?);
    let file_crc = u64::from_le_bytes(footer[8..16].try_into().ok()?);
    Some((content, body_crc, file_crc))
}
