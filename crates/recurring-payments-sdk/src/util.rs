//! Fixed-size string field helpers.
//!
//! The program stores memos, gateway names and urls as fixed byte arrays:
//! utf-8 content truncated to the field width and zero padded.

/// Encodes `value` into a fixed-width byte array, truncating on overflow.
pub fn encode_fixed_str<const N: usize>(value: &str) -> [u8; N] {
    let mut buf = [0u8; N];
    let bytes = value.as_bytes();
    let len = bytes.len().min(N);
    buf[..len].copy_from_slice(&bytes[..len]);
    buf
}

/// Encodes a policy memo into its 64-byte field.
pub fn encode_memo(memo: &str) -> [u8; crate::constants::MEMO_LEN] {
    encode_fixed_str(memo)
}

/// Decodes a fixed-width field, stripping trailing zero padding. Invalid
/// utf-8 is replaced rather than rejected; these fields are display-only.
pub fn decode_fixed_str(buf: &[u8]) -> String {
    let end = buf
        .iter()
        .rposition(|byte| *byte != 0)
        .map_or(0, |pos| pos + 1);
    String::from_utf8_lossy(&buf[..end]).into_owned()
}
