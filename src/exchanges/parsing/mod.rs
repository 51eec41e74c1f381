//! Zero-copy JSON field extraction for exchange messages
//!
//! Hot path parsing without heap allocations.

pub mod binance;

pub use binance::{BinanceMessageType, BinanceParser};

/// Fast byte-level JSON field finder
/// Returns slice of field value (without quotes for strings)
#[inline]
pub fn find_field<'a>(data: &'a [u8], field: &[u8]) -> Option<&'a [u8]> {
    let field_len = field.len();
    let data_len = data.len();

    if field_len == 0 || data_len < field_len + 3 {
        return None;
    }

    let mut i = 0;
    while i <= data_len - field_len - 2 {
        if data[i] == b'"' {
            let end = i + 1 + field_len;
            if end < data_len && &data[i + 1..end] == field && data[end] == b'"' {
                let mut j = end + 1;
                // A quoted string followed by ',' or '}' is a value, not a key
                while j < data_len && data[j].is_ascii_whitespace() {
                    j += 1;
                }
                if j >= data_len || data[j] != b':' {
                    i = end + 1;
                    continue;
                }
                j += 1;
                while j < data_len && data[j].is_ascii_whitespace() {
                    j += 1;
                }

                if j >= data_len {
                    return None;
                }

                if data[j] == b'"' {
                    let start = j + 1;
                    let mut k = start;
                    while k < data_len && data[k] != b'"' {
                        k += 1;
                    }
                    if k >= data_len {
                        return None;
                    }
                    return Some(&data[start..k]);
                } else {
                    // Number or boolean/null - stop at delimiter or whitespace
                    let start = j;
                    let mut k = start;
                    while k < data_len
                        && !matches!(data[k], b',' | b'}' | b']' | b' ' | b'\t' | b'\n' | b'\r')
                    {
                        k += 1;
                    }
                    return Some(&data[start..k]);
                }
            }
        }
        i += 1;
    }

    None
}

/// Parse u64 from bytes
#[inline]
pub fn parse_u64(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() {
        return None;
    }

    let mut result: u64 = 0;
    for &b in bytes {
        if !b.is_ascii_digit() {
            return None;
        }
        result = result.checked_mul(10)?;
        result = result.checked_add((b - b'0') as u64)?;
    }

    Some(result)
}

/// Borrow a field value as UTF-8 text
#[inline]
pub fn field_str<'a>(data: &'a [u8], field: &[u8]) -> Option<&'a str> {
    find_field(data, field).and_then(|bytes| std::str::from_utf8(bytes).ok())
}
