//! Hybrid-36 encoding of the fixed-width integer fields of PDB records.
//!
//! Values that fit the field are written as plain decimals. Larger values continue with
//! upper-case base-36 digits (`A0000` follows `99999` in a five-column field) and then with
//! lower-case ones, which keeps every column of the record in place.

const DIGITS_UPPER: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS_LOWER: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn pow(base: i64, exp: usize) -> i64 {
    (0..exp).fold(1, |acc, _| acc * base)
}

fn to_base36(mut value: i64, width: usize, digits: &[u8; 36]) -> String {
    let mut out = vec![b'0'; width];
    for slot in out.iter_mut().rev() {
        *slot = digits[(value % 36) as usize];
        value /= 36;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn from_base36(text: &str, upper: bool) -> Option<i64> {
    text.bytes().try_fold(0i64, |acc, byte| {
        let digit = match byte {
            b'0'..=b'9' => byte - b'0',
            b'A'..=b'Z' if upper => byte - b'A' + 10,
            b'a'..=b'z' if !upper => byte - b'a' + 10,
            _ => return None,
        };
        Some(acc * 36 + digit as i64)
    })
}

/// Encodes `value` right-aligned into exactly `width` columns.
///
/// Returns `None` when the value is outside the hybrid-36 range of the field.
pub fn encode(value: i64, width: usize) -> Option<String> {
    let decimal_limit = pow(10, width);
    if value > -pow(10, width - 1) && value < decimal_limit {
        return Some(format!("{:>width$}", value, width = width));
    }
    if value < 0 {
        return None;
    }

    let block = 26 * pow(36, width - 1);
    let offset = 10 * pow(36, width - 1);
    let shifted = value - decimal_limit;
    if shifted < block {
        Some(to_base36(shifted + offset, width, DIGITS_UPPER))
    } else if shifted < 2 * block {
        Some(to_base36(shifted - block + offset, width, DIGITS_LOWER))
    } else {
        None
    }
}

/// Decodes a hybrid-36 field; surrounding blanks are ignored.
pub fn decode(field: &str, width: usize) -> Option<i64> {
    let text = field.trim();
    let first = text.bytes().next()?;
    if first.is_ascii_digit() || first == b'-' {
        return text.parse().ok();
    }
    if text.len() != width {
        return None;
    }

    let block = 26 * pow(36, width - 1);
    let offset = 10 * pow(36, width - 1);
    let decimal_limit = pow(10, width);
    if first.is_ascii_uppercase() {
        from_base36(text, true).map(|v| v - offset + decimal_limit)
    } else if first.is_ascii_lowercase() {
        from_base36(text, false).map(|v| v - offset + decimal_limit + block)
    } else {
        None
    }
}
