//! Fixed-width `0x`-prefixed hex used by selectors and addresses.

use std::fmt;

use crate::error::ParseError;

pub(crate) fn write_prefixed(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    f.write_str("0x")?;
    for b in bytes {
        write!(f, "{:02x}", b)?;
    }
    Ok(())
}

/// Decode `0x`-prefixed (or bare) hex into exactly `N` bytes.
pub(crate) fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], ParseError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    if digits.len() != N * 2 {
        return Err(ParseError::Length {
            expected: N,
            found: digits.len() / 2,
        });
    }

    let mut out = [0u8; N];
    let raw = digits.as_bytes();
    for (i, slot) in out.iter_mut().enumerate() {
        let hi = nibble(raw[2 * i], 2 * i)?;
        let lo = nibble(raw[2 * i + 1], 2 * i + 1)?;
        *slot = (hi << 4) | lo;
    }
    Ok(out)
}

fn nibble(c: u8, position: usize) -> Result<u8, ParseError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(ParseError::InvalidDigit {
            digit: c as char,
            position,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_mixed_case_with_and_without_prefix() {
        assert_eq!(decode_fixed::<2>("0xAbCd").unwrap(), [0xab, 0xcd]);
        assert_eq!(decode_fixed::<2>("abcd").unwrap(), [0xab, 0xcd]);
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            decode_fixed::<4>("0x0102"),
            Err(ParseError::Length {
                expected: 4,
                found: 2
            })
        );
    }

    #[test]
    fn reports_bad_digit_position() {
        assert_eq!(
            decode_fixed::<2>("0x01g2"),
            Err(ParseError::InvalidDigit {
                digit: 'g',
                position: 2
            })
        );
    }
}
