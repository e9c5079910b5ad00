//! Textual forms of the 32-byte types.

use crate::ParseError;

/// Decode exactly 32 bytes from 64 hex characters.
pub(crate) fn decode_32(s: &str) -> Result<[u8; 32], ParseError> {
    let s = s.trim();
    let wrong_length = || ParseError::InvalidLength {
        expected: 64,
        actual: s.len(),
    };
    let bytes = hex::decode(s).map_err(|e| match e {
        hex::FromHexError::InvalidHexCharacter { c, .. } => ParseError::InvalidHex(c),
        _ => wrong_length(),
    })?;
    bytes.try_into().map_err(|_| wrong_length())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_length_is_a_length_error() {
        assert_eq!(
            decode_32("abc"),
            Err(ParseError::InvalidLength {
                expected: 64,
                actual: 3
            })
        );
    }

    #[test]
    fn accepts_mixed_case_and_surrounding_whitespace() {
        let s = format!(" {}{} ", "AB".repeat(16), "cd".repeat(16));
        let bytes = decode_32(&s).unwrap();
        assert_eq!(bytes[0], 0xAB);
        assert_eq!(bytes[31], 0xCD);
    }
}
