//! Byte-wise ASCII case shifting.

/// Distance between an ASCII lowercase letter and its uppercase form.
pub const UPPER_CASE_OFFSET: u8 = b'a' - b'A';

/// Subtract [`UPPER_CASE_OFFSET`] from every byte in place.
///
/// Only lowercase ASCII input maps to a meaningful result. Any other byte
/// is shifted all the same (wrapping below zero), which is the documented
/// out-of-contract behaviour rather than something corrected here.
pub fn shift_to_upper(bytes: &mut [u8]) {
    for b in bytes {
        *b = b.wrapping_sub(UPPER_CASE_OFFSET);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_ascii_becomes_uppercase() {
        let mut text = *b"hello";
        shift_to_upper(&mut text);
        assert_eq!(&text, b"HELLO");
    }

    #[test]
    fn non_lowercase_is_shifted_anyway() {
        let mut text = *b"A 1";
        shift_to_upper(&mut text);
        assert_eq!(text, [b'!', 0, 17]);
    }

    #[test]
    fn shift_wraps_below_zero() {
        let mut text = [0x10u8];
        shift_to_upper(&mut text);
        assert_eq!(text, [0xF0]);
    }

    #[test]
    fn applying_twice_compounds() {
        let mut text = *b"z";
        shift_to_upper(&mut text);
        shift_to_upper(&mut text);
        assert_eq!(text, [b'z' - 64]);
    }
}
