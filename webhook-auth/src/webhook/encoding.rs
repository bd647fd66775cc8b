/// Encodes bytes as lowercase hexadecimal, two characters per byte, no separators.
pub fn to_hex_string(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_lowercase_two_chars_per_byte() {
        assert_eq!(to_hex_string(&[0x00, 0x0f, 0xab, 0xff]), "000fabff");
    }

    #[test]
    fn encodes_empty_input_as_empty_string() {
        assert_eq!(to_hex_string(&[]), "");
    }
}
