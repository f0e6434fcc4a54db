// lib.rs - Library interface for the bencode codec and its CLI

pub mod bencode;
pub mod config;
pub mod engine;
pub mod file_io;
pub mod infohash;

// Re-export commonly used types for easier testing
pub use bencode::{
    decode, decode_bencode, decode_bytes, decode_dict, decode_integer, decode_list, decode_with,
    encode, BValue, BencodeError, DecodeOptions, KeyOrder, Shape,
};
pub use config::Config;
pub use infohash::info_hash;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_simple_bencode() {
        assert_eq!(decode(b"i42e").unwrap(), BValue::Integer(42));
        assert_eq!(decode(b"4:test").unwrap(), BValue::string("test"));
        assert_eq!(
            decode(b"li1ei2ee").unwrap(),
            BValue::List(vec![BValue::Integer(1), BValue::Integer(2)])
        );
        assert_eq!(decode(b"d3:fooi42ee").unwrap().get(b"foo"), Some(&BValue::Integer(42)));
    }

    #[test]
    fn test_decode_invalid_bencode() {
        // Incomplete dictionary
        assert!(matches!(decode(b"d"), Err(BencodeError::DictUnterminated { offset: 0 })));
        // Incomplete string
        assert!(matches!(decode(b"4:ab"), Err(BencodeError::StringTruncated { .. })));
        // Invalid format
        assert!(matches!(
            decode(b"invalid"),
            Err(BencodeError::IntegerSyntax { .. })
        ));
        assert!(matches!(decode(b""), Err(BencodeError::EmptyInput { offset: 0 })));
    }

    #[test]
    fn test_encode_decode_inverse() {
        let input: &[u8] = b"d4:listl4:spami42ee3:numi-7ee";
        let value = decode(input).unwrap();
        assert_eq!(encode(&value), input);
        assert_eq!(decode(&encode(&value)).unwrap(), value);
    }
}
