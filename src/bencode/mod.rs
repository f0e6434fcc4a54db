pub mod bvalue;
pub mod decode;
pub mod encode;
pub mod error;
pub mod json;

pub use bvalue::{BValue, Shape};   // re-export
pub use decode::{decode_bencode, decode_bencode_with, DecodeOptions, KeyOrder, DEFAULT_MAX_DEPTH};   // re-export
pub use encode::{encode_bvalue, encoded_len};   // re-export
pub use error::BencodeError;   // re-export
pub use json::{bvalue_to_json, JSON_MAX_DEPTH};   // re-export

use std::collections::BTreeMap;

use error::excerpt;

/// Decodes `input`, which must hold exactly one value.
pub fn decode(input: &[u8]) -> Result<BValue, BencodeError> {
	decode_with(input, &DecodeOptions::default())
}

pub fn decode_with(input: &[u8], options: &DecodeOptions) -> Result<BValue, BencodeError> {
	let (consumed, value) = decode_bencode_with(input, options)?;
	if consumed != input.len() {
		return Err(BencodeError::TrailingBytes {
			offset: consumed,
			excerpt: excerpt(&input[consumed..]),
		});
	}
	Ok(value)
}

pub fn encode(value: &BValue) -> Vec<u8> {
	encode_bvalue(value)
}

/// Like [`decode`], but fails unless the top-level value is a list.
pub fn decode_list(input: &[u8]) -> Result<Vec<BValue>, BencodeError> {
	let value = decode(input)?;
	let found = value.shape();
	value.into_list().ok_or(BencodeError::WrongTopLevelShape {
		expected: Shape::List,
		found,
	})
}

/// Like [`decode`], but fails unless the top-level value is a dictionary.
pub fn decode_dict(input: &[u8]) -> Result<BTreeMap<Vec<u8>, BValue>, BencodeError> {
	let value = decode(input)?;
	let found = value.shape();
	value.into_dict().ok_or(BencodeError::WrongTopLevelShape {
		expected: Shape::Dict,
		found,
	})
}

pub fn decode_integer(input: &[u8]) -> Result<i64, BencodeError> {
	let value = decode(input)?;
	value.as_integer().ok_or(BencodeError::WrongTopLevelShape {
		expected: Shape::Integer,
		found: value.shape(),
	})
}

pub fn decode_bytes(input: &[u8]) -> Result<Vec<u8>, BencodeError> {
	let value = decode(input)?;
	let found = value.shape();
	value.into_bytes().ok_or(BencodeError::WrongTopLevelShape {
		expected: Shape::ByteString,
		found,
	})
}

#[cfg(test)]
mod proptests;
