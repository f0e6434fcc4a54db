use std::collections::BTreeMap;

use proptest::collection::{btree_map, vec};
use proptest::prelude::*;
use proptest::sample::Index;

use super::*;

fn arb_bvalue() -> impl Strategy<Value = BValue> {
	let leaf = prop_oneof![
		any::<i64>().prop_map(BValue::Integer),
		vec(any::<u8>(), 0..24).prop_map(BValue::ByteString),
	];
	leaf.prop_recursive(4, 64, 6, |inner| {
		prop_oneof![
			vec(inner.clone(), 0..6).prop_map(BValue::List),
			btree_map(vec(any::<u8>(), 0..8), inner, 0..6).prop_map(BValue::Dict),
		]
	})
}

/// Canonical `<key><value>` encodings of a dictionary's entries, in key order.
fn encoded_entries(dict: &BTreeMap<Vec<u8>, BValue>) -> Vec<Vec<u8>> {
	dict.iter()
		.map(|(key, val)| {
			let mut entry = encode(&BValue::ByteString(key.clone()));
			entry.extend(encode(val));
			entry
		})
		.collect()
}

/// `l<prefix><tail>e`: a list whose second element is `tail`.
fn after_value(prefix: &BValue, tail: &[u8]) -> (Vec<u8>, usize) {
	let mut input = vec![b'l'];
	input.extend(encode(prefix));
	let tail_offset = input.len();
	input.extend_from_slice(tail);
	input.push(b'e');
	(input, tail_offset)
}

proptest! {
	#[test]
	fn roundtrip_from_value(value in arb_bvalue()) {
		prop_assert_eq!(decode(&encode(&value)).unwrap(), value);
	}

	#[test]
	fn encoding_is_deterministic(value in arb_bvalue()) {
		let copy = value.clone();
		prop_assert_eq!(encode(&value), encode(&copy));
		prop_assert_eq!(encoded_len(&value), encode(&value).len());
	}

	#[test]
	fn insertion_order_does_not_change_encoding(
		entries in btree_map(vec(any::<u8>(), 0..6), any::<i64>(), 0..12)
			.prop_map(|m| m.into_iter().collect::<Vec<_>>())
			.prop_shuffle()
	) {
		let mut dict = BTreeMap::new();
		for (key, val) in &entries {
			dict.insert(key.clone(), BValue::Integer(*val));
		}

		let mut sorted = entries.clone();
		sorted.sort_by(|a, b| a.0.cmp(&b.0));
		let mut expected = vec![b'd'];
		for (key, val) in &sorted {
			expected.extend(format!("{}:", key.len()).into_bytes());
			expected.extend_from_slice(key);
			expected.extend(format!("i{}e", val).into_bytes());
		}
		expected.push(b'e');

		prop_assert_eq!(encode(&BValue::Dict(dict)), expected);
	}

	#[test]
	fn truncated_encoding_is_rejected(value in arb_bvalue(), cut in any::<Index>()) {
		let encoded = encode(&value);
		let len = cut.index(encoded.len());
		let err = decode(&encoded[..len]).unwrap_err();
		prop_assert!(
			matches!(
				err,
				BencodeError::EmptyInput { .. }
					| BencodeError::IntegerSyntax { .. }
					| BencodeError::StringLengthSyntax { .. }
					| BencodeError::StringTruncated { .. }
					| BencodeError::ListUnterminated { .. }
					| BencodeError::DictUnterminated { .. }
			),
			"{:?}",
			err
		);
		prop_assert!(err.offset().map_or(false, |offset| offset <= len));
	}

	#[test]
	fn appended_byte_is_trailing(value in arb_bvalue(), extra in any::<u8>()) {
		let mut input = encode(&value);
		let offset = input.len();
		input.push(extra);
		prop_assert!(matches!(
			decode(&input),
			Err(BencodeError::TrailingBytes { offset: o, .. }) if o == offset
		), "expected TrailingBytes at offset {}", offset);
	}

	#[test]
	fn leading_zero_integer_is_rejected(
		value in arb_bvalue(),
		rest in any::<u32>(),
		negative in any::<bool>(),
	) {
		let sign = if negative { "-" } else { "" };
		for literal in [format!("i{}0{}e", sign, rest), "i-0e".to_string()] {
			let (input, offset) = after_value(&value, literal.as_bytes());
			prop_assert_eq!(
				decode(&input).unwrap_err(),
				BencodeError::IntegerSyntax {
					offset,
					excerpt: literal.clone(),
				}
			);
		}
	}

	#[test]
	fn leading_zero_length_is_rejected(value in arb_bvalue(), payload in vec(any::<u8>(), 0..20)) {
		let mut tail = format!("0{}:", payload.len()).into_bytes();
		tail.extend_from_slice(&payload);
		let (input, offset) = after_value(&value, &tail);
		prop_assert!(matches!(
			decode(&input),
			Err(BencodeError::StringLengthSyntax { offset: o, .. }) if o == offset
		), "expected StringLengthSyntax at offset {}", offset);
	}

	#[test]
	fn swapped_dict_entries_are_unsorted(
		dict in btree_map(vec(any::<u8>(), 0..8), arb_bvalue(), 2..6),
		a in any::<Index>(),
		b in any::<Index>(),
	) {
		let mut entries = encoded_entries(&dict);
		let n = entries.len();
		let first = a.index(n);
		let second = b.index(n - 1);
		let second = if second >= first { second + 1 } else { second };
		let (lo, hi) = (first.min(second), first.max(second));
		entries.swap(lo, hi);

		let mut input = vec![b'd'];
		for entry in &entries {
			input.extend_from_slice(entry);
		}
		input.push(b'e');

		// Order first breaks at the entry following the swapped-forward one.
		let offset = 1 + entries[..=lo].iter().map(Vec::len).sum::<usize>();
		prop_assert!(matches!(
			decode(&input),
			Err(BencodeError::DictUnsortedKeys { offset: o, .. }) if o == offset
		), "expected DictUnsortedKeys at offset {}", offset);

		let relaxed = decode_with(&input, &DecodeOptions::relaxed()).unwrap();
		prop_assert_eq!(encode(&relaxed), encode(&BValue::Dict(dict.clone())));
		prop_assert_eq!(relaxed, BValue::Dict(dict));
	}

	#[test]
	fn mutated_encoding_is_rejected_or_canonical(
		value in arb_bvalue(),
		at in any::<Index>(),
		byte in any::<u8>(),
	) {
		let mut input = encode(&value);
		let i = at.index(input.len());
		input[i] = byte;
		if let Ok(decoded) = decode(&input) {
			prop_assert_eq!(encode(&decoded), input);
		}
	}

	#[test]
	fn arbitrary_bytes_never_panic(input in vec(any::<u8>(), 0..64)) {
		if let Ok(value) = decode(&input) {
			// Anything accepted is already canonical.
			prop_assert_eq!(encode(&value), input);
		}
	}

	#[test]
	fn integers_roundtrip_at_any_width(n in any::<i64>()) {
		let encoded = format!("i{}e", n);
		prop_assert_eq!(decode_integer(encoded.as_bytes()).unwrap(), n);
	}
}
