use std::cmp::Ordering;
use std::collections::BTreeMap;

use log::trace;

use super::bvalue::{BValue, Shape};
use super::error::{excerpt, BencodeError};

/// Nesting limit applied by [`DecodeOptions::default`].
pub const DEFAULT_MAX_DEPTH: usize = 4096;

/// How dictionary key order in the input is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyOrder {
	/// Keys must be strictly ascending by raw bytes.
	#[default]
	Strict,
	/// Keys may come in any order; the decoded map is canonical regardless.
	Relaxed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
	pub key_order: KeyOrder,
	/// Deepest list/dict nesting accepted before failing.
	pub max_depth: usize,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			key_order: KeyOrder::Strict,
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}
}

impl DecodeOptions {
	pub fn relaxed() -> Self {
		Self {
			key_order: KeyOrder::Relaxed,
			..Self::default()
		}
	}
}

/// Decodes one value from the front of `input`.
///
/// Returns the number of bytes consumed alongside the value. Bytes after the
/// value are left alone; use [`super::decode`] to reject them.
pub fn decode_bencode(input: &[u8]) -> Result<(usize, BValue), BencodeError> {
	decode_bencode_with(input, &DecodeOptions::default())
}

pub fn decode_bencode_with(
	input: &[u8],
	options: &DecodeOptions,
) -> Result<(usize, BValue), BencodeError> {
	let mut decoder = Decoder {
		input,
		pos: 0,
		options: *options,
	};
	let value = decoder.decode_value()?;
	Ok((decoder.pos, value))
}

/// A list or dictionary still being filled.
enum Frame {
	List {
		start: usize,
		items: Vec<BValue>,
	},
	Dict {
		start: usize,
		entries: BTreeMap<Vec<u8>, BValue>,
		pending_key: Option<Vec<u8>>,
	},
}

struct Decoder<'a> {
	input: &'a [u8],
	pos: usize,
	options: DecodeOptions,
}

impl<'a> Decoder<'a> {
	fn peek(&self) -> Option<u8> {
		self.input.get(self.pos).copied()
	}

	/// Parses a single value. Containers live on `stack` rather than on the
	/// call stack, so nesting depth is bounded only by `max_depth`.
	fn decode_value(&mut self) -> Result<BValue, BencodeError> {
		let mut stack: Vec<Frame> = Vec::new();

		loop {
			// First see whether the innermost container closes or wants a key.
			let closed = match stack.last_mut() {
				Some(Frame::List { start, items }) => match self.peek() {
					Some(b'e') => {
						self.pos += 1;
						trace!("closed list opened at {} ({} items)", start, items.len());
						Some(BValue::List(std::mem::take(items)))
					}
					Some(_) => None,
					None => return Err(BencodeError::ListUnterminated { offset: *start }),
				},
				Some(Frame::Dict {
					start,
					entries,
					pending_key,
				}) if pending_key.is_none() => match self.peek() {
					Some(b'e') => {
						self.pos += 1;
						trace!("closed dict opened at {} ({} entries)", start, entries.len());
						Some(BValue::Dict(std::mem::take(entries)))
					}
					Some(b'0'..=b'9') => {
						let key_offset = self.pos;
						let key = self.parse_bytes()?;
						self.check_key_order(entries, &key, key_offset)?;
						*pending_key = Some(key);
						continue;
					}
					Some(byte @ (b'i' | b'l' | b'd')) => {
						return Err(BencodeError::DictNonStringKey {
							offset: self.pos,
							found: container_shape(byte),
						})
					}
					Some(byte) => {
						return Err(BencodeError::UnexpectedByte {
							offset: self.pos,
							byte,
						})
					}
					None => return Err(BencodeError::DictUnterminated { offset: *start }),
				},
				_ => None,
			};

			let value = match closed {
				Some(value) => {
					stack.pop();
					value
				}
				None => match self.peek() {
					Some(b'i') => self.parse_integer()?,
					Some(b'0'..=b'9') => BValue::ByteString(self.parse_bytes()?),
					Some(b'l') => {
						self.check_depth(stack.len())?;
						stack.push(Frame::List {
							start: self.pos,
							items: Vec::new(),
						});
						self.pos += 1;
						continue;
					}
					Some(b'd') => {
						self.check_depth(stack.len())?;
						stack.push(Frame::Dict {
							start: self.pos,
							entries: BTreeMap::new(),
							pending_key: None,
						});
						self.pos += 1;
						continue;
					}
					Some(byte) => {
						return Err(BencodeError::UnexpectedByte {
							offset: self.pos,
							byte,
						})
					}
					None => {
						return Err(match stack.last() {
							None => BencodeError::EmptyInput { offset: self.pos },
							Some(Frame::List { start, .. }) => {
								BencodeError::ListUnterminated { offset: *start }
							}
							Some(Frame::Dict { start, .. }) => {
								BencodeError::DictUnterminated { offset: *start }
							}
						})
					}
				},
			};

			// Hand the finished value to its parent, or return it at top level.
			match stack.last_mut() {
				None => return Ok(value),
				Some(Frame::List { items, .. }) => items.push(value),
				Some(Frame::Dict {
					entries,
					pending_key,
					..
				}) => {
					if let Some(key) = pending_key.take() {
						entries.insert(key, value);
					}
				}
			}
		}
	}

	fn check_depth(&self, depth: usize) -> Result<(), BencodeError> {
		if depth >= self.options.max_depth {
			return Err(BencodeError::DepthLimitExceeded {
				offset: self.pos,
				limit: self.options.max_depth,
			});
		}
		Ok(())
	}

	fn check_key_order(
		&self,
		entries: &BTreeMap<Vec<u8>, BValue>,
		key: &[u8],
		offset: usize,
	) -> Result<(), BencodeError> {
		let duplicate = || BencodeError::DictDuplicateKey {
			offset,
			key: excerpt(key),
		};

		match self.options.key_order {
			KeyOrder::Strict => {
				// Keys so far were ascending, so the map's last key is the previous one.
				if let Some((last, _)) = entries.last_key_value() {
					match key.cmp(last.as_slice()) {
						Ordering::Greater => {}
						Ordering::Equal => return Err(duplicate()),
						Ordering::Less => {
							return Err(BencodeError::DictUnsortedKeys {
								offset,
								key: excerpt(key),
							})
						}
					}
				}
			}
			KeyOrder::Relaxed => {
				if entries.contains_key(key) {
					return Err(duplicate());
				}
			}
		}
		Ok(())
	}

	/// Index of the first non-digit at or after `from`.
	fn digits_end(&self, from: usize) -> usize {
		from + self.input[from.min(self.input.len())..]
			.iter()
			.take_while(|b| b.is_ascii_digit())
			.count()
	}

	/// Slice from `start` through `end` inclusive, clamped to the input.
	fn region(&self, start: usize, end: usize) -> &[u8] {
		&self.input[start..(end + 1).min(self.input.len())]
	}

	/// Parses `i<digits>e` starting at the `i`.
	fn parse_integer(&mut self) -> Result<BValue, BencodeError> {
		let start = self.pos;
		let body_start = start + 1;
		let negative = self.input.get(body_start) == Some(&b'-');
		let digits_start = if negative { body_start + 1 } else { body_start };
		let end = self.digits_end(digits_start);
		let digits = &self.input[digits_start.min(end)..end];

		// Leading zeros only matter for the digit run; "-0" is the one signed case.
		let malformed = digits.is_empty()
			|| self.input.get(end) != Some(&b'e')
			|| (digits[0] == b'0' && (digits.len() > 1 || negative));
		if malformed {
			return Err(BencodeError::IntegerSyntax {
				offset: start,
				excerpt: excerpt(self.region(start, end)),
			});
		}

		let parsed = std::str::from_utf8(&self.input[body_start..end])
			.ok()
			.and_then(|literal| literal.parse::<i64>().ok())
			.ok_or_else(|| BencodeError::IntegerOverflow {
				offset: start,
				excerpt: excerpt(self.region(start, end)),
			})?;

		// add 1 to account for 'e'
		self.pos = end + 1;
		Ok(BValue::Integer(parsed))
	}

	/// Parses `<length>:<bytes>` starting at the first length digit.
	fn parse_bytes(&mut self) -> Result<Vec<u8>, BencodeError> {
		let start = self.pos;
		let end = self.digits_end(start);
		let digits = &self.input[start..end];

		if self.input.get(end) != Some(&b':') || (digits.len() > 1 && digits[0] == b'0') {
			return Err(BencodeError::StringLengthSyntax {
				offset: start,
				excerpt: excerpt(self.region(start, end)),
			});
		}

		// Checked against what is left before allocating anything.
		let data_start = end + 1;
		let available = self.input.len() - data_start;
		let length = std::str::from_utf8(digits)
			.ok()
			.and_then(|s| s.parse::<usize>().ok())
			.filter(|&length| length <= available)
			.ok_or_else(|| BencodeError::StringTruncated {
				offset: start,
				declared: excerpt(digits),
				available,
			})?;

		self.pos = data_start + length;
		Ok(self.input[data_start..self.pos].to_vec())
	}
}

fn container_shape(prefix: u8) -> Shape {
	match prefix {
		b'i' => Shape::Integer,
		b'l' => Shape::List,
		_ => Shape::Dict,
	}
}
