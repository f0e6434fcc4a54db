use std::collections::{btree_map, BTreeMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::slice;

/// A decoded bencode value.
///
/// Dictionaries are keyed on raw bytes. `BTreeMap` orders them by unsigned
/// byte comparison, which is the order bencode requires on the wire.
///
/// Nesting depth is limited only by the heap: dropping, cloning, comparing,
/// hashing and formatting all walk the tree with an explicit stack.
pub enum BValue {
	ByteString(Vec<u8>), // raw bytes, not necessarily text
	Integer(i64),
	List(Vec<BValue>),
	Dict(BTreeMap<Vec<u8>, BValue>),
}

/// One step of a depth-first walk over a [`BValue`], in encoding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Event<'a> {
	Integer(i64),
	Bytes(&'a [u8]),
	ListStart,
	DictStart,
	Key(&'a [u8]),
	End,
}

enum Cursor<'a> {
	List(slice::Iter<'a, BValue>),
	Dict(btree_map::Iter<'a, Vec<u8>, BValue>),
}

/// Iterative pre-order walk; dict entries come out in key order.
pub(crate) struct Walk<'a> {
	stack: Vec<Cursor<'a>>,
	pending: Option<&'a BValue>,
}

impl<'a> Walk<'a> {
	pub(crate) fn new(root: &'a BValue) -> Self {
		Walk {
			stack: Vec::new(),
			pending: Some(root),
		}
	}

	fn enter(&mut self, value: &'a BValue) -> Event<'a> {
		match value {
			BValue::Integer(i) => Event::Integer(*i),
			BValue::ByteString(b) => Event::Bytes(b),
			BValue::List(items) => {
				self.stack.push(Cursor::List(items.iter()));
				Event::ListStart
			}
			BValue::Dict(entries) => {
				self.stack.push(Cursor::Dict(entries.iter()));
				Event::DictStart
			}
		}
	}
}

impl<'a> Iterator for Walk<'a> {
	type Item = Event<'a>;

	fn next(&mut self) -> Option<Event<'a>> {
		if let Some(value) = self.pending.take() {
			return Some(self.enter(value));
		}
		let step = match self.stack.last_mut()? {
			Cursor::List(items) => items.next().map(|v| (None, v)),
			Cursor::Dict(entries) => entries.next().map(|(k, v)| (Some(k.as_slice()), v)),
		};
		match step {
			None => {
				self.stack.pop();
				Some(Event::End)
			}
			Some((Some(key), value)) => {
				self.pending = Some(value);
				Some(Event::Key(key))
			}
			Some((None, value)) => Some(self.enter(value)),
		}
	}
}

/// Moves the children of a container out into `out`, leaving it empty.
fn take_children(value: &mut BValue, out: &mut Vec<BValue>) {
	match value {
		BValue::List(items) => out.append(items),
		BValue::Dict(entries) => out.extend(std::mem::take(entries).into_values()),
		BValue::Integer(_) | BValue::ByteString(_) => {}
	}
}

impl Drop for BValue {
	fn drop(&mut self) {
		let mut pending = Vec::new();
		take_children(self, &mut pending);
		while let Some(mut child) = pending.pop() {
			take_children(&mut child, &mut pending);
			// `child` is now shallow and drops without recursing.
		}
	}
}

impl PartialEq for BValue {
	fn eq(&self, other: &Self) -> bool {
		Walk::new(self).eq(Walk::new(other))
	}
}

impl Eq for BValue {}

impl Hash for BValue {
	fn hash<H: Hasher>(&self, state: &mut H) {
		for event in Walk::new(self) {
			event.hash(state);
		}
	}
}

/// A container being rebuilt by [`BValue::clone`].
enum Partial {
	List(Vec<BValue>),
	Dict(BTreeMap<Vec<u8>, BValue>, Option<Vec<u8>>),
}

impl Clone for BValue {
	fn clone(&self) -> Self {
		let mut stack: Vec<Partial> = Vec::new();
		for event in Walk::new(self) {
			let value = match event {
				Event::Integer(i) => BValue::Integer(i),
				Event::Bytes(b) => BValue::ByteString(b.to_vec()),
				Event::ListStart => {
					stack.push(Partial::List(Vec::new()));
					continue;
				}
				Event::DictStart => {
					stack.push(Partial::Dict(BTreeMap::new(), None));
					continue;
				}
				Event::Key(k) => {
					if let Some(Partial::Dict(_, key)) = stack.last_mut() {
						*key = Some(k.to_vec());
					}
					continue;
				}
				Event::End => match stack.pop() {
					Some(Partial::List(items)) => BValue::List(items),
					Some(Partial::Dict(entries, _)) => BValue::Dict(entries),
					None => continue,
				},
			};
			match stack.last_mut() {
				None => return value,
				Some(Partial::List(items)) => items.push(value),
				Some(Partial::Dict(entries, key)) => {
					if let Some(key) = key.take() {
						entries.insert(key, value);
					}
				}
			}
		}
		unreachable!("a walk always ends by completing its root")
	}
}

impl fmt::Debug for BValue {
	/// Same shape as a derived `Debug`, e.g. `Dict({b"foo": Integer(42)})`.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		// One entry per open container: (is_dict, has_items).
		let mut open: Vec<(bool, bool)> = Vec::new();
		for event in Walk::new(self) {
			if event != Event::End {
				if let Some((is_dict, has_items)) = open.last_mut() {
					// Dict values follow their key directly.
					let separated = !*is_dict || matches!(event, Event::Key(_));
					if separated {
						if *has_items {
							f.write_str(", ")?;
						}
						*has_items = true;
					}
				}
			}
			match event {
				Event::Integer(i) => write!(f, "Integer({})", i)?,
				Event::Bytes(b) => write!(f, "ByteString(b\"{}\")", b.escape_ascii())?,
				Event::Key(k) => write!(f, "b\"{}\": ", k.escape_ascii())?,
				Event::ListStart => {
					open.push((false, false));
					f.write_str("List([")?;
				}
				Event::DictStart => {
					open.push((true, false));
					f.write_str("Dict({")?;
				}
				Event::End => match open.pop() {
					Some((true, _)) => f.write_str("})")?,
					_ => f.write_str("])")?,
				},
			}
		}
		Ok(())
	}
}

/// The four shapes a [`BValue`] can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
	Integer,
	ByteString,
	List,
	Dict,
}

impl fmt::Display for Shape {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Shape::Integer => write!(f, "integer"),
			Shape::ByteString => write!(f, "byte string"),
			Shape::List => write!(f, "list"),
			Shape::Dict => write!(f, "dictionary"),
		}
	}
}

impl BValue {
	/// Byte string holding the UTF-8 bytes of `s`.
	pub fn string(s: &str) -> Self {
		BValue::ByteString(s.as_bytes().to_vec())
	}

	pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
		BValue::ByteString(b.into())
	}

	pub fn shape(&self) -> Shape {
		match self {
			BValue::Integer(_) => Shape::Integer,
			BValue::ByteString(_) => Shape::ByteString,
			BValue::List(_) => Shape::List,
			BValue::Dict(_) => Shape::Dict,
		}
	}

	pub fn as_integer(&self) -> Option<i64> {
		match self {
			BValue::Integer(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			BValue::ByteString(b) => Some(b),
			_ => None,
		}
	}

	/// Returns the byte string as `&str` when it is valid UTF-8.
	///
	/// Piece hashes and other binary payloads yield `None` here; use
	/// [`BValue::as_bytes`] for those.
	pub fn as_str(&self) -> Option<&str> {
		self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
	}

	pub fn as_list(&self) -> Option<&[BValue]> {
		match self {
			BValue::List(l) => Some(l),
			_ => None,
		}
	}

	pub fn as_dict(&self) -> Option<&BTreeMap<Vec<u8>, BValue>> {
		match self {
			BValue::Dict(d) => Some(d),
			_ => None,
		}
	}

	/// Looks up `key` when this value is a dictionary.
	pub fn get(&self, key: &[u8]) -> Option<&BValue> {
		self.as_dict()?.get(key)
	}

	pub fn into_bytes(mut self) -> Option<Vec<u8>> {
		match &mut self {
			BValue::ByteString(b) => Some(std::mem::take(b)),
			_ => None,
		}
	}

	pub fn into_list(mut self) -> Option<Vec<BValue>> {
		match &mut self {
			BValue::List(l) => Some(std::mem::take(l)),
			_ => None,
		}
	}

	pub fn into_dict(mut self) -> Option<BTreeMap<Vec<u8>, BValue>> {
		match &mut self {
			BValue::Dict(d) => Some(std::mem::take(d)),
			_ => None,
		}
	}
}

impl From<i64> for BValue {
	fn from(i: i64) -> Self {
		BValue::Integer(i)
	}
}

impl From<&str> for BValue {
	fn from(s: &str) -> Self {
		BValue::string(s)
	}
}

impl From<Vec<u8>> for BValue {
	fn from(b: Vec<u8>) -> Self {
		BValue::ByteString(b)
	}
}

impl From<Vec<BValue>> for BValue {
	fn from(l: Vec<BValue>) -> Self {
		BValue::List(l)
	}
}

impl From<BTreeMap<Vec<u8>, BValue>> for BValue {
	fn from(d: BTreeMap<Vec<u8>, BValue>) -> Self {
		BValue::Dict(d)
	}
}
