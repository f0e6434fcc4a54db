use serde_json::{json, Map, Value};

use super::bvalue::{Event, Walk};
use super::{BValue, BencodeError};

/// Deepest container nesting rendered as JSON. serde_json serializes and
/// drops `Value` recursively, so deeper trees are refused up front.
pub const JSON_MAX_DEPTH: usize = 128;

enum Open {
	Array(Vec<Value>),
	Object(Map<String, Value>, String),
}

/// Convert a `BValue` into JSON (using Serde JSON `Value`).
///
/// - `Integer(i)` => JSON number
/// - `ByteString(bytes)` => string when UTF-8, otherwise `{"_bytes_hex": "..."}`
/// - `List(...)` => JSON array
/// - `Dict(...)` => JSON object, keys read as lossy UTF-8
///
/// Values nested deeper than [`JSON_MAX_DEPTH`] give `JsonDepthExceeded`.
pub fn bvalue_to_json(bv: &BValue) -> Result<Value, BencodeError> {
	let mut stack: Vec<Open> = Vec::new();
	for event in Walk::new(bv) {
		let value = match event {
			Event::Integer(i) => json!(i),
			Event::Bytes(bytes) => match std::str::from_utf8(bytes) {
				Ok(utf8_str) => Value::String(utf8_str.to_string()),
				Err(_) => json!({ "_bytes_hex": hex::encode(bytes) }),
			},
			Event::ListStart | Event::DictStart => {
				if stack.len() == JSON_MAX_DEPTH {
					return Err(BencodeError::JsonDepthExceeded {
						limit: JSON_MAX_DEPTH,
					});
				}
				stack.push(match event {
					Event::ListStart => Open::Array(Vec::new()),
					_ => Open::Object(Map::new(), String::new()),
				});
				continue;
			}
			Event::Key(k) => {
				if let Some(Open::Object(_, key)) = stack.last_mut() {
					*key = String::from_utf8_lossy(k).into_owned();
				}
				continue;
			}
			Event::End => match stack.pop() {
				Some(Open::Array(items)) => Value::Array(items),
				Some(Open::Object(map, _)) => Value::Object(map),
				None => continue,
			},
		};
		match stack.last_mut() {
			None => return Ok(value),
			Some(Open::Array(items)) => items.push(value),
			Some(Open::Object(map, key)) => {
				map.insert(std::mem::take(key), value);
			}
		}
	}
	unreachable!("a walk always ends by completing its root")
}
