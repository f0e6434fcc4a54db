use super::bvalue::{Event, Walk};
use super::BValue;

/// Encode a `BValue` into its canonical bencoded form.
///
/// Dictionary keys come out in ascending byte order, so equal values always
/// produce identical bytes. Nesting depth does not grow the call stack.
pub fn encode_bvalue(value: &BValue) -> Vec<u8> {
	let mut out: Vec<u8> = Vec::with_capacity(encoded_len(value));
	for event in Walk::new(value) {
		match event {
			Event::Integer(i) => {
				out.push(b'i');
				out.extend_from_slice(i.to_string().as_bytes());
				out.push(b'e');
			}
			Event::Bytes(bytes) | Event::Key(bytes) => write_bytes(bytes, &mut out),
			Event::ListStart => out.push(b'l'),
			Event::DictStart => out.push(b'd'),
			Event::End => out.push(b'e'),
		}
	}
	out
}

fn write_bytes(bytes: &[u8], out: &mut Vec<u8>) {
	out.extend_from_slice(bytes.len().to_string().as_bytes());
	out.push(b':');
	out.extend_from_slice(bytes);
}

/// Exact size of `encode_bvalue(value)` in bytes.
pub fn encoded_len(value: &BValue) -> usize {
	Walk::new(value)
		.map(|event| match event {
			Event::Integer(i) => 2 + usize::from(i < 0) + decimal_len(i.unsigned_abs()),
			Event::Bytes(bytes) | Event::Key(bytes) => bytes_len(bytes),
			// Opening tag; the matching `End` counts the `e`.
			Event::ListStart | Event::DictStart | Event::End => 1,
		})
		.sum()
}

fn bytes_len(bytes: &[u8]) -> usize {
	decimal_len(bytes.len() as u64) + 1 + bytes.len()
}

fn decimal_len(mut n: u64) -> usize {
	let mut len = 1;
	while n >= 10 {
		n /= 10;
		len += 1;
	}
	len
}
