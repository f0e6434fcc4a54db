// infohash.rs
use crate::bencode::{encode_bvalue, BValue, BencodeError, Shape};

use sha1::{Digest, Sha1};

/// SHA-1 over the canonical encoding of the `info` entry of a metainfo dict.
///
/// The decoder only accepts canonical input, so re-encoding the decoded
/// `info` dict reproduces the exact bytes that appeared in the file.
pub fn info_hash(metainfo: &BValue) -> Result<[u8; 20], BencodeError> {
	if metainfo.shape() != Shape::Dict {
		return Err(BencodeError::WrongTopLevelShape {
			expected: Shape::Dict,
			found: metainfo.shape(),
		});
	}
	let info = metainfo.get(b"info").ok_or_else(|| BencodeError::MissingKey {
		key: "info".to_string(),
	})?;

	let encoded = encode_bvalue(info);

	let mut hasher = Sha1::new();
	hasher.update(&encoded);
	let result = hasher.finalize();

	let mut hash_bytes = [0u8; 20];
	hash_bytes.copy_from_slice(&result);
	Ok(hash_bytes)
}
