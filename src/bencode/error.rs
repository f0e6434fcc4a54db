use thiserror::Error;

use super::bvalue::Shape;

/// Longest slice of input quoted back in an error message.
const EXCERPT_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BencodeError {
	#[error("Empty input at offset {offset}, expected a value")]
	EmptyInput { offset: usize },

	#[error("Unexpected byte {byte:#04x} at offset {offset}")]
	UnexpectedByte { offset: usize, byte: u8 },

	#[error("Invalid integer at offset {offset}: {excerpt:?}")]
	IntegerSyntax { offset: usize, excerpt: String },

	#[error("Integer out of range at offset {offset}: {excerpt:?}")]
	IntegerOverflow { offset: usize, excerpt: String },

	#[error("Invalid string length at offset {offset}: {excerpt:?}")]
	StringLengthSyntax { offset: usize, excerpt: String },

	#[error("String at offset {offset} declares {declared} bytes, only {available} remain")]
	StringTruncated {
		offset: usize,
		declared: String,
		available: usize,
	},

	#[error("Unclosed list starting at offset {offset} (missing 'e')")]
	ListUnterminated { offset: usize },

	#[error("Unclosed dictionary starting at offset {offset} (missing 'e')")]
	DictUnterminated { offset: usize },

	#[error("Dict key at offset {offset} must be a byte string, found {found}")]
	DictNonStringKey { offset: usize, found: Shape },

	#[error("Duplicate dict key {key:?} at offset {offset}")]
	DictDuplicateKey { offset: usize, key: String },

	#[error("Dict key {key:?} at offset {offset} is out of order")]
	DictUnsortedKeys { offset: usize, key: String },

	#[error("Extra data {excerpt:?} after value at offset {offset}")]
	TrailingBytes { offset: usize, excerpt: String },

	#[error("Expected a {expected} at top level, found {found}")]
	WrongTopLevelShape { expected: Shape, found: Shape },

	#[error("Nesting deeper than {limit} levels at offset {offset}")]
	DepthLimitExceeded { offset: usize, limit: usize },

	#[error("Missing dict key {key:?}")]
	MissingKey { key: String },

	#[error("Value nests deeper than {limit} levels and cannot be rendered as JSON")]
	JsonDepthExceeded { limit: usize },
}

impl BencodeError {
	/// Byte offset into the input the error points at, when it has one.
	pub fn offset(&self) -> Option<usize> {
		match self {
			BencodeError::EmptyInput { offset }
			| BencodeError::UnexpectedByte { offset, .. }
			| BencodeError::IntegerSyntax { offset, .. }
			| BencodeError::IntegerOverflow { offset, .. }
			| BencodeError::StringLengthSyntax { offset, .. }
			| BencodeError::StringTruncated { offset, .. }
			| BencodeError::ListUnterminated { offset }
			| BencodeError::DictUnterminated { offset }
			| BencodeError::DictNonStringKey { offset, .. }
			| BencodeError::DictDuplicateKey { offset, .. }
			| BencodeError::DictUnsortedKeys { offset, .. }
			| BencodeError::TrailingBytes { offset, .. }
			| BencodeError::DepthLimitExceeded { offset, .. } => Some(*offset),
			BencodeError::WrongTopLevelShape { .. }
			| BencodeError::MissingKey { .. }
			| BencodeError::JsonDepthExceeded { .. } => None,
		}
	}
}

/// Lossy, length-capped rendering of raw input for diagnostics.
pub(crate) fn excerpt(bytes: &[u8]) -> String {
	if bytes.len() <= EXCERPT_LEN {
		String::from_utf8_lossy(bytes).into_owned()
	} else {
		format!("{}...", String::from_utf8_lossy(&bytes[..EXCERPT_LEN]))
	}
}
