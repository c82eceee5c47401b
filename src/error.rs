/// Errors from decoding, matching, or parsing tags.
///
/// Running out of bytes and finding a different tag are separate variants, so a truncated file
/// can be told apart from a file in another format.
#[derive(Debug, thiserror::Error)]
pub enum TagError {
	/// Fewer bytes were available than the tag width.
	#[error("insufficient data for tag: needed {needed} bytes, {available} available")]
	InsufficientData { needed: usize, available: usize },

	/// A mandatory tag was not the expected one.
	///
	/// Only [`ChunkReader::expect`](crate::reader::ChunkReader::expect) produces this; the
	/// `matches` family returns `Ok(false)` instead.
	#[error("tag mismatch: expected {expected:?}, found {found:?}")]
	Mismatch { expected: String, found: String },

	/// A textual tag did not have exactly as many characters as the tag width.
	#[error("tag text must be {expected} characters, got {found}")]
	Length { expected: usize, found: usize },

	/// The underlying source or sink failed.
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl TagError {
	/// Whether this is an [`InsufficientData`](TagError::InsufficientData) error.
	pub fn is_truncated(&self) -> bool {
		matches!(self, Self::InsufficientData { .. })
	}
}

impl From<TagError> for std::io::Error {
	fn from(err: TagError) -> Self {
		match err {
			TagError::Io(err) => err,
			err @ TagError::InsufficientData { .. } => {
				std::io::Error::new(std::io::ErrorKind::UnexpectedEof, err)
			}
			err => std::io::Error::new(std::io::ErrorKind::InvalidData, err),
		}
	}
}

#[cfg(test)]
#[test]
fn test_into_io_error_kinds() {
	use std::io::ErrorKind;

	let err: std::io::Error = TagError::InsufficientData {
		needed: 4,
		available: 2,
	}
	.into();
	assert_eq!(err.kind(), ErrorKind::UnexpectedEof);

	let err: std::io::Error = TagError::Mismatch {
		expected: "RIFF".into(),
		found: "RIFE".into(),
	}
	.into();
	assert_eq!(err.kind(), ErrorKind::InvalidData);

	let err: std::io::Error =
		TagError::Io(std::io::Error::new(ErrorKind::PermissionDenied, "nope")).into();
	assert_eq!(err.kind(), ErrorKind::PermissionDenied);
}
