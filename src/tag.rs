use std::{
	fmt::{self, Write as _},
	hash::Hash,
	io::{Read, Write},
	str::FromStr,
};

use futures_io::{AsyncRead, AsyncWrite};
use futures_util::io::AsyncWriteExt;

use crate::{
	error::TagError,
	io::{read_full, read_full_async},
};

mod sealed {
	pub trait Sealed {}
}

/// Unsigned integer a tag is packed into.
///
/// Implemented for `u32` (4-character tags) and `u64` (8-character tags).
pub trait Packed: sealed::Sealed + Copy + Eq + Hash + Send + Sync + 'static {
	/// Width of the tag in bytes, which is also its length in characters.
	const WIDTH: usize;

	/// The `[u8; WIDTH]` array holding the on-disk bytes.
	type Bytes: AsRef<[u8]> + AsMut<[u8]> + Copy + Default + Send + Sync;

	fn from_le_bytes(bytes: Self::Bytes) -> Self;
	fn to_le_bytes(self) -> Self::Bytes;
}

/// A fixed-width format tag, like a RIFF four-character code.
///
/// Character 0 lives in the least significant byte of the packed integer, character 1 in the
/// next, and so on. Written out little-endian, the bytes on disk read as the characters in
/// order, so `RIFF` is stored as `52 49 46 46`.
///
/// Equality and hashing compare the packed integer only.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag<P: Packed>(P);

/// A four-character tag.
pub type Tag4 = Tag<u32>;

/// An eight-character tag.
pub type Tag8 = Tag<u64>;

macro_rules! width {
	($ty:ty, $width:literal) => {
		impl sealed::Sealed for $ty {}

		impl Packed for $ty {
			const WIDTH: usize = $width;
			type Bytes = [u8; $width];

			fn from_le_bytes(bytes: Self::Bytes) -> Self {
				<$ty>::from_le_bytes(bytes)
			}

			fn to_le_bytes(self) -> Self::Bytes {
				<$ty>::to_le_bytes(self)
			}
		}

		impl Tag<$ty> {
			/// Pack characters into a tag, character `i` into byte `i`.
			///
			/// Each character is narrowed to its low 8 bits: characters above `U+00FF` lose
			/// their high bits silently. This is kept for compatibility with existing files
			/// rather than rejected.
			pub const fn new(chars: [char; $width]) -> Self {
				let mut bytes = [0; $width];
				let mut i = 0;
				while i < $width {
					bytes[i] = chars[i] as u8;
					i += 1;
				}
				Self(<$ty>::from_le_bytes(bytes))
			}

			/// Pack a byte string literal, e.g. `b"RIFF"`.
			pub const fn from_ascii(bytes: &[u8; $width]) -> Self {
				Self(<$ty>::from_le_bytes(*bytes))
			}
		}
	};
}

width!(u32, 4);
width!(u64, 8);

impl<P: Packed> Tag<P> {
	/// The tag width in bytes.
	pub const WIDTH: usize = P::WIDTH;

	/// Wrap an already-packed integer.
	pub const fn from_packed(packed: P) -> Self {
		Self(packed)
	}

	/// The packed integer.
	pub const fn packed(self) -> P {
		self.0
	}

	/// Decode from the first `WIDTH` bytes of a buffer.
	///
	/// Bytes past the tag are ignored. A buffer shorter than the tag is an
	/// [`InsufficientData`](TagError::InsufficientData) error, never a zero-padded tag.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, TagError> {
		let head = bytes
			.get(..P::WIDTH)
			.ok_or(TagError::InsufficientData {
				needed: P::WIDTH,
				available: bytes.len(),
			})?;

		let mut packed = P::Bytes::default();
		packed.as_mut().copy_from_slice(head);
		Ok(Self(P::from_le_bytes(packed)))
	}

	/// Decode from the current position of a reader.
	///
	/// The reader advances by `WIDTH` bytes, or to its end if fewer remain, in which case this
	/// returns [`InsufficientData`](TagError::InsufficientData).
	#[tracing::instrument(level = "trace", skip(io))]
	pub fn read<R: Read + ?Sized>(io: &mut R) -> Result<Self, TagError> {
		let mut bytes = P::Bytes::default();
		read_full(io, bytes.as_mut())?;
		let tag = Self(P::from_le_bytes(bytes));
		tracing::trace!(?tag, "read tag");
		Ok(tag)
	}

	/// Decode from the current position of an async reader.
	///
	/// Consumes bytes exactly like [`read`](Tag::read).
	#[tracing::instrument(level = "trace", skip(io))]
	pub async fn read_async<R: AsyncRead + Unpin + ?Sized>(io: &mut R) -> Result<Self, TagError> {
		let mut bytes = P::Bytes::default();
		read_full_async(io, bytes.as_mut()).await?;
		let tag = Self(P::from_le_bytes(bytes));
		tracing::trace!(?tag, "read tag");
		Ok(tag)
	}

	/// The on-disk bytes, character 0 first.
	pub fn to_bytes(self) -> P::Bytes {
		self.0.to_le_bytes()
	}

	/// Write the `WIDTH` on-disk bytes at the writer's position.
	pub fn write<W: Write + ?Sized>(self, io: &mut W) -> std::io::Result<()> {
		io.write_all(self.to_bytes().as_ref())
	}

	/// Write the `WIDTH` on-disk bytes at the async writer's position.
	pub async fn write_async<W: AsyncWrite + Unpin + ?Sized>(
		self,
		io: &mut W,
	) -> std::io::Result<()> {
		io.write_all(self.to_bytes().as_ref()).await
	}

	/// Whether the first `WIDTH` bytes of a buffer are this tag.
	pub fn matches_bytes(self, bytes: &[u8]) -> Result<bool, TagError> {
		Ok(Self::from_bytes(bytes)? == self)
	}

	/// Whether the next `WIDTH` bytes of a reader are this tag.
	///
	/// This consumes on call: the reader advances by `WIDTH` bytes whether or not the tag
	/// matches. To look ahead without consuming, use
	/// [`ChunkReader::peek_tag`](crate::reader::ChunkReader::peek_tag) or
	/// [`ChunkReader::sniff`](crate::reader::ChunkReader::sniff).
	pub fn matches<R: Read + ?Sized>(self, io: &mut R) -> Result<bool, TagError> {
		Ok(Self::read(io)? == self)
	}

	/// Whether the next `WIDTH` bytes of an async reader are this tag.
	///
	/// Consumes on call, like [`matches`](Tag::matches).
	pub async fn matches_async<R: AsyncRead + Unpin + ?Sized>(
		self,
		io: &mut R,
	) -> Result<bool, TagError> {
		Ok(Self::read_async(io).await? == self)
	}

	/// The characters of the tag, in order.
	///
	/// Each byte maps to the character with the same code point.
	pub fn chars(self) -> impl Iterator<Item = char> {
		let bytes = self.to_bytes();
		(0..P::WIDTH).map(move |i| char::from(bytes.as_ref()[i]))
	}

	/// Lowercase hex of the on-disk bytes, as a hex dump would show them.
	pub fn to_hex(self) -> String {
		hex::encode(self.to_bytes())
	}
}

impl<P: Packed> fmt::Display for Tag<P> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if f.width().is_some() {
			return f.pad(&self.chars().collect::<String>());
		}

		self.chars().try_for_each(|c| f.write_char(c))
	}
}

impl<P: Packed> fmt::Debug for Tag<P> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let bytes = self.to_bytes();
		write!(f, "Tag({:?})", bstr::BStr::new(&bytes))
	}
}

impl<P: Packed> FromStr for Tag<P> {
	type Err = TagError;

	/// Parse exactly `WIDTH` characters, narrowed like [`Tag4::new`].
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let found = s.chars().count();
		if found != P::WIDTH {
			return Err(TagError::Length {
				expected: P::WIDTH,
				found,
			});
		}

		let mut bytes = P::Bytes::default();
		for (slot, c) in bytes.as_mut().iter_mut().zip(s.chars()) {
			*slot = c as u8;
		}
		Ok(Self(P::from_le_bytes(bytes)))
	}
}

#[cfg(test)]
mod tests {
	use std::{
		collections::{hash_map::RandomState, HashMap},
		hash::BuildHasher,
		io::Cursor,
	};

	use super::*;

	const RIFF: Tag4 = Tag4::from_ascii(b"RIFF");

	#[test]
	fn riff_encodes_in_reading_order() {
		assert_eq!(Tag4::new(['R', 'I', 'F', 'F']), RIFF);
		assert_eq!(RIFF.to_bytes(), [0x52, 0x49, 0x46, 0x46]);
		assert_eq!(RIFF.packed(), 0x4646_4952);
		assert_eq!(RIFF.to_hex(), "52494646");
	}

	#[test]
	fn byte_order_reads_left_to_right() {
		let tag = Tag4::new(['a', 'b', 'c', 'd']);
		let mut out = Vec::new();
		tag.write(&mut out).unwrap();
		assert_eq!(out, b"abcd");
		assert_eq!(String::from_utf8(out).unwrap(), tag.to_string());
	}

	#[test]
	fn matches_bytes() {
		assert!(RIFF.matches_bytes(&[0x52, 0x49, 0x46, 0x46]).unwrap());
		assert!(!RIFF.matches_bytes(&[0x52, 0x49, 0x46, 0x45]).unwrap());
		assert!(RIFF.matches_bytes(b"RIFF\x24\x08\x00\x00WAVE").unwrap());
	}

	#[test]
	fn short_buffer_is_insufficient_data() {
		let err = Tag4::from_bytes(&[0x00, 0x00]).unwrap_err();
		assert!(matches!(
			err,
			TagError::InsufficientData {
				needed: 4,
				available: 2
			}
		));
		assert!(RIFF.matches_bytes(b"RIF").unwrap_err().is_truncated());
		assert!(Tag8::from_bytes(b"RIFFWAV").unwrap_err().is_truncated());
	}

	#[test]
	fn eight_wide_tags() {
		let tag = Tag8::new(['O', 'S', 'U', 'R', 'E', 'P', 'L', 'Y']);
		assert_eq!(tag, Tag8::from_ascii(b"OSUREPLY"));
		assert_eq!(&tag.to_bytes(), b"OSUREPLY");
		assert_eq!(Tag8::from_bytes(b"OSUREPLY").unwrap(), tag);
		assert_eq!(tag.to_string(), "OSUREPLY");
		assert_eq!(Tag8::WIDTH, 8);
	}

	#[test]
	fn round_trips_through_bytes_and_streams() {
		for text in ["RIFF", "LIST", "fmt ", "\0\x01\x7f\u{ff}"] {
			let tag: Tag4 = text.parse().unwrap();
			assert_eq!(Tag4::from_bytes(&tag.to_bytes()).unwrap(), tag);

			let mut out = Vec::new();
			tag.write(&mut out).unwrap();
			assert_eq!(Tag4::read(&mut out.as_slice()).unwrap(), tag);
		}
	}

	#[test]
	fn wide_characters_are_narrowed() {
		// U+0152 narrows to 0x52, 'R'
		assert_eq!(Tag4::new(['\u{152}', 'I', 'F', 'F']), RIFF);
		assert_eq!("\u{152}IFF".parse::<Tag4>().unwrap(), RIFF);
	}

	#[test]
	fn equality_follows_characters() {
		assert_eq!(Tag4::new(['W', 'A', 'V', 'E']), Tag4::from_ascii(b"WAVE"));
		assert_ne!(Tag4::from_ascii(b"WAVE"), Tag4::from_ascii(b"EVAW"));
		assert_ne!(Tag4::from_ascii(b"data"), Tag4::from_ascii(b"DATA"));
	}

	#[test]
	fn equal_tags_hash_equal() {
		let state = RandomState::new();
		let a = Tag4::new(['d', 'a', 't', 'a']);
		let b = Tag4::from_bytes(b"data").unwrap();
		assert_eq!(state.hash_one(a), state.hash_one(b));

		let mut handlers = HashMap::new();
		handlers.insert(RIFF, "container");
		handlers.insert(Tag4::from_ascii(b"fmt "), "format");
		assert_eq!(handlers.get(&Tag4::from_bytes(b"fmt ").unwrap()), Some(&"format"));
		assert_eq!(handlers.get(&Tag4::from_ascii(b"junk")), None);
	}

	#[test]
	fn stream_match_consumes_whether_or_not_it_matches() {
		let mut io = Cursor::new(b"RIFEWAVE".to_vec());
		assert!(!RIFF.matches(&mut io).unwrap());
		assert_eq!(io.position(), 4);
		assert!(Tag4::from_ascii(b"WAVE").matches(&mut io).unwrap());
		assert_eq!(io.position(), 8);
	}

	#[test]
	fn short_stream_is_insufficient_data() {
		let mut io = Cursor::new(vec![0x00, 0x00]);
		let err = Tag4::read(&mut io).unwrap_err();
		assert!(matches!(
			err,
			TagError::InsufficientData {
				needed: 4,
				available: 2
			}
		));
		assert_eq!(io.position(), 2);

		let mut io = Cursor::new(b"RIFF".to_vec());
		assert!(Tag8::read(&mut io).unwrap_err().is_truncated());
	}

	#[test]
	fn rendering() {
		assert_eq!(RIFF.to_string(), "RIFF");
		assert_eq!(format!("{:>6}", RIFF), "  RIFF");
		assert_eq!(format!("{:?}", RIFF), "Tag(\"RIFF\")");
		assert_eq!(RIFF.chars().collect::<Vec<_>>(), ['R', 'I', 'F', 'F']);
	}

	#[test]
	fn parse_rejects_wrong_length() {
		assert!(matches!(
			"RIF".parse::<Tag4>(),
			Err(TagError::Length {
				expected: 4,
				found: 3
			})
		));
		assert!(matches!(
			"RIFFWAVE".parse::<Tag4>(),
			Err(TagError::Length {
				expected: 4,
				found: 8
			})
		));
		assert!("OSUREPLY".parse::<Tag8>().is_ok());
	}

	#[tokio::test]
	async fn async_round_trip_and_consumption() {
		use futures_util::io::Cursor;

		let mut io = Cursor::new(Vec::new());
		RIFF.write_async(&mut io).await.unwrap();
		Tag4::from_ascii(b"WAVE").write_async(&mut io).await.unwrap();
		assert_eq!(io.get_ref().as_slice(), b"RIFFWAVE");

		io.set_position(0);
		assert!(!Tag4::from_ascii(b"WAVE").matches_async(&mut io).await.unwrap());
		assert_eq!(io.position(), 4);
		assert_eq!(Tag4::read_async(&mut io).await.unwrap(), Tag4::from_ascii(b"WAVE"));
		assert!(Tag4::read_async(&mut io).await.unwrap_err().is_truncated());
	}
}
