use std::io::{BufReader, ErrorKind, Read};

pub use self::options::ReaderOptions;

use crate::{
	error::TagError,
	tag::{Packed, Tag},
};

pub mod options;

/// A single-pass buffered reader for chunked binary data.
///
/// Tags read through it consume their bytes, like [`Tag::read`]. Unlike a plain reader it can
/// also look ahead: [`peek_tag`](ChunkReader::peek_tag) and [`sniff`](ChunkReader::sniff) hold
/// the upcoming bytes back so the next read sees them again.
///
/// It implements [`Read`], so chunk bodies can be read through the same cursor.
pub struct ChunkReader<R> {
	io: BufReader<R>,
	lookahead: Vec<u8>,
	position: u64,
}

impl<R> std::fmt::Debug for ChunkReader<R> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ChunkReader")
			.field("io", &std::any::type_name::<R>())
			.field("lookahead", &bstr::BStr::new(&self.lookahead))
			.field("position", &self.position)
			.finish()
	}
}

impl<R: Read> ChunkReader<R> {
	pub fn new(io: R) -> Self {
		Self::with_options(io, ReaderOptions::default())
	}

	pub fn with_options(io: R, options: ReaderOptions) -> Self {
		Self {
			io: BufReader::with_capacity(options.capacity, io),
			lookahead: Vec::new(),
			position: 0,
		}
	}

	/// Bytes consumed so far.
	///
	/// Peeked bytes are not counted until they are read.
	pub fn position(&self) -> u64 {
		self.position
	}

	/// Get a reference to the wrapped reader.
	pub fn get_ref(&self) -> &R {
		self.io.get_ref()
	}

	/// Unwrap the reader.
	///
	/// Bytes that were buffered or peeked but not yet read are lost.
	pub fn into_inner(self) -> R {
		self.io.into_inner()
	}

	/// Read the next tag, consuming its bytes.
	pub fn read_tag<P: Packed>(&mut self) -> Result<Tag<P>, TagError> {
		Tag::read(self)
	}

	/// Whether the next tag is `tag`.
	///
	/// This consumes on call: `WIDTH` bytes are read whether or not the tag matches. Use
	/// [`sniff`](ChunkReader::sniff) to test without consuming.
	pub fn matches<P: Packed>(&mut self, tag: Tag<P>) -> Result<bool, TagError> {
		tag.matches(self)
	}

	/// Read the next tag and fail with [`TagError::Mismatch`] unless it is `tag`.
	///
	/// For tags a format requires at a fixed position. The tag is consumed either way.
	pub fn expect<P: Packed>(&mut self, tag: Tag<P>) -> Result<(), TagError> {
		let found = self.read_tag::<P>()?;
		if found == tag {
			Ok(())
		} else {
			tracing::debug!(position = self.position, expected = ?tag, ?found, "tag mismatch");
			Err(TagError::Mismatch {
				expected: tag.to_string(),
				found: found.to_string(),
			})
		}
	}

	/// Decode the next tag without consuming it.
	///
	/// If the source ends before a whole tag, this fails with
	/// [`InsufficientData`](TagError::InsufficientData) and the remaining bytes stay readable.
	pub fn peek_tag<P: Packed>(&mut self) -> Result<Tag<P>, TagError> {
		self.fill_lookahead(P::WIDTH)?;
		Tag::from_bytes(&self.lookahead)
	}

	/// Find which of `candidates` comes next, without consuming anything.
	///
	/// Returns the first candidate equal to the upcoming tag, or `None` if none is.
	pub fn sniff<P: Packed>(&mut self, candidates: &[Tag<P>]) -> Result<Option<Tag<P>>, TagError> {
		let next = self.peek_tag::<P>()?;
		let found = candidates.iter().copied().find(|candidate| *candidate == next);
		tracing::debug!(position = self.position, ?next, ?found, "sniffed tag");
		Ok(found)
	}

	/// Discard `n` bytes, such as the body of a chunk that isn't understood.
	pub fn skip(&mut self, n: u64) -> Result<(), TagError> {
		let skipped = std::io::copy(&mut self.by_ref().take(n), &mut std::io::sink())?;
		tracing::trace!(requested = n, skipped, "skipped bytes");
		if skipped < n {
			return Err(TagError::InsufficientData {
				needed: usize::try_from(n).unwrap_or(usize::MAX),
				available: usize::try_from(skipped).unwrap_or(usize::MAX),
			});
		}
		Ok(())
	}

	fn fill_lookahead(&mut self, len: usize) -> Result<(), TagError> {
		let mut n = self.lookahead.len();
		if n >= len {
			return Ok(());
		}

		self.lookahead.resize(len, 0);
		while n < len {
			match self.io.read(&mut self.lookahead[n..]) {
				Ok(0) => break,
				Ok(m) => n += m,
				Err(err) if err.kind() == ErrorKind::Interrupted => continue,
				Err(err) => {
					self.lookahead.truncate(n);
					return Err(err.into());
				}
			}
		}
		self.lookahead.truncate(n);
		tracing::trace!(position = self.position, lookahead = n, "filled lookahead");
		Ok(())
	}
}

impl<R: Read> Read for ChunkReader<R> {
	fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
		let n = if self.lookahead.is_empty() {
			self.io.read(buf)?
		} else {
			let n = buf.len().min(self.lookahead.len());
			buf[..n].copy_from_slice(&self.lookahead[..n]);
			self.lookahead.drain(..n);
			n
		};
		self.position += n as u64;
		Ok(n)
	}
}
