use std::io::{ErrorKind, Read};

use futures_io::AsyncRead;
use futures_util::io::AsyncReadExt;

use crate::error::TagError;

/// Fill `buf` from `io`, stopping early only at end of stream.
///
/// Everything the source yields is consumed, so a short stream is left at its end.
pub(crate) fn read_full<R: Read + ?Sized>(io: &mut R, buf: &mut [u8]) -> Result<(), TagError> {
	let mut n = 0;
	while n < buf.len() {
		match io.read(&mut buf[n..]) {
			Ok(0) => {
				tracing::trace!(needed = buf.len(), available = n, "reached EOF before tag end");
				return Err(TagError::InsufficientData {
					needed: buf.len(),
					available: n,
				});
			}
			Ok(m) => n += m,
			Err(err) if err.kind() == ErrorKind::Interrupted => continue,
			Err(err) => return Err(err.into()),
		}
	}
	Ok(())
}

pub(crate) async fn read_full_async<R: AsyncRead + Unpin + ?Sized>(
	io: &mut R,
	buf: &mut [u8],
) -> Result<(), TagError> {
	let mut n = 0;
	while n < buf.len() {
		match io.read(&mut buf[n..]).await {
			Ok(0) => {
				tracing::trace!(needed = buf.len(), available = n, "reached EOF before tag end");
				return Err(TagError::InsufficientData {
					needed: buf.len(),
					available: n,
				});
			}
			Ok(m) => n += m,
			Err(err) if err.kind() == ErrorKind::Interrupted => continue,
			Err(err) => return Err(err.into()),
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Hands out one byte per read call.
	struct Trickle<'a>(&'a [u8]);

	impl Read for Trickle<'_> {
		fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
			match (self.0.split_first(), buf.first_mut()) {
				(Some((byte, rest)), Some(slot)) => {
					*slot = *byte;
					self.0 = rest;
					Ok(1)
				}
				_ => Ok(0),
			}
		}
	}

	#[test]
	fn fills_across_short_reads() {
		let mut io = Trickle(b"abcdef");
		let mut buf = [0; 4];
		read_full(&mut io, &mut buf).unwrap();
		assert_eq!(&buf, b"abcd");
		assert_eq!(io.0, b"ef");
	}

	#[test]
	fn reports_available_bytes_at_eof() {
		let mut io = Trickle(b"ab");
		let mut buf = [0; 4];
		let err = read_full(&mut io, &mut buf).unwrap_err();
		assert!(matches!(
			err,
			TagError::InsufficientData {
				needed: 4,
				available: 2
			}
		));
		assert!(io.0.is_empty());
	}

	#[tokio::test]
	async fn async_reports_available_bytes_at_eof() {
		let mut io = futures_util::io::Cursor::new(vec![1, 2, 3]);
		let mut buf = [0; 8];
		let err = read_full_async(&mut io, &mut buf).await.unwrap_err();
		assert!(matches!(
			err,
			TagError::InsufficientData {
				needed: 8,
				available: 3
			}
		));
		assert_eq!(io.position(), 3);
	}
}
