/// Options used when wrapping a source in a [`ChunkReader`](super::ChunkReader).
///
/// All options have defaults; `ChunkReader::new` uses them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
	/// Size of the read buffer, in bytes.
	///
	/// Tags, size fields and bodies are all read through this buffer.
	///
	/// Defaults to 8 KiB.
	pub capacity: usize,
}

impl ReaderOptions {
	pub fn new() -> Self {
		Self { capacity: 8 * 1024 }
	}

	pub fn with_capacity(mut self, capacity: usize) -> Self {
		self.capacity = capacity;
		self
	}
}

impl Default for ReaderOptions {
	fn default() -> Self {
		Self::new()
	}
}
