//! Fixed-width format tags for identifying chunks in binary files.
//!
//! A [`Tag4`] or [`Tag8`] is four or eight characters packed into an integer, stored so that the
//! bytes on disk read as the characters in order. Tags are decoded from buffers, from readers, or
//! through a [`ChunkReader`] that can also look ahead.

pub use error::TagError;
pub use reader::{ChunkReader, ReaderOptions};
pub use tag::{Packed, Tag, Tag4, Tag8};

pub mod error;
pub mod reader;
pub mod tag;

pub(crate) mod deku_impls;
pub(crate) mod io;
