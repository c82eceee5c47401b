use deku::{ctx::Endian, no_std_io, prelude::*};

use crate::tag::Tag;

// The endian context is accepted so tags can sit in `#[deku(endian = ...)]` structs, but the
// layout is fixed: character 0 always comes first.
macro_rules! deku_tag {
	($ty:ty) => {
		impl<'a> DekuReader<'a, Endian> for Tag<$ty> {
			fn from_reader_with_ctx<R: no_std_io::Read + no_std_io::Seek>(
				reader: &mut Reader<R>,
				_endian: Endian,
			) -> Result<Self, DekuError> {
				<$ty>::from_reader_with_ctx(reader, Endian::Little).map(Tag::from_packed)
			}
		}

		impl<'a> DekuReader<'a, ()> for Tag<$ty> {
			fn from_reader_with_ctx<R: no_std_io::Read + no_std_io::Seek>(
				reader: &mut Reader<R>,
				_: (),
			) -> Result<Self, DekuError> {
				<Self as DekuReader<'a, Endian>>::from_reader_with_ctx(reader, Endian::Little)
			}
		}

		impl DekuWriter<Endian> for Tag<$ty> {
			fn to_writer<W: no_std_io::Write + no_std_io::Seek>(
				&self,
				writer: &mut Writer<W>,
				_endian: Endian,
			) -> Result<(), DekuError> {
				self.packed().to_writer(writer, Endian::Little)
			}
		}

		impl DekuWriter<()> for Tag<$ty> {
			fn to_writer<W: no_std_io::Write + no_std_io::Seek>(
				&self,
				writer: &mut Writer<W>,
				_: (),
			) -> Result<(), DekuError> {
				<Self as DekuWriter<Endian>>::to_writer(self, writer, Endian::Little)
			}
		}
	};
}

deku_tag!(u32);
deku_tag!(u64);
