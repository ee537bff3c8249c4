//! Block compression and decompression handling.

use std::io::{self, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};
use tracing::instrument;

/// Identifies how the dictionary and body of a document are stored
///
/// On the wire this is the signed compression byte: `-1` for [`CompressionMethod::None`], the
/// zlib level otherwise.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum CompressionMethod {
    /// Stores the data as it is
    #[default]
    None,

    /// Compress the data using Zlib at the given level (`0..=9`)
    Zlib(u8),
}

impl CompressionMethod {
    /// Zlib at its default level
    pub const fn zlib() -> Self {
        CompressionMethod::Zlib(6)
    }

    fn level(self) -> Compression {
        match self {
            CompressionMethod::None => Compression::none(),
            CompressionMethod::Zlib(level) => Compression::new(u32::from(level.min(9))),
        }
    }
}

impl From<i8> for CompressionMethod {
    fn from(value: i8) -> Self {
        match u8::try_from(value) {
            Ok(level) => CompressionMethod::Zlib(level),
            Err(_) => CompressionMethod::None,
        }
    }
}

impl From<CompressionMethod> for i8 {
    fn from(value: CompressionMethod) -> Self {
        match value {
            CompressionMethod::None => -1,
            CompressionMethod::Zlib(level) => level.min(9) as i8,
        }
    }
}

/// Source of the dictionary and body, decompressing when the document asks for it
pub(crate) enum TagBlockReader<R: Read> {
    Raw(R),
    Compressed(Box<ZlibDecoder<io::Take<R>>>),
}

impl<R: Read> TagBlockReader<R> {
    /// Wrap `reader`, which must be positioned right after the compression byte
    #[instrument(skip(reader), err)]
    pub fn new(mut reader: R, compression: CompressionMethod) -> io::Result<Self> {
        Ok(match compression {
            CompressionMethod::None => TagBlockReader::Raw(reader),
            CompressionMethod::Zlib(_) => {
                let limit = reader.read_u32::<BigEndian>()?;
                TagBlockReader::Compressed(Box::new(ZlibDecoder::new(
                    reader.take(u64::from(limit)),
                )))
            }
        })
    }

    pub fn into_inner(self) -> R {
        match self {
            TagBlockReader::Raw(r) => r,
            TagBlockReader::Compressed(r) => r.into_inner().into_inner(),
        }
    }
}

impl<R: Read> Read for TagBlockReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            TagBlockReader::Raw(r) => r.read(buf),
            TagBlockReader::Compressed(r) => r.read(buf),
        }
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        match self {
            TagBlockReader::Raw(r) => r.read_exact(buf),
            TagBlockReader::Compressed(r) => r.read_exact(buf),
        }
    }
}

/// Sink for the dictionary and body
///
/// Compressed output is buffered until [`TagBlockWriter::finish`], which writes the block
/// length followed by the zlib block.
pub(crate) enum TagBlockWriter<W: Write> {
    Raw(W),
    Compressed(W, Box<ZlibEncoder<Vec<u8>>>),
}

impl<W: Write> TagBlockWriter<W> {
    #[instrument(skip(writer))]
    pub fn new(writer: W, compression: CompressionMethod) -> Self {
        match compression {
            CompressionMethod::None => TagBlockWriter::Raw(writer),
            CompressionMethod::Zlib(_) => TagBlockWriter::Compressed(
                writer,
                Box::new(ZlibEncoder::new(Vec::new(), compression.level())),
            ),
        }
    }

    /// The underlying stream, bypassing compression
    pub fn get_mut(&mut self) -> &mut W {
        match self {
            TagBlockWriter::Raw(w) => w,
            TagBlockWriter::Compressed(w, _) => w,
        }
    }

    #[instrument(skip(self), err)]
    pub fn finish(&mut self) -> io::Result<()> {
        match self {
            TagBlockWriter::Raw(w) => w.flush(),
            TagBlockWriter::Compressed(w, encoder) => {
                encoder.try_finish()?;
                let block = encoder.get_ref();
                let length = u32::try_from(block.len()).map_err(|_| {
                    io::Error::new(io::ErrorKind::InvalidInput, "compressed block exceeds 4 GiB")
                })?;

                w.write_u32::<BigEndian>(length)?;
                w.write_all(block)?;
                w.flush()
            }
        }
    }

    pub fn into_inner(self) -> W {
        match self {
            TagBlockWriter::Raw(w) => w,
            TagBlockWriter::Compressed(w, _) => w,
        }
    }
}

impl<W: Write> Write for TagBlockWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            TagBlockWriter::Raw(w) => w.write(buf),
            TagBlockWriter::Compressed(_, encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            TagBlockWriter::Raw(w) => w.flush(),
            TagBlockWriter::Compressed(_, encoder) => encoder.flush(),
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use std::io::{Read, Write};

    use crate::compression::{CompressionMethod, TagBlockReader, TagBlockWriter};

    #[test]
    fn flag_mapping() {
        assert_eq!(i8::from(CompressionMethod::None), -1);
        assert_eq!(i8::from(CompressionMethod::Zlib(9)), 9);
        assert_eq!(i8::from(CompressionMethod::Zlib(42)), 9);
        assert_eq!(CompressionMethod::from(-1i8), CompressionMethod::None);
        assert_eq!(CompressionMethod::from(-128i8), CompressionMethod::None);
        assert_eq!(CompressionMethod::from(0i8), CompressionMethod::Zlib(0));
    }

    #[test]
    fn raw_block_passes_through() -> std::io::Result<()> {
        let mut writer = TagBlockWriter::new(Vec::new(), CompressionMethod::None);
        writer.write_all(b"Hello World")?;
        writer.finish()?;
        assert_eq!(writer.into_inner(), b"Hello World");
        Ok(())
    }

    #[test]
    fn compressed_empty_block() -> std::io::Result<()> {
        #[rustfmt::skip]
        let expected = vec![
            0x00, 0x00, 0x00, 0x08,
            0x78, 0x9C, 0x03, 0x00, 0x00, 0x00, 0x00, 0x01,
        ];

        let mut writer = TagBlockWriter::new(Vec::new(), CompressionMethod::zlib());
        writer.finish()?;
        assert_eq!(writer.into_inner(), expected);
        Ok(())
    }

    #[test]
    fn compressed_block_is_bounded() -> std::io::Result<()> {
        let mut writer = TagBlockWriter::new(Vec::new(), CompressionMethod::zlib());
        writer.write_all(b"Hello World")?;
        writer.finish()?;

        let mut data = writer.into_inner();
        data.extend_from_slice(b"trailing");

        let mut reader = TagBlockReader::new(data.as_slice(), CompressionMethod::zlib())?;
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        assert_eq!(buffer, b"Hello World");

        let mut rest = Vec::new();
        reader.into_inner().read_to_end(&mut rest)?;
        assert_eq!(rest, b"trailing");
        Ok(())
    }
}
