//! A simple implementation of a positioned byte source.
//!
//! [`ByteSource`] wraps an opened, seekable stream of bytes and serves
//! exact-range reads at explicit offsets, optionally interpreting the
//! bytes read as a big-endian integer or a chunk tag.
//!
//! The wrapped stream is owned by the source, so whatever resource
//! backs it (usually an open file) is released exactly once, when the
//! source is dropped, on success and failure paths alike.
use std::io::{Error, ErrorKind, Read, Seek, SeekFrom};

/// An encapsulation of a seekable byte stream.
///
/// The total stream length is captured once at construction, which lets
/// every read be bounds-checked before the underlying stream is touched.
pub struct ByteSource<T: Read + Seek>
{
    stream: T,
    length: u64
}

impl<T: Read + Seek> ByteSource<T>
{
    /// Wrap a seekable stream, measuring its length.
    ///
    /// The stream cursor is left at the start.
    pub fn new(mut stream: T) -> Result<ByteSource<T>, Error>
    {
        let length = stream.seek(SeekFrom::End(0))?;

        stream.seek(SeekFrom::Start(0))?;

        Ok(ByteSource { stream, length })
    }

    /// Total length of the underlying stream in bytes.
    pub const fn len(&self) -> u64
    {
        self.length
    }

    pub const fn is_empty(&self) -> bool
    {
        self.length == 0
    }

    /// Fill `buf` with the bytes at `offset`.
    ///
    /// A range that does not lie fully inside the stream fails with
    /// [`ErrorKind::UnexpectedEof`] without reading anything.
    pub fn read_exact_at(&mut self, buf: &mut [u8], offset: u64) -> Result<(), Error>
    {
        let wanted = buf.len() as u64;

        if offset.checked_add(wanted).map_or(true, |end| end > self.length)
        {
            return Err(Error::new(
                ErrorKind::UnexpectedEof,
                format!(
                    "Not enough bytes, requested {wanted} bytes at offset {offset} but the source has {} bytes",
                    self.length
                )
            ));
        }

        self.stream.seek(SeekFrom::Start(offset))?;
        self.stream.read_exact(buf)
    }

    /// Read exactly `length` bytes starting at `offset`.
    pub fn read_at(&mut self, length: usize, offset: u64) -> Result<Vec<u8>, Error>
    {
        let mut buf = vec![0_u8; length];

        self.read_exact_at(&mut buf, offset)?;

        Ok(buf)
    }

    /// Read the byte at `offset`.
    pub fn get_u8_at(&mut self, offset: u64) -> Result<u8, Error>
    {
        let mut buf = [0_u8; 1];

        self.read_exact_at(&mut buf, offset)?;

        Ok(buf[0])
    }

    /// Read four bytes at `offset` as a big-endian integer.
    pub fn get_u32_be_at(&mut self, offset: u64) -> Result<u32, Error>
    {
        let mut buf = [0_u8; 4];

        self.read_exact_at(&mut buf, offset)?;

        Ok(u32::from_be_bytes(buf))
    }

    /// Read a four-byte chunk tag at `offset`.
    pub fn get_tag_at(&mut self, offset: u64) -> Result<[u8; 4], Error>
    {
        let mut buf = [0_u8; 4];

        self.read_exact_at(&mut buf, offset)?;

        Ok(buf)
    }
}
