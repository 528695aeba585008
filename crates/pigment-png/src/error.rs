use std::fmt::{Debug, Formatter};

pub enum PngDecodeErrors
{
    /// The first eight bytes are not the png magic sequence
    BadSignature,
    /// Malformed container structure
    GenericStatic(&'static str),
    /// Malformed container structure, formatted message
    Generic(String),
    /// The image uses a feature this decoder deliberately does not
    /// implement, e.g. the Paeth filter or a palette color type
    Unsupported(String),
    /// The underlying source could not be read
    IoErrors(std::io::Error),
    /// The pixel data chunk holds a broken zlib stream
    ZlibDecodeErrors(zune_inflate::errors::InflateDecodeErrors)
}

impl Debug for PngDecodeErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            Self::BadSignature => writeln!(f, "Bad PNG signature, not a png"),
            Self::GenericStatic(val) => writeln!(f, "{val:?}"),
            Self::Generic(val) => writeln!(f, "{val:?}"),
            Self::Unsupported(val) => writeln!(f, "Unsupported image: {val}"),
            Self::IoErrors(err) => writeln!(f, "I/O error: {err}"),
            Self::ZlibDecodeErrors(err) =>
            {
                writeln!(f, "Error decoding pixel data chunk {err:?}")
            }
        }
    }
}

impl From<&'static str> for PngDecodeErrors
{
    fn from(val: &'static str) -> Self
    {
        Self::GenericStatic(val)
    }
}

impl From<String> for PngDecodeErrors
{
    fn from(val: String) -> Self
    {
        Self::Generic(val)
    }
}

impl From<std::io::Error> for PngDecodeErrors
{
    fn from(val: std::io::Error) -> Self
    {
        Self::IoErrors(val)
    }
}

impl From<zune_inflate::errors::InflateDecodeErrors> for PngDecodeErrors
{
    fn from(val: zune_inflate::errors::InflateDecodeErrors) -> Self
    {
        Self::ZlibDecodeErrors(val)
    }
}
