#![allow(clippy::upper_case_acronyms, non_camel_case_types)]

/// Chunk types the scanner dispatches on, see
/// https://www.w3.org/TR/2003/REC-PNG-20031110/
///
/// Every other chunk, ancillary or not, lands on `unkn` and is skipped
/// over using its declared length.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PngChunkType
{
    IHDR,
    PLTE,
    IDAT,
    IEND,
    unkn
}

impl PngChunkType
{
    pub fn from_tag(tag: [u8; 4]) -> PngChunkType
    {
        match &tag
        {
            b"IHDR" => Self::IHDR,
            b"PLTE" => Self::PLTE,
            b"IDAT" => Self::IDAT,
            b"IEND" => Self::IEND,
            _ => Self::unkn
        }
    }
}

/// Per-scanline filter applied before compression, reversed
/// during reconstruction.
///
/// `Paeth` is a known variant so that meeting it fails with a
/// deliberate error instead of looking like a corrupt file.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FilterType
{
    None,
    Sub,
    Up,
    Average,
    Paeth,
    // First scanline, special, the row above is all zeroes
    AvgFirst,
    // Unknown type of filter
    Unknown
}

impl FilterType
{
    pub fn from_int(int: u8) -> Option<FilterType>
    {
        match int
        {
            0 => Some(FilterType::None),
            1 => Some(FilterType::Sub),
            2 => Some(FilterType::Up),
            3 => Some(FilterType::Average),
            4 => Some(FilterType::Paeth),
            _ => None
        }
    }
}

impl Default for FilterType
{
    fn default() -> Self
    {
        FilterType::Unknown
    }
}

/// Color layout of the pixel data.
///
/// Only the two truecolor layouts are representable, every other color
/// type byte is rejected at header parse time.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PngColor
{
    RGB,
    RGBA,
    Unknown
}

impl Default for PngColor
{
    fn default() -> Self
    {
        Self::Unknown
    }
}

impl PngColor
{
    pub fn num_components(self) -> usize
    {
        match self
        {
            PngColor::RGB => 3,
            PngColor::RGBA => 4,
            PngColor::Unknown => unreachable!()
        }
    }

    pub(crate) fn from_int(int: u8) -> Option<PngColor>
    {
        match int
        {
            2 => Some(Self::RGB),
            6 => Some(Self::RGBA),
            _ => None
        }
    }
}
