use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use log::{trace, warn};
use pigment_core::bytesource::ByteSource;
use pigment_core::options::DecoderOptions;
use zune_inflate::{DeflateDecoder, DeflateOptions};

use crate::constants::{FIRST_CHUNK_OFFSET, PNG_SIGNATURE};
use crate::enums::{FilterType, PngChunkType, PngColor};
use crate::error::PngDecodeErrors;
use crate::filters::{handle_avg, handle_avg_first, handle_sub, handle_up};
use crate::histogram::ColorFormat;

/// Location of the pixel-data chunk inside the image.
///
/// `offset` points at the chunk's length field; the payload itself
/// starts 8 bytes further in, after the length and type fields.
#[derive(Copy, Clone, Debug)]
pub struct PngChunk
{
    pub offset: u64,
    pub length: usize
}

/// Validated header fields, immutable once parsed.
#[derive(Default, Debug, Copy, Clone)]
pub struct PngInfo
{
    pub width:      usize,
    pub height:     usize,
    pub depth:      u8,
    pub color:      PngColor,
    /// Whether the pixel data chunk holds a zlib stream. Method 0, the
    /// only method the format defines, always does.
    pub compressed: bool
}

/// An incremental png reader.
///
/// Exposes the decoding pipeline as separately callable steps:
/// [`verify_signature`](Self::verify_signature),
/// [`read_header`](Self::read_header),
/// [`locate_pixel_data`](Self::locate_pixel_data) and
/// [`color_histogram`](Self::color_histogram), in that order.
///
/// The underlying source is owned by the reader and released when the
/// reader drops, whichever way the pipeline ended.
pub struct PngReader<T: Read + Seek>
{
    pub(crate) source:   ByteSource<T>,
    pub(crate) options:  DecoderOptions,
    pub(crate) png_info: PngInfo,
    pub(crate) seen_hdr: bool
}

impl PngReader<File>
{
    /// Open an image file for decoding with default options.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<PngReader<File>, PngDecodeErrors>
    {
        PngReader::open_with_options(path, DecoderOptions::default())
    }

    /// Open an image file for decoding.
    pub fn open_with_options<P: AsRef<Path>>(
        path: P, options: DecoderOptions
    ) -> Result<PngReader<File>, PngDecodeErrors>
    {
        let fd = File::open(path)?;

        PngReader::new_with_options(fd, options)
    }
}

impl<T: Read + Seek> PngReader<T>
{
    pub fn new(source: T) -> Result<PngReader<T>, PngDecodeErrors>
    {
        PngReader::new_with_options(source, DecoderOptions::default())
    }

    pub fn new_with_options(source: T, options: DecoderOptions)
        -> Result<PngReader<T>, PngDecodeErrors>
    {
        Ok(PngReader {
            source: ByteSource::new(source)?,
            options,
            png_info: PngInfo::default(),
            seen_hdr: false
        })
    }

    /// Image width and height, present once the header was parsed.
    pub const fn get_dimensions(&self) -> Option<(usize, usize)>
    {
        if !self.seen_hdr
        {
            return None;
        }

        Some((self.png_info.width, self.png_info.height))
    }

    /// Color layout of the image, present once the header was parsed.
    pub const fn get_color(&self) -> Option<PngColor>
    {
        if !self.seen_hdr
        {
            return None;
        }

        Some(self.png_info.color)
    }

    /// Confirm the file starts with the png magic sequence.
    ///
    /// Nothing else is parsed before this gate passes.
    pub fn verify_signature(&mut self) -> Result<(), PngDecodeErrors>
    {
        let mut signature = [0_u8; 8];

        self.source.read_exact_at(&mut signature, 0)?;

        if signature != PNG_SIGNATURE
        {
            return Err(PngDecodeErrors::BadSignature);
        }

        Ok(())
    }

    /// Walk the chunk sequence after IHDR until the first pixel-data
    /// chunk and return where it lives.
    ///
    /// Chunks the decoder has no use for are skipped over using their
    /// declared length. The walk is bounded by the source length, a
    /// truncated or malformed file fails instead of scanning forever,
    /// and a terminator chunk before any pixel data is an error.
    pub fn locate_pixel_data(&mut self) -> Result<PngChunk, PngDecodeErrors>
    {
        if !self.seen_hdr
        {
            return Err(PngDecodeErrors::GenericStatic(
                "Header not parsed, cannot scan for pixel data"
            ));
        }

        let mut offset = FIRST_CHUNK_OFFSET;

        loop
        {
            // the chunk's length and type fields must lie inside the file
            if offset + 8 > self.source.len()
            {
                return Err(PngDecodeErrors::GenericStatic(
                    "Reached end of image without a pixel data chunk"
                ));
            }

            let chunk_length = self.source.get_u32_be_at(offset)? as usize;
            let chunk_tag = self.source.get_tag_at(offset + 4)?;

            match PngChunkType::from_tag(chunk_tag)
            {
                PngChunkType::IDAT =>
                {
                    trace!("IDAT chunk at offset {offset}, length {chunk_length}");

                    return Ok(PngChunk {
                        offset,
                        length: chunk_length
                    });
                }
                PngChunkType::IEND =>
                {
                    return Err(PngDecodeErrors::GenericStatic(
                        "IEND reached before any pixel data chunk"
                    ));
                }
                PngChunkType::IHDR =>
                {
                    return Err(PngDecodeErrors::GenericStatic("Multiple IHDR, corrupt PNG"));
                }
                PngChunkType::PLTE =>
                {
                    // a suggested palette for truecolor images, nothing
                    // to pick out of it here
                    trace!("Skipping PLTE chunk, length {chunk_length}");
                }
                PngChunkType::unkn => self.handle_unknown_chunk(chunk_tag, chunk_length)?
            }

            // length(4) + type(4) + payload + crc(4)
            offset += 8 + chunk_length as u64 + 4;
        }
    }

    fn handle_unknown_chunk(&self, tag: [u8; 4], length: usize) -> Result<(), PngDecodeErrors>
    {
        let chunk_name = core::str::from_utf8(&tag).unwrap_or("XXXX");

        // bit 5 of the first tag byte is the ancillary bit, critical
        // chunks have it clear
        if tag[0] & (1 << 5) == 0
        {
            if self.options.get_error_on_critical_chunks()
            {
                return Err(PngDecodeErrors::Generic(format!(
                    "Marker {chunk_name} unknown but deemed necessary"
                )));
            }

            warn!("Ignoring unknown critical chunk {chunk_name:?}");
        }

        trace!("Skipping unknown chunk {chunk_name:?}, length {length}");

        Ok(())
    }

    /// Decompress the pixel-data chunk, reverse per-scanline filtering
    /// and count how often each color occurs.
    ///
    /// `format` selects how colors are rendered as histogram keys. For
    /// images with an alpha channel the alpha byte is reconstructed but
    /// never becomes part of a key, so fully distinct RGBA pixels that
    /// share a color collapse into one entry. Counts over the whole
    /// histogram sum to exactly `width * height`.
    pub fn color_histogram(
        &mut self, chunk: PngChunk, format: ColorFormat
    ) -> Result<HashMap<String, u32>, PngDecodeErrors>
    {
        if !self.seen_hdr
        {
            return Err(PngDecodeErrors::GenericStatic(
                "Header not parsed, cannot reconstruct pixel data"
            ));
        }

        let info = self.png_info;

        let payload = self.source.read_at(chunk.length, chunk.offset + 8)?;

        let components = info.color.num_components();
        // every scanline carries a leading filter-type byte
        let stride = info.width * components + 1;
        let image_len = stride * info.height;

        let data = if info.compressed
        {
            self.inflate(&payload, image_len)?
        }
        else
        {
            payload
        };

        if data.len() < image_len
        {
            return Err(PngDecodeErrors::Generic(format!(
                "Not enough pixels, expected {image_len} bytes but found {}",
                data.len()
            )));
        }

        let out = self.reconstruct(&data, components, stride)?;

        let mut histogram: HashMap<String, u32> = HashMap::new();

        for scanline in out.chunks_exact(stride - 1)
        {
            for pixel in scanline.chunks_exact(components)
            {
                let key = format.key(pixel[0], pixel[1], pixel[2]);

                *histogram.entry(key).or_insert(0) += 1;
            }
        }

        Ok(histogram)
    }

    /// Undo per-scanline filtering.
    ///
    /// Rows are reconstructed top to bottom and bytes left to right;
    /// every filter reads only positions that were already written,
    /// which splitting the output into reconstructed and pending halves
    /// enforces at the type level.
    fn reconstruct(
        &self, data: &[u8], components: usize, stride: usize
    ) -> Result<Vec<u8>, PngDecodeErrors>
    {
        let height = self.png_info.height;
        let width_stride = stride - 1;

        let mut out = vec![0_u8; height * width_stride];

        let mut prev_row_start = 0;
        let mut out_position = 0;
        let mut first_row = true;

        for in_stride in data.chunks_exact(stride).take(height)
        {
            // split output into rows already done and the row we are
            // writing, the previous row is the tail of the done half
            let (prev, current) = out.split_at_mut(out_position);

            let mut prev_row: &[u8] = &[];

            if !first_row
            {
                prev_row = &prev[prev_row_start..prev_row_start + width_stride];
                prev_row_start += width_stride;
            }

            out_position += width_stride;

            let current = &mut current[..width_stride];

            let filter_byte = in_stride[0];
            let raw = &in_stride[1..];

            let mut filter = FilterType::from_int(filter_byte)
                .ok_or_else(|| PngDecodeErrors::Generic(format!("Unknown filter {filter_byte}")))?;

            if filter == FilterType::Paeth
            {
                return Err(PngDecodeErrors::Unsupported(
                    "Paeth filtered scanline, the Paeth predictor is not implemented".to_string()
                ));
            }

            if first_row
            {
                // the row above the first scanline is all zeroes, Up
                // degenerates to a copy and Average to its first-row form
                if filter == FilterType::Up
                {
                    filter = FilterType::None;
                }
                if filter == FilterType::Average
                {
                    filter = FilterType::AvgFirst;
                }

                first_row = false;
            }

            match filter
            {
                FilterType::None => current.copy_from_slice(raw),

                FilterType::Sub => handle_sub(raw, current, components),

                FilterType::Up => handle_up(prev_row, raw, current),

                FilterType::Average => handle_avg(prev_row, raw, current, components),

                FilterType::AvgFirst => handle_avg_first(raw, current, components),

                FilterType::Paeth | FilterType::Unknown => unreachable!()
            }
        }

        Ok(out)
    }

    /// Undo zlib encoding on the pixel-data payload.
    fn inflate(&self, payload: &[u8], size_hint: usize) -> Result<Vec<u8>, PngDecodeErrors>
    {
        let options = DeflateOptions::default()
            .set_size_hint(size_hint)
            .set_confirm_checksum(self.options.inflate_get_confirm_adler());

        let mut decoder = DeflateDecoder::new_with_options(payload, options);

        decoder.decode_zlib().map_err(PngDecodeErrors::ZlibDecodeErrors)
    }
}
