use std::io::{Read, Seek};

use log::info;

use crate::decoder::{PngInfo, PngReader};
use crate::enums::PngColor;
use crate::error::PngDecodeErrors;

impl<T: Read + Seek> PngReader<T>
{
    /// Parse and validate the IHDR chunk sitting directly after the
    /// signature.
    ///
    /// Chunk layout, starting at offset 8:
    /// length(4) tag(4) width(4) height(4) depth(1) color(1)
    /// compression(1) filter(1) interlace(1) crc(4)
    pub fn read_header(&mut self) -> Result<PngInfo, PngDecodeErrors>
    {
        if self.seen_hdr
        {
            return Err(PngDecodeErrors::GenericStatic("Multiple IHDR, corrupt PNG"));
        }

        let chunk_length = self.source.get_u32_be_at(8)?;

        if chunk_length != 13
        {
            return Err(PngDecodeErrors::GenericStatic("BAD IHDR length"));
        }

        let chunk_tag = self.source.get_tag_at(12)?;

        if &chunk_tag != b"IHDR"
        {
            return Err(PngDecodeErrors::GenericStatic(
                "First chunk not IHDR, Corrupt PNG"
            ));
        }

        self.png_info.width = self.source.get_u32_be_at(16)? as usize;
        self.png_info.height = self.source.get_u32_be_at(20)? as usize;

        if self.png_info.width == 0 || self.png_info.height == 0
        {
            return Err(PngDecodeErrors::GenericStatic("Width or height cannot be zero"));
        }

        if self.png_info.width > self.options.get_max_width()
        {
            return Err(PngDecodeErrors::Generic(format!(
                "Image width {}, larger than maximum configured width {}, aborting",
                self.png_info.width,
                self.options.get_max_width()
            )));
        }

        if self.png_info.height > self.options.get_max_height()
        {
            return Err(PngDecodeErrors::Generic(format!(
                "Image height {}, larger than maximum configured height {}, aborting",
                self.png_info.height,
                self.options.get_max_height()
            )));
        }

        self.png_info.depth = self.source.get_u8_at(24)?;

        // a 16 bit image would need two bytes per sample, reject it
        // rather than read half a sample per channel
        if self.png_info.depth != 8
        {
            return Err(PngDecodeErrors::Unsupported(format!(
                "Bit depth {}, only 8 bit samples are supported",
                self.png_info.depth
            )));
        }

        let color = self.source.get_u8_at(25)?;

        if let Some(img_color) = PngColor::from_int(color)
        {
            self.png_info.color = img_color;
        }
        else
        {
            return Err(PngDecodeErrors::Unsupported(format!(
                "Color type {color}, only truecolor(2) and truecolor with alpha(6) are supported"
            )));
        }

        let compression = self.source.get_u8_at(26)?;

        if compression != 0
        {
            return Err(PngDecodeErrors::Unsupported(format!(
                "Compression method {compression}, only deflate(0) is defined"
            )));
        }
        // method 0 means the pixel data chunk holds a zlib stream
        self.png_info.compressed = compression == 0;

        let filter = self.source.get_u8_at(27)?;

        if filter != 0
        {
            return Err(PngDecodeErrors::Unsupported(format!(
                "Filter method {filter}, only adaptive filtering(0) is defined"
            )));
        }

        let interlace = self.source.get_u8_at(28)?;

        if interlace != 0
        {
            return Err(PngDecodeErrors::Unsupported(format!(
                "Interlace method {interlace}, interlaced images are not supported"
            )));
        }

        // CRC sits at 29..33, read positionally but never recomputed
        let _crc = self.source.get_u32_be_at(29)?;

        info!("Width: {}", self.png_info.width);
        info!("Height: {}", self.png_info.height);
        info!("Depth: {:?}", self.png_info.depth);
        info!("Color: {:?}", self.png_info.color);

        self.seen_hdr = true;

        Ok(self.png_info)
    }
}
