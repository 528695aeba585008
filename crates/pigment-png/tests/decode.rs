//! End to end decoding tests over hand-built in-memory png files.
use std::collections::HashMap;
use std::io::Cursor;

use pigment_core::options::DecoderOptions;
use pigment_png::error::PngDecodeErrors;
use pigment_png::{ColorFormat, PngReader};

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Frame a payload as a chunk. The decoder never recomputes chunk
/// checksums so the crc field can stay zero.
fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8>
{
    let mut out = Vec::with_capacity(payload.len() + 12);

    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(payload);
    out.extend_from_slice(&[0; 4]);

    out
}

fn ihdr(width: u32, height: u32, depth: u8, color: u8, interlace: u8) -> Vec<u8>
{
    let mut payload = Vec::new();

    payload.extend_from_slice(&width.to_be_bytes());
    payload.extend_from_slice(&height.to_be_bytes());
    payload.extend_from_slice(&[depth, color, 0, 0, interlace]);

    chunk(b"IHDR", &payload)
}

fn adler32(data: &[u8]) -> u32
{
    let mut a: u32 = 1;
    let mut b: u32 = 0;

    for byte in data
    {
        a = (a + u32::from(*byte)) % 65521;
        b = (b + a) % 65521;
    }

    (b << 16) | a
}

/// A zlib stream carrying `data` in stored deflate blocks.
fn zlib_stored(data: &[u8]) -> Vec<u8>
{
    let mut out = vec![0x78, 0x01];

    let mut blocks = data.chunks(65535).peekable();

    while let Some(block) = blocks.next()
    {
        let last = blocks.peek().is_none();
        let len = block.len() as u16;

        out.push(u8::from(last));
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(&(!len).to_le_bytes());
        out.extend_from_slice(block);
    }

    out.extend_from_slice(&adler32(data).to_be_bytes());

    out
}

/// A complete png file: signature, 8-bit IHDR, one IDAT, IEND.
fn png_bytes(width: u32, height: u32, color: u8, scanlines: &[u8]) -> Vec<u8>
{
    let mut out = Vec::new();

    out.extend_from_slice(&SIGNATURE);
    out.extend_from_slice(&ihdr(width, height, 8, color, 0));
    out.extend_from_slice(&chunk(b"IDAT", &zlib_stored(scanlines)));
    out.extend_from_slice(&chunk(b"IEND", &[]));

    out
}

fn decode(bytes: Vec<u8>, format: ColorFormat)
    -> Result<HashMap<String, u32>, PngDecodeErrors>
{
    decode_with_options(bytes, format, DecoderOptions::default())
}

fn decode_with_options(
    bytes: Vec<u8>, format: ColorFormat, options: DecoderOptions
) -> Result<HashMap<String, u32>, PngDecodeErrors>
{
    let mut reader = PngReader::new_with_options(Cursor::new(bytes), options)?;

    reader.verify_signature()?;
    reader.read_header()?;

    let chunk = reader.locate_pixel_data()?;

    reader.color_histogram(chunk, format)
}

#[test]
fn one_red_pixel_hex()
{
    let image = png_bytes(1, 1, 2, &[0, 255, 0, 0]);

    let histogram = decode(image, ColorFormat::Hex).unwrap();

    assert_eq!(histogram, HashMap::from([("#ff0000".to_string(), 1)]));
}

#[test]
fn one_red_pixel_rgb()
{
    let image = png_bytes(1, 1, 2, &[0, 255, 0, 0]);

    let histogram = decode(image, ColorFormat::Rgb).unwrap();

    assert_eq!(histogram, HashMap::from([("255,0,0".to_string(), 1)]));
}

#[test]
fn none_filter_is_identity()
{
    let scanlines = [
        0, 1, 2, 3, 4, 5, 6, //
        0, 7, 8, 9, 10, 11, 12
    ];
    let image = png_bytes(2, 2, 2, &scanlines);

    let histogram = decode(image, ColorFormat::Rgb).unwrap();

    assert_eq!(histogram.len(), 4);
    for key in ["1,2,3", "4,5,6", "7,8,9", "10,11,12"]
    {
        assert_eq!(histogram[key], 1, "missing pixel {key}");
    }
}

#[test]
fn counts_sum_to_pixel_count()
{
    // one scanline per filter the decoder accepts
    let scanlines = [
        0, 1, 1, 1, 2, 2, 2, 3, 3, 3, //
        1, 5, 5, 5, 1, 1, 1, 2, 2, 2, //
        2, 0, 0, 0, 10, 10, 10, 7, 7, 7
    ];
    let image = png_bytes(3, 3, 2, &scanlines);

    let histogram = decode(image, ColorFormat::Hex).unwrap();

    assert_eq!(histogram.values().sum::<u32>(), 9);
}

#[test]
fn sub_filter_leftmost_pixel_is_raw()
{
    let image = png_bytes(2, 1, 2, &[1, 10, 20, 30, 5, 5, 5]);

    let histogram = decode(image, ColorFormat::Rgb).unwrap();

    assert_eq!(histogram["10,20,30"], 1);
    assert_eq!(histogram["15,25,35"], 1);
}

#[test]
fn up_filter_first_row_is_raw()
{
    let image = png_bytes(1, 1, 2, &[2, 9, 9, 9]);

    let histogram = decode(image, ColorFormat::Rgb).unwrap();

    assert_eq!(histogram["9,9,9"], 1);
}

#[test]
fn up_filter_adds_row_above()
{
    let scanlines = [
        0, 10, 20, 30, //
        2, 1, 2, 3
    ];
    let image = png_bytes(1, 2, 2, &scanlines);

    let histogram = decode(image, ColorFormat::Rgb).unwrap();

    assert_eq!(histogram["10,20,30"], 1);
    assert_eq!(histogram["11,22,33"], 1);
}

#[test]
fn average_filter_matches_hand_computed_fixture()
{
    // row 0, no row above:
    //   pixel 0: 10 + floor((10 + 10) / 2)                              = 20
    //   pixel 1: sub = 6 + 20 = 26, up = 6,  6 + floor((26 + 6) / 2)    = 22
    // row 1:
    //   pixel 0: sub = 10, up = 10 + 20 = 30,  10 + floor((10 + 30) / 2) = 30
    //   pixel 1: sub = 6 + 30 = 36, up = 6 + 22 = 28,  6 + floor((36 + 28) / 2) = 38
    let scanlines = [
        3, 10, 0, 0, 6, 0, 0, //
        3, 10, 0, 0, 6, 0, 0
    ];
    let image = png_bytes(2, 2, 2, &scanlines);

    let histogram = decode(image, ColorFormat::Rgb).unwrap();

    for key in ["20,0,0", "22,0,0", "30,0,0", "38,0,0"]
    {
        assert_eq!(histogram[key], 1, "missing pixel {key}");
    }
}

#[test]
fn channel_arithmetic_wraps_at_256()
{
    let image = png_bytes(2, 1, 2, &[1, 250, 250, 250, 10, 10, 10]);

    let histogram = decode(image, ColorFormat::Rgb).unwrap();

    // 250 + 10 wraps to 4, neither clamped to 255 nor widened to 260
    assert_eq!(histogram["250,250,250"], 1);
    assert_eq!(histogram["4,4,4"], 1);
}

#[test]
fn alpha_byte_is_not_part_of_the_key()
{
    // two RGBA pixels, same color, wildly different alpha
    let image = png_bytes(2, 1, 6, &[0, 255, 0, 0, 128, 255, 0, 0, 7]);

    let histogram = decode(image, ColorFormat::Hex).unwrap();

    assert_eq!(histogram, HashMap::from([("#ff0000".to_string(), 2)]));
}

#[test]
fn bad_signature_fails_before_any_parsing()
{
    let mut image = png_bytes(1, 1, 2, &[0, 255, 0, 0]);
    image[0] = 0x88;

    let mut reader = PngReader::new(Cursor::new(image)).unwrap();

    assert!(matches!(
        reader.verify_signature(),
        Err(PngDecodeErrors::BadSignature)
    ));
}

#[test]
fn grayscale_color_type_is_unsupported()
{
    let mut image = Vec::new();
    image.extend_from_slice(&SIGNATURE);
    image.extend_from_slice(&ihdr(1, 1, 8, 0, 0));

    let mut reader = PngReader::new(Cursor::new(image)).unwrap();
    reader.verify_signature().unwrap();

    assert!(matches!(
        reader.read_header(),
        Err(PngDecodeErrors::Unsupported(_))
    ));
}

#[test]
fn indexed_color_type_is_unsupported()
{
    let mut image = Vec::new();
    image.extend_from_slice(&SIGNATURE);
    image.extend_from_slice(&ihdr(1, 1, 8, 3, 0));

    let mut reader = PngReader::new(Cursor::new(image)).unwrap();
    reader.verify_signature().unwrap();

    assert!(matches!(
        reader.read_header(),
        Err(PngDecodeErrors::Unsupported(_))
    ));
}

#[test]
fn sixteen_bit_depth_is_unsupported()
{
    let mut image = Vec::new();
    image.extend_from_slice(&SIGNATURE);
    image.extend_from_slice(&ihdr(1, 1, 16, 2, 0));

    let mut reader = PngReader::new(Cursor::new(image)).unwrap();
    reader.verify_signature().unwrap();

    assert!(matches!(
        reader.read_header(),
        Err(PngDecodeErrors::Unsupported(_))
    ));
}

#[test]
fn interlaced_image_is_unsupported()
{
    let mut image = Vec::new();
    image.extend_from_slice(&SIGNATURE);
    image.extend_from_slice(&ihdr(1, 1, 8, 2, 1));

    let mut reader = PngReader::new(Cursor::new(image)).unwrap();
    reader.verify_signature().unwrap();

    assert!(matches!(
        reader.read_header(),
        Err(PngDecodeErrors::Unsupported(_))
    ));
}

#[test]
fn paeth_filter_fails_the_whole_decode()
{
    let scanlines = [
        0, 1, 2, 3, //
        4, 0, 0, 0
    ];
    let image = png_bytes(1, 2, 2, &scanlines);

    assert!(matches!(
        decode(image, ColorFormat::Hex),
        Err(PngDecodeErrors::Unsupported(_))
    ));
}

#[test]
fn paeth_filter_on_first_row_also_fails()
{
    let image = png_bytes(1, 1, 2, &[4, 1, 2, 3]);

    assert!(matches!(
        decode(image, ColorFormat::Hex),
        Err(PngDecodeErrors::Unsupported(_))
    ));
}

#[test]
fn unknown_filter_byte_is_a_format_error()
{
    let image = png_bytes(1, 1, 2, &[9, 1, 2, 3]);

    assert!(matches!(
        decode(image, ColorFormat::Hex),
        Err(PngDecodeErrors::Generic(_))
    ));
}

#[test]
fn iend_before_idat_is_a_format_error()
{
    let mut image = Vec::new();
    image.extend_from_slice(&SIGNATURE);
    image.extend_from_slice(&ihdr(1, 1, 8, 2, 0));
    image.extend_from_slice(&chunk(b"IEND", &[]));

    let mut reader = PngReader::new(Cursor::new(image)).unwrap();
    reader.verify_signature().unwrap();
    reader.read_header().unwrap();

    assert!(matches!(
        reader.locate_pixel_data(),
        Err(PngDecodeErrors::GenericStatic(_))
    ));
}

#[test]
fn truncated_chunk_walk_stops_at_end_of_file()
{
    let mut image = Vec::new();
    image.extend_from_slice(&SIGNATURE);
    image.extend_from_slice(&ihdr(1, 1, 8, 2, 0));
    // a chunk claiming far more payload than the file holds
    image.extend_from_slice(&(1_000_000_u32).to_be_bytes());
    image.extend_from_slice(b"tEXt");

    let mut reader = PngReader::new(Cursor::new(image)).unwrap();
    reader.verify_signature().unwrap();
    reader.read_header().unwrap();

    assert!(matches!(
        reader.locate_pixel_data(),
        Err(PngDecodeErrors::GenericStatic(_))
    ));
}

#[test]
fn ancillary_chunks_are_skipped()
{
    let mut image = Vec::new();
    image.extend_from_slice(&SIGNATURE);
    image.extend_from_slice(&ihdr(1, 1, 8, 2, 0));
    image.extend_from_slice(&chunk(b"tEXt", b"Comment\0made by hand"));
    image.extend_from_slice(&chunk(b"pHYs", &[0; 9]));
    image.extend_from_slice(&chunk(b"IDAT", &zlib_stored(&[0, 255, 0, 0])));
    image.extend_from_slice(&chunk(b"IEND", &[]));

    let histogram = {
        let mut reader = PngReader::new(Cursor::new(image)).unwrap();
        reader.verify_signature().unwrap();
        reader.read_header().unwrap();
        let chunk = reader.locate_pixel_data().unwrap();
        reader.color_histogram(chunk, ColorFormat::Hex).unwrap()
    };

    assert_eq!(histogram["#ff0000"], 1);
}

#[test]
fn unknown_critical_chunk_errors_in_strict_mode_only()
{
    let build = || {
        let mut image = Vec::new();
        image.extend_from_slice(&SIGNATURE);
        image.extend_from_slice(&ihdr(1, 1, 8, 2, 0));
        image.extend_from_slice(&chunk(b"ABCD", &[1, 2, 3]));
        image.extend_from_slice(&chunk(b"IDAT", &zlib_stored(&[0, 255, 0, 0])));
        image.extend_from_slice(&chunk(b"IEND", &[]));
        image
    };

    // default options are strict
    assert!(matches!(
        decode(build(), ColorFormat::Hex),
        Err(PngDecodeErrors::Generic(_))
    ));

    let histogram =
        decode_with_options(build(), ColorFormat::Hex, DecoderOptions::new_cmd()).unwrap();
    assert_eq!(histogram["#ff0000"], 1);
}

#[test]
fn only_the_first_pixel_data_chunk_is_used()
{
    let mut image = Vec::new();
    image.extend_from_slice(&SIGNATURE);
    image.extend_from_slice(&ihdr(1, 1, 8, 2, 0));
    image.extend_from_slice(&chunk(b"IDAT", &zlib_stored(&[0, 255, 0, 0])));
    image.extend_from_slice(&chunk(b"IDAT", &[0xde, 0xad, 0xbe, 0xef]));
    image.extend_from_slice(&chunk(b"IEND", &[]));

    let mut reader = PngReader::new(Cursor::new(image)).unwrap();
    reader.verify_signature().unwrap();
    reader.read_header().unwrap();

    let chunk = reader.locate_pixel_data().unwrap();
    let histogram = reader.color_histogram(chunk, ColorFormat::Hex).unwrap();

    assert_eq!(histogram, HashMap::from([("#ff0000".to_string(), 1)]));
}

#[test]
fn short_pixel_stream_is_a_format_error()
{
    // header says 2x2 but the stream holds one scanline
    let image = png_bytes(2, 2, 2, &[0, 1, 2, 3, 4, 5, 6]);

    assert!(matches!(
        decode(image, ColorFormat::Hex),
        Err(PngDecodeErrors::Generic(_))
    ));
}

#[test]
fn oversized_dimensions_are_rejected()
{
    let scanlines = vec![0_u8; 3 * 32 + 1];
    let image = png_bytes(32, 1, 2, &scanlines);

    let options = DecoderOptions::default().set_max_width(16);

    assert!(matches!(
        decode_with_options(image, ColorFormat::Hex, options),
        Err(PngDecodeErrors::Generic(_))
    ));
}

#[test]
fn zero_dimensions_are_rejected()
{
    let mut image = Vec::new();
    image.extend_from_slice(&SIGNATURE);
    image.extend_from_slice(&ihdr(0, 1, 8, 2, 0));

    let mut reader = PngReader::new(Cursor::new(image)).unwrap();
    reader.verify_signature().unwrap();

    assert!(matches!(
        reader.read_header(),
        Err(PngDecodeErrors::GenericStatic(_))
    ));
}

#[test]
fn header_cannot_be_read_twice()
{
    let image = png_bytes(1, 1, 2, &[0, 255, 0, 0]);

    let mut reader = PngReader::new(Cursor::new(image)).unwrap();
    reader.verify_signature().unwrap();
    reader.read_header().unwrap();

    assert!(matches!(
        reader.read_header(),
        Err(PngDecodeErrors::GenericStatic(_))
    ));
}

#[test]
fn broken_zlib_stream_is_a_decompression_error()
{
    let mut image = Vec::new();
    image.extend_from_slice(&SIGNATURE);
    image.extend_from_slice(&ihdr(1, 1, 8, 2, 0));
    image.extend_from_slice(&chunk(b"IDAT", &[0xff, 0xff, 0x00, 0x01]));
    image.extend_from_slice(&chunk(b"IEND", &[]));

    assert!(matches!(
        decode(image, ColorFormat::Hex),
        Err(PngDecodeErrors::ZlibDecodeErrors(_))
    ));
}

#[test]
fn dimension_accessors_gated_on_header()
{
    let image = png_bytes(3, 2, 2, &[0; 20]);

    let mut reader = PngReader::new(Cursor::new(image)).unwrap();

    assert_eq!(reader.get_dimensions(), None);

    reader.verify_signature().unwrap();
    reader.read_header().unwrap();

    assert_eq!(reader.get_dimensions(), Some((3, 2)));
}
