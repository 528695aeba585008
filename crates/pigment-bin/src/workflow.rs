use std::path::PathBuf;

use clap::ArgMatches;
use log::info;
use pigment_core::options::DecoderOptions;
use pigment_png::error::PngDecodeErrors;
use pigment_png::PngReader;

use crate::cmd_args::KeyFormat;

pub(crate) fn run(args: &ArgMatches) -> Result<(), PngDecodeErrors>
{
    let options = decoder_options(args);

    let path = args.get_one::<PathBuf>("in").unwrap();
    let format = args.get_one::<KeyFormat>("format").unwrap().to_color_format();

    info!("Reading {path:?}");

    let mut reader = PngReader::open_with_options(path, options)?;

    reader.verify_signature()?;

    let png_info = reader.read_header()?;

    info!("Image is {}x{}, {:?}", png_info.width, png_info.height, png_info.color);

    let chunk = reader.locate_pixel_data()?;

    let histogram = reader.color_histogram(chunk, format)?;

    let mut entries: Vec<(String, u32)> = histogram.into_iter().collect();

    // most frequent first, ties ordered by key so output is stable
    entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    if let Some(cap) = args.get_one::<usize>("colors")
    {
        entries.truncate(*cap);
    }

    for (color, count) in &entries
    {
        println!("{color} ({count})");
    }

    Ok(())
}

fn decoder_options(args: &ArgMatches) -> DecoderOptions
{
    let mut options = DecoderOptions::new_cmd();

    if let Some(width) = args.get_one::<usize>("max-width")
    {
        options = options.set_max_width(*width);
    }
    if let Some(height) = args.get_one::<usize>("max-height")
    {
        options = options.set_max_height(*height);
    }
    if args.get_flag("strict")
    {
        options = options.set_strict_mode(true);
    }

    options
}
