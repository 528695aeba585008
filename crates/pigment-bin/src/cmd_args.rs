use std::path::PathBuf;

use clap::builder::PossibleValue;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command, ValueEnum};
use log::LevelFilter;
use pigment_png::ColorFormat;
use simple_logger::SimpleLogger;

/// Command line face of [`ColorFormat`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum KeyFormat
{
    Hex,
    Rgb
}

impl KeyFormat
{
    pub fn to_color_format(self) -> ColorFormat
    {
        match self
        {
            Self::Hex => ColorFormat::Hex,
            Self::Rgb => ColorFormat::Rgb
        }
    }
}

impl ValueEnum for KeyFormat
{
    fn value_variants<'a>() -> &'a [Self]
    {
        &[Self::Hex, Self::Rgb]
    }

    fn to_possible_value(&self) -> Option<PossibleValue>
    {
        Some(match self
        {
            Self::Hex => PossibleValue::new("hex"),
            Self::Rgb => PossibleValue::new("rgb")
        })
    }
}

#[rustfmt::skip]
pub(crate) fn create_cmd_args() -> Command {
    Command::new("pigment")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Count how often each color occurs in a png image")
        .arg(Arg::new("in")
            .short('i')
            .long("input")
            .help("Input image to read data from")
            .value_parser(value_parser!(PathBuf))
            .required(true))
        .arg(Arg::new("format")
            .short('f')
            .long("format")
            .help("How colors are printed, as #rrggbb hex or r,g,b decimal")
            .value_parser(value_parser!(KeyFormat))
            .default_value("hex"))
        .arg(Arg::new("colors")
            .short('n')
            .long("colors")
            .help("Print only the N most frequent colors")
            .value_parser(value_parser!(usize)))
        .args(add_logging_options())
        .args(add_settings())
}

fn add_logging_options() -> [Arg; 4]
{
    [
        Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help_heading("Logging")
            .help("Display debug information and higher"),
        Arg::new("trace")
            .long("trace")
            .action(ArgAction::SetTrue)
            .help_heading("Logging")
            .help("Display very verbose information"),
        Arg::new("warn")
            .long("warn")
            .action(ArgAction::SetTrue)
            .help_heading("Logging")
            .help("Display warnings and errors"),
        Arg::new("info")
            .long("info")
            .action(ArgAction::SetTrue)
            .help_heading("Logging")
            .help("Display information about the decoding options")
    ]
}

fn add_settings() -> [Arg; 3]
{
    [
        Arg::new("max-width")
            .long("max-width")
            .help_heading("Image Settings")
            .help("Maximum width of images allowed")
            .default_value("16384")
            .value_parser(value_parser!(usize)),
        Arg::new("max-height")
            .long("max-height")
            .help_heading("Image Settings")
            .help("Maximum height of images allowed")
            .default_value("16384")
            .value_parser(value_parser!(usize)),
        Arg::new("strict")
            .long("strict")
            .help_heading("Image Settings")
            .help("Treat most warnings as errors")
            .action(ArgAction::SetTrue)
    ]
}

pub(crate) fn setup_logger(options: &ArgMatches)
{
    let mut level = LevelFilter::Warn;

    if options.get_flag("warn")
    {
        level = LevelFilter::Warn;
    }
    if options.get_flag("info")
    {
        level = LevelFilter::Info;
    }
    if options.get_flag("debug")
    {
        level = LevelFilter::Debug;
    }
    if options.get_flag("trace")
    {
        level = LevelFilter::Trace;
    }

    let _ = SimpleLogger::new().with_level(level).init();
}
