//! A decoder for truecolor png images that reduces an image to a
//! histogram of its pixel colors.
//!
//! The decoding pipeline is exposed as separately callable steps so a
//! caller can interleave its own logic between them:
//!
//! ```no_run
//! use pigment_png::{ColorFormat, PngReader};
//!
//! # fn main() -> Result<(), pigment_png::error::PngDecodeErrors> {
//! let mut reader = PngReader::open("image.png")?;
//!
//! reader.verify_signature()?;
//! reader.read_header()?;
//!
//! let chunk = reader.locate_pixel_data()?;
//! let histogram = reader.color_histogram(chunk, ColorFormat::Hex)?;
//!
//! for (color, count) in &histogram {
//!     println!("{color} ({count})");
//! }
//! # Ok(())
//! # }
//! ```
pub use decoder::{PngChunk, PngInfo, PngReader};
pub use enums::PngColor;
pub use histogram::ColorFormat;

mod constants;
mod decoder;
mod enums;
pub mod error;
mod filters;
mod headers;
mod histogram;
