//! Decoder configuration.
use bitflags::bitflags;

fn decoder_strict_mode() -> DecoderFlags
{
    let mut flags = DecoderFlags::empty();

    flags.set(DecoderFlags::INFLATE_CONFIRM_ADLER, true);
    flags.set(DecoderFlags::ERROR_ON_CRITICAL_CHUNKS, true);

    flags
}

/// Command line options, error resilient
///
/// Features
/// - Do not confirm adler checksums during inflate
/// - Skip unknown critical chunks instead of erroring out
fn cmd_options() -> DecoderFlags
{
    let mut flags = DecoderFlags::empty();

    flags.set(DecoderFlags::INFLATE_CONFIRM_ADLER, false);
    flags.set(DecoderFlags::ERROR_ON_CRITICAL_CHUNKS, false);

    flags
}

bitflags! {
    /// Decoder options that are flags
    ///
    /// NOTE: When you extend this, add true or false to
    /// all options above that return a `DecoderFlags`
    #[derive(Debug, Copy, Clone)]
    pub struct DecoderFlags: u32 {
        /// Whether the decoder should confirm and report adler mismatch
        const INFLATE_CONFIRM_ADLER    = 0b0000_0001;
        /// Whether an unknown chunk whose tag marks it critical
        /// aborts the decode instead of being skipped
        const ERROR_ON_CRITICAL_CHUNKS = 0b0000_0010;
    }
}

/// Decoder options
///
/// Currently composed of dimension caps, which bound the memory a
/// decode is allowed to reserve, and a set of strictness flags.
#[derive(Debug, Copy, Clone)]
pub struct DecoderOptions
{
    /// Maximum width for which the decoder will
    /// not try to decode images larger than
    /// the specified width.
    ///
    /// - Default value: 16384
    max_width:  usize,
    /// Maximum height for which the decoder will not
    /// try to decode images larger than the
    /// specified height
    ///
    /// - Default value: 16384
    max_height: usize,

    flags: DecoderFlags
}

impl DecoderOptions
{
    /// Create the decoder with options setting most configurable
    /// options to be their safe counterparts
    ///
    /// This is the same as the `default` option as default initializes
    /// options to the safe variant.
    pub fn new_safe() -> DecoderOptions
    {
        DecoderOptions::default()
    }

    /// Create decoder options suited for command line use,
    /// tolerant of checksum mismatches and unknown chunks
    pub fn new_cmd() -> DecoderOptions
    {
        let flag = cmd_options();
        DecoderOptions::default().set_decoder_flags(flag)
    }
}

impl DecoderOptions
{
    /// Get maximum width configured for the decoder
    pub const fn get_max_width(&self) -> usize
    {
        self.max_width
    }

    /// Get maximum height configured for the decoder
    pub const fn get_max_height(&self) -> usize
    {
        self.max_height
    }

    /// Return true whether the decoder should be in strict mode
    /// and reject most errors
    pub fn get_strict_mode(&self) -> bool
    {
        let flags = DecoderFlags::INFLATE_CONFIRM_ADLER | DecoderFlags::ERROR_ON_CRITICAL_CHUNKS;

        self.flags.contains(flags)
    }

    /// Set maximum width for which the decoder should not try
    /// decoding images greater than that width
    pub fn set_max_width(mut self, width: usize) -> Self
    {
        self.max_width = width;
        self
    }

    /// Set maximum height for which the decoder should not try
    /// decoding images greater than that height
    pub fn set_max_height(mut self, height: usize) -> Self
    {
        self.max_height = height;
        self
    }

    /// Set whether the decoder should be in strict mode
    pub fn set_strict_mode(mut self, yes: bool) -> Self
    {
        let flags = DecoderFlags::INFLATE_CONFIRM_ADLER | DecoderFlags::ERROR_ON_CRITICAL_CHUNKS;

        self.flags.set(flags, yes);
        self
    }

    /// Whether the inflate decoder should confirm
    /// adler checksums
    pub const fn inflate_get_confirm_adler(&self) -> bool
    {
        self.flags.contains(DecoderFlags::INFLATE_CONFIRM_ADLER)
    }

    /// Set whether the inflate decoder should confirm
    /// adler checksums
    pub fn inflate_set_confirm_adler(mut self, yes: bool) -> Self
    {
        self.flags.set(DecoderFlags::INFLATE_CONFIRM_ADLER, yes);
        self
    }

    /// Whether an unknown critical chunk aborts decoding
    pub const fn get_error_on_critical_chunks(&self) -> bool
    {
        self.flags.contains(DecoderFlags::ERROR_ON_CRITICAL_CHUNKS)
    }

    fn set_decoder_flags(mut self, flags: DecoderFlags) -> Self
    {
        self.flags = flags;
        self
    }
}

impl Default for DecoderOptions
{
    fn default() -> Self
    {
        Self {
            max_width:  1 << 14,
            max_height: 1 << 14,
            flags:      decoder_strict_mode()
        }
    }
}
