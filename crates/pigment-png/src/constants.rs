/// The fixed eight byte magic sequence every png file starts with,
/// `89 50 4E 47 0D 0A 1A 0A`.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Offset of the first chunk after the signature and the IHDR chunk,
/// signature(8) + length(4) + tag(4) + payload(13) + crc(4).
pub const FIRST_CHUNK_OFFSET: u64 = 33;
