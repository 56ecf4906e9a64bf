//! TIFF format constants

/// TIFF header constants
pub mod header {
    /// Standard TIFF version number (42)
    pub const TIFF_VERSION: u16 = 42;

    /// BigTIFF version number (43)
    pub const BIG_TIFF_VERSION: u16 = 43;

    /// BigTIFF offset size (8 bytes)
    pub const BIGTIFF_OFFSET_SIZE: u16 = 8;
}

/// Field types as defined in the TIFF spec
pub mod field_types {
    pub const BYTE: u16 = 1;       // 8-bit unsigned integer
    pub const ASCII: u16 = 2;      // 8-bit byte containing ASCII character
    pub const SHORT: u16 = 3;      // 16-bit unsigned integer
    pub const LONG: u16 = 4;       // 32-bit unsigned integer
    pub const RATIONAL: u16 = 5;   // Two LONGs: numerator and denominator
    pub const SBYTE: u16 = 6;      // 8-bit signed integer
    pub const UNDEFINED: u16 = 7;  // 8-bit byte with unspecified format
    pub const SSHORT: u16 = 8;     // 16-bit signed integer
    pub const SLONG: u16 = 9;      // 32-bit signed integer
    pub const SRATIONAL: u16 = 10; // Two SLONGs: numerator and denominator
    pub const FLOAT: u16 = 11;     // Single precision IEEE floating point
    pub const DOUBLE: u16 = 12;    // Double precision IEEE floating point
    pub const LONG8: u16 = 16;     // BigTIFF 64-bit unsigned integer
    pub const SLONG8: u16 = 17;    // BigTIFF 64-bit signed integer
    pub const IFD8: u16 = 18;      // BigTIFF 64-bit IFD offset
}

/// Tags the layout inspection looks at
pub mod tags {
    pub const NEW_SUBFILE_TYPE: u16 = 254;         // Subfile data descriptor
    pub const IMAGE_WIDTH: u16 = 256;              // Width of the image in pixels
    pub const IMAGE_LENGTH: u16 = 257;             // Height of the image in pixels
    pub const COMPRESSION: u16 = 259;              // Compression scheme
    pub const TILE_WIDTH: u16 = 322;               // Width of a tile
    pub const TILE_LENGTH: u16 = 323;              // Length of a tile
}

/// Compression codes
pub mod compression {
    pub const NONE: u64 = 1;
    pub const LZW: u64 = 5;
    pub const JPEG: u64 = 7;
    pub const DEFLATE: u64 = 8;           // Adobe Deflate (zlib)
    pub const PACKBITS: u64 = 32773;
    pub const DEFLATE_OLD: u64 = 32946;   // Pre-Adobe Deflate code
    pub const LERC: u64 = 34887;
    pub const LZMA: u64 = 34925;
    pub const ZSTD: u64 = 50000;          // As written by libtiff/GDAL
    pub const WEBP: u64 = 50001;
    pub const JXL: u64 = 50002;
}

/// Subfile type bit flags
pub mod new_subfile_type {
    pub const REDUCED_RESOLUTION: u64 = 1; // Reduced resolution version of another image
    pub const TRANSPARENCY_MASK: u64 = 4;  // Transparency mask for another image
}

/// Name of a compression code, lower case as GDAL spells it
pub fn compression_name(code: u64) -> String {
    let name = match code {
        compression::NONE => "none",
        compression::LZW => "lzw",
        compression::JPEG => "jpeg",
        compression::DEFLATE | compression::DEFLATE_OLD => "deflate",
        compression::PACKBITS => "packbits",
        compression::LERC => "lerc",
        compression::LZMA => "lzma",
        compression::ZSTD => "zstd",
        compression::WEBP => "webp",
        compression::JXL => "jxl",
        other => return format!("unknown-{}", other),
    };
    name.to_string()
}

/// Size in bytes of one value of a field type
pub fn field_type_size(field_type: u16) -> usize {
    match field_type {
        field_types::BYTE | field_types::ASCII | field_types::SBYTE | field_types::UNDEFINED => 1,
        field_types::SHORT | field_types::SSHORT => 2,
        field_types::LONG | field_types::SLONG | field_types::FLOAT => 4,
        field_types::RATIONAL | field_types::SRATIONAL | field_types::DOUBLE => 8,
        field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => 8,
        _ => 1,
    }
}
