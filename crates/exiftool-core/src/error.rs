//! Error types for exiftool-core.

use thiserror::Error;

/// Core parsing errors.
#[derive(Debug, Error)]
#[must_use]
pub enum Error {
    #[error("unexpected end of data: need {need} bytes, have {have}")]
    UnexpectedEof { need: usize, have: usize },

    #[error("invalid TIFF magic: expected 0x002A or 0x002B, got 0x{0:04X}")]
    InvalidTiffMagic(u16),

    #[error("invalid byte order marker: expected 'II' or 'MM', got {0:?}")]
    InvalidByteOrder([u8; 2]),

    #[error("invalid EXIF format type: {0}")]
    InvalidFormat(u16),

    #[error("IFD offset {0} is out of bounds (max {1})")]
    IfdOffsetOutOfBounds(u32, usize),

    #[error("IFD entry count {0} exceeds maximum {1}")]
    TooManyIfdEntries(u16, u16),

    #[error("value offset {0} + size {1} exceeds data length {2}")]
    ValueOutOfBounds(u32, usize, usize),

    #[error("value size overflow: format size {format_size} * count {count} overflows")]
    ValueSizeOverflow { format_size: usize, count: u32 },

    #[error("IFD too large to serialize: size {0} exceeds u32::MAX")]
    IfdTooLarge(usize),

    #[error("recursive IFD reference detected at offset {0}")]
    RecursiveIfd(u32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // --- component tree traversal errors (best-effort: the reader logs and
    // continues on all of these; they never abort the whole tree) ---
    #[error("corrupted metadata: {0}")]
    CorruptedMetadata(String),

    #[error("arithmetic overflow computing {what}")]
    ArithmeticOverflow { what: &'static str },

    #[error("unknown tag {tag:#06x} in group {group}")]
    UnknownTag { tag: u16, group: String },

    #[error("unknown type id {0}")]
    UnknownType(u16),

    #[error("circular reference: directory at offset {0} already read")]
    CircularReference(u32),

    #[error("unrecognized makernote header for make {0:?}")]
    UnknownMakernote(String),

    #[error("duplicate binary array for tag {tag:#06x} in group {group}")]
    DuplicateBinaryArray { tag: u16, group: String },
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
