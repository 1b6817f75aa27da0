
//! Error handling for this crate.
//!
//! Every failure is typed: callers can distinguish a file that is not
//! exr at all from a file that is structurally broken, and both from a
//! file that is merely outside the decoded subset. Low-level decoders
//! never decide whether a failure is fatal; only header assembly and
//! the top-level decoder do.

use std::fmt;

/// A result that, if ok, contains the decoded value, and otherwise contains an `Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// A result that, if ok, contains nothing, and otherwise contains an `Error`.
pub type UnitResult = Result<()>;

/// Any failure that may occur while decoding an exr file from memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {

    /// The magic number or version field cannot be used.
    /// Nothing else of the file can be decoded.
    Format(FormatError),

    /// A header attribute is missing or contradicts its own declaration.
    /// Fatal for required attributes, recoverable for optional ones.
    Attribute(AttributeError),

    /// The structured contents of the file are inconsistent.
    Data(DataError),

    /// The file is valid but declares a feature outside the decoded subset.
    /// The header remains usable; the pixel section is never attempted.
    Unsupported(UnsupportedFeature),
}

/// The magic number or version field is unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {

    /// The first four bytes are not the exr magic number.
    InvalidMagic,

    /// The file declares OpenEXR version 1, which predates the decoded layout.
    UnsupportedVersion(u8),

    /// The file declares a version number this crate does not know about.
    UnknownVersion(u8),

    /// Reserved bits of the version field are set.
    /// Contains the complete version field.
    ReservedBitsSet(u32),
}

/// A header attribute is missing or contradicts its own declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeError {

    /// No attribute with the requested name exists in the header.
    AttributeNotFound(&'static str),

    /// The attribute at `position` does not have the expected type name.
    TypeMismatch {

        /// The type name the attribute was expected to declare.
        expected: &'static [u8],

        /// Index of the first byte of the attribute.
        position: usize,
    },

    /// The declared value size does not match the fixed size of the type.
    SizeMismatch {

        /// The size in bytes required by the attribute type.
        expected: usize,

        /// The size in bytes the attribute declares.
        found: usize,

        /// Index of the first byte of the attribute value.
        position: usize,
    },

    /// A string starting at `position` has no null terminator before the buffer ends.
    MalformedString {

        /// Index of the first byte of the string.
        position: usize,
    },

    /// An attribute name exceeds the length allowed by the version field.
    NameTooLong {

        /// The length of the name in bytes, not counting the null terminator.
        length: usize,

        /// The maximum length allowed for this file.
        max: usize,

        /// Index of the first byte of the name.
        position: usize,
    },
}

/// The structured contents of the file are inconsistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataError {

    /// A read of `count` bytes at `position` would exceed the buffer.
    OutOfRange {

        /// Index of the first byte of the attempted read.
        position: usize,

        /// Number of bytes the read required.
        count: usize,
    },

    /// An entry of the chunk offset table does not point inside the buffer.
    OffsetOutOfRange {

        /// Index of the entry within the offset table.
        index: usize,

        /// The decoded offset value.
        offset: u64,
    },

    /// A scan line stores a y coordinate that contradicts the declared line order.
    ScanlineOrderMismatch {

        /// Index of the scan line within the pixel section.
        row: usize,

        /// The y coordinate stored in the file.
        found_y: i32,
    },

    /// A byte-coded enumeration stores an undocumented value.
    InvalidEnumValue {

        /// The decoded value.
        value: u32,

        /// Index of the first byte of the value.
        position: usize,
    },

    /// The null byte that ends the header section is missing.
    MissingHeaderTerminator {

        /// Index at which the terminator was expected.
        position: usize,
    },
}

/// A declared feature outside the decoded subset:
/// single part, scan lines, no compression, four bytes per sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedFeature {

    /// The pixel data is compressed. Compression methods are recognized, never decoded.
    CompressedData,

    /// The file contains a tiled image.
    Tiled,

    /// The file contains deep data.
    Deep,

    /// The file contains multiple parts.
    Multipart,

    /// The data window is not anchored at the origin,
    /// so the scan line count cannot be derived from its maximum.
    NonZeroDataWindowOrigin,

    /// A channel stores 16-bit half floats instead of four-byte samples.
    HalfFloatData,

    /// A channel is subsampled.
    Subsampling,
}

impl From<FormatError> for Error {
    fn from(error: FormatError) -> Self { Error::Format(error) }
}

impl From<AttributeError> for Error {
    fn from(error: AttributeError) -> Self { Error::Attribute(error) }
}

impl From<DataError> for Error {
    fn from(error: DataError) -> Self { Error::Data(error) }
}

impl From<UnsupportedFeature> for Error {
    fn from(feature: UnsupportedFeature) -> Self { Error::Unsupported(feature) }
}

impl fmt::Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Format(error) => write!(formatter, "{}", error),
            Error::Attribute(error) => write!(formatter, "{}", error),
            Error::Data(error) => write!(formatter, "{}", error),
            Error::Unsupported(feature) => write!(formatter, "unsupported feature: {}", feature),
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            FormatError::InvalidMagic =>
                write!(formatter, "the first four bytes are not the exr magic number"),

            FormatError::UnsupportedVersion(version) =>
                write!(formatter, "openexr version {} predates the decoded layout", version),

            FormatError::UnknownVersion(version) =>
                write!(formatter, "unknown openexr version {}", version),

            FormatError::ReservedBitsSet(field) =>
                write!(formatter, "reserved version field bits are set (version field is 0x{:08X})", field),
        }
    }
}

impl fmt::Display for AttributeError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            AttributeError::AttributeNotFound(name) =>
                write!(formatter, "attribute `{}` not found", name),

            AttributeError::TypeMismatch { expected, position } =>
                write!(formatter, "attribute at byte 0x{:X} is not of type `{}`", position, String::from_utf8_lossy(expected)),

            AttributeError::SizeMismatch { expected, found, position } =>
                write!(formatter, "attribute value at byte 0x{:X} declares {} bytes, the type requires {}", position, found, expected),

            AttributeError::MalformedString { position } =>
                write!(formatter, "string at byte 0x{:X} has no null terminator", position),

            AttributeError::NameTooLong { length, max, position } =>
                write!(formatter, "attribute name at byte 0x{:X} is {} bytes long, at most {} are allowed", position, length, max),
        }
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DataError::OutOfRange { position, count } =>
                write!(formatter, "reading {} bytes at byte 0x{:X} exceeds the file", count, position),

            DataError::OffsetOutOfRange { index, offset } =>
                write!(formatter, "chunk offset {} (entry {}) does not point inside the file", offset, index),

            DataError::ScanlineOrderMismatch { row, found_y } =>
                write!(formatter, "scan line {} stores y coordinate {}, which contradicts the declared line order", row, found_y),

            DataError::InvalidEnumValue { value, position } =>
                write!(formatter, "undocumented enumeration value {} at byte 0x{:X}", value, position),

            DataError::MissingHeaderTerminator { position } =>
                write!(formatter, "the null byte ending the header section is missing at byte 0x{:X}", position),
        }
    }
}

impl fmt::Display for UnsupportedFeature {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            UnsupportedFeature::CompressedData => "compressed pixel data",
            UnsupportedFeature::Tiled => "tiled image",
            UnsupportedFeature::Deep => "deep data",
            UnsupportedFeature::Multipart => "multiple parts",
            UnsupportedFeature::NonZeroDataWindowOrigin => "data window not anchored at the origin",
            UnsupportedFeature::HalfFloatData => "16-bit half float samples",
            UnsupportedFeature::Subsampling => "channel subsampling",
        })
    }
}

impl std::error::Error for Error {}
