
//! Describes the decoded meta data of an exr file:
//! the magic number, the version field, and the header attributes.

pub mod attribute;

use bit_field::BitField;

use crate::error::{FormatError, Result, UnitResult, UnsupportedFeature};
use crate::io::Scalar;
use crate::math::Vec2;
use self::attribute::*;


/// The first four bytes of each exr file.
/// Used to abort decoding non-exr files.
pub mod magic_number {
    use super::*;

    /// The first four bytes of each exr file.
    pub const BYTES: [u8; 4] = [0x76, 0x2f, 0x31, 0x01];

    /// The magic number as the little-endian u32 those bytes decode to.
    pub const VALUE: u32 = 0x01312F76;

    /// Check the first four bytes of the buffer.
    /// Returns `InvalidMagic` for anything that is not an exr file.
    pub fn validate(bytes: &[u8]) -> UnitResult {
        if u32::read_from(bytes, 0)? == VALUE { Ok(()) }
        else { Err(FormatError::InvalidMagic.into()) }
    }
}


/// A summary of the features that must be supported to decode the file,
/// extracted from the version field in bytes 4 to 7.
/// This crate decodes version 2, single part, scan lines, no deep data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirements {

    /// The complete version field, as stored in the file.
    version_field: u32,

    /// The file format version, stored in the 8 least significant bits.
    pub file_format_version: u8,

    /// If true, this is a tiled single-part file (bit 9).
    pub is_single_layer_and_tiled: bool,

    /// Whether attribute names and attribute type names
    /// may be up to 255 bytes long instead of 31 (bit 10).
    pub has_long_names: bool,

    /// Whether the file contains deep data (bit 11).
    pub has_deep_data: bool,

    /// Whether the file contains multiple parts (bit 12).
    pub has_multiple_layers: bool,
}

impl Requirements {

    /// All version field bits that are reserved and must be zero.
    pub const RESERVED_BITS_MASK: u32 = 0xFFFF_E100;

    /// Decode and validate the magic number and the version field.
    /// Requires the first eight bytes of the file.
    pub fn read(bytes: &[u8]) -> Result<Self> {
        magic_number::validate(bytes)?;

        let version_field = u32::read_from(bytes, 4)?;

        // the 8 least significant bits contain the file format version number
        let file_format_version = (version_field & 0x0000_00FF) as u8;

        // the remaining bits are treated as a set of boolean flags
        let is_single_layer_and_tiled = version_field.get_bit(9);
        let has_long_names = version_field.get_bit(10);
        let has_deep_data = version_field.get_bit(11);
        let has_multiple_layers = version_field.get_bit(12);

        match file_format_version {
            2 => {}
            1 => return Err(FormatError::UnsupportedVersion(1).into()),
            other => return Err(FormatError::UnknownVersion(other).into()),
        }

        if version_field & Self::RESERVED_BITS_MASK != 0 {
            return Err(FormatError::ReservedBitsSet(version_field).into());
        }

        Ok(Requirements {
            version_field, file_format_version,
            is_single_layer_and_tiled, has_long_names,
            has_deep_data, has_multiple_layers,
        })
    }

    /// The complete version field, for reporting.
    pub fn version_field(&self) -> u32 {
        self.version_field
    }

    /// Whether the flag bits form one of the five documented combinations:
    /// single-part scan lines, single-part tiles, multi-part,
    /// single-part deep data, or multi-part deep data.
    /// A violation is worth reporting but does not prevent decoding.
    pub fn is_documented_combination(&self) -> bool {
        matches!(
            self.version_field & 0xFFFF_FF00,
            0 | 0x200 | 0x800 | 0x1000 | 0x1800
        )
    }

    /// The first flagged feature outside the decoded subset, if any.
    pub fn unsupported_feature(&self) -> Option<UnsupportedFeature> {
        if self.has_multiple_layers { Some(UnsupportedFeature::Multipart) }
        else if self.has_deep_data { Some(UnsupportedFeature::Deep) }
        else if self.is_single_layer_and_tiled { Some(UnsupportedFeature::Tiled) }
        else { None }
    }
}


/// The decoded header of a single-part scan line file:
/// the required attributes, the optional attributes that were present
/// and valid, and every attribute as framed in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {

    /// Every attribute of the header, framed in file order.
    pub attributes: AttributeTable,

    /// The ordered list of channels. Required.
    pub channels: ChannelList,

    /// How the pixel data is compressed. Required.
    pub compression: Compression,

    /// The pixel space covered by the stored pixel data. Required.
    pub data_window: IntegerBounds,

    /// The vertical order of the scan lines in the file. Required.
    pub line_order: LineOrder,

    /// Width of the screen window. Required.
    pub screen_window_width: f32,

    /// The pixel space meant to be displayed. Optional.
    pub display_window: Option<IntegerBounds>,

    /// Width of a pixel divided by its height. Optional.
    pub pixel_aspect: Option<f32>,

    /// Center of the screen window. Optional.
    pub screen_window_center: Option<Vec2<f32>>,

    /// Horizontal output density in pixels per inch.
    /// A custom attribute some writers emit. Optional.
    pub x_density: Option<f32>,
}

impl Header {

    /// Index of the first header byte, right after the version field.
    pub const BYTE_POSITION: usize = 8;

    /// Decode the complete header section.
    /// A missing or invalid required attribute is fatal;
    /// optional attributes degrade to `None` instead.
    pub fn read(bytes: &[u8], requirements: &Requirements) -> Result<Self> {
        let attributes = AttributeTable::read(bytes, Self::BYTE_POSITION, requirements.has_long_names)?;

        let channels = attributes.get(attribute_names::CHANNELS)?.decode_channel_list(bytes)?;
        let compression = attributes.get(attribute_names::COMPRESSION)?.decode_compression(bytes)?;
        let data_window = attributes.get(attribute_names::DATA_WINDOW)?.decode_box2i(bytes)?;
        let line_order = attributes.get(attribute_names::LINE_ORDER)?.decode_line_order(bytes)?;
        let screen_window_width = attributes.get(attribute_names::WINDOW_WIDTH)?.decode_f32(bytes)?;

        let display_window = optional(&attributes, bytes, attribute_names::DISPLAY_WINDOW, Attribute::decode_box2i);
        let pixel_aspect = optional(&attributes, bytes, attribute_names::PIXEL_ASPECT, Attribute::decode_f32);
        let screen_window_center = optional(&attributes, bytes, attribute_names::WINDOW_CENTER, Attribute::decode_f32_vec2);
        let x_density = optional(&attributes, bytes, attribute_names::X_DENSITY, Attribute::decode_f32);

        Ok(Header {
            attributes,
            channels, compression, data_window, line_order, screen_window_width,
            display_window, pixel_aspect, screen_window_center, x_density,
        })
    }

    /// Index of the null byte that ends the header section.
    pub fn terminator(&self) -> usize {
        self.attributes.terminator()
    }

    /// Number of pixel rows, `y_max + 1` for the origin-anchored subset.
    pub fn rows(&self) -> usize {
        (self.data_window.max.y() as i64 + 1).max(0) as usize
    }

    /// Number of pixel columns, `x_max + 1` for the origin-anchored subset.
    pub fn columns(&self) -> usize {
        (self.data_window.max.x() as i64 + 1).max(0) as usize
    }

    /// Number of entries in the chunk offset table:
    /// one chunk per scan line in the uncompressed subset.
    /// Multipart files declare their count in a `chunkCount` attribute instead,
    /// which this crate frames but never computes with.
    pub fn chunk_count(&self) -> usize {
        self.rows()
    }
}

fn optional<T>(
    attributes: &AttributeTable, bytes: &[u8], name: &'static str,
    decode: impl Fn(&Attribute, &[u8]) -> Result<T>,
) -> Option<T>
{
    attributes.get(name).ok().and_then(|attribute| decode(attribute, bytes).ok())
}
