
//! Header attributes: the generic name/type/size/value framing,
//! and the typed values this crate can decode.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use smallvec::SmallVec;

use crate::error::{AttributeError, DataError, Error, Result, UnitResult};
use crate::io::{ByteSpan, Scalar};
use crate::math::Vec2;

/// The raw bytes that make up a string in an exr file.
/// Each `u8` is a single char.
// will mostly be "R", "G", "B" or "dataWindow"
pub type TextBytes = SmallVec<[u8; 24]>;

/// A byte string as stored in an exr file. This is not utf-8.
#[derive(Clone, PartialEq, Eq, Ord, PartialOrd, Default)]
pub struct Text {
    bytes: TextBytes,
}

/// Attribute names are limited to 31 bytes unless the long-names flag is set.
pub const SHORT_NAME_MAX_LEN: usize = 31;

/// Attribute names are limited to 255 bytes when the long-names flag is set.
pub const LONG_NAME_MAX_LEN: usize = 255;

impl Text {

    /// Create a `Text` from a slice of bytes, without checking any of the bytes.
    pub fn from_slice_unchecked(text: &[u8]) -> Self {
        Text { bytes: SmallVec::from_slice(text) }
    }

    /// The underlying bytes that represent this text.
    pub fn bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// The number of bytes, and therefore chars, in this text.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether this text contains no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Compare this `Text` with a plain `&str`.
    pub fn eq(&self, string: &str) -> bool {
        self.bytes() == string.as_bytes()
    }

    /// Read bytes starting at `start` until a null terminator is found.
    /// Returns the text and the index of the terminator byte.
    /// Returns `MalformedString` if the buffer ends before any terminator.
    pub fn read_null_terminated(bytes: &[u8], start: usize) -> Result<(Self, usize)> {
        let terminator = bytes.get(start..)
            .and_then(|remaining| remaining.iter().position(|&byte| byte == 0))
            .map(|found| start + found)
            .ok_or(Error::Attribute(AttributeError::MalformedString { position: start }))?;

        Ok((Text::from_slice_unchecked(&bytes[start .. terminator]), terminator))
    }

    /// Iterate over the individual chars in this text, similar to `String::chars()`.
    pub fn chars(&self) -> impl '_ + Iterator<Item = char> {
        self.bytes.iter().map(|&byte| byte as char)
    }
}

impl From<&str> for Text {
    fn from(string: &str) -> Self {
        Text::from_slice_unchecked(string.as_bytes())
    }
}

impl PartialEq<str> for Text {
    fn eq(&self, other: &str) -> bool {
        self.eq(other)
    }
}

impl Borrow<[u8]> for Text {
    fn borrow(&self) -> &[u8] {
        self.bytes()
    }
}

// forwarding implementation. guarantees `text.borrow().hash() == text.hash()` (required for Borrow)
impl Hash for Text {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state)
    }
}

impl fmt::Display for Text {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for char in self.chars() {
            write!(formatter, "{}", char)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "\"{}\"", self)
    }
}


/// Contains byte string literals identifying the type of an attribute.
pub mod type_names {
    macro_rules! define_attribute_type_names {
        ( $($name: ident : $value: expr),* ) => {
            $(
                /// The byte string name of this attribute type as it appears in an exr file.
                pub const $name: &'static [u8] = $value;
            )*
        };
    }

    define_attribute_type_names! {
        BOX2I:          b"box2i",
        COMPRESSION:    b"compression",
        LINE_ORDER:     b"lineOrder",
        F32:            b"float",
        F32VEC2:        b"v2f",
        CHANNEL_LIST:   b"chlist"
    }
}

/// Contains the attribute names the decoder looks up in the header.
pub mod attribute_names {
    macro_rules! define_attribute_names {
        ( $($name: ident : $value: expr),* ) => {
            $(
                /// The name of this attribute as it appears in an exr file.
                pub const $name: &'static str = $value;
            )*
        };
    }

    define_attribute_names! {
        CHANNELS:       "channels",
        COMPRESSION:    "compression",
        DATA_WINDOW:    "dataWindow",
        DISPLAY_WINDOW: "displayWindow",
        LINE_ORDER:     "lineOrder",
        PIXEL_ASPECT:   "pixelAspectRatio",
        WINDOW_CENTER:  "screenWindowCenter",
        WINDOW_WIDTH:   "screenWindowWidth",
        X_DENSITY:      "xDensity"
    }
}


/// One framed header attribute: its name, its declared type and size,
/// and where its raw value bytes are located within the buffer.
/// The value itself is decoded separately, keyed on the type name.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {

    /// The attribute name, unique within a header.
    pub name: Text,

    /// The declared type name, such as `box2i` or `chlist`.
    pub kind: Text,

    /// The size of the value in bytes, as declared in the file.
    pub declared_size: u32,

    /// Where the value bytes are located within the buffer.
    pub value: ByteSpan,

    /// Index of the first byte of the attribute, which starts with its name.
    pub position: usize,
}

impl Attribute {

    /// Frame a single attribute starting at `position`:
    /// null-terminated name, null-terminated type name, four size bytes,
    /// and the span of value bytes the size declares.
    /// Returns the attribute and the index of the first byte after its value.
    pub fn read(bytes: &[u8], position: usize, long_names: bool) -> Result<(Self, usize)> {
        let (name, name_end) = Text::read_null_terminated(bytes, position)?;

        let max_len = if long_names { LONG_NAME_MAX_LEN } else { SHORT_NAME_MAX_LEN };
        if name.len() > max_len {
            return Err(AttributeError::NameTooLong { length: name.len(), max: max_len, position }.into());
        }

        let (kind, kind_end) = Text::read_null_terminated(bytes, name_end + 1)?;

        let size_index = kind_end + 1;
        let declared_size = u32::read_from(bytes, size_index)?;
        let value = ByteSpan::new(bytes, size_index + u32::BYTE_SIZE, declared_size as usize)?;

        let next = value.end();
        Ok((Attribute { name, kind, declared_size, value, position }, next))
    }

    fn expect_kind(&self, expected: &'static [u8]) -> UnitResult {
        if self.kind.bytes() == expected { Ok(()) }
        else { Err(AttributeError::TypeMismatch { expected, position: self.position }.into()) }
    }

    fn expect_size(&self, expected: usize) -> UnitResult {
        if self.value.len() == expected { Ok(()) }
        else {
            Err(AttributeError::SizeMismatch {
                expected, found: self.value.len(),
                position: self.value.first(),
            }.into())
        }
    }

    /// Decode this attribute as a `box2i` value.
    pub fn decode_box2i(&self, bytes: &[u8]) -> Result<IntegerBounds> {
        self.expect_kind(type_names::BOX2I)?;
        self.expect_size(IntegerBounds::BYTE_SIZE)?;
        IntegerBounds::read(bytes, self.value.first())
    }

    /// Decode this attribute as a `compression` value.
    pub fn decode_compression(&self, bytes: &[u8]) -> Result<Compression> {
        self.expect_kind(type_names::COMPRESSION)?;
        self.expect_size(Compression::BYTE_SIZE)?;
        Compression::read(bytes, self.value.first())
    }

    /// Decode this attribute as a `lineOrder` value.
    pub fn decode_line_order(&self, bytes: &[u8]) -> Result<LineOrder> {
        self.expect_kind(type_names::LINE_ORDER)?;
        self.expect_size(LineOrder::BYTE_SIZE)?;
        LineOrder::read(bytes, self.value.first())
    }

    /// Decode this attribute as a `float` value.
    pub fn decode_f32(&self, bytes: &[u8]) -> Result<f32> {
        self.expect_kind(type_names::F32)?;
        self.expect_size(f32::BYTE_SIZE)?;
        f32::read_from(bytes, self.value.first())
    }

    /// Decode this attribute as a `v2f` value.
    pub fn decode_f32_vec2(&self, bytes: &[u8]) -> Result<Vec2<f32>> {
        self.expect_kind(type_names::F32VEC2)?;
        self.expect_size(2 * f32::BYTE_SIZE)?;

        let x = f32::read_from(bytes, self.value.first())?;
        let y = f32::read_from(bytes, self.value.first() + f32::BYTE_SIZE)?;
        Ok(Vec2(x, y))
    }

    /// Decode this attribute as a `chlist` value.
    /// The channel list is self-terminating,
    /// so the declared size takes no part in decoding it.
    pub fn decode_channel_list(&self, bytes: &[u8]) -> Result<ChannelList> {
        self.expect_kind(type_names::CHANNEL_LIST)?;
        let (channels, _terminator) = ChannelList::read(bytes, self.value.first())?;
        Ok(channels)
    }

    /// Decode the value of this attribute, dispatching on its declared type name.
    /// Values of unknown types are carried as raw bytes instead of being decoded.
    pub fn decode(&self, bytes: &[u8]) -> Result<AttributeValue> {
        use self::type_names as ty;

        Ok(match self.kind.bytes() {
            ty::BOX2I => AttributeValue::Box2i(self.decode_box2i(bytes)?),
            ty::COMPRESSION => AttributeValue::Compression(self.decode_compression(bytes)?),
            ty::LINE_ORDER => AttributeValue::LineOrder(self.decode_line_order(bytes)?),
            ty::F32 => AttributeValue::F32(self.decode_f32(bytes)?),
            ty::F32VEC2 => AttributeValue::F32Vec2(self.decode_f32_vec2(bytes)?),
            ty::CHANNEL_LIST => AttributeValue::ChannelList(self.decode_channel_list(bytes)?),
            _ => AttributeValue::Custom { kind: self.kind.clone(), value: self.value },
        })
    }
}


/// One of the attribute value types this crate can decode.
/// Values of unknown types are carried as raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {

    /// A 2D integer rectangle, such as the data window.
    Box2i(IntegerBounds),

    /// The compression method of the pixel data.
    Compression(Compression),

    /// The vertical order of the scan lines in the file.
    LineOrder(LineOrder),

    /// A 32-bit float.
    F32(f32),

    /// A 2D float vector.
    F32Vec2(Vec2<f32>),

    /// The ordered list of channels stored for each pixel.
    ChannelList(ChannelList),

    /// A value of a type this crate does not decode.
    /// Contains the declared type name and the location of the raw bytes.
    Custom {

        /// The name of the type this value is an instance of.
        kind: Text,

        /// Where the value bytes are located within the buffer.
        value: ByteSpan,
    },
}


/// All attributes of the header, framed in one linear pass.
/// Name-based lookup preserves the semantics of per-attribute scans
/// while touching every header byte only once.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeTable {
    attributes: Vec<Attribute>,
    by_name: HashMap<Text, usize>,
    terminator: usize,
}

impl AttributeTable {

    /// Frame every attribute from `start` until the null byte
    /// that ends the header section.
    /// Returns `MissingHeaderTerminator` if the buffer ends first.
    pub fn read(bytes: &[u8], start: usize, long_names: bool) -> Result<Self> {
        let mut attributes = Vec::new();
        let mut by_name = HashMap::new();
        let mut position = start;

        loop {
            match bytes.get(position) {
                None => return Err(DataError::MissingHeaderTerminator { position }.into()),
                Some(0) => break,

                Some(_) => {
                    let (attribute, next) = Attribute::read(bytes, position, long_names)?;

                    // on duplicate names, the first occurrence wins
                    by_name.entry(attribute.name.clone()).or_insert(attributes.len());

                    attributes.push(attribute);
                    position = next;
                }
            }
        }

        Ok(AttributeTable { attributes, by_name, terminator: position })
    }

    /// The attribute with the specified name, or `AttributeNotFound`.
    pub fn get(&self, name: &'static str) -> Result<&Attribute> {
        self.by_name.get(name.as_bytes())
            .map(|&index| &self.attributes[index])
            .ok_or(Error::Attribute(AttributeError::AttributeNotFound(name)))
    }

    /// All attributes, in the order they appear in the file.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Index of the null byte that ends the header section.
    pub fn terminator(&self) -> usize {
        self.terminator
    }
}


/// A rectangle in the infinite 2D integer space,
/// stored as its inclusive minimum and maximum coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntegerBounds {

    /// The smallest coordinate contained in the rectangle.
    pub min: Vec2<i32>,

    /// The largest coordinate contained in the rectangle.
    pub max: Vec2<i32>,
}

impl IntegerBounds {

    /// Number of bytes this value occupies in an exr file.
    pub const BYTE_SIZE: usize = 4 * i32::BYTE_SIZE;

    /// Decode the value stored at the specified byte index, without validating.
    pub fn read(bytes: &[u8], index: usize) -> Result<Self> {
        let x_min = i32::read_from(bytes, index)?;
        let y_min = i32::read_from(bytes, index + i32::BYTE_SIZE)?;
        let x_max = i32::read_from(bytes, index + 2 * i32::BYTE_SIZE)?;
        let y_max = i32::read_from(bytes, index + 3 * i32::BYTE_SIZE)?;

        Ok(IntegerBounds {
            min: Vec2(x_min, y_min),
            max: Vec2(x_max, y_max),
        })
    }
}


/// How the pixel data of all channels is compressed.
/// Every method is recognized, only uncompressed data is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {

    /// The pixels are not compressed.
    Uncompressed,

    /// Run length encoding.
    RLE,

    /// Zip compression, each scan line for itself.
    ZIP1,

    /// Zip compression, in blocks of 16 scan lines.
    ZIP16,

    /// Piz wavelet compression.
    PIZ,

    /// Lossy 24-bit float compression.
    PXR24,

    /// Lossy 4-by-4 pixel block compression, fixed rate.
    B44,

    /// Lossy 4-by-4 pixel block compression, flat fields are compressed more.
    B44A,

    /// Lossy dct compression, in blocks of 32 scan lines.
    DWAA,

    /// Lossy dct compression, in blocks of 256 scan lines.
    DWAB,
}

impl Compression {

    /// Number of bytes this value occupies in an exr file.
    pub const BYTE_SIZE: usize = 1;

    /// Decode the value stored at the specified byte index.
    pub fn read(bytes: &[u8], index: usize) -> Result<Self> {
        use self::Compression::*;

        Ok(match u8::read_from(bytes, index)? {
            0 => Uncompressed,
            1 => RLE,
            2 => ZIP1,
            3 => ZIP16,
            4 => PIZ,
            5 => PXR24,
            6 => B44,
            7 => B44A,
            8 => DWAA,
            9 => DWAB,
            value => return Err(DataError::InvalidEnumValue { value: value as u32, position: index }.into()),
        })
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Compression::Uncompressed => "NO_COMPRESSION",
            Compression::RLE => "RLE_COMPRESSION",
            Compression::ZIP1 => "ZIPS_COMPRESSION",
            Compression::ZIP16 => "ZIP_COMPRESSION",
            Compression::PIZ => "PIZ_COMPRESSION",
            Compression::PXR24 => "PXR24_COMPRESSION",
            Compression::B44 => "B44_COMPRESSION",
            Compression::B44A => "B44A_COMPRESSION",
            Compression::DWAA => "DWAA_COMPRESSION",
            Compression::DWAB => "DWAB_COMPRESSION",
        })
    }
}


/// In what vertical order the scan lines appear in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineOrder {

    /// The first scan line in the file is the top row of the image.
    Increasing,

    /// The first scan line in the file is the bottom row of the image.
    Decreasing,

    /// The scan lines appear in no particular order.
    Unspecified,
}

impl LineOrder {

    /// Number of bytes this value occupies in an exr file.
    pub const BYTE_SIZE: usize = 1;

    /// Decode the value stored at the specified byte index.
    pub fn read(bytes: &[u8], index: usize) -> Result<Self> {
        use self::LineOrder::*;

        Ok(match u8::read_from(bytes, index)? {
            0 => Increasing,
            1 => Decreasing,
            2 => Unspecified,
            value => return Err(DataError::InvalidEnumValue { value: value as u32, position: index }.into()),
        })
    }
}

impl fmt::Display for LineOrder {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            LineOrder::Increasing => "INCREASING_Y",
            LineOrder::Decreasing => "DECREASING_Y",
            LineOrder::Unspecified => "RANDOM_Y",
        })
    }
}


/// How one sample of a channel is stored in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleType {

    /// A 32-bit unsigned integer.
    U32,

    /// A 16-bit float. Described, but outside the decoded subset.
    F16,

    /// A 32-bit float.
    F32,
}

impl SampleType {

    /// Number of bytes this value occupies in an exr file.
    pub const BYTE_SIZE: usize = i32::BYTE_SIZE;

    /// Decode the value stored at the specified byte index.
    pub fn read(bytes: &[u8], index: usize) -> Result<Self> {
        Ok(match i32::read_from(bytes, index)? {
            0 => SampleType::U32,
            1 => SampleType::F16,
            2 => SampleType::F32,
            value => return Err(DataError::InvalidEnumValue { value: value as u32, position: index }.into()),
        })
    }

    /// How many bytes a single sample of this type takes up in the file.
    pub fn bytes_per_sample(&self) -> usize {
        match self {
            SampleType::U32 => 4,
            SampleType::F16 => 2,
            SampleType::F32 => 4,
        }
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            SampleType::U32 => "UINT",
            SampleType::F16 => "HALF",
            SampleType::F32 => "FLOAT",
        })
    }
}


/// Describes a single channel of the image.
/// Does not contain the actual pixel data, but instead merely describes it.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {

    /// The channel name, one of "R", "G", "B" or "A" most of the time.
    pub name: Text,

    /// How one sample of this channel is stored.
    pub sample_type: SampleType,

    /// Hint for lossy codecs whether samples of this channel
    /// should be quantized linearly.
    pub quantize_linearly: bool,

    /// How many samples are skipped in x and y,
    /// compared to the other channels.
    pub sampling: Vec2<i32>,
}

impl Channel {

    /// Decode a single channel record:
    /// null-terminated name, four type bytes, one linearity byte,
    /// three reserved bytes, and four bytes each for x and y sampling.
    /// Returns the channel and the index of the first byte after the record.
    pub fn read(bytes: &[u8], position: usize) -> Result<(Self, usize)> {
        let (name, name_end) = Text::read_null_terminated(bytes, position)?;

        let mut index = name_end + 1;
        let sample_type = SampleType::read(bytes, index)?;
        index += SampleType::BYTE_SIZE;

        let quantize_linearly = match u8::read_from(bytes, index)? {
            0 => false,
            1 => true,
            value => return Err(DataError::InvalidEnumValue { value: value as u32, position: index }.into()),
        };

        index += 1 + 3; // the linearity byte and three reserved bytes

        let x_sampling = i32::read_from(bytes, index)?;
        let y_sampling = i32::read_from(bytes, index + i32::BYTE_SIZE)?;
        index += 2 * i32::BYTE_SIZE;

        Ok((
            Channel { name, sample_type, quantize_linearly, sampling: Vec2(x_sampling, y_sampling) },
            index,
        ))
    }
}


/// The ordered list of channels of the image.
/// The order is load-bearing: within each scan line, sample groups
/// appear in exactly this order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelList {

    /// The channels, in the order they appear in the file.
    pub list: SmallVec<[Channel; 5]>,
}

impl ChannelList {

    /// Decode channel records until a null byte appears
    /// where the next channel name would begin.
    /// That byte terminates the list and is its last byte.
    /// Returns the list and the index of the terminator.
    pub fn read(bytes: &[u8], start: usize) -> Result<(Self, usize)> {
        let mut list = SmallVec::new();
        let mut position = start;

        loop {
            match bytes.get(position) {
                None => return Err(DataError::OutOfRange { position, count: 1 }.into()),
                Some(0) => break,

                Some(_) => {
                    let (channel, next) = Channel::read(bytes, position)?;
                    list.push(channel);
                    position = next;
                }
            }
        }

        Ok((ChannelList { list }, position))
    }

    /// Number of channels in the list.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Whether the list contains no channels.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// The names of the channels, in file order.
    pub fn names(&self) -> impl '_ + Iterator<Item = &Text> {
        self.list.iter().map(|channel| &channel.name)
    }
}


#[cfg(test)]
mod test {
    use super::*;

    fn attribute_bytes(name: &str, kind: &str, value: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(name.as_bytes());
        bytes.push(0);
        bytes.extend_from_slice(kind.as_bytes());
        bytes.push(0);
        bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
        bytes.extend_from_slice(value);
        bytes
    }

    fn channel_bytes(name: &str, sample_type: i32, sampling: (i32, i32)) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(name.as_bytes());
        bytes.push(0);
        bytes.extend_from_slice(&sample_type.to_le_bytes());
        bytes.push(0); // not linear
        bytes.extend_from_slice(&[0, 0, 0]); // reserved
        bytes.extend_from_slice(&sampling.0.to_le_bytes());
        bytes.extend_from_slice(&sampling.1.to_le_bytes());
        bytes
    }

    #[test]
    fn read_null_terminated_text() {
        let bytes = b"box2i\0rest";
        let (text, terminator) = Text::read_null_terminated(bytes, 0).unwrap();

        assert!(text.eq("box2i"));
        assert_eq!(terminator, 5);

        let (text, terminator) = Text::read_null_terminated(bytes, 2).unwrap();
        assert!(text.eq("x2i"));
        assert_eq!(terminator, 5);
    }

    #[test]
    fn unterminated_text_is_malformed() {
        assert_eq!(
            Text::read_null_terminated(b"no terminator", 0),
            Err(Error::Attribute(AttributeError::MalformedString { position: 0 }))
        );

        // starting past the end finds no terminator either
        assert!(Text::read_null_terminated(b"x\0", 2).is_err());
        assert!(Text::read_null_terminated(b"x\0", 400).is_err());
    }

    #[test]
    fn frame_one_attribute() {
        let mut bytes = vec![0xFF_u8; 3]; // leading bytes the attribute does not start at
        bytes.extend_from_slice(&attribute_bytes("pixelAspectRatio", "float", &1.5_f32.to_le_bytes()));

        let (attribute, next) = Attribute::read(&bytes, 3, false).unwrap();

        assert!(attribute.name.eq("pixelAspectRatio"));
        assert!(attribute.kind.eq("float"));
        assert_eq!(attribute.declared_size, 4);
        assert_eq!(attribute.position, 3);
        assert_eq!(attribute.value.len(), 4);
        assert_eq!(attribute.value.last() + 1, next);
        assert_eq!(next, bytes.len());

        assert_eq!(attribute.decode_f32(&bytes).unwrap(), 1.5);
    }

    #[test]
    fn overlong_names_are_rejected() {
        let name = "x".repeat(32);
        let bytes = attribute_bytes(&name, "float", &[0; 4]);

        assert_eq!(
            Attribute::read(&bytes, 0, false),
            Err(Error::Attribute(AttributeError::NameTooLong { length: 32, max: 31, position: 0 }))
        );

        // the long-names flag lifts the limit to 255 bytes
        assert!(Attribute::read(&bytes, 0, true).is_ok());

        let name = "x".repeat(256);
        let bytes = attribute_bytes(&name, "float", &[0; 4]);
        assert!(Attribute::read(&bytes, 0, true).is_err());
    }

    #[test]
    fn typed_decoding_checks_type_and_size() {
        let bytes = attribute_bytes("dataWindow", "box2i", &[0; 16]);
        let (attribute, _) = Attribute::read(&bytes, 0, false).unwrap();

        assert!(attribute.decode_box2i(&bytes).is_ok());

        assert_eq!(
            attribute.decode_f32(&bytes),
            Err(Error::Attribute(AttributeError::TypeMismatch { expected: type_names::F32, position: 0 }))
        );

        let bytes = attribute_bytes("dataWindow", "box2i", &[0; 12]);
        let (attribute, _) = Attribute::read(&bytes, 0, false).unwrap();

        assert!(matches!(
            attribute.decode_box2i(&bytes),
            Err(Error::Attribute(AttributeError::SizeMismatch { expected: 16, found: 12, .. }))
        ));
    }

    #[test]
    fn decode_dispatches_on_the_type_name() {
        let bytes = attribute_bytes("lineOrder", "lineOrder", &[1]);
        let (attribute, _) = Attribute::read(&bytes, 0, false).unwrap();
        assert_eq!(attribute.decode(&bytes).unwrap(), AttributeValue::LineOrder(LineOrder::Decreasing));

        let bytes = attribute_bytes("comments", "string", b"hello");
        let (attribute, _) = Attribute::read(&bytes, 0, false).unwrap();

        match attribute.decode(&bytes).unwrap() {
            AttributeValue::Custom { kind, value } => {
                assert!(kind.eq("string"));
                assert_eq!(value.of(&bytes), b"hello");
            }
            other => panic!("expected a custom value, found {:?}", other),
        }
    }

    #[test]
    fn decode_box2i_components() {
        let mut value = Vec::new();
        for number in [0_i32, -3, 1919, 1079] {
            value.extend_from_slice(&number.to_le_bytes());
        }

        let bytes = attribute_bytes("dataWindow", "box2i", &value);
        let (attribute, _) = Attribute::read(&bytes, 0, false).unwrap();
        let bounds = attribute.decode_box2i(&bytes).unwrap();

        assert_eq!(bounds.min, Vec2(0, -3));
        assert_eq!(bounds.max, Vec2(1919, 1079));
    }

    #[test]
    fn byte_coded_enums_reject_undocumented_values() {
        let bytes = [10_u8];
        assert_eq!(
            Compression::read(&bytes, 0),
            Err(Error::Data(DataError::InvalidEnumValue { value: 10, position: 0 }))
        );

        let bytes = [3_u8];
        assert_eq!(
            LineOrder::read(&bytes, 0),
            Err(Error::Data(DataError::InvalidEnumValue { value: 3, position: 0 }))
        );

        assert_eq!(Compression::read(&[9], 0).unwrap(), Compression::DWAB);
        assert_eq!(LineOrder::read(&[2], 0).unwrap(), LineOrder::Unspecified);
    }

    #[test]
    fn channel_list_preserves_file_order() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&channel_bytes("A", 2, (1, 1)));
        bytes.extend_from_slice(&channel_bytes("B", 2, (1, 1)));
        bytes.extend_from_slice(&channel_bytes("G", 0, (1, 1)));
        bytes.push(0);

        let (channels, terminator) = ChannelList::read(&bytes, 0).unwrap();

        assert_eq!(terminator, bytes.len() - 1);
        assert_eq!(channels.len(), 3);

        let names: Vec<String> = channels.names().map(Text::to_string).collect();
        assert_eq!(names, ["A", "B", "G"]);

        assert_eq!(channels.list[0].sample_type, SampleType::F32);
        assert_eq!(channels.list[2].sample_type, SampleType::U32);
        assert_eq!(channels.list[0].sampling, Vec2(1, 1));
    }

    #[test]
    fn channel_list_without_terminator_is_rejected() {
        let bytes = channel_bytes("A", 2, (1, 1));
        assert!(ChannelList::read(&bytes, 0).is_err());
    }

    #[test]
    fn attribute_table_walks_the_header_once() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&attribute_bytes("screenWindowWidth", "float", &1.0_f32.to_le_bytes()));
        bytes.extend_from_slice(&attribute_bytes("compression", "compression", &[0]));
        bytes.push(0);

        let table = AttributeTable::read(&bytes, 0, false).unwrap();

        assert_eq!(table.attributes().len(), 2);
        assert_eq!(table.terminator(), bytes.len() - 1);

        let width = table.get(attribute_names::WINDOW_WIDTH).unwrap();
        assert_eq!(width.decode_f32(&bytes).unwrap(), 1.0);

        assert_eq!(
            table.get(attribute_names::DATA_WINDOW),
            Err(Error::Attribute(AttributeError::AttributeNotFound("dataWindow")))
        );
    }

    #[test]
    fn missing_header_terminator_is_detected() {
        let bytes = attribute_bytes("compression", "compression", &[0]);

        assert_eq!(
            AttributeTable::read(&bytes, 0, false),
            Err(Error::Data(DataError::MissingHeaderTerminator { position: bytes.len() }))
        );
    }
}
