
//! Decode a documented subset of the OpenEXR format directly from memory:
//! single part, scan lines, no compression, four bytes per sample.
//! Anything outside this subset is detected and reported,
//! never silently mis-decoded.
//!
//! Every decoded structure keeps the byte locations of the data
//! it was read from, which makes this crate suitable for inspecting
//! and validating files without a full codec library.
//! There is no write path.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod io;
pub mod math;
pub mod meta;
pub mod chunks;
pub mod image;


pub mod prelude {

    //! Common imports for decoding a file.

    // main exports
    pub use crate::image::{Contents, Image, PixelData, Sample, Scanline};
    pub use crate::meta::{Header, Requirements};

    // secondary data types
    pub use crate::chunks::OffsetTable;
    pub use crate::error::{Error, Result, UnitResult, UnsupportedFeature};
    pub use crate::io::ByteSpan;
    pub use crate::math::Vec2;
    pub use crate::meta::attribute::{
        Attribute, AttributeValue, Channel, ChannelList,
        Compression, LineOrder, SampleType, Text,
    };
}
