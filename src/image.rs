
//! Scan line pixel data and the top-level image decoder.
//!
//! Pixel decoding is generic over the sample interpretation:
//! every channel stores four bytes per sample, which the caller
//! chooses to read either as `u32` or as `f32`.

use crate::chunks::OffsetTable;
use crate::error::{DataError, Result, UnsupportedFeature};
use crate::io::{ByteSpan, Scalar};
use crate::math::Vec2;
use crate::meta::attribute::{Compression, LineOrder, SampleType, Text};
use crate::meta::{Header, Requirements};

/// A sample interpretation for pixel decoding.
/// The file stores four bytes per sample, read either as `u32` or as `f32`.
pub trait Sample: Scalar {}

impl Sample for u32 {}
impl Sample for f32 {}


/// One decoded scan line: the stored coordinates and sizes,
/// and one group of samples per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Scanline<S> {

    /// The y coordinate stored in the file.
    pub y: i32,

    /// The size in bytes the file declares for the sample data of this line.
    pub declared_size: i32,

    /// Where the complete scan line record is stored.
    pub span: ByteSpan,

    /// The sample groups, one per channel, in channel list order.
    /// Each group holds one sample per pixel column.
    pub groups: Vec<Vec<S>>,
}

impl<S: Sample> Scanline<S> {

    /// Decode one scan line record at `position`:
    /// four bytes y coordinate, four bytes declared size,
    /// then `channel_count` groups of `columns` samples each.
    pub fn read(bytes: &[u8], position: usize, columns: usize, channel_count: usize) -> Result<Self> {
        let y = i32::read_from(bytes, position)?;
        let declared_size = i32::read_from(bytes, position + i32::BYTE_SIZE)?;

        let mut cursor = position + 2 * i32::BYTE_SIZE;
        let mut groups = Vec::with_capacity(channel_count);

        for _ in 0 .. channel_count {
            // the column count stems from the data window and may be absurd,
            // so never allocate it all up front
            let mut group = Vec::with_capacity(columns.min(1024));

            for _ in 0 .. columns {
                group.push(S::read_from(bytes, cursor)?);
                cursor += S::BYTE_SIZE;
            }

            groups.push(group);
        }

        let span = ByteSpan::new(bytes, position, cursor - position)?;
        Ok(Scanline { y, declared_size, span, groups })
    }
}


/// All decoded scan lines, plus the channel names their groups map to.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelData<S> {

    /// The decoded scan lines, in file order.
    pub scanlines: Vec<Scanline<S>>,

    channel_names: Vec<Text>,
    columns: usize,
}

impl<S: Sample> PixelData<S> {

    /// Decode `rows` consecutive scan line records starting at `start`,
    /// validating the stored y coordinate of each record
    /// against the declared line order.
    pub fn read(
        bytes: &[u8], start: usize,
        rows: usize, columns: usize,
        channel_names: Vec<Text>, line_order: LineOrder,
    ) -> Result<Self>
    {
        let mut scanlines = Vec::with_capacity(rows.min(1024));
        let mut position = start;

        for row in 0 .. rows {
            let scanline = Scanline::read(bytes, position, columns, channel_names.len())?;

            let expected = match line_order {
                LineOrder::Increasing => scanline.y == row as i32,
                LineOrder::Decreasing => scanline.y == (rows - 1 - row) as i32,
                LineOrder::Unspecified => scanline.y >= 0 && (scanline.y as usize) < rows,
            };

            if !expected {
                return Err(DataError::ScanlineOrderMismatch { row, found_y: scanline.y }.into());
            }

            position = scanline.span.end();
            scanlines.push(scanline);
        }

        Ok(PixelData { scanlines, channel_names, columns })
    }

    /// Number of decoded pixel rows.
    pub fn rows(&self) -> usize {
        self.scanlines.len()
    }

    /// Number of pixel columns per row.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// The channel names, in group order.
    pub fn channel_names(&self) -> &[Text] {
        &self.channel_names
    }

    /// The group index of the channel with the specified name, if any.
    pub fn channel_index(&self, name: &str) -> Option<usize> {
        self.channel_names.iter().position(|channel| channel.eq(name))
    }

    /// The sample of one channel group at the specified row and column.
    pub fn sample(&self, row: usize, column: usize, group: usize) -> Option<S> {
        self.scanlines.get(row)?.groups.get(group)?.get(column).copied()
    }

    /// The red, green, blue and alpha samples of one pixel,
    /// resolved by channel name rather than by group position.
    /// Returns `None` when the image does not name all four channels.
    pub fn rgba(&self, row: usize, column: usize) -> Option<[S; 4]> {
        let mut rgba = [S::default(); 4];

        for (slot, name) in ["R", "G", "B", "A"].iter().enumerate() {
            rgba[slot] = self.sample(row, column, self.channel_index(name)?)?;
        }

        Some(rgba)
    }

    /// Index of the first byte after the last scan line, if any were decoded.
    pub fn end(&self) -> Option<usize> {
        self.scanlines.last().map(|scanline| scanline.span.end())
    }
}


/// What was decoded after the header: either the complete pixel section,
/// or nothing, because the file declares a feature outside the decoded subset.
#[derive(Debug, Clone, PartialEq)]
pub enum Contents<S> {

    /// The offset table and pixel data of an uncompressed scan line file.
    Decoded {

        /// The chunk offset table, one entry per scan line.
        offset_table: OffsetTable,

        /// The decoded scan lines.
        pixels: PixelData<S>,
    },

    /// The pixel section was not attempted.
    /// Contains the first feature that prevented it.
    Skipped(UnsupportedFeature),
}

impl<S> Contents<S> {

    /// The decoded pixel section,
    /// or the feature that prevented decoding it, as an error.
    pub fn decoded(&self) -> Result<(&OffsetTable, &PixelData<S>)> {
        match self {
            Contents::Decoded { offset_table, pixels } => Ok((offset_table, pixels)),
            Contents::Skipped(feature) => Err((*feature).into()),
        }
    }
}


/// A decoded exr file: the version field requirements, the header,
/// and, for files inside the decoded subset, the pixel section.
///
/// Produced by a single forward pass over the buffer.
/// Nothing borrows the buffer afterwards; all decoded values are owned.
#[derive(Debug, Clone, PartialEq)]
pub struct Image<S> {

    /// The decoded version field.
    pub requirements: Requirements,

    /// The decoded header section.
    pub header: Header,

    /// The pixel section, or the reason it was skipped.
    pub contents: Contents<S>,
}

impl<S: Sample> Image<S> {

    /// Decode an exr file from memory in one forward pass.
    ///
    /// The sample parameter chooses whether channel data
    /// is interpreted as `u32` or as `f32`.
    /// Files outside the decoded subset still produce their header,
    /// with the offending feature recorded in `contents`.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let requirements = Requirements::read(bytes)?;
        let header = Header::read(bytes, &requirements)?;

        let contents = match pixel_section_gate(&requirements, &header) {
            Some(feature) => Contents::Skipped(feature),

            None => {
                let table_start = header.terminator() + 1;
                let chunk_count = header.chunk_count();
                let offset_table = OffsetTable::read(bytes, table_start, chunk_count)?;

                let pixels_start = table_start + chunk_count * u64::BYTE_SIZE;
                let channel_names = header.channels.names().cloned().collect();

                let pixels = PixelData::read(
                    bytes, pixels_start,
                    header.rows(), header.columns(),
                    channel_names, header.line_order,
                )?;

                Contents::Decoded { offset_table, pixels }
            }
        };

        Ok(Image { requirements, header, contents })
    }

    /// Index of the first byte after everything that was decoded.
    /// Smaller than the buffer length if the file contains trailing bytes.
    pub fn decoded_byte_len(&self) -> usize {
        match &self.contents {
            Contents::Decoded { pixels, .. } =>
                pixels.end().unwrap_or(self.header.terminator() + 1),

            Contents::Skipped(_) =>
                self.header.terminator() + 1,
        }
    }
}

/// The first feature that prevents decoding the pixel section, if any.
fn pixel_section_gate(requirements: &Requirements, header: &Header) -> Option<UnsupportedFeature> {
    if let Some(feature) = requirements.unsupported_feature() {
        return Some(feature);
    }

    if header.compression != Compression::Uncompressed {
        return Some(UnsupportedFeature::CompressedData);
    }

    // the row and column counts are derived from the window maximum,
    // which requires the window to be anchored at the origin
    if header.data_window.min != Vec2(0, 0) {
        return Some(UnsupportedFeature::NonZeroDataWindowOrigin);
    }

    for channel in &header.channels.list {
        if channel.sample_type == SampleType::F16 {
            return Some(UnsupportedFeature::HalfFloatData);
        }

        if channel.sampling != Vec2(1, 1) {
            return Some(UnsupportedFeature::Subsampling);
        }
    }

    None
}
