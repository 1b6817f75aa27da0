
//! Builders for hand-made exr byte buffers.
//! The crate deliberately has no write path,
//! so the tests assemble the byte layout manually.

// each integration test binary uses a different subset of these helpers
#![allow(dead_code)]

/// Number of pixel rows of the built files.
pub const ROWS: usize = 2;

/// Number of pixel columns of the built files.
pub const COLUMNS: usize = 2;

/// Number of channels of the built files.
pub const CHANNELS: usize = 4;

/// The magic number followed by the given version field.
pub fn magic_and_version(version_field: u32) -> Vec<u8> {
    let mut bytes = vec![0x76, 0x2f, 0x31, 0x01];
    bytes.extend_from_slice(&version_field.to_le_bytes());
    bytes
}

/// One framed attribute: name, type name, size, value.
pub fn attribute(name: &str, kind: &str, value: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(name.as_bytes());
    bytes.push(0);
    bytes.extend_from_slice(kind.as_bytes());
    bytes.push(0);
    bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
    bytes.extend_from_slice(value);
    bytes
}

/// One channel record with the given sampling rates.
pub fn channel_sampled(name: &str, sample_type: i32, sampling: (i32, i32)) -> Vec<u8> {
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

/// One channel record with 1 x 1 sampling.
pub fn channel(name: &str, sample_type: i32) -> Vec<u8> {
    channel_sampled(name, sample_type, (1, 1))
}

/// A complete `chlist` value with channels A, B, G, R, including the terminator.
pub fn channels_abgr(sample_type: i32) -> Vec<u8> {
    let mut bytes = Vec::new();
    for name in ["A", "B", "G", "R"] {
        bytes.extend_from_slice(&channel(name, sample_type));
    }
    bytes.push(0);
    bytes
}

/// A `box2i` value.
pub fn box2i(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Vec<u8> {
    let mut bytes = Vec::new();
    for component in [x_min, y_min, x_max, y_max] {
        bytes.extend_from_slice(&component.to_le_bytes());
    }
    bytes
}

/// Consecutive little-endian floats.
pub fn f32s(values: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for value in values {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// All attributes of a standard header, without the terminator,
/// with the channel list and data window provided by the caller.
pub fn header_attributes(channels_value: &[u8], data_window: &[u8], compression: u8, line_order: u8) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend(attribute("channels", "chlist", channels_value));
    bytes.extend(attribute("compression", "compression", &[compression]));
    bytes.extend(attribute("dataWindow", "box2i", data_window));
    bytes.extend(attribute("displayWindow", "box2i", data_window));
    bytes.extend(attribute("lineOrder", "lineOrder", &[line_order]));
    bytes.extend(attribute("pixelAspectRatio", "float", &f32s(&[1.0])));
    bytes.extend(attribute("screenWindowCenter", "v2f", &f32s(&[0.0, 0.0])));
    bytes.extend(attribute("screenWindowWidth", "float", &f32s(&[1.0])));
    bytes
}

/// The standard header of a 2 x 2 float A, B, G, R file, without the terminator.
pub fn standard_header(compression: u8, line_order: u8) -> Vec<u8> {
    header_attributes(&channels_abgr(2), &box2i(0, 0, 1, 1), compression, line_order)
}

/// The sample stored for channel group `group` at `row` and `column`.
pub fn sample_value(row: usize, group: usize, column: usize) -> f32 {
    (row * 100 + group * 10 + column) as f32
}

/// Append the header terminator, the offset table and the scan line records
/// of a 2 x 2 image. Returns the finished file and the byte positions
/// of the scan line records.
pub fn append_pixel_section(mut bytes: Vec<u8>, line_order: u8) -> (Vec<u8>, Vec<usize>) {
    bytes.push(0); // end of the header section

    let data_size = CHANNELS * COLUMNS * 4;
    let record_len = 8 + data_size;
    let pixels_start = bytes.len() + ROWS * 8;

    let starts: Vec<usize> = (0 .. ROWS)
        .map(|row| pixels_start + row * record_len)
        .collect();

    for &start in &starts {
        bytes.extend_from_slice(&(start as u64).to_le_bytes());
    }

    for row in 0 .. ROWS {
        let y = match line_order {
            1 => (ROWS - 1 - row) as i32,
            _ => row as i32,
        };

        bytes.extend_from_slice(&y.to_le_bytes());
        bytes.extend_from_slice(&(data_size as i32).to_le_bytes());

        for group in 0 .. CHANNELS {
            for column in 0 .. COLUMNS {
                bytes.extend_from_slice(&sample_value(row, group, column).to_le_bytes());
            }
        }
    }

    (bytes, starts)
}

/// A complete 2 x 2 file with the given compression and line order bytes.
pub fn file_with(compression: u8, line_order: u8) -> (Vec<u8>, Vec<usize>) {
    let mut bytes = magic_and_version(2);
    bytes.extend(standard_header(compression, line_order));
    append_pixel_section(bytes, line_order)
}

/// A complete, minimal, uncompressed 2 x 2 float A, B, G, R file.
pub fn minimal_file() -> Vec<u8> {
    file_with(0, 0).0
}
