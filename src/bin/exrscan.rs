
//! Command line inspector: decodes an exr file and renders
//! everything that was found, together with its byte locations.

use std::fmt::Display;
use std::path::PathBuf;
use std::process::exit;

use clap::Parser;

use exrscan::prelude::*;

/// Inspect an uncompressed scan line exr file.
#[derive(Parser)]
#[command(version, about)]
struct Args {

    /// Path of the exr file to inspect.
    file: PathBuf,

    /// Interpret channel samples as 32-bit unsigned integers
    /// instead of 32-bit floats.
    #[arg(long)]
    uint: bool,

    /// Also print every decoded sample value.
    #[arg(long)]
    pixels: bool,
}

fn main() {
    let args = Args::parse();

    let bytes = match std::fs::read(&args.file) {
        Ok(bytes) => bytes,
        Err(error) => {
            eprintln!("cannot read {}: {}", args.file.display(), error);
            exit(1);
        }
    };

    println!("file: {}", args.file.display());
    println!("size: {} bytes = {:.3} KB = {:.6} MB", bytes.len(), bytes.len() as f64 / 1024.0, bytes.len() as f64 / 1024.0 / 1024.0);
    println!();

    let result =
        if args.uint { inspect::<u32>(&bytes, args.pixels) }
        else { inspect::<f32>(&bytes, args.pixels) };

    if let Err(error) = result {
        eprintln!("error: {}", error);
        exit(1);
    }
}

fn inspect<S: Sample + Display>(bytes: &[u8], print_pixels: bool) -> UnitResult {
    let image = Image::<S>::decode(bytes)?;

    render_version(&image.requirements);
    render_header(bytes, &image.header);

    match &image.contents {
        Contents::Skipped(feature) => {
            println!("pixel section skipped: {}", feature);
            println!();
        }

        Contents::Decoded { offset_table, pixels } => {
            render_offset_table(offset_table);
            render_pixels(pixels, print_pixels);

            let decoded = image.decoded_byte_len();
            if decoded == bytes.len() {
                println!("end of file reached");
            }
            else {
                println!("warning: the file contains {} bytes after the decoded data", bytes.len() - decoded);
            }

            println!();
        }
    }

    render_summary(&image);
    Ok(())
}

fn render_version(requirements: &Requirements) {
    println!("-------- magic number & version field --------");
    println!("[0x0000 ~ 0x0003] magic number  = 0x{:08X} (valid exr)", exrscan::meta::magic_number::VALUE);
    println!("[0x0004 ~ 0x0007] version field = 0x{:08X}", requirements.version_field());
    println!("    version number ............. {}", requirements.file_format_version);
    println!("    bit  9 single-part tiled ... {}", requirements.is_single_layer_and_tiled);
    println!("    bit 10 long names .......... {}", requirements.has_long_names);
    println!("    bit 11 deep data ........... {}", requirements.has_deep_data);
    println!("    bit 12 multiple parts ...... {}", requirements.has_multiple_layers);

    if !requirements.is_documented_combination() {
        println!("    warning: the flag bits are not one of the documented combinations");
    }

    println!();
}

fn render_header(bytes: &[u8], header: &Header) {
    println!("-------- header attributes --------");

    for attribute in header.attributes.attributes() {
        println!("[0x{:04X} ~ 0x{:04X}] attribute:", attribute.position, attribute.value.last());
        println!("    name ......... {:?}", attribute.name);
        println!("    type ......... {:?}", attribute.kind);
        println!("    value size ... {} bytes", attribute.declared_size);
        println!("    [{}] value:", span(attribute.value));

        match attribute.decode(bytes) {
            Ok(value) => render_value(&value, bytes),
            Err(error) => println!("        not decoded: {}", error),
        }
    }

    println!("[0x{:04X}] byte = 0x00 (end of header section)", header.terminator());
    println!();
}

fn render_value(value: &AttributeValue, bytes: &[u8]) {
    match value {
        AttributeValue::Box2i(bounds) => {
            println!("        x_min = {}, y_min = {}, x_max = {}, y_max = {}",
                bounds.min.x(), bounds.min.y(), bounds.max.x(), bounds.max.y());
        }

        AttributeValue::Compression(compression) =>
            println!("        {}", compression),

        AttributeValue::LineOrder(line_order) =>
            println!("        {}", line_order),

        AttributeValue::F32(value) =>
            println!("        {}", value),

        AttributeValue::F32Vec2(vector) =>
            println!("        [{}, {}]", vector.x(), vector.y()),

        AttributeValue::ChannelList(channels) => {
            for channel in &channels.list {
                println!("        channel {:?} {}, linear = {}, sampling = {} x {}",
                    channel.name, channel.sample_type,
                    channel.quantize_linearly,
                    channel.sampling.x(), channel.sampling.y());
            }
        }

        AttributeValue::Custom { kind, value } =>
            println!("        {} bytes of undecoded type {:?}", value.of(bytes).len(), kind),
    }
}

fn render_offset_table(table: &OffsetTable) {
    println!("-------- offset table --------");

    for (index, entry) in table.entries.iter().enumerate() {
        println!("entry {}: [{}] offset = {} = 0x{:X}", index, span(entry.span), entry.offset, entry.offset);
    }

    println!();
}

fn render_pixels<S: Sample + Display>(pixels: &PixelData<S>, print_pixels: bool) {
    println!("-------- pixel data --------");

    for (row, scanline) in pixels.scanlines.iter().enumerate() {
        println!("scanline {}: [{}] y = {}, declared size = {} bytes",
            row, span(scanline.span), scanline.y, scanline.declared_size);

        if print_pixels {
            for (name, group) in pixels.channel_names().iter().zip(&scanline.groups) {
                let samples: Vec<String> = group.iter().map(S::to_string).collect();
                println!("    {:?}: {}", name, samples.join(", "));
            }
        }
    }

    println!();
}

fn render_summary<S: Sample>(image: &Image<S>) {
    let header = &image.header;

    println!("-------- summary --------");
    println!("size ................. {} x {}", header.columns(), header.rows());

    println!("channels (in storage order):");
    for channel in &header.channels.list {
        println!("    {:?}, {}", channel.name, user_sample_type_name(channel.sample_type));
    }

    println!("compression .......... {}", header.compression);
    println!("line order ........... {}", header.line_order);
    println!("screen window width .. {}", header.screen_window_width);

    if let Some(pixel_aspect) = header.pixel_aspect {
        println!("pixel aspect ratio ... {:.6}", pixel_aspect);
    }

    if let Some(x_density) = header.x_density {
        println!("pixel density ........ {:.6} pixels per inch", x_density);
    }

    println!("openexr version ...... {}", image.requirements.file_format_version);
}

fn user_sample_type_name(sample_type: SampleType) -> &'static str {
    match sample_type {
        SampleType::U32 => "32-bit unsigned integer",
        SampleType::F16 => "16-bit floating point",
        SampleType::F32 => "32-bit floating point",
    }
}

fn span(span: ByteSpan) -> String {
    format!("0x{:04X} ~ 0x{:04X}", span.first(), span.last())
}
