//! Writing rendered images to PNG files.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use anyhow::Context as _;
use png::{Encoder, chunk::ChunkType};

use penumbra_base::random::Random;
use penumbra_render::{AlphaMode, Pixmap, quantize};

/// Quantizes `pixmap` with a fresh [`Random`] and writes it to `path` as a PNG file.
pub fn write_pixmap(path: &Path, pixmap: &Pixmap, alpha: AlphaMode) -> Result<(), anyhow::Error> {
    let data = quantize(pixmap, alpha, &mut Random::new());
    let width = u32::try_from(pixmap.width()).context("image too wide for PNG")?;
    let height = u32::try_from(pixmap.height()).context("image too tall for PNG")?;
    write_png(path, width, height, &data)
}

/// Writes 8-bit RGBA pixel data, row by row, to `path` as a PNG file.
///
/// The image is declared to be in the sRGB color space.
pub fn write_png(
    path: &Path,
    width: u32,
    height: u32,
    data: &[[u8; 4]],
) -> Result<(), anyhow::Error> {
    let file = File::create(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    let mut buf_writer = BufWriter::new(file);
    write_png_to(&mut buf_writer, width, height, data)
        .with_context(|| format!("failed to write PNG to {}", path.display()))?;
    let file = buf_writer.into_inner().map_err(io::IntoInnerError::into_error)?;
    file.sync_all()?;
    log::info!("wrote {width}×{height} image to {}", path.display());
    Ok(())
}

fn write_png_to<W: io::Write>(
    writer: W,
    width: u32,
    height: u32,
    data: &[[u8; 4]],
) -> Result<(), png::EncodingError> {
    let mut png_encoder = Encoder::new(writer, width, height);
    png_encoder.set_color(png::ColorType::Rgba);
    png_encoder.set_depth(png::BitDepth::Eight);
    let mut png_writer = png_encoder.write_header()?;
    write_color_metadata(&mut png_writer)?;
    png_writer.write_image_data(data.as_flattened())?;
    png_writer.finish()
}

fn write_color_metadata<W: io::Write>(
    png_writer: &mut png::Writer<W>,
) -> Result<(), png::EncodingError> {
    // Values from http://www.libpng.org/pub/png/spec/1.2/PNG-Chunks.html#C.sRGB

    // Write sRGB chunk (perceptual rendering intent).
    png_writer.write_chunk(ChunkType(*b"sRGB"), &[0])?;
    // Write compatibility gamma information
    png_writer.write_chunk(ChunkType(*b"gAMA"), &45455_u32.to_be_bytes())?;
    // Write compatibility chromaticity information
    png_writer.write_chunk(
        ChunkType(*b"cHRM"),
        &[
            31270, // White Point x
            32900, // White Point y
            64000, // Red x
            33000, // Red y
            30000, // Green x
            60000, // Green y
            15000, // Blue x
            6000,  // Blue y
        ]
        .into_iter()
        .flat_map(u32::to_be_bytes)
        .collect::<Box<[u8]>>(),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn png_round_trip() {
        let data = [[255, 0, 0, 255], [0, 255, 0, 128], [0, 0, 0, 0], [1, 2, 3, 4]];
        let mut bytes = Vec::new();
        write_png_to(&mut bytes, 2, 2, &data).unwrap();

        let mut reader = png::Decoder::new(bytes.as_slice()).read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let frame = reader.next_frame(&mut buf).unwrap();
        assert_eq!(
            (frame.width, frame.height, frame.color_type, frame.bit_depth),
            (2, 2, png::ColorType::Rgba, png::BitDepth::Eight)
        );
        assert_eq!(&buf[..frame.buffer_size()], data.as_flattened());
    }

    #[test]
    fn wrong_data_length_is_an_error() {
        let mut bytes = Vec::new();
        write_png_to(&mut bytes, 2, 2, &[[0; 4]; 3]).unwrap_err();
    }
}
