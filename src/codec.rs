//! Maze grids to and from bytes.
//!
//! Two formats are supported. PNG images where every physical grid position is drawn as a square
//! block of pixels, and JSON nested arrays of `[r, g, b]` triples with one entry per physical
//! position, row major.

use std::fmt;
use std::path::Path;

use error_chain::bail;
use image::{codecs::png::PngEncoder, ColorType, ImageBuffer, ImageEncoder, ImageFormat, RgbImage};
use log::debug;

use crate::errors::*;
use crate::grid::{MazeGrid, CLOSED};
use crate::units::UpscaleFactor;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum MazeFormat {
    Png,
    Json,
}

/// How a grid is written out. The scale only applies to images, pretty printing only to JSON.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Default)]
pub struct EncodeOptions {
    pub scale: UpscaleFactor,
    pub pretty: bool,
}

impl MazeFormat {
    /// The format matching a file's extension, case insensitive.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<MazeFormat> {
        let path = path.as_ref();
        let extension = path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());
        match extension.as_ref().map(|ext| ext.as_str()) {
            Some("png") => Ok(MazeFormat::Png),
            Some("json") => Ok(MazeFormat::Json),
            _ => bail!(ErrorKind::UnknownFormat(path.display().to_string())),
        }
    }

    pub fn encode(&self, grid: &MazeGrid, options: EncodeOptions) -> Result<Vec<u8>> {
        match *self {
            MazeFormat::Png => encode_png(grid, options.scale),
            MazeFormat::Json => encode_json(grid, options.pretty),
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<MazeGrid> {
        match *self {
            MazeFormat::Png => decode_png(bytes),
            MazeFormat::Json => decode_json(bytes),
        }
    }
}

impl fmt::Display for MazeFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MazeFormat::Png => f.write_str("png"),
            MazeFormat::Json => f.write_str("json"),
        }
    }
}

/// Nearest neighbour enlargement, every pixel becomes a `factor x factor` block.
pub fn upscale(image: &RgbImage, factor: UpscaleFactor) -> Result<RgbImage> {
    let UpscaleFactor(f) = factor;
    match f {
        0 => bail!(ErrorKind::InvalidUpscaleFactor(f)),
        1 => Ok(image.clone()),
        _ => {
            let width = image.width().checked_mul(f);
            let height = image.height().checked_mul(f);
            let subpixels = width.zip(height)
                .and_then(|(w, h)| (w as usize).checked_mul(h as usize))
                .and_then(|n| n.checked_mul(3));
            match (width, height, subpixels) {
                (Some(width), Some(height), Some(_)) => Ok(ImageBuffer::from_fn(width, height, |x, y| {
                    *image.get_pixel(x / f, y / f)
                })),
                _ => bail!(ErrorKind::InvalidUpscaleFactor(f)),
            }
        }
    }
}

/// The block size an image was upscaled with.
///
/// The outer wall is always closed so scanning from `(1, 1)`, row by row, the first pixel that is not
/// closed is the top left corner of the first open block and its row is the block size.
/// Returns 1, meaning not scaled, when there is nothing to go on.
pub fn detect_scale_factor(image: &RgbImage) -> u32 {
    for y in 1..image.height() {
        for x in 1..image.width() {
            if *image.get_pixel(x, y) != CLOSED {
                return y;
            }
        }
    }
    1
}

/// Undo `upscale` by sampling the top left pixel of every block.
/// Images without a detectable scale factor come back unchanged.
pub fn downscale(image: &RgbImage) -> RgbImage {
    let f = detect_scale_factor(image);
    if f <= 1 || f > image.width() || f > image.height() {
        return image.clone();
    }
    debug!("downscaling a {} x {} image by {}", image.width(), image.height(), f);
    ImageBuffer::from_fn(image.width() / f, image.height() / f, |x, y| {
        *image.get_pixel(x * f, y * f)
    })
}

/// An 8 bit RGB PNG of the grid, each physical position drawn as a `factor x factor` block.
pub fn encode_png(grid: &MazeGrid, factor: UpscaleFactor) -> Result<Vec<u8>> {
    let image = upscale(grid.image(), factor)?;
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(image.as_raw(), image.width(), image.height(), ColorType::Rgb8)?;
    Ok(bytes)
}

/// Read a PNG back into a grid, detecting and undoing any upscaling.
pub fn decode_png(bytes: &[u8]) -> Result<MazeGrid> {
    let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgb8();
    MazeGrid::from_image(downscale(&image))
}

type PixelRows = Vec<Vec<[u8; 3]>>;

pub fn encode_json(grid: &MazeGrid, pretty: bool) -> Result<Vec<u8>> {
    let image = grid.image();
    let rows: PixelRows = image.rows()
        .map(|row| row.map(|pixel| pixel.0).collect())
        .collect();

    let bytes = if pretty {
        serde_json::to_vec_pretty(&rows)?
    } else {
        serde_json::to_vec(&rows)?
    };
    Ok(bytes)
}

/// Rebuild a grid from nested `[r, g, b]` arrays. Every row must have the same, non zero, length.
pub fn decode_json(bytes: &[u8]) -> Result<MazeGrid> {
    let rows: PixelRows = serde_json::from_slice(bytes)?;

    let width = match rows.first() {
        Some(row) if !row.is_empty() => row.len(),
        _ => bail!(ErrorKind::MalformedGrid(String::from("no pixels"))),
    };
    if let Some((index, row)) = rows.iter().enumerate().find(|&(_, row)| row.len() != width) {
        bail!(ErrorKind::MalformedGrid(format!("row {} has {} pixels, expected {}",
                                               index,
                                               row.len(),
                                               width)));
    }

    let image = ImageBuffer::from_fn(width as u32, rows.len() as u32, |x, y| {
        image::Rgb(rows[y as usize][x as usize])
    });
    MazeGrid::from_image(image)
}
