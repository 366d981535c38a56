// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Image file loading and saving.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::io::Reader as ImageReader;
use image::{save_buffer, ColorType};
use ndarray::prelude::*;
use tracing::info;

use crate::error::Result;
use crate::rearrange::{rearrange, Config};

/// Decoded image.
///
/// Pixels are stored as `(height, width, bytes per pixel)`.
/// Wide channels (16-bit, float) are kept as their raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub pixels: Array3<u8>,
    pub color: ColorType,
}

impl Image {
    pub fn width(&self) -> usize {
        self.pixels.dim().1
    }

    pub fn height(&self) -> usize {
        self.pixels.dim().0
    }

    pub fn channels(&self) -> usize {
        self.pixels.dim().2
    }
}

/// Loads image from file. Format is guessed from content.
pub fn load_image(path: impl AsRef<Path>) -> Result<Image> {
    let im = ImageReader::new(BufReader::new(File::open(path)?))
        .with_guessed_format()?
        .decode()?;

    let color = im.color();
    let shape = (
        im.height() as usize,
        im.width() as usize,
        color.bytes_per_pixel() as usize,
    );
    let pixels = Array3::from_shape_vec(shape, im.into_bytes())?;

    Ok(Image { pixels, color })
}

/// Saves image to file. Format is chosen by extension.
pub fn save_image(im: &Image, path: impl AsRef<Path>) -> Result<()> {
    let pixels = im.pixels.as_standard_layout();
    save_buffer(
        path,
        pixels.as_slice().expect("Should be standard-layout"),
        im.width() as u32,
        im.height() as u32,
        im.color,
    )?;

    Ok(())
}

/// Reads image `(width, height)` without decoding pixel data.
pub fn image_size(path: impl AsRef<Path>) -> Result<(usize, usize)> {
    let (width, height) = ImageReader::open(path)?
        .with_guessed_format()?
        .into_dimensions()?;
    Ok((width as usize, height as usize))
}

/// Rearranges tiles of image file and saves the result.
///
/// Parameters:
/// * `image_path` : Input image.
/// * `tile_size` : Tile `(width, height)`.
/// * `ordering` : Source slot for each destination slot.
/// * `out_path` : Output image.
///
/// The output file is not touched if the arrangement is invalid.
pub fn rearrange_tiles(
    image_path: impl AsRef<Path>,
    tile_size: (usize, usize),
    ordering: &[usize],
    out_path: impl AsRef<Path>,
) -> Result<()> {
    rearrange_tiles_with(
        &Config::default(),
        image_path,
        tile_size,
        ordering,
        out_path,
    )
}

/// Same as [rearrange_tiles], with custom configuration.
pub fn rearrange_tiles_with(
    config: &Config,
    image_path: impl AsRef<Path>,
    tile_size: (usize, usize),
    ordering: &[usize],
    out_path: impl AsRef<Path>,
) -> Result<()> {
    let (image_path, out_path) = (image_path.as_ref(), out_path.as_ref());

    let im = load_image(image_path)?;
    info!(
        "Loaded {} ({}x{}, {} bytes per pixel)",
        image_path.display(),
        im.width(),
        im.height(),
        im.channels(),
    );

    let pixels = rearrange(im.pixels.view(), tile_size, ordering, config)?;
    save_image(
        &Image {
            pixels,
            color: im.color,
        },
        out_path,
    )?;
    info!("Saved {}", out_path.display());

    Ok(())
}
