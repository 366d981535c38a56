//! Library to rearrange tiles of an image/array.
//!
//! An image is cut into a grid of equally sized tiles, numbered row-major.
//! An ordering then names, for each destination slot, which source tile
//! fills it. The main functions are:
//!
//! * [is_valid] checks that a tile size and ordering describe a lossless
//!   rearrangement (tiles divide the image, ordering is a permutation).
//! * [rearrange()] performs the rearrangement on an array.
//! * [rearrange_tiles] does the same on image files, and
//!   [rearrange_tiles_with] with a custom [Config].
//!
//! Applying an ordering and then its [inverse](ordering::inverse)
//! restores the original image.

// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//

mod error;
pub mod io;
pub mod ordering;
mod rearrange;
mod validate;

#[doc(inline)]
pub use crate::error::{Error, Result};
#[doc(inline)]
pub use crate::io::{
    image_size, load_image, rearrange_tiles, rearrange_tiles_with, save_image, Image,
};
#[doc(inline)]
pub use crate::rearrange::{rearrange, Config, ConfigBuilder, TileGrid};
#[doc(inline)]
pub use crate::validate::{divmod, is_permutation, is_valid, prod, tile_count};
