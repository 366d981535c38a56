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

/// Product of a dimension pair. `None` on overflow.
pub fn prod((a, b): (usize, usize)) -> Option<usize> {
    a.checked_mul(b)
}

/// Quotient and remainder. `None` if `b` is zero.
pub fn divmod(a: usize, b: usize) -> Option<(usize, usize)> {
    (b != 0).then(|| (a / b, a % b))
}

/// Number of tiles covering an image.
///
/// Both sizes are `(width, height)`.
/// Returns `None` if the tile size is zero or does not divide
/// the image on either axis.
pub fn tile_count(image_size: (usize, usize), tile_size: (usize, usize)) -> Option<usize> {
    let (width, height) = image_size;
    let (tile_width, tile_height) = tile_size;

    if tile_width == 0 || tile_height == 0 {
        return None;
    }
    if width % tile_width != 0 || height % tile_height != 0 {
        return None;
    }

    let (tiles, remainder) = divmod(prod(image_size)?, prod(tile_size)?)?;
    (remainder == 0).then_some(tiles)
}

/// Checks that `ordering` is a bijection onto `0..ordering.len()`.
pub fn is_permutation(ordering: &[usize]) -> bool {
    let mut seen = vec![false; ordering.len()];
    for &i in ordering {
        if i >= seen.len() || seen[i] {
            return false;
        }
        seen[i] = true;
    }
    true
}

/// Returns `true` if the tile size and ordering describe a lossless
/// rearrangement of an image with the given size.
///
/// Parameters:
/// * `image_size` : Image `(width, height)`.
/// * `tile_size` : Tile `(width, height)`.
/// * `ordering` : For each destination slot (row-major),
///   the source slot that fills it.
///
/// Never panics. Any malformed input is simply invalid.
pub fn is_valid(image_size: (usize, usize), tile_size: (usize, usize), ordering: &[usize]) -> bool {
    match tile_count(image_size, tile_size) {
        Some(n) => n == ordering.len() && is_permutation(ordering),
        None => false,
    }
}
