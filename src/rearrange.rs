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

use ndarray::prelude::*;
use rayon::prelude::*;
use tracing::debug;

use crate::error::{Error, Result};
use crate::validate::is_valid;

/// Rearrangement configuration.
#[derive(Debug, Clone)]
pub struct Config {
    parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Builder for [Config].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill tile bands in the rayon thread pool (default `true`).
    pub fn parallel(mut self, v: bool) -> Self {
        self.config.parallel = v;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

/// Tile grid over a standard-layout `(height, width, channels)` buffer.
///
/// Slots are numbered row-major: `row * cols + col`.
/// Does not check divisibility, use [is_valid] first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    pub rows: usize,
    pub cols: usize,
    pub tile_width: usize,
    pub tile_height: usize,
    pub channels: usize,
    width: usize,
}

impl TileGrid {
    pub fn new(
        (width, height): (usize, usize),
        (tile_width, tile_height): (usize, usize),
        channels: usize,
    ) -> Self {
        Self {
            rows: height / tile_height,
            cols: width / tile_width,
            tile_width,
            tile_height,
            channels,
            width,
        }
    }

    pub fn count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn slot(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Pixel coordinate `(y, x)` of the top-left corner of a slot.
    pub fn origin(&self, slot: usize) -> (usize, usize) {
        (
            (slot / self.cols) * self.tile_height,
            (slot % self.cols) * self.tile_width,
        )
    }

    /// Elements in one image row.
    pub fn row_len(&self) -> usize {
        self.width * self.channels
    }

    /// Elements in one line of a tile.
    pub fn span(&self) -> usize {
        self.tile_width * self.channels
    }

    /// Elements in one row of tiles.
    pub fn band_len(&self) -> usize {
        self.tile_height * self.row_len()
    }

    /// Offset of line `dy` of tile `slot` in the flat buffer.
    pub fn offset(&self, slot: usize, dy: usize) -> usize {
        let (y, x) = self.origin(slot);
        (y + dy) * self.row_len() + x * self.channels
    }
}

/// Fills one row of destination tiles.
fn fill_band<A: Copy>(
    band: &mut [A],
    row: usize,
    src: &[A],
    grid: &TileGrid,
    ordering: &[usize],
) {
    let span = grid.span();
    let row_len = grid.row_len();

    for col in 0..grid.cols {
        let from = ordering[grid.slot(row, col)];
        for dy in 0..grid.tile_height {
            let s = grid.offset(from, dy);
            let d = dy * row_len + col * span;
            band[d..d + span].copy_from_slice(&src[s..s + span]);
        }
    }
}

/// Rearranges tiles of an array.
///
/// Output tile at slot `i` is a copy of input tile at slot `ordering[i]`.
///
/// Parameters:
/// * `arr` : Input array view with shape `(height, width, channels)`.
///   Any memory layout is accepted.
/// * `tile_size` : Tile `(width, height)`.
/// * `ordering` : Source slot for each destination slot.
/// * `config` : Configuration, see [ConfigBuilder].
///
/// Returns [Error::InvalidArrangement] if [is_valid] fails for the
/// array size. Nothing is allocated in that case.
pub fn rearrange<A>(
    arr: ArrayView3<'_, A>,
    tile_size: (usize, usize),
    ordering: &[usize],
    config: &Config,
) -> Result<Array3<A>>
where
    A: Copy + Send + Sync,
{
    let (height, width, channels) = arr.dim();
    if !is_valid((width, height), tile_size, ordering) {
        return Err(Error::InvalidArrangement);
    }

    let grid = TileGrid::new((width, height), tile_size, channels);
    debug!(
        "Tile grid {}x{} of {}x{} tiles, {} channels",
        grid.cols, grid.rows, grid.tile_width, grid.tile_height, grid.channels,
    );

    let arr = arr.as_standard_layout();
    let src = arr.as_slice().expect("Should be standard-layout");
    let mut out = src.to_vec();

    if !out.is_empty() {
        let band_len = grid.band_len();
        let grid = &grid;
        if config.parallel {
            out.par_chunks_mut(band_len)
                .enumerate()
                .for_each(|(row, band)| fill_band(band, row, src, grid, ordering));
        } else {
            out.chunks_mut(band_len)
                .enumerate()
                .for_each(|(row, band)| fill_band(band, row, src, grid, ordering));
        }
    }

    Ok(Array3::from_shape_vec((height, width, channels), out)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::ordering::{inverse, random, seeded_rng};

    fn sample(height: usize, width: usize, channels: usize) -> Array3<u8> {
        Array3::from_shape_fn((height, width, channels), |(y, x, c)| {
            (y * 31 + x * 7 + c * 101) as u8
        })
    }

    fn tile(arr: &Array3<u8>, grid: &TileGrid, slot: usize) -> Array3<u8> {
        let (y, x) = grid.origin(slot);
        arr.slice(s![y..y + grid.tile_height, x..x + grid.tile_width, ..])
            .to_owned()
    }

    #[test]
    fn test_tile_content() {
        // Four 2x2 tiles holding A, B, C, D.
        let arr = Array3::from_shape_fn((4, 4, 1), |(y, x, _)| match (y / 2, x / 2) {
            (0, 0) => b'A',
            (0, 1) => b'B',
            (1, 0) => b'C',
            _ => b'D',
        });

        let out = rearrange(arr.view(), (2, 2), &[3, 2, 1, 0], &Config::default()).unwrap();
        let grid = TileGrid::new((4, 4), (2, 2), 1);
        for (slot, v) in [b'D', b'C', b'B', b'A'].into_iter().enumerate() {
            assert_eq!(tile(&out, &grid, slot), Array3::from_elem((2, 2, 1), v));
        }
    }

    #[test]
    fn test_tile_integrity_multichannel() {
        let arr = sample(6, 12, 3);
        let grid = TileGrid::new((12, 6), (4, 3), 3);
        let ordering = random(grid.count(), &mut seeded_rng(Some("integrity")));

        let out = rearrange(arr.view(), (4, 3), &ordering, &Config::default()).unwrap();
        assert_eq!(out.dim(), arr.dim());
        for (i, &j) in ordering.iter().enumerate() {
            assert_eq!(tile(&out, &grid, i), tile(&arr, &grid, j), "slot {i}");
        }
    }

    #[test]
    fn test_identity() {
        for &(w, h, tw, th) in &[(8, 8, 2, 2), (8, 6, 4, 3), (5, 7, 5, 7), (9, 3, 1, 1)] {
            let arr = sample(h, w, 4);
            let n = (w / tw) * (h / th);
            let ordering: Vec<_> = (0..n).collect();
            let out = rearrange(arr.view(), (tw, th), &ordering, &Config::default()).unwrap();
            assert_eq!(out, arr);
        }
    }

    #[test]
    fn test_round_trip() {
        let arr = sample(16, 24, 2);
        let ordering = random(4 * 8, &mut seeded_rng(Some("round trip")));
        let inv = inverse(&ordering).unwrap();

        let config = Config::default();
        let shuffled = rearrange(arr.view(), (3, 4), &ordering, &config).unwrap();
        assert_ne!(shuffled, arr);
        let restored = rearrange(shuffled.view(), (3, 4), &inv, &config).unwrap();
        assert_eq!(restored, arr);
    }

    #[test]
    fn test_gather_not_scatter() {
        // 3-cycle: scatter and gather disagree.
        let arr = Array3::from_shape_fn((1, 3, 1), |(_, x, _)| x as u8);
        let out = rearrange(arr.view(), (1, 1), &[1, 2, 0], &Config::default()).unwrap();
        assert_eq!(out.as_slice().unwrap(), &[1, 2, 0]);
    }

    #[test]
    fn test_single_row_and_column() {
        let arr = sample(2, 8, 1);
        let out = rearrange(arr.view(), (2, 2), &[3, 2, 1, 0], &Config::default()).unwrap();
        assert_eq!(out.slice(s![.., 0..2, ..]), arr.slice(s![.., 6..8, ..]));
        assert_eq!(out.slice(s![.., 6..8, ..]), arr.slice(s![.., 0..2, ..]));

        let arr = sample(8, 2, 1);
        let out = rearrange(arr.view(), (2, 2), &[1, 0, 3, 2], &Config::default()).unwrap();
        assert_eq!(out.slice(s![0..2, .., ..]), arr.slice(s![2..4, .., ..]));
        assert_eq!(out.slice(s![6..8, .., ..]), arr.slice(s![4..6, .., ..]));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let arr = sample(64, 48, 3);
        let ordering = random(16 * 6, &mut seeded_rng(Some("parallel")));

        let par = ConfigBuilder::new().parallel(true).build();
        let seq = ConfigBuilder::new().parallel(false).build();
        assert_eq!(
            rearrange(arr.view(), (8, 4), &ordering, &par).unwrap(),
            rearrange(arr.view(), (8, 4), &ordering, &seq).unwrap(),
        );
    }

    #[test]
    fn test_non_standard_layout() {
        // Transposed view: shape (4, 6, 1) with swapped strides.
        let base = sample(6, 4, 1);
        let view = base.view().permuted_axes([1, 0, 2]);
        assert!(!view.is_standard_layout());

        let ordering = [5, 4, 3, 2, 1, 0];
        let out = rearrange(view, (2, 2), &ordering, &Config::default()).unwrap();
        let expected = rearrange(view.to_owned().view(), (2, 2), &ordering, &Config::default())
            .unwrap();
        assert_eq!(out, expected);
        assert_eq!(out.slice(s![0..2, 0..2, ..]), view.slice(s![2..4, 4..6, ..]));
    }

    #[test]
    fn test_invalid() {
        let arr = sample(4, 4, 1);
        let config = Config::default();
        for (tile, ordering) in [
            ((2, 2), vec![0, 1, 2, 4]),
            ((2, 2), vec![0, 1, 2]),
            ((2, 2), vec![0, 0, 2, 3]),
            ((3, 3), vec![0]),
            ((0, 2), vec![]),
        ] {
            let err = rearrange(arr.view(), tile, &ordering, &config).unwrap_err();
            assert!(matches!(err, Error::InvalidArrangement));
            assert_eq!(
                err.to_string(),
                "The tile size or ordering are not valid for the given image."
            );
        }
    }

    #[test]
    fn test_empty() {
        let arr = Array3::<u8>::zeros((0, 0, 3));
        let out = rearrange(arr.view(), (2, 2), &[], &Config::default()).unwrap();
        assert_eq!(out.dim(), (0, 0, 3));
    }

    #[test]
    fn test_grid_offsets() {
        let grid = TileGrid::new((6, 4), (3, 2), 2);
        assert_eq!((grid.rows, grid.cols), (2, 2));
        assert_eq!(grid.count(), 4);
        assert_eq!(grid.slot(1, 0), 2);
        assert_eq!(grid.origin(3), (2, 3));
        assert_eq!(grid.offset(0, 0), 0);
        assert_eq!(grid.offset(1, 1), 12 + 6);
        assert_eq!(grid.offset(3, 1), 3 * 12 + 6);
    }
}
