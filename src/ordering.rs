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

//! Helpers to build orderings.

use rand::prelude::*;
use rand_xoshiro::Xoshiro256StarStar;
use sha2::{Digest, Sha256};

use crate::validate::is_permutation;

/// Ordering that leaves every tile in place.
pub fn identity(n: usize) -> Vec<usize> {
    (0..n).collect()
}

/// Inverse permutation, such that applying `ordering` and then
/// its inverse restores the original image.
///
/// Returns `None` if `ordering` is not a permutation.
pub fn inverse(ordering: &[usize]) -> Option<Vec<usize>> {
    if !is_permutation(ordering) {
        return None;
    }

    let mut ret = vec![0; ordering.len()];
    for (i, &j) in ordering.iter().enumerate() {
        ret[j] = i;
    }
    Some(ret)
}

/// Random number generator for [random].
///
/// With a seed, the generator is keyed by SHA-256 of it,
/// so the same seed always yields the same ordering.
pub fn seeded_rng(seed: Option<&str>) -> Xoshiro256StarStar {
    match seed {
        Some(seed) => {
            let mut hasher = Sha256::new();
            hasher.update(seed);

            Xoshiro256StarStar::from_seed(hasher.finalize().into())
        }
        None => Xoshiro256StarStar::from_entropy(),
    }
}

/// Uniformly random ordering of `n` tiles.
pub fn random<R: Rng + ?Sized>(n: usize, random: &mut R) -> Vec<usize> {
    let mut ret = identity(n);
    ret.shuffle(random);
    ret
}
