//! Main Program for Retile
//! Run with `--help` for more instruction

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

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use retile::{ordering, ConfigBuilder};

/// Rearrange the tiles of an image.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input file
    input: PathBuf,

    /// Output file
    #[arg(short = 'o', long, required_unless_present = "check")]
    output: Option<PathBuf>,

    /// Tile size, as `N` or `WIDTHxHEIGHT`
    #[arg(short = 't', long, value_parser = parse_tile_size)]
    tile_size: (usize, usize),

    /// Comma separated source tile for each destination tile (row-major)
    #[arg(long, value_delimiter = ',', required_unless_present = "shuffle")]
    ordering: Vec<usize>,

    /// Generate a random ordering
    #[arg(long, conflicts_with = "ordering")]
    shuffle: bool,

    /// Random seed
    #[arg(long, requires = "shuffle")]
    seed: Option<String>,

    /// Apply the inverse ordering (undo a rearrangement)
    #[arg(long)]
    invert: bool,

    /// Only check that the arrangement is valid
    #[arg(long)]
    check: bool,

    /// Do not use multiple threads
    #[arg(long)]
    single_thread: bool,

    /// Verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn parse_tile_size(s: &str) -> Result<(usize, usize), String> {
    let parse = |v: &str| {
        v.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid tile size {v:?}: {e}"))
    };

    match s.split_once(['x', 'X']) {
        Some((w, h)) => Ok((parse(w)?, parse(h)?)),
        None => {
            let n = parse(s)?;
            Ok((n, n))
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("retile={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match run(args) {
        Ok(order) => {
            println!(
                "{}",
                order
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns the ordering that was applied.
fn run(args: Args) -> Result<Vec<usize>> {
    let (width, height) = retile::image_size(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    debug!("{} is {width}x{height}", args.input.display());

    let mut order = if args.shuffle {
        let Some(n) = retile::tile_count((width, height), args.tile_size) else {
            bail!(retile::Error::InvalidArrangement);
        };
        ordering::random(n, &mut ordering::seeded_rng(args.seed.as_deref()))
    } else {
        args.ordering
    };
    if args.invert {
        order = match ordering::inverse(&order) {
            Some(v) => v,
            None => bail!(retile::Error::InvalidArrangement),
        };
    }

    if !retile::is_valid((width, height), args.tile_size, &order) {
        bail!(retile::Error::InvalidArrangement);
    }

    let Some(output) = args.output.filter(|_| !args.check) else {
        debug!("Check only, nothing written");
        return Ok(order);
    };

    let config = ConfigBuilder::new().parallel(!args.single_thread).build();
    retile::rearrange_tiles_with(&config, &args.input, args.tile_size, &order, &output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    Ok(order)
}
