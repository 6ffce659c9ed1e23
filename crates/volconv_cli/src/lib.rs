#![forbid(unsafe_code)]
//! Command-line front end: `volconv <input> [grid|ALL] [normalize] [format]`.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};
use volconv::prelude::*;

mod logging;

pub use logging::init_tracing;

/// Convert named sparse grids into dense `.vol` volumes.
#[derive(Parser, Debug)]
#[command(name = "volconv", version, long_about = None)]
pub struct Args {
    /// Grid archive to read, or a `.vol` file with `--inspect`
    pub input: PathBuf,

    /// Grid to convert; `ALL` converts every grid, omitted converts the first one
    pub grid: Option<String>,

    /// Any value enables normalization of the samples to [0,1]
    pub normalize: Option<String>,

    /// Output format: `binary` or `ascii`
    #[arg(default_value = "binary")]
    pub format: String,

    /// Print the header of an existing binary volume instead of converting
    #[arg(long, default_value_t = false)]
    pub inspect: bool,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    pub fn selection(&self) -> GridSelection {
        GridSelection::from_arg(self.grid.as_deref())
    }

    pub fn encoding_options(&self) -> Result<EncodingOptions> {
        let format: VolumeFormat = self.format.parse()?;
        Ok(EncodingOptions::new()
            .with_format(format)
            .with_normalize(self.normalize.is_some()))
    }
}

/// Runs the command. `Ok(false)` means a grid failed and was already reported.
pub fn run(args: &Args) -> Result<bool> {
    debug!("{args:?}");

    if args.inspect {
        inspect(&args.input)?;
        return Ok(true);
    }

    let options = args.encoding_options()?;
    let selection = args.selection();

    let archive = GridArchive::open(&args.input)
        .with_context(|| format!("failed to open grid archive {}", args.input.display()))?;
    let grids = archive.to_grid_set();
    info!(
        "Converting {} from {} ({} grids, {}, normalize={})",
        selection,
        args.input.display(),
        grids.len(),
        options.format,
        options.normalize
    );

    let report = ConversionDriver::new(&grids, &args.input, options).run(&selection);
    for outcome in report.outcomes().iter().filter(|o| o.is_success()) {
        info!("{outcome}");
    }
    if let Some(failure) = report.first_failure() {
        error!("Conversion stopped: {failure}");
    }
    Ok(report.is_success())
}

fn inspect(path: &Path) -> Result<()> {
    let volume =
        read_volume(path).with_context(|| format!("failed to read volume {}", path.display()))?;
    info!(
        "{}: dims {} from {} to {}, {} samples",
        path.display(),
        volume.dims,
        volume.world_min,
        volume.world_max,
        volume.len()
    );
    if let Some(range) = value_range(&volume.values) {
        info!("\tvalues in [{}, {}]", range.min, range.max);
    }
    Ok(())
}
