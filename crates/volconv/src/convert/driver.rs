//! Batch driver: picks grids from a container, converts them and names the outputs.
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use super::normalize::apply_normalization;
use super::sampler::sample_grid;
use crate::codec::write_volume;
use crate::container::GridContainer;
use crate::error::{Error, Result};
use crate::grid::ScalarGrid;
use crate::volume::{EncodingOptions, SampleVolume};

/// Token selecting every grid of a container.
pub const ALL_GRIDS: &str = "ALL";

/// Which grids of a container to convert.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GridSelection {
    /// The first grid in enumeration order.
    #[default]
    First,
    /// The grid with this name.
    Named(String),
    /// Every grid, in enumeration order, stopping at the first failure.
    All,
}

impl GridSelection {
    /// Interprets a command-line grid argument: absent or empty picks the first grid,
    /// `ALL` picks every grid, anything else is a grid name.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("") => GridSelection::First,
            Some(ALL_GRIDS) => GridSelection::All,
            Some(name) => GridSelection::Named(name.to_owned()),
        }
    }
}

impl fmt::Display for GridSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridSelection::First => f.write_str("first grid"),
            GridSelection::Named(name) => write!(f, "grid '{name}'"),
            GridSelection::All => f.write_str("all grids"),
        }
    }
}

/// Output path for `grid_name`: the input's extension is replaced by `_<grid_name>.vol`.
pub fn output_path_for(input: &Path, grid_name: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}_{grid_name}.vol"))
}

/// Runs bounds resolution, dense sampling and optional normalization on one grid.
pub fn convert_grid<G: ScalarGrid + ?Sized>(
    grid: &G,
    options: &EncodingOptions,
) -> Result<SampleVolume> {
    let mut volume = sample_grid(grid)?;
    info!(
        "\tGrid Dims: [{}, {}, {}]",
        volume.dims.x, volume.dims.y, volume.dims.z
    );
    info!(
        "\tGrid bbox positions from {} to {}",
        volume.world_min, volume.world_max
    );
    apply_normalization(&mut volume, options.normalize)?;
    Ok(volume)
}

/// Result of converting one grid.
#[derive(Debug)]
pub struct GridOutcome {
    /// Grid name as requested or enumerated.
    pub grid: String,
    /// Output file, `None` when the grid could not be resolved.
    pub output: Option<PathBuf>,
    /// Number of samples written, or the failure.
    pub result: Result<usize>,
}

impl GridOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

impl fmt::Display for GridOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = self
            .output
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_owned());
        match &self.result {
            Ok(n) => write!(f, "grid [{}] -> {target}: {n} samples", self.grid),
            Err(e) if self.output.is_none() && self.grid.is_empty() => write!(f, "{e}"),
            Err(e) => write!(f, "grid [{}] -> {target}: {e}", self.grid),
        }
    }
}

/// Per-grid outcomes of a run, in processing order.
#[derive(Debug, Default)]
pub struct ConversionReport {
    outcomes: Vec<GridOutcome>,
}

impl ConversionReport {
    pub fn outcomes(&self) -> &[GridOutcome] {
        &self.outcomes
    }

    /// `true` when at least one grid was processed and none failed.
    pub fn is_success(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(GridOutcome::is_success)
    }

    pub fn first_failure(&self) -> Option<&GridOutcome> {
        self.outcomes.iter().find(|o| !o.is_success())
    }

    /// Paths of the files written successfully.
    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.outcomes
            .iter()
            .filter(|o| o.is_success())
            .filter_map(|o| o.output.as_deref())
    }

    fn push(&mut self, outcome: GridOutcome) {
        if !outcome.is_success() {
            error!("\tConversion failed: {outcome}");
        }
        self.outcomes.push(outcome);
    }
}

/// Converts grids of a container into `.vol` files next to the input file.
pub struct ConversionDriver<'a, C: GridContainer + ?Sized> {
    /// Grid source.
    pub container: &'a C,
    /// Path of the container file, used to derive output names.
    pub input_path: PathBuf,
    /// Encoding applied to every grid.
    pub options: EncodingOptions,
}

impl<'a, C: GridContainer + ?Sized> ConversionDriver<'a, C> {
    pub fn new(container: &'a C, input_path: impl Into<PathBuf>, options: EncodingOptions) -> Self {
        Self {
            container,
            input_path: input_path.into(),
            options,
        }
    }

    /// Converts the selected grids. Errors are captured in the report, never returned.
    pub fn run(&self, selection: &GridSelection) -> ConversionReport {
        let mut report = ConversionReport::default();
        match selection {
            GridSelection::First => match self.container.first_grid_name() {
                Some(name) => report.push(self.convert_named(&name)),
                None => report.push(self.empty_container(String::new())),
            },
            GridSelection::Named(name) => report.push(self.convert_named(name)),
            GridSelection::All => {
                let names = self.container.grid_names();
                if names.is_empty() {
                    report.push(self.empty_container(ALL_GRIDS.to_owned()));
                }
                for name in names {
                    let outcome = self.convert_named(&name);
                    let failed = !outcome.is_success();
                    report.push(outcome);
                    if failed {
                        break;
                    }
                }
            }
        }
        report
    }

    fn empty_container(&self, grid: String) -> GridOutcome {
        GridOutcome {
            grid,
            output: None,
            result: Err(Error::EmptyContainer {
                path: self.input_path.clone(),
            }),
        }
    }

    /// Resolves, converts and writes a single grid by name.
    pub fn convert_named(&self, name: &str) -> GridOutcome {
        let grid = match self.container.read_grid(name) {
            Ok(grid) => grid,
            Err(e) => {
                return GridOutcome {
                    grid: name.to_owned(),
                    output: None,
                    result: Err(e),
                }
            }
        };

        let output = output_path_for(&self.input_path, name);
        info!("Writing grid [{}] to {}", name, output.display());

        let result = convert_grid(&grid, &self.options).and_then(|volume| {
            write_volume(&volume, self.options.format, &output)?;
            Ok(volume.len())
        });

        GridOutcome {
            grid: name.to_owned(),
            output: Some(output),
            result,
        }
    }
}
