//! RON grid archives.
//!
//! An archive is a list of named sparse grids:
//!
//! ```ron
//! (
//!     grids: [
//!         (
//!             name: "density",
//!             background: 0.0,
//!             transform: (voxel_size: (0.5, 0.5, 0.5), translation: (0.0, 0.0, 0.0)),
//!             voxels: [((0, 0, 0), 1.0), ((1, 0, 0), 0.25)],
//!         ),
//!     ],
//! )
//! ```
//!
//! Grid order in the document is the enumeration order of the loaded [`GridSet`].
use std::fs;
use std::path::Path;

use glam::IVec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::container::GridSet;
use crate::error::{Error, Result};
use crate::grid::{SparseGrid, Transform};

/// One grid as stored in an archive.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridRecord {
    pub name: String,
    #[serde(default)]
    pub background: f32,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub voxels: Vec<(IVec3, f32)>,
}

impl GridRecord {
    /// Builds the sparse grid described by this record.
    pub fn to_grid(&self) -> SparseGrid {
        let mut grid = SparseGrid::new(self.background).with_transform(self.transform);
        grid.extend(self.voxels.iter().copied());
        grid
    }

    /// Captures `grid` under `name`. Voxels are sorted z, y, x for stable output.
    pub fn from_grid(name: impl Into<String>, grid: &SparseGrid) -> Self {
        let mut voxels: Vec<(IVec3, f32)> = grid.iter().collect();
        voxels.sort_by_key(|(c, _)| (c.z, c.y, c.x));
        Self {
            name: name.into(),
            background: grid.background(),
            transform: *grid.transform(),
            voxels,
        }
    }
}

/// Serialized collection of named sparse grids.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GridArchive {
    pub grids: Vec<GridRecord>,
}

impl GridArchive {
    /// Parses an archive from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| Error::Archive(e.to_string()))
    }

    /// Reads and parses an archive file.
    pub fn open(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let archive = Self::from_ron_str(&text)
            .map_err(|e| Error::Archive(format!("{}: {e}", path.display())))?;
        debug!(
            "Opened archive {} with {} grids",
            path.display(),
            archive.grids.len()
        );
        Ok(archive)
    }

    /// Renders the archive as pretty RON.
    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| Error::Archive(e.to_string()))
    }

    /// Writes the archive to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = self.to_ron_string()?;
        fs::write(path, text).map_err(|e| Error::write(path, e))
    }

    /// Appends a grid record.
    pub fn with_grid(mut self, name: impl Into<String>, grid: &SparseGrid) -> Self {
        self.grids.push(GridRecord::from_grid(name, grid));
        self
    }

    /// Builds the grids in document order. Later records replace earlier ones of the same name.
    pub fn to_grid_set(&self) -> GridSet<SparseGrid> {
        let mut set = GridSet::new();
        for record in &self.grids {
            if set.get(&record.name).is_some() {
                warn!("Duplicate grid '{}' in archive, keeping the last one", record.name);
            }
            set.insert(record.name.clone(), record.to_grid());
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use super::*;
    use crate::container::GridContainer;
    use crate::grid::ScalarGrid;

    const SAMPLE: &str = r#"
        (
            grids: [
                (
                    name: "density",
                    background: 0.0,
                    transform: (voxel_size: (0.5, 0.5, 0.5), translation: (1.0, 0.0, 0.0)),
                    voxels: [((0, 0, 0), 1.0), ((1, 2, 0), 0.25)],
                ),
                (
                    name: "temperature",
                    voxels: [((5, 5, 5), 300.0)],
                ),
            ],
        )
    "#;

    #[test]
    fn parses_grids_in_document_order() {
        let set = GridArchive::from_ron_str(SAMPLE).unwrap().to_grid_set();
        assert_eq!(set.grid_names(), vec!["density", "temperature"]);

        let density = set.read_grid("density").unwrap();
        assert_eq!(density.active_voxel_count(), 2);
        assert_eq!(density.get(IVec3::new(1, 2, 0)), 0.25);
        assert_eq!(
            density.index_to_world(DVec3::new(2.0, 0.0, 0.0)),
            DVec3::new(2.0, 0.0, 0.0)
        );

        let temperature = set.read_grid("temperature").unwrap();
        assert_eq!(*temperature.transform(), Transform::IDENTITY);
        assert_eq!(temperature.background(), 0.0);
    }

    #[test]
    fn malformed_text_is_an_archive_error() {
        let err = GridArchive::from_ron_str("(grids: [ (name: 3) ])").unwrap_err();
        assert!(matches!(err, Error::Archive(_)));
    }

    #[test]
    fn save_and_open_preserve_grids() {
        let mut grid = SparseGrid::new(-1.0).with_transform(Transform::uniform(0.25));
        grid.extend([(IVec3::new(2, 0, 0), 1.5), (IVec3::new(0, 1, 0), 2.5)]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.ron");
        GridArchive::default().with_grid("smoke", &grid).save(&path).unwrap();

        let archive = GridArchive::open(&path).unwrap();
        assert_eq!(archive.grids[0].voxels[0], (IVec3::new(2, 0, 0), 1.5));
        let set = archive.to_grid_set();
        let loaded = set.read_grid("smoke").unwrap();
        assert_eq!(loaded.background(), -1.0);
        assert_eq!(loaded.active_bounding_box(), grid.active_bounding_box());
        assert_eq!(loaded.get(IVec3::new(0, 1, 0)), 2.5);
    }
}
