//! Named grid containers.
//!
//! A container enumerates grid names in a stable order and resolves a name to a grid
//! handle. [`GridSet`] is the in-memory implementation; file readers (see
//! [`crate::archive`]) produce one.
use crate::error::{Error, Result};
use crate::grid::ScalarGrid;

/// Source of named scalar grids.
pub trait GridContainer {
    type Grid<'a>: ScalarGrid
    where
        Self: 'a;

    /// Grid names in enumeration order.
    fn grid_names(&self) -> Vec<String>;

    /// Resolves `name` to a grid handle.
    fn read_grid(&self, name: &str) -> Result<Self::Grid<'_>>;

    /// Name of the first grid in enumeration order.
    fn first_grid_name(&self) -> Option<String> {
        self.grid_names().into_iter().next()
    }
}

/// Ordered, in-memory collection of named grids.
#[derive(Clone, Debug)]
pub struct GridSet<G> {
    grids: Vec<(String, G)>,
}

impl<G> GridSet<G> {
    pub fn new() -> Self {
        Self { grids: Vec::new() }
    }

    /// Appends a grid, replacing any grid of the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, grid: G) {
        let name = name.into();
        match self.grids.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = grid,
            None => self.grids.push((name, grid)),
        }
    }

    /// Builder variant of [`GridSet::insert`].
    pub fn with_grid(mut self, name: impl Into<String>, grid: G) -> Self {
        self.insert(name, grid);
        self
    }

    pub fn get(&self, name: &str) -> Option<&G> {
        self.grids.iter().find(|(n, _)| n == name).map(|(_, g)| g)
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    /// Iterates `(name, grid)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &G)> {
        self.grids.iter().map(|(n, g)| (n.as_str(), g))
    }
}

impl<G> Default for GridSet<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G, N: Into<String>> FromIterator<(N, G)> for GridSet<G> {
    fn from_iter<T: IntoIterator<Item = (N, G)>>(iter: T) -> Self {
        let mut set = GridSet::new();
        for (name, grid) in iter {
            set.insert(name, grid);
        }
        set
    }
}

impl<G: ScalarGrid> GridContainer for GridSet<G> {
    type Grid<'a>
        = &'a G
    where
        Self: 'a;

    fn grid_names(&self) -> Vec<String> {
        self.grids.iter().map(|(n, _)| n.clone()).collect()
    }

    fn read_grid(&self, name: &str) -> Result<Self::Grid<'_>> {
        self.get(name).ok_or_else(|| Error::GridNotFound {
            name: name.to_owned(),
        })
    }
}
