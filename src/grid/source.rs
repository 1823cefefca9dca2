use log::info;
use rand::Rng;

use crate::error::{Error, Result};

use super::{is_reachable, Grid, MapGenerator};

/// Where the map for a run comes from
#[derive(Debug, Clone)]
pub enum MapSource<const D: usize> {
    /// A hand-authored map, checked for solvability before use
    Static(Grid<D>),
    /// A freshly sampled map that is solvable by construction
    Generated(MapGenerator<D>),
}

impl<const D: usize> MapSource<D> {
    /// Produce the grid for this run
    ///
    /// **Errors** if a static map has no path from start to goal, or if generation fails
    pub fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> Result<Grid<D>> {
        match self {
            MapSource::Static(grid) => {
                if is_reachable(&grid) {
                    Ok(grid)
                } else {
                    Err(Error::Unreachable)
                }
            }
            MapSource::Generated(generator) => {
                let generated = generator.generate(rng)?;
                info!(
                    "Using generated {:?} map found after {} attempt(s)",
                    generated.grid.dims(),
                    generated.attempts
                );
                Ok(generated.grid)
            }
        }
    }
}

impl<const D: usize> From<Grid<D>> for MapSource<D> {
    fn from(grid: Grid<D>) -> Self {
        MapSource::Static(grid)
    }
}

impl<const D: usize> From<MapGenerator<D>> for MapSource<D> {
    fn from(generator: MapGenerator<D>) -> Self {
        MapSource::Generated(generator)
    }
}
