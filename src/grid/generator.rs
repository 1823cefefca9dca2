use std::collections::VecDeque;

use log::{debug, warn};
use rand::Rng;
use rand_distr::{Bernoulli, Distribution};

use crate::{
    ensure_interval,
    error::{Error, Result},
};

use super::{Cell, Coord, Grid};

/// Wall densities above this make unsolvable samples common
const RISKY_WALL_PROBABILITY: f64 = 0.4;

/// A solvable map together with the number of samples it took to find it
#[derive(Debug, Clone)]
pub struct Generated<const D: usize> {
    pub grid: Grid<D>,
    pub attempts: usize,
}

/// Samples random maps until one has a path from start to goal
#[derive(Debug, Clone)]
pub struct MapGenerator<const D: usize> {
    pub dims: [usize; D],
    pub start: Coord<D>,
    pub goal: Coord<D>,
    /// Independent probability of each cell being a wall
    pub wall_probability: f64,
    /// Upper bound on samples before giving up
    pub max_attempts: usize,
}

impl<const D: usize> MapGenerator<D> {
    pub fn new(dims: [usize; D], start: Coord<D>, goal: Coord<D>) -> Self {
        Self {
            dims,
            start,
            goal,
            wall_probability: 0.25,
            max_attempts: 10_000,
        }
    }

    pub fn with_wall_probability(mut self, wall_probability: f64) -> Self {
        self.wall_probability = wall_probability;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sample until a map is solvable
    ///
    /// **Errors** if the configuration is invalid or no solvable map is found within
    /// `max_attempts` samples
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Generated<D>> {
        let wall_probability = self.wall_probability;
        ensure_interval!(wall_probability, 0.0, 1.0);
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig(String::from(
                "`max_attempts` must be at least 1",
            )));
        }
        if wall_probability > RISKY_WALL_PROBABILITY {
            warn!(
                "Wall probability {wall_probability} is above {RISKY_WALL_PROBABILITY}, most samples will be unsolvable"
            );
        }

        if let Some(axis) = self.dims.iter().position(|&n| n == 0) {
            return Err(Error::EmptyDimension { axis });
        }
        let (start, goal) = self.locate()?;
        let walls = Bernoulli::new(wall_probability)
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;

        let mut cells = vec![Cell::Free; self.dims.iter().product()];
        for attempt in 1..=self.max_attempts {
            for cell in cells.iter_mut() {
                *cell = if walls.sample(rng) {
                    Cell::Wall
                } else {
                    Cell::Free
                };
            }
            cells[start] = Cell::Free;
            cells[goal] = Cell::Goal;

            let grid = Grid::new(self.dims, cells.clone(), self.start)?;
            if is_reachable(&grid) {
                debug!("Generated a solvable map after {attempt} attempt(s)");
                return Ok(Generated {
                    grid,
                    attempts: attempt,
                });
            }
        }

        Err(Error::GenerationExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Flat indices of start and goal, checked against the grid bounds
    fn locate(&self) -> Result<(usize, usize)> {
        let flatten = |what: &'static str, coord: Coord<D>| -> Result<usize> {
            let inside = coord.iter().zip(self.dims).all(|(&x, n)| x < n);
            if !inside {
                return Err(Error::OutOfBounds {
                    what,
                    coord: coord.to_vec(),
                });
            }
            Ok(coord.iter().zip(self.dims).fold(0, |s, (&x, n)| s * n + x))
        };
        let goal = flatten("goal", self.goal)?;
        let start = flatten("start", self.start)?;
        if start == goal {
            return Err(Error::StartIsGoal(self.start.to_vec()));
        }
        Ok((start, goal))
    }
}

/// Length of the shortest wall-free path from start to goal, if there is one
pub fn distance<const D: usize>(grid: &Grid<D>) -> Option<usize> {
    let goal = grid.coord_to_state(grid.goal());
    let mut dist = vec![None; grid.num_states()];
    let mut queue = VecDeque::new();

    let start = grid.coord_to_state(grid.start());
    dist[start] = Some(0);
    queue.push_back(grid.start());

    while let Some(coord) = queue.pop_front() {
        let state = grid.coord_to_state(coord);
        let d = dist[state]?;
        if state == goal {
            return Some(d);
        }
        for next in grid.neighbors(coord) {
            let next_state = grid.coord_to_state(next);
            if dist[next_state].is_none() && grid.cell(next) != Cell::Wall {
                dist[next_state] = Some(d + 1);
                queue.push_back(next);
            }
        }
    }

    None
}

/// Whether the goal can be reached from the start without crossing walls
pub fn is_reachable<const D: usize>(grid: &Grid<D>) -> bool {
    distance(grid).is_some()
}
