use crate::env::{Environment, Transition};

use super::{Action, Cell, Coord, Grid, STEP_REWARD};

/// A grid navigation task: walk from the start cell to the goal cell
///
/// States are the row-major indices of grid coordinates and actions are the `2 * D`
/// unit steps of [`Action`].
#[derive(Debug, Clone)]
pub struct GridWorld<const D: usize> {
    grid: Grid<D>,
    start_state: usize,
    goal_state: usize,
}

impl<const D: usize> GridWorld<D> {
    pub fn new(grid: Grid<D>) -> Self {
        Self {
            start_state: grid.coord_to_state(grid.start()),
            goal_state: grid.coord_to_state(grid.goal()),
            grid,
        }
    }

    pub fn grid(&self) -> &Grid<D> {
        &self.grid
    }

    pub fn goal_state(&self) -> usize {
        self.goal_state
    }

    pub fn coord(&self, state: usize) -> Coord<D> {
        self.grid.state_to_coord(state)
    }

    /// Apply a typed action
    ///
    /// Leaving the grid keeps the agent in place at the ordinary step cost. Bumping a
    /// wall also keeps it in place but costs the wall penalty. Otherwise the agent moves
    /// and receives the reward of the cell it entered.
    pub fn step(&self, state: usize, action: Action<D>) -> Transition {
        let coord = self.grid.state_to_coord(state);
        let Some(dest) = action.apply(coord, self.grid.dims()) else {
            return Transition {
                next_state: state,
                reward: STEP_REWARD,
            };
        };

        match self.grid.cell(dest) {
            Cell::Wall => Transition {
                next_state: state,
                reward: self.grid.reward(dest),
            },
            Cell::Free | Cell::Goal => Transition {
                next_state: self.grid.coord_to_state(dest),
                reward: self.grid.reward(dest),
            },
        }
    }
}

impl<const D: usize> From<Grid<D>> for GridWorld<D> {
    fn from(grid: Grid<D>) -> Self {
        Self::new(grid)
    }
}

impl<const D: usize> Environment for GridWorld<D> {
    fn num_states(&self) -> usize {
        self.grid.num_states()
    }

    fn num_actions(&self) -> usize {
        Action::<D>::COUNT
    }

    fn start_state(&self) -> usize {
        self.start_state
    }

    fn is_terminal(&self, state: usize) -> bool {
        state == self.goal_state
    }

    /// **Panics** if `action` is not below `2 * D`
    fn transition(&self, state: usize, action: usize) -> Transition {
        let action = Action::<D>::from_index(action).expect("action index is below num_actions");
        self.step(state, action)
    }
}
