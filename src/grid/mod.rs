use std::{fmt, str::FromStr};

use strum::{EnumIter, FromRepr, IntoEnumIterator, VariantArray};

use crate::error::{Error, Result};

pub mod generator;
pub mod source;
pub mod world;

pub use generator::{distance, is_reachable, Generated, MapGenerator};
pub use source::MapSource;
pub use world::GridWorld;

/// Reward for entering the goal
pub const GOAL_REWARD: f32 = 100.0;
/// Reward for bumping into a wall
pub const WALL_REWARD: f32 = -10.0;
/// Reward for any other step, including attempts to leave the grid
pub const STEP_REWARD: f32 = -1.0;

/// A position in a `D`-dimensional grid, one index per axis
pub type Coord<const D: usize> = [usize; D];

/// The label of a single grid cell
///
/// The discriminants are the labels used by numeric map literals.
#[derive(FromRepr, EnumIter, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cell {
    Free = 0,
    Wall = 1,
    Goal = 2,
}

impl Cell {
    /// Reward received for stepping onto (or into) a cell with this label
    pub fn reward(self) -> f32 {
        match self {
            Cell::Goal => GOAL_REWARD,
            Cell::Wall => WALL_REWARD,
            Cell::Free => STEP_REWARD,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Free => '.',
            Cell::Wall => '#',
            Cell::Goal => 'G',
        }
    }

    fn from_symbol(symbol: char) -> Option<Self> {
        Cell::iter().find(|c| c.symbol() == symbol)
    }
}

#[derive(EnumIter, VariantArray, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Negative = 0,
    Positive = 1,
}

/// A unit step along one axis
///
/// Actions are indexed `2 * axis + direction`, so a 2D grid has North, South, West, East
/// and a 3D grid has Down, Up (the layer axis) followed by the same four.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Action<const D: usize> {
    pub axis: usize,
    pub direction: Direction,
}

impl<const D: usize> Action<D> {
    /// Number of actions in a `D`-dimensional grid
    pub const COUNT: usize = 2 * D;

    /// Every action in index order
    pub fn all() -> impl Iterator<Item = Self> {
        (0..D).flat_map(|axis| Direction::iter().map(move |direction| Self { axis, direction }))
    }

    pub fn from_index(index: usize) -> Option<Self> {
        (index < Self::COUNT).then(|| Self {
            axis: index / 2,
            direction: Direction::VARIANTS[index % 2],
        })
    }

    pub fn index(self) -> usize {
        2 * self.axis + self.direction as usize
    }

    /// Displace `coord` by this action, or `None` if that leaves a grid of size `dims`
    pub fn apply(self, coord: Coord<D>, dims: [usize; D]) -> Option<Coord<D>> {
        let mut next = coord;
        let x = &mut next[self.axis];
        match self.direction {
            Direction::Negative => *x = x.checked_sub(1)?,
            Direction::Positive if *x + 1 < dims[self.axis] => *x += 1,
            Direction::Positive => return None,
        }
        Some(next)
    }

    pub fn name(self) -> &'static str {
        const PLANAR: [&str; 4] = ["North", "South", "West", "East"];
        let planar_axis = (self.axis + 2).checked_sub(D);
        match (planar_axis, self.direction) {
            (Some(a), d) if a < 2 => PLANAR[2 * a + d as usize],
            (_, Direction::Negative) if D == 3 => "Down",
            (_, Direction::Positive) if D == 3 => "Up",
            (_, Direction::Negative) => "Backward",
            (_, Direction::Positive) => "Forward",
        }
    }
}

impl<const D: usize> fmt::Display for Action<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable `D`-dimensional map of [cells](Cell) with one start and one goal
///
/// Cells are stored row-major: the last axis varies fastest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<const D: usize> {
    dims: [usize; D],
    cells: Vec<Cell>,
    start: Coord<D>,
    goal: Coord<D>,
}

impl<const D: usize> Grid<D> {
    /// Build a grid from row-major cells, locating the goal among them
    ///
    /// **Errors** if a dimension is empty, the cell count does not match `dims`, there
    /// is not exactly one goal, or `start` is out of bounds, a wall, or the goal
    pub fn new(dims: [usize; D], cells: Vec<Cell>, start: Coord<D>) -> Result<Self> {
        if D == 0 {
            return Err(Error::UnsupportedDimension(D));
        }
        if let Some(axis) = dims.iter().position(|&n| n == 0) {
            return Err(Error::EmptyDimension { axis });
        }
        let expected: usize = dims.iter().product();
        if cells.len() != expected {
            return Err(Error::LabelCount {
                expected,
                got: cells.len(),
            });
        }

        let goals = cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Cell::Goal)
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        let goal = match goals[..] {
            [] => return Err(Error::MissingGoal),
            [i] => unflatten(dims, i),
            _ => return Err(Error::MultipleGoals(goals.len())),
        };

        let grid = Self {
            dims,
            cells,
            start,
            goal,
        };

        if !grid.contains(&start) {
            return Err(Error::OutOfBounds {
                what: "start",
                coord: start.to_vec(),
            });
        }
        match grid.cell(start) {
            Cell::Wall => Err(Error::StartOnWall(start.to_vec())),
            Cell::Goal => Err(Error::StartIsGoal(start.to_vec())),
            Cell::Free => Ok(grid),
        }
    }

    /// Build a grid from numeric labels (0 = free, 1 = wall, 2 = goal) in row-major order
    pub fn from_labels(dims: [usize; D], labels: &[u8], start: Coord<D>) -> Result<Self> {
        let cells = labels
            .iter()
            .map(|&l| Cell::from_repr(l).ok_or(Error::UnknownLabel(l)))
            .collect::<Result<Vec<_>>>()?;
        Self::new(dims, cells, start)
    }

    pub fn dims(&self) -> [usize; D] {
        self.dims
    }

    pub fn start(&self) -> Coord<D> {
        self.start
    }

    pub fn goal(&self) -> Coord<D> {
        self.goal
    }

    /// Number of cells, which is also the number of states
    pub fn num_states(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, coord: &Coord<D>) -> bool {
        coord.iter().zip(self.dims).all(|(&x, n)| x < n)
    }

    /// Row-major flattening of an in-bounds coordinate
    pub fn coord_to_state(&self, coord: Coord<D>) -> usize {
        debug_assert!(self.contains(&coord), "{coord:?} is out of bounds");
        coord
            .iter()
            .zip(self.dims)
            .fold(0, |state, (&x, n)| state * n + x)
    }

    /// Exact inverse of [`Grid::coord_to_state`]
    pub fn state_to_coord(&self, state: usize) -> Coord<D> {
        debug_assert!(state < self.num_states(), "state {state} is out of range");
        unflatten(self.dims, state)
    }

    /// Label of an in-bounds cell
    pub fn cell(&self, coord: Coord<D>) -> Cell {
        self.cells[self.coord_to_state(coord)]
    }

    /// Reward for entering the cell at `coord`, which depends only on its label
    pub fn reward(&self, coord: Coord<D>) -> f32 {
        self.cell(coord).reward()
    }

    /// In-bounds coordinates one action away from `coord`, walls included
    pub fn neighbors(&self, coord: Coord<D>) -> impl Iterator<Item = Coord<D>> + '_ {
        Action::<D>::all().filter_map(move |a| a.apply(coord, self.dims))
    }

    /// Every coordinate in state order
    pub fn coords(&self) -> impl Iterator<Item = Coord<D>> + '_ {
        (0..self.num_states()).map(|s| self.state_to_coord(s))
    }
}

fn unflatten<const D: usize>(dims: [usize; D], index: usize) -> Coord<D> {
    let mut coord = [0; D];
    let mut rest = index;
    for axis in (0..D).rev() {
        coord[axis] = rest % dims[axis];
        rest /= dims[axis];
    }
    coord
}

/// Renders one row per line, with a blank line between layers, marking the start `S`
impl<const D: usize> fmt::Display for Grid<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row_len = self.dims[D - 1];
        let layer_len = if D >= 2 {
            row_len * self.dims[D - 2]
        } else {
            usize::MAX
        };
        let start = self.coord_to_state(self.start);

        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 && i % row_len == 0 {
                writeln!(f)?;
                if i % layer_len == 0 {
                    writeln!(f)?;
                }
            }
            let symbol = if i == start { 'S' } else { cell.symbol() };
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}

/// Parses the [`Display`](fmt::Display) format: `.` free, `#` wall, `G` goal, `S` start
///
/// Whitespace within a row is ignored. 3D maps separate layers with blank lines.
impl<const D: usize> FromStr for Grid<D> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if D != 2 && D != 3 {
            return Err(Error::UnsupportedDimension(D));
        }

        let mut layers: Vec<Vec<Vec<char>>> = vec![Vec::new()];
        for (line, text) in s.lines().enumerate() {
            let row = text
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<Vec<_>>();
            if row.is_empty() {
                if layers.last().is_some_and(|l| !l.is_empty()) {
                    layers.push(Vec::new());
                }
                continue;
            }
            if let Some(symbol) = row
                .iter()
                .copied()
                .find(|&c| c != 'S' && Cell::from_symbol(c).is_none())
            {
                return Err(Error::UnknownSymbol {
                    symbol,
                    line: line + 1,
                });
            }
            if let Some(layer) = layers.last_mut() {
                layer.push(row);
            }
        }
        layers.retain(|l| !l.is_empty());

        if D == 2 && layers.len() > 1 {
            return Err(Error::LayerCount(layers.len()));
        }
        let (num_layers, num_rows, num_cols) = match layers.first() {
            Some(layer) => (layers.len(), layer.len(), layer[0].len()),
            None => return Err(Error::EmptyDimension { axis: 0 }),
        };
        let ragged = layers
            .iter()
            .any(|l| l.len() != num_rows || l.iter().any(|r| r.len() != num_cols));
        if ragged {
            return Err(Error::RaggedMap);
        }

        let symbols = layers.into_iter().flatten().flatten().collect::<Vec<_>>();
        let starts = symbols
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == 'S')
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        let start = match starts[..] {
            [] => return Err(Error::MissingStart),
            [i] => i,
            _ => return Err(Error::MultipleStarts(starts.len())),
        };

        let dims = if D == 2 {
            vec![num_rows, num_cols]
        } else {
            vec![num_layers, num_rows, num_cols]
        };
        let dims: [usize; D] = dims
            .as_slice()
            .try_into()
            .map_err(|_| Error::UnsupportedDimension(D))?;

        let cells = symbols
            .into_iter()
            .map(|c| Cell::from_symbol(c).unwrap_or(Cell::Free))
            .collect();
        Self::new(dims, cells, unflatten(dims, start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAZE_6X6: [u8; 36] = [
        0, 0, 0, 0, 0, 0, //
        0, 1, 1, 0, 0, 0, //
        0, 0, 0, 1, 0, 0, //
        1, 0, 1, 1, 0, 0, //
        0, 0, 0, 1, 0, 0, //
        0, 0, 0, 0, 1, 2, //
    ];

    fn maze() -> Grid<2> {
        Grid::from_labels([6, 6], &MAZE_6X6, [0, 0]).unwrap()
    }

    #[test]
    fn state_coord_bijection() {
        let mut labels = vec![0; 24];
        labels[23] = 2;
        let grid = Grid::<3>::from_labels([2, 3, 4], &labels, [0, 0, 0]).unwrap();
        for state in 0..grid.num_states() {
            let coord = grid.state_to_coord(state);
            assert!(grid.contains(&coord));
            assert_eq!(grid.coord_to_state(coord), state, "Round trip from state");
        }
        assert_eq!(grid.coord_to_state([1, 2, 3]), 12 + 2 * 4 + 3);
        assert_eq!(grid.state_to_coord(13), [1, 0, 1]);
    }

    #[test]
    fn rewards_follow_labels() {
        let grid = maze();
        assert_eq!(grid.goal(), [5, 5]);
        for coord in grid.coords() {
            let expected = match grid.cell(coord) {
                Cell::Goal => 100.0,
                Cell::Wall => -10.0,
                Cell::Free => -1.0,
            };
            assert_eq!(grid.reward(coord), expected, "Reward at {coord:?}");
        }
    }

    #[test]
    fn action_indices_follow_axis_order() {
        let names = Action::<2>::all().map(Action::name).collect::<Vec<_>>();
        assert_eq!(names, ["North", "South", "West", "East"]);
        let names = Action::<3>::all().map(Action::name).collect::<Vec<_>>();
        assert_eq!(names, ["Down", "Up", "North", "South", "West", "East"]);

        for (i, action) in Action::<3>::all().enumerate() {
            assert_eq!(action.index(), i);
            assert_eq!(Action::<3>::from_index(i), Some(action));
        }
        assert_eq!(Action::<3>::from_index(6), None);
    }

    #[test]
    fn action_apply_respects_bounds() {
        let west = Action::<2>::from_index(2).unwrap();
        let east = Action::<2>::from_index(3).unwrap();
        assert_eq!(west.apply([0, 0], [2, 2]), None);
        assert_eq!(east.apply([0, 0], [2, 2]), Some([0, 1]));
        assert_eq!(east.apply([0, 1], [2, 2]), None);
    }

    #[test]
    fn neighbors_include_walls_but_not_outside() {
        let grid = maze();
        let mut n = grid.neighbors([0, 1]).collect::<Vec<_>>();
        n.sort();
        assert_eq!(n, [[0, 0], [0, 2], [1, 1]]);
    }

    #[test]
    fn invalid_grids_are_rejected() {
        assert_eq!(
            Grid::<2>::from_labels([2, 2], &[0, 0, 0, 0], [0, 0]),
            Err(Error::MissingGoal)
        );
        assert_eq!(
            Grid::<2>::from_labels([2, 2], &[0, 2, 2, 0], [0, 0]),
            Err(Error::MultipleGoals(2))
        );
        assert_eq!(
            Grid::<2>::from_labels([2, 2], &[1, 0, 0, 2], [0, 0]),
            Err(Error::StartOnWall(vec![0, 0]))
        );
        assert_eq!(
            Grid::<2>::from_labels([2, 2], &[2, 0, 0, 0], [0, 0]),
            Err(Error::StartIsGoal(vec![0, 0]))
        );
        assert!(matches!(
            Grid::<2>::from_labels([2, 2], &[0, 0, 0, 2], [2, 0]),
            Err(Error::OutOfBounds { what: "start", .. })
        ));
        assert_eq!(
            Grid::<2>::from_labels([2, 2], &[0, 0, 2], [0, 0]),
            Err(Error::LabelCount {
                expected: 4,
                got: 3
            })
        );
        assert_eq!(
            Grid::<2>::from_labels([2, 2], &[0, 0, 0, 7], [0, 0]),
            Err(Error::UnknownLabel(7))
        );
        assert_eq!(
            Grid::<2>::new([0, 2], vec![], [0, 0]),
            Err(Error::EmptyDimension { axis: 0 })
        );
    }

    #[test]
    fn parse_2d_map() {
        let grid: Grid<2> = "
            S . #
            . . G
        "
        .parse()
        .unwrap();
        assert_eq!(grid.dims(), [2, 3]);
        assert_eq!(grid.start(), [0, 0]);
        assert_eq!(grid.goal(), [1, 2]);
        assert_eq!(grid.cell([0, 2]), Cell::Wall);
        assert_eq!(grid.to_string(), "S.#\n..G");
    }

    #[test]
    fn parse_3d_map_and_display_roundtrip() {
        let text = "S.\n#.\n\n..\n.G";
        let grid: Grid<3> = text.parse().unwrap();
        assert_eq!(grid.dims(), [2, 2, 2]);
        assert_eq!(grid.goal(), [1, 1, 1]);
        assert_eq!(grid.cell([0, 1, 0]), Cell::Wall);
        assert_eq!(grid.to_string(), text);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            "S.\n.x\n".parse::<Grid<2>>(),
            Err(Error::UnknownSymbol {
                symbol: 'x',
                line: 2
            })
        );
        assert_eq!("S..\n.G".parse::<Grid<2>>(), Err(Error::RaggedMap));
        assert_eq!("..\n.G".parse::<Grid<2>>(), Err(Error::MissingStart));
        assert_eq!("SS\n.G".parse::<Grid<2>>(), Err(Error::MultipleStarts(2)));
        assert_eq!("S.\n\n.G".parse::<Grid<2>>(), Err(Error::LayerCount(2)));
        assert_eq!("S.G".parse::<Grid<4>>(), Err(Error::UnsupportedDimension(4)));
    }
}
