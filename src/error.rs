use thiserror::Error;

/// Errors raised while building grids, generating maps, or validating configuration
///
/// Moving into a wall or off the grid is never an error, and neither is a greedy
/// run that gets stuck. Those are ordinary outcomes of the environment and policy.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("grid dimension {axis} has size zero")]
    EmptyDimension { axis: usize },

    #[error("expected {expected} cell labels for the given dimensions, got {got}")]
    LabelCount { expected: usize, got: usize },

    #[error("unknown cell label {0} (expected 0 = free, 1 = wall, 2 = goal)")]
    UnknownLabel(u8),

    #[error("unknown map symbol '{symbol}' at line {line}")]
    UnknownSymbol { symbol: char, line: usize },

    #[error("map rows and layers must all have the same length")]
    RaggedMap,

    #[error("text maps support 2 or 3 dimensions, not {0}")]
    UnsupportedDimension(usize),

    #[error("map has no goal cell")]
    MissingGoal,

    #[error("map has {0} goal cells, expected exactly one")]
    MultipleGoals(usize),

    #[error("map has no start cell")]
    MissingStart,

    #[error("map has {0} start cells, expected exactly one")]
    MultipleStarts(usize),

    #[error("a 2D map must have a single layer, found {0}")]
    LayerCount(usize),

    #[error("goal is not reachable from start")]
    Unreachable,

    #[error("{what} coordinate {coord:?} is outside the grid")]
    OutOfBounds { what: &'static str, coord: Vec<usize> },

    #[error("start coordinate {0:?} is a wall")]
    StartOnWall(Vec<usize>),

    #[error("start and goal share coordinate {0:?}")]
    StartIsGoal(Vec<usize>),

    #[error("invalid value for `{name}`: {value} is not in the interval [{min}, {max}]")]
    OutOfInterval {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no solvable map found after {attempts} attempts")]
    GenerationExhausted { attempts: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
