use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A position on the grid, `x` grows to the east and `y` grows to the south
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl From<(usize, usize)> for Point {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Handle to a cell inside the arena of the [`crate::Grid`] that created it.
/// Only a grid hands these out, they are meaningless for any other grid.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize)]
pub struct CellId(pub(crate) usize);

impl CellId {
    /// Row-major index of the cell
    pub fn index(self) -> usize {
        self.0
    }
}

/// The part of a cell that a search is allowed to change
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PathState {
    /// Accumulated cost from the start along the best known path
    pub cost: usize,
    /// The cell this one was reached from
    pub parent: Option<CellId>,
}

/// A single node of the grid graph.
///
/// The map state (position, symbol, weight and heuristic) is fixed when the
/// grid is parsed, only the [`PathState`] is touched by a search.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cell {
    pos: Point,
    symbol: char,
    weight: Option<usize>,
    heuristic: usize,
    pub(crate) state: PathState,
}

impl Cell {
    pub(crate) fn new(pos: Point, symbol: char, weight: Option<usize>, heuristic: usize) -> Self {
        Self {
            pos,
            symbol,
            weight,
            heuristic,
            state: PathState::default(),
        }
    }

    pub fn pos(&self) -> Point {
        self.pos
    }

    pub fn x(&self) -> usize {
        self.pos.x
    }

    pub fn y(&self) -> usize {
        self.pos.y
    }

    pub fn symbol(&self) -> char {
        self.symbol
    }

    /// Cost of entering this cell, `None` for walls
    pub fn weight(&self) -> Option<usize> {
        self.weight
    }

    pub fn is_wall(&self) -> bool {
        self.weight.is_none()
    }

    /// Estimated remaining distance to the end cell
    pub fn heuristic(&self) -> usize {
        self.heuristic
    }

    pub fn cost(&self) -> usize {
        self.state.cost
    }

    pub fn parent(&self) -> Option<CellId> {
        self.state.parent
    }

    pub fn state(&self) -> PathState {
        self.state
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// Manhattan distance between `from` and `to`, one less when the two points
/// do not share a row or a column.
pub fn estimate(from: Point, to: Point) -> usize {
    let dx = from.x.abs_diff(to.x);
    let dy = from.y.abs_diff(to.y);
    let diagonal = usize::from(dx > 0 && dy > 0);
    dx + dy - diagonal
}
