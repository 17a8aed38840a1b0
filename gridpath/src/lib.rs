//! Parse text boards into a weighted grid graph and find the shortest path
//! between the start and end cell with a breadth-first search.
//!
//! ```
//! use gridpath::{bfs, Grid};
//!
//! let mut grid = Grid::parse("A..\n.#.\n..B").unwrap();
//! let outcome = bfs(&mut grid).unwrap();
//!
//! assert_eq!(outcome.edges(), 4);
//! println!("{}", outcome.board);
//! ```

mod cell;
mod config;
mod error;
mod find;
mod grid;
pub mod util;

pub use cell::{estimate, Cell, CellId, PathState, Point};
pub use config::{Alphabet, Markers, ParseOptions, Settings, RUNNER};
pub use error::{GridError, Malformation};
pub use find::{
    bfs, BreadthFirst, Exploration, NodeReference, PathFinderState, SearchOutcome, SearchSpace,
};
pub use grid::Grid;
