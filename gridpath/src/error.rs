use thiserror::Error;

use crate::cell::Point;

/// Reasons a board text is rejected at parse time
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Malformation {
    #[error("symbol '{0}' has more than one meaning in the alphabet")]
    SymbolClash(char),

    #[error("passable symbol '{0}' has weight 0")]
    ZeroWeight(char),

    #[error("the first line is empty")]
    ZeroWidth,

    #[error("no start symbol '{0}' found")]
    MissingStart(char),

    #[error("no end symbol '{0}' found")]
    MissingEnd(char),

    #[error("found {count} start symbols '{symbol}', expected exactly one")]
    MultipleStarts { symbol: char, count: usize },

    #[error("found {count} end symbols '{symbol}', expected exactly one")]
    MultipleEnds { symbol: char, count: usize },

    #[error("line {line} has {found} cells, expected {expected}")]
    RaggedRow {
        line: usize,
        found: usize,
        expected: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("malformed grid: {0}")]
    MalformedGrid(#[from] Malformation),

    #[error("{point} is outside the {width}x{height} grid")]
    OutOfBounds {
        point: Point,
        width: usize,
        height: usize,
    },

    #[error("there is no path from {start} to {end}")]
    Unreachable { start: Point, end: Point },

    #[error("the grid still carries path state from a previous search, reset it first")]
    StalePathState,

    #[error("the parent chain is broken at {0}")]
    BrokenPath(Point),
}
