use std::fmt::Display;

use log::{debug, trace};

use crate::cell::{estimate, Cell, CellId, PathState, Point};
use crate::config::{Alphabet, Markers, ParseOptions};
use crate::error::{GridError, Malformation};
use crate::find::SearchSpace;

/// Neighbour offsets in exploration order: east, west, south, north
const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// A rectangular board parsed from text.
///
/// All cells live in one row-major arena, parent links are [`CellId`]s into
/// that arena. Adjacency is not stored but derived from the coordinates.
#[derive(Debug)]
pub struct Grid {
    source: String,
    alphabet: Alphabet,
    options: ParseOptions,
    markers: Markers,
    cells: Vec<Cell>,
    width: usize,
    height: usize,
    start: CellId,
    end: CellId,
    searched: bool,
}

impl Grid {
    /// Parse a board using the default alphabet
    pub fn parse(text: &str) -> Result<Self, GridError> {
        Self::parse_with(text, &Alphabet::default(), ParseOptions::default())
    }

    pub fn parse_with(
        text: &str,
        alphabet: &Alphabet,
        options: ParseOptions,
    ) -> Result<Self, GridError> {
        alphabet.validate()?;

        // the width is taken from the raw first line, decoration included
        let first_line = text.split('\n').next().unwrap_or_default();
        let width = first_line.trim_end_matches('\r').chars().count();
        if width == 0 {
            return Err(Malformation::ZeroWidth.into());
        }

        for (line, row) in text.lines().enumerate() {
            let found = row.chars().filter(|c| alphabet.contains(*c)).count();
            if found != 0 && found != width {
                return Err(Malformation::RaggedRow {
                    line: line + 1,
                    found,
                    expected: width,
                }
                .into());
            }
        }

        let symbols: Vec<char> = text.chars().filter(|c| alphabet.contains(*c)).collect();
        let start = find_unique(&symbols, alphabet.start).map_err(|count| match count {
            0 => Malformation::MissingStart(alphabet.start),
            count => Malformation::MultipleStarts {
                symbol: alphabet.start,
                count,
            },
        })?;
        let end = find_unique(&symbols, alphabet.end).map_err(|count| match count {
            0 => Malformation::MissingEnd(alphabet.end),
            count => Malformation::MultipleEnds {
                symbol: alphabet.end,
                count,
            },
        })?;

        let to_point = |i: usize| Point::new(i % width, i / width);
        let goal = to_point(end);
        let state = PathState {
            cost: options.default_cost.unwrap_or_default(),
            parent: None,
        };

        let cells: Vec<Cell> = symbols
            .iter()
            .enumerate()
            .map(|(i, &symbol)| {
                let pos = to_point(i);
                let heuristic = options
                    .default_heuristic
                    .unwrap_or_else(|| estimate(pos, goal));
                let mut cell = Cell::new(pos, symbol, alphabet.weight(symbol), heuristic);
                cell.state = state;
                cell
            })
            .collect();

        let height = cells.len().div_ceil(width);
        debug!(
            "parsed {}x{} grid, start at {}, end at {}",
            width,
            height,
            to_point(start),
            goal
        );

        Ok(Self {
            source: text.to_owned(),
            alphabet: alphabet.clone(),
            options,
            markers: Markers::default(),
            cells,
            width,
            height,
            start: CellId(start),
            end: CellId(end),
            searched: false,
        })
    }

    /// Use other markers when rendering
    pub fn with_markers(mut self, markers: Markers) -> Self {
        self.markers = markers;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn start(&self) -> CellId {
        self.start
    }

    pub fn end(&self) -> CellId {
        self.end
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn markers(&self) -> Markers {
        self.markers
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Look up a cell by its handle, ids from another grid may be out of bounds
    pub fn cell(&self, id: CellId) -> Result<&Cell, GridError> {
        self.cells.get(id.0).ok_or(GridError::OutOfBounds {
            point: Point::new(id.0 % self.width, id.0 / self.width),
            width: self.width,
            height: self.height,
        })
    }

    pub fn start_cell(&self) -> &Cell {
        self.at(self.start)
    }

    pub fn end_cell(&self) -> &Cell {
        self.at(self.end)
    }

    /// Ids created by this grid are always in bounds
    fn at(&self, id: CellId) -> &Cell {
        &self.cells[id.0]
    }

    pub fn id_of(&self, x: usize, y: usize) -> Result<CellId, GridError> {
        if x >= self.width || y >= self.height || y * self.width + x >= self.cells.len() {
            return Err(GridError::OutOfBounds {
                point: Point::new(x, y),
                width: self.width,
                height: self.height,
            });
        }
        Ok(CellId(y * self.width + x))
    }

    pub fn get_cell(&self, x: usize, y: usize) -> Result<&Cell, GridError> {
        self.id_of(x, y).map(|id| self.at(id))
    }

    /// The non-wall cells one step east, west, south and north of `id`, in
    /// that order. An id that is not part of this grid has no neighbours.
    pub fn neighbours(&self, id: CellId) -> impl Iterator<Item = CellId> + '_ {
        let origin = self.cells.get(id.0).map(Cell::pos);

        DIRECTIONS.into_iter().filter_map(move |(dx, dy)| {
            let Point { x, y } = origin?;
            let neighbour = self
                .id_of(x.checked_add_signed(dx)?, y.checked_add_signed(dy)?)
                .ok()?;
            (!self.at(neighbour).is_wall()).then_some(neighbour)
        })
    }

    /// Record that `neighbour` is reached through `from`
    pub fn update_neighbour(&mut self, neighbour: CellId, from: CellId) -> Result<(), GridError> {
        self.cell(neighbour)?;
        self.cell(from)?;
        self.relax(neighbour, from);
        Ok(())
    }

    fn relax(&mut self, neighbour: CellId, from: CellId) {
        let (cost, origin) = (self.at(from).cost(), self.at(from).pos());
        let cell = &mut self.cells[neighbour.0];
        cell.state = PathState {
            cost: cost.saturating_add(cell.weight().unwrap_or_default()),
            parent: Some(from),
        };
        trace!("{} reached from {}", cell.pos(), origin);
    }

    /// Mark the grid as searched, fails if a previous search left its state
    pub fn begin_search(&mut self) -> Result<(), GridError> {
        if self.searched {
            return Err(GridError::StalePathState);
        }
        self.searched = true;
        Ok(())
    }

    pub fn is_searched(&self) -> bool {
        self.searched
    }

    /// Drop all path state so the grid can be searched again
    pub fn reset(&mut self) {
        let cost = self.options.default_cost.unwrap_or_default();
        for cell in &mut self.cells {
            cell.state = PathState { cost, parent: None };
        }
        self.searched = false;
    }

    /// Coordinates from start to end, following the parent links back from
    /// the end cell
    pub fn path(&self) -> Result<Vec<Point>, GridError> {
        let mut current = self.end;
        let mut path = vec![self.at(current).pos()];

        while current != self.start {
            let cell = self.at(current);
            current = cell.parent().ok_or(GridError::BrokenPath(cell.pos()))?;
            path.push(self.at(current).pos());

            if path.len() > self.cells.len() {
                return Err(GridError::StalePathState);
            }
        }

        path.reverse();
        Ok(path)
    }

    /// Render the board without any overlay
    pub fn render(&self) -> String {
        self.render_with(&[], &[], &[])
    }

    /// Render the board with the current path, plus the given frontier and
    /// visited cells
    pub fn render_path(
        &self,
        frontier: Option<&[CellId]>,
        visited: Option<&[CellId]>,
    ) -> Result<String, GridError> {
        let path = self.path()?;
        Ok(self.render_with(
            &path,
            frontier.unwrap_or_default(),
            visited.unwrap_or_default(),
        ))
    }

    /// Render the board with overlays. Visited cells are written first, then
    /// the frontier, then the path; start and end keep their symbol. Cells and
    /// points outside the grid are skipped.
    pub fn render_with(&self, path: &[Point], frontier: &[CellId], visited: &[CellId]) -> String {
        let mut text: Vec<char> = self.cells.iter().map(Cell::symbol).collect();
        let keep = |id: &CellId| *id != self.start && *id != self.end && id.0 < text.len();

        let visited: Vec<CellId> = visited.iter().copied().filter(keep).collect();
        let frontier: Vec<CellId> = frontier.iter().copied().filter(keep).collect();
        let inner = path.get(1..path.len().saturating_sub(1)).unwrap_or_default();
        let path: Vec<CellId> = inner
            .iter()
            .filter_map(|p| self.id_of(p.x, p.y).ok())
            .filter(keep)
            .collect();

        for id in visited {
            text[id.0] = self.markers.visited;
        }
        for id in frontier {
            text[id.0] = self.markers.frontier;
        }
        for id in path {
            text[id.0] = self.markers.path;
        }

        text.chunks(self.width)
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Index of the only occurrence of `symbol`, or the number of occurrences
fn find_unique(symbols: &[char], symbol: char) -> Result<usize, usize> {
    let mut found = symbols
        .iter()
        .enumerate()
        .filter(|(_, c)| **c == symbol)
        .map(|(i, _)| i);

    match (found.next(), found.next()) {
        (Some(i), None) => Ok(i),
        (None, _) => Err(0),
        (Some(_), Some(_)) => Err(2 + found.count()),
    }
}

/// A fresh copy of the grid: same map state, no path state
impl Clone for Grid {
    fn clone(&self) -> Self {
        let mut cells = self.cells.clone();
        let cost = self.options.default_cost.unwrap_or_default();
        for cell in &mut cells {
            cell.state = PathState { cost, parent: None };
        }

        Self {
            source: self.source.clone(),
            alphabet: self.alphabet.clone(),
            options: self.options,
            markers: self.markers,
            cells,
            width: self.width,
            height: self.height,
            start: self.start,
            end: self.end,
            searched: false,
        }
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl SearchSpace for Grid {
    type Reference = CellId;

    fn start(&self) -> CellId {
        self.start
    }

    fn goal(&self) -> CellId {
        self.end
    }

    fn neighbors_of(&self, node: CellId) -> impl Iterator<Item = CellId> {
        self.neighbours(node)
    }

    fn link(&mut self, node: CellId, from: CellId) {
        self.relax(node, from);
    }
}
