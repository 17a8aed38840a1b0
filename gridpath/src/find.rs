use std::{
    collections::{HashSet, VecDeque},
    hash::Hash,
    time::{Duration, Instant},
};

use log::debug;
use serde::Serialize;

use crate::cell::{CellId, Point};
use crate::error::GridError;
use crate::grid::Grid;

/// Supertrait that collects all the requirements on the NodeReference values
/// Must be copy, comparable, hashable and not references (hence 'static)
pub trait NodeReference: Copy + Eq + Hash + 'static {}

impl NodeReference for CellId {}

/// A graph that a search can run over and record its results in
pub trait SearchSpace {
    /// The type that can be used to reference nodes in the graph
    type Reference: NodeReference;

    fn start(&self) -> Self::Reference;

    fn goal(&self) -> Self::Reference;

    /// Return an iterator over the passable neighbors of the provided node,
    /// in the order they should be explored
    fn neighbors_of(&self, node: Self::Reference) -> impl Iterator<Item = Self::Reference>;

    /// Record that `node` was reached from `from`
    fn link(&mut self, node: Self::Reference, from: Self::Reference);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathFinderState {
    Computing,
    NoPathFound,
    GoalReached,
}

impl PathFinderState {
    fn is_done(&self) -> bool {
        !matches!(self, PathFinderState::Computing)
    }
}

/// What a breadth-first search left behind when it stopped
#[derive(Debug, Clone)]
pub struct Exploration<R> {
    /// Nodes still waiting in the queue, in queue order
    pub frontier: Vec<R>,
    /// Every node that has been discovered, the start included
    pub visited: HashSet<R>,
}

/// Breadth-first search with a FIFO queue.
///
/// A node is marked visited when it is discovered, so its parent is the first
/// node that reached it and it is enqueued at most once.
#[derive(Debug)]
pub struct BreadthFirst<R: NodeReference> {
    goal: R,
    queue: VecDeque<R>,
    visited: HashSet<R>,
    state: PathFinderState,
}

impl<R: NodeReference> BreadthFirst<R> {
    pub fn new<M: SearchSpace<Reference = R>>(space: &M) -> Self {
        let start = space.start();
        Self {
            goal: space.goal(),
            queue: VecDeque::from([start]),
            visited: HashSet::from([start]),
            state: PathFinderState::Computing,
        }
    }

    pub fn finish<M: SearchSpace<Reference = R>>(
        mut self,
        space: &mut M,
    ) -> (PathFinderState, Exploration<R>) {
        loop {
            match self.step(space) {
                PathFinderState::Computing => {}
                s => {
                    return (
                        s,
                        Exploration {
                            frontier: self.queue.into(),
                            visited: self.visited,
                        },
                    )
                }
            }
        }
    }

    pub fn step<M: SearchSpace<Reference = R>>(&mut self, space: &mut M) -> PathFinderState {
        if self.state.is_done() {
            return self.state;
        }

        let Some(current) = self.queue.pop_front() else {
            self.state = PathFinderState::NoPathFound;
            return self.state;
        };

        if current == self.goal {
            self.state = PathFinderState::GoalReached;
            return self.state;
        }

        // collect first, linking needs the space mutably
        let neighbors: Vec<R> = space.neighbors_of(current).collect();
        for neighbor in neighbors {
            if self.visited.insert(neighbor) {
                space.link(neighbor, current);
                self.queue.push_back(neighbor);
            }
        }

        self.state
    }

    pub fn state(&self) -> PathFinderState {
        self.state
    }

    pub fn frontier(&self) -> impl Iterator<Item = &R> {
        self.queue.iter()
    }

    pub fn visited(&self) -> &HashSet<R> {
        &self.visited
    }
}

/// The result of a successful search on a [`Grid`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    /// Wall-clock time spent searching, rendering excluded
    pub elapsed: Duration,
    /// The board with the path, frontier and visited cells drawn on it
    pub board: String,
    pub path: Vec<Point>,
    /// Accumulated weight of the path, the start cell excluded
    pub cost: usize,
    pub visited: usize,
    pub frontier: usize,
}

impl SearchOutcome {
    /// Number of steps along the path
    pub fn edges(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Find the shortest path from start to end with a breadth-first search.
///
/// The grid must not carry path state from an earlier search, use
/// [`Grid::clone`] or [`Grid::reset`] before searching it again.
pub fn bfs(grid: &mut Grid) -> Result<SearchOutcome, GridError> {
    grid.begin_search()?;

    let started = Instant::now();
    let (state, exploration) = BreadthFirst::new(&*grid).finish(grid);
    let elapsed = started.elapsed();

    if state != PathFinderState::GoalReached {
        debug!(
            "queue exhausted after visiting {} cells",
            exploration.visited.len()
        );
        return Err(GridError::Unreachable {
            start: grid.start_cell().pos(),
            end: grid.end_cell().pos(),
        });
    }

    let visited: Vec<CellId> = exploration.visited.iter().copied().collect();
    let path = grid.path()?;
    let board = grid.render_path(
        Some(exploration.frontier.as_slice()),
        Some(visited.as_slice()),
    )?;
    debug!(
        "found path with {} steps in {:?}, {} visited, {} in frontier",
        path.len() - 1,
        elapsed,
        visited.len(),
        exploration.frontier.len()
    );

    Ok(SearchOutcome {
        elapsed,
        board,
        path,
        cost: grid.end_cell().cost(),
        visited: visited.len(),
        frontier: exploration.frontier.len(),
    })
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::config::{Alphabet, ParseOptions};

    fn points(list: &[(usize, usize)]) -> Vec<Point> {
        list.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_corridor() {
        let mut grid = Grid::parse("A...B").unwrap();

        let outcome = bfs(&mut grid).unwrap();

        assert_eq!(
            outcome.path,
            points(&[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)])
        );
        assert_eq!(outcome.edges(), 4);
        assert_eq!(outcome.visited, 5);
        assert_eq!(outcome.frontier, 0);
        assert_eq!(outcome.cost, 4);
        assert_eq!(outcome.board, "AoooB");
    }

    #[test]
    fn test_walled_off_end_is_unreachable() {
        // B and its two open neighbours form their own component
        let mut grid = Grid::parse("A.#\n.#.\n#.B").unwrap();

        assert_eq!(
            bfs(&mut grid),
            Err(GridError::Unreachable {
                start: Point::new(0, 0),
                end: Point::new(2, 2)
            })
        );
    }

    #[test]
    fn test_enclosed_start_is_unreachable() {
        let mut grid = Grid::parse("...B\n.#..\n#A#.\n.#..").unwrap();

        assert_eq!(grid.neighbours(grid.start()).count(), 0);
        assert!(matches!(
            bfs(&mut grid),
            Err(GridError::Unreachable { .. })
        ));
    }

    #[test]
    fn test_render_with_frontier_and_visited() {
        let mut grid = Grid::parse("A.B\n...").unwrap();

        let outcome = bfs(&mut grid).unwrap();

        assert_eq!(outcome.path, points(&[(0, 0), (1, 0), (2, 0)]));
        assert_eq!(outcome.frontier, 1);
        assert_eq!(outcome.visited, 5);
        assert_eq!(outcome.board, "AoB\nx*.");
    }

    #[test]
    fn test_first_discovery_wins() {
        let mut grid = Grid::parse("A..\n.#.\n..B").unwrap();

        let outcome = bfs(&mut grid).unwrap();

        // east is explored before south, so the route over the top is found
        assert_eq!(
            outcome.path,
            points(&[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)])
        );
        assert_eq!(outcome.board, "Aoo\nx#o\nxxB");
    }

    #[test]
    fn test_ignores_weights() {
        // the mountain is on the shortest route, the long way round is free
        let mut grid = Grid::parse("AmB\n...").unwrap();

        let outcome = bfs(&mut grid).unwrap();

        assert_eq!(outcome.path, points(&[(0, 0), (1, 0), (2, 0)]));
        assert_eq!(outcome.cost, 51);
    }

    #[test]
    fn test_deterministic_on_copies() {
        let source = "A....\n.#.#.\n.....\n.#.#.\n....B";
        let mut first = Grid::parse(source).unwrap();
        let mut second = Grid::parse(source).unwrap();

        let a = bfs(&mut first).unwrap();
        let b = bfs(&mut second).unwrap();

        assert_eq!(a.path, b.path);
        assert_eq!(a.board, b.board);
        assert_eq!(a.edges(), 8);
    }

    #[test]
    fn test_refuses_stale_grid() {
        let mut grid = Grid::parse("A.B").unwrap();
        let first = bfs(&mut grid).unwrap();

        assert_eq!(bfs(&mut grid), Err(GridError::StalePathState));

        let mut copy = grid.clone();
        assert_eq!(bfs(&mut copy).unwrap().path, first.path);

        grid.reset();
        assert_eq!(bfs(&mut grid).unwrap().path, first.path);
    }

    #[test]
    fn test_step_by_step() {
        let mut grid = Grid::parse("A.B").unwrap();
        let mut finder = BreadthFirst::new(&grid);

        assert_eq!(finder.step(&mut grid), PathFinderState::Computing);
        assert_eq!(finder.frontier().count(), 1);
        assert_eq!(finder.step(&mut grid), PathFinderState::Computing);
        assert_eq!(finder.visited().len(), 3);
        assert_eq!(finder.step(&mut grid), PathFinderState::GoalReached);
        // finished searches stay finished
        assert_eq!(finder.step(&mut grid), PathFinderState::GoalReached);
        assert_eq!(finder.state(), PathFinderState::GoalReached);
    }

    #[test]
    fn test_exhausted_queue() {
        let mut grid = Grid::parse("A#B").unwrap();
        let finder = BreadthFirst::new(&grid);

        let (state, exploration) = finder.finish(&mut grid);

        assert_eq!(state, PathFinderState::NoPathFound);
        assert!(exploration.frontier.is_empty());
        assert_eq!(exploration.visited, HashSet::from([grid.start()]));
    }

    #[test]
    fn test_huge_default_cost() {
        let options = ParseOptions {
            default_cost: Some(usize::MAX),
            default_heuristic: None,
        };
        let mut grid = Grid::parse_with("A.B", &Alphabet::default(), options).unwrap();

        let outcome = bfs(&mut grid).unwrap();

        assert_eq!(outcome.cost, usize::MAX);
        assert_eq!(outcome.board, "AoB");
    }
}
