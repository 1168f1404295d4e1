use std::cmp::Ordering;
use std::iter;
use std::rc::Rc;

use log::{debug, info, trace, warn};

use crate::board::{Board, Move};
use crate::error::SolveError;
use crate::frontier::PriorityFrontier;

/// One state in a search tree. Nodes share their ancestors, so the
/// predecessor link is reference counted.
#[derive(Debug)]
struct SearchNode {
    board: Board,
    moves: usize,
    priority: usize,
    previous: Option<Rc<SearchNode>>,
}

impl SearchNode {
    fn root(board: Board) -> Self {
        let priority = board.manhattan();
        Self {
            board,
            moves: 0,
            priority,
            previous: None,
        }
    }

    fn child(board: Board, previous: &Rc<SearchNode>) -> Self {
        let moves = previous.moves + 1;
        let priority = moves + board.manhattan();
        Self {
            board,
            moves,
            priority,
            previous: Some(Rc::clone(previous)),
        }
    }

    fn reverts_to_parent(&self, board: &Board) -> bool {
        self.previous
            .as_ref()
            .map_or(false, |previous| previous.board == *board)
    }
}

// Lower priority first; on equal priority, fewer moves first.
impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| self.moves.cmp(&other.moves))
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchNode {}

/// Bounds on the work a single solve may do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum nodes popped, summed over the primary and twin trees.
    pub max_expansions: Option<usize>,
}

impl SearchLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_expansions(max_expansions: usize) -> Self {
        Self {
            max_expansions: Some(max_expansions),
        }
    }
}

/// Node counts for both trees of a finished solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub expanded: usize,
    pub generated: usize,
    pub twin_expanded: usize,
    pub twin_generated: usize,
}

impl SearchStats {
    pub fn total_expanded(&self) -> usize {
        self.expanded + self.twin_expanded
    }
}

enum Step {
    Goal(Rc<SearchNode>),
    Expanded,
    Exhausted,
}

struct SearchTree {
    name: &'static str,
    frontier: PriorityFrontier<Rc<SearchNode>>,
    expanded: usize,
    generated: usize,
}

impl SearchTree {
    fn new(name: &'static str, root: Board) -> Self {
        let mut frontier = PriorityFrontier::new();
        frontier.push(Rc::new(SearchNode::root(root)));
        Self {
            name,
            frontier,
            expanded: 0,
            generated: 1,
        }
    }

    fn is_exhausted(&self) -> bool {
        self.frontier.is_empty()
    }

    fn step(&mut self) -> Step {
        let Some(current) = self.frontier.pop() else {
            return Step::Exhausted;
        };
        self.expanded += 1;

        trace!(
            "{}: expand moves={} priority={} frontier={}",
            self.name,
            current.moves,
            current.priority,
            self.frontier.len()
        );

        if current.board.is_goal() {
            return Step::Goal(current);
        }

        for neighbor in current.board.neighbors() {
            if current.reverts_to_parent(&neighbor) {
                continue;
            }
            self.frontier
                .push(Rc::new(SearchNode::child(neighbor, &current)));
            self.generated += 1;
        }

        Step::Expanded
    }
}

/// A* solver for one initial board.
///
/// The search runs on the board and on its [twin](Board::twin) in lockstep.
/// Exactly one of the two can reach the goal, so whichever tree gets there
/// first decides solvability.
#[derive(Debug)]
pub struct Solver {
    goal: Option<Rc<SearchNode>>,
    stats: SearchStats,
}

impl Solver {
    /// Solves `initial` with no bound on the work done.
    pub fn new(initial: Board) -> Self {
        match Self::with_limits(initial, SearchLimits::unbounded()) {
            Ok(solver) => solver,
            Err(err) => unreachable!("unbounded search reported {err}"),
        }
    }

    /// Solves `initial`, giving up with [`SolveError::ResourceExhausted`]
    /// once `limits` is exceeded.
    pub fn with_limits(initial: Board, limits: SearchLimits) -> Result<Self, SolveError> {
        debug!(
            "solving {n}x{n} board, manhattan {}, hamming {}",
            initial.manhattan(),
            initial.hamming(),
            n = initial.dimension()
        );

        // Covers 1x1, where no twin exists.
        if initial.is_goal() {
            info!("board is already solved");
            return Ok(Self {
                goal: Some(Rc::new(SearchNode::root(initial))),
                stats: SearchStats {
                    expanded: 1,
                    generated: 1,
                    ..SearchStats::default()
                },
            });
        }

        let Some(twin) = initial.twin() else {
            unreachable!("a board that is not solved has at least two tiles");
        };
        let mut primary = SearchTree::new("primary", initial);
        let mut shadow = SearchTree::new("twin", twin);

        let check = |primary: &SearchTree, shadow: &SearchTree| match limits.max_expansions {
            Some(limit) if primary.expanded + shadow.expanded >= limit => {
                Err(SolveError::ResourceExhausted {
                    expanded: primary.expanded + shadow.expanded,
                    limit,
                })
            }
            _ => Ok(()),
        };

        let goal = loop {
            if primary.is_exhausted() && shadow.is_exhausted() {
                warn!("both search trees ran out of nodes without reaching the goal");
                break None;
            }

            check(&primary, &shadow)?;
            if let Step::Goal(node) = primary.step() {
                break Some(node);
            }

            check(&primary, &shadow)?;
            if let Step::Goal(_) = shadow.step() {
                break None;
            }
        };

        let stats = SearchStats {
            expanded: primary.expanded,
            generated: primary.generated,
            twin_expanded: shadow.expanded,
            twin_generated: shadow.generated,
        };

        match &goal {
            Some(node) => info!(
                "solved in {} moves after {} expansions",
                node.moves,
                stats.total_expanded()
            ),
            None => info!(
                "no solution, twin reached the goal after {} expansions",
                stats.total_expanded()
            ),
        }

        Ok(Self { goal, stats })
    }

    pub fn is_solvable(&self) -> bool {
        self.goal.is_some()
    }

    /// Minimum number of slides, or `-1` if the board is unsolvable.
    pub fn moves(&self) -> isize {
        self.goal.as_ref().map_or(-1, |node| node.moves as isize)
    }

    /// Boards from the initial board to the goal, both inclusive.
    pub fn solution(&self) -> Option<Vec<Board>> {
        let goal = self.goal.as_deref()?;
        let mut path: Vec<Board> = iter::successors(Some(goal), |node| node.previous.as_deref())
            .map(|node| node.board.clone())
            .collect();
        path.reverse();
        Some(path)
    }

    /// The blank's moves along [`solution`](Self::solution).
    pub fn solution_moves(&self) -> Option<Vec<Move>> {
        self.solution()?
            .windows(2)
            .map(|pair| pair[0].move_to(&pair[1]))
            .collect()
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}
