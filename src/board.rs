use rand::{seq::SliceRandom, Rng};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::BoardError;

/// Direction the blank travels in a single slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Neighbor generation order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// `(row, col)` delta applied to the blank.
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Down => "Down",
            Move::Left => "Left",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// One immutable configuration of an N×N sliding puzzle.
///
/// Tiles are stored row-major with `0` as the blank. Both heuristics are
/// computed once at construction, every "change" produces a new board.
#[derive(Clone, Debug)]
pub struct Board {
    size: usize,
    tiles: Box<[u16]>,
    blank: usize,
    hamming: usize,
    manhattan: usize,
}

impl Board {
    /// Builds a board from a square grid of rows.
    pub fn new<R: AsRef<[u16]>>(grid: &[R]) -> Result<Self, BoardError> {
        let size = grid.len();
        if size == 0 {
            return Err(BoardError::Empty);
        }

        let mut tiles = Vec::with_capacity(size * size);
        for (row, cells) in grid.iter().enumerate() {
            let cells = cells.as_ref();
            if cells.len() != size {
                return Err(BoardError::NotSquare {
                    row,
                    len: cells.len(),
                    dimension: size,
                });
            }
            tiles.extend_from_slice(cells);
        }

        Self::from_tiles(size, tiles)
    }

    /// Builds a board from `size * size` row-major tile values.
    pub fn from_tiles(size: usize, tiles: Vec<u16>) -> Result<Self, BoardError> {
        let cells = Self::cell_count(size)?;
        if tiles.len() != cells {
            return Err(BoardError::CellCount {
                dimension: size,
                expected: cells,
                found: tiles.len(),
            });
        }

        let mut seen = vec![false; cells];
        for &value in &tiles {
            let index = usize::from(value);
            if index >= cells || seen[index] {
                return Err(BoardError::NotPermutation { value });
            }
            seen[index] = true;
        }

        Ok(Self::from_permutation(size, tiles.into_boxed_slice()))
    }

    /// The solved configuration: `1..N²-1` in row-major order, blank last.
    pub fn goal(size: usize) -> Result<Self, BoardError> {
        let cells = Self::cell_count(size)?;
        let tiles = (1..cells)
            .chain(std::iter::once(0))
            .map(|value| value as u16)
            .collect();
        Ok(Self::from_permutation(size, tiles))
    }

    /// A uniformly random permutation. About half of these are unsolvable.
    pub fn shuffled<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self, BoardError> {
        let cells = Self::cell_count(size)?;
        let mut tiles: Vec<u16> = (0..cells).map(|value| value as u16).collect();
        tiles.shuffle(rng);
        Ok(Self::from_permutation(size, tiles.into_boxed_slice()))
    }

    /// Random walk of `steps` slides away from the goal, never undoing the
    /// previous slide. Always solvable.
    pub fn scrambled<R: Rng + ?Sized>(
        size: usize,
        steps: usize,
        rng: &mut R,
    ) -> Result<Self, BoardError> {
        let mut board = Self::goal(size)?;
        let mut last: Option<Move> = None;

        for _ in 0..steps {
            let options: Vec<(Move, Board)> = Move::ALL
                .iter()
                .filter(|&&dir| last.map_or(true, |prev| dir != prev.opposite()))
                .filter_map(|&dir| board.slide(dir).map(|next| (dir, next)))
                .collect();

            match options.choose(rng) {
                Some((dir, next)) => {
                    last = Some(*dir);
                    board = next.clone();
                }
                // 1x1 board, nothing to slide
                None => break,
            }
        }

        Ok(board)
    }

    fn cell_count(size: usize) -> Result<usize, BoardError> {
        if size == 0 {
            return Err(BoardError::Empty);
        }
        size.checked_mul(size)
            .filter(|&cells| cells <= usize::from(u16::MAX) + 1)
            .ok_or(BoardError::TooLarge { dimension: size })
    }

    /// Caller guarantees `tiles` is a permutation of `0..size*size`.
    fn from_permutation(size: usize, tiles: Box<[u16]>) -> Self {
        let mut blank = 0;
        let mut hamming = 0;
        let mut manhattan = 0;

        for (index, &value) in tiles.iter().enumerate() {
            if value == 0 {
                blank = index;
                continue;
            }
            let target = usize::from(value) - 1;
            if target != index {
                hamming += 1;
                manhattan += (index / size).abs_diff(target / size)
                    + (index % size).abs_diff(target % size);
            }
        }

        Self {
            size,
            tiles,
            blank,
            hamming,
            manhattan,
        }
    }

    fn swapped(&self, a: usize, b: usize) -> Self {
        let mut tiles = self.tiles.clone();
        tiles.swap(a, b);
        Self::from_permutation(self.size, tiles)
    }

    pub fn dimension(&self) -> usize {
        self.size
    }

    pub fn tile(&self, row: usize, col: usize) -> Option<u16> {
        if row < self.size && col < self.size {
            Some(self.tiles[row * self.size + col])
        } else {
            None
        }
    }

    /// Row-major tile values.
    pub fn tiles(&self) -> &[u16] {
        &self.tiles
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u16]> + '_ {
        self.tiles.chunks(self.size)
    }

    /// `(row, col)` of the blank.
    pub fn blank(&self) -> (usize, usize) {
        (self.blank / self.size, self.blank % self.size)
    }

    /// Number of tiles out of place, blank excluded.
    pub fn hamming(&self) -> usize {
        self.hamming
    }

    /// Sum of each tile's row and column distance from its goal cell,
    /// blank excluded.
    pub fn manhattan(&self) -> usize {
        self.manhattan
    }

    pub fn is_goal(&self) -> bool {
        self.manhattan == 0
    }

    /// Swaps the first pair of horizontally adjacent non-blank tiles,
    /// scanning rows top to bottom. The result has the opposite permutation
    /// parity, so exactly one of a board and its twin is solvable.
    ///
    /// Returns `None` for a 1x1 board, which has no such pair.
    pub fn twin(&self) -> Option<Self> {
        let n = self.size;
        for row in 0..n {
            for col in 0..n.saturating_sub(1) {
                let index = row * n + col;
                if self.tiles[index] != 0 && self.tiles[index + 1] != 0 {
                    return Some(self.swapped(index, index + 1));
                }
            }
        }
        None
    }

    /// The board reached by moving the blank one cell in `dir`, or `None`
    /// if that would leave the grid.
    pub fn slide(&self, dir: Move) -> Option<Self> {
        let (row, col) = self.blank();
        let (dr, dc) = dir.offset();

        let new_row = row.checked_add_signed(dr)?;
        let new_col = col.checked_add_signed(dc)?;
        if new_row >= self.size || new_col >= self.size {
            return None;
        }

        Some(self.swapped(self.blank, new_row * self.size + new_col))
    }

    /// All boards one slide away, in up, down, left, right order.
    pub fn neighbors(&self) -> Vec<Self> {
        Move::ALL.iter().filter_map(|&dir| self.slide(dir)).collect()
    }

    /// The slide that turns `self` into `other`, if they are adjacent.
    pub fn move_to(&self, other: &Board) -> Option<Move> {
        if self.size != other.size {
            return None;
        }
        Move::ALL
            .into_iter()
            .find(|&dir| self.slide(dir).as_ref() == Some(other))
    }

    /// Solvability from inversion parity. The solver does not use this; it
    /// serves board generation and cross-checking.
    pub fn is_solvable_by_parity(&self) -> bool {
        let inversions = Self::count_inversions(&self.tiles);

        if self.size % 2 == 1 {
            // Odd width: solvable iff the inversion count is even
            inversions % 2 == 0
        } else {
            // Even width: solvable iff inversions plus the blank's row is odd
            (inversions + self.blank / self.size) % 2 == 1
        }
    }

    fn count_inversions(flattened: &[u16]) -> usize {
        flattened
            .iter()
            .enumerate()
            .filter(|&(_, &val)| val != 0)
            .map(|(i, &val)| {
                flattened[i + 1..]
                    .iter()
                    .filter(|&&next| next != 0 && next < val)
                    .count()
            })
            .sum()
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.tiles == other.tiles
    }
}

impl Eq for Board {}

impl Hash for Board {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.size.hash(state);
        self.tiles.hash(state);
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.size)?;
        for row in self.rows() {
            for &val in row {
                write!(f, "{:2} ", val)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn board(grid: &[&[u16]]) -> Board {
        Board::new(grid).unwrap()
    }

    fn any_board(max_size: usize) -> impl Strategy<Value = Board> {
        (2..=max_size).prop_flat_map(|size| {
            let tiles: Vec<u16> = (0..size * size).map(|v| v as u16).collect();
            Just(tiles)
                .prop_shuffle()
                .prop_map(move |tiles| Board::from_tiles(size, tiles).unwrap())
        })
    }

    #[test]
    fn test_rejects_bad_grids() {
        let empty: &[&[u16]] = &[];
        assert_eq!(Board::new(empty), Err(BoardError::Empty));
        assert_eq!(
            Board::new(&[&[1u16, 2][..], &[3][..]]),
            Err(BoardError::NotSquare {
                row: 1,
                len: 1,
                dimension: 2
            })
        );
        assert_eq!(
            Board::new(&[[1u16, 1], [3, 0]]),
            Err(BoardError::NotPermutation { value: 1 })
        );
        assert_eq!(
            Board::new(&[[1u16, 4], [3, 0]]),
            Err(BoardError::NotPermutation { value: 4 })
        );
        assert_eq!(
            Board::from_tiles(2, vec![1, 2, 0]),
            Err(BoardError::CellCount {
                dimension: 2,
                expected: 4,
                found: 3
            })
        );
        assert_eq!(Board::goal(300), Err(BoardError::TooLarge { dimension: 300 }));
    }

    #[test]
    fn test_goal() {
        let goal = Board::goal(3).unwrap();
        assert_eq!(goal, board(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 0]]));
        assert!(goal.is_goal());
        assert_eq!(goal.hamming(), 0);
        assert_eq!(goal.manhattan(), 0);
        assert_eq!(goal.blank(), (2, 2));
        assert!(Board::goal(1).unwrap().is_goal());
    }

    #[test]
    fn test_heuristics() {
        // Classic example: hamming 5, manhattan 10
        let b = board(&[&[8, 1, 3], &[4, 0, 2], &[7, 6, 5]]);
        assert_eq!(b.dimension(), 3);
        assert_eq!(b.hamming(), 5);
        assert_eq!(b.manhattan(), 10);
        assert!(!b.is_goal());
    }

    #[test]
    fn test_blank_misplaced_is_not_counted() {
        let b = board(&[&[1, 2, 3], &[4, 5, 6], &[7, 0, 8]]);
        assert_eq!(b.hamming(), 1);
        assert_eq!(b.manhattan(), 1);
    }

    #[test]
    fn test_neighbors_order() {
        let b = board(&[&[1, 2, 3], &[4, 0, 5], &[6, 7, 8]]);
        let expected = vec![
            board(&[&[1, 0, 3], &[4, 2, 5], &[6, 7, 8]]),
            board(&[&[1, 2, 3], &[4, 7, 5], &[6, 0, 8]]),
            board(&[&[1, 2, 3], &[0, 4, 5], &[6, 7, 8]]),
            board(&[&[1, 2, 3], &[4, 5, 0], &[6, 7, 8]]),
        ];
        assert_eq!(b.neighbors(), expected);
    }

    #[test]
    fn test_neighbors_corner_and_edge() {
        let corner = board(&[&[0, 1, 2], &[3, 4, 5], &[6, 7, 8]]);
        assert_eq!(
            corner.neighbors(),
            vec![
                board(&[&[3, 1, 2], &[0, 4, 5], &[6, 7, 8]]),
                board(&[&[1, 0, 2], &[3, 4, 5], &[6, 7, 8]]),
            ]
        );

        let edge = board(&[&[1, 2, 3], &[4, 5, 6], &[7, 0, 8]]);
        assert_eq!(edge.neighbors().len(), 3);
        assert!(Board::goal(1).unwrap().neighbors().is_empty());
    }

    #[test]
    fn test_twin() {
        let b = board(&[&[0, 1, 3], &[4, 2, 5], &[7, 8, 6]]);
        assert_eq!(
            b.twin(),
            Some(board(&[&[0, 3, 1], &[4, 2, 5], &[7, 8, 6]]))
        );

        let b = board(&[&[1, 0], &[2, 3]]);
        assert_eq!(b.twin(), Some(board(&[&[1, 0], &[3, 2]])));

        assert_eq!(Board::goal(1).unwrap().twin(), None);
    }

    #[test]
    fn test_twin_leaves_original() {
        let b = Board::goal(3).unwrap();
        let twin = b.twin().unwrap();
        assert_ne!(b, twin);
        assert_eq!(b, Board::goal(3).unwrap());
    }

    #[test]
    fn test_slide_and_move_to() {
        let b = board(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 0]]);
        assert_eq!(b.slide(Move::Down), None);
        assert_eq!(b.slide(Move::Right), None);

        let left = b.slide(Move::Left).unwrap();
        assert_eq!(left, board(&[&[1, 2, 3], &[4, 5, 6], &[7, 0, 8]]));
        assert_eq!(b.move_to(&left), Some(Move::Left));
        assert_eq!(left.move_to(&b), Some(Move::Right));
        assert_eq!(b.move_to(&b), None);
        assert_eq!(b.move_to(&Board::goal(2).unwrap()), None);
    }

    #[test]
    fn test_parity() {
        assert!(Board::goal(3).unwrap().is_solvable_by_parity());
        assert!(Board::goal(4).unwrap().is_solvable_by_parity());
        assert!(!board(&[&[1, 2, 3], &[4, 5, 6], &[8, 7, 0]]).is_solvable_by_parity());
        assert!(!board(&[&[2, 1], &[3, 0]]).is_solvable_by_parity());
    }

    #[test]
    fn test_scrambled_is_solvable() {
        let mut rng = StdRng::seed_from_u64(7);
        for size in 2..=4 {
            let b = Board::scrambled(size, 30, &mut rng).unwrap();
            assert_eq!(b.dimension(), size);
            assert!(b.is_solvable_by_parity());
        }
        assert!(Board::scrambled(1, 10, &mut rng).unwrap().is_goal());
    }

    #[test]
    fn test_display() {
        let b = board(&[&[1, 2], &[3, 0]]);
        assert_eq!(b.to_string(), "2\n 1  2 \n 3  0 \n");
    }

    proptest! {
        #[test]
        fn prop_heuristics_ordered(b in any_board(4)) {
            prop_assert_eq!(&b, &b.clone());
            prop_assert!(b.manhattan() >= b.hamming());
            prop_assert_eq!(b.hamming() == 0, b.is_goal());
        }

        #[test]
        fn prop_neighbors_are_single_slides(b in any_board(4)) {
            let neighbors = b.neighbors();
            prop_assert!((2..=4).contains(&neighbors.len()));
            for next in &neighbors {
                let changed: Vec<usize> = (0..b.tiles().len())
                    .filter(|&i| b.tiles()[i] != next.tiles()[i])
                    .collect();
                prop_assert_eq!(changed.len(), 2);
                prop_assert!(changed.iter().any(|&i| b.tiles()[i] == 0));
                prop_assert!(Board::from_tiles(b.dimension(), next.tiles().to_vec()).is_ok());
            }
        }

        #[test]
        fn prop_twin_flips_parity(b in any_board(5)) {
            let twin = b.twin().unwrap();
            prop_assert_ne!(b.is_solvable_by_parity(), twin.is_solvable_by_parity());
        }

        #[test]
        fn prop_sliding_preserves_parity(b in any_board(4)) {
            for next in b.neighbors() {
                prop_assert_eq!(b.is_solvable_by_parity(), next.is_solvable_by_parity());
            }
        }
    }

    #[test]
    fn test_shuffled_is_permutation() {
        let mut rng = StdRng::seed_from_u64(1);
        let b = Board::shuffled(4, &mut rng).unwrap();
        let mut tiles = b.tiles().to_vec();
        tiles.sort_unstable();
        assert_eq!(tiles, (0..16).collect::<Vec<u16>>());
    }
}
