//! Board module - manages the game grid
//!
//! The board is an NxN grid (N in 3..=8) where each cell is 0 (empty) or a
//! power of two. Uses a flat row-major vector; the side length never changes
//! after construction.
//! Coordinates: (row, col) where row 0 is the top and col 0 is the left edge.

use arrayvec::ArrayVec;

use crate::error::EngineError;
use crate::types::{is_valid_size, Direction, MAX_SIZE, MAX_TILE};

/// Scratch buffer for one line. Never holds more than `MAX_SIZE` cells.
pub type Line = ArrayVec<u64, MAX_SIZE>;

/// The game board - NxN cells in row-major order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    /// Flat array of cells, row-major order (row * size + col)
    cells: Vec<u64>,
}

impl Board {
    /// Create a new empty board
    pub fn new(size: usize) -> Result<Self, EngineError> {
        if !is_valid_size(size) {
            return Err(EngineError::InvalidSize(size));
        }
        Ok(Self {
            size,
            cells: vec![0; size * size],
        })
    }

    /// Build a board from rows, validating shape and cell values.
    pub fn from_rows(rows: &[Vec<u64>]) -> Result<Self, EngineError> {
        let size = rows.len();
        if !is_valid_size(size) {
            return Err(EngineError::InvalidSize(size));
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(EngineError::InvalidBoard(format!(
                    "row {row_idx} has {} cells, expected {size}",
                    row.len()
                )));
            }
            for (col_idx, &value) in row.iter().enumerate() {
                if !is_tile_value(value) {
                    return Err(EngineError::InvalidBoard(format!(
                        "cell ({row_idx}, {col_idx}) holds {value}, not 0 or a power of two"
                    )));
                }
                cells.push(value);
            }
        }

        Ok(Self { size, cells })
    }

    /// Side length of the board
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.size || col >= self.size {
            return None;
        }
        Some(row * self.size + col)
    }

    /// Get cell at (row, col). Returns None if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<u64> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Set cell at (row, col). Returns false if out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: u64) -> bool {
        match self.index(row, col) {
            Some(idx) => {
                self.cells[idx] = value;
                true
            }
            None => false,
        }
    }

    /// Flat row-major cells.
    pub fn cells(&self) -> &[u64] {
        &self.cells
    }

    /// Copy out as a vector of rows.
    pub fn to_rows(&self) -> Vec<Vec<u64>> {
        self.cells.chunks(self.size).map(|row| row.to_vec()).collect()
    }

    /// Positions (row, col) of all empty cells, in row-major order.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 0)
            .map(|(idx, _)| (idx / self.size, idx % self.size))
            .collect()
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    pub fn count_tiles(&self) -> usize {
        self.cells.len() - self.count_empty()
    }

    /// Check whether any horizontally or vertically adjacent pair could merge.
    /// No wraparound. `MAX_TILE` pairs do not count.
    pub fn has_adjacent_pair(&self) -> bool {
        let n = self.size;
        for row in 0..n {
            for col in 0..n {
                let v = self.cells[row * n + col];
                if v == MAX_TILE {
                    continue;
                }
                if col + 1 < n && v == self.cells[row * n + col + 1] {
                    return true;
                }
                if row + 1 < n && v == self.cells[(row + 1) * n + col] {
                    return true;
                }
            }
        }
        false
    }

    /// A board is finished when it is full and nothing can merge.
    pub fn is_game_over(&self) -> bool {
        self.count_empty() == 0 && !self.has_adjacent_pair()
    }

    /// Copy line `i` in storage order: row `i` for horizontal moves, column `i` otherwise.
    fn read_line(&self, i: usize, horizontal: bool) -> Line {
        let n = self.size;
        (0..n)
            .map(|k| {
                if horizontal {
                    self.cells[i * n + k]
                } else {
                    self.cells[k * n + i]
                }
            })
            .collect()
    }

    fn write_line(&mut self, i: usize, horizontal: bool, line: &[u64]) {
        let n = self.size;
        for (k, &value) in line.iter().enumerate() {
            if horizontal {
                self.cells[i * n + k] = value;
            } else {
                self.cells[k * n + i] = value;
            }
        }
    }

    /// Slide every line toward `direction`, merging equal neighbours.
    ///
    /// Returns `(changed, gained)`: whether any cell differs from the board
    /// before the call (compared over the whole board), and the total value
    /// of tiles formed by merges.
    pub fn slide(&mut self, direction: Direction) -> (bool, u64) {
        let before = self.cells.clone();
        let horizontal = direction.is_horizontal();
        let reverse = direction.is_reversed();

        let mut gained = 0;
        for i in 0..self.size {
            let mut line = self.read_line(i, horizontal);
            gained += slide_line(&mut line, reverse);
            self.write_line(i, horizontal, &line);
        }

        (self.cells != before, gained)
    }
}

/// Check that a value may appear in a cell: 0 or a power of two in 2..=`MAX_TILE`.
pub fn is_tile_value(value: u64) -> bool {
    value == 0 || ((2..=MAX_TILE).contains(&value) && value.is_power_of_two())
}

/// Compact and merge one line toward index 0, in place.
///
/// With `reverse` the line is flipped before and after so the merge target
/// becomes the far end. Each tile merges at most once per call and
/// `MAX_TILE` tiles never merge. Returns the
/// sum of the merged tiles. Lines are at most `MAX_SIZE` long.
pub fn slide_line(line: &mut [u64], reverse: bool) -> u64 {
    if reverse {
        line.reverse();
    }

    let mut packed: Line = line.iter().copied().filter(|&v| v != 0).collect();

    let mut gained = 0;
    let mut k = 0;
    while k + 1 < packed.len() {
        if packed[k] == packed[k + 1] && packed[k] < MAX_TILE {
            packed[k] *= 2;
            gained += packed[k];
            packed.remove(k + 1);
        }
        k += 1;
    }

    line.fill(0);
    line[..packed.len()].copy_from_slice(&packed);

    if reverse {
        line.reverse();
    }
    gained
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slid(mut line: Vec<u64>, reverse: bool) -> (Vec<u64>, u64) {
        let gained = slide_line(&mut line, reverse);
        (line, gained)
    }

    #[test]
    fn test_board_index_calculation() {
        let board = Board::new(4).unwrap();
        assert_eq!(board.index(0, 0), Some(0));
        assert_eq!(board.index(0, 3), Some(3));
        assert_eq!(board.index(1, 0), Some(4));
        assert_eq!(board.index(3, 3), Some(15));
        assert_eq!(board.index(4, 0), None);
        assert_eq!(board.index(0, 4), None);
    }

    #[test]
    fn test_new_rejects_bad_sizes() {
        assert_eq!(Board::new(2), Err(EngineError::InvalidSize(2)));
        assert_eq!(Board::new(9), Err(EngineError::InvalidSize(9)));
        assert!(Board::new(3).is_ok());
        assert!(Board::new(8).is_ok());
    }

    #[test]
    fn test_slide_line_packs_and_merges() {
        assert_eq!(slid(vec![2, 2, 2, 2], false), (vec![4, 4, 0, 0], 8));
        assert_eq!(slid(vec![2, 2, 2], false), (vec![4, 2, 0], 4));
        assert_eq!(slid(vec![0, 2, 0, 2], false), (vec![4, 0, 0, 0], 4));
        assert_eq!(slid(vec![2, 4, 8, 16], false), (vec![2, 4, 8, 16], 0));
    }

    #[test]
    fn test_slide_line_no_chain_merge() {
        // The fresh 8 must not absorb the following 8.
        assert_eq!(slid(vec![4, 4, 8, 0], false), (vec![8, 8, 0, 0], 8));
    }

    #[test]
    fn test_slide_line_reversed() {
        assert_eq!(slid(vec![2, 2, 2, 0], true), (vec![0, 0, 2, 4], 4));
        assert_eq!(slid(vec![2, 0, 0, 0], true), (vec![0, 0, 0, 2], 0));
    }

    #[test]
    fn test_slide_columns() {
        let mut board = Board::from_rows(&[
            vec![2, 0, 0],
            vec![2, 0, 0],
            vec![4, 0, 0],
        ])
        .unwrap();

        let (changed, gained) = board.slide(Direction::Down);
        assert!(changed);
        assert_eq!(gained, 4);
        assert_eq!(
            board.to_rows(),
            vec![vec![0, 0, 0], vec![4, 0, 0], vec![4, 0, 0]]
        );
    }

    #[test]
    fn test_from_rows_rejects_bad_values() {
        let bad = vec![vec![3, 0, 0], vec![0, 0, 0], vec![0, 0, 0]];
        assert!(matches!(
            Board::from_rows(&bad),
            Err(EngineError::InvalidBoard(_))
        ));

        let ragged = vec![vec![0, 0, 0], vec![0, 0], vec![0, 0, 0]];
        assert!(matches!(
            Board::from_rows(&ragged),
            Err(EngineError::InvalidBoard(_))
        ));
    }

    #[test]
    fn test_tile_values() {
        assert!(is_tile_value(0));
        assert!(is_tile_value(2));
        assert!(is_tile_value(1 << 40));
        assert!(is_tile_value(MAX_TILE));
        assert!(!is_tile_value(MAX_TILE * 2));
        assert!(!is_tile_value(1 << 63));
        assert!(!is_tile_value(1));
        assert!(!is_tile_value(6));
    }

    #[test]
    fn test_from_rows_rejects_tiles_above_cap() {
        let rows = vec![vec![MAX_TILE, 0, 0], vec![0; 3], vec![0; 3]];
        assert!(Board::from_rows(&rows).is_ok());

        let rows = vec![vec![1 << 63, 0, 0], vec![0; 3], vec![0; 3]];
        assert!(Board::from_rows(&rows).is_err());
    }

    #[test]
    fn test_capped_tiles_do_not_merge() {
        assert_eq!(slid(vec![MAX_TILE, MAX_TILE, 0], false), (vec![MAX_TILE, MAX_TILE, 0], 0));
        assert_eq!(
            slid(vec![MAX_TILE / 2, MAX_TILE / 2, 0], false),
            (vec![MAX_TILE, 0, 0], MAX_TILE)
        );

        let rows = vec![
            vec![MAX_TILE, MAX_TILE, 2],
            vec![4, 8, 16],
            vec![32, 64, 128],
        ];
        let board = Board::from_rows(&rows).unwrap();
        assert!(!board.has_adjacent_pair());
        assert!(board.is_game_over());
    }
}
