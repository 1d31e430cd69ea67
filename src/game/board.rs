use std::fmt;

use super::Player;
use crate::error::MoveError;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Bits reserved per column: the playable rows plus one guard bit on top.
pub const COLUMN_BITS: usize = ROWS + 1;

/// One bit at the bottom of every column.
pub const BOTTOM_MASK: u64 = bottom_mask();

/// Every playable cell (guard bits excluded).
pub const BOARD_MASK: u64 = BOTTOM_MASK * ((1 << ROWS) - 1);

/// The guard bit of every column. A height pointing here means the column is full.
pub const TOP_MASK: u64 = BOTTOM_MASK << ROWS;

/// Column ordering: center-first for better alpha-beta pruning.
pub const CENTER_ORDER: [usize; COLS] = [3, 2, 4, 1, 5, 0, 6];

/// Columns that can currently accept a piece.
pub type LegalActions = Vec<usize>;

const fn bottom_mask() -> u64 {
    let mut mask = 0;
    let mut col = 0;
    while col < COLS {
        mask |= 1 << (col * COLUMN_BITS);
        col += 1;
    }
    mask
}

/// Bit index of a cell. Row 0 is the bottom of the column.
pub const fn cell_bit(row: usize, col: usize) -> u64 {
    1 << (col * COLUMN_BITS + row)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Red,
    Yellow,
}

/// Bitboard pair plus per-column heights.
///
/// Bit `col * 7 + row` belongs to cell (row, col); bit 6 of every column is a
/// guard that is never set. `heights[col]` is the absolute index of the next
/// free bit in that column and `counter` the number of pieces on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    bits: [u64; 2],
    heights: [u8; COLS],
    counter: u8,
}

/// O(1) copy of everything [`Board::restore`] needs to undo moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    bits: [u64; 2],
    heights: [u8; COLS],
    counter: u8,
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        let mut heights = [0u8; COLS];
        for (col, h) in heights.iter_mut().enumerate() {
            *h = (col * COLUMN_BITS) as u8;
        }
        Board {
            bits: [0, 0],
            heights,
            counter: 0,
        }
    }

    /// Build a board by alternating drops, starting with `first`.
    pub fn from_moves(first: Player, columns: &[usize]) -> Result<Self, MoveError> {
        let mut board = Board::new();
        let mut player = first;
        for &col in columns {
            board.apply(col, player)?;
            player = player.other();
        }
        Ok(board)
    }

    /// Clear the board for a new round.
    pub fn reset(&mut self) {
        *self = Board::new();
    }

    /// Get the cell at a specific position.
    /// Row 0 is the bottom, row 5 is the top.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        let bit = cell_bit(row, col);
        Player::BOTH
            .into_iter()
            .find(|&p| self.bits(p) & bit != 0)
            .map_or(Cell::Empty, Player::to_cell)
    }

    /// Bitboard of one player's pieces.
    pub fn bits(&self, player: Player) -> u64 {
        self.bits[player.index()]
    }

    /// Raw `(red, yellow)` pair, used as the transposition key.
    pub fn key(&self) -> [u64; 2] {
        self.bits
    }

    /// Union of both players' pieces.
    pub fn occupied(&self) -> u64 {
        self.bits[0] | self.bits[1]
    }

    /// Number of pieces on the board.
    pub fn counter(&self) -> usize {
        self.counter as usize
    }

    /// Number of pieces in a column.
    pub fn column_height(&self, col: usize) -> usize {
        self.heights[col] as usize - col * COLUMN_BITS
    }

    /// True if `col` is on the board and its next bit is not the guard.
    pub fn is_valid_location(&self, col: usize) -> bool {
        col < COLS && (1u64 << self.heights[col]) & TOP_MASK == 0
    }

    /// Check if a column is full (or does not exist)
    pub fn is_column_full(&self, col: usize) -> bool {
        !self.is_valid_location(col)
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| self.is_column_full(col))
    }

    /// Bit a piece dropped into `col` would occupy, if the column has room.
    pub fn landing_bit(&self, col: usize) -> Option<u64> {
        self.is_valid_location(col).then(|| 1u64 << self.heights[col])
    }

    /// Exactly one bit per non-full column: the cell the next drop lands on.
    pub fn playable_mask(&self) -> u64 {
        (0..COLS)
            .filter_map(|col| self.landing_bit(col))
            .fold(0, |mask, bit| mask | bit)
    }

    /// Legal columns, center first.
    pub fn legal_columns(&self) -> LegalActions {
        CENTER_ORDER
            .iter()
            .copied()
            .filter(|&col| self.is_valid_location(col))
            .collect()
    }

    /// Drop a piece for `player` into `col`.
    pub fn apply(&mut self, col: usize, player: Player) -> Result<(), MoveError> {
        if col >= COLS {
            return Err(MoveError::InvalidColumn(col));
        }
        if !self.is_valid_location(col) {
            return Err(MoveError::ColumnFull(col));
        }
        self.drop_unchecked(col, player);
        Ok(())
    }

    /// Drop without validation. Callers must have checked `is_valid_location`.
    pub(crate) fn drop_unchecked(&mut self, col: usize, player: Player) {
        debug_assert!(self.is_valid_location(col), "drop into full column {col}");
        self.bits[player.index()] |= 1u64 << self.heights[col];
        self.heights[col] += 1;
        self.counter += 1;
    }

    /// True if `bits` contains four in a row in any direction.
    ///
    /// Each direction is two chained `bits & (bits >> shift)` reductions.
    /// The guard row keeps horizontal and diagonal shifts from wrapping
    /// into the neighbouring column.
    pub fn has_four(bits: u64) -> bool {
        [1usize, COLUMN_BITS, COLUMN_BITS - 1, COLUMN_BITS + 1]
            .iter()
            .any(|&shift| {
                let pairs = bits & (bits >> shift);
                pairs & (pairs >> (2 * shift)) != 0
            })
    }

    /// Check if the player already has four in a row.
    pub fn check_victory(&self, player: Player) -> bool {
        Self::has_four(self.bits(player))
    }

    /// Check whether dropping into `col` wins for `player`, without mutating.
    pub fn is_winning_move(&self, col: usize, player: Player) -> bool {
        match self.landing_bit(col) {
            Some(bit) => Self::has_four(self.bits(player) | bit),
            None => false,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            bits: self.bits,
            heights: self.heights,
            counter: self.counter,
        }
    }

    pub fn restore(&mut self, snapshot: Snapshot) {
        self.bits = snapshot.bits;
        self.heights = snapshot.heights;
        self.counter = snapshot.counter;
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..ROWS).rev() {
            for col in 0..COLS {
                let c = match self.get(row, col) {
                    Cell::Empty => '.',
                    Cell::Red => 'R',
                    Cell::Yellow => 'Y',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        write!(f, "0123456")
    }
}
