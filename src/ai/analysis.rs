//! Pure bitwise pattern analysis over a pair of bitboards.
//!
//! Both the adaptive evaluator and the opponent profiler read patterns through
//! these functions so they agree on what a "three" or a "live pair" is.

use crate::game::{cell_bit, BOARD_MASK, COLUMN_BITS, ROWS};

/// Every cell of the center column.
pub const CENTER_MASK: u64 = {
    let mut mask = 0;
    let mut row = 0;
    while row < ROWS {
        mask |= cell_bit(row, 3);
        row += 1;
    }
    mask
};

/// A line direction, identified by its bit shift in the 7-bit column layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Vertical,
    Horizontal,
    /// Rising to the left (`\`), shift 6.
    DiagonalDown,
    /// Rising to the right (`/`), shift 8.
    DiagonalUp,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Vertical,
        Direction::Horizontal,
        Direction::DiagonalDown,
        Direction::DiagonalUp,
    ];

    pub fn shift(self) -> usize {
        match self {
            Direction::Vertical => 1,
            Direction::Horizontal => COLUMN_BITS,
            Direction::DiagonalDown => COLUMN_BITS - 1,
            Direction::DiagonalUp => COLUMN_BITS + 1,
        }
    }

    pub fn is_diagonal(self) -> bool {
        matches!(self, Direction::DiagonalDown | Direction::DiagonalUp)
    }
}

/// Raw pattern counts for one side in one direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionPatterns {
    /// Empty cells completing four in this direction.
    pub threes: u32,
    /// `_XX_`
    pub double_open_pairs: u32,
    /// `XX_` or `_XX`, exactly one side open.
    pub single_open_pairs: u32,
    /// `X_X` with at least one outer cell free.
    pub split_pairs: u32,
}

/// Totals over every direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternCounts {
    pub threes: u32,
    pub twos: u32,
}

/// Empty playable cells. Guard bits and bits past the last column never count.
pub fn empty_cells(occupied: u64) -> u64 {
    !occupied & BOARD_MASK
}

/// Empty cells that would complete four in a row for `pieces` along `dir`.
///
/// Covers `_XXX`, `X_XX`, `XX_X` and `XXX_`. Two set bits exactly one shift
/// apart are always geometric neighbours because the guard row sits between
/// columns, so no per-cell bounds checks are needed.
pub fn directional_threats(pieces: u64, occupied: u64, dir: Direction) -> u64 {
    let s = dir.shift();
    let p = pieces;
    let mut threats = (p >> s) & (p >> (2 * s)) & (p >> (3 * s));
    threats |= (p << s) & (p >> s) & (p >> (2 * s));
    threats |= (p << (2 * s)) & (p << s) & (p >> s);
    threats |= (p << (3 * s)) & (p << (2 * s)) & (p << s);
    threats & empty_cells(occupied)
}

/// Union of [`directional_threats`] over all four directions.
pub fn threat_mask(pieces: u64, occupied: u64) -> u64 {
    Direction::ALL
        .iter()
        .fold(0, |mask, &dir| mask | directional_threats(pieces, occupied, dir))
}

/// Count three- and two-piece patterns for `pieces` along `dir`.
pub fn direction_patterns(pieces: u64, occupied: u64, dir: Direction) -> DirectionPatterns {
    let s = dir.shift();
    let empty = empty_cells(occupied);

    let pairs = pieces & (pieces >> s);
    let open_before = empty << s;
    let open_after = empty >> (2 * s);
    let double_open = pairs & open_before & open_after;
    let single_open = pairs & (open_before ^ open_after);

    let split = pieces & (pieces >> (2 * s)) & (empty >> s);
    let split_live = split & ((empty << s) | (empty >> (3 * s)));

    DirectionPatterns {
        threes: directional_threats(pieces, occupied, dir).count_ones(),
        double_open_pairs: double_open.count_ones(),
        single_open_pairs: single_open.count_ones(),
        split_pairs: split_live.count_ones(),
    }
}

/// Aggregate counts: threat cells and live pairs over all directions.
pub fn pattern_counts(pieces: u64, occupied: u64) -> PatternCounts {
    let twos = Direction::ALL
        .iter()
        .map(|&dir| {
            let d = direction_patterns(pieces, occupied, dir);
            d.double_open_pairs + d.single_open_pairs + d.split_pairs
        })
        .sum();
    PatternCounts {
        threes: threat_mask(pieces, occupied).count_ones(),
        twos,
    }
}

/// Empty cells that would turn a consecutive pair along `dir` into a three.
pub fn pair_extensions(pieces: u64, occupied: u64, dir: Direction) -> u64 {
    let s = dir.shift();
    let pairs = pieces & (pieces >> s);
    ((pairs >> s) | (pairs << (2 * s))) & empty_cells(occupied)
}

/// Pieces in the center column.
pub fn center_count(pieces: u64) -> u32 {
    (pieces & CENTER_MASK).count_ones()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, Player, COLS};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn cells(list: &[(usize, usize)]) -> u64 {
        list.iter().fold(0, |m, &(r, c)| m | cell_bit(r, c))
    }

    #[test]
    fn test_threat_mask_matches_simulated_drops() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut checked = 0;
        while checked < 5_000 {
            let a = rng.random::<u64>() & rng.random::<u64>() & BOARD_MASK;
            let b = rng.random::<u64>() & rng.random::<u64>() & BOARD_MASK & !a;
            if Board::has_four(a) {
                continue;
            }
            let occupied = a | b;
            let mask = threat_mask(a, occupied);
            for bit in (0..64).map(|i| 1u64 << i).filter(|&b| b & BOARD_MASK != 0) {
                if occupied & bit != 0 {
                    assert_eq!(mask & bit, 0, "occupied cell in threat mask");
                    continue;
                }
                assert_eq!(
                    mask & bit != 0,
                    Board::has_four(a | bit),
                    "pieces {a:#x} occupied {occupied:#x} cell {bit:#x}"
                );
            }
            checked += 1;
        }
    }

    #[test]
    fn test_threat_mask_never_hits_guard_bits() {
        // A full column topped by three: the cell above would be the guard.
        let pieces = cells(&[(3, 0), (4, 0), (5, 0)]);
        let occupied = pieces | cells(&[(0, 0), (1, 0), (2, 0)]);
        assert_eq!(threat_mask(pieces, occupied), 0);
    }

    #[test]
    fn test_gapped_horizontal_threats() {
        // X_XX on the bottom row: only the gap completes four.
        let pieces = cells(&[(0, 0), (0, 2), (0, 3)]);
        let mask = directional_threats(pieces, pieces, Direction::Horizontal);
        assert_eq!(mask, cell_bit(0, 1));

        // XX_X
        let pieces = cells(&[(0, 2), (0, 3), (0, 5)]);
        let mask = directional_threats(pieces, pieces, Direction::Horizontal);
        assert_eq!(mask, cell_bit(0, 4));
    }

    #[test]
    fn test_open_three_has_two_threats() {
        let pieces = cells(&[(0, 1), (0, 2), (0, 3)]);
        let mask = threat_mask(pieces, pieces);
        assert_eq!(mask, cell_bit(0, 0) | cell_bit(0, 4));
        assert_eq!(pattern_counts(pieces, pieces).threes, 2);
    }

    #[test]
    fn test_vertical_three_threatens_cell_above() {
        let pieces = cells(&[(0, 6), (1, 6), (2, 6)]);
        let mask = directional_threats(pieces, pieces, Direction::Vertical);
        assert_eq!(mask, cell_bit(3, 6));
    }

    #[test]
    fn test_diagonal_threats() {
        let up = cells(&[(0, 0), (1, 1), (2, 2)]);
        assert_eq!(
            directional_threats(up, up, Direction::DiagonalUp),
            cell_bit(3, 3)
        );
        let down = cells(&[(0, 6), (1, 5), (2, 4)]);
        assert_eq!(
            directional_threats(down, down, Direction::DiagonalDown),
            cell_bit(3, 3)
        );
    }

    #[test]
    fn test_pair_patterns() {
        // _XX_ in the middle of the bottom row
        let pieces = cells(&[(0, 2), (0, 3)]);
        let d = direction_patterns(pieces, pieces, Direction::Horizontal);
        assert_eq!(d.double_open_pairs, 1);
        assert_eq!(d.single_open_pairs, 0);

        // XX_ against the left edge
        let pieces = cells(&[(0, 0), (0, 1)]);
        let d = direction_patterns(pieces, pieces, Direction::Horizontal);
        assert_eq!(d.double_open_pairs, 0);
        assert_eq!(d.single_open_pairs, 1);

        // X_X
        let pieces = cells(&[(0, 2), (0, 4)]);
        let d = direction_patterns(pieces, pieces, Direction::Horizontal);
        assert_eq!(d.split_pairs, 1);
    }

    #[test]
    fn test_blocked_pair_is_not_live() {
        let pieces = cells(&[(0, 1), (0, 2)]);
        let blockers = cells(&[(0, 0), (0, 3)]);
        let d = direction_patterns(pieces, pieces | blockers, Direction::Horizontal);
        assert_eq!(d, DirectionPatterns::default());
    }

    #[test]
    fn test_pattern_counts_empty_board() {
        assert_eq!(pattern_counts(0, 0), PatternCounts::default());
    }

    #[test]
    fn test_pair_extensions() {
        let pieces = cells(&[(0, 2), (0, 3)]);
        let ext = pair_extensions(pieces, pieces, Direction::Horizontal);
        assert_eq!(ext, cell_bit(0, 1) | cell_bit(0, 4));
    }

    #[test]
    fn test_center_count() {
        let board = Board::from_moves(Player::Red, &[3, 3, 3, 0]).unwrap();
        assert_eq!(center_count(board.bits(Player::Red)), 2);
        assert_eq!(center_count(board.bits(Player::Yellow)), 1);
        assert_eq!(CENTER_MASK.count_ones() as usize, ROWS);
        assert!(COLS > 3);
    }
}
