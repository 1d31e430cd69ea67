//! Core Connect Four game logic: the bitboard, players, and the turn-level
//! game state used by match controllers.

mod board;
mod player;
mod state;

pub use board::{
    cell_bit, Board, Cell, LegalActions, Snapshot, BOARD_MASK, BOTTOM_MASK, CENTER_ORDER, COLS,
    COLUMN_BITS, ROWS, TOP_MASK,
};
pub use player::Player;
pub use state::{GameOutcome, GameState};
