use crate::game::{Board, GameOutcome, GameState, Player};

/// Universal interface for every player the match controller can drive.
pub trait Agent {
    /// Select a column for the side to move. `None` means no legal column
    /// exists and the caller should treat the game as drawn.
    fn select_action(&mut self, state: &GameState) -> Option<usize>;

    /// Return the agent's display name.
    fn name(&self) -> &str;

    /// Called before the first move of a game with the side this agent plays.
    fn game_start(&mut self, _me: Player) {}

    /// Called for every drop of the game, by either side, with the board as
    /// it was before the drop.
    fn observe(&mut self, _before: &Board, _column: usize, _mover: Player) {}

    /// Called once when the game ends. `me` is the side this agent played.
    fn game_over(&mut self, _outcome: GameOutcome, _me: Player) {}
}
