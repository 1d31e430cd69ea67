use crate::ai::Agent;
use crate::error::SessionError;
use crate::game::{GameOutcome, GameState, Player};

/// Result of a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeResult {
    pub winner: Option<Player>,
    pub game_length: usize,
    pub starter: Player,
}

impl EpisodeResult {
    pub fn outcome(&self) -> GameOutcome {
        match self.winner {
            Some(p) => GameOutcome::Winner(p),
            None => GameOutcome::Draw,
        }
    }
}

/// Play one game between `red` and `yellow`, `starter` moving first.
///
/// Both agents see every drop through [`Agent::observe`] and are told the
/// outcome through [`Agent::game_over`].
pub fn play_game(
    red: &mut dyn Agent,
    yellow: &mut dyn Agent,
    starter: Player,
) -> Result<EpisodeResult, SessionError> {
    let mut agents: [&mut dyn Agent; 2] = [red, yellow];
    for (idx, agent) in agents.iter_mut().enumerate() {
        agent.game_start(Player::from_index(idx));
    }

    let mut state = GameState::starting_with(starter);
    let mut moves = 0;

    let outcome = loop {
        if let Some(outcome) = state.outcome() {
            break outcome;
        }
        let mover = state.current_player();
        let agent = &mut agents[mover.index()];
        let action = agent
            .select_action(&state)
            .ok_or_else(|| SessionError::NoMove(agent.name().to_string()))?;

        if !state.board().is_valid_location(action) {
            return Err(SessionError::IllegalAction {
                agent: agent.name().to_string(),
                action,
                legal: state.legal_actions(),
            });
        }

        let before = *state.board();
        for agent in agents.iter_mut() {
            agent.observe(&before, action, mover);
        }
        state.apply_move_mut(action)?;
        moves += 1;
    };

    for (idx, agent) in agents.iter_mut().enumerate() {
        agent.game_over(outcome, Player::from_index(idx));
    }

    Ok(EpisodeResult {
        winner: outcome.winner(),
        game_length: moves,
        starter,
    })
}
