use std::collections::VecDeque;

use crate::store::GameResult;

/// Rolling results from the adaptive player's point of view.
pub struct SessionMetrics {
    results: VecDeque<(GameResult, usize)>,
    capacity: usize,
    wins: usize,
    losses: usize,
    draws: usize,
    total_moves: usize,
}

impl SessionMetrics {
    pub fn with_capacity(capacity: usize) -> Self {
        SessionMetrics {
            results: VecDeque::with_capacity(capacity),
            capacity,
            wins: 0,
            losses: 0,
            draws: 0,
            total_moves: 0,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn record(&mut self, result: GameResult, game_length: usize) {
        match result {
            GameResult::Win => self.wins += 1,
            GameResult::Loss => self.losses += 1,
            GameResult::Draw => self.draws += 1,
        }
        self.total_moves += game_length;
        self.results.push_back((result, game_length));
        if self.results.len() > self.capacity {
            self.results.pop_front();
        }
    }

    fn rate(&self, last_n: usize, wanted: GameResult) -> f64 {
        let n = self.results.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let hits = self
            .results
            .iter()
            .rev()
            .take(n)
            .filter(|(r, _)| *r == wanted)
            .count();
        hits as f64 / n as f64
    }

    /// Win rate over the last N games.
    pub fn win_rate(&self, last_n: usize) -> f64 {
        self.rate(last_n, GameResult::Win)
    }

    pub fn loss_rate(&self, last_n: usize) -> f64 {
        self.rate(last_n, GameResult::Loss)
    }

    pub fn draw_rate(&self, last_n: usize) -> f64 {
        self.rate(last_n, GameResult::Draw)
    }

    /// Average game length over the last N games.
    pub fn average_game_length(&self, last_n: usize) -> f64 {
        let n = self.results.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let total: usize = self.results.iter().rev().take(n).map(|(_, len)| len).sum();
        total as f64 / n as f64
    }

    pub fn total_games(&self) -> usize {
        self.wins + self.losses + self.draws
    }

    pub fn wins(&self) -> usize {
        self.wins
    }

    pub fn losses(&self) -> usize {
        self.losses
    }

    pub fn draws(&self) -> usize {
        self.draws
    }

    /// Lifetime average length, not limited to the window.
    pub fn lifetime_average_length(&self) -> f64 {
        match self.total_games() {
            0 => 0.0,
            n => self.total_moves as f64 / n as f64,
        }
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_metrics() {
        let m = SessionMetrics::new();
        assert_eq!(m.win_rate(10), 0.0);
        assert_eq!(m.average_game_length(10), 0.0);
        assert_eq!(m.lifetime_average_length(), 0.0);
        assert_eq!(m.total_games(), 0);
    }

    #[test]
    fn test_rates_over_window() {
        let mut m = SessionMetrics::new();
        m.record(GameResult::Loss, 10);
        m.record(GameResult::Win, 20);
        m.record(GameResult::Win, 30);
        m.record(GameResult::Draw, 42);

        assert!((m.win_rate(4) - 0.5).abs() < 1e-9);
        assert!((m.loss_rate(4) - 0.25).abs() < 1e-9);
        assert!((m.draw_rate(4) - 0.25).abs() < 1e-9);
        // Last two games only.
        assert!((m.win_rate(2) - 0.5).abs() < 1e-9);
        assert!((m.average_game_length(2) - 36.0).abs() < 1e-9);
        // Window larger than history.
        assert!((m.win_rate(100) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_capacity_keeps_lifetime_totals() {
        let mut m = SessionMetrics::with_capacity(3);
        for _ in 0..5 {
            m.record(GameResult::Loss, 10);
        }
        for _ in 0..3 {
            m.record(GameResult::Win, 20);
        }
        assert_eq!(m.win_rate(10), 1.0);
        assert_eq!(m.total_games(), 8);
        assert_eq!(m.wins(), 3);
        assert_eq!(m.losses(), 5);
        assert_eq!(m.draws(), 0);
        assert!((m.lifetime_average_length() - 110.0 / 8.0).abs() < 1e-9);
    }
}
