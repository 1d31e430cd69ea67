//! Behavioural model of the opponent.
//!
//! The profiler compares every real opponent drop against what the opponent
//! could have done and moves a small vector of biases accordingly. The
//! evaluator reads those biases to favour attacks along directions the
//! opponent keeps failing to defend.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::analysis::{directional_threats, pair_extensions, threat_mask, Direction};
use crate::game::{Board, Player};

const NEUTRAL: f64 = 1.0;

/// Names of the individual biases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BiasKind {
    VerticalWeakness,
    HorizontalWeakness,
    DiagonalWeakness,
    MissedWin,
    ThreatUnderestimation,
    CenterWeight,
}

impl BiasKind {
    pub const ALL: [BiasKind; 6] = [
        BiasKind::VerticalWeakness,
        BiasKind::HorizontalWeakness,
        BiasKind::DiagonalWeakness,
        BiasKind::MissedWin,
        BiasKind::ThreatUnderestimation,
        BiasKind::CenterWeight,
    ];

    /// The weakness bias that scales attacks along `dir`.
    pub fn for_direction(dir: Direction) -> BiasKind {
        match dir {
            Direction::Vertical => BiasKind::VerticalWeakness,
            Direction::Horizontal => BiasKind::HorizontalWeakness,
            Direction::DiagonalDown | Direction::DiagonalUp => BiasKind::DiagonalWeakness,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BiasKind::VerticalWeakness => "vertical_weakness",
            BiasKind::HorizontalWeakness => "horizontal_weakness",
            BiasKind::DiagonalWeakness => "diagonal_weakness",
            BiasKind::MissedWin => "missed_win",
            BiasKind::ThreatUnderestimation => "threat_underestimation",
            BiasKind::CenterWeight => "center_weight",
        }
    }
}

impl fmt::Display for BiasKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed-shape set of opponent biases. 1.0 is neutral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiasVector {
    pub vertical_weakness: f64,
    pub horizontal_weakness: f64,
    pub diagonal_weakness: f64,
    pub missed_win: f64,
    pub threat_underestimation: f64,
    pub center_weight: f64,
}

impl BiasVector {
    pub fn neutral() -> Self {
        BiasVector {
            vertical_weakness: NEUTRAL,
            horizontal_weakness: NEUTRAL,
            diagonal_weakness: NEUTRAL,
            missed_win: NEUTRAL,
            threat_underestimation: NEUTRAL,
            center_weight: NEUTRAL,
        }
    }

    pub fn get(&self, kind: BiasKind) -> f64 {
        match kind {
            BiasKind::VerticalWeakness => self.vertical_weakness,
            BiasKind::HorizontalWeakness => self.horizontal_weakness,
            BiasKind::DiagonalWeakness => self.diagonal_weakness,
            BiasKind::MissedWin => self.missed_win,
            BiasKind::ThreatUnderestimation => self.threat_underestimation,
            BiasKind::CenterWeight => self.center_weight,
        }
    }

    pub fn get_mut(&mut self, kind: BiasKind) -> &mut f64 {
        match kind {
            BiasKind::VerticalWeakness => &mut self.vertical_weakness,
            BiasKind::HorizontalWeakness => &mut self.horizontal_weakness,
            BiasKind::DiagonalWeakness => &mut self.diagonal_weakness,
            BiasKind::MissedWin => &mut self.missed_win,
            BiasKind::ThreatUnderestimation => &mut self.threat_underestimation,
            BiasKind::CenterWeight => &mut self.center_weight,
        }
    }

    /// Bias applied to attacks along `dir`.
    pub fn for_direction(&self, dir: Direction) -> f64 {
        self.get(BiasKind::for_direction(dir))
    }

    pub fn iter(&self) -> impl Iterator<Item = (BiasKind, f64)> + '_ {
        BiasKind::ALL.iter().map(move |&kind| (kind, self.get(kind)))
    }

    fn map(mut self, f: impl Fn(f64) -> f64) -> Self {
        for kind in BiasKind::ALL {
            let v = self.get_mut(kind);
            *v = f(*v);
        }
        self
    }
}

impl Default for BiasVector {
    fn default() -> Self {
        Self::neutral()
    }
}

impl fmt::Display for BiasVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(kind, v)| format!("{kind}={v:.2}"))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// Learning rates and bounds of the profiler (TOML section `profiler`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProfilerConfig {
    pub min_bias: f64,
    pub max_bias: f64,
    /// Step for a missed immediate win.
    pub lethal_rate: f64,
    /// Step for an unblocked threat.
    pub strategic_rate: f64,
    /// Step for an ignored diagonal pair extension.
    pub positional_rate: f64,
    /// Decay toward neutral after a correct block.
    pub correction_rate: f64,
    /// Fraction of each raw step actually applied (1.0 = full step).
    pub smoothing: f64,
    /// Biases below this are reported as neutral.
    pub confidence_threshold: f64,
    /// Biases at or above this are cooled after a loss.
    pub arrogance_threshold: f64,
    pub cooling_factor: f64,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        ProfilerConfig {
            min_bias: 1.0,
            max_bias: 2.5,
            lethal_rate: 0.5,
            strategic_rate: 0.3,
            positional_rate: 0.05,
            correction_rate: 0.01,
            smoothing: 1.0,
            confidence_threshold: 1.05,
            arrogance_threshold: 1.5,
            cooling_factor: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilerStats {
    pub moves_analyzed: u64,
    pub fatal_errors: u64,
}

/// Clamp range of `config`, never inverted.
fn bounds(config: &ProfilerConfig) -> (f64, f64) {
    (config.min_bias, config.max_bias.max(config.min_bias))
}

/// One profiler per match. Profiles the side that moves in [`update`]
/// from the point of view of the other side (the learner).
///
/// [`update`]: OpponentProfiler::update
#[derive(Debug, Clone)]
pub struct OpponentProfiler {
    config: ProfilerConfig,
    biases: BiasVector,
    stats: ProfilerStats,
}

impl OpponentProfiler {
    pub fn new(config: ProfilerConfig) -> Self {
        Self::with_biases(config, BiasVector::neutral())
    }

    /// Start from previously learned biases, clamped into the configured range.
    ///
    /// `config` is expected to have passed `AppConfig::validate`. An inverted
    /// range (`min_bias > max_bias`) collapses to `min_bias` instead of
    /// panicking.
    pub fn with_biases(config: ProfilerConfig, biases: BiasVector) -> Self {
        let (lo, hi) = bounds(&config);
        OpponentProfiler {
            biases: biases.map(|v| v.clamp(lo, hi)),
            config,
            stats: ProfilerStats::default(),
        }
    }

    /// Raw biases, ungated.
    pub fn biases(&self) -> &BiasVector {
        &self.biases
    }

    pub fn stats(&self) -> ProfilerStats {
        self.stats
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Forget everything learned about the opponent.
    pub fn reset_biases(&mut self) {
        let (lo, hi) = bounds(&self.config);
        self.biases = BiasVector::neutral().map(|v| v.clamp(lo, hi));
    }

    /// Analyze the opponent dropping into `column` on `before`.
    ///
    /// Only threats on playable cells (the landing cell of each open column)
    /// are considered; a threat floating above an empty cell could not have
    /// been taken or blocked this turn.
    pub fn update(&mut self, before: &Board, column: usize, mover: Player) {
        let Some(played) = before.landing_bit(column) else {
            log::debug!("profiler ignored drop into unavailable column {column}");
            return;
        };
        self.stats.moves_analyzed += 1;

        let occupied = before.occupied();
        let playable = before.playable_mask();
        let mover_bits = before.bits(mover);
        let learner_bits = before.bits(mover.other());

        let mover_wins = threat_mask(mover_bits, occupied) & playable;
        if mover_wins != 0 && mover_wins & played == 0 {
            log::debug!("opponent missed a winning drop (played column {column})");
            self.nudge(BiasKind::MissedWin, self.config.lethal_rate);
            self.nudge(BiasKind::ThreatUnderestimation, self.config.strategic_rate);
            self.stats.fatal_errors += 1;
        }

        let learner_wins = threat_mask(learner_bits, occupied) & playable;
        if learner_wins != 0 {
            if learner_wins & played != 0 {
                self.decay(self.config.correction_rate);
            } else {
                let kind = Self::classify_threat(learner_bits, occupied, learner_wins);
                log::debug!("opponent left a winning threat open ({kind})");
                self.nudge(kind, self.config.strategic_rate);
                self.nudge(BiasKind::ThreatUnderestimation, self.config.strategic_rate);
                self.stats.fatal_errors += 1;
            }
        }

        if mover_wins == 0 && learner_wins == 0 {
            self.check_positional(learner_bits, occupied, playable, played);
        }
    }

    /// Biases as the evaluator should see them: anything under the
    /// confidence threshold is treated as noise and reported as neutral.
    pub fn adaptive_weights(&self) -> BiasVector {
        let threshold = self.config.confidence_threshold;
        self.biases
            .map(|v| if v < threshold { NEUTRAL } else { v })
    }

    /// Pull over-confident biases back toward neutral after the learner lost.
    pub fn cooling_after_loss(&mut self) {
        let threshold = self.config.arrogance_threshold;
        let factor = self.config.cooling_factor;
        let before = self.biases;
        self.biases = self.biases.map(|v| {
            if v >= threshold {
                (NEUTRAL + (v - NEUTRAL) * factor).max(NEUTRAL)
            } else {
                v
            }
        });
        if before != self.biases {
            log::debug!("cooled biases after loss: {}", self.biases);
        }
    }

    /// Direction of the first matching threat, checked vertical, horizontal,
    /// then diagonal.
    fn classify_threat(pieces: u64, occupied: u64, wins: u64) -> BiasKind {
        Direction::ALL
            .iter()
            .find(|&&dir| directional_threats(pieces, occupied, dir) & wins != 0)
            .map(|&dir| BiasKind::for_direction(dir))
            .unwrap_or(BiasKind::ThreatUnderestimation)
    }

    fn check_positional(&mut self, learner: u64, occupied: u64, playable: u64, played: u64) {
        for dir in [Direction::DiagonalDown, Direction::DiagonalUp] {
            let slots = pair_extensions(learner, occupied, dir) & playable;
            if slots != 0 && slots & played == 0 {
                self.nudge(BiasKind::DiagonalWeakness, self.config.positional_rate);
            }
        }
    }

    fn nudge(&mut self, kind: BiasKind, rate: f64) {
        let (lo, hi) = bounds(&self.config);
        let v = self.biases.get_mut(kind);
        *v = (*v + rate * self.config.smoothing).clamp(lo, hi);
    }

    fn decay(&mut self, amount: f64) {
        let (lo, hi) = bounds(&self.config);
        self.biases = self.biases.map(|v| {
            if v > NEUTRAL {
                (v - amount).max(NEUTRAL).clamp(lo, hi)
            } else {
                v
            }
        });
    }
}
