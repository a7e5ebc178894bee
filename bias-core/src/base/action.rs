//! States, actions and action distributions of gridworld MDPs.
use crate::error::BiasError;
use anyhow::Result;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance used when checking that a distribution sums to one.
pub const PROB_TOLERANCE: f64 = 1e-6;

/// A grid cell, `x` being the column and `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct State {
    /// Column.
    pub x: usize,

    /// Row.
    pub y: usize,
}

impl State {
    /// Constructs a state from its column and row.
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl From<(usize, usize)> for State {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Moves available in a gridworld.
///
/// The declaration order is the canonical action-to-index mapping used by
/// every agent and by the label arrays of datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Action {
    /// Decreases `y`.
    North,

    /// Increases `y`.
    South,

    /// Increases `x`.
    East,

    /// Decreases `x`.
    West,

    /// Stays in place. On a reward cell this collects the reward and ends the episode.
    Stay,
}

impl Action {
    /// Number of actions.
    pub const COUNT: usize = 5;

    /// All actions in index order.
    pub const ALL: [Action; Action::COUNT] = [
        Action::North,
        Action::South,
        Action::East,
        Action::West,
        Action::Stay,
    ];

    /// Dense index of the action.
    pub fn index(self) -> usize {
        match self {
            Action::North => 0,
            Action::South => 1,
            Action::East => 2,
            Action::West => 3,
            Action::Stay => 4,
        }
    }

    /// Inverse of [`Action::index`].
    pub fn from_index(ix: usize) -> Option<Action> {
        Action::ALL.get(ix).copied()
    }

    /// Displacement `(dx, dy)` of the move.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::North => (0, -1),
            Action::South => (0, 1),
            Action::East => (1, 0),
            Action::West => (-1, 0),
            Action::Stay => (0, 0),
        }
    }

    /// The two moves perpendicular to this one. Empty for [`Action::Stay`].
    pub fn perpendicular(self) -> &'static [Action] {
        match self {
            Action::North | Action::South => &[Action::East, Action::West],
            Action::East | Action::West => &[Action::North, Action::South],
            Action::Stay => &[],
        }
    }
}

/// A probability mass function over [`Action`]s, stored in index order.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ActionDistribution {
    probs: [f64; Action::COUNT],
}

impl ActionDistribution {
    /// Puts all mass on `action`.
    pub fn one_hot(action: Action) -> Self {
        let mut probs = [0.0; Action::COUNT];
        probs[action.index()] = 1.0;
        Self { probs }
    }

    /// Uniform distribution over all actions.
    pub fn uniform() -> Self {
        Self {
            probs: [1.0 / Action::COUNT as f64; Action::COUNT],
        }
    }

    /// Normalizes non-negative weights given per action.
    ///
    /// Falls back to the uniform distribution over the given actions when the
    /// weights do not sum to a positive finite number.
    pub fn from_weights(weights: &[(Action, f64)]) -> Self {
        let total: f64 = weights.iter().map(|(_, w)| w.max(0.0)).sum();
        let mut probs = [0.0; Action::COUNT];

        if total > 0.0 && total.is_finite() {
            for (a, w) in weights {
                probs[a.index()] += w.max(0.0) / total;
            }
        } else if !weights.is_empty() {
            log::warn!("Degenerate action weights {:?}, using uniform distribution", weights);
            for (a, _) in weights {
                probs[a.index()] += 1.0 / weights.len() as f64;
            }
        } else {
            return Self::uniform();
        }

        Self { probs }
    }

    /// Probability of `action`.
    pub fn prob(&self, action: Action) -> f64 {
        self.probs[action.index()]
    }

    /// Probabilities in action index order.
    pub fn probs(&self) -> &[f64; Action::COUNT] {
        &self.probs
    }

    /// The most likely action; the lowest index wins ties.
    pub fn argmax(&self) -> Action {
        let mut best = 0;
        for ix in 1..Action::COUNT {
            if self.probs[ix] > self.probs[best] {
                best = ix;
            }
        }
        Action::ALL[best]
    }

    /// Returns `true` if entries are non-negative and sum to one.
    pub fn is_valid(&self) -> bool {
        let sum: f64 = self.probs.iter().sum();
        self.probs.iter().all(|p| *p >= 0.0) && (sum - 1.0).abs() <= PROB_TOLERANCE
    }

    /// Euclidean distance between the probability vectors.
    pub fn distance(&self, other: &ActionDistribution) -> f64 {
        self.probs
            .iter()
            .zip(other.probs.iter())
            .map(|(p, q)| (p - q) * (p - q))
            .sum::<f64>()
            .sqrt()
    }

    /// Dense encoding of length `num_actions`; trailing entries are zero.
    pub fn to_array(&self, num_actions: usize) -> Result<Array1<f32>> {
        if num_actions < Action::COUNT {
            return Err(BiasError::InvalidConfig(format!(
                "num_actions must be at least {}, got {}",
                Action::COUNT,
                num_actions
            ))
            .into());
        }
        let mut arr = Array1::zeros(num_actions);
        for (ix, p) in self.probs.iter().enumerate() {
            arr[ix] = *p as f32;
        }
        Ok(arr)
    }
}
