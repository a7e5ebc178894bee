//! Discounting strategies.
//!
//! A strategy decides how much a reward received `d` steps from now is worth
//! and from which delay the action taken at delay `d` is chosen. Value
//! iteration runs over extended states `(d, s)` with `d` in `0..=max_delay`.
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// How an agent weights delayed rewards.
pub trait Discounting: Clone + Debug {
    /// Largest delay tracked by the value table.
    fn max_delay(&self) -> usize;

    /// Weight of a reward received `delay` steps from now.
    fn reward_weight(&self, delay: usize) -> f64;

    /// Delay whose preferences select the action taken at `delay`.
    fn choice_delay(&self, delay: usize) -> usize;

    /// Delay of the successor state.
    fn next_delay(&self, delay: usize) -> usize {
        (delay + 1).min(self.max_delay())
    }
}

fn hyperbolic_weight(constant: f64, delay: usize) -> f64 {
    1.0 / (1.0 + constant * delay as f64)
}

/// Plain exponential discounting through `gamma` only.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Default)]
pub struct Exponential;

impl Discounting for Exponential {
    fn max_delay(&self) -> usize {
        0
    }

    fn reward_weight(&self, _delay: usize) -> f64 {
        1.0
    }

    fn choice_delay(&self, delay: usize) -> usize {
        delay
    }
}

/// Ignores rewards received `horizon` or more steps from now.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct Myopic {
    /// Number of steps whose rewards are seen.
    pub horizon: usize,
}

impl Discounting for Myopic {
    fn max_delay(&self) -> usize {
        self.horizon
    }

    fn reward_weight(&self, delay: usize) -> f64 {
        if delay < self.horizon {
            1.0
        } else {
            0.0
        }
    }

    fn choice_delay(&self, delay: usize) -> usize {
        delay
    }
}

/// Hyperbolic discounting of an agent unaware that its future selves will
/// discount the same way.
///
/// The action at delay `d` is the one preferred from delay `d`, so the plan
/// assumes a future self that values rewards as seen from today.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct NaiveHyperbolic {
    /// Largest tracked delay.
    pub max_delay: usize,

    /// `k` in `1 / (1 + k d)`.
    pub constant: f64,
}

impl Discounting for NaiveHyperbolic {
    fn max_delay(&self) -> usize {
        self.max_delay
    }

    fn reward_weight(&self, delay: usize) -> f64 {
        hyperbolic_weight(self.constant, delay)
    }

    fn choice_delay(&self, delay: usize) -> usize {
        delay
    }
}

/// Hyperbolic discounting of an agent that predicts its future selves.
///
/// Every future self acts as if it were at delay 0, and earlier selves
/// evaluate those actions with their own discount.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct SophisticatedHyperbolic {
    /// Largest tracked delay.
    pub max_delay: usize,

    /// `k` in `1 / (1 + k d)`.
    pub constant: f64,
}

impl Discounting for SophisticatedHyperbolic {
    fn max_delay(&self) -> usize {
        self.max_delay
    }

    fn reward_weight(&self, delay: usize) -> f64 {
        hyperbolic_weight(self.constant, delay)
    }

    fn choice_delay(&self, _delay: usize) -> usize {
        0
    }
}
