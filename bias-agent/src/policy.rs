//! Action selection from action values.
use bias_core::{Action, ActionDistribution};
use serde::{Deserialize, Serialize};

/// Turns the action values of a state into an [`ActionDistribution`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub enum ActionSelection {
    /// All mass on the best action.
    Greedy,

    /// Softmax of `beta * Q(s, a)` over the legal actions.
    Boltzmann {
        /// Rationality; 0 is uniform over legal actions.
        beta: f64,
    },
}

impl ActionSelection {
    /// Greedy if `beta` is `None`, Boltzmann otherwise.
    pub fn from_beta(beta: Option<f64>) -> Self {
        match beta {
            None => Self::Greedy,
            Some(beta) => Self::Boltzmann { beta },
        }
    }

    /// Distribution over the actions of `qvalues`; other actions get 0.
    ///
    /// Without any legal action the result is uniform over all actions.
    pub fn distribution(&self, qvalues: &[(Action, f64)]) -> ActionDistribution {
        if qvalues.is_empty() {
            log::warn!("No legal action, using uniform distribution");
            return ActionDistribution::uniform();
        }

        match self {
            Self::Greedy => match argmax(qvalues) {
                Some(a) => ActionDistribution::one_hot(a),
                None => ActionDistribution::uniform(),
            },
            Self::Boltzmann { beta } => softmax(qvalues, *beta),
        }
    }
}

/// The action with the largest value; the lowest action index wins ties.
pub fn argmax(qvalues: &[(Action, f64)]) -> Option<Action> {
    let mut best: Option<(Action, f64)> = None;
    for &(a, q) in qvalues {
        best = match best {
            None => Some((a, q)),
            Some((a_, q_)) if q > q_ || (q == q_ && a.index() < a_.index()) => Some((a, q)),
            b => b,
        };
    }
    best.map(|(a, _)| a)
}

fn softmax(qvalues: &[(Action, f64)], beta: f64) -> ActionDistribution {
    let max = qvalues
        .iter()
        .map(|(_, q)| *q)
        .fold(f64::NEG_INFINITY, f64::max);
    let weights = qvalues
        .iter()
        .map(|(a, q)| (*a, (beta * (q - max)).exp()))
        .collect::<Vec<_>>();
    ActionDistribution::from_weights(&weights)
}
