//! Disagreement between agents on sampled states.
use anyhow::Result;
use bias_core::{ActionDistribution, Agent, Mdp, State};
use std::sync::Arc;

/// Counts sampled states on which a comparator agent acts differently.
///
/// Two distributions differ when the Euclidean distance between them exceeds
/// `threshold`. This is a coarse measure and not a divergence between
/// distributions in the statistical sense.
#[derive(Debug, Clone, PartialEq)]
pub struct DivergenceEvaluator {
    threshold: f64,
}

impl DivergenceEvaluator {
    /// Constructs an evaluator.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Binds `comparator` to `mdp` and counts the samples it labels differently.
    ///
    /// `samples` pairs each state with the distribution of the reference agent.
    pub fn evaluate<M: Mdp>(
        &self,
        comparator: &mut dyn Agent<M>,
        mdp: Arc<M>,
        samples: &[(State, ActionDistribution)],
    ) -> Result<usize> {
        comparator.set_mdp(mdp);
        let mut n_different = 0;
        for (state, dist) in samples {
            let other = comparator.action_distribution(*state)?;
            if dist.distance(&other) > self.threshold {
                n_different += 1;
            }
        }
        Ok(n_different)
    }
}
