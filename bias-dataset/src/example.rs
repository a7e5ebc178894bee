//! Single examples: one random grid and an agent's behaviour on sampled states.
use crate::{DatasetConfig, DivergenceEvaluator};
use anyhow::Result;
use bias_core::{Agent, BiasError, Mdp};
use bias_gridworld::GridworldMdp;
use log::debug;
use ndarray::{Array1, Array2};
use rand::Rng;
use std::sync::Arc;

/// A grid together with labelled states.
///
/// `y[i]`, `x[i]` and the row `labels[i]` describe the same sampled state.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    /// Wall indicators of shape `(imsize, imsize)`.
    pub walls: Array2<f32>,

    /// Rewards of shape `(imsize, imsize)`.
    pub rewards: Array2<f32>,

    /// Rows of the sampled states.
    pub y: Array1<i64>,

    /// Columns of the sampled states.
    pub x: Array1<i64>,

    /// Action distributions of shape `(batch_size, num_actions)`.
    pub labels: Array2<f32>,

    /// Per comparator, the number of sampled states on which it acts differently.
    pub num_different: Vec<usize>,

    /// `false` if the grid has no reward cell, so that labels carry no goal.
    pub has_reward: bool,
}

/// Generates a random grid and labels `batch_size` random states with the
/// action distributions of `agent`.
///
/// Every comparator is bound to the same grid and evaluated with a
/// [`DivergenceEvaluator`] using `config.action_distance_threshold`.
pub fn generate_example<R: Rng + ?Sized>(
    batch_size: usize,
    agent: &mut dyn Agent<GridworldMdp>,
    config: &DatasetConfig,
    comparators: &mut [Box<dyn Agent<GridworldMdp>>],
    rng: &mut R,
) -> Result<Example> {
    if comparators.len() > batch_size {
        return Err(BiasError::TooManyComparators {
            comparators: comparators.len(),
            batch_size,
        }
        .into());
    }

    let mdp = Arc::new(if config.simple_mdp {
        GridworldMdp::generate_random(
            config.imsize,
            config.imsize,
            config.wall_prob,
            config.reward_prob,
            &config.gridworld,
            rng,
        )?
    } else {
        GridworldMdp::generate_random_connected(
            config.imsize,
            config.imsize,
            config.reward_prob,
            &config.gridworld,
            rng,
        )?
    });

    agent.set_mdp(mdp.clone());
    let mut samples = Vec::with_capacity(batch_size);
    for _ in 0..batch_size {
        let state = mdp.random_start_state(rng)?;
        samples.push((state, agent.action_distribution(state)?));
    }

    let evaluator = DivergenceEvaluator::new(config.action_distance_threshold);
    let num_different = comparators
        .iter_mut()
        .map(|c| evaluator.evaluate(c.as_mut(), mdp.clone(), &samples))
        .collect::<Result<Vec<_>>>()?;

    let mut labels = Array2::<f32>::zeros((batch_size, config.num_actions));
    for (mut row, (_, dist)) in labels.rows_mut().into_iter().zip(samples.iter()) {
        row.assign(&dist.to_array(config.num_actions)?);
    }
    let y = samples.iter().map(|(s, _)| s.y as i64).collect::<Array1<_>>();
    let x = samples.iter().map(|(s, _)| s.x as i64).collect::<Array1<_>>();
    let (walls, rewards) = mdp.to_input_arrays();
    let num_rewards = mdp.reward_cells().len();
    debug!(
        "Example with {} states, {} reward cells, disagreements {:?}",
        batch_size, num_rewards, num_different
    );

    Ok(Example {
        walls,
        rewards,
        y,
        x,
        labels,
        num_different,
        has_reward: num_rewards > 0,
    })
}
