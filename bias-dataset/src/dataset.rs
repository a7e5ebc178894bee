//! Batches of examples.
use crate::{generate_example, DatasetConfig};
use anyhow::Result;
use bias_core::{
    record::{Record, RecordValue},
    Agent,
};
use bias_gridworld::GridworldMdp;
use log::{info, warn};
use ndarray::{Array2, Array3, Axis};
use rand::Rng;

/// Examples stacked along a leading axis of length `n`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Wall indicators of shape `(n, imsize, imsize)`.
    pub walls: Array3<f32>,

    /// Rewards of shape `(n, imsize, imsize)`.
    pub rewards: Array3<f32>,

    /// Rows of sampled states, of shape `(n, k)`.
    pub y: Array2<i64>,

    /// Columns of sampled states, of shape `(n, k)`.
    pub x: Array2<i64>,

    /// Action distributions of shape `(n, k, num_actions)`.
    pub labels: Array3<f32>,
}

impl Dataset {
    /// Dataset of `n` zero-filled examples.
    pub(crate) fn zeros(n: usize, imsize: usize, k: usize, num_actions: usize) -> Self {
        Self {
            walls: Array3::zeros((n, imsize, imsize)),
            rewards: Array3::zeros((n, imsize, imsize)),
            y: Array2::zeros((n, k)),
            x: Array2::zeros((n, k)),
            labels: Array3::zeros((n, k, num_actions)),
        }
    }

    /// Number of examples.
    pub fn len(&self) -> usize {
        self.walls.len_of(Axis(0))
    }

    /// Returns `true` if the dataset has no example.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Generates `n` examples with `config.state_batch_size` states each and stacks them.
///
/// The returned [`Record`] holds, under `"fraction_different"`, the fraction
/// of all sampled states on which each comparator acted differently from
/// `agent`, and under `"num_without_reward"` the number of grids without any
/// reward cell.
pub fn generate_n_examples<R: Rng + ?Sized>(
    n: usize,
    agent: &mut dyn Agent<GridworldMdp>,
    config: &DatasetConfig,
    comparators: &mut [Box<dyn Agent<GridworldMdp>>],
    rng: &mut R,
) -> Result<(Dataset, Record)> {
    let k = config.state_batch_size;
    let mut dataset = Dataset::zeros(n, config.imsize, k, config.num_actions);
    let mut num_different = vec![0; comparators.len()];
    let mut num_without_reward = 0;

    for i in 0..n {
        let example = generate_example(k, agent, config, comparators, rng)?;
        dataset.walls.index_axis_mut(Axis(0), i).assign(&example.walls);
        dataset.rewards.index_axis_mut(Axis(0), i).assign(&example.rewards);
        dataset.y.index_axis_mut(Axis(0), i).assign(&example.y);
        dataset.x.index_axis_mut(Axis(0), i).assign(&example.x);
        dataset.labels.index_axis_mut(Axis(0), i).assign(&example.labels);
        for (total, count) in num_different.iter_mut().zip(example.num_different) {
            *total += count;
        }
        if !example.has_reward {
            num_without_reward += 1;
        }
    }

    let n_states = (n * k) as f32;
    let fraction_different = num_different
        .iter()
        .map(|c| if n_states > 0.0 { *c as f32 / n_states } else { 0.0 })
        .collect::<Vec<_>>();
    if !comparators.is_empty() {
        info!(
            "Fraction of states where agents choose different actions: {:?}",
            fraction_different
        );
    }

    if num_without_reward > 0 {
        warn!("{} of {} grids have no reward", num_without_reward, n);
    }

    let mut record = Record::from_slice(&[
        ("num_examples", RecordValue::Scalar(n as f32)),
        ("fraction_different", RecordValue::Array1(fraction_different)),
    ]);
    record.insert(
        "num_without_reward",
        RecordValue::Scalar(num_without_reward as f32),
    );
    Ok((dataset, record))
}
