#![warn(missing_docs)]
//! Datasets for imitation and inverse reinforcement learning in gridworlds.
//!
//! An example is one random [`GridworldMdp`](bias_gridworld::GridworldMdp)
//! together with `state_batch_size` sampled states, each labelled with the
//! action distribution of a planning agent. Examples are stacked into a
//! [`Dataset`] by [`generate_n_examples`], and [`generate_gridworld_irl`]
//! builds the train, test and unknown-reward partitions of an [`IrlDataset`],
//! which is saved as an `.npz` archive of 15 arrays readable by `numpy.load`.
//!
//! Comparator agents can be passed along with the labelling agent. For each of
//! them, a [`DivergenceEvaluator`] counts the sampled states on which it would
//! behave differently, which shows how distinguishable two agents are on the
//! generated data.
mod config;
mod dataset;
mod evaluator;
mod example;
mod irl;
pub use config::DatasetConfig;
pub use dataset::{generate_n_examples, Dataset};
pub use evaluator::DivergenceEvaluator;
pub use example::{generate_example, Example};
pub use irl::{
    generate_gridworld_data, generate_gridworld_irl, save_dataset, DatasetArray, IrlDataset,
    NUM_ARRAYS,
};
