//! Train, test and unknown-reward partitions and their `.npz` archives.
use crate::{generate_n_examples, Dataset, DatasetConfig};
use anyhow::Result;
use bias_agent::build_agent;
use bias_core::{record::Record, Agent, BiasError};
use bias_gridworld::GridworldMdp;
use log::{debug, info};
use ndarray::{Array2, Array3, ArrayD};
use ndarray_npy::{NpzReader, NpzWriter};
use rand::Rng;
use std::{fs::File, path::Path};

/// Number of arrays in a saved [`IrlDataset`].
pub const NUM_ARRAYS: usize = 15;

/// An array of a flattened [`IrlDataset`].
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetArray {
    /// Walls, rewards or labels.
    F32(ArrayD<f32>),

    /// Coordinates.
    I64(ArrayD<i64>),
}

impl DatasetArray {
    /// Shape of the array.
    pub fn shape(&self) -> &[usize] {
        match self {
            Self::F32(a) => a.shape(),
            Self::I64(a) => a.shape(),
        }
    }
}

/// Datasets of the three phases of an IRL experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct IrlDataset {
    /// Train examples.
    pub train: Dataset,

    /// Test examples on grids like the train ones.
    pub test: Dataset,

    /// Examples of the step in which the reward is unknown.
    pub unknown_reward: Dataset,
}

impl IrlDataset {
    /// The 15 arrays in phase order train, test, unknown reward, each phase
    /// being `walls, rewards, y, x, labels`.
    pub fn into_arrays(self) -> Vec<DatasetArray> {
        [self.train, self.test, self.unknown_reward]
            .into_iter()
            .flat_map(|d| {
                [
                    DatasetArray::F32(d.walls.into_dyn()),
                    DatasetArray::F32(d.rewards.into_dyn()),
                    DatasetArray::I64(d.y.into_dyn()),
                    DatasetArray::I64(d.x.into_dyn()),
                    DatasetArray::F32(d.labels.into_dyn()),
                ]
            })
            .collect()
    }

    /// Writes the arrays to an `.npz` archive as `arr_0`, ..., `arr_14`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut npz = NpzWriter::new(File::create(path.as_ref())?);
        for (p, d) in [&self.train, &self.test, &self.unknown_reward]
            .into_iter()
            .enumerate()
        {
            let base = 5 * p;
            npz.add_array(array_name(base), &d.walls)?;
            npz.add_array(array_name(base + 1), &d.rewards)?;
            npz.add_array(array_name(base + 2), &d.y)?;
            npz.add_array(array_name(base + 3), &d.x)?;
            npz.add_array(array_name(base + 4), &d.labels)?;
        }
        npz.finish()?;
        info!("Saved dataset to {:?}", path.as_ref());
        Ok(())
    }

    /// Reads an archive written by [`IrlDataset::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let mut npz = NpzReader::new(File::open(path.as_ref())?)?;
        let names = npz.names()?;
        let mut read_phase = |p: usize| -> Result<Dataset> {
            let base = 5 * p;
            let walls: Array3<f32> = npz.by_name(&stored_name(&names, base)?)?;
            let rewards: Array3<f32> = npz.by_name(&stored_name(&names, base + 1)?)?;
            let y: Array2<i64> = npz.by_name(&stored_name(&names, base + 2)?)?;
            let x: Array2<i64> = npz.by_name(&stored_name(&names, base + 3)?)?;
            let labels: Array3<f32> = npz.by_name(&stored_name(&names, base + 4)?)?;
            Ok(Dataset {
                walls,
                rewards,
                y,
                x,
                labels,
            })
        };

        Ok(Self {
            train: read_phase(0)?,
            test: read_phase(1)?,
            unknown_reward: read_phase(2)?,
        })
    }
}

fn array_name(ix: usize) -> String {
    format!("arr_{}", ix)
}

/// Name of array `ix` inside the archive, with or without the `.npy` extension.
fn stored_name(names: &[String], ix: usize) -> Result<String> {
    let name = array_name(ix);
    names
        .iter()
        .find(|n| n.as_str() == name || n.strip_suffix(".npy") == Some(name.as_str()))
        .cloned()
        .ok_or_else(|| BiasError::InvalidConfig(format!("{} is missing in the archive", name)).into())
}

/// Keys of `record` prefixed with `phase/`.
fn with_phase(phase: &str, record: Record) -> Record {
    let entries = record
        .iter()
        .map(|(k, v)| (format!("{}/{}", phase, k), v.clone()))
        .collect::<Vec<_>>();
    Record::from_slice(&entries)
}

/// Generates the train and test partitions.
///
/// The returned record holds the statistics of both partitions, under keys
/// prefixed with `train/` and `test/`.
pub fn generate_gridworld_data<R: Rng + ?Sized>(
    agent: &mut dyn Agent<GridworldMdp>,
    config: &DatasetConfig,
    comparators: &mut [Box<dyn Agent<GridworldMdp>>],
    rng: &mut R,
) -> Result<(Dataset, Dataset, Record)> {
    info!("Generating {} training examples", config.num_train);
    let (train, train_record) =
        generate_n_examples(config.num_train, agent, config, comparators, rng)?;
    info!("Generating {} test examples", config.num_test);
    let (test, test_record) =
        generate_n_examples(config.num_test, agent, config, comparators, rng)?;
    let record = with_phase("train", train_record).merge(with_phase("test", test_record));
    Ok((train, test, record))
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Generates the three partitions of an IRL experiment.
///
/// The agent of `config.agent` labels every example. If `config.other_agent`
/// is set, it is built as the only comparator and the fraction of states on
/// which it disagrees is logged for every partition.
///
/// ```mermaid
/// graph LR
///     C[DatasetConfig] --> A[agent]
///     C --> O[other_agent]
///     A --> TR[train: num_train]
///     O -.-> TR
///     TR --> TE[test: num_test]
///     TE --> U[unknown reward: num_mdps]
///     U --> I[IrlDataset]
/// ```
pub fn generate_gridworld_irl<R: Rng + ?Sized>(
    config: &DatasetConfig,
    rng: &mut R,
) -> Result<IrlDataset> {
    config.validate()?;
    let mut agent = build_agent::<GridworldMdp>(&config.agent)?;
    let mut comparators = match &config.other_agent {
        Some(other) => vec![build_agent::<GridworldMdp>(other)?],
        None => vec![],
    };

    let (train, test, record) =
        generate_gridworld_data(agent.as_mut(), config, &mut comparators, rng)?;
    info!("Generating {} unknown reward examples", config.num_mdps);
    let (unknown_reward, unknown_record) =
        generate_n_examples(config.num_mdps, agent.as_mut(), config, &mut comparators, rng)?;

    let record = record.merge(with_phase("unknown_reward", unknown_record));
    let mut keys = record.iter().map(|(k, _)| k.clone()).collect::<Vec<_>>();
    keys.sort();
    for k in keys {
        if let Some(v) = record.get(&k) {
            debug!("{}: {:?}", k, v);
        }
    }

    Ok(IrlDataset {
        train,
        test,
        unknown_reward,
    })
}

/// Generates the partitions described by `config` and saves them to `path`.
pub fn save_dataset<R: Rng + ?Sized>(
    config: &DatasetConfig,
    path: impl AsRef<Path>,
    rng: &mut R,
) -> Result<()> {
    generate_gridworld_irl(config, rng)?.save(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bias_agent::{AgentConfig, AgentKind};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_gridworld_data_record() -> Result<()> {
        let rng = &mut StdRng::seed_from_u64(0);
        let config = DatasetConfig::default()
            .imsize(5)
            .state_batch_size(2)
            .num_train(2)
            .num_test(1);
        let agent_config = AgentConfig::default().num_iters(10);
        let mut agent = build_agent::<GridworldMdp>(&agent_config)?;
        let mut comparators = vec![build_agent(&agent_config.kind(AgentKind::Myopic))?];

        let (train, test, record) =
            generate_gridworld_data(agent.as_mut(), &config, &mut comparators, rng)?;
        assert_eq!((train.len(), test.len()), (2, 1));
        assert_eq!(record.get_scalar("train/num_examples")?, 2.0);
        assert_eq!(record.get_scalar("test/num_examples")?, 1.0);
        assert_eq!(record.get_array1("test/fraction_different")?.len(), 1);
        assert!(record.get_scalar("train/num_without_reward")? <= 2.0);
        Ok(())
    }

    #[test]
    fn test_stored_name() -> Result<()> {
        let names = vec!["arr_1.npy".to_string(), "arr_0".to_string()];
        assert_eq!(stored_name(&names, 0)?, "arr_0");
        assert_eq!(stored_name(&names, 1)?, "arr_1.npy");
        assert!(stored_name(&names, 2).is_err());
        Ok(())
    }
}
