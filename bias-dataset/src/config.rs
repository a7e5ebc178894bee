//! Configuration of dataset generation.
use anyhow::Result;
use bias_agent::AgentConfig;
use bias_core::{Action, BiasError};
use bias_gridworld::GridworldConfig;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

/// Configuration of [`generate_gridworld_irl`](crate::generate_gridworld_irl).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct DatasetConfig {
    /// Seed of the random number generator. Drawn at random when `None`.
    pub seed: Option<u64>,

    /// Width and height of generated grids.
    pub imsize: usize,

    /// Probability that an interior cell is a wall, used when `simple_mdp` is set.
    pub wall_prob: f64,

    /// Probability that an open cell holds a reward.
    pub reward_prob: f64,

    /// Number of examples in the unknown-reward partition.
    pub num_mdps: usize,

    /// Number of states sampled per example.
    pub state_batch_size: usize,

    /// Length of label vectors, at least the number of actions.
    pub num_actions: usize,

    /// Generate grids with independent random walls instead of connected grids.
    pub simple_mdp: bool,

    /// Two label vectors further apart than this count as different behaviour.
    pub action_distance_threshold: f64,

    /// The agent whose behaviour labels the dataset.
    pub agent: AgentConfig,

    /// An agent compared against `agent` on every sampled state.
    pub other_agent: Option<AgentConfig>,

    /// Number of examples in the train partition.
    pub num_train: usize,

    /// Number of examples in the test partition.
    pub num_test: usize,

    /// Dynamics of generated grids.
    pub gridworld: GridworldConfig,

    /// Output file. Derived from the other options when `None`.
    pub fname: Option<PathBuf>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            seed: None,
            imsize: 8,
            wall_prob: 0.0,
            reward_prob: 0.05,
            num_mdps: 12,
            state_batch_size: 10,
            num_actions: Action::COUNT,
            simple_mdp: false,
            action_distance_threshold: 0.5,
            agent: AgentConfig::default(),
            other_agent: None,
            num_train: 2500,
            num_test: 800,
            gridworld: GridworldConfig::default(),
            fname: None,
        }
    }
}

impl DatasetConfig {
    /// Sets the seed.
    pub fn seed(mut self, v: Option<u64>) -> Self {
        self.seed = v;
        self
    }

    /// Sets the size of grids.
    pub fn imsize(mut self, v: usize) -> Self {
        self.imsize = v;
        self
    }

    /// Sets the wall probability.
    pub fn wall_prob(mut self, v: f64) -> Self {
        self.wall_prob = v;
        self
    }

    /// Sets the reward probability.
    pub fn reward_prob(mut self, v: f64) -> Self {
        self.reward_prob = v;
        self
    }

    /// Sets the number of unknown-reward examples.
    pub fn num_mdps(mut self, v: usize) -> Self {
        self.num_mdps = v;
        self
    }

    /// Sets the number of states per example.
    pub fn state_batch_size(mut self, v: usize) -> Self {
        self.state_batch_size = v;
        self
    }

    /// Sets the length of label vectors.
    pub fn num_actions(mut self, v: usize) -> Self {
        self.num_actions = v;
        self
    }

    /// Sets whether grids are generated without the connectivity constraint.
    pub fn simple_mdp(mut self, v: bool) -> Self {
        self.simple_mdp = v;
        self
    }

    /// Sets the distance above which label vectors count as different.
    pub fn action_distance_threshold(mut self, v: f64) -> Self {
        self.action_distance_threshold = v;
        self
    }

    /// Sets the labelling agent.
    pub fn agent(mut self, v: AgentConfig) -> Self {
        self.agent = v;
        self
    }

    /// Sets the comparator agent.
    pub fn other_agent(mut self, v: Option<AgentConfig>) -> Self {
        self.other_agent = v;
        self
    }

    /// Sets the number of train examples.
    pub fn num_train(mut self, v: usize) -> Self {
        self.num_train = v;
        self
    }

    /// Sets the number of test examples.
    pub fn num_test(mut self, v: usize) -> Self {
        self.num_test = v;
        self
    }

    /// Sets the dynamics of grids.
    pub fn gridworld(mut self, v: GridworldConfig) -> Self {
        self.gridworld = v;
        self
    }

    /// Sets the output file.
    pub fn fname(mut self, v: Option<PathBuf>) -> Self {
        self.fname = v;
        self
    }

    /// Checks that options are within their domains.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(BiasError::InvalidConfig(msg).into()) };

        if self.num_actions < Action::COUNT {
            return invalid(format!(
                "num_actions must be at least {}, got {}",
                Action::COUNT,
                self.num_actions
            ));
        }
        if self.imsize < 3 {
            return invalid(format!("imsize must be at least 3, got {}", self.imsize));
        }
        if self.state_batch_size == 0 {
            return invalid("state_batch_size must be positive".to_string());
        }
        for (name, p) in [
            ("wall_prob", self.wall_prob),
            ("reward_prob", self.reward_prob),
            ("noise", self.gridworld.noise),
            ("connected_wall_density", self.gridworld.connected_wall_density),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return invalid(format!("{} must be in [0, 1], got {}", name, p));
            }
        }
        self.agent.validate()?;
        if let Some(other) = &self.other_agent {
            other.validate()?;
        }
        Ok(())
    }

    /// File name describing the dataset generated with `seed`.
    pub fn default_file_name(&self, seed: u64) -> PathBuf {
        let beta = match self.agent.beta {
            Some(beta) => beta.to_string(),
            None => "None".to_string(),
        };
        let name = format!(
            "num_train-{}-num_test-{}-seed-{}-imsize-{}-rewardp-{}-batch-{}-statebatch-{}-simple_mdp-{}\
             -adt-{}-agent-{}-gamma-{}-beta-{}-max_delay-{}-hc-{}.npz",
            self.num_train,
            self.num_test,
            seed,
            self.imsize,
            self.reward_prob,
            self.num_mdps,
            self.state_batch_size,
            self.simple_mdp,
            self.action_distance_threshold,
            self.agent.kind,
            self.agent.gamma,
            beta,
            self.agent.max_delay,
            self.agent.hyperbolic_constant,
        );
        Path::new("datasets").join(name)
    }

    /// Constructs [`DatasetConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`DatasetConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
