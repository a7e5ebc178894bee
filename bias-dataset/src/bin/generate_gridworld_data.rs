//! Generates an IRL dataset and saves it as an `.npz` archive.
//!
//! Options not given on the command line are taken from `--config`, or from
//! the defaults of [`DatasetConfig`] without a configuration file.
use anyhow::Result;
use bias_agent::AgentKind;
use bias_dataset::{save_dataset, DatasetConfig};
use clap::Parser;
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{fs, path::PathBuf};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// YAML file of a DatasetConfig
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed [default: random]
    #[arg(long)]
    seed: Option<u64>,

    /// Width and height of grids [default: 8]
    #[arg(long)]
    imsize: Option<usize>,

    /// Probability of interior walls with --simple-mdp [default: 0]
    #[arg(long, alias = "wall_prob")]
    wall_prob: Option<f64>,

    /// Probability that an open cell holds a reward [default: 0.05]
    #[arg(long, alias = "reward_prob")]
    reward_prob: Option<f64>,

    /// Number of unknown-reward examples [default: 12]
    #[arg(long, alias = "batchsize")]
    batch_size: Option<usize>,

    /// Number of states sampled per grid [default: 10]
    #[arg(long, alias = "statebatchsize")]
    state_batch_size: Option<usize>,

    /// Length of label vectors [default: 5]
    #[arg(long, alias = "num_actions")]
    num_actions: Option<usize>,

    /// Generate grids without the connectivity constraint
    #[arg(long, alias = "simple_mdp", default_value_t = false)]
    simple_mdp: bool,

    /// Distance above which two agents act differently [default: 0.5]
    #[arg(long, alias = "action_distance_threshold")]
    action_distance_threshold: Option<f64>,

    /// Labelling agent: optimal, naive, sophisticated or myopic [default: optimal]
    #[arg(long)]
    agent: Option<AgentKind>,

    /// Discount factor [default: 1]
    #[arg(long)]
    gamma: Option<f64>,

    /// Rationality of Boltzmann action selection [default: greedy]
    #[arg(long)]
    beta: Option<f64>,

    /// Number of value iteration sweeps [default: 50]
    #[arg(long, alias = "num_iters")]
    num_iters: Option<usize>,

    /// Maximum delay of time-discounting and myopic agents [default: 5]
    #[arg(long, alias = "max_delay")]
    max_delay: Option<usize>,

    /// Hyperbolic discount constant [default: 1]
    #[arg(long, alias = "hyperbolic_constant")]
    hyperbolic_constant: Option<f64>,

    /// Comparator agent, sharing the parameters of the labelling agent
    #[arg(long, alias = "other_agent")]
    other_agent: Option<AgentKind>,

    /// Number of train examples [default: 2500]
    #[arg(long, alias = "num_train")]
    num_train: Option<usize>,

    /// Number of test examples [default: 800]
    #[arg(long, alias = "num_test")]
    num_test: Option<usize>,

    /// Output file [default: derived from the options]
    #[arg(long)]
    fname: Option<PathBuf>,
}

impl Args {
    /// Configuration file, or defaults, overridden by the given options.
    fn dataset_config(&self) -> Result<DatasetConfig> {
        let mut config = match &self.config {
            Some(path) => DatasetConfig::load(path)?,
            None => DatasetConfig::default(),
        };

        if let Some(v) = self.seed {
            config.seed = Some(v);
        }
        if let Some(v) = self.imsize {
            config.imsize = v;
        }
        if let Some(v) = self.wall_prob {
            config.wall_prob = v;
        }
        if let Some(v) = self.reward_prob {
            config.reward_prob = v;
        }
        if let Some(v) = self.batch_size {
            config.num_mdps = v;
        }
        if let Some(v) = self.state_batch_size {
            config.state_batch_size = v;
        }
        if let Some(v) = self.num_actions {
            config.num_actions = v;
        }
        if self.simple_mdp {
            config.simple_mdp = true;
        }
        if let Some(v) = self.action_distance_threshold {
            config.action_distance_threshold = v;
        }
        if let Some(v) = self.agent {
            config.agent.kind = v;
        }
        if let Some(v) = self.gamma {
            config.agent.gamma = v;
        }
        if let Some(v) = self.beta {
            config.agent.beta = Some(v);
        }
        if let Some(v) = self.num_iters {
            config.agent.num_iters = v;
        }
        if let Some(v) = self.max_delay {
            config.agent.max_delay = v;
        }
        if let Some(v) = self.hyperbolic_constant {
            config.agent.hyperbolic_constant = v;
        }
        if let Some(v) = self.other_agent {
            config.other_agent = Some(config.agent.clone().kind(v));
        }
        if let Some(v) = self.num_train {
            config.num_train = v;
        }
        if let Some(v) = self.num_test {
            config.num_test = v;
        }
        if let Some(v) = &self.fname {
            config.fname = Some(v.clone());
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.dataset_config()?;
    config.validate()?;

    let seed = match config.seed {
        Some(seed) => seed,
        None => rand::thread_rng().gen_range(0..100_000),
    };
    info!("Using seed {}", seed);
    let fname = match &config.fname {
        Some(fname) => fname.clone(),
        None => config.default_file_name(seed),
    };
    if let Some(dir) = fname.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    save_dataset(&config, &fname, &mut rng)?;

    Ok(())
}
