//! Random generation of gridworlds.
use crate::{GridworldConfig, GridworldMdp};
use anyhow::Result;
use bias_core::{BiasError, Mdp, State};
use itertools::Itertools;
use log::debug;
use ndarray::Array2;
use rand::{seq::SliceRandom, Rng};

impl GridworldMdp {
    /// Generates a grid whose interior cells are walls with probability `wall_prob`.
    ///
    /// Each remaining open cell holds a reward with probability `reward_prob`.
    /// At least one open cell is kept so that start states can be sampled, but
    /// the open cells need not be connected.
    pub fn generate_random<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        wall_prob: f64,
        reward_prob: f64,
        config: &GridworldConfig,
        rng: &mut R,
    ) -> Result<Self> {
        check_probability("wall_prob", wall_prob)?;
        let mut walls = bordered_walls(width, height)?;
        let interior = interior_cells(width, height);

        for s in interior.iter() {
            walls[[s.y, s.x]] = rng.gen_bool(wall_prob);
        }
        if interior.iter().all(|s| walls[[s.y, s.x]]) {
            if let Some(s) = interior.choose(rng) {
                walls[[s.y, s.x]] = false;
            }
        }

        let mut mdp = Self {
            rewards: Array2::zeros((height, width)),
            walls,
            config: config.clone(),
        };
        mdp.place_rewards(reward_prob, rng)?;
        Ok(mdp)
    }

    /// Generates a grid in which every open cell is reachable from every other one.
    ///
    /// Interior cells are visited in random order and turned into walls as long
    /// as the open cells stay connected, until the wall density of `config` is
    /// reached. Rewards are then placed as in [`GridworldMdp::generate_random`].
    pub fn generate_random_connected<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        reward_prob: f64,
        config: &GridworldConfig,
        rng: &mut R,
    ) -> Result<Self> {
        check_probability("connected_wall_density", config.connected_wall_density)?;
        let walls = bordered_walls(width, height)?;
        let mut interior = interior_cells(width, height);
        let n_walls =
            (interior.len() as f64 * config.connected_wall_density).floor() as usize;

        let mut mdp = Self {
            rewards: Array2::zeros((height, width)),
            walls,
            config: config.clone(),
        };

        interior.shuffle(rng);
        let mut placed = 0;
        for s in interior {
            if placed >= n_walls {
                break;
            }
            mdp.walls[[s.y, s.x]] = true;
            if mdp.states().is_empty() || !mdp.is_connected() {
                mdp.walls[[s.y, s.x]] = false;
            } else {
                placed += 1;
            }
        }

        if !mdp.is_connected() {
            return Err(BiasError::Generation("generated grid is not connected".to_string()).into());
        }
        debug!("Placed {} of {} walls in connected grid", placed, n_walls);

        mdp.place_rewards(reward_prob, rng)?;
        Ok(mdp)
    }

    fn place_rewards<R: Rng + ?Sized>(&mut self, reward_prob: f64, rng: &mut R) -> Result<()> {
        check_probability("reward_prob", reward_prob)?;
        let max_reward = self.config.max_reward.max(1);
        for s in self.states() {
            if rng.gen_bool(reward_prob) {
                self.rewards[[s.y, s.x]] = rng.gen_range(1..=max_reward) as f64;
            }
        }
        if self.reward_cells().is_empty() {
            debug!("Generated gridworld has no reward");
        }
        Ok(())
    }
}

fn check_probability(name: &str, p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(BiasError::InvalidConfig(format!("{} must be in [0, 1], got {}", name, p)).into())
    }
}

/// Walls on the outer ring, open interior.
fn bordered_walls(width: usize, height: usize) -> Result<Array2<bool>> {
    if width < 3 || height < 3 {
        return Err(BiasError::Generation(format!(
            "a {}x{} grid has no interior cell",
            width, height
        ))
        .into());
    }
    Ok(Array2::from_shape_fn((height, width), |(y, x)| {
        x == 0 || y == 0 || x == width - 1 || y == height - 1
    }))
}

fn interior_cells(width: usize, height: usize) -> Vec<State> {
    (1..height - 1)
        .cartesian_product(1..width - 1)
        .map(|(y, x)| State::new(x, y))
        .collect()
}
