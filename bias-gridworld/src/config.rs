//! Configuration of [`GridworldMdp`](crate::GridworldMdp).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Dynamics shared by every cell of a gridworld.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct GridworldConfig {
    /// Reward of every action except collecting a reward.
    pub living_reward: f64,

    /// Probability that a move slips to one of the two perpendicular directions.
    pub noise: f64,

    /// Fraction of interior cells turned into walls by the connected generator.
    pub connected_wall_density: f64,

    /// Largest reward placed on a reward cell. Rewards are drawn from `1..=max_reward`.
    pub max_reward: u32,
}

impl Default for GridworldConfig {
    fn default() -> Self {
        Self {
            living_reward: -0.01,
            noise: 0.0,
            connected_wall_density: 0.4,
            max_reward: 9,
        }
    }
}

impl GridworldConfig {
    /// Sets the living reward.
    pub fn living_reward(mut self, v: f64) -> Self {
        self.living_reward = v;
        self
    }

    /// Sets the slip probability.
    pub fn noise(mut self, v: f64) -> Self {
        self.noise = v;
        self
    }

    /// Sets the wall density of connected grids.
    pub fn connected_wall_density(mut self, v: f64) -> Self {
        self.connected_wall_density = v;
        self
    }

    /// Sets the largest reward.
    pub fn max_reward(mut self, v: u32) -> Self {
        self.max_reward = v;
        self
    }

    /// Constructs [`GridworldConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`GridworldConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_gridworld_config() -> Result<()> {
        let config = GridworldConfig::default().noise(0.2).max_reward(4);
        let dir = TempDir::new("gridworld_config")?;
        let path = dir.path().join("gridworld_config.yaml");

        config.save(&path)?;
        let config_ = GridworldConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
