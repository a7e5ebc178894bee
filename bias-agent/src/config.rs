//! Configuration of planning agents.
use anyhow::Result;
use bias_core::BiasError;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    fs::File,
    io::{BufReader, Write},
    path::Path,
    str::FromStr,
};

/// Kinds of agents that [`build_agent`](crate::build_agent) can construct.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    /// [`OptimalAgent`](crate::OptimalAgent).
    Optimal,

    /// [`NaiveTimeDiscountingAgent`](crate::NaiveTimeDiscountingAgent).
    Naive,

    /// [`SophisticatedTimeDiscountingAgent`](crate::SophisticatedTimeDiscountingAgent).
    Sophisticated,

    /// [`MyopicAgent`](crate::MyopicAgent).
    Myopic,
}

impl FromStr for AgentKind {
    type Err = BiasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "optimal" => Ok(Self::Optimal),
            "naive" => Ok(Self::Naive),
            "sophisticated" => Ok(Self::Sophisticated),
            "myopic" => Ok(Self::Myopic),
            _ => Err(BiasError::UnknownAgentKind(s.to_string())),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Optimal => "optimal",
            Self::Naive => "naive",
            Self::Sophisticated => "sophisticated",
            Self::Myopic => "myopic",
        };
        write!(f, "{}", s)
    }
}

/// Configuration of a planning agent.
///
/// `max_delay` and `hyperbolic_constant` are ignored by agents that do not use them.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct AgentConfig {
    /// Kind of the agent.
    pub kind: AgentKind,

    /// Discount factor in `(0, 1]`.
    pub gamma: f64,

    /// Rationality of Boltzmann action selection. `None` selects greedily.
    pub beta: Option<f64>,

    /// Number of value iteration sweeps.
    pub num_iters: usize,

    /// Number of steps over which delays are tracked.
    pub max_delay: usize,

    /// `k` in the hyperbolic discount `1 / (1 + k d)`.
    pub hyperbolic_constant: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            kind: AgentKind::Optimal,
            gamma: 1.0,
            beta: None,
            num_iters: 50,
            max_delay: 5,
            hyperbolic_constant: 1.0,
        }
    }
}

impl AgentConfig {
    /// Sets the kind of the agent.
    pub fn kind(mut self, v: AgentKind) -> Self {
        self.kind = v;
        self
    }

    /// Sets the discount factor.
    pub fn gamma(mut self, v: f64) -> Self {
        self.gamma = v;
        self
    }

    /// Sets the rationality parameter.
    pub fn beta(mut self, v: Option<f64>) -> Self {
        self.beta = v;
        self
    }

    /// Sets the number of value iteration sweeps.
    pub fn num_iters(mut self, v: usize) -> Self {
        self.num_iters = v;
        self
    }

    /// Sets the maximum delay.
    pub fn max_delay(mut self, v: usize) -> Self {
        self.max_delay = v;
        self
    }

    /// Sets the hyperbolic discount constant.
    pub fn hyperbolic_constant(mut self, v: f64) -> Self {
        self.hyperbolic_constant = v;
        self
    }

    /// Checks that parameters are within their domains.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(BiasError::InvalidConfig(msg).into()) };

        if !(self.gamma > 0.0 && self.gamma <= 1.0) {
            return invalid(format!("gamma must be in (0, 1], got {}", self.gamma));
        }
        if let Some(beta) = self.beta {
            if !(beta >= 0.0 && beta.is_finite()) {
                return invalid(format!("beta must be finite and non-negative, got {}", beta));
            }
        }
        if !(self.hyperbolic_constant >= 0.0 && self.hyperbolic_constant.is_finite()) {
            return invalid(format!(
                "hyperbolic_constant must be finite and non-negative, got {}",
                self.hyperbolic_constant
            ));
        }
        Ok(())
    }

    /// Constructs [`AgentConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`AgentConfig`].
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
    fn test_agent_kind_from_str() {
        for kind in [
            AgentKind::Optimal,
            AgentKind::Naive,
            AgentKind::Sophisticated,
            AgentKind::Myopic,
        ] {
            assert_eq!(kind.to_string().parse::<AgentKind>().unwrap(), kind);
        }
        assert!(matches!(
            "rational".parse::<AgentKind>(),
            Err(BiasError::UnknownAgentKind(s)) if s == "rational"
        ));
    }

    #[test]
    fn test_serde_agent_config() -> Result<()> {
        let config = AgentConfig::default()
            .kind(AgentKind::Sophisticated)
            .beta(Some(2.0))
            .max_delay(3);
        let dir = TempDir::new("agent_config")?;
        let path = dir.path().join("agent_config.yaml");

        config.save(&path)?;
        let config_ = AgentConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_missing_fields_take_defaults() -> Result<()> {
        let config: AgentConfig = serde_yaml::from_str("kind: myopic\nnum_iters: 7\n")?;
        assert_eq!(
            config,
            AgentConfig::default().kind(AgentKind::Myopic).num_iters(7)
        );
        Ok(())
    }

    #[test]
    fn test_unknown_kind_in_yaml_is_rejected() {
        let yaml = "kind: impatient\ngamma: 1.0\nbeta: ~\nnum_iters: 5\nmax_delay: 1\nhyperbolic_constant: 1.0\n";
        assert!(serde_yaml::from_str::<AgentConfig>(yaml).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(AgentConfig::default().validate().is_ok());
        assert!(AgentConfig::default().gamma(0.0).validate().is_err());
        assert!(AgentConfig::default().gamma(1.5).validate().is_err());
        assert!(AgentConfig::default().beta(Some(-1.0)).validate().is_err());
        assert!(AgentConfig::default()
            .hyperbolic_constant(f64::NAN)
            .validate()
            .is_err());
    }
}
