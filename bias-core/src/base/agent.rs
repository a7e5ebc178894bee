//! Agent.
use super::{ActionDistribution, Mdp, State};
use anyhow::Result;
use std::sync::Arc;

/// A planning agent that acts in one MDP at a time.
pub trait Agent<M: Mdp> {
    /// Binds the agent to `mdp`.
    ///
    /// Any plan computed for a previously bound MDP is discarded.
    fn set_mdp(&mut self, mdp: Arc<M>);

    /// The MDP the agent is currently bound to.
    fn mdp(&self) -> Option<&Arc<M>>;

    /// Distribution over actions the agent takes in `state`.
    ///
    /// Fails if the agent is not bound to an MDP or `state` is outside of it.
    fn action_distribution(&self, state: State) -> Result<ActionDistribution>;
}
