//! Planning agents.
use crate::{
    ActionSelection, AgentConfig, AgentKind, Discounting, Exponential, Myopic, NaiveHyperbolic,
    SophisticatedHyperbolic, ValueIteration, ValueTable,
};
use anyhow::Result;
use bias_core::{Action, ActionDistribution, Agent, BiasError, Mdp, State};
use std::sync::Arc;

/// An MDP together with the values planned for it.
struct Binding<M> {
    mdp: Arc<M>,
    values: ValueTable,
}

/// Agent acting on values computed by [`ValueIteration`] under a [`Discounting`] strategy.
///
/// Binding an MDP with [`Agent::set_mdp`] plans immediately; queries only read the
/// resulting table, so repeated queries return identical distributions.
pub struct PlanningAgent<M, D> {
    planner: ValueIteration,
    selection: ActionSelection,
    discounting: D,
    binding: Option<Binding<M>>,
}

/// Agent with exponential discounting.
pub type OptimalAgent<M> = PlanningAgent<M, Exponential>;

/// Agent with hyperbolic discounting that does not foresee its future preferences.
pub type NaiveTimeDiscountingAgent<M> = PlanningAgent<M, NaiveHyperbolic>;

/// Agent with hyperbolic discounting that plans for its future preferences.
pub type SophisticatedTimeDiscountingAgent<M> = PlanningAgent<M, SophisticatedHyperbolic>;

/// Agent that only sees rewards within a fixed number of steps.
pub type MyopicAgent<M> = PlanningAgent<M, Myopic>;

impl<M: Mdp, D: Discounting> PlanningAgent<M, D> {
    /// Constructs an unbound agent.
    pub fn with_discounting(gamma: f64, beta: Option<f64>, num_iters: usize, discounting: D) -> Self {
        Self {
            planner: ValueIteration::new(gamma, num_iters),
            selection: ActionSelection::from_beta(beta),
            discounting,
            binding: None,
        }
    }

    /// The discounting strategy of the agent.
    pub fn discounting(&self) -> &D {
        &self.discounting
    }

    /// Values planned for the bound MDP.
    pub fn values(&self) -> Option<&ValueTable> {
        self.binding.as_ref().map(|b| &b.values)
    }

    /// Action values at `state` from the perspective of the current self.
    pub fn qvalues(&self, state: State) -> Result<Vec<(Action, f64)>> {
        let binding = self.binding.as_ref().ok_or(BiasError::NoMdpBound)?;
        let mdp = binding.mdp.as_ref();
        if !mdp.contains(state) {
            return Err(BiasError::StateOutOfBounds {
                x: state.x,
                y: state.y,
                width: mdp.width(),
                height: mdp.height(),
            }
            .into());
        }
        Ok(self
            .planner
            .qvalues(mdp, &self.discounting, &binding.values, state, 0))
    }
}

impl<M: Mdp> OptimalAgent<M> {
    /// Constructs an agent maximizing the sum of `gamma`-discounted rewards.
    pub fn new(gamma: f64, beta: Option<f64>, num_iters: usize) -> Self {
        Self::with_discounting(gamma, beta, num_iters, Exponential)
    }
}

impl<M: Mdp> NaiveTimeDiscountingAgent<M> {
    /// Constructs a naive agent discounting rewards by `1 / (1 + hyperbolic_constant * d)`.
    pub fn new(
        gamma: f64,
        beta: Option<f64>,
        num_iters: usize,
        max_delay: usize,
        hyperbolic_constant: f64,
    ) -> Self {
        Self::with_discounting(
            gamma,
            beta,
            num_iters,
            NaiveHyperbolic {
                max_delay,
                constant: hyperbolic_constant,
            },
        )
    }
}

impl<M: Mdp> SophisticatedTimeDiscountingAgent<M> {
    /// Constructs a sophisticated agent discounting rewards by `1 / (1 + hyperbolic_constant * d)`.
    pub fn new(
        gamma: f64,
        beta: Option<f64>,
        num_iters: usize,
        max_delay: usize,
        hyperbolic_constant: f64,
    ) -> Self {
        Self::with_discounting(
            gamma,
            beta,
            num_iters,
            SophisticatedHyperbolic {
                max_delay,
                constant: hyperbolic_constant,
            },
        )
    }
}

impl<M: Mdp> MyopicAgent<M> {
    /// Constructs an agent blind to rewards `horizon` or more steps away.
    pub fn new(gamma: f64, beta: Option<f64>, num_iters: usize, horizon: usize) -> Self {
        Self::with_discounting(gamma, beta, num_iters, Myopic { horizon })
    }
}

impl<M: Mdp, D: Discounting> Agent<M> for PlanningAgent<M, D> {
    fn set_mdp(&mut self, mdp: Arc<M>) {
        let values = self.planner.plan(mdp.as_ref(), &self.discounting);
        self.binding = Some(Binding { mdp, values });
    }

    fn mdp(&self) -> Option<&Arc<M>> {
        self.binding.as_ref().map(|b| &b.mdp)
    }

    fn action_distribution(&self, state: State) -> Result<ActionDistribution> {
        let qvalues = self.qvalues(state)?;
        Ok(self.selection.distribution(&qvalues))
    }
}

/// Builds the agent described by `config`.
pub fn build_agent<M: Mdp + 'static>(config: &AgentConfig) -> Result<Box<dyn Agent<M>>> {
    config.validate()?;
    let AgentConfig {
        kind,
        gamma,
        beta,
        num_iters,
        max_delay,
        hyperbolic_constant,
    } = config.clone();

    let agent: Box<dyn Agent<M>> = match kind {
        AgentKind::Optimal => Box::new(OptimalAgent::new(gamma, beta, num_iters)),
        AgentKind::Naive => Box::new(NaiveTimeDiscountingAgent::new(
            gamma,
            beta,
            num_iters,
            max_delay,
            hyperbolic_constant,
        )),
        AgentKind::Sophisticated => Box::new(SophisticatedTimeDiscountingAgent::new(
            gamma,
            beta,
            num_iters,
            max_delay,
            hyperbolic_constant,
        )),
        AgentKind::Myopic => Box::new(MyopicAgent::new(gamma, beta, num_iters, max_delay)),
    };
    Ok(agent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bias_gridworld::{GridworldConfig, GridworldMdp};
    use rand::{rngs::StdRng, SeedableRng};

    const OPEN_ROOM: [&str; 8] = [
        "XXXXXXXX",
        "X......X",
        "X......X",
        "X.....5X",
        "X......X",
        "X......X",
        "X......X",
        "XXXXXXXX",
    ];

    const TWO_REWARDS: [&str; 3] = ["XXXXXXXXXX", "X1A.....4X", "XXXXXXXXXX"];

    // the short upper corridor passes next to a small reward
    const TEMPTATION: [&str; 6] = [
        "XXXXXXXXXXXXXX",
        "XXXX2XXXXXXXXX",
        "XA..........9X",
        "X.XXXXXXXXXX.X",
        "X............X",
        "XXXXXXXXXXXXXX",
    ];

    fn layout(rows: &[&str]) -> Arc<GridworldMdp> {
        Arc::new(GridworldMdp::from_layout(rows, GridworldConfig::default()).unwrap())
    }

    /// States visited by greedily following `agent` until a reward cell is reached.
    fn rollout(
        agent: &impl Agent<GridworldMdp>,
        mdp: &GridworldMdp,
        start: State,
    ) -> Result<Vec<State>> {
        let mut path = vec![start];
        let mut s = start;
        for _ in 0..mdp.states().len() {
            if mdp.is_reward_cell(s) {
                break;
            }
            let a = agent.action_distribution(s)?.argmax();
            match mdp.transitions(s, a)[0].next_state {
                Some(next) => s = next,
                None => break,
            }
            path.push(s);
        }
        Ok(path)
    }

    #[test]
    fn test_unbound_agent_fails() {
        let agent = OptimalAgent::<GridworldMdp>::new(1.0, None, 10);
        assert!(agent.values().is_none());
        let err = agent.action_distribution(State::new(1, 1)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BiasError>(),
            Some(BiasError::NoMdpBound)
        ));
    }

    #[test]
    fn test_state_out_of_bounds() {
        let mut agent = OptimalAgent::new(1.0, None, 10);
        agent.set_mdp(layout(&OPEN_ROOM));
        let err = agent.action_distribution(State::new(8, 2)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BiasError>(),
            Some(BiasError::StateOutOfBounds { x: 8, y: 2, .. })
        ));
    }

    #[test]
    fn test_optimal_agent_heads_to_reward() -> Result<()> {
        let mut agent = OptimalAgent::new(1.0, None, 50);
        agent.set_mdp(layout(&OPEN_ROOM));
        let dist = agent.action_distribution(State::new(1, 3))?;
        assert_eq!(dist, ActionDistribution::one_hot(Action::East));
        let dist = agent.action_distribution(State::new(6, 3))?;
        assert_eq!(dist, ActionDistribution::one_hot(Action::Stay));
        Ok(())
    }

    #[test]
    fn test_wall_state_is_uniform() -> Result<()> {
        let mut agent = OptimalAgent::new(1.0, Some(1.0), 10);
        agent.set_mdp(layout(&OPEN_ROOM));
        let dist = agent.action_distribution(State::new(0, 0))?;
        assert_eq!(dist, ActionDistribution::uniform());
        Ok(())
    }

    #[test]
    fn test_distributions_are_valid_and_repeatable() -> Result<()> {
        let rng = &mut StdRng::seed_from_u64(7);
        let config = GridworldConfig::default();
        let mdp = Arc::new(GridworldMdp::generate_random_connected(8, 8, 0.1, &config, rng)?);
        let mut agents: Vec<Box<dyn Agent<GridworldMdp>>> = vec![
            Box::new(OptimalAgent::new(0.95, Some(2.0), 30)),
            Box::new(NaiveTimeDiscountingAgent::new(1.0, Some(1.0), 30, 4, 1.0)),
            Box::new(SophisticatedTimeDiscountingAgent::new(1.0, None, 30, 4, 1.0)),
            Box::new(MyopicAgent::new(1.0, Some(0.5), 30, 3)),
        ];
        for agent in agents.iter_mut() {
            agent.set_mdp(mdp.clone());
            for s in mdp.states() {
                let dist = agent.action_distribution(s)?;
                assert!(dist.is_valid());
                assert_eq!(dist, agent.action_distribution(s)?);
            }
        }
        Ok(())
    }

    #[test]
    fn test_myopic_agent_differs_from_optimal() -> Result<()> {
        let mdp = layout(&OPEN_ROOM);
        let mut optimal = OptimalAgent::new(1.0, None, 50);
        let mut myopic = MyopicAgent::new(1.0, None, 50, 1);
        optimal.set_mdp(mdp.clone());
        myopic.set_mdp(mdp);

        let start = State::new(1, 3);
        let p = optimal.action_distribution(start)?;
        let q = myopic.action_distribution(start)?;
        // every move looks the same to the myopic agent
        assert_eq!(q, ActionDistribution::one_hot(Action::North));
        assert!(p.distance(&q) > 0.5);
        Ok(())
    }

    #[test]
    fn test_naive_agent_prefers_nearer_smaller_reward() -> Result<()> {
        let mdp = layout(&TWO_REWARDS);
        let mut optimal = OptimalAgent::new(1.0, None, 20);
        let mut naive = NaiveTimeDiscountingAgent::new(1.0, None, 20, 10, 10.0);
        optimal.set_mdp(mdp.clone());
        naive.set_mdp(mdp);

        let start = State::new(2, 1);
        assert_eq!(optimal.action_distribution(start)?.argmax(), Action::East);
        assert_eq!(naive.action_distribution(start)?.argmax(), Action::West);
        Ok(())
    }

    #[test]
    fn test_sophisticated_agent_avoids_temptation() -> Result<()> {
        let mdp = layout(&TEMPTATION);
        let mut naive = NaiveTimeDiscountingAgent::new(1.0, None, 60, 20, 1.0);
        let mut sophisticated = SophisticatedTimeDiscountingAgent::new(1.0, None, 60, 20, 1.0);
        naive.set_mdp(mdp.clone());
        sophisticated.set_mdp(mdp.clone());
        assert_eq!(naive.discounting().max_delay, 20);
        assert_eq!(sophisticated.values().map(|v| v.n_delays()), Some(21));

        let start = State::new(1, 2);
        let naive_path = rollout(&naive, &mdp, start)?;
        assert_eq!(naive_path[1], State::new(2, 2));
        assert!(naive_path.contains(&State::new(4, 2)));
        assert_eq!(naive_path.last(), Some(&State::new(4, 1)));

        let sophisticated_path = rollout(&sophisticated, &mdp, start)?;
        assert_eq!(sophisticated_path[1], State::new(1, 3));
        assert!(sophisticated_path.contains(&State::new(1, 4)));
        assert!(sophisticated_path.contains(&State::new(12, 4)));
        assert!(!sophisticated_path.contains(&State::new(4, 2)));
        assert_eq!(sophisticated_path.last(), Some(&State::new(12, 2)));
        Ok(())
    }

    #[test]
    fn test_zero_hyperbolic_constant_is_optimal() -> Result<()> {
        let mdp = layout(&TWO_REWARDS);
        let mut optimal = OptimalAgent::new(1.0, Some(1.0), 20);
        let mut naive = NaiveTimeDiscountingAgent::new(1.0, Some(1.0), 20, 5, 0.0);
        let mut sophisticated = SophisticatedTimeDiscountingAgent::new(1.0, Some(1.0), 20, 5, 0.0);
        optimal.set_mdp(mdp.clone());
        naive.set_mdp(mdp.clone());
        sophisticated.set_mdp(mdp.clone());

        for s in mdp.states() {
            let p = optimal.action_distribution(s)?;
            assert_eq!(p, naive.action_distribution(s)?);
            assert_eq!(p, sophisticated.action_distribution(s)?);
        }
        Ok(())
    }

    #[test]
    fn test_set_mdp_replaces_plan() -> Result<()> {
        let mut agent = OptimalAgent::new(1.0, None, 20);
        agent.set_mdp(layout(&["XXXXX", "X1.AX", "XXXXX"]));
        assert_eq!(agent.action_distribution(State::new(3, 1))?.argmax(), Action::West);

        let mdp = layout(&["XXXXX", "X..1X", "XXXXX"]);
        agent.set_mdp(mdp.clone());
        assert!(Arc::ptr_eq(agent.mdp().unwrap(), &mdp));
        assert_eq!(agent.action_distribution(State::new(3, 1))?.argmax(), Action::Stay);
        assert_eq!(agent.action_distribution(State::new(1, 1))?.argmax(), Action::East);
        Ok(())
    }

    #[test]
    fn test_build_agent() -> Result<()> {
        let mdp = layout(&OPEN_ROOM);
        for kind in [
            AgentKind::Optimal,
            AgentKind::Naive,
            AgentKind::Sophisticated,
            AgentKind::Myopic,
        ] {
            let mut agent = build_agent::<GridworldMdp>(&AgentConfig::default().kind(kind))?;
            agent.set_mdp(mdp.clone());
            assert!(agent.action_distribution(State::new(3, 3))?.is_valid());
        }
        assert!(build_agent::<GridworldMdp>(&AgentConfig::default().gamma(2.0)).is_err());
        Ok(())
    }
}
