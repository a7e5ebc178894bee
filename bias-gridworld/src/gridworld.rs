//! Gridworld MDP.
use crate::GridworldConfig;
use anyhow::Result;
use bias_core::{Action, BiasError, Mdp, State, Transition};
use itertools::Itertools;
use ndarray::Array2;
use rand::{seq::SliceRandom, Rng};
use std::collections::VecDeque;

/// A rectangular grid of walls, open cells and reward cells.
///
/// Arrays are indexed as `[[y, x]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridworldMdp {
    pub(crate) walls: Array2<bool>,
    pub(crate) rewards: Array2<f64>,
    pub(crate) config: GridworldConfig,
}

impl GridworldMdp {
    /// Builds a grid from rows of characters.
    ///
    /// `X` is a wall, `.`, ` ` and `A` are open cells and the digits `1`-`9`
    /// are reward cells holding that reward. All rows must have the same length.
    pub fn from_layout(rows: &[&str], config: GridworldConfig) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(BiasError::InvalidConfig("empty gridworld layout".to_string()).into());
        }

        let mut walls = Array2::from_elem((height, width), false);
        let mut rewards = Array2::zeros((height, width));
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(BiasError::InvalidConfig(format!(
                    "row {} of the layout has length {}, expected {}",
                    y,
                    row.chars().count(),
                    width
                ))
                .into());
            }
            for (x, c) in row.chars().enumerate() {
                match c {
                    'X' => walls[[y, x]] = true,
                    '.' | ' ' | 'A' => {}
                    '1'..='9' => rewards[[y, x]] = c.to_digit(10).unwrap_or(0) as f64,
                    _ => {
                        return Err(BiasError::InvalidConfig(format!(
                            "unknown layout character '{}' at ({}, {})",
                            c, x, y
                        ))
                        .into())
                    }
                }
            }
        }

        Ok(Self {
            walls,
            rewards,
            config,
        })
    }

    /// Returns `true` if the cell is a wall. Cells outside of the grid are walls.
    pub fn is_wall(&self, state: State) -> bool {
        !self.contains(state) || self.walls[[state.y, state.x]]
    }

    /// Reward held by the cell, 0 for cells without reward.
    pub fn reward_at(&self, state: State) -> f64 {
        if self.contains(state) {
            self.rewards[[state.y, state.x]]
        } else {
            0.0
        }
    }

    /// Returns `true` if the cell holds a reward.
    pub fn is_reward_cell(&self, state: State) -> bool {
        !self.is_wall(state) && self.reward_at(state) != 0.0
    }

    /// Cells holding a reward, in row-major order.
    pub fn reward_cells(&self) -> Vec<State> {
        self.states()
            .into_iter()
            .filter(|s| self.is_reward_cell(*s))
            .collect()
    }

    /// Dynamics of the grid.
    pub fn config(&self) -> &GridworldConfig {
        &self.config
    }

    /// Cell reached by moving from `state` along `action`; blocked moves stay in place.
    fn target(&self, state: State, action: Action) -> State {
        let (dx, dy) = action.delta();
        let x = state.x as isize + dx;
        let y = state.y as isize + dy;
        if x < 0 || y < 0 {
            return state;
        }
        let next = State::new(x as usize, y as usize);
        if self.is_wall(next) {
            state
        } else {
            next
        }
    }

    /// Returns `true` if every open cell can be reached from every other one.
    pub fn is_connected(&self) -> bool {
        let open = self.states();
        let Some(&start) = open.first() else {
            return true;
        };

        let mut visited = Array2::from_elem(self.walls.raw_dim(), false);
        let mut queue = VecDeque::from([start]);
        visited[[start.y, start.x]] = true;
        let mut n_reached = 1;

        while let Some(s) = queue.pop_front() {
            for a in [Action::North, Action::South, Action::East, Action::West] {
                let next = self.target(s, a);
                if !visited[[next.y, next.x]] {
                    visited[[next.y, next.x]] = true;
                    n_reached += 1;
                    queue.push_back(next);
                }
            }
        }

        n_reached == open.len()
    }
}

impl Mdp for GridworldMdp {
    fn width(&self) -> usize {
        self.walls.ncols()
    }

    fn height(&self) -> usize {
        self.walls.nrows()
    }

    fn states(&self) -> Vec<State> {
        (0..self.height())
            .cartesian_product(0..self.width())
            .map(|(y, x)| State::new(x, y))
            .filter(|s| !self.walls[[s.y, s.x]])
            .collect()
    }

    fn actions(&self, state: State) -> Vec<Action> {
        if self.is_wall(state) {
            return vec![];
        }
        if self.is_reward_cell(state) {
            return vec![Action::Stay];
        }
        Action::ALL
            .iter()
            .copied()
            .filter(|a| *a == Action::Stay || self.target(state, *a) != state)
            .collect()
    }

    fn transitions(&self, state: State, action: Action) -> Vec<Transition> {
        let living_reward = self.config.living_reward;

        if self.is_reward_cell(state) {
            return vec![Transition {
                next_state: None,
                probability: 1.0,
                reward: self.reward_at(state),
            }];
        }

        let noise = self.config.noise;
        let slips = action.perpendicular();
        if noise <= 0.0 || slips.is_empty() {
            return vec![Transition {
                next_state: Some(self.target(state, action)),
                probability: 1.0,
                reward: living_reward,
            }];
        }

        let mut ts = vec![Transition {
            next_state: Some(self.target(state, action)),
            probability: 1.0 - noise,
            reward: living_reward,
        }];
        for slip in slips {
            ts.push(Transition {
                next_state: Some(self.target(state, *slip)),
                probability: noise / slips.len() as f64,
                reward: living_reward,
            });
        }
        ts
    }

    fn random_start_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<State> {
        self.states().choose(rng).copied().ok_or_else(|| {
            BiasError::Generation("gridworld has no open cell to start from".to_string()).into()
        })
    }

    fn to_input_arrays(&self) -> (Array2<f32>, Array2<f32>) {
        let walls = self.walls.mapv(|w| if w { 1.0 } else { 0.0 });
        let rewards = self.rewards.mapv(|r| r as f32);
        (walls, rewards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    const CORRIDOR: [&str; 3] = ["XXXXXX", "XA..3X", "XXXXXX"];

    #[test]
    fn test_from_layout() -> Result<()> {
        let mdp = GridworldMdp::from_layout(&CORRIDOR, GridworldConfig::default())?;
        assert_eq!((mdp.width(), mdp.height()), (6, 3));
        assert_eq!(mdp.states().len(), 4);
        assert_eq!(mdp.reward_cells(), vec![State::new(4, 1)]);
        assert!(GridworldMdp::from_layout(&["XX", "X"], GridworldConfig::default()).is_err());
        assert!(GridworldMdp::from_layout(&["X?X"], GridworldConfig::default()).is_err());
        Ok(())
    }

    #[test]
    fn test_actions() -> Result<()> {
        let mdp = GridworldMdp::from_layout(&CORRIDOR, GridworldConfig::default())?;
        assert_eq!(mdp.actions(State::new(1, 1)), vec![Action::East, Action::Stay]);
        assert_eq!(
            mdp.actions(State::new(2, 1)),
            vec![Action::East, Action::West, Action::Stay]
        );
        assert_eq!(mdp.actions(State::new(4, 1)), vec![Action::Stay]);
        assert!(mdp.actions(State::new(0, 0)).is_empty());
        assert!(mdp.actions(State::new(10, 10)).is_empty());
        Ok(())
    }

    #[test]
    fn test_reward_cell_terminates() -> Result<()> {
        let mdp = GridworldMdp::from_layout(&CORRIDOR, GridworldConfig::default())?;
        let ts = mdp.transitions(State::new(4, 1), Action::Stay);
        assert_eq!(
            ts,
            vec![Transition {
                next_state: None,
                probability: 1.0,
                reward: 3.0
            }]
        );
        let ts = mdp.transitions(State::new(3, 1), Action::East);
        assert_eq!(ts[0].next_state, Some(State::new(4, 1)));
        assert_eq!(ts[0].reward, -0.01);
        Ok(())
    }

    #[test]
    fn test_noisy_transitions_sum_to_one() -> Result<()> {
        let config = GridworldConfig::default().noise(0.2);
        let mdp = GridworldMdp::from_layout(&["XXXXX", "X...X", "X...X", "XXXXX"], config)?;
        let ts = mdp.transitions(State::new(1, 1), Action::East);
        assert_eq!(ts.len(), 3);
        let total: f64 = ts.iter().map(|t| t.probability).sum();
        assert!((total - 1.0).abs() < 1e-12);
        // slipping north hits the wall and stays in place
        assert!(ts.contains(&Transition {
            next_state: Some(State::new(1, 1)),
            probability: 0.1,
            reward: -0.01
        }));
        Ok(())
    }

    #[test]
    fn test_input_arrays() -> Result<()> {
        let mdp = GridworldMdp::from_layout(&CORRIDOR, GridworldConfig::default())?;
        let (walls, rewards) = mdp.to_input_arrays();
        assert_eq!(walls.shape(), &[3, 6]);
        assert_eq!(walls[[0, 0]], 1.0);
        assert_eq!(walls[[1, 2]], 0.0);
        assert_eq!(rewards[[1, 4]], 3.0);
        assert_eq!(rewards.iter().filter(|r| **r != 0.0).count(), 1);
        Ok(())
    }

    #[test]
    fn test_random_start_state_is_open() -> Result<()> {
        let mdp = GridworldMdp::from_layout(&CORRIDOR, GridworldConfig::default())?;
        let rng = &mut StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let s = mdp.random_start_state(rng)?;
            assert!(!mdp.is_wall(s));
        }
        let closed = GridworldMdp::from_layout(&["XXX", "XXX"], GridworldConfig::default())?;
        assert!(closed.random_start_state(rng).is_err());
        Ok(())
    }

    #[test]
    fn test_is_connected() -> Result<()> {
        let config = GridworldConfig::default();
        assert!(GridworldMdp::from_layout(&CORRIDOR, config.clone())?.is_connected());
        let split = GridworldMdp::from_layout(&["XXXXX", "X.X.X", "XXXXX"], config)?;
        assert!(!split.is_connected());
        Ok(())
    }
}
