//! Environment.
use super::{Action, State};
use anyhow::Result;
use ndarray::Array2;
use rand::Rng;

/// One possible outcome of taking an action in a state.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// The successor state, `None` when the episode terminates.
    pub next_state: Option<State>,

    /// Probability of this outcome.
    pub probability: f64,

    /// Reward received on this outcome.
    pub reward: f64,
}

/// Represents a grid MDP that agents plan in.
///
/// Implementors are immutable once built; agents hold them through an
/// [`Arc`](std::sync::Arc) for the duration of a binding.
pub trait Mdp {
    /// Number of columns.
    fn width(&self) -> usize;

    /// Number of rows.
    fn height(&self) -> usize;

    /// All states agents can be in, i.e., the non-wall cells, in row-major order.
    fn states(&self) -> Vec<State>;

    /// Legal actions in `state`. Empty for walls.
    fn actions(&self, state: State) -> Vec<Action>;

    /// Outcomes of taking `action` in `state`. Probabilities sum to one.
    fn transitions(&self, state: State, action: Action) -> Vec<Transition>;

    /// Samples a state to start from.
    ///
    /// Fails if the MDP has no state an agent can stand in.
    fn random_start_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<State>
    where
        Self: Sized;

    /// Numeric encoding `(walls, rewards)`, both of shape `(height, width)`.
    ///
    /// `walls[[y, x]]` is 1 for a wall and 0 otherwise.
    fn to_input_arrays(&self) -> (Array2<f32>, Array2<f32>);

    /// Returns `true` if `state` lies inside the grid.
    fn contains(&self, state: State) -> bool {
        state.x < self.width() && state.y < self.height()
    }
}
