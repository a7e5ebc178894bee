//! Value iteration over extended states `(delay, state)`.
use crate::{policy::argmax, Discounting};
use bias_core::{Action, Mdp, State, Transition};
use log::debug;
use ndarray::Array3;

/// Values of extended states, indexed as `[[delay, y, x]]`.
///
/// Walls and terminal outcomes have value 0.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    values: Array3<f64>,
}

impl ValueTable {
    fn zeros(n_delays: usize, height: usize, width: usize) -> Self {
        Self {
            values: Array3::zeros((n_delays, height, width)),
        }
    }

    /// Value of `state` seen from `delay`.
    pub fn get(&self, delay: usize, state: State) -> f64 {
        self.values[[delay, state.y, state.x]]
    }

    /// Number of tracked delays, `max_delay + 1`.
    pub fn n_delays(&self) -> usize {
        self.values.shape()[0]
    }

    /// Underlying array.
    pub fn as_array(&self) -> &Array3<f64> {
        &self.values
    }
}

/// Finite-horizon value iteration.
///
/// Runs exactly `num_iters` synchronous sweeps of
///
/// ```text
/// Q_d(s, a) = sum_t p_t (w(d) r_t + gamma V[next(d), s'_t])
/// V[d, s]   = Q_d(s, argmax_a Q_{c(d)}(s, a))
/// ```
///
/// where `w`, `next` and `c` come from the [`Discounting`] strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueIteration {
    gamma: f64,
    num_iters: usize,
}

impl ValueIteration {
    /// Constructs a planner.
    pub fn new(gamma: f64, num_iters: usize) -> Self {
        Self { gamma, num_iters }
    }

    /// Computes the value table of `mdp`.
    pub fn plan<M: Mdp, D: Discounting>(&self, mdp: &M, discounting: &D) -> ValueTable {
        let n_delays = discounting.max_delay() + 1;
        let model = mdp
            .states()
            .into_iter()
            .map(|s| {
                let actions = mdp
                    .actions(s)
                    .into_iter()
                    .map(|a| (a, mdp.transitions(s, a)))
                    .collect::<Vec<_>>();
                (s, actions)
            })
            .collect::<Vec<_>>();

        let mut values = ValueTable::zeros(n_delays, mdp.height(), mdp.width());
        for _ in 0..self.num_iters {
            let mut next = ValueTable::zeros(n_delays, mdp.height(), mdp.width());
            for delay in 0..n_delays {
                let chooser = discounting.choice_delay(delay);
                for (s, actions) in model.iter() {
                    let qs = actions
                        .iter()
                        .map(|(a, ts)| (*a, self.backup(ts, chooser, &values, discounting)))
                        .collect::<Vec<_>>();
                    let Some(best) = argmax(&qs) else {
                        continue;
                    };
                    if let Some((_, ts)) = actions.iter().find(|(a, _)| *a == best) {
                        next.values[[delay, s.y, s.x]] =
                            self.backup(ts, delay, &values, discounting);
                    }
                }
            }
            values = next;
        }

        debug!(
            "Planned {} sweeps over {} states and {} delays",
            self.num_iters,
            model.len(),
            n_delays
        );
        values
    }

    /// Action values of `state` seen from `delay`, in the order of `mdp.actions(state)`.
    pub fn qvalues<M: Mdp, D: Discounting>(
        &self,
        mdp: &M,
        discounting: &D,
        values: &ValueTable,
        state: State,
        delay: usize,
    ) -> Vec<(Action, f64)> {
        mdp.actions(state)
            .into_iter()
            .map(|a| {
                let ts = mdp.transitions(state, a);
                (a, self.backup(&ts, delay, values, discounting))
            })
            .collect()
    }

    fn backup<D: Discounting>(
        &self,
        transitions: &[Transition],
        delay: usize,
        values: &ValueTable,
        discounting: &D,
    ) -> f64 {
        let weight = discounting.reward_weight(delay);
        let next_delay = discounting.next_delay(delay);
        transitions
            .iter()
            .map(|t| {
                let future = t.next_state.map_or(0.0, |s| values.get(next_delay, s));
                t.probability * (weight * t.reward + self.gamma * future)
            })
            .sum()
    }
}
