//! Core functionalities.
mod action;
mod agent;
mod mdp;
pub use action::{Action, ActionDistribution, State, PROB_TOLERANCE};
pub use agent::Agent;
pub use mdp::{Mdp, Transition};
