#![warn(missing_docs)]
//! Core traits and types for boundedly-rational agents in gridworld MDPs.
//!
//! This crate defines the contract between environments ([`Mdp`]) and
//! planning agents ([`Agent`]), the action encoding shared by every agent and
//! by dataset labels ([`Action`], [`ActionDistribution`]), the error type of
//! the library and the [`record`] container used for diagnostics.
pub mod error;
pub mod record;

mod base;
pub use base::{
    Action, ActionDistribution, Agent, Mdp, State, Transition, PROB_TOLERANCE,
};
pub use error::BiasError;
