#![warn(missing_docs)]
//! Boundedly-rational planning agents.
//!
//! Every agent is a [`PlanningAgent`]: it runs [`ValueIteration`] over the
//! extended states `(delay, state)` of the bound MDP and turns action values
//! into an [`ActionDistribution`](bias_core::ActionDistribution) either
//! greedily or with a Boltzmann distribution. Agents differ only in their
//! [`Discounting`] strategy:
//!
//! * [`OptimalAgent`] discounts exponentially through `gamma`.
//! * [`NaiveTimeDiscountingAgent`] discounts hyperbolically and assumes its
//!   future selves share today's preferences.
//! * [`SophisticatedTimeDiscountingAgent`] discounts hyperbolically and
//!   anticipates how its future selves will act.
//! * [`MyopicAgent`] ignores rewards beyond a fixed horizon.
//!
//! [`build_agent`] constructs any of them from an [`AgentConfig`].
mod agent;
mod config;
mod discount;
mod policy;
mod value_iteration;
pub use agent::{
    build_agent, MyopicAgent, NaiveTimeDiscountingAgent, OptimalAgent, PlanningAgent,
    SophisticatedTimeDiscountingAgent,
};
pub use config::{AgentConfig, AgentKind};
pub use discount::{Discounting, Exponential, Myopic, NaiveHyperbolic, SophisticatedHyperbolic};
pub use policy::{argmax, ActionSelection};
pub use value_iteration::{ValueIteration, ValueTable};
