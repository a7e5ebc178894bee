//! Gridworld MDPs.
//!
//! [`GridworldMdp`] implements [`Mdp`](bias_core::Mdp) for rectangular grids
//! surrounded by walls. Cells are walls, open cells or reward cells:
//!
//! * From an open cell, an agent may move to any neighbouring non-wall cell or
//!   stay; each of these actions yields the living reward.
//! * On a reward cell, the only action is [`Stay`](bias_core::Action::Stay),
//!   which collects the reward and ends the episode.
//!
//! Random grids are built with [`GridworldMdp::generate_random`] or, when every
//! open cell must be reachable from every other one,
//! [`GridworldMdp::generate_random_connected`].
mod config;
mod generate;
mod gridworld;
pub use config::GridworldConfig;
pub use gridworld::GridworldMdp;
