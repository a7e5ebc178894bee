//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum BiasError {
    /// The agent kind label is not one of the known variants.
    #[error("Invalid agent: {0}")]
    UnknownAgentKind(String),

    /// More comparator agents than sampled states in an example.
    #[error("{comparators} comparator agents given, but an example only has {batch_size} states")]
    TooManyComparators {
        /// Number of comparator agents.
        comparators: usize,

        /// Number of sampled states per example.
        batch_size: usize,
    },

    /// An agent was queried before being bound to an MDP.
    #[error("Agent is not bound to an MDP")]
    NoMdpBound,

    /// The queried state lies outside the grid.
    #[error("State ({x}, {y}) is outside of the {width}x{height} grid")]
    StateOutOfBounds {
        /// Column of the state.
        x: usize,

        /// Row of the state.
        y: usize,

        /// Width of the grid.
        width: usize,

        /// Height of the grid.
        height: usize,
    },

    /// The environment could not produce an MDP.
    #[error("MDP generation failed: {0}")]
    Generation(String),

    /// A configuration value is out of its allowed range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKey(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueType(String),
}
