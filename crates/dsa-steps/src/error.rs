//! Input validation errors.

use thiserror::Error;

/// Result type for step generation.
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons an input cannot start a run.
///
/// These are user-input failures surfaced as a message before playback
/// begins. Generation itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// KMP needs at least one pattern character.
    #[error("pattern must not be empty")]
    EmptyPattern,

    /// KMP pattern cannot be longer than the text it searches.
    #[error("pattern length {pattern} exceeds text length {text}")]
    PatternTooLong { pattern: usize, text: usize },

    /// Binary search requires ascending input.
    #[error("values must be sorted ascending (out of order at index {index})")]
    Unsorted { index: usize },

    /// Traversal start node does not exist.
    #[error("start node {start} out of range for graph with {nodes} nodes")]
    StartOutOfRange { start: usize, nodes: usize },

    /// Graph edge references a missing node.
    #[error("edge ({from}, {to}) out of range for graph with {nodes} nodes")]
    EdgeOutOfRange { from: usize, to: usize, nodes: usize },

    /// Hash table needs at least one slot.
    #[error("hash table capacity must be at least 1")]
    ZeroCapacity,

    /// Input is larger than a visualizer can sensibly animate.
    #[error("input length {len} exceeds maximum of {max}")]
    InputTooLarge { len: usize, max: usize },
}
