use thiserror::Error;

/// Failures reported by tree queries and the bounded heap.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// k-nearest-neighbor search needs at least one neighbor.
    #[error("invalid k: {k} (must be at least 1)")]
    InvalidK { k: usize },

    /// Range search radius was negative (or NaN).
    #[error("invalid threshold: {threshold} (must be non-negative)")]
    InvalidThreshold { threshold: f64 },

    #[error("heap is empty")]
    EmptyHeap,
}

pub type Result<T> = std::result::Result<T, Error>;
