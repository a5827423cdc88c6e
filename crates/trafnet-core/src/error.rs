//! Unified error type for the trafnet workspace
//!
//! Every failure the network model or the flow solver can detect is one of
//! the [`TrafficError`] variants below. Core routines return them at the
//! point of detection; nothing is clamped or substituted with a default.
//!
//! # Example
//!
//! ```ignore
//! use trafnet_core::{TrafficError, TrafficResult};
//!
//! fn analyse(path: &str) -> TrafficResult<()> {
//!     let network = load_network(path)?;
//!     let matrices = NetworkMatrices::build(&network)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for all trafnet operations.
#[derive(Error, Debug)]
pub enum TrafficError {
    /// Malformed segment data (self-loop, non-positive rating, unknown location)
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// The reduced Laplacian cannot be solved (disconnected network,
    /// reference and exit at the same location)
    #[error("Singular system: {0}")]
    SingularSystem(String),

    /// A segment with zero capacity reached the VCR computation
    #[error("Division by zero: segment {segment} has zero capacity")]
    DivisionByZero { segment: usize },

    /// Invalid scenario parameters
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors (file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using TrafficError.
pub type TrafficResult<T> = Result<T, TrafficError>;

impl TrafficError {
    /// True for errors that indicate bad network data rather than bad plumbing.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            TrafficError::DataIntegrity(_)
                | TrafficError::SingularSystem(_)
                | TrafficError::DivisionByZero { .. }
        )
    }
}

// Conversion from anyhow::Error
impl From<anyhow::Error> for TrafficError {
    fn from(err: anyhow::Error) -> Self {
        TrafficError::Other(err.to_string())
    }
}

impl From<String> for TrafficError {
    fn from(s: String) -> Self {
        TrafficError::Other(s)
    }
}

impl From<&str> for TrafficError {
    fn from(s: &str) -> Self {
        TrafficError::Other(s.to_string())
    }
}
