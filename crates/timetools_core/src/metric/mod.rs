//! Accumulated tracked time.
//!
//! # Responsibility
//! - Hold one elapsed-seconds total behind a lock.
//! - Mirror it to an optional JSON file on explicit `save`/`load`.
//!
//! # Invariants
//! - Each get, set and add holds the lock only for that single step.
//! - `save` without a configured path is a caller error, not an I/O error.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod tracker;

pub use tracker::TotalTimeTracker;

pub type MetricResult<T> = Result<T, MetricError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricError {
    PathNotConfigured,
}

impl Display for MetricError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PathNotConfigured => write!(f, "no persist file configured for tracker"),
        }
    }
}

impl Error for MetricError {}
