//! Lock-guarded elapsed-seconds total.

use super::{MetricError, MetricResult};
use crate::model::metric::{coerce_total_seconds, MetricDocument};
use crate::store::{load_json, write_json};
use log::{debug, warn};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Total tracked seconds, optionally mirrored to a file.
#[derive(Debug)]
pub struct TotalTimeTracker {
    persist_file: Option<PathBuf>,
    total_seconds: Mutex<f64>,
}

impl TotalTimeTracker {
    /// Creates a tracker starting at zero.
    ///
    /// With `persist_file = None`, `load` is a no-op and `save` fails.
    pub fn new(persist_file: Option<PathBuf>) -> Self {
        Self {
            persist_file,
            total_seconds: Mutex::new(0.0),
        }
    }

    pub fn with_persist_file(path: impl Into<PathBuf>) -> Self {
        Self::new(Some(path.into()))
    }

    pub fn in_memory() -> Self {
        Self::new(None)
    }

    pub fn persist_file(&self) -> Option<&Path> {
        self.persist_file.as_deref()
    }

    pub fn total_seconds(&self) -> f64 {
        *self.lock()
    }

    /// Replaces the total. Non-finite values cannot be stored as JSON
    /// numbers and are ignored.
    pub fn set_total_seconds(&self, value: f64) {
        if !value.is_finite() {
            warn!(
                "event=tracker_set module=metric status=rejected reason=non_finite value={}",
                value
            );
            return;
        }
        *self.lock() = value;
    }

    /// Adds `delta` under one lock acquisition and returns the new total.
    ///
    /// A sum that would not be finite leaves the total unchanged.
    pub fn add_seconds(&self, delta: f64) -> f64 {
        let mut total = self.lock();
        let next = *total + delta;
        if next.is_finite() {
            *total = next;
        } else {
            warn!(
                "event=tracker_add module=metric status=rejected reason=non_finite delta={}",
                delta
            );
        }
        *total
    }

    /// Writes `{"total_seconds": ...}` to the configured file.
    ///
    /// Write failures are logged and ignored.
    ///
    /// # Errors
    /// Returns [`MetricError::PathNotConfigured`] when no file is configured.
    pub fn save(&self) -> MetricResult<()> {
        let path = self
            .persist_file
            .as_deref()
            .ok_or(MetricError::PathNotConfigured)?;
        let document = MetricDocument {
            total_seconds: self.total_seconds(),
        };
        if write_json(path, &document).is_ok() {
            debug!(
                "event=tracker_save module=metric status=ok total_seconds={}",
                document.total_seconds
            );
        }
        Ok(())
    }

    /// Replaces the total with the value stored on disk.
    ///
    /// A missing or corrupt file, or a missing key, resets the total to zero.
    /// A document that is not an object, or a present but non-numeric or
    /// non-finite value, leaves the total unchanged.
    pub fn load(&self) {
        let Some(path) = self.persist_file.as_deref() else {
            return;
        };
        let document = load_json(path).unwrap_or_else(|| Value::Object(Map::new()));
        match coerce_total_seconds(&document).filter(|seconds| seconds.is_finite()) {
            Some(seconds) => {
                self.set_total_seconds(seconds);
                debug!(
                    "event=tracker_load module=metric status=ok total_seconds={}",
                    seconds
                );
            }
            None => warn!(
                "event=tracker_load module=metric status=error error_code=invalid_total path={}",
                path.display()
            ),
        }
    }

    fn lock(&self) -> MutexGuard<'_, f64> {
        self.total_seconds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TotalTimeTracker {
    fn default() -> Self {
        Self::in_memory()
    }
}
