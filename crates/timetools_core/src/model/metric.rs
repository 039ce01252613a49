//! Time-total document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key holding the accumulated seconds.
pub const TOTAL_SECONDS_KEY: &str = "total_seconds";

/// On-disk shape of the tracker file: `{"total_seconds": 3661.5}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricDocument {
    pub total_seconds: f64,
}

/// Reads `total_seconds` out of a loosely-typed document.
///
/// A document that is not an object yields `None`. Missing key yields
/// `Some(0.0)`. A number, a string holding a number, or a
/// boolean (as 1.0/0.0) yields that value. Anything else, `null` included,
/// yields `None`.
pub fn coerce_total_seconds(document: &Value) -> Option<f64> {
    let Value::Object(fields) = document else {
        return None;
    };
    match fields.get(TOTAL_SECONDS_KEY) {
        None => Some(0.0),
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        Some(Value::Bool(flag)) => Some(if *flag { 1.0 } else { 0.0 }),
        Some(_) => None,
    }
}
