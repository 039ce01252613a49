//! Persisted document shapes.
//!
//! # Responsibility
//! - Define the JSON layout of the accounts file and the time-total file.
//! - Keep unknown keys intact so rewriting a document never drops data.
//!
//! # Invariants
//! - `UserRecord::id` is derived from the username, never chosen by callers.
//! - Salt and hash are lowercase hex strings and never appear in `Debug` output.

pub mod metric;
pub mod user;
