//! Process-level run ID for tracking batch executions.
//!
//! Each process gets a unique ULID at startup. Every `RankedBatch` produced
//! within the same process carries this ID, enabling:
//! - Correlating exported tables and log lines with the run that produced them
//! - Separate records for repeated runs over the same inputs
//!
//! # Example
//! ```
//! use tp_common::run_id;
//!
//! // Same value for the entire process lifetime
//! let id = run_id::get();
//! println!("Current run: {}", id);
//!
//! // Fresh ULID for sub-tasks if needed
//! let sub_id = run_id::generate();
//! ```

use once_cell::sync::Lazy;
use ulid::Ulid;

/// Process-level run ID, generated once at first access.
static RUN_ID: Lazy<String> = Lazy::new(|| Ulid::new().to_string());

/// Returns the process-level run ID.
///
/// Generated once per process, time-ordered (ULIDs sort lexicographically by
/// creation time), 26 characters, URL-safe.
#[inline]
pub fn get() -> &'static str {
    &RUN_ID
}

/// Generates a fresh ULID for sub-operations (e.g. per-export IDs).
#[inline]
pub fn generate() -> String {
    Ulid::new().to_string()
}
