//! Failures of JSON snapshot export and import.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot could not be written as JSON.
    #[error("cannot encode machine snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    /// The input is not a well-formed snapshot document.
    #[error("cannot decode machine snapshot: {0}")]
    Decode(#[source] serde_json::Error),

    /// The document was produced by an incompatible snapshot layout.
    #[error("snapshot layout v{found} cannot be read, expected v{expected}")]
    UnsupportedVersion { found: u32, expected: u32 },
}
