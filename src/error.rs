//! Error types
//!
//! The physics step has exactly one failure mode; everything else here guards
//! the data boundary (snapshots and settings).

/// Errors raised while advancing the simulation
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Collisions could not be resolved within the pass limit.
    /// Usually two balls overlapping at rest.
    #[error("depth exceeded resolving collisions ({depth} passes)")]
    DepthExceeded { depth: usize },
}

/// Errors raised when applying serialized table state
#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    /// Snapshot carries a different number of balls than the table
    #[error("snapshot has {found} balls, table has {expected}")]
    BallCount { expected: usize, found: usize },

    /// Compact position array has the wrong length
    #[error("short snapshot has {found} values, expected {expected}")]
    ShortLength { expected: usize, found: usize },

    /// A position, velocity or aim value is NaN or infinite
    #[error("non-finite value in {0}")]
    NonFinite(String),

    /// JSON decode failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised when loading table settings
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decode failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A field is out of its valid range
    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
