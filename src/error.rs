//! Error handling for the allocator.
//!
//! Two layers exist:
//!
//! 1. `AllocError`: synchronous failures that abort allocation before any
//!    placement work starts (validation, serialization).
//! 2. Recorded plan errors/warnings (`plan::PlanError`, `plan::PlanWarning`)
//!    are collected into the result document while allocation continues, so
//!    every failure site is discovered in one pass.

use thiserror::Error;

/// Top-level error type for the allocation surface.
#[derive(Debug, Error)]
pub enum AllocError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Input rejection. Every variant names the offending document path.
///
/// The validator is the only component allowed to reject input; downstream
/// components assume a well-formed project.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{path}: unsupported version {found}, expected 1")]
    UnsupportedVersion { path: String, found: u32 },

    #[error("{path}: at least one rack is required")]
    NoRacks { path: String },

    #[error("{path}: duplicate rack id '{id}'")]
    DuplicateRackId { path: String, id: String },

    #[error("{path}: rack height must be at least 1U")]
    InvalidRackHeight { path: String, rack_id: String },

    #[error("{path}: duplicate demand id '{id}'")]
    DuplicateDemandId { path: String, id: String },

    #[error("{path}: src and dst must differ")]
    SelfLoopDemand { path: String, demand_id: String },

    #[error("{path}: '{rack}' references no defined rack")]
    UnknownRack { path: String, rack: String },

    #[error("{path}: count must be positive")]
    NonPositiveCount { path: String, demand_id: String },

    #[error("{path}: slots_per_u must be positive")]
    InvalidSlotsPerU { path: String },

    #[error("{path}: category '{category}' listed more than once")]
    RepeatedCategory { path: String, category: String },
}

/// CSV emission failure. The writers target in-memory buffers, so the only
/// realistic sources are the `csv` crate's own formatting errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
