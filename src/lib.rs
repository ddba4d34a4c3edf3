//! patchplan: deterministic rack-to-rack patch-cabling allocator.
//!
//! Given a validated project description (racks and point-to-point
//! connection demands between them), [`allocate`] produces a complete
//! physical wiring plan: patch panels, port modules, trunk cables, and the
//! end-to-end port sessions that satisfy each demand. The output is
//! bit-stable: the same input yields byte-identical identifiers and row
//! orderings across runs and machines.
//!
//! ## Pipeline
//!
//! ```text
//! ProjectDoc ─► validate ─► normalize ─► placement engines ─► PlanDoc
//!                  │                      (mpo_e2e, lc_mmf,      │
//!                  └─ reject with path     lc_smf, utp)          ├─ diff
//!                                                                └─ export
//! ```
//!
//! The allocator performs fixed-priority, first-fit reservation. No
//! search, no backtracking, no rebalancing. It is a pure, synchronous,
//! single-threaded function; parallelism belongs to the caller, one
//! allocation per worker.
//!
//! # Example
//!
//! ```
//! use patchplan::{allocate, ProjectDoc};
//!
//! let doc = ProjectDoc::from_json_str(r#"{
//!     "version": 1,
//!     "project": {"name": "dc-east"},
//!     "racks": [
//!         {"id": "R01", "name": "Row A rack 1"},
//!         {"id": "R02", "name": "Row A rack 2"}
//!     ],
//!     "demands": [
//!         {"id": "D001", "src": "R01", "dst": "R02",
//!          "endpoint_type": "mpo12", "count": 4}
//!     ]
//! }"#).unwrap();
//!
//! let plan = allocate(&doc).unwrap();
//! assert_eq!(plan.metrics.session_count, 4);
//! assert!(plan.is_complete());
//! ```

// Canonical forms and content-addressed IDs
pub mod canonical;

// Revision diffing (logical + physical)
pub mod diff;

// The allocation pipeline and placement engines
pub mod engine;

// Error taxonomy
pub mod error;

// CSV / JSON artifact emitters
pub mod export;

// Input document model
pub mod model;

// Demand normalization and peer ordering
pub mod normalize;

// Result-document types
pub mod plan;

// Per-rack slot reservation
pub mod rack;

// Semantic input validation
pub mod validate;

// Re-exports for the common path
pub use diff::{logical_diff, physical_diff, LogicalDiff, PhysicalCollision, PhysicalDiff};
pub use engine::allocate;
pub use error::{AllocError, ValidationError};
pub use export::{bom_csv, result_json, sessions_csv};
pub use model::{
    Category, Demand, EndpointType, FillDirection, PeerSort, ProjectDoc, Rack, Settings,
};
pub use plan::{
    Cable, Metrics, Module, ModuleKind, PairDetail, Panel, PlanDoc, PlanError, PlanWarning, Session,
};
