//! Result-document types.
//!
//! Everything here is created once per allocation, never mutated after the
//! allocator returns, and owned exclusively by the `PlanDoc`. References
//! between entities are by identifier string (sessions → cables, modules →
//! panels via coordinates), resolved at consumption time, so ownership stays
//! a simple tree rooted at the document.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Category, EndpointType, FiberKind, ProjectDoc};

// ============================================================================
// Physical coordinates
// ============================================================================

/// Rack face of a termination. Only front-of-rack cabling is modeled;
/// the field stays part of the physical tuple and the CSV contract.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Face {
    #[default]
    Front,
    Rear,
}

impl Face {
    pub fn as_str(self) -> &'static str {
        match self {
            Face::Front => "front",
            Face::Rear => "rear",
        }
    }
}

/// A single port position: rack, rack unit, slot within the 1U panel,
/// port on the module.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PortRef {
    pub rack: String,
    pub u: u32,
    pub slot: u32,
    pub port: u32,
}

impl PortRef {
    pub fn new(rack: &str, u: u32, slot: u32, port: u32) -> Self {
        Self {
            rack: rack.to_string(),
            u,
            slot,
            port,
        }
    }

    /// Human-facing label, literal format `{rack}U{u}S{slot}P{port}`.
    pub fn label(&self) -> String {
        format!("{}U{}S{}P{}", self.rack, self.u, self.slot, self.port)
    }
}

// ============================================================================
// Derived entities
// ============================================================================

/// Kind of port module occupying a panel slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModuleKind {
    /// Straight-connects twelve MPO ports end-to-end.
    #[serde(rename = "mpo12_pass_through_12port")]
    Mpo12PassThrough,
    /// Fronts two MPO trunks as twelve LC duplex ports.
    #[serde(rename = "lc_breakout_2xmpo12_to_12xlcduplex")]
    LcBreakout,
    /// Six copper ports, shared across peers on the same rack.
    #[serde(rename = "utp_6xrj45")]
    UtpRj45x6,
}

impl ModuleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ModuleKind::Mpo12PassThrough => "mpo12_pass_through_12port",
            ModuleKind::LcBreakout => "lc_breakout_2xmpo12_to_12xlcduplex",
            ModuleKind::UtpRj45x6 => "utp_6xrj45",
        }
    }

    /// Connector positions on the module front.
    pub fn port_count(self) -> u32 {
        match self {
            ModuleKind::Mpo12PassThrough | ModuleKind::LcBreakout => 12,
            ModuleKind::UtpRj45x6 => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CableType {
    Mpo12Trunk,
    UtpCable,
}

impl CableType {
    pub fn as_str(self) -> &'static str {
        match self {
            CableType::Mpo12Trunk => "mpo12_trunk",
            CableType::UtpCable => "utp_cable",
        }
    }
}

/// A 1U panel container with `slots_per_u` module bays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub panel_id: String,
    pub rack_id: String,
    pub u: u32,
    pub slots_per_u: u32,
}

/// A port module placed in a panel slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub module_id: String,
    pub rack_id: String,
    pub u: u32,
    pub slot: u32,
    pub kind: ModuleKind,
    pub fiber_kind: Option<FiberKind>,
    pub polarity_variant: Option<String>,
    /// Set on dedicated (pair-owned) modules; shared UTP modules have none.
    pub peer_rack_id: Option<String>,
    pub dedicated: bool,
}

/// A trunk cable between two modules (or two RJ-45 ports).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cable {
    pub cable_id: String,
    /// Sequential number assigned after sorting by `cable_id`, starting at 1.
    pub cable_seq: u32,
    pub cable_type: CableType,
    pub media: EndpointType,
    pub fiber_kind: Option<FiberKind>,
    pub polarity_type: Option<String>,
}

/// One end-to-end port session satisfying a single unit of demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub media: EndpointType,
    pub cable_id: String,
    pub adapter_type: ModuleKind,
    pub label_a: String,
    pub label_b: String,
    pub src_rack: String,
    pub src_face: Face,
    pub src_u: u32,
    pub src_slot: u32,
    pub src_port: u32,
    pub dst_rack: String,
    pub dst_face: Face,
    pub dst_u: u32,
    pub dst_slot: u32,
    pub dst_port: u32,
    pub fiber_a: Option<u32>,
    pub fiber_b: Option<u32>,
    pub notes: String,
}

// ============================================================================
// Warnings, errors, metrics
// ============================================================================

/// Structured warning recorded into the plan; allocation proceeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanWarning {
    /// The two sides of a UTP pair laid out different port counts; the
    /// shorter side wins.
    #[error("UTP pair {rack_a}↔{rack_b}: side port counts differ ({left_ports} vs {right_ports})")]
    SideCountMismatch {
        rack_a: String,
        rack_b: String,
        left_ports: u32,
        right_ports: u32,
    },

    /// Demands exist for a category absent from `slot_category_priority`;
    /// they produced no output.
    #[error("category {category} skipped with {demand_count} unplaced demand(s)")]
    CategorySkipped {
        category: Category,
        demand_count: u32,
    },
}

/// Structured error recorded into the plan. Non-empty `errors` means the
/// allocation is incomplete and must not be consumed as a usable plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanError {
    #[error("rack {rack_id} overflowed at allocation index {allocation_index}")]
    RackOverflow {
        rack_id: String,
        allocation_index: u32,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub rack_count: usize,
    pub panel_count: usize,
    pub module_count: usize,
    pub cable_count: usize,
    pub session_count: usize,
}

/// Per rack-pair slot usage summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairDetail {
    pub rack_a: String,
    pub rack_b: String,
    pub media: EndpointType,
    pub demand_count: u32,
    /// Chunks actually placed. Zero for UTP, which does not chunk.
    pub chunk_count: u32,
    pub session_count: u32,
    pub cable_count: u32,
    /// True when the first demand for this pair declared the opposite
    /// direction to the canonical pair orientation.
    pub reversed: bool,
}

// ============================================================================
// Plan document
// ============================================================================

/// The allocator's result document. Bit-stable: the same input reproduces
/// every identifier and row ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDoc {
    /// Echo of the validated input.
    pub project: ProjectDoc,
    /// Full SHA-256 (hex) of the canonical input serialization.
    pub input_hash: String,
    pub panels: Vec<Panel>,
    pub modules: Vec<Module>,
    pub cables: Vec<Cable>,
    pub sessions: Vec<Session>,
    pub warnings: Vec<PlanWarning>,
    pub errors: Vec<PlanError>,
    pub metrics: Metrics,
    pub pair_details: Vec<PairDetail>,
}

impl PlanDoc {
    /// A plan with recorded errors is not a usable wiring plan.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// Look up a cable by id.
    pub fn cable(&self, cable_id: &str) -> Option<&Cable> {
        self.cables.iter().find(|c| c.cable_id == cable_id)
    }
}
