//! Input document model.
//!
//! All boundary structs carry `#[serde(deny_unknown_fields)]`; an unknown
//! key anywhere in the document is a parse error, not a silent drop. Enum
//! spellings are part of the external contract and must not change:
//!
//! - endpoint types: `mmf_lc_duplex`, `smf_lc_duplex`, `mpo12`, `utp_rj45`
//! - fill direction: `top_down`, `bottom_up`
//! - peer sort: `natural_trailing_digits`, `lexicographic`
//! - categories: `mpo_e2e`, `lc_mmf`, `lc_smf`, `utp`

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AllocError;

// ============================================================================
// Project document
// ============================================================================

/// A validated project description: racks plus point-to-point connection
/// demands between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectDoc {
    pub version: u32,
    pub project: ProjectInfo,
    pub racks: Vec<Rack>,
    pub demands: Vec<Demand>,
    #[serde(default)]
    pub settings: Settings,
}

impl ProjectDoc {
    /// Parse a project document from JSON, rejecting unknown fields and
    /// out-of-domain enum values at the serde layer.
    pub fn from_json_str(text: &str) -> Result<Self, AllocError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Look up a rack by id.
    pub fn rack(&self, id: &str) -> Option<&Rack> {
        self.racks.iter().find(|r| r.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectInfo {
    pub name: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// A rack. `height_u` bounds how many 1U panels the slot allocator may
/// place before reporting overflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rack {
    pub id: String,
    pub name: String,
    #[serde(default = "default_height_u")]
    pub height_u: u32,
}

fn default_height_u() -> u32 {
    42
}

/// One point-to-point connection demand between two distinct racks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Demand {
    pub id: String,
    pub src: String,
    pub dst: String,
    pub endpoint_type: EndpointType,
    pub count: u32,
}

// ============================================================================
// Closed enums
// ============================================================================

/// Endpoint/media type of a demand. Closed set: category dispatch is a
/// match on this enum combined with the priority list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointType {
    MmfLcDuplex,
    SmfLcDuplex,
    Mpo12,
    UtpRj45,
}

impl EndpointType {
    /// The placement category that serves this endpoint type.
    pub fn category(self) -> Category {
        match self {
            EndpointType::MmfLcDuplex => Category::LcMmf,
            EndpointType::SmfLcDuplex => Category::LcSmf,
            EndpointType::Mpo12 => Category::MpoE2e,
            EndpointType::UtpRj45 => Category::Utp,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EndpointType::MmfLcDuplex => "mmf_lc_duplex",
            EndpointType::SmfLcDuplex => "smf_lc_duplex",
            EndpointType::Mpo12 => "mpo12",
            EndpointType::UtpRj45 => "utp_rj45",
        }
    }
}

impl fmt::Display for EndpointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Placement category. Engines execute in `slot_category_priority` order;
/// categories absent from that list are skipped (their demands warn).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    MpoE2e,
    LcMmf,
    LcSmf,
    Utp,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::MpoE2e => "mpo_e2e",
            Category::LcMmf => "lc_mmf",
            Category::LcSmf => "lc_smf",
            Category::Utp => "utp",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Panel fill direction for the per-rack slot allocator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillDirection {
    #[default]
    TopDown,
    BottomUp,
}

/// Rack-id ordering strategy. Controls pair-key orientation, pair
/// processing order, and every rack-keyed output sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerSort {
    #[default]
    NaturalTrailingDigits,
    Lexicographic,
}

/// Optical fiber class of an LC breakout module or its trunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FiberKind {
    Mmf,
    Smf,
}

impl FiberKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FiberKind::Mmf => "mmf",
            FiberKind::Smf => "smf",
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Project settings. Every field has a default, so `settings` may be
/// omitted entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Settings {
    pub panel: PanelSettings,
    pub ordering: OrderingSettings,
    pub fixed_profiles: FixedProfiles,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PanelSettings {
    pub slots_per_u: u32,
    pub allocation_direction: FillDirection,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            slots_per_u: 4,
            allocation_direction: FillDirection::TopDown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct OrderingSettings {
    pub peer_sort: PeerSort,
    pub slot_category_priority: Vec<Category>,
}

impl Default for OrderingSettings {
    fn default() -> Self {
        Self {
            peer_sort: PeerSort::NaturalTrailingDigits,
            slot_category_priority: vec![
                Category::MpoE2e,
                Category::LcMmf,
                Category::LcSmf,
                Category::Utp,
            ],
        }
    }
}

/// Opaque profile strings stamped onto produced modules and cables. They
/// never affect the port/fiber mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct FixedProfiles {
    pub lc_demands: LcProfile,
    pub mpo_e2e: MpoProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LcProfile {
    pub trunk_polarity: String,
    pub breakout_module_variant: String,
}

impl Default for LcProfile {
    fn default() -> Self {
        Self {
            trunk_polarity: "A".to_string(),
            breakout_module_variant: "AF".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct MpoProfile {
    pub trunk_polarity: String,
    pub pass_through_variant: String,
}

impl Default for MpoProfile {
    fn default() -> Self {
        Self {
            trunk_polarity: "B".to_string(),
            pass_through_variant: "A".to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
