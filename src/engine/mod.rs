//! Allocation pipeline.
//!
//! `allocate()` is the single operation this crate exposes: a pure,
//! single-threaded function from validated input to result document.
//!
//! ```text
//! ProjectDoc
//!   → validate (reject before any placement work)
//!   → input_hash (canonical JSON → SHA-256)
//!   → normalize (peer-sorted pair buckets)
//!   → category engines, in slot_category_priority order
//!   → freeze (sort outputs, assign cable_seq, metrics, pair details)
//! ```
//!
//! Every iteration that can reach an output goes through a sorted
//! container or an explicit peer-sort comparator, so no implementation-
//! defined ordering leaks into the result.

mod lc;
mod mpo;
mod utp;

use std::collections::BTreeMap;

use crate::canonical;
use crate::error::AllocError;
use crate::model::{Category, EndpointType, FiberKind, PeerSort, ProjectDoc};
use crate::normalize::{self, peer_key};
use crate::plan::{
    Cable, CableType, Face, Metrics, Module, ModuleKind, PairDetail, Panel, PlanDoc, PlanError,
    PlanWarning, PortRef, Session,
};
use crate::rack::RackSlots;
use crate::validate;

/// Produce a complete wiring plan for a validated project description.
///
/// Validation failures return `Err` before any allocation work; rack
/// overflow and side-count mismatches are recorded into the plan's
/// `errors`/`warnings` while allocation continues, so one pass reports
/// every site.
pub fn allocate(project: &ProjectDoc) -> Result<PlanDoc, AllocError> {
    validate::validate(project)?;
    let input_hash = canonical::input_hash(project)?;
    tracing::debug!(project = %project.project.name, "starting allocation");

    let buckets = normalize::normalize(project);
    let mut builder = PlanBuilder::new(project);

    let priority = &project.settings.ordering.slot_category_priority;
    for category in priority {
        tracing::debug!(category = %category, "running placement engine");
        match category {
            Category::MpoE2e => mpo::place(&mut builder, &buckets),
            Category::LcMmf => lc::place(&mut builder, &buckets, FiberKind::Mmf),
            Category::LcSmf => lc::place(&mut builder, &buckets, FiberKind::Smf),
            Category::Utp => utp::place(&mut builder, &buckets),
        }
    }

    let mut skipped: BTreeMap<Category, u32> = BTreeMap::new();
    for bucket in &buckets {
        let category = bucket.media.category();
        if !priority.contains(&category) {
            *skipped.entry(category).or_default() += bucket.count;
        }
    }
    for (category, demand_count) in skipped {
        builder.push_warning(PlanWarning::CategorySkipped {
            category,
            demand_count,
        });
    }

    Ok(builder.freeze(input_hash))
}

// ============================================================================
// Plan builder
// ============================================================================

/// Mutable accumulation state shared by the placement engines. Frozen into
/// an immutable `PlanDoc` once every engine has run.
struct PlanBuilder<'a> {
    project: &'a ProjectDoc,
    sort: PeerSort,
    racks: BTreeMap<String, RackSlots>,
    panels: BTreeMap<(String, u32), Panel>,
    modules: Vec<Module>,
    cables: BTreeMap<String, Cable>,
    sessions: Vec<Session>,
    warnings: Vec<PlanWarning>,
    errors: Vec<PlanError>,
    pair_details: Vec<PairDetail>,
}

impl<'a> PlanBuilder<'a> {
    fn new(project: &'a ProjectDoc) -> Self {
        let panel = &project.settings.panel;
        let racks = project
            .racks
            .iter()
            .map(|rack| {
                (
                    rack.id.clone(),
                    RackSlots::new(
                        &rack.id,
                        rack.height_u,
                        panel.slots_per_u,
                        panel.allocation_direction,
                    ),
                )
            })
            .collect();
        Self {
            project,
            sort: project.settings.ordering.peer_sort,
            racks,
            panels: BTreeMap::new(),
            modules: Vec::new(),
            cables: BTreeMap::new(),
            sessions: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
            pair_details: Vec::new(),
        }
    }

    /// Reserve `n` consecutive slots on one rack, recording overflow.
    /// Returns the prefix that fit.
    fn reserve_chunks(&mut self, rack_id: &str, n: u32) -> Vec<(u32, u32)> {
        let Some(rack) = self.racks.get_mut(rack_id) else {
            return Vec::new();
        };
        let (reserved, overflow) = rack.reserve_contiguous(n);
        if let Some(err) = overflow {
            self.push_error(err);
        }
        reserved
    }

    /// Reserve a single slot, recording overflow.
    fn reserve_slot(&mut self, rack_id: &str) -> Option<(u32, u32)> {
        let rack = self.racks.get_mut(rack_id)?;
        match rack.reserve_one() {
            Ok(coord) => Some(coord),
            Err(err) => {
                self.push_error(err);
                None
            }
        }
    }

    fn ensure_panel(&mut self, rack_id: &str, u: u32) {
        let key = (rack_id.to_string(), u);
        if !self.panels.contains_key(&key) {
            let canonical = canonical::panel_canonical(rack_id, u);
            self.panels.insert(
                key,
                Panel {
                    panel_id: canonical::stable_id(canonical::PANEL_PREFIX, &canonical),
                    rack_id: rack_id.to_string(),
                    u,
                    slots_per_u: self.project.settings.panel.slots_per_u,
                },
            );
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn add_module(
        &mut self,
        rack_id: &str,
        u: u32,
        slot: u32,
        kind: ModuleKind,
        fiber_kind: Option<FiberKind>,
        polarity_variant: Option<String>,
        peer_rack_id: Option<String>,
        dedicated: bool,
    ) {
        let canonical = canonical::module_canonical(rack_id, u, slot, kind);
        self.modules.push(Module {
            module_id: canonical::stable_id(canonical::MODULE_PREFIX, &canonical),
            rack_id: rack_id.to_string(),
            u,
            slot,
            kind,
            fiber_kind,
            polarity_variant,
            peer_rack_id,
            dedicated,
        });
    }

    /// Register a cable, returning its id. Re-registering the same
    /// canonical content is a no-op; LC sessions share their chunk's two
    /// trunk cables.
    #[allow(clippy::too_many_arguments)]
    fn add_cable(
        &mut self,
        end_a: &PortRef,
        end_b: &PortRef,
        media: EndpointType,
        cable_type: CableType,
        fiber_kind: Option<FiberKind>,
        polarity: Option<&str>,
        chunk_index: u32,
        trunk_index: u32,
    ) -> String {
        let canonical =
            canonical::cable_canonical(end_a, end_b, media, polarity, chunk_index, trunk_index);
        let cable_id = canonical::stable_id(canonical::CABLE_PREFIX, &canonical);
        self.cables.entry(cable_id.clone()).or_insert_with(|| Cable {
            cable_id: cable_id.clone(),
            cable_seq: 0,
            cable_type,
            media,
            fiber_kind,
            polarity_type: polarity.map(str::to_string),
        });
        cable_id
    }

    fn add_session(
        &mut self,
        media: EndpointType,
        cable_id: String,
        adapter_type: ModuleKind,
        src: &PortRef,
        dst: &PortRef,
        fibers: Option<(u32, u32)>,
    ) {
        let canonical = canonical::session_canonical(media, src, dst);
        self.sessions.push(Session {
            session_id: canonical::stable_id(canonical::SESSION_PREFIX, &canonical),
            media,
            cable_id,
            adapter_type,
            label_a: src.label(),
            label_b: dst.label(),
            src_rack: src.rack.clone(),
            src_face: Face::Front,
            src_u: src.u,
            src_slot: src.slot,
            src_port: src.port,
            dst_rack: dst.rack.clone(),
            dst_face: Face::Front,
            dst_u: dst.u,
            dst_slot: dst.slot,
            dst_port: dst.port,
            fiber_a: fibers.map(|f| f.0),
            fiber_b: fibers.map(|f| f.1),
            notes: String::new(),
        });
    }

    fn push_warning(&mut self, warning: PlanWarning) {
        tracing::warn!(%warning, "recorded plan warning");
        self.warnings.push(warning);
    }

    fn push_error(&mut self, error: PlanError) {
        tracing::warn!(%error, "recorded plan error");
        self.errors.push(error);
    }

    fn push_pair_detail(&mut self, detail: PairDetail) {
        self.pair_details.push(detail);
    }

    /// Sort every output, assign cable sequence numbers, and freeze.
    fn freeze(self, input_hash: String) -> PlanDoc {
        let sort = self.sort;

        let mut panels: Vec<Panel> = self.panels.into_values().collect();
        panels.sort_by_key(|p| (peer_key(sort, &p.rack_id), p.u));

        let mut modules = self.modules;
        modules.sort_by_key(|m| (peer_key(sort, &m.rack_id), m.u, m.slot));

        // BTreeMap iteration is already cable_id order.
        let mut cables: Vec<Cable> = self.cables.into_values().collect();
        for (i, cable) in cables.iter_mut().enumerate() {
            cable.cable_seq = i as u32 + 1;
        }

        let mut sessions = self.sessions;
        sessions.sort_by(|a, b| a.session_id.cmp(&b.session_id));

        let mut pair_details = self.pair_details;
        pair_details.sort_by_key(|d| {
            (
                peer_key(sort, &d.rack_a),
                peer_key(sort, &d.rack_b),
                d.media,
            )
        });

        let metrics = Metrics {
            rack_count: self.project.racks.len(),
            panel_count: panels.len(),
            module_count: modules.len(),
            cable_count: cables.len(),
            session_count: sessions.len(),
        };

        PlanDoc {
            project: self.project.clone(),
            input_hash,
            panels,
            modules,
            cables,
            sessions,
            warnings: self.warnings,
            errors: self.errors,
            metrics,
            pair_details,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
