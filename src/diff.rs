//! Plan revision diffing.
//!
//! Two independent axes:
//!
//! - **Logical**: keyed on `session_id`. Because IDs are content-hashes
//!   of the canonical session string, identity survives exactly as long
//!   as the logical connection does.
//! - **Physical**: keyed on the full termination tuple. A tuple present
//!   in both revisions under different session IDs is a *collision*: the
//!   physical location is stable but its logical identity changed, a
//!   semantic drift worth surfacing.
//!
//! All report vectors are sorted, so a diff is itself deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::EndpointType;
use crate::plan::{Face, PlanDoc, Session};

// ============================================================================
// Logical diff
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalDiff {
    /// Session IDs present only in `new`.
    pub added: Vec<String>,
    /// Session IDs present only in `old`.
    pub removed: Vec<String>,
    /// Shared IDs whose payload differs.
    pub modified: Vec<String>,
}

impl LogicalDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

/// Compare two plans by logical session identity.
pub fn logical_diff(old: &PlanDoc, new: &PlanDoc) -> LogicalDiff {
    let old_by_id: BTreeMap<&str, &Session> = old
        .sessions
        .iter()
        .map(|s| (s.session_id.as_str(), s))
        .collect();
    let new_by_id: BTreeMap<&str, &Session> = new
        .sessions
        .iter()
        .map(|s| (s.session_id.as_str(), s))
        .collect();

    let mut diff = LogicalDiff::default();
    for (id, session) in &new_by_id {
        match old_by_id.get(id) {
            None => diff.added.push((*id).to_string()),
            Some(prev) if *prev != *session => diff.modified.push((*id).to_string()),
            Some(_) => {}
        }
    }
    for id in old_by_id.keys() {
        if !new_by_id.contains_key(id) {
            diff.removed.push((*id).to_string());
        }
    }
    diff
}

// ============================================================================
// Physical diff
// ============================================================================

/// The physical termination tuple of a session. Two sessions with equal
/// tuples occupy the same pair of ports, whatever their IDs say.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhysicalKey {
    pub media: EndpointType,
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
}

impl From<&Session> for PhysicalKey {
    fn from(s: &Session) -> Self {
        Self {
            media: s.media,
            src_rack: s.src_rack.clone(),
            src_face: s.src_face,
            src_u: s.src_u,
            src_slot: s.src_slot,
            src_port: s.src_port,
            dst_rack: s.dst_rack.clone(),
            dst_face: s.dst_face,
            dst_u: s.dst_u,
            dst_slot: s.dst_slot,
            dst_port: s.dst_port,
        }
    }
}

/// A termination tuple whose logical identity changed between revisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalCollision {
    pub tuple: PhysicalKey,
    pub old_session_id: String,
    pub new_session_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalDiff {
    pub added: Vec<PhysicalKey>,
    pub removed: Vec<PhysicalKey>,
    pub collisions: Vec<PhysicalCollision>,
}

impl PhysicalDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.collisions.is_empty()
    }
}

/// Compare two plans by physical termination tuple.
pub fn physical_diff(old: &PlanDoc, new: &PlanDoc) -> PhysicalDiff {
    let old_by_tuple: BTreeMap<PhysicalKey, &str> = old
        .sessions
        .iter()
        .map(|s| (PhysicalKey::from(s), s.session_id.as_str()))
        .collect();
    let new_by_tuple: BTreeMap<PhysicalKey, &str> = new
        .sessions
        .iter()
        .map(|s| (PhysicalKey::from(s), s.session_id.as_str()))
        .collect();

    let mut diff = PhysicalDiff::default();
    for (tuple, new_id) in &new_by_tuple {
        match old_by_tuple.get(tuple) {
            None => diff.added.push(tuple.clone()),
            Some(old_id) if old_id != new_id => diff.collisions.push(PhysicalCollision {
                tuple: tuple.clone(),
                old_session_id: (*old_id).to_string(),
                new_session_id: (*new_id).to_string(),
            }),
            Some(_) => {}
        }
    }
    for tuple in old_by_tuple.keys() {
        if !new_by_tuple.contains_key(tuple) {
            diff.removed.push(tuple.clone());
        }
    }
    diff
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProjectDoc, ProjectInfo, Settings};
    use crate::plan::{Metrics, ModuleKind};

    fn session(id: &str, src_port: u32, dst_port: u32) -> Session {
        Session {
            session_id: id.to_string(),
            media: EndpointType::Mpo12,
            cable_id: "cab_0".into(),
            adapter_type: ModuleKind::Mpo12PassThrough,
            label_a: format!("R01U1S1P{src_port}"),
            label_b: format!("R02U1S1P{dst_port}"),
            src_rack: "R01".into(),
            src_face: Face::Front,
            src_u: 1,
            src_slot: 1,
            src_port,
            dst_rack: "R02".into(),
            dst_face: Face::Front,
            dst_u: 1,
            dst_slot: 1,
            dst_port,
            fiber_a: None,
            fiber_b: None,
            notes: String::new(),
        }
    }

    fn plan(sessions: Vec<Session>) -> PlanDoc {
        PlanDoc {
            project: ProjectDoc {
                version: 1,
                project: ProjectInfo {
                    name: "t".into(),
                    note: None,
                },
                racks: vec![],
                demands: vec![],
                settings: Settings::default(),
            },
            input_hash: "0".repeat(64),
            panels: vec![],
            modules: vec![],
            cables: vec![],
            sessions,
            warnings: vec![],
            errors: vec![],
            metrics: Metrics::default(),
            pair_details: vec![],
        }
    }

    #[test]
    fn diff_of_identical_plans_is_empty() {
        let p = plan(vec![session("ses_a", 1, 1), session("ses_b", 2, 2)]);
        assert!(logical_diff(&p, &p).is_empty());
        assert!(physical_diff(&p, &p).is_empty());
    }

    #[test]
    fn swapping_arguments_swaps_added_and_removed() {
        let old = plan(vec![session("ses_a", 1, 1)]);
        let new = plan(vec![session("ses_b", 2, 2)]);
        let fwd = logical_diff(&old, &new);
        let rev = logical_diff(&new, &old);
        assert_eq!(fwd.added, rev.removed);
        assert_eq!(fwd.removed, rev.added);

        let fwd = physical_diff(&old, &new);
        let rev = physical_diff(&new, &old);
        assert_eq!(fwd.added, rev.removed);
        assert_eq!(fwd.removed, rev.added);
    }

    #[test]
    fn payload_change_under_same_id_is_modified() {
        let old = plan(vec![session("ses_a", 1, 1)]);
        let mut changed = session("ses_a", 1, 1);
        changed.notes = "re-pulled".into();
        let new = plan(vec![changed]);
        let diff = logical_diff(&old, &new);
        assert_eq!(diff.modified, vec!["ses_a".to_string()]);
        assert!(diff.added.is_empty() && diff.removed.is_empty());
    }

    #[test]
    fn same_tuple_different_id_is_a_collision() {
        let old = plan(vec![session("ses_a", 1, 1)]);
        let new = plan(vec![session("ses_z", 1, 1)]);
        let diff = physical_diff(&old, &new);
        assert!(diff.added.is_empty() && diff.removed.is_empty());
        assert_eq!(diff.collisions.len(), 1);
        assert_eq!(diff.collisions[0].old_session_id, "ses_a");
        assert_eq!(diff.collisions[0].new_session_id, "ses_z");
    }

    #[test]
    fn report_vectors_are_sorted() {
        let old = plan(vec![]);
        let new = plan(vec![session("ses_b", 2, 2), session("ses_a", 1, 1)]);
        let diff = logical_diff(&old, &new);
        assert_eq!(diff.added, vec!["ses_a".to_string(), "ses_b".to_string()]);
    }
}
