//! Semantic input validation.
//!
//! Structural rejection (unknown fields, out-of-domain enum values, wrong
//! scalar types) already happened at the serde boundary. This pass checks
//! the rules serde cannot express: uniqueness, cross-references, and value
//! ranges. It is fail-fast: the first violation aborts allocation with an
//! error naming the offending document path.

use std::collections::BTreeSet;

use crate::error::ValidationError;
use crate::model::ProjectDoc;

/// Validate a parsed project document.
pub fn validate(project: &ProjectDoc) -> Result<(), ValidationError> {
    if project.version != 1 {
        return Err(ValidationError::UnsupportedVersion {
            path: "version".to_string(),
            found: project.version,
        });
    }

    if project.racks.is_empty() {
        return Err(ValidationError::NoRacks {
            path: "racks".to_string(),
        });
    }

    let mut rack_ids = BTreeSet::new();
    for (i, rack) in project.racks.iter().enumerate() {
        if !rack_ids.insert(rack.id.as_str()) {
            return Err(ValidationError::DuplicateRackId {
                path: format!("racks[{i}].id"),
                id: rack.id.clone(),
            });
        }
        if rack.height_u == 0 {
            return Err(ValidationError::InvalidRackHeight {
                path: format!("racks[{i}].height_u"),
                rack_id: rack.id.clone(),
            });
        }
    }

    let mut demand_ids = BTreeSet::new();
    for (i, demand) in project.demands.iter().enumerate() {
        if !demand_ids.insert(demand.id.as_str()) {
            return Err(ValidationError::DuplicateDemandId {
                path: format!("demands[{i}].id"),
                id: demand.id.clone(),
            });
        }
        if demand.src == demand.dst {
            return Err(ValidationError::SelfLoopDemand {
                path: format!("demands[{i}]"),
                demand_id: demand.id.clone(),
            });
        }
        for (field, rack) in [("src", &demand.src), ("dst", &demand.dst)] {
            if !rack_ids.contains(rack.as_str()) {
                return Err(ValidationError::UnknownRack {
                    path: format!("demands[{i}].{field}"),
                    rack: rack.clone(),
                });
            }
        }
        if demand.count == 0 {
            return Err(ValidationError::NonPositiveCount {
                path: format!("demands[{i}].count"),
                demand_id: demand.id.clone(),
            });
        }
    }

    if project.settings.panel.slots_per_u == 0 {
        return Err(ValidationError::InvalidSlotsPerU {
            path: "settings.panel.slots_per_u".to_string(),
        });
    }

    let mut seen = BTreeSet::new();
    for category in &project.settings.ordering.slot_category_priority {
        if !seen.insert(*category) {
            return Err(ValidationError::RepeatedCategory {
                path: "settings.ordering.slot_category_priority".to_string(),
                category: category.to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Demand, EndpointType, ProjectInfo, Rack, Settings};

    fn project(racks: &[&str], demands: Vec<Demand>) -> ProjectDoc {
        ProjectDoc {
            version: 1,
            project: ProjectInfo {
                name: "test".into(),
                note: None,
            },
            racks: racks
                .iter()
                .map(|id| Rack {
                    id: (*id).into(),
                    name: format!("Rack {id}"),
                    height_u: 42,
                })
                .collect(),
            demands,
            settings: Settings::default(),
        }
    }

    fn demand(id: &str, src: &str, dst: &str, count: u32) -> Demand {
        Demand {
            id: id.into(),
            src: src.into(),
            dst: dst.into(),
            endpoint_type: EndpointType::Mpo12,
            count,
        }
    }

    #[test]
    fn accepts_well_formed_project() {
        let p = project(&["R01", "R02"], vec![demand("D001", "R01", "R02", 4)]);
        assert!(validate(&p).is_ok());
    }

    #[test]
    fn rejects_wrong_version() {
        let mut p = project(&["R01"], vec![]);
        p.version = 2;
        assert!(matches!(
            validate(&p),
            Err(ValidationError::UnsupportedVersion { found: 2, .. })
        ));
    }

    #[test]
    fn rejects_empty_rack_list() {
        let p = project(&[], vec![]);
        assert!(matches!(validate(&p), Err(ValidationError::NoRacks { .. })));
    }

    #[test]
    fn rejects_duplicate_rack_ids() {
        let p = project(&["R01", "R01"], vec![]);
        let err = validate(&p).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateRackId { ref id, .. } if id == "R01"));
        assert!(err.to_string().contains("racks[1].id"));
    }

    #[test]
    fn rejects_self_loop_demand() {
        let p = project(&["R01", "R02"], vec![demand("D001", "R01", "R01", 1)]);
        assert!(matches!(
            validate(&p),
            Err(ValidationError::SelfLoopDemand { .. })
        ));
    }

    #[test]
    fn rejects_dangling_rack_reference() {
        let p = project(&["R01", "R02"], vec![demand("D001", "R01", "R09", 1)]);
        let err = validate(&p).unwrap_err();
        assert!(err.to_string().contains("demands[0].dst"));
    }

    #[test]
    fn rejects_zero_count() {
        let p = project(&["R01", "R02"], vec![demand("D001", "R01", "R02", 0)]);
        assert!(matches!(
            validate(&p),
            Err(ValidationError::NonPositiveCount { .. })
        ));
    }

    #[test]
    fn rejects_zero_slots_per_u() {
        let mut p = project(&["R01"], vec![]);
        p.settings.panel.slots_per_u = 0;
        assert!(matches!(
            validate(&p),
            Err(ValidationError::InvalidSlotsPerU { .. })
        ));
    }

    #[test]
    fn rejects_repeated_priority_category() {
        let mut p = project(&["R01"], vec![]);
        p.settings.ordering.slot_category_priority = vec![Category::Utp, Category::Utp];
        assert!(matches!(
            validate(&p),
            Err(ValidationError::RepeatedCategory { .. })
        ));
    }
}
