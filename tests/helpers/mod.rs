//! Shared builders for integration tests.

use patchplan::model::{Demand, EndpointType, ProjectDoc, ProjectInfo, Rack, Settings};

pub fn rack(id: &str) -> Rack {
    Rack {
        id: id.to_string(),
        name: format!("Rack {id}"),
        height_u: 42,
    }
}

pub fn demand(id: &str, src: &str, dst: &str, endpoint_type: EndpointType, count: u32) -> Demand {
    Demand {
        id: id.to_string(),
        src: src.to_string(),
        dst: dst.to_string(),
        endpoint_type,
        count,
    }
}

pub fn project(racks: Vec<Rack>, demands: Vec<Demand>) -> ProjectDoc {
    ProjectDoc {
        version: 1,
        project: ProjectInfo {
            name: "test-project".to_string(),
            note: None,
        },
        racks,
        demands,
        settings: Settings::default(),
    }
}
