//! Downstream artifact emitters.
//!
//! Pure string builders over a frozen `PlanDoc`. No filesystem or
//! transport concerns. Column orders and the label format are part of the
//! external contract.

use std::collections::BTreeMap;

use crate::error::{AllocError, ExportError};
use crate::plan::{Module, PlanDoc};

/// Column order of `sessions.csv`.
const SESSION_COLUMNS: [&str; 22] = [
    "project_id",
    "revision_id",
    "session_id",
    "media",
    "cable_id",
    "cable_seq",
    "adapter_type",
    "label_a",
    "label_b",
    "src_rack",
    "src_face",
    "src_u",
    "src_slot",
    "src_port",
    "dst_rack",
    "dst_face",
    "dst_u",
    "dst_slot",
    "dst_port",
    "fiber_a",
    "fiber_b",
    "notes",
];

/// Render `sessions.csv`: one header row plus one row per session.
pub fn sessions_csv(
    plan: &PlanDoc,
    project_id: &str,
    revision_id: Option<&str>,
) -> Result<String, AllocError> {
    let seq_by_cable: BTreeMap<&str, u32> = plan
        .cables
        .iter()
        .map(|c| (c.cable_id.as_str(), c.cable_seq))
        .collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(SESSION_COLUMNS).map_err(ExportError::from)?;
    for s in &plan.sessions {
        let cable_seq = seq_by_cable
            .get(s.cable_id.as_str())
            .map(|seq| seq.to_string())
            .unwrap_or_default();
        let record: [String; 22] = [
            project_id.to_string(),
            revision_id.unwrap_or("").to_string(),
            s.session_id.clone(),
            s.media.as_str().to_string(),
            s.cable_id.clone(),
            cable_seq,
            s.adapter_type.as_str().to_string(),
            s.label_a.clone(),
            s.label_b.clone(),
            s.src_rack.clone(),
            s.src_face.as_str().to_string(),
            s.src_u.to_string(),
            s.src_slot.to_string(),
            s.src_port.to_string(),
            s.dst_rack.clone(),
            s.dst_face.as_str().to_string(),
            s.dst_u.to_string(),
            s.dst_slot.to_string(),
            s.dst_port.to_string(),
            s.fiber_a.map(|f| f.to_string()).unwrap_or_default(),
            s.fiber_b.map(|f| f.to_string()).unwrap_or_default(),
            s.notes.clone(),
        ];
        writer.write_record(&record).map_err(ExportError::from)?;
    }
    finish(writer)
}

/// Render `bom.csv`: panels, modules, and cables aggregated by
/// description.
pub fn bom_csv(plan: &PlanDoc) -> Result<String, AllocError> {
    // rank keeps the item classes in panel → module → cable order while
    // descriptions sort within each class.
    let mut quantities: BTreeMap<(u8, String), u64> = BTreeMap::new();

    for panel in &plan.panels {
        let desc = format!("1U panel, {} slots", panel.slots_per_u);
        *quantities.entry((0, desc)).or_default() += 1;
    }
    for module in &plan.modules {
        *quantities.entry((1, module_description(module))).or_default() += 1;
    }
    for cable in &plan.cables {
        let mut parts = Vec::new();
        if let Some(fiber) = cable.fiber_kind {
            parts.push(fiber.as_str().to_string());
        }
        if let Some(polarity) = &cable.polarity_type {
            parts.push(format!("polarity {polarity}"));
        }
        let desc = if parts.is_empty() {
            cable.cable_type.as_str().to_string()
        } else {
            format!("{} ({})", cable.cable_type.as_str(), parts.join(", "))
        };
        *quantities.entry((2, desc)).or_default() += 1;
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["item_type", "description", "quantity"])
        .map_err(ExportError::from)?;
    for ((rank, description), quantity) in &quantities {
        let item_type = match rank {
            0 => "panel",
            1 => "module",
            _ => "cable",
        };
        writer
            .write_record([item_type, description, &quantity.to_string()])
            .map_err(ExportError::from)?;
    }
    finish(writer)
}

fn module_description(module: &Module) -> String {
    let mut parts = Vec::new();
    if let Some(fiber) = module.fiber_kind {
        parts.push(fiber.as_str().to_string());
    }
    if let Some(variant) = &module.polarity_variant {
        parts.push(format!("variant {variant}"));
    }
    if parts.is_empty() {
        module.kind.as_str().to_string()
    } else {
        format!("{} ({})", module.kind.as_str(), parts.join(", "))
    }
}

/// Render `result.json`: the plan document verbatim, pretty-printed with
/// sorted keys so revisions diff cleanly in text tools.
pub fn result_json(plan: &PlanDoc) -> Result<String, AllocError> {
    let value = serde_json::to_value(plan)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, AllocError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::from(csv::Error::from(e.into_error())))?;
    Ok(String::from_utf8(bytes).map_err(ExportError::from)?)
}
