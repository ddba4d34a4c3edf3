//! Canonical forms and content-addressed identifiers.
//!
//! Every output identifier is a pure function of canonical content:
//! SHA-256 over a canonical string, truncated to the first 16 hex
//! characters and prefixed by entity type. Re-running on the same input
//! reproduces every ID.
//!
//! ```text
//! "panel|R01|U1"  → SHA-256 → first 16 hex → "pan_<16 hex>"
//! ```
//!
//! The canonical string is the only thing that feeds the hash: no struct
//! layout, no serializer quirks. Cable canonicals sort their two endpoint
//! renderings lexically so the ID is orientation-independent.
//!
//! `input_hash` covers the whole validated input via canonical JSON:
//! sorted keys, no incidental whitespace, UTF-8, newline-terminated.

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::AllocError;
use crate::model::{EndpointType, ProjectDoc};
use crate::plan::{ModuleKind, PortRef};

/// Hex characters kept from the SHA-256 digest for entity IDs.
const ID_HEX_LEN: usize = 16;

pub const PANEL_PREFIX: &str = "pan_";
pub const MODULE_PREFIX: &str = "mod_";
pub const CABLE_PREFIX: &str = "cab_";
pub const SESSION_PREFIX: &str = "ses_";

/// Derive a typed, content-addressed identifier from a canonical string.
pub fn stable_id(prefix: &str, canonical: &str) -> String {
    let digest = Sha256::digest(canonical.as_bytes());
    format!("{}{}", prefix, &hex::encode(digest)[..ID_HEX_LEN])
}

// ============================================================================
// Canonical strings
// ============================================================================

pub fn panel_canonical(rack_id: &str, u: u32) -> String {
    format!("panel|{rack_id}|U{u}")
}

pub fn module_canonical(rack_id: &str, u: u32, slot: u32, kind: ModuleKind) -> String {
    format!("module|{rack_id}|U{u}|S{slot}|{}", kind.as_str())
}

fn endpoint(port: &PortRef) -> String {
    format!("{}:U{}:S{}:P{}", port.rack, port.u, port.slot, port.port)
}

/// Cable canonical. The two endpoints are rendered and sorted lexically,
/// so swapping them never changes the ID.
pub fn cable_canonical(
    end_a: &PortRef,
    end_b: &PortRef,
    media: EndpointType,
    polarity: Option<&str>,
    chunk_index: u32,
    trunk_index: u32,
) -> String {
    let mut ends = [endpoint(end_a), endpoint(end_b)];
    ends.sort();
    format!(
        "cable|{}|{}|{}|{}|{}|{}",
        ends[0],
        ends[1],
        media.as_str(),
        polarity.unwrap_or(""),
        chunk_index,
        trunk_index,
    )
}

/// Session canonical. `src` and `dst` follow the canonical pair
/// orientation, so the ID is direction-sensitive on purpose.
pub fn session_canonical(media: EndpointType, src: &PortRef, dst: &PortRef) -> String {
    format!(
        "session|{}|{}|{}|{}|{}|{}|{}|{}|{}",
        media.as_str(),
        src.rack,
        src.u,
        src.slot,
        src.port,
        dst.rack,
        dst.u,
        dst.slot,
        dst.port,
    )
}

// ============================================================================
// Canonical JSON and input hash
// ============================================================================

/// Render a JSON value canonically: object keys sorted, no whitespace.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by_key(|(k, _)| *k);
            out.push('{');
            for (i, (key, val)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // serde_json handles string escaping for the key.
                out.push_str(&Value::String((*key).clone()).to_string());
                out.push(':');
                write_canonical(val, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Full SHA-256 (hex) of the canonical serialization of the validated
/// input. Key order and whitespace of the source text never reach the
/// hash; only the parsed document does.
pub fn input_hash(project: &ProjectDoc) -> Result<String, AllocError> {
    let value = serde_json::to_value(project)?;
    let mut text = canonical_json(&value);
    text.push('\n');
    Ok(hex::encode(Sha256::digest(text.as_bytes())))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stable_id_is_prefixed_truncated_hex() {
        let id = stable_id(PANEL_PREFIX, "panel|R01|U1");
        assert!(id.starts_with("pan_"));
        assert_eq!(id.len(), 4 + 16);
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn stable_id_is_deterministic() {
        let a = stable_id(SESSION_PREFIX, "session|mpo12|R01|1|1|1|R02|1|1|1");
        let b = stable_id(SESSION_PREFIX, "session|mpo12|R01|1|1|1|R02|1|1|1");
        assert_eq!(a, b);
    }

    #[test]
    fn cable_canonical_is_orientation_independent() {
        let a = PortRef::new("R01", 1, 1, 3);
        let b = PortRef::new("R02", 1, 1, 3);
        let fwd = cable_canonical(&a, &b, EndpointType::Mpo12, Some("B"), 1, 3);
        let rev = cable_canonical(&b, &a, EndpointType::Mpo12, Some("B"), 1, 3);
        assert_eq!(fwd, rev);
    }

    #[test]
    fn session_canonical_is_direction_sensitive() {
        let a = PortRef::new("R01", 1, 1, 3);
        let b = PortRef::new("R02", 1, 1, 3);
        let fwd = session_canonical(EndpointType::Mpo12, &a, &b);
        let rev = session_canonical(EndpointType::Mpo12, &b, &a);
        assert_ne!(fwd, rev);
    }

    #[test]
    fn module_canonical_embeds_kind_spelling() {
        let canon = module_canonical("R01", 1, 2, ModuleKind::LcBreakout);
        assert_eq!(canon, "module|R01|U1|S2|lc_breakout_2xmpo12_to_12xlcduplex");
    }

    #[test]
    fn canonical_json_sorts_keys_and_drops_whitespace() {
        let v = json!({"zebra": 1, "alpha": {"b": [1, 2], "a": null}});
        assert_eq!(
            canonical_json(&v),
            r#"{"alpha":{"a":null,"b":[1,2]},"zebra":1}"#
        );
    }

    #[test]
    fn canonical_json_escapes_strings() {
        let v = json!({"k": "a\"b"});
        assert_eq!(canonical_json(&v), r#"{"k":"a\"b"}"#);
    }

    #[test]
    fn input_hash_ignores_source_key_order_and_whitespace() {
        let a = ProjectDoc::from_json_str(
            r#"{"version":1,"project":{"name":"p"},
                "racks":[{"id":"R01","name":"r"}],"demands":[]}"#,
        )
        .expect("parse a");
        let b = ProjectDoc::from_json_str(
            r#"{
                "racks":   [{"name": "r", "id": "R01"}],
                "demands": [],
                "project": {"name": "p"},
                "version": 1
            }"#,
        )
        .expect("parse b");
        assert_eq!(input_hash(&a).unwrap(), input_hash(&b).unwrap());
    }

    #[test]
    fn input_hash_is_full_sha256_hex() {
        let doc = ProjectDoc::from_json_str(
            r#"{"version":1,"project":{"name":"p"},
                "racks":[{"id":"R01","name":"r"}],"demands":[]}"#,
        )
        .expect("parse");
        let hash = input_hash(&doc).unwrap();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn stable_id_shape_holds_for_any_canonical(canonical in ".*") {
            let id = stable_id(CABLE_PREFIX, &canonical);
            prop_assert!(id.starts_with("cab_"));
            prop_assert_eq!(id.len(), 4 + 16);
            prop_assert_eq!(id.clone(), stable_id(CABLE_PREFIX, &canonical));
        }

        #[test]
        fn cable_canonical_symmetric_under_endpoint_swap(
            (rack_a, rack_b) in ("[A-Z][0-9]{1,3}", "[A-Z][0-9]{1,3}"),
            u in 1u32..42,
            slot in 1u32..4,
            port in 1u32..12,
            chunk in 1u32..8,
        ) {
            let a = PortRef::new(&rack_a, u, slot, port);
            let b = PortRef::new(&rack_b, u, slot, port);
            prop_assert_eq!(
                cable_canonical(&a, &b, EndpointType::UtpRj45, None, chunk, 0),
                cable_canonical(&b, &a, EndpointType::UtpRj45, None, chunk, 0)
            );
        }
    }
}
