//! Demand normalization: peer ordering and pair buckets.
//!
//! Demands fold into unordered rack-pair buckets keyed by endpoint type.
//! The pair key is the two rack ids sorted under the configured peer-sort
//! strategy; sessions later run from the first to the second element of
//! that key, which is what makes orientation a pure function of the
//! strategy. A `reversed` flag records whether the first demand folded
//! into a bucket declared the opposite direction.
//!
//! Natural ordering extracts the longest trailing run of decimal digits
//! and compares its numeric value before the full string, so `R2` precedes
//! `R10` and both precede `Rack`. Comparison is digit-string based (length
//! first), never parsed into a machine integer, so arbitrarily long runs
//! cannot overflow. No platform collation is involved.

use std::collections::BTreeMap;

use crate::model::{EndpointType, PeerSort, ProjectDoc};

// ============================================================================
// Peer sort
// ============================================================================

/// Sortable key for a rack id under a peer-sort strategy. Build once,
/// compare many; every rack-keyed output sort goes through this type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PeerKey {
    rank: u8,
    digits_len: usize,
    digits: String,
    prefix: String,
    full: String,
}

/// Compute the sort key for `value` under `sort`.
pub fn peer_key(sort: PeerSort, value: &str) -> PeerKey {
    match sort {
        PeerSort::Lexicographic => PeerKey {
            rank: 0,
            digits_len: 0,
            digits: String::new(),
            prefix: String::new(),
            full: value.to_string(),
        },
        PeerSort::NaturalTrailingDigits => {
            let tail_start = value
                .rfind(|c: char| !c.is_ascii_digit())
                .map(|i| i + value[i..].chars().next().map_or(1, char::len_utf8))
                .unwrap_or(0);
            let run = &value[tail_start..];
            if run.is_empty() {
                // No trailing digits: sorts after every numbered id.
                PeerKey {
                    rank: 1,
                    digits_len: 0,
                    digits: String::new(),
                    prefix: String::new(),
                    full: value.to_string(),
                }
            } else {
                let stripped = run.trim_start_matches('0');
                let digits = if stripped.is_empty() { "0" } else { stripped };
                PeerKey {
                    rank: 0,
                    digits_len: digits.len(),
                    digits: digits.to_string(),
                    prefix: value[..tail_start].to_string(),
                    full: value.to_string(),
                }
            }
        }
    }
}

/// Order two rack ids into a canonical pair. Returns `(a, b, reversed)`
/// where `reversed` is true when `src` landed second.
pub fn ordered_pair(sort: PeerSort, src: &str, dst: &str) -> (String, String, bool) {
    if peer_key(sort, src) <= peer_key(sort, dst) {
        (src.to_string(), dst.to_string(), false)
    } else {
        (dst.to_string(), src.to_string(), true)
    }
}

// ============================================================================
// Pair buckets
// ============================================================================

/// Accumulated demand between one rack pair for one endpoint type.
#[derive(Debug, Clone, PartialEq)]
pub struct PairBucket {
    pub rack_a: String,
    pub rack_b: String,
    pub media: EndpointType,
    pub count: u32,
    /// True when the first demand folded into this bucket ran b→a.
    pub reversed: bool,
}

/// Fold all demands into pair buckets, sorted by (pair, media) under the
/// project's peer-sort strategy.
pub fn normalize(project: &ProjectDoc) -> Vec<PairBucket> {
    let sort = project.settings.ordering.peer_sort;
    let mut acc: BTreeMap<(PeerKey, PeerKey, EndpointType), PairBucket> = BTreeMap::new();
    for demand in &project.demands {
        let (a, b, reversed) = ordered_pair(sort, &demand.src, &demand.dst);
        let key = (peer_key(sort, &a), peer_key(sort, &b), demand.endpoint_type);
        acc.entry(key)
            .and_modify(|bucket| bucket.count += demand.count)
            .or_insert_with(|| PairBucket {
                rack_a: a,
                rack_b: b,
                media: demand.endpoint_type,
                count: demand.count,
                reversed,
            });
    }
    acc.into_values().collect()
}

/// Per-rack peer lists for one media, each sorted by the peer strategy.
/// Returned rack-major: `(rack, [(peer, port_count)])`, racks themselves
/// in peer-sort order. Used by the UTP engine, which allocates by rack
/// first and peer second.
pub fn peers_by_rack(
    buckets: &[PairBucket],
    media: EndpointType,
    sort: PeerSort,
) -> Vec<(String, Vec<(String, u32)>)> {
    let mut per_rack: BTreeMap<PeerKey, (String, BTreeMap<PeerKey, (String, u32)>)> =
        BTreeMap::new();
    for bucket in buckets.iter().filter(|b| b.media == media) {
        for (rack, peer) in [
            (&bucket.rack_a, &bucket.rack_b),
            (&bucket.rack_b, &bucket.rack_a),
        ] {
            let entry = per_rack
                .entry(peer_key(sort, rack))
                .or_insert_with(|| (rack.clone(), BTreeMap::new()));
            let peer_entry = entry
                .1
                .entry(peer_key(sort, peer))
                .or_insert_with(|| (peer.clone(), 0));
            peer_entry.1 += bucket.count;
        }
    }
    per_rack
        .into_values()
        .map(|(rack, peers)| (rack, peers.into_values().collect()))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
