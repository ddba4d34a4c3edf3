//! Peer-sort orthogonality: the ordering strategy decides pair
//! orientation, and with it every session identity.

mod helpers;

use helpers::{demand, project, rack};
use patchplan::model::{EndpointType, PeerSort};
use patchplan::{allocate, logical_diff};

#[test]
fn natural_sort_puts_r2_before_r10() {
    let doc = project(
        vec![rack("R2"), rack("R10")],
        vec![demand("D001", "R10", "R2", EndpointType::Mpo12, 3)],
    );
    let plan = allocate(&doc).expect("allocate");
    for s in &plan.sessions {
        assert_eq!(s.src_rack, "R2", "natural order makes R2 the first side");
        assert_eq!(s.dst_rack, "R10");
    }
    // The demand itself ran R10→R2, opposite the canonical orientation.
    assert!(plan.pair_details[0].reversed);
}

#[test]
fn lexicographic_sort_swaps_the_orientation() {
    let mut doc = project(
        vec![rack("R2"), rack("R10")],
        vec![demand("D001", "R10", "R2", EndpointType::Mpo12, 3)],
    );
    doc.settings.ordering.peer_sort = PeerSort::Lexicographic;
    let plan = allocate(&doc).expect("allocate");
    for s in &plan.sessions {
        assert_eq!(s.src_rack, "R10", "codepoint order makes R10 first");
        assert_eq!(s.dst_rack, "R2");
    }
    assert!(!plan.pair_details[0].reversed);
}

#[test]
fn orientation_swap_replaces_every_session_id() {
    let natural_doc = project(
        vec![rack("R2"), rack("R10")],
        vec![demand("D001", "R10", "R2", EndpointType::Mpo12, 3)],
    );
    let mut lex_doc = natural_doc.clone();
    lex_doc.settings.ordering.peer_sort = PeerSort::Lexicographic;

    let natural = allocate(&natural_doc).expect("natural");
    let lex = allocate(&lex_doc).expect("lexicographic");

    let diff = logical_diff(&natural, &lex);
    assert_eq!(diff.added.len(), 3);
    assert_eq!(diff.removed.len(), 3);
    assert!(
        diff.modified.is_empty(),
        "canonical strings differ, so nothing shares an id"
    );
}

#[test]
fn peer_sort_orders_pair_processing() {
    // Under natural sort R2's pairs process before R10's; under
    // lexicographic, R10 comes first and takes the earlier slots.
    let doc = project(
        vec![rack("R2"), rack("R10"), rack("R7")],
        vec![
            demand("D001", "R7", "R2", EndpointType::Mpo12, 1),
            demand("D002", "R7", "R10", EndpointType::Mpo12, 1),
        ],
    );
    let plan = allocate(&doc).expect("allocate");
    // Pair (R2, R7) precedes (R7, R10) naturally, so R7's slot 1 serves R2.
    let to_r2 = plan
        .sessions
        .iter()
        .find(|s| s.src_rack == "R2")
        .expect("R2 session");
    assert_eq!(to_r2.dst_slot, 1);
    let to_r10 = plan
        .sessions
        .iter()
        .find(|s| s.dst_rack == "R10")
        .expect("R10 session");
    assert_eq!(to_r10.src_slot, 2, "R7 side slot 2 serves the later pair");
}
