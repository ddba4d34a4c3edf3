//! Diffing allocated revisions against each other.

mod helpers;

use helpers::{demand, project, rack};
use patchplan::model::{EndpointType, FillDirection};
use patchplan::{allocate, logical_diff, physical_diff};

#[test]
fn growing_a_demand_only_adds_sessions() {
    let old_doc = project(
        vec![rack("R01"), rack("R02")],
        vec![demand("D001", "R01", "R02", EndpointType::Mpo12, 4)],
    );
    let mut new_doc = old_doc.clone();
    new_doc.demands[0].count = 6;

    let old = allocate(&old_doc).expect("old");
    let new = allocate(&new_doc).expect("new");

    let diff = logical_diff(&old, &new);
    assert_eq!(diff.added.len(), 2, "ports 5 and 6 are new");
    assert!(diff.removed.is_empty());
    assert!(
        diff.modified.is_empty(),
        "existing sessions keep their coordinates, so their ids survive"
    );
}

#[test]
fn direction_flip_changes_every_physical_location() {
    let doc = project(
        vec![rack("R01"), rack("R02")],
        vec![demand("D001", "R01", "R02", EndpointType::Mpo12, 4)],
    );
    let mut flipped_doc = doc.clone();
    flipped_doc.settings.panel.allocation_direction = FillDirection::BottomUp;

    let top_down = allocate(&doc).expect("top_down");
    let bottom_up = allocate(&flipped_doc).expect("bottom_up");

    let diff = physical_diff(&top_down, &bottom_up);
    assert_eq!(diff.added.len(), 4);
    assert_eq!(diff.removed.len(), 4);
    assert!(diff.collisions.is_empty());
}

#[test]
fn dropping_an_earlier_category_shifts_later_slots() {
    let old_doc = project(
        vec![rack("R01"), rack("R02")],
        vec![
            demand("D001", "R01", "R02", EndpointType::Mpo12, 4),
            demand("D002", "R01", "R02", EndpointType::MmfLcDuplex, 4),
        ],
    );
    let mut new_doc = old_doc.clone();
    new_doc.demands.remove(0);

    let old = allocate(&old_doc).expect("old");
    let new = allocate(&new_doc).expect("new");

    // LC moved from slot 2 to slot 1, so its sessions are rekeyed on both
    // axes. Nothing collides: ids are a function of the coordinates.
    let logical = logical_diff(&old, &new);
    assert_eq!(logical.added.len(), 4);
    assert_eq!(logical.removed.len(), 8, "4 MPO gone + 4 LC rekeyed");
    assert!(logical.modified.is_empty());

    let physical = physical_diff(&old, &new);
    assert!(physical.collisions.is_empty());
    assert_eq!(physical.added.len(), 4);
}

#[test]
fn identical_revisions_diff_empty_end_to_end() {
    let doc = project(
        vec![rack("R01"), rack("R02"), rack("R03")],
        vec![
            demand("D001", "R01", "R02", EndpointType::SmfLcDuplex, 7),
            demand("D002", "R02", "R03", EndpointType::UtpRj45, 5),
        ],
    );
    let a = allocate(&doc).expect("a");
    let b = allocate(&doc).expect("b");
    assert!(logical_diff(&a, &b).is_empty());
    assert!(physical_diff(&a, &b).is_empty());
}
