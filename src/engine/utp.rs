//! UTP placement.
//!
//! Unlike the optical engines, UTP allocates by rack first and peer
//! second: each rack fills shared six-port modules in peer-sort order over
//! its peers, reusing a partially-filled module for the next peer. Once
//! both sides of a pair are laid out, their port lists are paired by
//! position to form sessions; a length disagreement records a warning and
//! the shorter side wins.

use std::collections::BTreeMap;

use super::PlanBuilder;
use crate::model::EndpointType;
use crate::normalize::{self, PairBucket};
use crate::plan::{CableType, ModuleKind, PairDetail, PlanWarning, PortRef};

pub(super) fn place(builder: &mut PlanBuilder, buckets: &[PairBucket]) {
    let ports_per_module = ModuleKind::UtpRj45x6.port_count();
    let per_rack = normalize::peers_by_rack(buckets, EndpointType::UtpRj45, builder.sort);

    // (rack, peer) → ports handed out on `rack` toward `peer`, in order.
    let mut assignments: BTreeMap<(String, String), Vec<PortRef>> = BTreeMap::new();

    for (rack, peers) in &per_rack {
        // (u, slot, ports_used) of the module currently being filled.
        let mut open_module: Option<(u32, u32, u32)> = None;
        'rack: for (peer, count) in peers {
            for _ in 0..*count {
                let (u, slot, port) = match open_module {
                    Some((u, slot, used)) if used < ports_per_module => {
                        open_module = Some((u, slot, used + 1));
                        (u, slot, used + 1)
                    }
                    _ => {
                        let Some((u, slot)) = builder.reserve_slot(rack) else {
                            // Overflow recorded; nothing more fits here.
                            break 'rack;
                        };
                        builder.ensure_panel(rack, u);
                        builder.add_module(
                            rack,
                            u,
                            slot,
                            ModuleKind::UtpRj45x6,
                            None,
                            None,
                            None,
                            false,
                        );
                        open_module = Some((u, slot, 1));
                        (u, slot, 1)
                    }
                };
                assignments
                    .entry((rack.clone(), peer.clone()))
                    .or_default()
                    .push(PortRef::new(rack, u, slot, port));
            }
        }
    }

    let empty: Vec<PortRef> = Vec::new();
    for bucket in buckets.iter().filter(|b| b.media == EndpointType::UtpRj45) {
        let left = assignments
            .get(&(bucket.rack_a.clone(), bucket.rack_b.clone()))
            .unwrap_or(&empty);
        let right = assignments
            .get(&(bucket.rack_b.clone(), bucket.rack_a.clone()))
            .unwrap_or(&empty);

        if left.len() != right.len() {
            builder.push_warning(PlanWarning::SideCountMismatch {
                rack_a: bucket.rack_a.clone(),
                rack_b: bucket.rack_b.clone(),
                left_ports: left.len() as u32,
                right_ports: right.len() as u32,
            });
        }

        let paired = left.len().min(right.len());
        for i in 0..paired {
            let src = left[i].clone();
            let dst = right[i].clone();
            let cable_id = builder.add_cable(
                &src,
                &dst,
                EndpointType::UtpRj45,
                CableType::UtpCable,
                None,
                None,
                0,
                0,
            );
            builder.add_session(
                EndpointType::UtpRj45,
                cable_id,
                ModuleKind::UtpRj45x6,
                &src,
                &dst,
                None,
            );
        }

        builder.push_pair_detail(PairDetail {
            rack_a: bucket.rack_a.clone(),
            rack_b: bucket.rack_b.clone(),
            media: bucket.media,
            demand_count: bucket.count,
            chunk_count: 0,
            session_count: paired as u32,
            cable_count: paired as u32,
            reversed: bucket.reversed,
        });
    }
}
