//! MPO end-to-end placement.
//!
//! Each rack pair's `mpo12` demand is chunked into pass-through modules of
//! twelve ports, one slot per side per chunk. Port `p` on the source side
//! connects straight to port `p` on the destination side, and every used
//! port gets its own trunk cable.

use super::PlanBuilder;
use crate::model::EndpointType;
use crate::normalize::PairBucket;
use crate::plan::{CableType, ModuleKind, PairDetail, PortRef};

pub(super) fn place(builder: &mut PlanBuilder, buckets: &[PairBucket]) {
    let ports_per_module = ModuleKind::Mpo12PassThrough.port_count();

    for bucket in buckets.iter().filter(|b| b.media == EndpointType::Mpo12) {
        let chunks = bucket.count.div_ceil(ports_per_module);
        let slots_a = builder.reserve_chunks(&bucket.rack_a, chunks);
        let slots_b = builder.reserve_chunks(&bucket.rack_b, chunks);
        let placed_chunks = slots_a.len().min(slots_b.len());

        let variant = builder
            .project
            .settings
            .fixed_profiles
            .mpo_e2e
            .pass_through_variant
            .clone();
        let polarity = builder
            .project
            .settings
            .fixed_profiles
            .mpo_e2e
            .trunk_polarity
            .clone();

        let mut sessions_placed = 0u32;
        for k in 0..placed_chunks {
            let (ua, sa) = slots_a[k];
            let (ub, sb) = slots_b[k];

            for (rack, u, slot, peer) in [
                (&bucket.rack_a, ua, sa, &bucket.rack_b),
                (&bucket.rack_b, ub, sb, &bucket.rack_a),
            ] {
                builder.ensure_panel(rack, u);
                builder.add_module(
                    rack,
                    u,
                    slot,
                    ModuleKind::Mpo12PassThrough,
                    None,
                    Some(variant.clone()),
                    Some(peer.clone()),
                    true,
                );
            }

            let used_ports = ports_per_module.min(bucket.count - k as u32 * ports_per_module);
            for port in 1..=used_ports {
                let end_a = PortRef::new(&bucket.rack_a, ua, sa, port);
                let end_b = PortRef::new(&bucket.rack_b, ub, sb, port);
                let cable_id = builder.add_cable(
                    &end_a,
                    &end_b,
                    EndpointType::Mpo12,
                    CableType::Mpo12Trunk,
                    None,
                    Some(&polarity),
                    k as u32 + 1,
                    port,
                );
                builder.add_session(
                    EndpointType::Mpo12,
                    cable_id,
                    ModuleKind::Mpo12PassThrough,
                    &end_a,
                    &end_b,
                    None,
                );
                sessions_placed += 1;
            }
        }

        builder.push_pair_detail(PairDetail {
            rack_a: bucket.rack_a.clone(),
            rack_b: bucket.rack_b.clone(),
            media: bucket.media,
            demand_count: bucket.count,
            chunk_count: placed_chunks as u32,
            session_count: sessions_placed,
            // One trunk per used port.
            cable_count: sessions_placed,
            reversed: bucket.reversed,
        });
    }
}
