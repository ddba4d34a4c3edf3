//! LC duplex breakout placement, MMF and SMF.
//!
//! Each chunk places one breakout module per side and exactly two MPO
//! trunk cables shared by the chunk's sessions. LC port `p` rides trunk
//! MPO-1 when `p ≤ 6`, MPO-2 otherwise; within the trunk its fiber pair
//! is `(2p′−1, 2p′)` with `p′ = ((p−1) mod 6) + 1`:
//!
//! ```text
//! LC port:  1      2      3      4      5       6       7      …  12
//! trunk:    MPO-1 ─────────────────────────────────┐    MPO-2  …
//! fibers:   (1,2)  (3,4)  (5,6)  (7,8)  (9,10)  (11,12)  (1,2) …  (11,12)
//! ```

use super::PlanBuilder;
use crate::model::{EndpointType, FiberKind};
use crate::normalize::PairBucket;
use crate::plan::{CableType, ModuleKind, PairDetail, PortRef};

const TRUNKS_PER_CHUNK: u32 = 2;
const PORTS_PER_TRUNK: u32 = 6;

pub(super) fn place(builder: &mut PlanBuilder, buckets: &[PairBucket], fiber: FiberKind) {
    let media = match fiber {
        FiberKind::Mmf => EndpointType::MmfLcDuplex,
        FiberKind::Smf => EndpointType::SmfLcDuplex,
    };
    let ports_per_module = ModuleKind::LcBreakout.port_count();

    for bucket in buckets.iter().filter(|b| b.media == media) {
        let chunks = bucket.count.div_ceil(ports_per_module);
        let slots_a = builder.reserve_chunks(&bucket.rack_a, chunks);
        let slots_b = builder.reserve_chunks(&bucket.rack_b, chunks);
        let placed_chunks = slots_a.len().min(slots_b.len());

        let variant = builder
            .project
            .settings
            .fixed_profiles
            .lc_demands
            .breakout_module_variant
            .clone();
        let polarity = builder
            .project
            .settings
            .fixed_profiles
            .lc_demands
            .trunk_polarity
            .clone();

        let mut sessions_placed = 0u32;
        let mut cables_placed = 0u32;
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
                    ModuleKind::LcBreakout,
                    Some(fiber),
                    Some(variant.clone()),
                    Some(peer.clone()),
                    true,
                );
            }

            // The chunk's two trunks exist regardless of how many LC ports
            // end up used; their endpoints are the module's rear MPO ports.
            let mut trunk_ids = Vec::with_capacity(TRUNKS_PER_CHUNK as usize);
            for trunk in 1..=TRUNKS_PER_CHUNK {
                let end_a = PortRef::new(&bucket.rack_a, ua, sa, trunk);
                let end_b = PortRef::new(&bucket.rack_b, ub, sb, trunk);
                let cable_id = builder.add_cable(
                    &end_a,
                    &end_b,
                    media,
                    CableType::Mpo12Trunk,
                    Some(fiber),
                    Some(&polarity),
                    k as u32 + 1,
                    trunk,
                );
                trunk_ids.push(cable_id);
                cables_placed += 1;
            }

            let used_ports = ports_per_module.min(bucket.count - k as u32 * ports_per_module);
            for port in 1..=used_ports {
                let trunk = if port <= PORTS_PER_TRUNK { 1 } else { 2 };
                let within = (port - 1) % PORTS_PER_TRUNK + 1;
                let fiber_a = 2 * within - 1;
                let fiber_b = fiber_a + 1;

                let src = PortRef::new(&bucket.rack_a, ua, sa, port);
                let dst = PortRef::new(&bucket.rack_b, ub, sb, port);
                builder.add_session(
                    media,
                    trunk_ids[trunk - 1].clone(),
                    ModuleKind::LcBreakout,
                    &src,
                    &dst,
                    Some((fiber_a, fiber_b)),
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
            cable_count: cables_placed,
            reversed: bucket.reversed,
        });
    }
}
