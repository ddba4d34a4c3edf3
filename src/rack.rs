//! Per-rack slot reservation state machine.
//!
//! Each rack owns a monotonically increasing allocation index. Reserving
//! maps the index to a `(u, slot)` coordinate in the configured fill
//! direction; slots are never released. An index that lands outside
//! `1..=height_u` is an overflow: the failure is reported and the index
//! still advances, so later reservation sites keep producing distinct
//! overflow records and a single pass discovers them all.

use crate::model::FillDirection;
use crate::plan::PlanError;

/// Slot allocator for a single rack. One instance per rack, owned by the
/// plan builder; no cross-rack aliasing.
#[derive(Debug)]
pub struct RackSlots {
    rack_id: String,
    height_u: u32,
    slots_per_u: u32,
    direction: FillDirection,
    next_index: u32,
}

impl RackSlots {
    pub fn new(rack_id: &str, height_u: u32, slots_per_u: u32, direction: FillDirection) -> Self {
        Self {
            rack_id: rack_id.to_string(),
            height_u,
            slots_per_u,
            direction,
            next_index: 0,
        }
    }

    /// Reserve the next `(u, slot)` coordinate, or report overflow.
    pub fn reserve_one(&mut self) -> Result<(u32, u32), PlanError> {
        let index = self.next_index;
        self.next_index += 1;

        let slot = index % self.slots_per_u + 1;
        let row = index / self.slots_per_u;
        let u = match self.direction {
            FillDirection::TopDown => i64::from(row) + 1,
            FillDirection::BottomUp => i64::from(self.height_u) - i64::from(row),
        };
        if u < 1 || u > i64::from(self.height_u) {
            return Err(PlanError::RackOverflow {
                rack_id: self.rack_id.clone(),
                allocation_index: index,
            });
        }
        Ok((u as u32, slot))
    }

    /// Reserve `n` consecutive coordinates. Returns the prefix that fit;
    /// a shortfall yields one overflow record for the first index that
    /// fell off the rack.
    pub fn reserve_contiguous(&mut self, n: u32) -> (Vec<(u32, u32)>, Option<PlanError>) {
        let mut reserved = Vec::with_capacity(n as usize);
        for _ in 0..n {
            match self.reserve_one() {
                Ok(coord) => reserved.push(coord),
                Err(err) => return (reserved, Some(err)),
            }
        }
        (reserved, None)
    }
}
