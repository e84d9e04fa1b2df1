//! Aggregate inventory view.
//!
//! This answers "how many units are unreserved across all non-terminal
//! bookings", ignoring when those bookings occur. It is the figure shown
//! to members browsing the catalog; granting a concrete window goes
//! through [`crate::conflict::check_window_capacity`] instead.

use kitloan_catalog::{Equipment, EquipmentId};

use crate::reservation::Reservation;

/// Sum of quantities held by active reservations of one equipment.
pub fn committed_units(equipment_id: EquipmentId, reservations: &[Reservation]) -> u32 {
    let committed: u64 = reservations
        .iter()
        .filter(|r| r.equipment_id() == equipment_id && r.is_active())
        .map(|r| u64::from(r.quantity()))
        .sum();
    u32::try_from(committed).unwrap_or(u32::MAX)
}

/// Units not committed to any active reservation, floored at zero.
pub fn available_units(equipment: &Equipment, reservations: &[Reservation]) -> u32 {
    equipment
        .total_units()
        .saturating_sub(committed_units(equipment.id_typed(), reservations))
}
