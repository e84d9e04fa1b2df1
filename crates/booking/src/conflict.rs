//! Temporal-overlap conflict resolution.
//!
//! The authoritative check for whether a specific window can be granted.
//! Stricter in timing than the aggregate view in [`crate::availability`]:
//! only reservations whose windows share an instant with the candidate
//! count here.

use kitloan_catalog::Equipment;

use kitloan_core::{DomainError, DomainResult};

use crate::period::Period;
use crate::reservation::{Reservation, ReservationId};

/// Fails with `CapacityExceeded` when granting `candidate_quantity` for
/// `candidate_period` would over-allocate the equipment during any
/// overlapping instant.
///
/// `exclude` skips one reservation, for validating an update against
/// itself. Reservations of other equipment and terminal reservations are
/// ignored; overlap is half-open, so a window starting exactly at another
/// window's return does not conflict.
pub fn check_window_capacity(
    equipment: &Equipment,
    candidate_period: &Period,
    candidate_quantity: u32,
    reservations: &[Reservation],
    exclude: Option<ReservationId>,
) -> DomainResult<()> {
    let overlapping: u64 = reservations
        .iter()
        .filter(|r| exclude != Some(r.id_typed()))
        .filter(|r| r.equipment_id() == equipment.id_typed() && r.is_active())
        .filter(|r| r.period().overlaps(candidate_period))
        .map(|r| u64::from(r.quantity()))
        .sum();

    if overlapping + u64::from(candidate_quantity) > u64::from(equipment.total_units()) {
        return Err(DomainError::capacity_exceeded(format!(
            "requested {candidate_quantity} of '{}', only {} free between {} and {}",
            equipment.name(),
            u64::from(equipment.total_units()).saturating_sub(overlapping),
            candidate_period.withdrawal_at(),
            candidate_period.return_at(),
        )));
    }

    Ok(())
}
