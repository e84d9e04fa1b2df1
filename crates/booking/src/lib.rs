//! Reservation engine: loan windows, availability, conflict resolution,
//! the reservation lifecycle, and the orchestrating services.
//!
//! The engine performs no IO of its own; equipment, members and
//! reservations are reached through the collaborator traits in [`store`],
//! wired in at the composition root.

pub mod admin;
pub mod availability;
pub mod conflict;
pub mod period;
pub mod reservation;
pub mod service;
pub mod status;
pub mod store;

#[cfg(test)]
mod test_support;

pub use admin::{EquipmentAdminService, EquipmentOverview, EquipmentPatch};
pub use availability::{available_units, committed_units};
pub use conflict::check_window_capacity;
pub use period::{Period, MAX_PERIOD_HOURS};
pub use reservation::{
    AmendReservation, Reservation, ReservationCommand, ReservationEvent, ReservationId,
    ScheduleReservation,
};
pub use service::{NewReservation, ReservationPatch, ReservationService};
pub use status::ReservationStatus;
pub use store::{
    EquipmentDirectory, MemberDirectory, ReservationStore, SportDirectory, StoreError,
};
