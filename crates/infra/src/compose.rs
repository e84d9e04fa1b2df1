//! Composition root for in-memory deployments.
//!
//! The process that embeds the engine owns the arenas and the services;
//! everything is passed in explicitly, there is no global registry. Tests
//! and development binaries call [`build_in_memory_services`] and hand the
//! resulting [`Services`] to whatever transport layer sits on top.

use std::sync::Arc;

use kitloan_booking::{EquipmentAdminService, ReservationService};

use crate::memory::{
    InMemoryEquipmentDirectory, InMemoryMemberDirectory, InMemoryReservationStore,
    InMemorySportDirectory,
};

pub type InMemoryReservationService = ReservationService<
    Arc<InMemoryEquipmentDirectory>,
    Arc<InMemoryMemberDirectory>,
    Arc<InMemoryReservationStore>,
>;

pub type InMemoryAdminService = EquipmentAdminService<
    Arc<InMemoryEquipmentDirectory>,
    Arc<InMemorySportDirectory>,
    Arc<InMemoryReservationStore>,
>;

/// Context object holding the wired services and their backing arenas.
///
/// The arena handles are exposed alongside the services so a composition
/// root can seed data (members in particular, which the engine never
/// writes) without reaching through the domain layer.
#[derive(Clone)]
pub struct Services {
    pub reservations: Arc<InMemoryReservationService>,
    pub admin: Arc<InMemoryAdminService>,
    pub equipment: Arc<InMemoryEquipmentDirectory>,
    pub members: Arc<InMemoryMemberDirectory>,
    pub sports: Arc<InMemorySportDirectory>,
    pub reservation_store: Arc<InMemoryReservationStore>,
}

pub fn build_in_memory_services() -> Services {
    let equipment = Arc::new(InMemoryEquipmentDirectory::new());
    let members = Arc::new(InMemoryMemberDirectory::new());
    let sports = Arc::new(InMemorySportDirectory::new());
    let reservation_store = Arc::new(InMemoryReservationStore::new());

    let reservations = Arc::new(ReservationService::new(
        equipment.clone(),
        members.clone(),
        reservation_store.clone(),
    ));
    let admin = Arc::new(EquipmentAdminService::new(
        equipment.clone(),
        sports.clone(),
        reservation_store.clone(),
    ));

    tracing::debug!("in-memory service wiring complete");

    Services {
        reservations,
        admin,
        equipment,
        members,
        sports,
        reservation_store,
    }
}
