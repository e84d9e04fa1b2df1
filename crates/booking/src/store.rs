//! Collaborator interfaces the engine consumes.
//!
//! Implementations live outside the core (in-memory arenas in
//! `kitloan-infra`, real persistence elsewhere). Every method takes and
//! returns owned snapshots keyed by id, never live references, so callers
//! can hold results without aliasing stored state.

use std::sync::Arc;

use thiserror::Error;

use kitloan_catalog::{Equipment, EquipmentId, Sport, SportId};
use kitloan_core::{ExpectedVersion, MemberId};
use kitloan_members::Member;

use crate::reservation::{Reservation, ReservationId};
use crate::status::ReservationStatus;

/// Store operation error.
///
/// Infrastructure-flavored failures; the services map these onto the
/// domain taxonomy at their boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The keyed record does not exist.
    #[error("record not found")]
    NotFound,

    /// The write lost against a concurrent writer (duplicate insert or
    /// version mismatch).
    #[error("write conflict: {0}")]
    Conflict(String),

    /// The backing store is unusable (e.g. a poisoned lock).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Read/write access to the equipment catalog.
pub trait EquipmentDirectory: Send + Sync {
    fn find(&self, id: EquipmentId) -> Option<Equipment>;
    fn find_by_name(&self, name: &str) -> Option<Equipment>;
    fn list(&self) -> Vec<Equipment>;
    fn insert(&self, equipment: Equipment) -> Result<(), StoreError>;
    fn update(&self, equipment: &Equipment) -> Result<(), StoreError>;
    fn remove(&self, id: EquipmentId) -> Result<(), StoreError>;
}

/// Read access to the member directory.
pub trait MemberDirectory: Send + Sync {
    fn find(&self, id: MemberId) -> Option<Member>;
}

/// Read/write access to sport categories.
pub trait SportDirectory: Send + Sync {
    fn find(&self, id: SportId) -> Option<Sport>;
    fn find_by_name(&self, name: &str) -> Option<Sport>;
    fn list(&self) -> Vec<Sport>;
    fn insert(&self, sport: Sport) -> Result<(), StoreError>;
    fn update(&self, sport: &Sport) -> Result<(), StoreError>;
    fn remove(&self, id: SportId) -> Result<(), StoreError>;
}

/// Reservation persistence.
///
/// `list_active_for_equipment` returns every non-terminal reservation of
/// the equipment, whatever its window, status and period included, as
/// the capacity checks need both. `update` enforces the caller's
/// [`ExpectedVersion`] so a stale read cannot silently overwrite a
/// concurrent commit.
pub trait ReservationStore: Send + Sync {
    fn find(&self, id: ReservationId) -> Option<Reservation>;
    fn list_active_for_equipment(&self, equipment_id: EquipmentId) -> Vec<Reservation>;
    fn list_for_equipment(&self, equipment_id: EquipmentId) -> Vec<Reservation>;
    fn list_for_member(&self, member_id: MemberId) -> Vec<Reservation>;
    fn list_by_status(&self, status: ReservationStatus) -> Vec<Reservation>;
    fn insert(&self, reservation: Reservation) -> Result<(), StoreError>;
    fn update(&self, reservation: &Reservation, expected: ExpectedVersion)
        -> Result<(), StoreError>;
    fn remove(&self, id: ReservationId) -> Result<(), StoreError>;
}

impl<S> EquipmentDirectory for Arc<S>
where
    S: EquipmentDirectory + ?Sized,
{
    fn find(&self, id: EquipmentId) -> Option<Equipment> {
        (**self).find(id)
    }

    fn find_by_name(&self, name: &str) -> Option<Equipment> {
        (**self).find_by_name(name)
    }

    fn list(&self) -> Vec<Equipment> {
        (**self).list()
    }

    fn insert(&self, equipment: Equipment) -> Result<(), StoreError> {
        (**self).insert(equipment)
    }

    fn update(&self, equipment: &Equipment) -> Result<(), StoreError> {
        (**self).update(equipment)
    }

    fn remove(&self, id: EquipmentId) -> Result<(), StoreError> {
        (**self).remove(id)
    }
}

impl<S> MemberDirectory for Arc<S>
where
    S: MemberDirectory + ?Sized,
{
    fn find(&self, id: MemberId) -> Option<Member> {
        (**self).find(id)
    }
}

impl<S> SportDirectory for Arc<S>
where
    S: SportDirectory + ?Sized,
{
    fn find(&self, id: SportId) -> Option<Sport> {
        (**self).find(id)
    }

    fn find_by_name(&self, name: &str) -> Option<Sport> {
        (**self).find_by_name(name)
    }

    fn list(&self) -> Vec<Sport> {
        (**self).list()
    }

    fn insert(&self, sport: Sport) -> Result<(), StoreError> {
        (**self).insert(sport)
    }

    fn update(&self, sport: &Sport) -> Result<(), StoreError> {
        (**self).update(sport)
    }

    fn remove(&self, id: SportId) -> Result<(), StoreError> {
        (**self).remove(id)
    }
}

impl<S> ReservationStore for Arc<S>
where
    S: ReservationStore + ?Sized,
{
    fn find(&self, id: ReservationId) -> Option<Reservation> {
        (**self).find(id)
    }

    fn list_active_for_equipment(&self, equipment_id: EquipmentId) -> Vec<Reservation> {
        (**self).list_active_for_equipment(equipment_id)
    }

    fn list_for_equipment(&self, equipment_id: EquipmentId) -> Vec<Reservation> {
        (**self).list_for_equipment(equipment_id)
    }

    fn list_for_member(&self, member_id: MemberId) -> Vec<Reservation> {
        (**self).list_for_member(member_id)
    }

    fn list_by_status(&self, status: ReservationStatus) -> Vec<Reservation> {
        (**self).list_by_status(status)
    }

    fn insert(&self, reservation: Reservation) -> Result<(), StoreError> {
        (**self).insert(reservation)
    }

    fn update(
        &self,
        reservation: &Reservation,
        expected: ExpectedVersion,
    ) -> Result<(), StoreError> {
        (**self).update(reservation, expected)
    }

    fn remove(&self, id: ReservationId) -> Result<(), StoreError> {
        (**self).remove(id)
    }
}
