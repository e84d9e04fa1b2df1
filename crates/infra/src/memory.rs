//! In-memory arena implementations of the collaborator traits.
//!
//! Intended for tests/dev. Each arena is an id-keyed `RwLock<HashMap>`
//! handing out owned snapshots; no live reference into a map ever crosses
//! the trait boundary. Not optimized for performance.

use std::collections::HashMap;
use std::sync::RwLock;

use kitloan_booking::{
    EquipmentDirectory, MemberDirectory, Reservation, ReservationId, ReservationStore,
    ReservationStatus, SportDirectory, StoreError,
};
use kitloan_catalog::{Equipment, EquipmentId, Sport, SportId};
use kitloan_core::{AggregateRoot, ExpectedVersion, MemberId};
use kitloan_members::Member;

fn poisoned() -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

/// In-memory equipment arena.
#[derive(Debug, Default)]
pub struct InMemoryEquipmentDirectory {
    inner: RwLock<HashMap<EquipmentId, Equipment>>,
}

impl InMemoryEquipmentDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EquipmentDirectory for InMemoryEquipmentDirectory {
    fn find(&self, id: EquipmentId) -> Option<Equipment> {
        let map = self.inner.read().ok()?;
        map.get(&id).cloned()
    }

    fn find_by_name(&self, name: &str) -> Option<Equipment> {
        let map = self.inner.read().ok()?;
        map.values().find(|e| e.name() == name).cloned()
    }

    fn list(&self) -> Vec<Equipment> {
        match self.inner.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => vec![],
        }
    }

    fn insert(&self, equipment: Equipment) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if map.contains_key(&equipment.id_typed()) {
            return Err(StoreError::Conflict("duplicate equipment id".to_string()));
        }
        map.insert(equipment.id_typed(), equipment);
        Ok(())
    }

    fn update(&self, equipment: &Equipment) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        match map.get_mut(&equipment.id_typed()) {
            Some(stored) => {
                *stored = equipment.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn remove(&self, id: EquipmentId) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}

/// In-memory member arena.
///
/// The engine only reads members, so the trait surface is `find`; seeding
/// goes through the inherent [`upsert`](Self::upsert).
#[derive(Debug, Default)]
pub struct InMemoryMemberDirectory {
    inner: RwLock<HashMap<MemberId, Member>>,
}

impl InMemoryMemberDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, member: Member) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(member.id_typed(), member);
        }
    }
}

impl MemberDirectory for InMemoryMemberDirectory {
    fn find(&self, id: MemberId) -> Option<Member> {
        let map = self.inner.read().ok()?;
        map.get(&id).cloned()
    }
}

/// In-memory sport arena.
#[derive(Debug, Default)]
pub struct InMemorySportDirectory {
    inner: RwLock<HashMap<SportId, Sport>>,
}

impl InMemorySportDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SportDirectory for InMemorySportDirectory {
    fn find(&self, id: SportId) -> Option<Sport> {
        let map = self.inner.read().ok()?;
        map.get(&id).cloned()
    }

    fn find_by_name(&self, name: &str) -> Option<Sport> {
        let map = self.inner.read().ok()?;
        map.values().find(|s| s.name() == name).cloned()
    }

    fn list(&self) -> Vec<Sport> {
        match self.inner.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => vec![],
        }
    }

    fn insert(&self, sport: Sport) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if map.contains_key(&sport.id_typed()) {
            return Err(StoreError::Conflict("duplicate sport id".to_string()));
        }
        map.insert(sport.id_typed(), sport);
        Ok(())
    }

    fn update(&self, sport: &Sport) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        match map.get_mut(&sport.id_typed()) {
            Some(stored) => {
                *stored = sport.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn remove(&self, id: SportId) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}

/// In-memory reservation arena with optimistic versioning on update.
#[derive(Debug, Default)]
pub struct InMemoryReservationStore {
    inner: RwLock<HashMap<ReservationId, Reservation>>,
}

impl InMemoryReservationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReservationStore for InMemoryReservationStore {
    fn find(&self, id: ReservationId) -> Option<Reservation> {
        let map = self.inner.read().ok()?;
        map.get(&id).cloned()
    }

    fn list_active_for_equipment(&self, equipment_id: EquipmentId) -> Vec<Reservation> {
        match self.inner.read() {
            Ok(map) => map
                .values()
                .filter(|r| r.equipment_id() == equipment_id && r.is_active())
                .cloned()
                .collect(),
            Err(_) => vec![],
        }
    }

    fn list_for_equipment(&self, equipment_id: EquipmentId) -> Vec<Reservation> {
        match self.inner.read() {
            Ok(map) => map
                .values()
                .filter(|r| r.equipment_id() == equipment_id)
                .cloned()
                .collect(),
            Err(_) => vec![],
        }
    }

    fn list_for_member(&self, member_id: MemberId) -> Vec<Reservation> {
        match self.inner.read() {
            Ok(map) => map
                .values()
                .filter(|r| r.member_id() == member_id)
                .cloned()
                .collect(),
            Err(_) => vec![],
        }
    }

    fn list_by_status(&self, status: ReservationStatus) -> Vec<Reservation> {
        match self.inner.read() {
            Ok(map) => map
                .values()
                .filter(|r| r.status() == status)
                .cloned()
                .collect(),
            Err(_) => vec![],
        }
    }

    fn insert(&self, reservation: Reservation) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if map.contains_key(&reservation.id_typed()) {
            return Err(StoreError::Conflict("duplicate reservation id".to_string()));
        }
        map.insert(reservation.id_typed(), reservation);
        Ok(())
    }

    fn update(
        &self,
        reservation: &Reservation,
        expected: ExpectedVersion,
    ) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        match map.get_mut(&reservation.id_typed()) {
            Some(stored) => {
                // The caller read `expected`, decided, and wrote; a stored
                // version it did not see means it lost the race.
                if !expected.matches(stored.version()) {
                    return Err(StoreError::Conflict(format!(
                        "expected {expected:?}, found {}",
                        stored.version()
                    )));
                }
                *stored = reservation.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn remove(&self, id: ReservationId) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}
