//! Shared in-memory fakes for the service tests.

use std::collections::HashMap;
use std::sync::Mutex;

use kitloan_catalog::{Equipment, EquipmentId, Sport, SportId};
use kitloan_core::{ExpectedVersion, MemberId};
use kitloan_members::Member;

use crate::reservation::{Reservation, ReservationId};
use crate::status::ReservationStatus;
use crate::store::{
    EquipmentDirectory, MemberDirectory, ReservationStore, SportDirectory, StoreError,
};

/// One fake backing every collaborator trait, so a service under test can
/// share a single world through `Arc` clones.
#[derive(Default)]
pub struct FakeWorld {
    pub equipment: Mutex<HashMap<EquipmentId, Equipment>>,
    pub members: Mutex<HashMap<MemberId, Member>>,
    pub sports: Mutex<HashMap<SportId, Sport>>,
    pub reservations: Mutex<HashMap<ReservationId, Reservation>>,
}

impl EquipmentDirectory for FakeWorld {
    fn find(&self, id: EquipmentId) -> Option<Equipment> {
        self.equipment.lock().unwrap().get(&id).cloned()
    }

    fn find_by_name(&self, name: &str) -> Option<Equipment> {
        self.equipment
            .lock()
            .unwrap()
            .values()
            .find(|e| e.name() == name)
            .cloned()
    }

    fn list(&self) -> Vec<Equipment> {
        self.equipment.lock().unwrap().values().cloned().collect()
    }

    fn insert(&self, equipment: Equipment) -> Result<(), StoreError> {
        self.equipment
            .lock()
            .unwrap()
            .insert(equipment.id_typed(), equipment);
        Ok(())
    }

    fn update(&self, equipment: &Equipment) -> Result<(), StoreError> {
        self.equipment
            .lock()
            .unwrap()
            .insert(equipment.id_typed(), equipment.clone());
        Ok(())
    }

    fn remove(&self, id: EquipmentId) -> Result<(), StoreError> {
        self.equipment
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

impl MemberDirectory for FakeWorld {
    fn find(&self, id: MemberId) -> Option<Member> {
        self.members.lock().unwrap().get(&id).cloned()
    }
}

impl SportDirectory for FakeWorld {
    fn find(&self, id: SportId) -> Option<Sport> {
        self.sports.lock().unwrap().get(&id).cloned()
    }

    fn find_by_name(&self, name: &str) -> Option<Sport> {
        self.sports
            .lock()
            .unwrap()
            .values()
            .find(|s| s.name() == name)
            .cloned()
    }

    fn list(&self) -> Vec<Sport> {
        self.sports.lock().unwrap().values().cloned().collect()
    }

    fn insert(&self, sport: Sport) -> Result<(), StoreError> {
        self.sports.lock().unwrap().insert(sport.id_typed(), sport);
        Ok(())
    }

    fn update(&self, sport: &Sport) -> Result<(), StoreError> {
        self.sports
            .lock()
            .unwrap()
            .insert(sport.id_typed(), sport.clone());
        Ok(())
    }

    fn remove(&self, id: SportId) -> Result<(), StoreError> {
        self.sports
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

impl ReservationStore for FakeWorld {
    fn find(&self, id: ReservationId) -> Option<Reservation> {
        self.reservations.lock().unwrap().get(&id).cloned()
    }

    fn list_active_for_equipment(&self, equipment_id: EquipmentId) -> Vec<Reservation> {
        self.reservations
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.equipment_id() == equipment_id && r.is_active())
            .cloned()
            .collect()
    }

    fn list_for_equipment(&self, equipment_id: EquipmentId) -> Vec<Reservation> {
        self.reservations
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.equipment_id() == equipment_id)
            .cloned()
            .collect()
    }

    fn list_for_member(&self, member_id: MemberId) -> Vec<Reservation> {
        self.reservations
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.member_id() == member_id)
            .cloned()
            .collect()
    }

    fn list_by_status(&self, status: ReservationStatus) -> Vec<Reservation> {
        self.reservations
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.status() == status)
            .cloned()
            .collect()
    }

    fn insert(&self, reservation: Reservation) -> Result<(), StoreError> {
        self.reservations
            .lock()
            .unwrap()
            .insert(reservation.id_typed(), reservation);
        Ok(())
    }

    fn update(
        &self,
        reservation: &Reservation,
        _expected: ExpectedVersion,
    ) -> Result<(), StoreError> {
        self.reservations
            .lock()
            .unwrap()
            .insert(reservation.id_typed(), reservation.clone());
        Ok(())
    }

    fn remove(&self, id: ReservationId) -> Result<(), StoreError> {
        self.reservations
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}
