//! Reservation orchestration.
//!
//! `ReservationService` composes the period rules, the conflict resolver
//! and the reservation lifecycle against the collaborator stores. It is
//! constructed once at the composition root with its collaborators; there
//! is no global state.
//!
//! ## Write serialization
//!
//! Capacity checks are read-then-decide, so two writers on the same
//! equipment could both observe free capacity. Every capacity-relevant
//! write therefore runs inside a per-equipment mutual-exclusion region.
//! Reads take no lock and may be momentarily stale. As a second line the
//! reservation store checks the expected version on update; a commit-time
//! conflict is re-checked and reported as `CapacityExceeded`, never
//! retried here.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use kitloan_catalog::{Equipment, EquipmentId};
use kitloan_core::{
    Aggregate, AggregateId, AggregateRoot, DomainError, DomainResult, ExpectedVersion, MemberId,
};

use crate::availability::available_units;
use crate::conflict::check_window_capacity;
use crate::period::Period;
use crate::reservation::{
    AmendReservation, Reservation, ReservationCommand, ReservationId, ScheduleReservation,
};
use crate::status::ReservationStatus;
use crate::store::{EquipmentDirectory, MemberDirectory, ReservationStore, StoreError};

/// Request to create a reservation.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub equipment_id: EquipmentId,
    pub member_id: MemberId,
    pub withdrawal_at: DateTime<Utc>,
    pub return_at: DateTime<Utc>,
    pub quantity: u32,
    /// `None` defaults to `Scheduled`.
    pub status: Option<ReservationStatus>,
}

/// Partial update of a reservation.
///
/// A patched window endpoint keeps the other endpoint's current value;
/// the resulting period is revalidated in full. Every present field is
/// validated jointly with the others before anything is persisted.
#[derive(Debug, Clone, Default)]
pub struct ReservationPatch {
    pub withdrawal_at: Option<DateTime<Utc>>,
    pub return_at: Option<DateTime<Utc>>,
    pub quantity: Option<u32>,
    pub status: Option<ReservationStatus>,
}

impl ReservationPatch {
    fn touches_allocation(&self) -> bool {
        self.withdrawal_at.is_some() || self.return_at.is_some() || self.quantity.is_some()
    }
}

pub struct ReservationService<E, M, R> {
    equipment: E,
    members: M,
    reservations: R,
    write_locks: Mutex<HashMap<EquipmentId, Arc<Mutex<()>>>>,
}

impl<E, M, R> ReservationService<E, M, R>
where
    E: EquipmentDirectory,
    M: MemberDirectory,
    R: ReservationStore,
{
    pub fn new(equipment: E, members: M, reservations: R) -> Self {
        Self {
            equipment,
            members,
            reservations,
            write_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn create(&self, request: NewReservation) -> DomainResult<Reservation> {
        let equipment = self
            .equipment
            .find(request.equipment_id)
            .ok_or_else(DomainError::not_found)?;
        let member = self
            .members
            .find(request.member_id)
            .ok_or_else(DomainError::not_found)?;

        validate_quantity(&equipment, request.quantity)?;

        let now = Utc::now();
        let period = Period::new(request.withdrawal_at, request.return_at, now)?;

        let region = self.write_region(request.equipment_id);
        let _guard = region.lock().unwrap();

        let active = self
            .reservations
            .list_active_for_equipment(request.equipment_id);
        check_window_capacity(&equipment, &period, request.quantity, &active, None)?;

        let reservation = Reservation::schedule(ScheduleReservation {
            reservation_id: ReservationId::new(AggregateId::new()),
            equipment_id: equipment.id_typed(),
            member_id: member.id_typed(),
            period,
            quantity: request.quantity,
            status: request.status,
            occurred_at: now,
        })?;

        match self.reservations.insert(reservation.clone()) {
            Ok(()) => {
                tracing::debug!(
                    reservation = %reservation.id_typed(),
                    equipment = %equipment.id_typed(),
                    quantity = request.quantity,
                    "reservation scheduled"
                );
                Ok(reservation)
            }
            Err(err) => Err(self.commit_failure(&equipment, &period, request.quantity, None, err)),
        }
    }

    pub fn update(&self, id: ReservationId, patch: ReservationPatch) -> DomainResult<Reservation> {
        let mut reservation = self
            .reservations
            .find(id)
            .ok_or_else(DomainError::not_found)?;

        // Terminal immutability gates the whole update, before any other
        // validation can produce a different error.
        if reservation.status().is_terminal() {
            return Err(DomainError::TerminalStateImmutable);
        }

        let equipment = self
            .equipment
            .find(reservation.equipment_id())
            .ok_or_else(DomainError::not_found)?;

        let now = Utc::now();
        let period = match (patch.withdrawal_at, patch.return_at) {
            (None, None) => None,
            (withdrawal_at, return_at) => Some(Period::new(
                withdrawal_at.unwrap_or_else(|| reservation.period().withdrawal_at()),
                return_at.unwrap_or_else(|| reservation.period().return_at()),
                now,
            )?),
        };

        if let Some(quantity) = patch.quantity {
            validate_quantity(&equipment, quantity)?;
        }

        let region = self.write_region(equipment.id_typed());
        let _guard = region.lock().unwrap();

        if patch.touches_allocation() {
            let candidate_period = period.unwrap_or_else(|| reservation.period());
            let candidate_quantity = patch.quantity.unwrap_or_else(|| reservation.quantity());
            let active = self
                .reservations
                .list_active_for_equipment(equipment.id_typed());
            check_window_capacity(
                &equipment,
                &candidate_period,
                candidate_quantity,
                &active,
                Some(id),
            )?;
        }

        let events = reservation.handle(&ReservationCommand::Amend(AmendReservation {
            reservation_id: id,
            period,
            quantity: patch.quantity,
            status: patch.status,
            occurred_at: now,
        }))?;
        if events.is_empty() {
            return Ok(reservation);
        }

        let expected = ExpectedVersion::Exact(reservation.version());
        for event in &events {
            reservation.apply(event);
        }

        match self.reservations.update(&reservation, expected) {
            Ok(()) => {
                tracing::debug!(
                    reservation = %id,
                    equipment = %equipment.id_typed(),
                    status = %reservation.status(),
                    "reservation updated"
                );
                Ok(reservation)
            }
            Err(err) => {
                let committed_period = reservation.period();
                Err(self.commit_failure(
                    &equipment,
                    &committed_period,
                    reservation.quantity(),
                    Some(id),
                    err,
                ))
            }
        }
    }

    pub fn delete(&self, id: ReservationId) -> DomainResult<()> {
        let reservation = self
            .reservations
            .find(id)
            .ok_or_else(DomainError::not_found)?;
        reservation.ensure_deletable()?;

        match self.reservations.remove(id) {
            Ok(()) => {
                tracing::debug!(reservation = %id, "reservation deleted");
                Ok(())
            }
            Err(StoreError::NotFound) => Err(DomainError::NotFound),
            Err(StoreError::Conflict(msg)) | Err(StoreError::Unavailable(msg)) => {
                Err(DomainError::conflict(msg))
            }
        }
    }

    /// Canonical user-facing availability: the aggregate figure over all
    /// active reservations, whatever their windows.
    pub fn availability(&self, equipment_id: EquipmentId) -> DomainResult<u32> {
        let equipment = self
            .equipment
            .find(equipment_id)
            .ok_or_else(DomainError::not_found)?;
        let active = self.reservations.list_active_for_equipment(equipment_id);
        Ok(available_units(&equipment, &active))
    }

    /// Pre-flight check for a concrete window, validated exactly like
    /// `create` so a success here can only be invalidated by a race.
    pub fn check_fit(
        &self,
        equipment_id: EquipmentId,
        withdrawal_at: DateTime<Utc>,
        return_at: DateTime<Utc>,
        quantity: u32,
    ) -> DomainResult<()> {
        let equipment = self
            .equipment
            .find(equipment_id)
            .ok_or_else(DomainError::not_found)?;
        validate_quantity(&equipment, quantity)?;
        let period = Period::new(withdrawal_at, return_at, Utc::now())?;
        let active = self.reservations.list_active_for_equipment(equipment_id);
        check_window_capacity(&equipment, &period, quantity, &active, None)
    }

    pub fn get(&self, id: ReservationId) -> DomainResult<Reservation> {
        self.reservations
            .find(id)
            .ok_or_else(DomainError::not_found)
    }

    pub fn list_for_member(&self, member_id: MemberId) -> Vec<Reservation> {
        self.reservations.list_for_member(member_id)
    }

    pub fn list_for_equipment(&self, equipment_id: EquipmentId) -> Vec<Reservation> {
        self.reservations.list_for_equipment(equipment_id)
    }

    pub fn list_by_status(&self, status: ReservationStatus) -> Vec<Reservation> {
        self.reservations.list_by_status(status)
    }

    fn write_region(&self, equipment_id: EquipmentId) -> Arc<Mutex<()>> {
        let mut locks = self.write_locks.lock().unwrap();
        locks
            .entry(equipment_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// A write the store refused at commit time. Conflicts are re-checked
    /// against fresh state and reported as the capacity outcome; the
    /// engine never retries.
    fn commit_failure(
        &self,
        equipment: &Equipment,
        period: &Period,
        quantity: u32,
        exclude: Option<ReservationId>,
        err: StoreError,
    ) -> DomainError {
        match err {
            StoreError::Conflict(msg) => {
                tracing::warn!(
                    equipment = %equipment.id_typed(),
                    "write conflict at commit: {msg}"
                );
                let active = self
                    .reservations
                    .list_active_for_equipment(equipment.id_typed());
                match check_window_capacity(equipment, period, quantity, &active, exclude) {
                    Err(e) => e,
                    Ok(()) => DomainError::capacity_exceeded(format!(
                        "concurrent booking on '{}', request was not committed",
                        equipment.name()
                    )),
                }
            }
            StoreError::NotFound => DomainError::NotFound,
            StoreError::Unavailable(msg) => DomainError::conflict(msg),
        }
    }
}

fn validate_quantity(equipment: &Equipment, quantity: u32) -> DomainResult<()> {
    if quantity == 0 {
        return Err(DomainError::invalid_amount("quantity must be positive"));
    }
    if quantity > equipment.total_units() {
        return Err(DomainError::invalid_amount(format!(
            "requested {quantity} exceeds the {} total units of '{}'",
            equipment.total_units(),
            equipment.name()
        )));
    }
    Ok(())
}
