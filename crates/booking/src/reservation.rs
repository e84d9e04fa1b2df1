use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kitloan_catalog::EquipmentId;
use kitloan_core::{Aggregate, AggregateId, AggregateRoot, DomainError, DomainResult, MemberId};

use crate::period::Period;
use crate::status::ReservationStatus;

/// Reservation identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(pub AggregateId);

impl ReservationId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ReservationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: Reservation.
///
/// A request by a member to hold `quantity` units of one equipment for a
/// bounded window. Equipment and member are weak references by id and
/// never change after scheduling. All amendments flow through
/// [`AmendReservation`]; the whole patch is validated before any field
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    equipment_id: EquipmentId,
    member_id: MemberId,
    period: Period,
    quantity: u32,
    status: ReservationStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

/// Command: ScheduleReservation (creation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleReservation {
    pub reservation_id: ReservationId,
    pub equipment_id: EquipmentId,
    pub member_id: MemberId,
    pub period: Period,
    pub quantity: u32,
    /// `None` defaults to `Scheduled`; only `Scheduled` or `Pending` are
    /// accepted explicitly.
    pub status: Option<ReservationStatus>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AmendReservation (partial update of period/quantity/status).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmendReservation {
    pub reservation_id: ReservationId,
    pub period: Option<Period>,
    pub quantity: Option<u32>,
    pub status: Option<ReservationStatus>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationCommand {
    Amend(AmendReservation),
}

/// Event: PeriodChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodChanged {
    pub reservation_id: ReservationId,
    pub period: Period,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuantityChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityChanged {
    pub reservation_id: ReservationId,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChanged {
    pub reservation_id: ReservationId,
    pub status: ReservationStatus,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationEvent {
    PeriodChanged(PeriodChanged),
    QuantityChanged(QuantityChanged),
    StatusChanged(StatusChanged),
}

impl Reservation {
    /// Create a reservation from a schedule command.
    ///
    /// Capacity against sibling reservations and the equipment's unit
    /// ceiling need external context; the service validates them before
    /// calling this.
    pub fn schedule(cmd: ScheduleReservation) -> DomainResult<Self> {
        if cmd.quantity == 0 {
            return Err(DomainError::invalid_amount("quantity must be positive"));
        }

        let status = cmd.status.unwrap_or(ReservationStatus::Scheduled);
        if !matches!(
            status,
            ReservationStatus::Scheduled | ReservationStatus::Pending
        ) {
            return Err(DomainError::illegal_transition(format!(
                "a new reservation cannot start as {status}"
            )));
        }

        Ok(Self {
            id: cmd.reservation_id,
            equipment_id: cmd.equipment_id,
            member_id: cmd.member_id,
            period: cmd.period,
            quantity: cmd.quantity,
            status,
            created_at: cmd.occurred_at,
            updated_at: cmd.occurred_at,
            version: 1,
        })
    }

    pub fn id_typed(&self) -> ReservationId {
        self.id
    }

    pub fn equipment_id(&self) -> EquipmentId {
        self.equipment_id
    }

    pub fn member_id(&self) -> MemberId {
        self.member_id
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn status(&self) -> ReservationStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Deletion is its own eligibility rule, separate from transitions:
    /// only a reservation whose equipment is physically out is protected.
    pub fn ensure_deletable(&self) -> DomainResult<()> {
        if self.status == ReservationStatus::InProgress {
            return Err(DomainError::DeleteNotAllowed);
        }
        Ok(())
    }

    fn ensure_reservation_id(&self, reservation_id: ReservationId) -> DomainResult<()> {
        if self.id != reservation_id {
            return Err(DomainError::validation("reservation_id mismatch"));
        }
        Ok(())
    }

    fn handle_amend(&self, cmd: &AmendReservation) -> DomainResult<Vec<ReservationEvent>> {
        self.ensure_reservation_id(cmd.reservation_id)?;

        // Terminal immutability gates every field, before anything else.
        if self.status.is_terminal() {
            return Err(DomainError::TerminalStateImmutable);
        }

        let mut events = Vec::new();

        if let Some(period) = cmd.period {
            events.push(ReservationEvent::PeriodChanged(PeriodChanged {
                reservation_id: self.id,
                period,
                occurred_at: cmd.occurred_at,
            }));
        }

        if let Some(quantity) = cmd.quantity {
            if quantity == 0 {
                return Err(DomainError::invalid_amount("quantity must be positive"));
            }
            events.push(ReservationEvent::QuantityChanged(QuantityChanged {
                reservation_id: self.id,
                quantity,
                occurred_at: cmd.occurred_at,
            }));
        }

        if let Some(status) = cmd.status {
            self.status.validate_transition(status)?;
            events.push(ReservationEvent::StatusChanged(StatusChanged {
                reservation_id: self.id,
                status,
                occurred_at: cmd.occurred_at,
            }));
        }

        Ok(events)
    }
}

impl AggregateRoot for Reservation {
    type Id = ReservationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for Reservation {
    type Command = ReservationCommand;
    type Event = ReservationEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ReservationEvent::PeriodChanged(e) => {
                self.period = e.period;
                self.updated_at = e.occurred_at;
            }
            ReservationEvent::QuantityChanged(e) => {
                self.quantity = e.quantity;
                self.updated_at = e.occurred_at;
            }
            ReservationEvent::StatusChanged(e) => {
                self.status = e.status;
                self.updated_at = e.occurred_at;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            ReservationCommand::Amend(cmd) => self.handle_amend(cmd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_reservation_id() -> ReservationId {
        ReservationId::new(AggregateId::new())
    }

    fn test_equipment_id() -> EquipmentId {
        EquipmentId::new(AggregateId::new())
    }

    fn test_period(start_h: i64, end_h: i64) -> Period {
        let t = Utc::now();
        Period::new(
            t + Duration::hours(start_h),
            t + Duration::hours(end_h),
            t,
        )
        .unwrap()
    }

    fn test_schedule(quantity: u32, status: Option<ReservationStatus>) -> ScheduleReservation {
        ScheduleReservation {
            reservation_id: test_reservation_id(),
            equipment_id: test_equipment_id(),
            member_id: MemberId::new(),
            period: test_period(1, 3),
            quantity,
            status,
            occurred_at: Utc::now(),
        }
    }

    fn amend(
        reservation: &Reservation,
        period: Option<Period>,
        quantity: Option<u32>,
        status: Option<ReservationStatus>,
    ) -> DomainResult<Vec<ReservationEvent>> {
        reservation.handle(&ReservationCommand::Amend(AmendReservation {
            reservation_id: reservation.id_typed(),
            period,
            quantity,
            status,
            occurred_at: Utc::now(),
        }))
    }

    #[test]
    fn schedule_defaults_to_scheduled_status() {
        let reservation = Reservation::schedule(test_schedule(2, None)).unwrap();
        assert_eq!(reservation.status(), ReservationStatus::Scheduled);
        assert_eq!(reservation.version(), 1);
    }

    #[test]
    fn schedule_accepts_explicit_pending() {
        let reservation =
            Reservation::schedule(test_schedule(1, Some(ReservationStatus::Pending))).unwrap();
        assert_eq!(reservation.status(), ReservationStatus::Pending);
    }

    #[test]
    fn schedule_rejects_zero_quantity() {
        let err = Reservation::schedule(test_schedule(0, None)).unwrap_err();
        assert!(matches!(err, DomainError::InvalidAmount(_)));
    }

    #[test]
    fn schedule_rejects_started_or_terminal_initial_status() {
        for status in [ReservationStatus::InProgress, ReservationStatus::Returned] {
            let err = Reservation::schedule(test_schedule(1, Some(status))).unwrap_err();
            assert!(matches!(err, DomainError::IllegalTransition(_)));
        }
    }

    #[test]
    fn lifecycle_walks_scheduled_in_progress_returned() {
        let mut reservation = Reservation::schedule(test_schedule(1, None)).unwrap();

        let events = amend(&reservation, None, None, Some(ReservationStatus::InProgress)).unwrap();
        assert_eq!(events.len(), 1);
        for e in &events {
            reservation.apply(e);
        }
        assert_eq!(reservation.status(), ReservationStatus::InProgress);
        assert_eq!(reservation.version(), 2);

        let events = amend(&reservation, None, None, Some(ReservationStatus::Returned)).unwrap();
        for e in &events {
            reservation.apply(e);
        }
        assert_eq!(reservation.status(), ReservationStatus::Returned);
        assert_eq!(reservation.version(), 3);
    }

    #[test]
    fn skipping_in_progress_is_illegal() {
        let reservation = Reservation::schedule(test_schedule(1, None)).unwrap();
        let err = amend(&reservation, None, None, Some(ReservationStatus::Returned)).unwrap_err();
        assert!(matches!(err, DomainError::IllegalTransition(_)));
    }

    #[test]
    fn returned_reservation_rejects_every_amendment() {
        let mut reservation = Reservation::schedule(test_schedule(1, None)).unwrap();
        for status in [ReservationStatus::InProgress, ReservationStatus::Returned] {
            let events = amend(&reservation, None, None, Some(status)).unwrap();
            for e in &events {
                reservation.apply(e);
            }
        }

        let err = amend(&reservation, None, Some(2), None).unwrap_err();
        assert_eq!(err, DomainError::TerminalStateImmutable);

        let err = amend(&reservation, Some(test_period(4, 6)), None, None).unwrap_err();
        assert_eq!(err, DomainError::TerminalStateImmutable);

        // Even a (never legal) status change reports immutability first.
        let err = amend(&reservation, None, None, Some(ReservationStatus::Scheduled)).unwrap_err();
        assert_eq!(err, DomainError::TerminalStateImmutable);
    }

    #[test]
    fn amendment_is_all_or_nothing() {
        let reservation = Reservation::schedule(test_schedule(1, None)).unwrap();
        let before = reservation.clone();

        // Valid quantity bundled with an illegal transition: nothing emits.
        let err = amend(
            &reservation,
            None,
            Some(3),
            Some(ReservationStatus::Returned),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::IllegalTransition(_)));
        assert_eq!(reservation, before);
    }

    #[test]
    fn empty_amendment_emits_nothing() {
        let reservation = Reservation::schedule(test_schedule(1, None)).unwrap();
        let events = amend(&reservation, None, None, None).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let reservation = Reservation::schedule(test_schedule(1, None)).unwrap();
        let before = reservation.clone();

        let _ = amend(&reservation, Some(test_period(2, 4)), Some(2), None).unwrap();
        assert_eq!(reservation, before);
    }

    #[test]
    fn delete_rule_blocks_only_in_progress() {
        let mut reservation = Reservation::schedule(test_schedule(1, None)).unwrap();
        reservation.ensure_deletable().unwrap();

        let events = amend(&reservation, None, None, Some(ReservationStatus::InProgress)).unwrap();
        for e in &events {
            reservation.apply(e);
        }
        assert_eq!(
            reservation.ensure_deletable().unwrap_err(),
            DomainError::DeleteNotAllowed
        );

        let events = amend(&reservation, None, None, Some(ReservationStatus::Returned)).unwrap();
        for e in &events {
            reservation.apply(e);
        }
        // Returned stays deletable, as the rule is written.
        reservation.ensure_deletable().unwrap();
    }
}
