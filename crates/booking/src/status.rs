use serde::{Deserialize, Serialize};

use kitloan_core::{DomainError, DomainResult};

/// Reservation status lifecycle.
///
/// `Scheduled` and `Pending` are both "not started, still active";
/// `InProgress` means the equipment is physically out; `Returned` is
/// terminal. Wire form is the screaming variant name (`"IN_PROGRESS"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Scheduled,
    Pending,
    InProgress,
    Returned,
}

impl ReservationStatus {
    /// Any non-terminal status counts against inventory.
    pub fn is_active(self) -> bool {
        !self.is_terminal()
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ReservationStatus::Returned)
    }

    /// The lifecycle graph has exactly three edges; everything else,
    /// including a no-op into the current status, is illegal.
    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Scheduled, InProgress) | (Pending, InProgress) | (InProgress, Returned)
        )
    }

    pub fn validate_transition(self, next: ReservationStatus) -> DomainResult<()> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(DomainError::illegal_transition(format!("{self} -> {next}")))
        }
    }
}

impl core::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            ReservationStatus::Scheduled => "SCHEDULED",
            ReservationStatus::Pending => "PENDING",
            ReservationStatus::InProgress => "IN_PROGRESS",
            ReservationStatus::Returned => "RETURNED",
        };
        f.write_str(s)
    }
}

impl core::str::FromStr for ReservationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SCHEDULED" => Ok(ReservationStatus::Scheduled),
            "PENDING" => Ok(ReservationStatus::Pending),
            "IN_PROGRESS" => Ok(ReservationStatus::InProgress),
            "RETURNED" => Ok(ReservationStatus::Returned),
            other => Err(DomainError::validation(format!(
                "unknown reservation status: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReservationStatus::*;

    const ALL: [ReservationStatus; 4] = [Scheduled, Pending, InProgress, Returned];

    #[test]
    fn only_three_edges_are_legal() {
        let mut legal = Vec::new();
        for from in ALL {
            for to in ALL {
                if from.can_transition_to(to) {
                    legal.push((from, to));
                }
            }
        }
        assert_eq!(
            legal,
            vec![
                (Scheduled, InProgress),
                (Pending, InProgress),
                (InProgress, Returned)
            ]
        );
    }

    #[test]
    fn no_op_transitions_are_illegal() {
        for status in ALL {
            let err = status.validate_transition(status).unwrap_err();
            assert!(matches!(err, DomainError::IllegalTransition(_)));
        }
    }

    #[test]
    fn returned_is_the_only_terminal_status() {
        assert!(Returned.is_terminal());
        for status in [Scheduled, Pending, InProgress] {
            assert!(status.is_active());
        }
    }

    #[test]
    fn wire_form_round_trips() {
        for status in ALL {
            let wire = serde_json::to_string(&status).unwrap();
            assert_eq!(wire, format!("\"{status}\""));
            let parsed: ReservationStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }
}
