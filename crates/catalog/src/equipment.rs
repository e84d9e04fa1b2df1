use serde::{Deserialize, Serialize};

use kitloan_core::{AggregateId, DomainError, DomainResult, Entity};

use crate::sport::SportId;

/// Equipment identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EquipmentId(pub AggregateId);

impl EquipmentId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for EquipmentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A pool of identical physical items available for loan.
///
/// `total_units` is the ceiling on how many units may be allocated at the
/// same instant; it is always at least one. Sports are weak references by
/// id; the equipment never owns sport or reservation objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    id: EquipmentId,
    name: String,
    total_units: u32,
    image_url: Option<String>,
    sports: Vec<SportId>,
}

impl Equipment {
    pub fn new(
        id: EquipmentId,
        name: impl Into<String>,
        total_units: u32,
        image_url: Option<String>,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("equipment name cannot be empty"));
        }
        if total_units == 0 {
            return Err(DomainError::validation(
                "equipment must have at least one unit",
            ));
        }
        Ok(Self {
            id,
            name,
            total_units,
            image_url,
            sports: Vec::new(),
        })
    }

    pub fn id_typed(&self) -> EquipmentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_units(&self) -> u32 {
        self.total_units
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn sports(&self) -> &[SportId] {
        &self.sports
    }

    pub fn rename(&mut self, name: impl Into<String>) -> DomainResult<()> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("equipment name cannot be empty"));
        }
        self.name = name;
        Ok(())
    }

    /// Change the pool size.
    ///
    /// Only the local invariant is enforced here; shrinking below the
    /// currently committed quantity is rejected by the admin service,
    /// which can see the reservations.
    pub fn set_total_units(&mut self, total_units: u32) -> DomainResult<()> {
        if total_units == 0 {
            return Err(DomainError::validation(
                "equipment must have at least one unit",
            ));
        }
        self.total_units = total_units;
        Ok(())
    }

    pub fn set_image_url(&mut self, image_url: Option<String>) {
        self.image_url = image_url;
    }

    pub fn attach_sport(&mut self, sport_id: SportId) -> DomainResult<()> {
        if self.sports.contains(&sport_id) {
            return Err(DomainError::conflict(
                "sport is already associated with this equipment",
            ));
        }
        self.sports.push(sport_id);
        Ok(())
    }

    pub fn detach_sport(&mut self, sport_id: SportId) -> DomainResult<()> {
        let before = self.sports.len();
        self.sports.retain(|s| *s != sport_id);
        if self.sports.len() == before {
            return Err(DomainError::not_found());
        }
        Ok(())
    }
}

impl Entity for Equipment {
    type Id = EquipmentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
