//! Equipment and sport administration.
//!
//! Catalog maintenance consumed by the (external) staff-facing layer:
//! name uniqueness, pool resizing against the committed quantity, delete
//! protection while reservations are active, and sport tagging. Browsing
//! members see the [`EquipmentOverview`] read view, which carries the
//! canonical aggregate availability figure.

use serde::Serialize;

use kitloan_catalog::{Equipment, EquipmentId, Sport, SportId};
use kitloan_core::{AggregateId, DomainError, DomainResult};

use crate::availability::{available_units, committed_units};
use crate::store::{EquipmentDirectory, ReservationStore, SportDirectory, StoreError};

/// Partial update of an equipment.
///
/// `image_url` is a double option: absent leaves the url alone,
/// `Some(None)` clears it. Every present field is validated jointly with
/// the others before anything is persisted.
#[derive(Debug, Clone, Default)]
pub struct EquipmentPatch {
    pub name: Option<String>,
    pub total_units: Option<u32>,
    pub image_url: Option<Option<String>>,
}

/// Equipment plus its availability figure, as shown to browsing members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquipmentOverview {
    pub id: EquipmentId,
    pub name: String,
    pub total_units: u32,
    pub available_units: u32,
    pub image_url: Option<String>,
    pub sports: Vec<SportId>,
}

impl EquipmentOverview {
    fn build(equipment: Equipment, available_units: u32) -> Self {
        Self {
            id: equipment.id_typed(),
            name: equipment.name().to_string(),
            total_units: equipment.total_units(),
            available_units,
            image_url: equipment.image_url().map(str::to_string),
            sports: equipment.sports().to_vec(),
        }
    }
}

pub struct EquipmentAdminService<E, S, R> {
    equipment: E,
    sports: S,
    reservations: R,
}

impl<E, S, R> EquipmentAdminService<E, S, R>
where
    E: EquipmentDirectory,
    S: SportDirectory,
    R: ReservationStore,
{
    pub fn new(equipment: E, sports: S, reservations: R) -> Self {
        Self {
            equipment,
            sports,
            reservations,
        }
    }

    pub fn create_equipment(
        &self,
        name: impl Into<String>,
        total_units: u32,
        image_url: Option<String>,
    ) -> DomainResult<Equipment> {
        let equipment = Equipment::new(
            EquipmentId::new(AggregateId::new()),
            name,
            total_units,
            image_url,
        )?;
        if self.equipment.find_by_name(equipment.name()).is_some() {
            return Err(DomainError::conflict(format!(
                "equipment name '{}' is already in use",
                equipment.name()
            )));
        }

        self.equipment
            .insert(equipment.clone())
            .map_err(map_store_error)?;
        tracing::debug!(
            equipment = %equipment.id_typed(),
            name = equipment.name(),
            total_units = equipment.total_units(),
            "equipment created"
        );
        Ok(equipment)
    }

    pub fn update_equipment(
        &self,
        id: EquipmentId,
        patch: EquipmentPatch,
    ) -> DomainResult<Equipment> {
        let mut equipment = self.equipment.find(id).ok_or_else(DomainError::not_found)?;

        if let Some(name) = patch.name {
            equipment.rename(name)?;
            if let Some(other) = self.equipment.find_by_name(equipment.name()) {
                if other.id_typed() != id {
                    return Err(DomainError::conflict(format!(
                        "equipment name '{}' is already in use",
                        equipment.name()
                    )));
                }
            }
        }

        if let Some(total_units) = patch.total_units {
            equipment.set_total_units(total_units)?;
            // The pool may not shrink below what active reservations hold.
            let active = self.reservations.list_active_for_equipment(id);
            let committed = committed_units(id, &active);
            if total_units < committed {
                return Err(DomainError::conflict(format!(
                    "total units cannot drop below the {committed} currently reserved"
                )));
            }
        }

        if let Some(image_url) = patch.image_url {
            equipment.set_image_url(image_url);
        }

        self.equipment.update(&equipment).map_err(map_store_error)?;
        Ok(equipment)
    }

    pub fn delete_equipment(&self, id: EquipmentId) -> DomainResult<()> {
        let equipment = self.equipment.find(id).ok_or_else(DomainError::not_found)?;

        let active = self.reservations.list_active_for_equipment(id);
        if !active.is_empty() {
            return Err(DomainError::conflict(format!(
                "'{}' still has {} active reservation(s)",
                equipment.name(),
                active.len()
            )));
        }

        self.equipment.remove(id).map_err(map_store_error)?;
        tracing::debug!(equipment = %id, "equipment deleted");
        Ok(())
    }

    pub fn create_sport(&self, name: impl Into<String>) -> DomainResult<Sport> {
        let sport = Sport::new(SportId::new(AggregateId::new()), name)?;
        if self.sports.find_by_name(sport.name()).is_some() {
            return Err(DomainError::conflict(format!(
                "sport name '{}' is already in use",
                sport.name()
            )));
        }

        self.sports.insert(sport.clone()).map_err(map_store_error)?;
        Ok(sport)
    }

    pub fn rename_sport(&self, id: SportId, name: impl Into<String>) -> DomainResult<Sport> {
        let mut sport = self.sports.find(id).ok_or_else(DomainError::not_found)?;

        sport.rename(name)?;
        if let Some(other) = self.sports.find_by_name(sport.name()) {
            if other.id_typed() != id {
                return Err(DomainError::conflict(format!(
                    "sport name '{}' is already in use",
                    sport.name()
                )));
            }
        }

        self.sports.update(&sport).map_err(map_store_error)?;
        Ok(sport)
    }

    pub fn delete_sport(&self, id: SportId) -> DomainResult<()> {
        if self.sports.find(id).is_none() {
            return Err(DomainError::NotFound);
        }

        let tagged = self
            .equipment
            .list()
            .into_iter()
            .filter(|e| e.sports().contains(&id))
            .count();
        if tagged > 0 {
            return Err(DomainError::conflict(format!(
                "sport is still associated with {tagged} equipment(s)"
            )));
        }

        self.sports.remove(id).map_err(map_store_error)
    }

    pub fn attach_sport(
        &self,
        equipment_id: EquipmentId,
        sport_id: SportId,
    ) -> DomainResult<Equipment> {
        let mut equipment = self
            .equipment
            .find(equipment_id)
            .ok_or_else(DomainError::not_found)?;
        if self.sports.find(sport_id).is_none() {
            return Err(DomainError::NotFound);
        }

        equipment.attach_sport(sport_id)?;
        self.equipment.update(&equipment).map_err(map_store_error)?;
        Ok(equipment)
    }

    pub fn detach_sport(
        &self,
        equipment_id: EquipmentId,
        sport_id: SportId,
    ) -> DomainResult<Equipment> {
        let mut equipment = self
            .equipment
            .find(equipment_id)
            .ok_or_else(DomainError::not_found)?;

        equipment.detach_sport(sport_id)?;
        self.equipment.update(&equipment).map_err(map_store_error)?;
        Ok(equipment)
    }

    pub fn overview(&self, equipment_id: EquipmentId) -> DomainResult<EquipmentOverview> {
        let equipment = self
            .equipment
            .find(equipment_id)
            .ok_or_else(DomainError::not_found)?;
        let active = self.reservations.list_active_for_equipment(equipment_id);
        let available = available_units(&equipment, &active);
        Ok(EquipmentOverview::build(equipment, available))
    }

    pub fn list_overview(&self) -> Vec<EquipmentOverview> {
        self.equipment
            .list()
            .into_iter()
            .map(|equipment| {
                let active = self
                    .reservations
                    .list_active_for_equipment(equipment.id_typed());
                let available = available_units(&equipment, &active);
                EquipmentOverview::build(equipment, available)
            })
            .collect()
    }

    pub fn list_sports(&self) -> Vec<Sport> {
        self.sports.list()
    }
}

fn map_store_error(err: StoreError) -> DomainError {
    match err {
        StoreError::NotFound => DomainError::NotFound,
        StoreError::Conflict(msg) | StoreError::Unavailable(msg) => DomainError::conflict(msg),
    }
}
