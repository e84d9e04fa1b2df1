use serde::{Deserialize, Serialize};

use kitloan_core::{AggregateId, DomainError, DomainResult, Entity};

/// Sport identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SportId(pub AggregateId);

impl SportId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for SportId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A sport category equipment can be tagged with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sport {
    id: SportId,
    name: String,
}

impl Sport {
    pub fn new(id: SportId, name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("sport name cannot be empty"));
        }
        Ok(Self { id, name })
    }

    pub fn id_typed(&self) -> SportId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) -> DomainResult<()> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("sport name cannot be empty"));
        }
        self.name = name;
        Ok(())
    }
}

impl Entity for Sport {
    type Id = SportId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
