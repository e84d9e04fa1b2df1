use serde::{Deserialize, Serialize};

use kitloan_core::{DomainError, DomainResult, Entity, MemberId};

/// A club member, referenced by reservations for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    id: MemberId,
    name: String,
    email: String,
}

impl Member {
    pub fn new(
        id: MemberId,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("member name cannot be empty"));
        }
        let email = email.into().trim().to_string();
        // Shape check only; deliverability is not a domain concern.
        match email.split_once('@') {
            Some((user, domain)) if !user.is_empty() && !domain.is_empty() => {}
            _ => return Err(DomainError::validation("member email is malformed")),
        }
        Ok(Self { id, name, email })
    }

    pub fn id_typed(&self) -> MemberId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl Entity for Member {
    type Id = MemberId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
