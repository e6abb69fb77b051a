use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::CustomerId;
use super::patch::{non_blank, present};
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Customer creation payload as received from a client.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewCustomer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Validated fields of a customer about to be stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomerDraft {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl NewCustomer {
    pub fn validate(self) -> Result<CustomerDraft, DomainError> {
        let name = non_blank(self.name).ok_or(DomainError::MissingField("name"))?;
        Ok(CustomerDraft { name, phone: non_blank(self.phone), email: non_blank(self.email) })
    }
}

impl Customer {
    pub fn from_draft(id: CustomerId, draft: CustomerDraft, created_at: DateTime<Utc>) -> Self {
        Self { id, name: draft.name, phone: draft.phone, email: draft.email, created_at }
    }
}

/// Partial update. `phone` and `email` may be cleared with an explicit `null`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CustomerPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Option<String>>,
}

impl CustomerPatch {
    pub fn validate(&self) -> Result<(), DomainError> {
        match &self.name {
            Some(name) if name.trim().is_empty() => {
                Err(DomainError::validation("name", "name must not be empty"))
            }
            _ => Ok(()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.email.is_none()
    }

    pub fn apply(self, customer: &mut Customer) {
        if let Some(name) = non_blank(self.name) {
            customer.name = name;
        }
        if let Some(phone) = self.phone {
            customer.phone = non_blank(phone);
        }
        if let Some(email) = self.email {
            customer.email = non_blank(email);
        }
    }
}
