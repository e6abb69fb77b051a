use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::ServiceId;
use super::patch::non_blank;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub title: String,
    pub duration_min: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewService {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration_min: Option<i64>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceDraft {
    pub title: String,
    pub duration_min: u32,
    pub price: Decimal,
}

impl NewService {
    pub fn validate(self) -> Result<ServiceDraft, DomainError> {
        let title = non_blank(self.title).ok_or(DomainError::MissingField("title"))?;
        let duration_min = self.duration_min.ok_or(DomainError::MissingField("duration_min"))?;
        let price = self.price.ok_or(DomainError::MissingField("price"))?;

        Ok(ServiceDraft {
            title,
            duration_min: validate_duration(duration_min)?,
            price: validate_price(price)?,
        })
    }
}

impl Service {
    pub fn from_draft(id: ServiceId, draft: ServiceDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            duration_min: draft.duration_min,
            price: draft.price,
            created_at,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ServicePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration_min: Option<i64>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
}

impl ServicePatch {
    pub fn validate(&self) -> Result<(), DomainError> {
        if matches!(&self.title, Some(title) if title.trim().is_empty()) {
            return Err(DomainError::validation("title", "title must not be empty"));
        }
        if let Some(duration_min) = self.duration_min {
            validate_duration(duration_min)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.duration_min.is_none() && self.price.is_none()
    }

    /// Applies already-validated fields; out-of-range values are ignored.
    pub fn apply(self, service: &mut Service) {
        if let Some(title) = non_blank(self.title) {
            service.title = title;
        }
        let duration_min = self.duration_min.and_then(|value| validate_duration(value).ok());
        if let Some(duration_min) = duration_min {
            service.duration_min = duration_min;
        }
        if let Some(price) = self.price.and_then(|value| validate_price(value).ok()) {
            service.price = price;
        }
    }
}

fn validate_duration(duration_min: i64) -> Result<u32, DomainError> {
    u32::try_from(duration_min)
        .ok()
        .filter(|minutes| *minutes > 0)
        .ok_or_else(|| DomainError::validation("duration_min", "must be a positive integer"))
}

fn validate_price(price: Decimal) -> Result<Decimal, DomainError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(DomainError::validation("price", "must not be negative"));
    }
    Ok(price)
}
