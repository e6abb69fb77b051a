use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AppointmentId, CustomerId, ServiceId};
use super::slot::{AppointmentDate, Slot, StartTime};
use crate::errors::DomainError;

/// Appointment status. Only `booked` is assigned by the scheduler; any other
/// value a client sends is kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    Booked,
    Completed,
    Cancelled,
    Other(String),
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Booked => "booked",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for AppointmentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "booked" => Self::Booked,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            _ => Self::Other(value),
        }
    }
}

impl From<AppointmentStatus> for String {
    fn from(value: AppointmentStatus) -> Self {
        match value {
            AppointmentStatus::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub customer_id: CustomerId,
    pub service_id: ServiceId,
    pub appointment_date: AppointmentDate,
    pub start_time: StartTime,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    pub fn slot(&self) -> Slot {
        Slot::new(self.appointment_date, self.start_time)
    }

    pub fn from_booking(
        id: AppointmentId,
        booking: BookingRequest,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            customer_id: booking.customer_id,
            service_id: booking.service_id,
            appointment_date: booking.slot.date,
            start_time: booking.slot.time,
            status: AppointmentStatus::Booked,
            created_at,
        }
    }
}

/// Booking payload as received from a client.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AppointmentRequest {
    #[serde(default, rename = "customerId", alias = "customer_id")]
    pub customer_id: Option<CustomerId>,
    #[serde(default, rename = "serviceId", alias = "service_id")]
    pub service_id: Option<ServiceId>,
    #[serde(default)]
    pub appointment_date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
}

/// A booking whose fields are present and well formed. References are not
/// resolved yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingRequest {
    pub customer_id: CustomerId,
    pub service_id: ServiceId,
    pub slot: Slot,
}

impl AppointmentRequest {
    pub fn validate(self) -> Result<BookingRequest, DomainError> {
        let customer_id = self
            .customer_id
            .filter(|id| !id.is_blank())
            .ok_or(DomainError::MissingField("customerId"))?;
        let service_id = self
            .service_id
            .filter(|id| !id.is_blank())
            .ok_or(DomainError::MissingField("serviceId"))?;
        let date = required(self.appointment_date, "appointment_date")?;
        let time = required(self.start_time, "start_time")?;

        let slot = Slot::new(AppointmentDate::parse(&date)?, StartTime::parse(&time)?);
        Ok(BookingRequest { customer_id, service_id, slot })
    }
}

/// Partial update of an appointment. Only keys present in the payload change.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AppointmentPatch {
    #[serde(default, rename = "customerId", alias = "customer_id")]
    pub customer_id: Option<CustomerId>,
    #[serde(default, rename = "serviceId", alias = "service_id")]
    pub service_id: Option<ServiceId>,
    #[serde(default)]
    pub appointment_date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Validated form of [`AppointmentPatch`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppointmentChanges {
    pub customer_id: Option<CustomerId>,
    pub service_id: Option<ServiceId>,
    pub appointment_date: Option<AppointmentDate>,
    pub start_time: Option<StartTime>,
    pub status: Option<AppointmentStatus>,
}

impl AppointmentPatch {
    pub fn validate(self) -> Result<AppointmentChanges, DomainError> {
        if self.customer_id.as_ref().is_some_and(CustomerId::is_blank) {
            return Err(DomainError::validation("customerId", "must not be empty"));
        }
        if self.service_id.as_ref().is_some_and(ServiceId::is_blank) {
            return Err(DomainError::validation("serviceId", "must not be empty"));
        }
        let status = match self.status {
            Some(status) if status.trim().is_empty() => {
                return Err(DomainError::validation("status", "must not be empty"));
            }
            Some(status) => Some(AppointmentStatus::from(status.trim().to_string())),
            None => None,
        };

        Ok(AppointmentChanges {
            customer_id: self.customer_id,
            service_id: self.service_id,
            appointment_date: self
                .appointment_date
                .as_deref()
                .map(|date| AppointmentDate::parse(date.trim()))
                .transpose()?,
            start_time: self
                .start_time
                .as_deref()
                .map(|time| StartTime::parse(time.trim()))
                .transpose()?,
            status,
        })
    }
}

impl AppointmentChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Slot the appointment would occupy once these changes are applied.
    pub fn effective_slot(&self, current: &Appointment) -> Slot {
        Slot::new(
            self.appointment_date.unwrap_or(current.appointment_date),
            self.start_time.unwrap_or(current.start_time),
        )
    }

    pub fn moves_slot(&self, current: &Appointment) -> bool {
        self.effective_slot(current) != current.slot()
    }

    pub fn apply(self, appointment: &mut Appointment) {
        if let Some(customer_id) = self.customer_id {
            appointment.customer_id = customer_id;
        }
        if let Some(service_id) = self.service_id {
            appointment.service_id = service_id;
        }
        if let Some(date) = self.appointment_date {
            appointment.appointment_date = date;
        }
        if let Some(time) = self.start_time {
            appointment.start_time = time;
        }
        if let Some(status) = self.status {
            appointment.status = status;
        }
    }
}

/// Query filters for listing appointments. Empty values mean "no filter".
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct AppointmentFilter {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, rename = "customerId", alias = "customer_id")]
    pub customer_id: Option<String>,
}

impl AppointmentFilter {
    pub fn matches(&self, appointment: &Appointment) -> bool {
        let date_ok = match active(&self.date) {
            Some(date) => appointment.appointment_date.to_string() == date,
            None => true,
        };
        let customer_ok = match active(&self.customer_id) {
            Some(customer_id) => appointment.customer_id.as_str() == customer_id,
            None => true,
        };
        date_ok && customer_ok
    }
}

/// Appointment row joined with the display fields of its customer and service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub customer_name: Option<String>,
    pub service_title: Option<String>,
    pub duration_min: Option<u32>,
}

fn required(value: Option<String>, field: &'static str) -> Result<String, DomainError> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or(DomainError::MissingField(field))
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|text| !text.is_empty())
}
