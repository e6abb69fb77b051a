//! Appointment booking on top of the repositories.
//!
//! Every check-then-write sequence runs under one booking lock, shared with
//! [`crate::cascade::CascadeCoordinator`], so two requests can never claim the
//! same slot inside this process.

use std::sync::Arc;

use tokio::sync::Mutex;

use barberbook_core::scheduling::{build_listing, ensure_slot_free};
use barberbook_core::{
    Appointment, AppointmentChanges, AppointmentFilter, AppointmentId, AppointmentPatch,
    AppointmentRequest, AppointmentView, ApplicationError, CustomerId, DomainError, EntityKind,
    ServiceId,
};

use crate::repositories::Repositories;

pub type BookingLock = Arc<Mutex<()>>;

#[derive(Clone)]
pub struct AppointmentScheduler {
    repositories: Repositories,
    booking_lock: BookingLock,
}

impl AppointmentScheduler {
    pub fn new(repositories: Repositories) -> Self {
        Self { repositories, booking_lock: Arc::new(Mutex::new(())) }
    }

    pub fn booking_lock(&self) -> BookingLock {
        self.booking_lock.clone()
    }

    pub async fn create(
        &self,
        request: AppointmentRequest,
    ) -> Result<Appointment, ApplicationError> {
        let booking = request.validate()?;

        let _guard = self.booking_lock.lock().await;
        self.ensure_customer(&booking.customer_id).await?;
        self.ensure_service(&booking.service_id).await?;

        let existing = self.repositories.appointments.list().await?;
        ensure_slot_free(&existing, booking.slot, None).map_err(|error| {
            tracing::info!(
                event_name = "appointment.slot_conflict",
                slot = %booking.slot,
                "requested slot is already taken"
            );
            error
        })?;

        let appointment = self.repositories.appointments.insert(booking).await?;
        tracing::info!(
            event_name = "appointment.booked",
            appointment_id = %appointment.id,
            customer_id = %appointment.customer_id,
            service_id = %appointment.service_id,
            slot = %appointment.slot(),
            "appointment booked"
        );
        Ok(appointment)
    }

    pub async fn get(&self, id: &AppointmentId) -> Result<Appointment, ApplicationError> {
        self.repositories
            .appointments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Appointment, id.as_str()).into())
    }

    pub async fn update(
        &self,
        id: &AppointmentId,
        patch: AppointmentPatch,
    ) -> Result<Appointment, ApplicationError> {
        let changes = patch.validate()?;

        let _guard = self.booking_lock.lock().await;
        let current = self.get(id).await?;
        if changes.is_empty() {
            return Ok(current);
        }

        if let Some(customer_id) = &changes.customer_id {
            self.ensure_customer(customer_id).await?;
        }
        if let Some(service_id) = &changes.service_id {
            self.ensure_service(service_id).await?;
        }
        self.ensure_slot_for_move(&current, &changes).await?;

        let updated = self
            .repositories
            .appointments
            .apply(id, changes)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Appointment, id.as_str()))?;

        tracing::info!(
            event_name = "appointment.updated",
            appointment_id = %updated.id,
            slot = %updated.slot(),
            status = %updated.status,
            "appointment updated"
        );
        Ok(updated)
    }

    /// Filtered listing joined with customer and service display fields.
    pub async fn list(
        &self,
        filter: &AppointmentFilter,
    ) -> Result<Vec<AppointmentView>, ApplicationError> {
        let appointments = self.repositories.appointments.list().await?;
        let customers = self.repositories.customers.list().await?;
        let services = self.repositories.services.list().await?;
        Ok(build_listing(appointments, filter, &customers, &services))
    }

    /// Removes the appointment if present. Unknown ids succeed.
    pub async fn delete(&self, id: &AppointmentId) -> Result<(), ApplicationError> {
        let _guard = self.booking_lock.lock().await;
        let removed = self.repositories.appointments.remove(id).await?;
        tracing::info!(
            event_name = "appointment.deleted",
            appointment_id = %id,
            removed,
            "appointment delete processed"
        );
        Ok(())
    }

    async fn ensure_slot_for_move(
        &self,
        current: &Appointment,
        changes: &AppointmentChanges,
    ) -> Result<(), ApplicationError> {
        if !changes.moves_slot(current) {
            return Ok(());
        }
        let existing = self.repositories.appointments.list().await?;
        ensure_slot_free(&existing, changes.effective_slot(current), Some(&current.id))?;
        Ok(())
    }

    async fn ensure_customer(&self, id: &CustomerId) -> Result<(), ApplicationError> {
        match self.repositories.customers.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::unknown_reference(EntityKind::Customer, id.as_str()).into()),
        }
    }

    async fn ensure_service(&self, id: &ServiceId) -> Result<(), ApplicationError> {
        match self.repositories.services.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::unknown_reference(EntityKind::Service, id.as_str()).into()),
        }
    }
}
