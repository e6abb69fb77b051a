use barberbook_core::{ApplicationError, CustomerId, ServiceId};

use crate::repositories::Repositories;
use crate::scheduler::BookingLock;

/// A customer or service has been removed from its collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntityDeleted {
    Customer(CustomerId),
    Service(ServiceId),
}

/// Keeps the appointment collection free of references to deleted entities.
///
/// There is no rollback: when the entity delete succeeds and the appointment
/// rewrite fails, the error is returned and the orphans stay until the next
/// delete of the same entity.
#[derive(Clone)]
pub struct CascadeCoordinator {
    repositories: Repositories,
    booking_lock: BookingLock,
}

impl CascadeCoordinator {
    pub fn new(repositories: Repositories, booking_lock: BookingLock) -> Self {
        Self { repositories, booking_lock }
    }

    /// Removes every appointment referencing the deleted entity and returns
    /// how many were dropped.
    pub async fn handle(&self, event: &EntityDeleted) -> Result<usize, ApplicationError> {
        let _guard = self.booking_lock.lock().await;
        let appointments = &self.repositories.appointments;

        let removed = match event {
            EntityDeleted::Customer(id) => appointments.remove_for_customer(id).await,
            EntityDeleted::Service(id) => appointments.remove_for_service(id).await,
        }
        .map_err(|error| {
            tracing::error!(
                event_name = "cascade.failed",
                trigger = ?event,
                error = %error,
                "appointment cleanup failed after entity delete"
            );
            ApplicationError::from(error)
        })?;

        tracing::info!(
            event_name = "cascade.appointments_removed",
            trigger = ?event,
            removed,
            "removed appointments of deleted entity"
        );
        Ok(removed)
    }

    pub async fn delete_customer(&self, id: &CustomerId) -> Result<usize, ApplicationError> {
        self.repositories.customers.remove(id).await?;
        self.handle(&EntityDeleted::Customer(id.clone())).await
    }

    pub async fn delete_service(&self, id: &ServiceId) -> Result<usize, ApplicationError> {
        self.repositories.services.remove(id).await?;
        self.handle(&EntityDeleted::Service(id.clone())).await
    }
}
