use async_trait::async_trait;

use barberbook_core::{
    Appointment, AppointmentChanges, AppointmentId, BookingRequest, CustomerId, ServiceId,
};

use super::{AppointmentRepository, RepositoryError};
use crate::store::RecordStore;

pub struct StoreAppointmentRepository {
    store: RecordStore,
}

impl StoreAppointmentRepository {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AppointmentRepository for StoreAppointmentRepository {
    async fn list(&self) -> Result<Vec<Appointment>, RepositoryError> {
        Ok(self.store.list::<Appointment>().await?)
    }

    async fn find_by_id(
        &self,
        id: &AppointmentId,
    ) -> Result<Option<Appointment>, RepositoryError> {
        Ok(self.store.get_by_id(id.as_str()).await?)
    }

    async fn insert(&self, booking: BookingRequest) -> Result<Appointment, RepositoryError> {
        let appointment = self
            .store
            .create(|id, created_at| {
                Appointment::from_booking(AppointmentId::from(id), booking, created_at)
            })
            .await?;
        Ok(appointment)
    }

    async fn apply(
        &self,
        id: &AppointmentId,
        changes: AppointmentChanges,
    ) -> Result<Option<Appointment>, RepositoryError> {
        let updated = self
            .store
            .update(id.as_str(), |appointment: &mut Appointment| changes.apply(appointment))
            .await?;
        Ok(updated)
    }

    async fn remove(&self, id: &AppointmentId) -> Result<bool, RepositoryError> {
        Ok(self.store.remove::<Appointment>(id.as_str()).await?)
    }

    async fn remove_for_customer(&self, id: &CustomerId) -> Result<usize, RepositoryError> {
        let removed = self
            .store
            .retain(|appointment: &Appointment| &appointment.customer_id != id)
            .await?;
        Ok(removed)
    }

    async fn remove_for_service(&self, id: &ServiceId) -> Result<usize, RepositoryError> {
        let removed = self
            .store
            .retain(|appointment: &Appointment| &appointment.service_id != id)
            .await?;
        Ok(removed)
    }
}
