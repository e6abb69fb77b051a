use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use barberbook_core::{
    Appointment, AppointmentChanges, AppointmentId, ApplicationError, BookingRequest, Customer,
    CustomerId, CustomerPatch, DomainError, NewCustomer, NewService, Service, ServiceId,
    ServicePatch,
};

use crate::store::{RecordStore, StoreError};

pub mod appointment;
pub mod customer;
pub mod service;

pub use appointment::StoreAppointmentRepository;
pub use customer::StoreCustomerRepository;
pub use service::StoreServiceRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<RepositoryError> for ApplicationError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Store(error) => error.into(),
            RepositoryError::Domain(error) => ApplicationError::Domain(error),
        }
    }
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// All customers ordered by name.
    async fn list(&self) -> Result<Vec<Customer>, RepositoryError>;
    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, RepositoryError>;
    async fn create(&self, input: NewCustomer) -> Result<Customer, RepositoryError>;
    async fn update(
        &self,
        id: &CustomerId,
        patch: CustomerPatch,
    ) -> Result<Option<Customer>, RepositoryError>;
    async fn remove(&self, id: &CustomerId) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// All services ordered by title.
    async fn list(&self) -> Result<Vec<Service>, RepositoryError>;
    async fn find_by_id(&self, id: &ServiceId) -> Result<Option<Service>, RepositoryError>;
    async fn create(&self, input: NewService) -> Result<Service, RepositoryError>;
    async fn update(
        &self,
        id: &ServiceId,
        patch: ServicePatch,
    ) -> Result<Option<Service>, RepositoryError>;
    async fn remove(&self, id: &ServiceId) -> Result<bool, RepositoryError>;
}

/// Raw appointment persistence. Booking rules live in
/// [`crate::scheduler::AppointmentScheduler`].
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Appointment>, RepositoryError>;
    async fn find_by_id(&self, id: &AppointmentId)
        -> Result<Option<Appointment>, RepositoryError>;
    async fn insert(&self, booking: BookingRequest) -> Result<Appointment, RepositoryError>;
    async fn apply(
        &self,
        id: &AppointmentId,
        changes: AppointmentChanges,
    ) -> Result<Option<Appointment>, RepositoryError>;
    async fn remove(&self, id: &AppointmentId) -> Result<bool, RepositoryError>;
    async fn remove_for_customer(&self, id: &CustomerId) -> Result<usize, RepositoryError>;
    async fn remove_for_service(&self, id: &ServiceId) -> Result<usize, RepositoryError>;
}

#[derive(Clone)]
pub struct Repositories {
    pub customers: Arc<dyn CustomerRepository>,
    pub services: Arc<dyn ServiceRepository>,
    pub appointments: Arc<dyn AppointmentRepository>,
}

impl Repositories {
    pub fn from_store(store: RecordStore) -> Self {
        Self {
            customers: Arc::new(StoreCustomerRepository::new(store.clone())),
            services: Arc::new(StoreServiceRepository::new(store.clone())),
            appointments: Arc::new(StoreAppointmentRepository::new(store)),
        }
    }
}

fn sort_key(value: &str) -> String {
    value.to_lowercase()
}
