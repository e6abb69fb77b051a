pub mod cascade;
pub mod connection;
pub mod migrations;
pub mod repositories;
pub mod scheduler;
pub mod store;

pub use cascade::{CascadeCoordinator, EntityDeleted};
pub use connection::{connect, connect_in_memory};
pub use migrations::{provision, ProvisionReport};
pub use repositories::{
    AppointmentRepository, CustomerRepository, Repositories, RepositoryError, ServiceRepository,
};
pub use scheduler::{AppointmentScheduler, BookingLock};
pub use store::{Collection, CollectionBackend, RecordStore, StoreError};
