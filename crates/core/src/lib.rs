pub mod config;
pub mod domain;
pub mod errors;
pub mod scheduling;

pub use domain::appointment::{
    Appointment, AppointmentChanges, AppointmentFilter, AppointmentPatch, AppointmentRequest,
    AppointmentStatus, AppointmentView, BookingRequest,
};
pub use domain::customer::{Customer, CustomerDraft, CustomerPatch, NewCustomer};
pub use domain::ids::{AppointmentId, CustomerId, ServiceId};
pub use domain::service::{NewService, Service, ServiceDraft, ServicePatch};
pub use domain::slot::{validate_slot, AppointmentDate, Slot, StartTime};
pub use errors::{ApplicationError, DomainError, EntityKind, InterfaceError};
