//! Pure scheduling rules: slot uniqueness and the enriched appointment listing.

use std::collections::HashMap;

use crate::domain::appointment::{Appointment, AppointmentFilter, AppointmentView};
use crate::domain::customer::Customer;
use crate::domain::ids::{AppointmentId, CustomerId, ServiceId};
use crate::domain::service::Service;
use crate::domain::slot::Slot;
use crate::errors::DomainError;

/// First appointment occupying `slot`, skipping `exclude` (the appointment
/// being moved, if any). All appointments count, whoever booked them.
pub fn find_conflict<'a>(
    existing: &'a [Appointment],
    slot: Slot,
    exclude: Option<&AppointmentId>,
) -> Option<&'a Appointment> {
    existing
        .iter()
        .filter(|appointment| Some(&appointment.id) != exclude)
        .find(|appointment| appointment.slot() == slot)
}

pub fn ensure_slot_free(
    existing: &[Appointment],
    slot: Slot,
    exclude: Option<&AppointmentId>,
) -> Result<(), DomainError> {
    match find_conflict(existing, slot, exclude) {
        Some(_) => Err(DomainError::SlotConflict(slot)),
        None => Ok(()),
    }
}

/// Filters, joins customer and service display fields, and sorts by slot.
pub fn build_listing(
    appointments: Vec<Appointment>,
    filter: &AppointmentFilter,
    customers: &[Customer],
    services: &[Service],
) -> Vec<AppointmentView> {
    let customers_by_id: HashMap<&CustomerId, &Customer> =
        customers.iter().map(|customer| (&customer.id, customer)).collect();
    let services_by_id: HashMap<&ServiceId, &Service> =
        services.iter().map(|service| (&service.id, service)).collect();

    let mut rows: Vec<AppointmentView> = appointments
        .into_iter()
        .filter(|appointment| filter.matches(appointment))
        .map(|appointment| {
            let customer = customers_by_id.get(&appointment.customer_id);
            let service = services_by_id.get(&appointment.service_id);
            AppointmentView {
                customer_name: customer.map(|customer| customer.name.clone()),
                service_title: service.map(|service| service.title.clone()),
                duration_min: service.map(|service| service.duration_min),
                appointment,
            }
        })
        .collect();

    rows.sort_by_key(|row| row.appointment.slot());
    rows
}
