use std::sync::Arc;

use rust_decimal::Decimal;
use tempfile::TempDir;

use barberbook_core::{
    AppointmentFilter, AppointmentId, AppointmentPatch, AppointmentRequest, AppointmentStatus,
    ApplicationError, Customer, CustomerId, DomainError, EntityKind, NewCustomer, NewService,
    Service,
};
use barberbook_db::store::MemoryBackend;
use barberbook_db::{
    connect, connect_in_memory, provision, AppointmentScheduler, CascadeCoordinator, Collection,
    EntityDeleted, RecordStore, Repositories,
};

type ContractResult<T = ()> = Result<T, String>;

macro_rules! require {
    ($cond:expr) => {
        if !$cond {
            return Err(format!("assertion failed: `{}`", stringify!($cond)));
        }
    };
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            return Err(format!($($arg)*));
        }
    };
}

macro_rules! require_eq {
    ($left:expr, $right:expr) => {
        if $left != $right {
            return Err(format!(
                "assertion failed: `left == right` (`{:?}` != `{:?}`)",
                $left,
                $right
            ));
        }
    };
}

struct Harness {
    repositories: Repositories,
    scheduler: AppointmentScheduler,
    cascade: CascadeCoordinator,
    backend: Option<Arc<MemoryBackend>>,
}

impl Harness {
    fn over(store: RecordStore, backend: Option<Arc<MemoryBackend>>) -> Self {
        let repositories = Repositories::from_store(store);
        let scheduler = AppointmentScheduler::new(repositories.clone());
        let cascade = CascadeCoordinator::new(repositories.clone(), scheduler.booking_lock());
        Self { repositories, scheduler, cascade, backend }
    }

    async fn in_memory() -> ContractResult<Self> {
        let (store, backend) = connect_in_memory();
        provision(&store).await.map_err(|err| err.to_string())?;
        Ok(Self::over(store, Some(backend)))
    }

    async fn customer(&self, name: &str) -> ContractResult<Customer> {
        self.repositories
            .customers
            .create(NewCustomer { name: Some(name.to_string()), ..NewCustomer::default() })
            .await
            .map_err(|err| err.to_string())
    }

    async fn service(&self, title: &str) -> ContractResult<Service> {
        self.repositories
            .services
            .create(NewService {
                title: Some(title.to_string()),
                duration_min: Some(30),
                price: Some(Decimal::new(15, 0)),
            })
            .await
            .map_err(|err| err.to_string())
    }

    async fn book(
        &self,
        customer: &Customer,
        service: &Service,
        date: &str,
        time: &str,
    ) -> Result<barberbook_core::Appointment, ApplicationError> {
        self.scheduler.create(request(customer.id.as_str(), service.id.as_str(), date, time)).await
    }
}

fn request(customer_id: &str, service_id: &str, date: &str, time: &str) -> AppointmentRequest {
    AppointmentRequest {
        customer_id: Some(customer_id.into()),
        service_id: Some(service_id.into()),
        appointment_date: Some(date.to_string()),
        start_time: Some(time.to_string()),
    }
}

#[tokio::test]
async fn booking_filtering_and_double_booking() -> ContractResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let store = connect(dir.path().join("data"));
    provision(&store).await.map_err(|err| err.to_string())?;
    let harness = Harness::over(store, None);

    let customer = harness
        .repositories
        .customers
        .create(NewCustomer {
            name: Some("Test User".to_string()),
            phone: Some("012".to_string()),
            email: None,
        })
        .await
        .map_err(|err| err.to_string())?;
    require!(!customer.id.is_blank(), "customer should get an id");
    require_eq!(customer.name.as_str(), "Test User");

    let service = harness.service("Cut").await?;
    let booked = harness
        .book(&customer, &service, "2025-04-20", "10:00")
        .await
        .map_err(|err| err.to_string())?;
    require_eq!(booked.customer_id, customer.id);
    require_eq!(booked.status, AppointmentStatus::Booked);

    let filter =
        AppointmentFilter { date: Some("2025-04-20".to_string()), customer_id: None };
    let listed = harness.scheduler.list(&filter).await.map_err(|err| err.to_string())?;
    require_eq!(listed.len(), 1);
    require_eq!(listed[0].appointment.id, booked.id);
    require_eq!(listed[0].customer_name.as_deref(), Some("Test User"));
    require_eq!(listed[0].service_title.as_deref(), Some("Cut"));

    let other = harness.customer("Second Customer").await?;
    let second = harness.book(&other, &service, "2025-04-20", "10:00").await;
    require!(
        matches!(second, Err(ApplicationError::Domain(DomainError::SlotConflict(_)))),
        "second booking of the same slot should conflict, got {second:?}"
    );

    let all = harness
        .scheduler
        .list(&AppointmentFilter::default())
        .await
        .map_err(|err| err.to_string())?;
    require_eq!(all.len(), 1);
    Ok(())
}

#[tokio::test]
async fn status_only_update_keeps_the_slot() -> ContractResult {
    let harness = Harness::in_memory().await?;
    let customer = harness.customer("Test User").await?;
    let service = harness.service("Cut").await?;
    let booked = harness
        .book(&customer, &service, "2025-04-20", "10:00")
        .await
        .map_err(|err| err.to_string())?;

    let patch = AppointmentPatch { status: Some("completed".to_string()), ..Default::default() };
    let updated =
        harness.scheduler.update(&booked.id, patch).await.map_err(|err| err.to_string())?;

    require_eq!(updated.status, AppointmentStatus::Completed);
    require_eq!(updated.slot(), booked.slot());
    require_eq!(updated.created_at, booked.created_at);
    Ok(())
}

#[tokio::test]
async fn moving_onto_a_taken_slot_conflicts_but_moving_elsewhere_succeeds() -> ContractResult {
    let harness = Harness::in_memory().await?;
    let customer = harness.customer("Test User").await?;
    let service = harness.service("Cut").await?;
    let first = harness
        .book(&customer, &service, "2025-04-20", "10:00")
        .await
        .map_err(|err| err.to_string())?;
    harness
        .book(&customer, &service, "2025-04-20", "11:00")
        .await
        .map_err(|err| err.to_string())?;

    let onto_taken =
        AppointmentPatch { start_time: Some("11:00".to_string()), ..Default::default() };
    let result = harness.scheduler.update(&first.id, onto_taken).await;
    require!(
        matches!(result, Err(ApplicationError::Domain(DomainError::SlotConflict(_)))),
        "moving onto a taken slot should conflict, got {result:?}"
    );

    let elsewhere =
        AppointmentPatch { start_time: Some("12:30".to_string()), ..Default::default() };
    let moved =
        harness.scheduler.update(&first.id, elsewhere).await.map_err(|err| err.to_string())?;
    require_eq!(moved.start_time.to_string(), "12:30");
    Ok(())
}

#[tokio::test]
async fn empty_patch_leaves_the_appointment_unchanged() -> ContractResult {
    let harness = Harness::in_memory().await?;
    let customer = harness.customer("Test User").await?;
    let service = harness.service("Cut").await?;
    let booked = harness
        .book(&customer, &service, "2025-04-20", "10:00")
        .await
        .map_err(|err| err.to_string())?;

    let same = harness
        .scheduler
        .update(&booked.id, AppointmentPatch::default())
        .await
        .map_err(|err| err.to_string())?;
    require_eq!(same, booked);
    Ok(())
}

#[tokio::test]
async fn dangling_references_are_rejected() -> ContractResult {
    let harness = Harness::in_memory().await?;
    let customer = harness.customer("Test User").await?;
    let service = harness.service("Cut").await?;

    let orphan = request("ghost", service.id.as_str(), "2025-04-20", "10:00");
    let result = harness.scheduler.create(orphan).await;
    require!(
        matches!(
            result,
            Err(ApplicationError::Domain(DomainError::UnknownReference {
                entity: EntityKind::Customer,
                ..
            }))
        ),
        "unknown customer should be rejected, got {result:?}"
    );

    let booked = harness
        .book(&customer, &service, "2025-04-20", "10:00")
        .await
        .map_err(|err| err.to_string())?;
    let patch = AppointmentPatch { service_id: Some("ghost".into()), ..Default::default() };
    let result = harness.scheduler.update(&booked.id, patch).await;
    require!(
        matches!(
            result,
            Err(ApplicationError::Domain(DomainError::UnknownReference {
                entity: EntityKind::Service,
                ..
            }))
        ),
        "unknown service should be rejected on update, got {result:?}"
    );
    Ok(())
}

#[tokio::test]
async fn missing_and_unknown_appointments() -> ContractResult {
    let harness = Harness::in_memory().await?;
    let unknown = AppointmentId::from("missing");

    let fetched = harness.scheduler.get(&unknown).await;
    require!(
        matches!(fetched, Err(ApplicationError::Domain(DomainError::NotFound { .. }))),
        "get of unknown id should be not found"
    );

    let patch = AppointmentPatch { status: Some("completed".to_string()), ..Default::default() };
    let updated = harness.scheduler.update(&unknown, patch).await;
    require!(
        matches!(updated, Err(ApplicationError::Domain(DomainError::NotFound { .. }))),
        "update of unknown id should be not found"
    );

    harness.scheduler.delete(&unknown).await.map_err(|err| err.to_string())?;
    harness.scheduler.delete(&unknown).await.map_err(|err| err.to_string())?;
    Ok(())
}

#[tokio::test]
async fn deleting_a_customer_cascades_to_exactly_their_appointments() -> ContractResult {
    let harness = Harness::in_memory().await?;
    let leaving = harness.customer("Leaving").await?;
    let staying = harness.customer("Staying").await?;
    let service = harness.service("Cut").await?;

    for (date, time) in [("2025-04-20", "10:00"), ("2025-04-21", "10:00")] {
        harness.book(&leaving, &service, date, time).await.map_err(|err| err.to_string())?;
    }
    let kept = harness
        .book(&staying, &service, "2025-04-20", "11:00")
        .await
        .map_err(|err| err.to_string())?;

    let removed =
        harness.cascade.delete_customer(&leaving.id).await.map_err(|err| err.to_string())?;
    require_eq!(removed, 2);

    let remaining = harness
        .repositories
        .appointments
        .list()
        .await
        .map_err(|err| err.to_string())?;
    require_eq!(remaining.len(), 1);
    require_eq!(remaining[0].id, kept.id);

    let services = harness.repositories.services.list().await.map_err(|err| err.to_string())?;
    require_eq!(services.len(), 1);
    let customer = harness
        .repositories
        .customers
        .find_by_id(&leaving.id)
        .await
        .map_err(|err| err.to_string())?;
    require!(customer.is_none(), "deleted customer should be gone");
    Ok(())
}

#[tokio::test]
async fn deleting_a_service_cascades_and_repeats_are_harmless() -> ContractResult {
    let harness = Harness::in_memory().await?;
    let customer = harness.customer("Test User").await?;
    let cut = harness.service("Cut").await?;
    let shave = harness.service("Shave").await?;
    harness.book(&customer, &cut, "2025-04-20", "10:00").await.map_err(|err| err.to_string())?;
    harness.book(&customer, &shave, "2025-04-20", "11:00").await.map_err(|err| err.to_string())?;

    let first = harness.cascade.delete_service(&cut.id).await.map_err(|err| err.to_string())?;
    let again = harness.cascade.delete_service(&cut.id).await.map_err(|err| err.to_string())?;
    require_eq!(first, 1);
    require_eq!(again, 0);

    let direct = harness
        .cascade
        .handle(&EntityDeleted::Customer(CustomerId::from("nobody")))
        .await
        .map_err(|err| err.to_string())?;
    require_eq!(direct, 0);
    Ok(())
}

#[tokio::test]
async fn failed_cascade_write_surfaces_as_storage_error_without_rollback() -> ContractResult {
    let harness = Harness::in_memory().await?;
    let customer = harness.customer("Test User").await?;
    let service = harness.service("Cut").await?;
    harness.book(&customer, &service, "2025-04-20", "10:00").await.map_err(|err| err.to_string())?;

    let backend = harness.backend.as_ref().ok_or("memory backend expected")?;
    backend.fail_writes(Collection::Appointments).await;

    let result = harness.cascade.delete_customer(&customer.id).await;
    require!(
        matches!(result, Err(ApplicationError::Storage(_))),
        "cascade write failure should be a storage error, got {result:?}"
    );

    let customer_after = harness
        .repositories
        .customers
        .find_by_id(&customer.id)
        .await
        .map_err(|err| err.to_string())?;
    require!(customer_after.is_none(), "customer delete is not rolled back");

    let orphans =
        harness.repositories.appointments.list().await.map_err(|err| err.to_string())?;
    require_eq!(orphans.len(), 1);
    Ok(())
}

#[tokio::test]
async fn concurrent_bookings_of_one_slot_admit_exactly_one() -> ContractResult {
    let harness = Arc::new(Harness::in_memory().await?);
    let service = harness.service("Cut").await?;
    let mut customers = Vec::new();
    for index in 0..8 {
        customers.push(harness.customer(&format!("Customer {index}")).await?);
    }

    let mut handles = Vec::new();
    for customer in customers {
        let harness = harness.clone();
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            harness.book(&customer, &service, "2025-04-20", "10:00").await
        }));
    }

    let mut booked = 0;
    for handle in handles {
        if handle.await.map_err(|err| err.to_string())?.is_ok() {
            booked += 1;
        }
    }
    require_eq!(booked, 1);
    Ok(())
}
