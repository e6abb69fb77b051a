use async_trait::async_trait;

use barberbook_core::{NewService, Service, ServiceId, ServicePatch};

use super::{sort_key, RepositoryError, ServiceRepository};
use crate::store::RecordStore;

pub struct StoreServiceRepository {
    store: RecordStore,
}

impl StoreServiceRepository {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ServiceRepository for StoreServiceRepository {
    async fn list(&self) -> Result<Vec<Service>, RepositoryError> {
        let mut services = self.store.list::<Service>().await?;
        services.sort_by_cached_key(|service| sort_key(&service.title));
        Ok(services)
    }

    async fn find_by_id(&self, id: &ServiceId) -> Result<Option<Service>, RepositoryError> {
        Ok(self.store.get_by_id(id.as_str()).await?)
    }

    async fn create(&self, input: NewService) -> Result<Service, RepositoryError> {
        let draft = input.validate()?;
        let service = self
            .store
            .create(|id, created_at| Service::from_draft(ServiceId::from(id), draft, created_at))
            .await?;

        tracing::info!(
            event_name = "service.created",
            service_id = %service.id,
            duration_min = service.duration_min,
            "service created"
        );
        Ok(service)
    }

    async fn update(
        &self,
        id: &ServiceId,
        patch: ServicePatch,
    ) -> Result<Option<Service>, RepositoryError> {
        patch.validate()?;
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }

        let updated = self
            .store
            .update(id.as_str(), |service: &mut Service| patch.apply(service))
            .await?;
        if updated.is_some() {
            tracing::info!(event_name = "service.updated", service_id = %id, "service updated");
        }
        Ok(updated)
    }

    async fn remove(&self, id: &ServiceId) -> Result<bool, RepositoryError> {
        let removed = self.store.remove::<Service>(id.as_str()).await?;
        tracing::info!(
            event_name = "service.deleted",
            service_id = %id,
            removed,
            "service delete processed"
        );
        Ok(removed)
    }
}
