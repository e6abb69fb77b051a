use async_trait::async_trait;

use barberbook_core::{Customer, CustomerId, CustomerPatch, NewCustomer};

use super::{sort_key, CustomerRepository, RepositoryError};
use crate::store::RecordStore;

pub struct StoreCustomerRepository {
    store: RecordStore,
}

impl StoreCustomerRepository {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CustomerRepository for StoreCustomerRepository {
    async fn list(&self) -> Result<Vec<Customer>, RepositoryError> {
        let mut customers = self.store.list::<Customer>().await?;
        customers.sort_by_cached_key(|customer| sort_key(&customer.name));
        Ok(customers)
    }

    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, RepositoryError> {
        Ok(self.store.get_by_id(id.as_str()).await?)
    }

    async fn create(&self, input: NewCustomer) -> Result<Customer, RepositoryError> {
        let draft = input.validate()?;
        let customer = self
            .store
            .create(|id, created_at| Customer::from_draft(CustomerId::from(id), draft, created_at))
            .await?;

        tracing::info!(
            event_name = "customer.created",
            customer_id = %customer.id,
            "customer created"
        );
        Ok(customer)
    }

    async fn update(
        &self,
        id: &CustomerId,
        patch: CustomerPatch,
    ) -> Result<Option<Customer>, RepositoryError> {
        patch.validate()?;
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }

        let updated = self
            .store
            .update(id.as_str(), |customer: &mut Customer| patch.apply(customer))
            .await?;
        if updated.is_some() {
            tracing::info!(event_name = "customer.updated", customer_id = %id, "customer updated");
        }
        Ok(updated)
    }

    async fn remove(&self, id: &CustomerId) -> Result<bool, RepositoryError> {
        let removed = self.store.remove::<Customer>(id.as_str()).await?;
        tracing::info!(
            event_name = "customer.deleted",
            customer_id = %id,
            removed,
            "customer delete processed"
        );
        Ok(removed)
    }
}
