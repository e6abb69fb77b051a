use serde::Serialize;

use crate::store::{Collection, RecordStore, StoreError};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    pub created: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
}

/// Makes sure every collection exists, writing `[]` for the missing ones.
/// Existing collections are never touched.
pub async fn provision(store: &RecordStore) -> Result<ProvisionReport, StoreError> {
    let mut report = ProvisionReport::default();

    for collection in Collection::ALL {
        if store.ensure_collection(collection).await? {
            tracing::info!(
                event_name = "store.collection_created",
                collection = collection.as_str(),
                location = %store.describe(),
                "created empty collection"
            );
            report.created.push(collection.as_str());
        } else {
            tracing::debug!(
                event_name = "store.collection_exists",
                collection = collection.as_str(),
                "collection already exists, skipping"
            );
            report.skipped.push(collection.as_str());
        }
    }

    Ok(report)
}
