//! Durable record collections.
//!
//! Every collection is a single JSON array that is read in full and rewritten
//! in full. Backends only move bytes; [`RecordStore`] owns encoding, id
//! assignment and the per-collection writer lock.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;

use barberbook_core::{Appointment, ApplicationError, Customer, Service};

pub mod file;
pub mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Customers,
    Services,
    Appointments,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Self::Customers, Self::Services, Self::Appointments];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::Services => "services",
            Self::Appointments => "appointments",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("collection `{collection}` is unavailable: {reason}")]
    Unavailable { collection: Collection, reason: String },
    #[error("collection `{collection}` is corrupt: {reason}")]
    Corrupt { collection: Collection, reason: String },
    #[error("failed to write collection `{collection}`: {reason}")]
    Write { collection: Collection, reason: String },
    #[error("failed to encode collection `{collection}`: {reason}")]
    Encode { collection: Collection, reason: String },
}

impl StoreError {
    pub fn collection(&self) -> Collection {
        match self {
            Self::Unavailable { collection, .. }
            | Self::Corrupt { collection, .. }
            | Self::Write { collection, .. }
            | Self::Encode { collection, .. } => *collection,
        }
    }
}

impl From<StoreError> for ApplicationError {
    fn from(error: StoreError) -> Self {
        ApplicationError::Storage(error.to_string())
    }
}

/// Byte-level persistence for whole collections.
#[async_trait]
pub trait CollectionBackend: Send + Sync {
    /// Human readable location, used in logs and diagnostics.
    fn describe(&self) -> String;

    async fn exists(&self, collection: Collection) -> Result<bool, StoreError>;

    async fn read(&self, collection: Collection) -> Result<Vec<u8>, StoreError>;

    /// Replaces the stored bytes. Readers observe either the previous or the
    /// new content, never a mix.
    async fn write(&self, collection: Collection, contents: &[u8]) -> Result<(), StoreError>;
}

/// A record type stored in exactly one collection.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: Collection;

    fn record_id(&self) -> &str;
}

impl Record for Customer {
    const COLLECTION: Collection = Collection::Customers;

    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

impl Record for Service {
    const COLLECTION: Collection = Collection::Services;

    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

impl Record for Appointment {
    const COLLECTION: Collection = Collection::Appointments;

    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

#[derive(Default)]
struct CollectionLocks {
    customers: Mutex<()>,
    services: Mutex<()>,
    appointments: Mutex<()>,
}

impl CollectionLocks {
    fn get(&self, collection: Collection) -> &Mutex<()> {
        match collection {
            Collection::Customers => &self.customers,
            Collection::Services => &self.services,
            Collection::Appointments => &self.appointments,
        }
    }
}

#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn CollectionBackend>,
    locks: Arc<CollectionLocks>,
}

impl RecordStore {
    pub fn new(backend: Arc<dyn CollectionBackend>) -> Self {
        Self { backend, locks: Arc::new(CollectionLocks::default()) }
    }

    pub fn describe(&self) -> String {
        self.backend.describe()
    }

    pub async fn list<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        self.load(R::COLLECTION).await
    }

    /// First record whose id equals `id`.
    pub async fn get_by_id<R: Record>(&self, id: &str) -> Result<Option<R>, StoreError> {
        let records = self.load::<R>(R::COLLECTION).await?;
        Ok(records.into_iter().find(|record| record.record_id() == id))
    }

    /// Appends a record built from a freshly generated id and creation time.
    pub async fn create<R, F>(&self, build: F) -> Result<R, StoreError>
    where
        R: Record,
        F: FnOnce(String, DateTime<Utc>) -> R + Send,
    {
        let _guard = self.locks.get(R::COLLECTION).lock().await;
        let mut records = self.load::<R>(R::COLLECTION).await?;
        let record = build(uuid::Uuid::new_v4().to_string(), Utc::now());
        records.push(record.clone());
        self.persist(R::COLLECTION, &records).await?;
        Ok(record)
    }

    /// Applies `change` to the record with `id`. `None` when no such record exists.
    pub async fn update<R, F>(&self, id: &str, change: F) -> Result<Option<R>, StoreError>
    where
        R: Record,
        F: FnOnce(&mut R) + Send,
    {
        let _guard = self.locks.get(R::COLLECTION).lock().await;
        let mut records = self.load::<R>(R::COLLECTION).await?;
        let Some(record) = records.iter_mut().find(|record| record.record_id() == id) else {
            return Ok(None);
        };
        change(record);
        let updated = record.clone();
        self.persist(R::COLLECTION, &records).await?;
        Ok(Some(updated))
    }

    /// Removes every record with `id`. Absent ids succeed without a write.
    pub async fn remove<R: Record>(&self, id: &str) -> Result<bool, StoreError> {
        let removed = self.retain::<R, _>(|record| record.record_id() != id).await?;
        Ok(removed > 0)
    }

    /// Keeps the records matching `keep`, returning how many were dropped.
    pub async fn retain<R, F>(&self, mut keep: F) -> Result<usize, StoreError>
    where
        R: Record,
        F: FnMut(&R) -> bool + Send,
    {
        let _guard = self.locks.get(R::COLLECTION).lock().await;
        let mut records = self.load::<R>(R::COLLECTION).await?;
        let before = records.len();
        records.retain(|record| keep(record));
        let removed = before - records.len();
        if removed > 0 {
            self.persist(R::COLLECTION, &records).await?;
        }
        Ok(removed)
    }

    pub async fn replace_all<R: Record>(&self, records: &[R]) -> Result<(), StoreError> {
        let _guard = self.locks.get(R::COLLECTION).lock().await;
        self.persist(R::COLLECTION, records).await
    }

    /// Writes an empty collection unless one already exists. Returns whether
    /// it was created.
    pub async fn ensure_collection(&self, collection: Collection) -> Result<bool, StoreError> {
        let _guard = self.locks.get(collection).lock().await;
        if self.backend.exists(collection).await? {
            return Ok(false);
        }
        self.backend.write(collection, b"[]").await?;
        Ok(true)
    }

    /// Number of entries in `collection`, without decoding them into records.
    pub async fn probe(&self, collection: Collection) -> Result<usize, StoreError> {
        let entries = self.load::<serde_json::Value>(collection).await?;
        Ok(entries.len())
    }

    async fn load<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Vec<T>, StoreError> {
        let bytes = self.backend.read(collection).await?;
        serde_json::from_slice(&bytes)
            .map_err(|error| StoreError::Corrupt { collection, reason: error.to_string() })
    }

    async fn persist<T: Serialize>(
        &self,
        collection: Collection,
        records: &[T],
    ) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(records)
            .map_err(|error| StoreError::Encode { collection, reason: error.to_string() })?;
        self.backend.write(collection, &bytes).await.map_err(|error| {
            tracing::error!(
                event_name = "store.write_failed",
                collection = collection.as_str(),
                error = %error,
                "collection write failed"
            );
            error
        })
    }
}
