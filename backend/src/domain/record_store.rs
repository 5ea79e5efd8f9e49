//! Validated append-only record store for one named collection.
//!
//! The store owns the whole lifecycle of a stored record: it assigns the
//! identity and creation timestamp, serialises the full collection, and
//! hands the bytes to a [`CollectionMedium`]. A collection-scoped
//! [`RwLock`] serialises read-modify-write cycles so two concurrent appends
//! never lose one another.
//!
//! Medium faults, malformed contents, and failed blocking workers all
//! surface as [`RecordStoreError::Storage`]. Nothing is written until the
//! complete new collection has been encoded, so a failed write leaves the
//! previous contents in place.

use std::marker::PhantomData;
use std::sync::Arc;

use mockable::Clock;
use tokio::sync::RwLock;
use tokio::task::spawn_blocking;
use tracing::{debug, error};

use crate::domain::ports::{CollectionMedium, CollectionMediumError, define_port_error};
use crate::domain::{Error, Record, RecordId, TraceId};

define_port_error! {
    /// Errors raised by [`RecordStore`] operations.
    pub enum RecordStoreError {
        /// No record with the requested identity exists.
        NotFound { kind: String, id: String } => "{kind} {id} not found",
        /// A caller-supplied check refused the write.
        Conflict { message: String } => "{message}",
        /// The backing medium failed or held malformed contents.
        Storage { collection: String, message: String } =>
            "{collection} storage failed: {message}",
    }
}

impl From<RecordStoreError> for Error {
    fn from(value: RecordStoreError) -> Self {
        match value {
            RecordStoreError::NotFound { .. } => Error::not_found(value.to_string()),
            RecordStoreError::Conflict { message } => Error::conflict(message),
            RecordStoreError::Storage {
                collection,
                message,
            } => {
                error!(%collection, %message, "record store failure");
                Error::internal(format!("{collection} storage failed"))
            }
        }
    }
}

/// Durable, append-oriented collection of records of one kind.
pub struct RecordStore<R: Record> {
    collection: String,
    medium: Arc<dyn CollectionMedium>,
    clock: Arc<dyn Clock>,
    lock: RwLock<()>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> RecordStore<R> {
    /// Build a store for `collection` over the given medium.
    pub fn new(
        collection: impl Into<String>,
        medium: Arc<dyn CollectionMedium>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            collection: collection.into(),
            medium,
            clock,
            lock: RwLock::new(()),
            _record: PhantomData,
        }
    }

    /// Name of the collection this store owns.
    pub fn collection(&self) -> &str {
        self.collection.as_str()
    }

    /// Store a new record built from `draft`.
    ///
    /// Not idempotent: calling twice with the same draft stores two records
    /// with distinct identities.
    pub async fn append(&self, draft: R::Draft) -> Result<R, RecordStoreError> {
        self.append_checked(draft, |_, _| Ok(())).await
    }

    /// Like [`RecordStore::append`], but `check` sees the current collection
    /// under the write lock and may refuse the append.
    pub async fn append_checked<F>(&self, draft: R::Draft, check: F) -> Result<R, RecordStoreError>
    where
        F: FnOnce(&[R], &R::Draft) -> Result<(), RecordStoreError> + Send,
    {
        let _guard = self.lock.write().await;
        let mut records = self.load().await?;
        check(&records, &draft)?;

        let id = fresh_id(&records);
        let record = R::assemble(id, self.clock.utc(), draft);
        records.push(record.clone());
        self.persist(&records).await?;

        debug!(
            collection = %self.collection,
            id = %record.id(),
            count = records.len(),
            "appended {}",
            R::KIND
        );
        Ok(record)
    }

    /// Every record in insertion order.
    pub async fn list_all(&self) -> Result<Vec<R>, RecordStoreError> {
        let _guard = self.lock.read().await;
        self.load().await
    }

    /// Fetch one record by identity.
    pub async fn get(&self, id: &R::Id) -> Result<R, RecordStoreError> {
        let _guard = self.lock.read().await;
        let records = self.load().await?;
        records
            .into_iter()
            .find(|record| record.id() == id)
            .ok_or_else(|| not_found::<R>(id))
    }

    /// First record, in insertion order, matching `predicate`.
    pub async fn find<P>(&self, predicate: P) -> Result<Option<R>, RecordStoreError>
    where
        P: Fn(&R) -> bool + Send,
    {
        let _guard = self.lock.read().await;
        let records = self.load().await?;
        Ok(records.into_iter().find(|record| predicate(record)))
    }

    /// Apply `patch` to the record with identity `id`.
    pub async fn update(&self, id: &R::Id, patch: R::Patch) -> Result<R, RecordStoreError> {
        self.update_checked(id, patch, |_, _, _| Ok(())).await
    }

    /// Like [`RecordStore::update`], but `check` sees the collection, the
    /// current record, and the patch under the write lock.
    pub async fn update_checked<F>(
        &self,
        id: &R::Id,
        patch: R::Patch,
        check: F,
    ) -> Result<R, RecordStoreError>
    where
        F: FnOnce(&[R], &R, &R::Patch) -> Result<(), RecordStoreError> + Send,
    {
        let _guard = self.lock.write().await;
        let mut records = self.load().await?;
        let position = locate(&records, id)?;
        check(&records, &records[position], &patch)?;

        let record = &mut records[position];
        record.apply(patch, self.clock.utc());
        let updated = record.clone();
        self.persist(&records).await?;

        debug!(collection = %self.collection, id = %id, "updated {}", R::KIND);
        Ok(updated)
    }

    /// Delete the record with identity `id`.
    pub async fn delete(&self, id: &R::Id) -> Result<(), RecordStoreError> {
        self.remove(id).await.map(|_| ())
    }

    /// Delete the record with identity `id` and return it.
    pub async fn remove(&self, id: &R::Id) -> Result<R, RecordStoreError> {
        let _guard = self.lock.write().await;
        let mut records = self.load().await?;
        let position = locate(&records, id)?;
        let removed = records.remove(position);
        self.persist(&records).await?;

        debug!(collection = %self.collection, id = %id, "removed {}", R::KIND);
        Ok(removed)
    }

    /// Delete every record matching `predicate`, returning what was removed.
    ///
    /// The medium is left untouched when nothing matches.
    pub async fn remove_where<P>(&self, predicate: P) -> Result<Vec<R>, RecordStoreError>
    where
        P: Fn(&R) -> bool + Send,
    {
        let _guard = self.lock.write().await;
        let records = self.load().await?;
        let (removed, kept): (Vec<R>, Vec<R>) = records.into_iter().partition(|r| predicate(r));
        if !removed.is_empty() {
            self.persist(&kept).await?;
        }
        Ok(removed)
    }

    /// Put back records previously taken out by [`RecordStore::remove`] or
    /// [`RecordStore::remove_where`], unchanged and at the end of the
    /// collection. Records whose identity is already present are skipped.
    pub async fn reinstate(&self, removed: Vec<R>) -> Result<(), RecordStoreError> {
        let _guard = self.lock.write().await;
        let mut records = self.load().await?;
        let before = records.len();
        for record in removed {
            if records.iter().all(|existing| existing.id() != record.id()) {
                records.push(record);
            }
        }
        if records.len() == before {
            return Ok(());
        }
        self.persist(&records).await?;

        debug!(
            collection = %self.collection,
            count = records.len() - before,
            "reinstated {}",
            R::KIND
        );
        Ok(())
    }

    /// Check that the backing medium is readable and well formed.
    pub async fn probe(&self) -> Result<(), RecordStoreError> {
        let _guard = self.lock.read().await;
        self.load().await.map(|_| ())
    }

    async fn load(&self) -> Result<Vec<R>, RecordStoreError> {
        let medium = Arc::clone(&self.medium);
        let bytes = self.blocking(move || medium.read()).await?;
        self.decode(&bytes)
    }

    async fn persist(&self, records: &[R]) -> Result<(), RecordStoreError> {
        let bytes = serde_json::to_vec_pretty(records)
            .map_err(|err| self.storage(format!("encoding failed: {err}")))?;
        let medium = Arc::clone(&self.medium);
        self.blocking(move || medium.replace(&bytes)).await
    }

    async fn blocking<T, J>(&self, job: J) -> Result<T, RecordStoreError>
    where
        T: Send + 'static,
        J: FnOnce() -> Result<T, CollectionMediumError> + Send + 'static,
    {
        match spawn_blocking(TraceId::carry(job)).await {
            Ok(result) => result.map_err(|err| self.storage(err.to_string())),
            Err(join) => Err(self.storage(format!("storage worker failed: {join}"))),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<R>, RecordStoreError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(bytes)
            .map_err(|err| self.storage(format!("malformed collection: {err}")))
    }

    fn storage(&self, message: String) -> RecordStoreError {
        RecordStoreError::storage(self.collection.as_str(), message)
    }
}

fn fresh_id<R: Record>(records: &[R]) -> R::Id {
    loop {
        let candidate = R::Id::generate();
        if records.iter().all(|record| record.id() != &candidate) {
            return candidate;
        }
    }
}

fn locate<R: Record>(records: &[R], id: &R::Id) -> Result<usize, RecordStoreError> {
    records
        .iter()
        .position(|record| record.id() == id)
        .ok_or_else(|| not_found::<R>(id))
}

fn not_found<R: Record>(id: &R::Id) -> RecordStoreError {
    RecordStoreError::not_found(R::KIND, id.to_string())
}

#[cfg(test)]
mod tests;
