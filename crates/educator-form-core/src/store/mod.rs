//! Key-value storage for form snapshots.
//!
//! The controller only ever reads, writes and deletes one key. Stores hold
//! raw blobs; parsing happens in the controller so a corrupt blob can be
//! told apart from a store failure.

mod memory;
mod schema;
mod sqlite;

pub use memory::*;
pub use schema::*;
pub use sqlite::*;

use thiserror::Error;

/// Storage errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Synchronous string key-value store.
pub trait SnapshotStore {
    /// Read the blob stored under `key`.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write `blob` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, blob: &str) -> StoreResult<()>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove(&mut self, key: &str) -> StoreResult<()>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for Box<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, blob: &str) -> StoreResult<()> {
        (**self).set(key, blob)
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}
