use anyhow::{Result, bail};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::{Callback, Collection, Documents, Repository, Subscribers, Write};

/// Process-local store; contents vanish with the process
#[derive(Default)]
pub struct MemoryRepository {
    documents: Mutex<Documents>,
    subscribers: Subscribers,
    read_only: AtomicBool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Documents) -> Self {
        Self {
            documents: Mutex::new(documents),
            ..Self::default()
        }
    }

    /// Makes every following write fail, leaving contents untouched
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Documents {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Documents> {
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.read_only.load(Ordering::SeqCst) {
            bail!("memory store is read-only");
        }
        Ok(())
    }
}

impl Repository for MemoryRepository {
    fn load(&self) -> Result<Documents> {
        Ok(self.snapshot())
    }

    fn save(&self, collection: Collection, key: &str, value: &Value) -> Result<()> {
        self.commit(&[Write::save(collection, key, value.clone())])
    }

    fn delete(&self, collection: Collection, key: &str) -> Result<()> {
        self.commit(&[Write::delete(collection, key)])
    }

    fn subscribe(&self, collection: Collection, callback: Callback) {
        self.subscribers.add(collection, callback);
    }

    fn commit(&self, writes: &[Write]) -> Result<()> {
        self.ensure_writable()?;
        {
            let mut documents = self.lock();
            for write in writes {
                documents.apply(write);
            }
        }
        self.subscribers.notify_all(writes);
        Ok(())
    }
}
