//! Abstract document store the league persists into.
//!
//! The store knows three collections of JSON documents keyed by string. The
//! league writes whole documents and never reads back outside `load`.

pub mod memory;

use anyhow::Result;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

pub use memory::MemoryRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Teams,
    Results,
    Ratings,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Teams, Collection::Results, Collection::Ratings];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Teams => "teams",
            Collection::Results => "results",
            Collection::Ratings => "ratings",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full contents of the store, as returned by `Repository::load`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Documents {
    pub teams: BTreeMap<String, Value>,
    pub results: BTreeMap<String, Value>,
    pub ratings: BTreeMap<String, Value>,
}

impl Documents {
    pub fn get(&self, collection: Collection) -> &BTreeMap<String, Value> {
        match collection {
            Collection::Teams => &self.teams,
            Collection::Results => &self.results,
            Collection::Ratings => &self.ratings,
        }
    }

    pub fn get_mut(&mut self, collection: Collection) -> &mut BTreeMap<String, Value> {
        match collection {
            Collection::Teams => &mut self.teams,
            Collection::Results => &mut self.results,
            Collection::Ratings => &mut self.ratings,
        }
    }

    pub fn apply(&mut self, write: &Write) {
        match write {
            Write::Save {
                collection,
                key,
                value,
            } => {
                self.get_mut(*collection).insert(key.clone(), value.clone());
            }
            Write::Delete { collection, key } => {
                self.get_mut(*collection).remove(key);
            }
        }
    }
}

/// One document-level change
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    Save {
        collection: Collection,
        key: String,
        value: Value,
    },
    Delete {
        collection: Collection,
        key: String,
    },
}

impl Write {
    pub fn save(collection: Collection, key: impl Into<String>, value: Value) -> Self {
        Write::Save {
            collection,
            key: key.into(),
            value,
        }
    }

    pub fn delete(collection: Collection, key: impl Into<String>) -> Self {
        Write::Delete {
            collection,
            key: key.into(),
        }
    }

    pub fn collection(&self) -> Collection {
        match self {
            Write::Save { collection, .. } | Write::Delete { collection, .. } => *collection,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Write::Save { key, .. } | Write::Delete { key, .. } => key,
        }
    }
}

pub type Callback = Box<dyn Fn(&Write) + Send + Sync>;

pub trait Repository: Send + Sync {
    fn load(&self) -> Result<Documents>;

    fn save(&self, collection: Collection, key: &str, value: &Value) -> Result<()>;

    fn delete(&self, collection: Collection, key: &str) -> Result<()>;

    /// Registers `callback` for every change stored in `collection`.
    fn subscribe(&self, collection: Collection, callback: Callback);

    /// Stores a batch of writes. Implementations with transactions apply the
    /// batch atomically; the default applies writes one by one.
    fn commit(&self, writes: &[Write]) -> Result<()> {
        for write in writes {
            match write {
                Write::Save {
                    collection,
                    key,
                    value,
                } => self.save(*collection, key, value)?,
                Write::Delete { collection, key } => self.delete(*collection, key)?,
            }
        }
        Ok(())
    }
}

impl<R: Repository + ?Sized> Repository for Arc<R> {
    fn load(&self) -> Result<Documents> {
        (**self).load()
    }

    fn save(&self, collection: Collection, key: &str, value: &Value) -> Result<()> {
        (**self).save(collection, key, value)
    }

    fn delete(&self, collection: Collection, key: &str) -> Result<()> {
        (**self).delete(collection, key)
    }

    fn subscribe(&self, collection: Collection, callback: Callback) {
        (**self).subscribe(collection, callback)
    }

    fn commit(&self, writes: &[Write]) -> Result<()> {
        (**self).commit(writes)
    }
}

/// Callback registry shared by repository implementations.
///
/// Callbacks run outside the registry lock, so a callback may subscribe or
/// write to the same repository.
#[derive(Default)]
pub struct Subscribers {
    callbacks: Mutex<Vec<(Collection, SharedCallback)>>,
}

type SharedCallback = Arc<dyn Fn(&Write) + Send + Sync>;

impl Subscribers {
    pub fn add(&self, collection: Collection, callback: Callback) {
        self.lock().push((collection, Arc::from(callback)));
    }

    pub fn notify(&self, write: &Write) {
        let matching: Vec<SharedCallback> = self
            .lock()
            .iter()
            .filter(|(collection, _)| *collection == write.collection())
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in matching {
            callback(write);
        }
    }

    pub fn notify_all(&self, writes: &[Write]) {
        for write in writes {
            self.notify(write);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Collection, SharedCallback)>> {
        self.callbacks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
