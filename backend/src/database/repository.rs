use anyhow::{Context, Result};
use chrono::Utc;
use log::{info, warn};
use serde_json::Value;

use super::connection::{create_pool, get_connection, DbPool};
use super::{documents, setup};
use crate::store::{Callback, Collection, Documents, Repository, Subscribers, Write};

/// Document store on a SQLite `documents` table
pub struct SqliteRepository {
    pool: DbPool,
    subscribers: Subscribers,
}

impl SqliteRepository {
    pub fn open(database_path: &str) -> Result<Self> {
        info!("Opening league database at {}", database_path);
        Self::new(create_pool(database_path)?)
    }

    pub fn new(pool: DbPool) -> Result<Self> {
        let mut conn = get_connection(&pool)?;
        setup::ensure_schema(&mut conn)?;

        Ok(Self {
            pool,
            subscribers: Subscribers::default(),
        })
    }

    pub fn count(&self, collection: Collection) -> Result<i64> {
        let conn = get_connection(&self.pool)?;
        documents::count_by_collection(&conn, collection.as_str())
    }
}

impl Repository for SqliteRepository {
    fn load(&self) -> Result<Documents> {
        let conn = get_connection(&self.pool)?;
        let rows = documents::list_all(&conn)?;
        let mut loaded = Documents::default();

        for row in rows {
            let Some(collection) = Collection::from_name(&row.collection) else {
                warn!("Skipping document in unknown collection '{}'", row.collection);
                continue;
            };
            let value: Value = serde_json::from_str(&row.value).with_context(|| {
                format!("Failed to parse document {}/{}", row.collection, row.key)
            })?;
            loaded.get_mut(collection).insert(row.key, value);
        }

        Ok(loaded)
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

    /// Applies the whole batch in one transaction.
    fn commit(&self, writes: &[Write]) -> Result<()> {
        if writes.is_empty() {
            return Ok(());
        }

        {
            let mut conn = get_connection(&self.pool)?;
            let tx = conn
                .transaction()
                .context("Failed to start transaction")?;
            let now = Utc::now().naive_utc();

            for write in writes {
                match write {
                    Write::Save {
                        collection,
                        key,
                        value,
                    } => {
                        let json = serde_json::to_string(value)?;
                        documents::upsert_document(&tx, collection.as_str(), key, &json, now)?;
                    }
                    Write::Delete { collection, key } => {
                        documents::delete_document(&tx, collection.as_str(), key)?;
                    }
                }
            }

            tx.commit().context("Failed to commit transaction")?;
        }
        self.subscribers.notify_all(writes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::create_memory_pool;
    use serde_json::json;

    fn repository() -> SqliteRepository {
        SqliteRepository::new(create_memory_pool().unwrap()).unwrap()
    }

    #[test]
    fn test_save_overwrites_and_load_groups_by_collection() {
        let repo = repository();
        repo.save(Collection::Results, "0", &json!({"winnerId": 1, "score": "6-0"}))
            .unwrap();
        repo.save(Collection::Results, "0", &json!({"winnerId": 2, "score": "6-1"}))
            .unwrap();
        repo.save(Collection::Ratings, "Dan", &json!({"ratings": []}))
            .unwrap();

        let docs = repo.load().unwrap();

        assert_eq!(docs.results.len(), 1);
        assert_eq!(docs.results["0"]["winnerId"], json!(2));
        assert!(docs.ratings.contains_key("Dan"));
        assert!(docs.teams.is_empty());
    }

    #[test]
    fn test_commit_deletes_documents() {
        let repo = repository();
        repo.commit(&[
            Write::save(Collection::Results, "1", json!({"winnerId": 3})),
            Write::save(Collection::Results, "2", json!({"winnerId": 4})),
        ])
        .unwrap();
        repo.delete(Collection::Results, "1").unwrap();

        assert_eq!(repo.count(Collection::Results).unwrap(), 1);
    }

    #[test]
    fn test_update_keeps_created_at() {
        let repo = repository();
        repo.save(Collection::Teams, "1", &json!({"id": 1})).unwrap();
        repo.save(Collection::Teams, "1", &json!({"id": 1, "points": 3}))
            .unwrap();

        let conn = get_connection(&repo.pool).unwrap();
        let row = documents::find_document(&conn, "teams", "1")
            .unwrap()
            .unwrap();

        assert!(row.created_at.is_some());
        assert!(row.updated_at >= row.created_at);
        assert!(row.value.contains("\"points\":3"));
    }

    #[test]
    fn test_callback_writes_after_connection_is_released() {
        let repo = std::sync::Arc::new(repository());
        let inner = std::sync::Arc::clone(&repo);
        repo.subscribe(
            Collection::Ratings,
            Box::new(move |write: &Write| {
                inner
                    .save(Collection::Teams, write.key(), &json!({"seen": true}))
                    .unwrap();
            }),
        );

        repo.save(Collection::Ratings, "Dan", &json!({"ratings": []}))
            .unwrap();

        assert_eq!(repo.load().unwrap().teams["Dan"], json!({"seen": true}));
    }
}
