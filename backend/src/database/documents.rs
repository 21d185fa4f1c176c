use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::DocumentRow;

pub fn upsert_document(
    conn: &Connection,
    collection: &str,
    key: &str,
    value: &str,
    updated_at: NaiveDateTime,
) -> Result<()> {
    let sql = "INSERT INTO documents (collection, key, value, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4) ON CONFLICT(collection, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

    conn.execute(sql, params![collection, key, value, updated_at])
        .with_context(|| format!("Failed to save document {collection}/{key}"))
        .map(|_| ())
}

pub fn delete_document(conn: &Connection, collection: &str, key: &str) -> Result<bool> {
    let sql = "DELETE FROM documents WHERE collection = ?1 AND key = ?2";

    conn.execute(sql, params![collection, key])
        .with_context(|| format!("Failed to delete document {collection}/{key}"))
        .map(|deleted| deleted > 0)
}

fn parse_document_row(row: &rusqlite::Row) -> rusqlite::Result<DocumentRow> {
    Ok(DocumentRow {
        collection: row.get(0)?,
        key: row.get(1)?,
        value: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

pub fn find_document(conn: &Connection, collection: &str, key: &str) -> Result<Option<DocumentRow>> {
    let sql = "SELECT collection, key, value, created_at, updated_at FROM documents WHERE collection = ?1 AND key = ?2";

    conn.query_row(sql, params![collection, key], parse_document_row)
        .optional()
        .context("Failed to query document")
}

pub fn list_all(conn: &Connection) -> Result<Vec<DocumentRow>> {
    let sql = "SELECT collection, key, value, created_at, updated_at FROM documents ORDER BY collection, key";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_document_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn count_by_collection(conn: &Connection, collection: &str) -> Result<i64> {
    let sql = "SELECT COUNT(*) FROM documents WHERE collection = ?1";

    conn.query_row(sql, params![collection], |row| row.get(0))
        .context("Failed to count documents")
}
