//! SQLite-based storage implementation
//!
//! Every collection shares one `documents` table; the body column holds the
//! JSON document. Filters other than a bare id lookup are evaluated in
//! Rust over the collection's rows.

use std::sync::Mutex;

use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use super::{
    assign_id, Collection, Document, DocumentStore, Filter, StoreResult, Update, UpdateResult,
};
use crate::error::ServerError;

/// SQLite-backed document store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path
    pub fn open(path: &str) -> Result<Self, ServerError> {
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        tracing::info!(path, "Opened SQLite document store");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, ServerError> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<(), ServerError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                body TEXT NOT NULL,
                UNIQUE (collection, id)
            );
            CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);
            "#,
        )?;
        Ok(())
    }

    /// Rows of a collection that match the filter, as (id, document)
    fn matching(
        conn: &Connection,
        collection: Collection,
        filter: &Filter,
    ) -> StoreResult<Vec<(String, Document)>> {
        let rows: Vec<(String, String)> = if let Some(id) = filter.id() {
            conn.query_row(
                "SELECT id, body FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection.as_str(), id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?
            .into_iter()
            .collect()
        } else {
            let mut stmt = conn
                .prepare("SELECT id, body FROM documents WHERE collection = ?1 ORDER BY seq")?;
            let rows = stmt
                .query_map(params![collection.as_str()], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        let mut matched = Vec::new();
        for (id, body) in rows {
            let document: Document = serde_json::from_str(&body)?;
            if filter.matches(&document) {
                matched.push((id, document));
            }
        }
        Ok(matched)
    }
}

impl DocumentStore for SqliteStore {
    fn ping(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    fn find(&self, collection: Collection, filter: &Filter) -> StoreResult<Vec<Document>> {
        let conn = self.conn.lock().unwrap();
        Ok(Self::matching(&conn, collection, filter)?
            .into_iter()
            .map(|(_, document)| document)
            .collect())
    }

    fn insert_one(&self, collection: Collection, mut document: Document) -> StoreResult<String> {
        let id = assign_id(&mut document)?;
        let body = serde_json::to_string(&document)?;
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)",
            params![collection.as_str(), id, body],
        )
        .map_err(|e| match e.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => {
                ServerError::Validation(format!("duplicate _id {}", id))
            }
            _ => ServerError::from(e),
        })?;

        Ok(id)
    }

    fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        update: &Update,
    ) -> StoreResult<UpdateResult> {
        let conn = self.conn.lock().unwrap();
        let Some((id, mut document)) = Self::matching(&conn, collection, filter)?.into_iter().next()
        else {
            return Ok(UpdateResult::unmatched());
        };

        if !update.apply(&mut document) {
            return Ok(UpdateResult::matched(false));
        }

        conn.execute(
            "UPDATE documents SET body = ?1 WHERE collection = ?2 AND id = ?3",
            params![serde_json::to_string(&document)?, collection.as_str(), id],
        )?;
        Ok(UpdateResult::matched(true))
    }

    fn delete_one(&self, collection: Collection, filter: &Filter) -> StoreResult<u64> {
        let conn = self.conn.lock().unwrap();
        let Some((id, _)) = Self::matching(&conn, collection, filter)?.into_iter().next() else {
            return Ok(0);
        };

        let deleted = conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection.as_str(), id],
        )?;
        Ok(deleted as u64)
    }

    fn count(&self, collection: Collection, filter: &Filter) -> StoreResult<u64> {
        if *filter == Filter::all() {
            let conn = self.conn.lock().unwrap();
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM documents WHERE collection = ?1",
                params![collection.as_str()],
                |row| row.get(0),
            )?;
            return Ok(count as u64);
        }
        Ok(self.find(collection, filter)?.len() as u64)
    }
}
