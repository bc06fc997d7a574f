pub mod collection;
pub mod queries;

pub use collection::{Collection, Document, Filter};

use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use strum::IntoEnumIterator;

use crate::config::AccessPolicy;
use crate::jwt::TokenService;
use crate::payments::PaymentIntents;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Shared, read-only per request. All mutable state lives in the store.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub tokens: TokenService,
    pub payments: Arc<dyn PaymentIntents>,
    pub policy: AccessPolicy,
}

/// Create the collection tables and indexes if they don't exist.
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    for coll in Collection::iter() {
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY, doc TEXT NOT NULL);",
            coll.table()
        ))?;
    }

    conn.execute_batch(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email ON users(json_extract(doc, '$.email'));
         CREATE INDEX IF NOT EXISTS idx_carts_email ON carts(json_extract(doc, '$.email'));
         CREATE INDEX IF NOT EXISTS idx_payments_email ON payments(json_extract(doc, '$.email'));",
    )?;

    Ok(())
}

/// Open a connection pool on a database file.
///
/// Connections are opened lazily and create the schema on open, so this
/// never fails on an unreachable database; requests fail individually instead.
pub fn open_pool(path: &str) -> DbPool {
    let manager = SqliteConnectionManager::file(path).with_init(|c| {
        c.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
        init_db(c)
    });
    Pool::builder().build_unchecked(manager)
}

/// Single-connection in-memory pool. Every checkout sees the same database.
pub fn open_memory_pool() -> Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::memory().with_init(|c| init_db(c));
    let pool = Pool::builder()
        .max_size(1)
        .max_lifetime(None)
        .idle_timeout(None)
        .build(manager)?;
    Ok(pool)
}
