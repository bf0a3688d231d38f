use funil_core::{CanonicalLead, LeadStore, StoreError};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Row, Sqlite};
use std::path::Path;

pub type DbPool = Pool<Sqlite>;

pub async fn create_db(path: &Path) -> Result<DbPool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&format!("sqlite:{}?mode=rwc", path.display()))
        .await?;

    configure(&pool).await?;
    run_migrations(&pool).await?;

    Ok(pool)
}

/// In-memory database, for tests and dry runs.
pub async fn create_db_in_memory() -> Result<DbPool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    configure(&pool).await?;
    run_migrations(&pool).await?;

    Ok(pool)
}

async fn configure(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await?;
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(pool)
        .await?;
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(pool)
        .await?;
    Ok(())
}

async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS leads (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner_id TEXT NOT NULL,
            contact_date TEXT,
            name TEXT NOT NULL,
            contact_handle TEXT,
            source TEXT NOT NULL,
            budget_sent INTEGER NOT NULL DEFAULT 0,
            outcome TEXT NOT NULL,
            contact_quality TEXT,
            closed_value_cents INTEGER,
            note TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_leads_owner_handle ON leads(owner_id, contact_handle)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

/// SQLite-backed implementation of the persistence surface the import driver
/// consumes.
pub struct SqliteLeadStore {
    pool: DbPool,
}

impl SqliteLeadStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl LeadStore for SqliteLeadStore {
    async fn count_leads(&self, owner_id: &str) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM leads WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(backend)?;
        let n: i64 = row.get("n");
        Ok(n as u64)
    }

    async fn create_leads(
        &self,
        owner_id: &str,
        leads: &[CanonicalLead],
    ) -> Result<u64, StoreError> {
        // One transaction per batch: the batch commits fully or not at all.
        let mut tx = self.pool.begin().await.map_err(backend)?;

        for lead in leads {
            sqlx::query(
                "INSERT INTO leads (owner_id, contact_date, name, contact_handle, source, \
                 budget_sent, outcome, contact_quality, closed_value_cents, note) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(owner_id)
            .bind(lead.contact_date.map(|d| d.to_string()))
            .bind(&lead.name)
            .bind(&lead.contact_handle)
            .bind(lead.source.as_str())
            .bind(lead.budget_sent)
            .bind(lead.outcome.as_str())
            .bind(lead.contact_quality.map(|q| q.as_str()))
            .bind(lead.closed_value.map(|v| v.to_cents()))
            .bind(&lead.note)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;
        }

        tx.commit().await.map_err(backend)?;
        Ok(leads.len() as u64)
    }

    async fn list_existing_handles(
        &self,
        owner_id: &str,
        candidates: &[String],
    ) -> Result<Vec<String>, StoreError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; candidates.len()].join(", ");
        let sql = format!(
            "SELECT DISTINCT contact_handle FROM leads \
             WHERE owner_id = ? AND contact_handle IN ({placeholders})"
        );

        let mut query = sqlx::query(&sql).bind(owner_id);
        for candidate in candidates {
            query = query.bind(candidate);
        }

        let rows = query.fetch_all(&self.pool).await.map_err(backend)?;
        Ok(rows
            .into_iter()
            .filter_map(|r| r.get::<Option<String>, _>(0))
            .collect())
    }
}
