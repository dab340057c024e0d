use crate::model::{Label, Record, Source, Variant};
use crate::storage::schema::{DDL, RECORD_COLUMNS};
use anyhow::Context;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct Store {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open sqlite db {}", path.display()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory sqlite db")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn init_schema(&self) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(DDL).context("failed to apply schema")?;
        Ok(())
    }

    /// Insert or replace by `url`. A replaced record keeps its position.
    pub fn upsert_record(&self, record: &Record) -> anyhow::Result<()> {
        self.upsert_records(std::slice::from_ref(record)).map(|_| ())
    }

    pub fn upsert_records(&self, records: &[Record]) -> anyhow::Result<usize> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO records({RECORD_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(url) DO UPDATE SET
                   title = excluded.title,
                   author = excluded.author,
                   date = excluded.date,
                   categories_json = excluded.categories_json,
                   last_scraped = excluded.last_scraped,
                   content = excluded.content,
                   source = excluded.source,
                   label = excluded.label,
                   scraped = excluded.scraped"
            ))?;
            for r in records {
                let categories = serde_json::to_string(&r.categories)?;
                stmt.execute(params![
                    r.url,
                    r.title,
                    r.author,
                    r.date,
                    categories,
                    r.last_scraped.map(|t| t.to_rfc3339()),
                    r.content,
                    r.source.as_column(),
                    r.label.as_column(),
                    r.scraped,
                ])
                .with_context(|| format!("failed to store record {}", r.url))?;
            }
        }
        bump_revision(&tx)?;
        tx.commit()?;
        Ok(records.len())
    }

    /// Records in insertion order, optionally restricted by `scraped` and
    /// capped at `limit`.
    pub fn get_all(&self, scraped: Option<bool>, limit: Option<usize>) -> anyhow::Result<Vec<Record>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS}
             FROM records
             WHERE (?1 IS NULL OR scraped = ?1)
             ORDER BY id ASC
             LIMIT ?2"
        ))?;
        let rows = stmt.query_map(params![scraped, sql_limit(limit)], row_to_record)?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("failed to read records")
    }

    /// Scraped records that have no label yet.
    pub fn pending_for_classification(&self, limit: Option<usize>) -> anyhow::Result<Vec<Record>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS}
             FROM records
             WHERE scraped = 1 AND (label IS NULL OR label = '')
             ORDER BY id ASC
             LIMIT ?1"
        ))?;
        let rows = stmt.query_map(params![sql_limit(limit)], row_to_record)?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("failed to read pending records")
    }

    pub fn set_labels(&self, labels: &[(String, Label)]) -> anyhow::Result<usize> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let mut updated = 0;
        {
            let mut stmt = tx.prepare("UPDATE records SET label = ?2 WHERE url = ?1")?;
            for (url, label) in labels {
                updated += stmt.execute(params![url, Variant::Known(*label).as_column()])?;
            }
        }
        bump_revision(&tx)?;
        tx.commit()?;
        Ok(updated)
    }

    /// Monotonic counter bumped by every write.
    pub fn revision(&self) -> anyhow::Result<i64> {
        let conn = self.conn.lock().unwrap();
        let rev = conn
            .query_row("SELECT value FROM meta WHERE key = 'revision'", [], |r| r.get(0))
            .context("failed to read store revision")?;
        Ok(rev)
    }

    pub fn count(&self) -> anyhow::Result<i64> {
        let conn = self.conn.lock().unwrap();
        Ok(conn.query_row("SELECT COUNT(*) FROM records", [], |r| r.get(0))?)
    }
}

fn bump_revision(conn: &Connection) -> anyhow::Result<()> {
    conn.execute("UPDATE meta SET value = value + 1 WHERE key = 'revision'", [])?;
    Ok(())
}

// sqlite: negative LIMIT means no limit
fn sql_limit(limit: Option<usize>) -> i64 {
    limit.map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX))
}

fn conversion_error<E>(idx: usize, e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<Record> {
    let categories_json: String = row.get(4)?;
    let categories: Vec<String> =
        serde_json::from_str(&categories_json).map_err(|e| conversion_error(4, e))?;

    let last_scraped = row
        .get::<_, Option<String>>(5)?
        .map(|s| DateTime::parse_from_rfc3339(&s).map(|t| t.with_timezone(&Utc)))
        .transpose()
        .map_err(|e| conversion_error(5, e))?;

    let source = Variant::<Source>::from_column(row.get::<_, Option<String>>(7)?.as_deref())
        .map_err(|e| conversion_error(7, e))?;
    let label = Variant::<Label>::from_column(row.get::<_, Option<String>>(8)?.as_deref())
        .map_err(|e| conversion_error(8, e))?;

    Ok(Record {
        url: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        date: row.get(3)?,
        categories,
        last_scraped,
        content: row.get(6)?,
        source,
        label,
        scraped: row.get(9)?,
    })
}
