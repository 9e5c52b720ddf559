use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::functions::FunctionFlags;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, OptionalExtension, Row};

use crate::applications::domain::{
    ApplicationId, ApplicationRecord, ApplicationStatus, BudgetBracket, RevenueBracket,
    StatusStats, Timeline,
};
use crate::applications::query::{ApplicationFilter, PageWindow, RecordPage};
use crate::applications::repository::{ApplicationRepository, RepositoryError};

const COLUMNS: &str = "id, name, email, phone, instagram, tiktok, website, company, revenue, \
    challenges, goals, timeline, budget, status, submitted_at_ms, reviewed_at_ms, notes, \
    created_at_ms, updated_at_ms";

/// SQLite-backed store. A UNIQUE index on `email` makes the insert itself the
/// duplicate check.
#[derive(Debug)]
pub struct SqliteApplicationRepository {
    conn: Mutex<Connection>,
}

impl SqliteApplicationRepository {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| {
                RepositoryError::Unavailable(format!(
                    "cannot create {}: {err}",
                    parent.display()
                ))
            })?;
        }
        let conn = Connection::open(path).map_err(unavailable)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, RepositoryError> {
        let conn = Connection::open_in_memory().map_err(unavailable)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, RepositoryError> {
        register_fold_case(&conn).map_err(unavailable)?;
        migrate(&conn).map_err(unavailable)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, RepositoryError> {
        self.conn
            .lock()
            .map_err(|_| RepositoryError::Unavailable("connection mutex poisoned".to_string()))
    }
}

/// `fold_case(text)`: Unicode lowercasing for search. The built-in `lower()`
/// only folds ASCII.
fn register_fold_case(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "fold_case",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|text| text.to_lowercase())),
    )
}

fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode=WAL;
        PRAGMA synchronous=NORMAL;

        CREATE TABLE IF NOT EXISTS applications (
          id TEXT PRIMARY KEY,
          name TEXT NOT NULL,
          email TEXT NOT NULL,
          phone TEXT,
          instagram TEXT,
          tiktok TEXT,
          website TEXT,
          company TEXT NOT NULL,
          revenue TEXT NOT NULL,
          challenges TEXT NOT NULL,
          goals TEXT NOT NULL,
          timeline TEXT NOT NULL,
          budget TEXT NOT NULL,
          status TEXT NOT NULL DEFAULT 'pending'
            CHECK (status IN ('pending', 'reviewed', 'approved', 'rejected')),
          submitted_at_ms INTEGER NOT NULL,
          reviewed_at_ms INTEGER,
          notes TEXT,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_applications_email_unique
          ON applications(email);
        CREATE INDEX IF NOT EXISTS idx_applications_email_submitted
          ON applications(email, submitted_at_ms DESC);
        CREATE INDEX IF NOT EXISTS idx_applications_status_submitted
          ON applications(status, submitted_at_ms DESC);
        "#,
    )
}

impl ApplicationRepository for SqliteApplicationRepository {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let conn = self.conn()?;
        conn.execute(
            &format!(
                "INSERT INTO applications ({COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)"
            ),
            params![
                record.id.as_str(),
                record.name,
                record.email,
                record.phone,
                record.instagram,
                record.tiktok,
                record.website,
                record.company,
                record.revenue.label(),
                record.challenges,
                record.goals,
                record.timeline.label(),
                record.budget.label(),
                record.status.label(),
                record.submitted_at.timestamp_millis(),
                record.reviewed_at.map(|at| at.timestamp_millis()),
                record.notes,
                record.created_at.timestamp_millis(),
                record.updated_at.timestamp_millis(),
            ],
        )
        .map_err(map_insert_conflict)?;
        Ok(record)
    }

    fn update(&self, record: &ApplicationRecord) -> Result<(), RepositoryError> {
        let conn = self.conn()?;
        let changed = conn
            .execute(
                "UPDATE applications \
                 SET status = ?2, notes = ?3, reviewed_at_ms = ?4, updated_at_ms = ?5 \
                 WHERE id = ?1",
                params![
                    record.id.as_str(),
                    record.status.label(),
                    record.notes,
                    record.reviewed_at.map(|at| at.timestamp_millis()),
                    record.updated_at.timestamp_millis(),
                ],
            )
            .map_err(unavailable)?;
        if changed == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM applications WHERE id = ?1"),
            params![id.as_str()],
            read_record,
        )
        .optional()
        .map_err(unavailable)
    }

    fn find(
        &self,
        filter: &ApplicationFilter,
        window: Option<PageWindow>,
    ) -> Result<RecordPage, RepositoryError> {
        let (where_clause, mut values) = filter_clause(filter);
        let conn = self.conn()?;

        let total: i64 = conn
            .query_row(
                &format!("SELECT COUNT(*) FROM applications{where_clause}"),
                params_from_iter(values.iter()),
                |row| row.get(0),
            )
            .map_err(unavailable)?;

        let mut sql = format!(
            "SELECT {COLUMNS} FROM applications{where_clause} ORDER BY submitted_at_ms DESC, id ASC"
        );
        if let Some(window) = window {
            sql.push_str(" LIMIT ? OFFSET ?");
            values.push(Value::Integer(to_sqlite_i64(window.limit)?));
            values.push(Value::Integer(to_sqlite_i64(window.offset)?));
        }

        let mut stmt = conn.prepare(&sql).map_err(unavailable)?;
        let records = stmt
            .query_map(params_from_iter(values.iter()), read_record)
            .map_err(unavailable)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(unavailable)?;

        Ok(RecordPage {
            records,
            total: u64::try_from(total).unwrap_or(0),
        })
    }

    fn status_stats(&self) -> Result<StatusStats, RepositoryError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT status, COUNT(*) FROM applications GROUP BY status")
            .map_err(unavailable)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })
            .map_err(unavailable)?;

        let mut stats = StatusStats::default();
        for row in rows {
            let (status, count) = row.map_err(unavailable)?;
            if let Some(status) = ApplicationStatus::parse(&status) {
                stats.record(status, u64::try_from(count).unwrap_or(0));
            }
        }
        Ok(stats)
    }
}

fn filter_clause(filter: &ApplicationFilter) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut values = Vec::new();

    if let Some(status) = filter.status {
        clauses.push("status = ?".to_string());
        values.push(Value::Text(status.label().to_string()));
    }
    if let Some(term) = filter.search() {
        clauses.push(
            "(instr(fold_case(name), ?) > 0 OR instr(fold_case(email), ?) > 0 OR instr(fold_case(company), ?) > 0)"
                .to_string(),
        );
        for _ in 0..3 {
            values.push(Value::Text(term.to_string()));
        }
    }

    if clauses.is_empty() {
        (String::new(), values)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), values)
    }
}

fn read_record(row: &Row<'_>) -> rusqlite::Result<ApplicationRecord> {
    Ok(ApplicationRecord {
        id: ApplicationId(row.get(0)?),
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        instagram: row.get(4)?,
        tiktok: row.get(5)?,
        website: row.get(6)?,
        company: row.get(7)?,
        revenue: read_literal(row, 8, RevenueBracket::parse)?,
        challenges: row.get(9)?,
        goals: row.get(10)?,
        timeline: read_literal(row, 11, Timeline::parse)?,
        budget: read_literal(row, 12, BudgetBracket::parse)?,
        status: read_literal(row, 13, ApplicationStatus::parse)?,
        submitted_at: read_timestamp(row, 14)?,
        reviewed_at: row
            .get::<_, Option<i64>>(15)?
            .map(|millis| timestamp_from_millis(15, millis))
            .transpose()?,
        notes: row.get(16)?,
        created_at: read_timestamp(row, 17)?,
        updated_at: read_timestamp(row, 18)?,
    })
}

#[derive(Debug, thiserror::Error)]
#[error("unexpected stored value '{0}'")]
struct StoredValueError(String);

fn read_literal<T>(
    row: &Row<'_>,
    idx: usize,
    parse: fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(StoredValueError(raw)))
    })
}

fn read_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    timestamp_from_millis(idx, row.get(idx)?)
}

fn timestamp_from_millis(idx: usize, millis: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Integer,
            Box::new(StoredValueError(millis.to_string())),
        )
    })
}

fn map_insert_conflict(err: rusqlite::Error) -> RepositoryError {
    if is_constraint_violation(&err) {
        return RepositoryError::Conflict;
    }
    unavailable(err)
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => {
            code.code == ErrorCode::ConstraintViolation
                || message.as_deref().is_some_and(|value| {
                    value.contains("UNIQUE constraint failed")
                        || value.contains("PRIMARY KEY constraint failed")
                })
        }
        _ => false,
    }
}

fn unavailable(err: rusqlite::Error) -> RepositoryError {
    RepositoryError::Unavailable(format!("sqlite: {err}"))
}

fn to_sqlite_i64(value: u64) -> Result<i64, RepositoryError> {
    i64::try_from(value)
        .map_err(|_| RepositoryError::Unavailable("numeric overflow".to_string()))
}
