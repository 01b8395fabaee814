//! libSQL backend — async `Database` trait implementation.
//!
//! Supports local file and in-memory databases.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info};

use crate::business::{Business, BusinessStatus};
use crate::error::DatabaseError;
use crate::onboarding::OnboardingState;
use crate::store::migrations;
use crate::store::traits::{Database, OutboundMessage};

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.run_migrations().await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.run_migrations().await?;
        Ok(backend)
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ── Helper functions ────────────────────────────────────────────────

/// Parse an RFC 3339 or SQLite datetime string into DateTime<Utc>.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return ndt.and_utc();
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return ndt.and_utc();
    }
    DateTime::<Utc>::MIN_UTC
}

fn opt_text(s: Option<&str>) -> libsql::Value {
    match s {
        Some(s) => libsql::Value::Text(s.to_string()),
        None => libsql::Value::Null,
    }
}

fn opt_bool(b: Option<bool>) -> libsql::Value {
    match b {
        Some(b) => libsql::Value::Integer(i64::from(b)),
        None => libsql::Value::Null,
    }
}

fn opt_datetime(dt: Option<DateTime<Utc>>) -> libsql::Value {
    match dt {
        Some(dt) => libsql::Value::Text(dt.to_rfc3339()),
        None => libsql::Value::Null,
    }
}

const BUSINESS_COLUMNS: &str = "phone, name, business_type, product_category, has_delivery, hours, status, trial_ends_at, created_at, updated_at";

const ONBOARDING_COLUMNS: &str = "phone, current_step, business_type, business_name, product_category, has_delivery, completed, created_at, updated_at";

/// `current_step` as `row_to_onboarding` sees it, so a check-and-set against
/// a corrupted counter compares the value the caller actually read.
const STEP_AS_READ: &str =
    "CASE WHEN current_step BETWEEN 0 AND 255 THEN current_step ELSE 0 END";

/// Map a libsql Row to a Business. Column order matches BUSINESS_COLUMNS.
fn row_to_business(row: &libsql::Row) -> Result<Business, DatabaseError> {
    let get_text = |idx: i32| -> Result<String, DatabaseError> {
        row.get::<String>(idx)
            .map_err(|e| DatabaseError::Query(format!("business column {idx}: {e}")))
    };

    let status_str = get_text(6)?;
    let status: BusinessStatus = status_str
        .parse()
        .map_err(DatabaseError::Serialization)?;

    Ok(Business {
        phone: get_text(0)?,
        name: get_text(1)?,
        business_type: get_text(2)?,
        product_category: get_text(3)?,
        has_delivery: row.get::<i64>(4).unwrap_or(0) != 0,
        hours: get_text(5)?,
        status,
        trial_ends_at: parse_datetime(&get_text(7)?),
        created_at: parse_datetime(&get_text(8)?),
        updated_at: parse_datetime(&get_text(9)?),
    })
}

/// Map a libsql Row to an OnboardingState. Column order matches ONBOARDING_COLUMNS.
///
/// A step counter that doesn't fit a `u8` is read as 0, which the state
/// machine treats as corrupted.
fn row_to_onboarding(row: &libsql::Row) -> Result<OnboardingState, DatabaseError> {
    let phone: String = row
        .get(0)
        .map_err(|e| DatabaseError::Query(format!("onboarding phone: {e}")))?;
    let step: i64 = row.get(1).unwrap_or(0);
    let created_str: String = row.get(7).unwrap_or_default();
    let updated_str: String = row.get(8).unwrap_or_default();

    Ok(OnboardingState {
        phone,
        current_step: u8::try_from(step).unwrap_or(0),
        business_type: row.get::<String>(2).ok(),
        business_name: row.get::<String>(3).ok(),
        product_category: row.get::<String>(4).ok(),
        has_delivery: row.get::<i64>(5).ok().map(|v| v != 0),
        completed: row.get::<i64>(6).unwrap_or(0) != 0,
        created_at: parse_datetime(&created_str),
        updated_at: parse_datetime(&updated_str),
    })
}

// ── Trait implementation ────────────────────────────────────────────

#[async_trait]
impl Database for LibSqlBackend {
    async fn run_migrations(&self) -> Result<(), DatabaseError> {
        migrations::run_migrations(self.conn()).await
    }

    // ── Businesses ──────────────────────────────────────────────────

    async fn get_business(&self, phone: &str) -> Result<Option<Business>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                &format!("SELECT {BUSINESS_COLUMNS} FROM businesses WHERE phone = ?1"),
                params![phone],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_business: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_business(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_business: {e}"))),
        }
    }

    async fn update_business_status(
        &self,
        phone: &str,
        status: BusinessStatus,
    ) -> Result<bool, DatabaseError> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();
        let count = conn
            .execute(
                "UPDATE businesses SET status = ?1, updated_at = ?2 WHERE phone = ?3",
                params![status.to_string(), now, phone],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("update_business_status: {e}")))?;
        debug!(phone, %status, updated = count > 0, "Business status updated");
        Ok(count > 0)
    }

    // ── Onboarding ──────────────────────────────────────────────────

    async fn get_onboarding_state(
        &self,
        phone: &str,
    ) -> Result<Option<OnboardingState>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {ONBOARDING_COLUMNS} FROM onboarding_states WHERE phone = ?1 AND completed = 0"
                ),
                params![phone],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_onboarding_state: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_onboarding(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_onboarding_state: {e}"))),
        }
    }

    async fn create_onboarding_state(&self, state: &OnboardingState) -> Result<(), DatabaseError> {
        let conn = self.conn();
        conn.execute(
            &format!(
                "INSERT INTO onboarding_states ({ONBOARDING_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
            ),
            params![
                state.phone.as_str(),
                i64::from(state.current_step),
                opt_text(state.business_type.as_deref()),
                opt_text(state.business_name.as_deref()),
                opt_text(state.product_category.as_deref()),
                opt_bool(state.has_delivery),
                i64::from(state.completed),
                state.created_at.to_rfc3339(),
                state.updated_at.to_rfc3339(),
            ],
        )
        .await
        .map_err(|e| DatabaseError::Query(format!("create_onboarding_state: {e}")))?;
        Ok(())
    }

    async fn update_onboarding_state(
        &self,
        state: &OnboardingState,
        expected_step: u8,
    ) -> Result<(), DatabaseError> {
        let conn = self.conn();
        let count = conn
            .execute(
                &format!(
                    "UPDATE onboarding_states
                     SET current_step = ?1, business_type = ?2, business_name = ?3,
                         product_category = ?4, has_delivery = ?5, completed = ?6, updated_at = ?7
                     WHERE phone = ?8 AND {STEP_AS_READ} = ?9"
                ),
                params![
                    i64::from(state.current_step),
                    opt_text(state.business_type.as_deref()),
                    opt_text(state.business_name.as_deref()),
                    opt_text(state.product_category.as_deref()),
                    opt_bool(state.has_delivery),
                    i64::from(state.completed),
                    state.updated_at.to_rfc3339(),
                    state.phone.as_str(),
                    i64::from(expected_step),
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("update_onboarding_state: {e}")))?;

        if count == 0 {
            return Err(DatabaseError::StaleWrite {
                phone: state.phone.clone(),
                expected: expected_step,
            });
        }
        Ok(())
    }

    async fn complete_onboarding(
        &self,
        business: &Business,
        expected_step: u8,
    ) -> Result<(), DatabaseError> {
        let tx = self
            .conn()
            .transaction()
            .await
            .map_err(|e| DatabaseError::Query(format!("complete_onboarding begin: {e}")))?;

        let removed = tx
            .execute(
                &format!("DELETE FROM onboarding_states WHERE phone = ?1 AND {STEP_AS_READ} = ?2"),
                params![business.phone.as_str(), i64::from(expected_step)],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("complete_onboarding delete: {e}")))?;

        if removed == 0 {
            // Dropping the transaction rolls it back.
            return Err(DatabaseError::StaleWrite {
                phone: business.phone.clone(),
                expected: expected_step,
            });
        }

        tx.execute(
            &format!(
                "INSERT INTO businesses ({BUSINESS_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            ),
            params![
                business.phone.as_str(),
                business.name.as_str(),
                business.business_type.as_str(),
                business.product_category.as_str(),
                i64::from(business.has_delivery),
                business.hours.as_str(),
                business.status.to_string(),
                business.trial_ends_at.to_rfc3339(),
                business.created_at.to_rfc3339(),
                business.updated_at.to_rfc3339(),
            ],
        )
        .await
        .map_err(|e| DatabaseError::Query(format!("complete_onboarding insert: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| DatabaseError::Query(format!("complete_onboarding commit: {e}")))?;
        info!(phone = %business.phone, "Business created");
        Ok(())
    }

    // ── Response cache ──────────────────────────────────────────────

    async fn get_cached_response(
        &self,
        phone: &str,
        question_key: &str,
    ) -> Result<Option<String>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                "SELECT response FROM response_cache WHERE phone = ?1 AND question_key = ?2",
                params![phone, question_key],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_cached_response: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(row.get::<String>(0).ok()),
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_cached_response: {e}"))),
        }
    }

    async fn cache_response(
        &self,
        phone: &str,
        question_key: &str,
        response: &str,
    ) -> Result<(), DatabaseError> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO response_cache (phone, question_key, response, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (phone, question_key) DO UPDATE SET response = ?3, created_at = ?4",
            params![phone, question_key, response, now],
        )
        .await
        .map_err(|e| DatabaseError::Query(format!("cache_response: {e}")))?;
        Ok(())
    }

    // ── Message queue ───────────────────────────────────────────────

    async fn enqueue_outbound(&self, message: &OutboundMessage) -> Result<(), DatabaseError> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO message_queue (id, phone, message, status, retry_count, created_at, processed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                message.id.to_string(),
                message.phone.as_str(),
                message.message.as_str(),
                message.status.as_str(),
                i64::from(message.retry_count),
                message.created_at.to_rfc3339(),
                opt_datetime(message.processed_at),
            ],
        )
        .await
        .map_err(|e| DatabaseError::Query(format!("enqueue_outbound: {e}")))?;
        Ok(())
    }
}
