use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, MySqlPool};

use crate::errors::{AppError, AppResult};
use crate::model::{
    logsheet::{LogsheetEntry, LogsheetStatus, NewLogsheet},
    time_log::{AttendanceEvent, EventKind, NewEvent},
    user::{UserCredentials, UserProfile},
};
use crate::store::Store;

#[derive(FromRow)]
struct EventRow {
    id: u64,
    user_id: u64,
    kind: String,
    logged_at: DateTime<Utc>,
    work_date: NaiveDate,
}

impl TryFrom<EventRow> for AttendanceEvent {
    type Error = AppError;

    fn try_from(row: EventRow) -> AppResult<Self> {
        let kind = EventKind::from_str(&row.kind)
            .map_err(|_| AppError::Internal(format!("unknown event kind '{}'", row.kind)))?;

        Ok(AttendanceEvent {
            id: row.id,
            user_id: row.user_id,
            kind,
            timestamp: row.logged_at,
            work_date: row.work_date,
        })
    }
}

#[derive(FromRow)]
struct LogsheetRow {
    id: u64,
    user_id: u64,
    work_date: NaiveDate,
    jira_key: String,
    hours_worked: f64,
    status: String,
    manager_id: Option<u64>,
    work_day_credit: f64,
}

impl TryFrom<LogsheetRow> for LogsheetEntry {
    type Error = AppError;

    fn try_from(row: LogsheetRow) -> AppResult<Self> {
        let status = LogsheetStatus::from_str(&row.status)
            .map_err(|_| AppError::Internal(format!("unknown logsheet status '{}'", row.status)))?;

        Ok(LogsheetEntry {
            id: row.id,
            user_id: row.user_id,
            date: row.work_date,
            jira_key: row.jira_key,
            hours_worked: row.hours_worked,
            status,
            manager_id: row.manager_id,
            work_day_credit: row.work_day_credit,
        })
    }
}

const LOGSHEET_COLUMNS: &str =
    "id, user_id, work_date, jira_key, hours_worked, status, manager_id, work_day_credit";

/// MySQL-backed store; see `db/schema.sql` for the tables it expects.
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for MySqlStore {
    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<UserCredentials>> {
        let user = sqlx::query_as::<_, UserCredentials>(
            r#"
            SELECT id, username, password, is_manager
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user(&self, user_id: u64) -> AppResult<Option<UserProfile>> {
        let user = sqlx::query_as::<_, UserCredentials>(
            r#"
            SELECT id, username, password, is_manager
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.map(|u| u.profile()))
    }

    async fn append_event(&self, event: NewEvent) -> AppResult<AttendanceEvent> {
        let result = sqlx::query(
            r#"
            INSERT INTO time_logs (user_id, kind, logged_at, work_date)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(event.user_id)
        .bind(event.kind.as_ref())
        .bind(event.timestamp)
        .bind(event.work_date)
        .execute(&self.pool)
        .await?;

        Ok(AttendanceEvent {
            id: result.last_insert_id(),
            user_id: event.user_id,
            kind: event.kind,
            timestamp: event.timestamp,
            work_date: event.work_date,
        })
    }

    async fn events_for_day(&self, user_id: u64, date: NaiveDate) -> AppResult<Vec<AttendanceEvent>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, user_id, kind, logged_at, work_date
            FROM time_logs
            WHERE user_id = ? AND work_date = ?
            ORDER BY logged_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AttendanceEvent::try_from).collect()
    }

    async fn latest_event(&self, user_id: u64, date: NaiveDate) -> AppResult<Option<AttendanceEvent>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, user_id, kind, logged_at, work_date
            FROM time_logs
            WHERE user_id = ? AND work_date = ?
            ORDER BY logged_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AttendanceEvent::try_from).transpose()
    }

    async fn find_logsheet(&self, user_id: u64, date: NaiveDate) -> AppResult<Option<LogsheetEntry>> {
        let sql = format!(
            "SELECT {} FROM logsheets WHERE user_id = ? AND work_date = ?",
            LOGSHEET_COLUMNS
        );
        let row = sqlx::query_as::<_, LogsheetRow>(&sql)
            .bind(user_id)
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;

        row.map(LogsheetEntry::try_from).transpose()
    }

    async fn create_logsheet(&self, entry: NewLogsheet) -> AppResult<LogsheetEntry> {
        // uq_logsheets_user_day guards (user_id, work_date) across instances
        let result = sqlx::query(
            r#"
            INSERT INTO logsheets (user_id, work_date, jira_key, hours_worked, status, work_day_credit)
            VALUES (?, ?, ?, ?, ?, 0.0)
            "#,
        )
        .bind(entry.user_id)
        .bind(entry.date)
        .bind(&entry.jira_key)
        .bind(entry.hours_worked)
        .bind(LogsheetStatus::Pending.as_ref())
        .execute(&self.pool)
        .await?;

        Ok(LogsheetEntry {
            id: result.last_insert_id(),
            user_id: entry.user_id,
            date: entry.date,
            jira_key: entry.jira_key,
            hours_worked: entry.hours_worked,
            status: LogsheetStatus::Pending,
            manager_id: None,
            work_day_credit: 0.0,
        })
    }

    async fn update_pending_logsheet(&self, entry: &LogsheetEntry) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE logsheets
            SET jira_key = ?, hours_worked = ?, status = ?, manager_id = ?, work_day_credit = ?
            WHERE id = ?
            AND status = 'pending'
            "#,
        )
        .bind(&entry.jira_key)
        .bind(entry.hours_worked)
        .bind(entry.status.as_ref())
        .bind(entry.manager_id)
        .bind(entry.work_day_credit)
        .bind(entry.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn pending_logsheets(&self) -> AppResult<Vec<LogsheetEntry>> {
        let sql = format!(
            "SELECT {} FROM logsheets WHERE status = 'pending' ORDER BY work_date DESC, id ASC",
            LOGSHEET_COLUMNS
        );
        let rows = sqlx::query_as::<_, LogsheetRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(LogsheetEntry::try_from).collect()
    }

    async fn get_logsheet(&self, id: u64) -> AppResult<Option<LogsheetEntry>> {
        let sql = format!("SELECT {} FROM logsheets WHERE id = ?", LOGSHEET_COLUMNS);
        let row = sqlx::query_as::<_, LogsheetRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(LogsheetEntry::try_from).transpose()
    }
}
