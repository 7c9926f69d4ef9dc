//! Persistence collaborator. The core only talks to the `Store` trait; the
//! MySQL implementation backs production and the memory one backs tests and
//! local runs without a database.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::AppResult;
use crate::model::{
    logsheet::{LogsheetEntry, NewLogsheet},
    time_log::{AttendanceEvent, NewEvent},
    user::{UserCredentials, UserProfile},
};

pub mod memory;
pub mod mysql;

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<UserCredentials>>;

    async fn get_user(&self, user_id: u64) -> AppResult<Option<UserProfile>>;

    /// Append-only insert.
    async fn append_event(&self, event: NewEvent) -> AppResult<AttendanceEvent>;

    /// All events for (user, day), timestamp ascending.
    async fn events_for_day(&self, user_id: u64, date: NaiveDate) -> AppResult<Vec<AttendanceEvent>>;

    async fn latest_event(&self, user_id: u64, date: NaiveDate) -> AppResult<Option<AttendanceEvent>>;

    async fn find_logsheet(&self, user_id: u64, date: NaiveDate) -> AppResult<Option<LogsheetEntry>>;

    async fn create_logsheet(&self, entry: NewLogsheet) -> AppResult<LogsheetEntry>;

    /// Overwrites every mutable column of `entry`, but only while the stored
    /// row is still pending. Returns whether the write was applied.
    async fn update_pending_logsheet(&self, entry: &LogsheetEntry) -> AppResult<bool>;

    /// Pending entries, date descending.
    async fn pending_logsheets(&self) -> AppResult<Vec<LogsheetEntry>>;

    async fn get_logsheet(&self, id: u64) -> AppResult<Option<LogsheetEntry>>;
}
