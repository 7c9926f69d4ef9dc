use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::{AppError, AppResult};
use crate::model::{
    logsheet::{LogsheetEntry, LogsheetStatus, NewLogsheet},
    time_log::{AttendanceEvent, NewEvent},
    user::{UserCredentials, UserProfile},
};
use crate::store::Store;

#[derive(Default)]
struct Inner {
    users: Vec<UserCredentials>,
    events: Vec<AttendanceEvent>,
    logsheets: BTreeMap<u64, LogsheetEntry>,
    next_event_id: u64,
    next_logsheet_id: u64,
}

/// In-process store. Each method takes the lock once, so every write is atomic.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

fn poisoned<T>(_: T) -> AppError {
    AppError::Internal("memory store poisoned".to_string())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<UserCredentials>) -> Self {
        let store = Self::default();
        if let Ok(mut inner) = store.inner.write() {
            inner.users = users;
        }
        store
    }

    pub fn logsheet_count(&self) -> AppResult<usize> {
        Ok(self.inner.read().map_err(poisoned)?.logsheets.len())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<UserCredentials>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner
            .users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn get_user(&self, user_id: u64) -> AppResult<Option<UserProfile>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner
            .users
            .iter()
            .find(|u| u.id == user_id)
            .map(UserCredentials::profile))
    }

    async fn append_event(&self, event: NewEvent) -> AppResult<AttendanceEvent> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        inner.next_event_id += 1;
        let stored = AttendanceEvent {
            id: inner.next_event_id,
            user_id: event.user_id,
            kind: event.kind,
            timestamp: event.timestamp,
            work_date: event.work_date,
        };
        inner.events.push(stored.clone());
        Ok(stored)
    }

    async fn events_for_day(&self, user_id: u64, date: NaiveDate) -> AppResult<Vec<AttendanceEvent>> {
        let inner = self.inner.read().map_err(poisoned)?;
        let mut events: Vec<AttendanceEvent> = inner
            .events
            .iter()
            .filter(|e| e.user_id == user_id && e.work_date == date)
            .cloned()
            .collect();
        events.sort_by_key(|e| (e.timestamp, e.id));
        Ok(events)
    }

    async fn latest_event(&self, user_id: u64, date: NaiveDate) -> AppResult<Option<AttendanceEvent>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner
            .events
            .iter()
            .filter(|e| e.user_id == user_id && e.work_date == date)
            .max_by_key(|e| (e.timestamp, e.id))
            .cloned())
    }

    async fn find_logsheet(&self, user_id: u64, date: NaiveDate) -> AppResult<Option<LogsheetEntry>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner
            .logsheets
            .values()
            .find(|l| l.user_id == user_id && l.date == date)
            .cloned())
    }

    async fn create_logsheet(&self, entry: NewLogsheet) -> AppResult<LogsheetEntry> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        // unique (user_id, date)
        if inner
            .logsheets
            .values()
            .any(|l| l.user_id == entry.user_id && l.date == entry.date)
        {
            return Err(AppError::Internal(format!(
                "duplicate logsheet for user {} on {}",
                entry.user_id, entry.date
            )));
        }

        inner.next_logsheet_id += 1;
        let created = LogsheetEntry {
            id: inner.next_logsheet_id,
            user_id: entry.user_id,
            date: entry.date,
            jira_key: entry.jira_key,
            hours_worked: entry.hours_worked,
            status: LogsheetStatus::Pending,
            manager_id: None,
            work_day_credit: 0.0,
        };
        inner.logsheets.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_pending_logsheet(&self, entry: &LogsheetEntry) -> AppResult<bool> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        match inner.logsheets.get_mut(&entry.id) {
            Some(stored) if stored.is_pending() => {
                *stored = entry.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn pending_logsheets(&self) -> AppResult<Vec<LogsheetEntry>> {
        let inner = self.inner.read().map_err(poisoned)?;
        let mut pending: Vec<LogsheetEntry> = inner
            .logsheets
            .values()
            .filter(|l| l.is_pending())
            .cloned()
            .collect();
        pending.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
        Ok(pending)
    }

    async fn get_logsheet(&self, id: u64) -> AppResult<Option<LogsheetEntry>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.logsheets.get(&id).cloned())
    }
}
