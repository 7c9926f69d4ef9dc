//! Logsheet approval workflow: one entry per (user, day), submitted by the
//! employee while pending and decided exactly once by a manager.

use chrono::NaiveDate;
use serde::Serialize;
use std::str::FromStr;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::service::{TimesheetService, hours};
use crate::errors::{AppError, AppResult};
use crate::model::logsheet::{
    ALLOWED_CREDITS, DecisionAction, LogsheetEntry, LogsheetStatus, NewLogsheet,
};
use crate::model::principal::{Capability, Principal};
use crate::model::time_log::{AttendanceEvent, EventKind};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Serialize, ToSchema)]
pub struct DailyDetail {
    pub logs: Vec<AttendanceEvent>,
    #[schema(example = 7.5)]
    pub total_hours: f64,
}

pub fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| AppError::InvalidDate)
}

fn is_complete(events: &[AttendanceEvent]) -> bool {
    let has = |kind| events.iter().any(|e| e.kind == kind);
    has(EventKind::CheckIn) && has(EventKind::CheckOut)
}

impl TimesheetService {
    /// Creates or refreshes the pending logsheet for (user, date).
    #[instrument(skip(self, principal), fields(user_id = principal.user_id))]
    pub async fn submit_logsheet(
        &self,
        principal: &Principal,
        date: NaiveDate,
        jira_key: Option<&str>,
    ) -> AppResult<LogsheetEntry> {
        let jira_key = jira_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(AppError::MissingField("jira_key"))?;

        let lock = self.locks.for_day(principal.user_id, date).await;
        let _guard = lock.lock().await;

        let events = self.store.events_for_day(principal.user_id, date).await?;
        if !is_complete(&events) {
            warn!("Logsheet submitted for an incomplete day");
            return Err(AppError::IncompleteDay);
        }

        let hours_worked = hours::to_hours(hours::compute_worked_seconds(&events));

        let entry = match self.store.find_logsheet(principal.user_id, date).await? {
            None => {
                self.store
                    .create_logsheet(NewLogsheet {
                        user_id: principal.user_id,
                        date,
                        jira_key: jira_key.to_string(),
                        hours_worked,
                    })
                    .await?
            }
            Some(existing) if existing.is_pending() => {
                let updated = LogsheetEntry {
                    jira_key: jira_key.to_string(),
                    hours_worked,
                    status: LogsheetStatus::Pending,
                    ..existing
                };
                if !self.store.update_pending_logsheet(&updated).await? {
                    return Err(AppError::AlreadyDecided);
                }
                updated
            }
            Some(decided) => {
                warn!(logsheet_id = decided.id, status = %decided.status, "Resubmission of a decided logsheet");
                return Err(AppError::AlreadyDecided);
            }
        };

        info!(logsheet_id = entry.id, hours_worked, "Logsheet submitted");
        Ok(entry)
    }

    /// Whether anything was submitted for (user, date), whatever its status.
    pub async fn logsheet_status(&self, principal: &Principal, date: NaiveDate) -> AppResult<bool> {
        Ok(self
            .store
            .find_logsheet(principal.user_id, date)
            .await?
            .is_some())
    }

    pub async fn list_pending_for_manager(&self, principal: &Principal) -> AppResult<Vec<LogsheetEntry>> {
        principal.authorize(Capability::Manager)?;
        self.store.pending_logsheets().await
    }

    /// One-way Pending -> Approved/Rejected transition.
    #[instrument(skip(self, manager), fields(manager_id = manager.user_id))]
    pub async fn decide(
        &self,
        manager: &Principal,
        entry_id: u64,
        action: Option<&str>,
        credit: Option<f64>,
    ) -> AppResult<LogsheetEntry> {
        manager.authorize(Capability::Manager)?;

        let entry = self
            .store
            .get_logsheet(entry_id)
            .await?
            .filter(LogsheetEntry::is_pending)
            .ok_or(AppError::NotFoundOrAlreadyDecided)?;

        let lock = self.locks.for_day(entry.user_id, entry.date).await;
        let _guard = lock.lock().await;

        // re-read under the lock; a resubmission may have landed meanwhile
        let entry = self
            .store
            .get_logsheet(entry_id)
            .await?
            .filter(LogsheetEntry::is_pending)
            .ok_or(AppError::NotFoundOrAlreadyDecided)?;

        let action = action
            .and_then(|a| DecisionAction::from_str(a.trim()).ok())
            .ok_or(AppError::InvalidAction)?;

        let decided = match action {
            DecisionAction::Approve => {
                let credit = credit
                    .filter(|c| ALLOWED_CREDITS.contains(c))
                    .ok_or(AppError::InvalidCredit)?;
                LogsheetEntry {
                    status: LogsheetStatus::Approved,
                    work_day_credit: credit,
                    manager_id: Some(manager.user_id),
                    ..entry
                }
            }
            DecisionAction::Reject => LogsheetEntry {
                status: LogsheetStatus::Rejected,
                work_day_credit: 0.0,
                manager_id: Some(manager.user_id),
                ..entry
            },
        };

        if !self.store.update_pending_logsheet(&decided).await? {
            return Err(AppError::NotFoundOrAlreadyDecided);
        }

        info!(logsheet_id = decided.id, status = %decided.status, "Logsheet decided");
        Ok(decided)
    }

    /// Events and rounded hours for one user's day; managers or the owner only.
    pub async fn daily_detail(
        &self,
        principal: &Principal,
        target_user: u64,
        date: &str,
    ) -> AppResult<DailyDetail> {
        principal.authorize_owner_or_manager(target_user)?;
        let date = parse_date(date)?;

        let logs = self.store.events_for_day(target_user, date).await?;
        let total_hours = hours::round_hours(hours::to_hours(hours::compute_worked_seconds(&logs)));

        Ok(DailyDetail { logs, total_hours })
    }
}
