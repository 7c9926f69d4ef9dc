use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogsheetStatus {
    Pending,
    Approved,
    Rejected,
}

/// Manager decision on a pending logsheet.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum DecisionAction {
    Approve,
    Reject,
}

/// Work-day fractions a manager may credit on approval.
pub const ALLOWED_CREDITS: [f64; 2] = [1.0, 0.5];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 3,
    "user_id": 7,
    "date": "2026-01-05",
    "jira_key": "HR-142",
    "hours_worked": 7.5,
    "status": "pending",
    "manager_id": null,
    "work_day_credit": 0.0
}))]
pub struct LogsheetEntry {
    pub id: u64,
    pub user_id: u64,
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    /// Free-text work item reference (issue tracker key).
    pub jira_key: String,
    pub hours_worked: f64,
    pub status: LogsheetStatus,
    pub manager_id: Option<u64>,
    pub work_day_credit: f64,
}

impl LogsheetEntry {
    pub fn is_pending(&self) -> bool {
        self.status == LogsheetStatus::Pending
    }
}

#[derive(Debug, Clone)]
pub struct NewLogsheet {
    pub user_id: u64,
    pub date: NaiveDate,
    pub jira_key: String,
    pub hours_worked: f64,
}
