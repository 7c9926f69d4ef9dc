use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// The four attendance actions an employee can record during a day.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    CheckIn,
    BreakStart,
    BreakEnd,
    CheckOut,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "user_id": 7,
    "kind": "check_in",
    "timestamp": "2026-01-05T09:00:00Z",
    "work_date": "2026-01-05"
}))]
pub struct AttendanceEvent {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 7)]
    pub user_id: u64,
    pub kind: EventKind,
    /// Server-assigned, never mutated.
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,
    /// Calendar day (server local time) the event belongs to.
    #[schema(value_type = String, format = Date)]
    pub work_date: NaiveDate,
}

/// Row shape before it is handed to the store.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub user_id: u64,
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
    pub work_date: NaiveDate,
}
