//! Attendance state machine.
//!
//! There is no stored "current state": the kind of the latest event of the
//! day is the state, and every submission is validated against it.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use strum_macros::Display;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::service::{TimesheetService, hours};
use crate::errors::{AppError, AppResult};
use crate::model::principal::Principal;
use crate::model::time_log::{AttendanceEvent, EventKind, NewEvent};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceState {
    #[strum(serialize = "not checked in")]
    NoEvents,
    #[strum(serialize = "checked in")]
    CheckedIn,
    #[strum(serialize = "on a break")]
    OnBreak,
    #[strum(serialize = "checked out")]
    CheckedOut,
}

impl AttendanceState {
    /// State after an event of `kind`; `None` means no event yet today.
    pub fn from_latest(kind: Option<EventKind>) -> Self {
        match kind {
            None => AttendanceState::NoEvents,
            Some(EventKind::CheckIn) | Some(EventKind::BreakEnd) => AttendanceState::CheckedIn,
            Some(EventKind::BreakStart) => AttendanceState::OnBreak,
            Some(EventKind::CheckOut) => AttendanceState::CheckedOut,
        }
    }

    /// Fold over an ordered day of events.
    pub fn replay(events: &[AttendanceEvent]) -> Self {
        Self::from_latest(events.last().map(|e| e.kind))
    }

    /// Consults the transition table. The error is the human-readable reason.
    pub fn accept(self, kind: EventKind) -> Result<AttendanceState, &'static str> {
        use AttendanceState::*;
        use EventKind::*;

        match (self, kind) {
            (NoEvents, CheckIn) => Ok(CheckedIn),
            (NoEvents, _) => Err("you have not checked in today"),

            (CheckedIn, BreakStart) => Ok(OnBreak),
            (CheckedIn, CheckOut) => Ok(CheckedOut),
            (CheckedIn, CheckIn) => Err("already checked in today"),
            (CheckedIn, BreakEnd) => Err("not on a break"),

            (OnBreak, BreakEnd) => Ok(CheckedIn),
            (OnBreak, CheckIn) => Err("already checked in today"),
            (OnBreak, BreakStart) => Err("already on a break"),
            (OnBreak, CheckOut) => Err("end the break before checking out"),

            (CheckedOut, _) => Err("already checked out for today"),
        }
    }
}

/// Live view of a (possibly unfinished) day.
#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceStatus {
    pub state: AttendanceState,
    pub events: Vec<AttendanceEvent>,
    #[schema(example = 3.25)]
    pub hours_so_far: f64,
}

impl TimesheetService {
    /// Validates `kind` against today's history and appends it stamped with `now`,
    /// or with the latest event's time if `now` is earlier.
    #[instrument(skip(self, principal, kind), fields(user_id = principal.user_id, kind = %kind))]
    pub async fn submit_event(
        &self,
        principal: &Principal,
        kind: EventKind,
        now: DateTime<Local>,
    ) -> AppResult<AttendanceEvent> {
        let today = now.date_naive();
        let lock = self.locks.for_day(principal.user_id, today).await;
        let _guard = lock.lock().await;

        let latest = self.store.latest_event(principal.user_id, today).await?;
        let current = AttendanceState::from_latest(latest.as_ref().map(|e| e.kind));

        if let Err(reason) = current.accept(kind) {
            warn!(%current, reason, "Rejected attendance event");
            return Err(AppError::InvalidTransition {
                attempted: kind,
                current,
                reason,
            });
        }

        // a day's events never go backwards in time
        let mut timestamp = now.with_timezone(&Utc);
        if let Some(prev) = latest.filter(|prev| prev.timestamp > timestamp) {
            warn!(requested = %timestamp, latest = %prev.timestamp, "Clock behind latest event, clamping");
            timestamp = prev.timestamp;
        }

        let event = self
            .store
            .append_event(NewEvent {
                user_id: principal.user_id,
                kind,
                timestamp,
                work_date: today,
            })
            .await?;

        info!(event_id = event.id, "Attendance event recorded");
        Ok(event)
    }

    pub async fn today_events(
        &self,
        principal: &Principal,
        now: DateTime<Local>,
    ) -> AppResult<Vec<AttendanceEvent>> {
        self.store
            .events_for_day(principal.user_id, now.date_naive())
            .await
    }

    pub async fn attendance_status(
        &self,
        principal: &Principal,
        now: DateTime<Local>,
    ) -> AppResult<AttendanceStatus> {
        let events = self.today_events(principal, now).await?;
        let seconds = hours::compute_worked_seconds(&events);

        Ok(AttendanceStatus {
            state: AttendanceState::replay(&events),
            hours_so_far: hours::round_hours(hours::to_hours(seconds)),
            events,
        })
    }
}
