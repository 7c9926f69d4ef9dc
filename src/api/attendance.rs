use actix_web::{HttpResponse, web};
use chrono::Local;
use serde::Serialize;
use utoipa::ToSchema;

use crate::service::TimesheetService;
use crate::errors::AppResult;
use crate::model::principal::Principal;
use crate::model::time_log::{AttendanceEvent, EventKind};

#[derive(Serialize, ToSchema)]
pub struct EventResponse {
    #[schema(example = "Checked in successfully.")]
    pub detail: String,
    pub event: AttendanceEvent,
}

fn confirmation(kind: EventKind) -> &'static str {
    match kind {
        EventKind::CheckIn => "Checked in successfully.",
        EventKind::BreakStart => "Break started.",
        EventKind::BreakEnd => "Break ended.",
        EventKind::CheckOut => "Checked out successfully.",
    }
}

async fn record(
    principal: Principal,
    service: web::Data<TimesheetService>,
    kind: EventKind,
) -> AppResult<HttpResponse> {
    let event = service.submit_event(&principal, kind, Local::now()).await?;

    Ok(HttpResponse::Created().json(EventResponse {
        detail: confirmation(kind).to_string(),
        event,
    }))
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/check-in",
    responses(
        (status = 201, description = "Checked in", body = EventResponse),
        (status = 400, description = "InvalidTransition, e.g. already checked in today"),
        (status = 401, description = "Unauthenticated")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    principal: Principal,
    service: web::Data<TimesheetService>,
) -> AppResult<HttpResponse> {
    record(principal, service, EventKind::CheckIn).await
}

/// Break-start endpoint
#[utoipa::path(
    post,
    path = "/api/break-start",
    responses(
        (status = 201, description = "Break started", body = EventResponse),
        (status = 400, description = "InvalidTransition"),
        (status = 401, description = "Unauthenticated")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn break_start(
    principal: Principal,
    service: web::Data<TimesheetService>,
) -> AppResult<HttpResponse> {
    record(principal, service, EventKind::BreakStart).await
}

/// Break-end endpoint
#[utoipa::path(
    post,
    path = "/api/break-end",
    responses(
        (status = 201, description = "Break ended", body = EventResponse),
        (status = 400, description = "InvalidTransition, e.g. not on a break"),
        (status = 401, description = "Unauthenticated")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn break_end(
    principal: Principal,
    service: web::Data<TimesheetService>,
) -> AppResult<HttpResponse> {
    record(principal, service, EventKind::BreakEnd).await
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/check-out",
    responses(
        (status = 201, description = "Checked out", body = EventResponse),
        (status = 400, description = "InvalidTransition"),
        (status = 401, description = "Unauthenticated")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    principal: Principal,
    service: web::Data<TimesheetService>,
) -> AppResult<HttpResponse> {
    record(principal, service, EventKind::CheckOut).await
}

/// Today's events for the caller, oldest first
#[utoipa::path(
    get,
    path = "/api/time-logs",
    responses(
        (status = 200, description = "Today's events", body = Vec<AttendanceEvent>),
        (status = 401, description = "Unauthenticated")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn time_logs(
    principal: Principal,
    service: web::Data<TimesheetService>,
) -> AppResult<HttpResponse> {
    let events = service.today_events(&principal, Local::now()).await?;
    Ok(HttpResponse::Ok().json(events))
}

/// Derived state and live hours for today
#[utoipa::path(
    get,
    path = "/api/attendance-status",
    responses(
        (status = 200, description = "Current attendance state", body = AttendanceStatus),
        (status = 401, description = "Unauthenticated")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn attendance_status(
    principal: Principal,
    service: web::Data<TimesheetService>,
) -> AppResult<HttpResponse> {
    let status = service.attendance_status(&principal, Local::now()).await?;
    Ok(HttpResponse::Ok().json(status))
}
