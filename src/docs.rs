use crate::api::attendance::EventResponse;
use crate::api::logsheet::{LogsheetStatusResponse, SubmitLogsheetReq};
use crate::api::manager::{DecisionReq, DecisionResponse};
use crate::service::attendance::{AttendanceState, AttendanceStatus};
use crate::service::logsheet::DailyDetail;
use crate::model::logsheet::{LogsheetEntry, LogsheetStatus};
use crate::model::time_log::{AttendanceEvent, EventKind};
use crate::model::user::UserProfile;
use crate::models::{LoginReqDto, LoginResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Timesheet API",
        version = "1.0.0",
        description = r#"
## Attendance & Logsheet Approval

Employees record their working day as a sequence of attendance events and
submit a daily logsheet against a work item; managers approve or reject it.

### Key Features
- **Attendance**
  - Check-in, break start/end, check-out; illegal transitions are rejected
  - Worked hours exclude break time
- **Logsheets**
  - One entry per employee per day, resubmittable while pending
- **Manager workflow**
  - Review pending logsheets, approve with a 1.0 or 0.5 work-day credit, or reject

### Security
All `/api` endpoints require a **JWT Bearer** access token from `/auth/login`.
Manager endpoints additionally require the manager flag.

### Errors
Every failure answers `{"kind": "...", "detail": "..."}`.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,

        crate::api::profile::profile,

        crate::api::attendance::check_in,
        crate::api::attendance::break_start,
        crate::api::attendance::break_end,
        crate::api::attendance::check_out,
        crate::api::attendance::time_logs,
        crate::api::attendance::attendance_status,

        crate::api::logsheet::submit_logsheet,
        crate::api::logsheet::logsheet_status,
        crate::api::logsheet::user_time_logs,

        crate::api::manager::pending_logsheets,
        crate::api::manager::decide_logsheet
    ),
    components(
        schemas(
            LoginReqDto,
            LoginResponse,
            UserProfile,
            EventKind,
            AttendanceEvent,
            EventResponse,
            AttendanceState,
            AttendanceStatus,
            LogsheetStatus,
            LogsheetEntry,
            SubmitLogsheetReq,
            LogsheetStatusResponse,
            DailyDetail,
            DecisionReq,
            DecisionResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Token issuance"),
        (name = "User", description = "Caller profile"),
        (name = "Attendance", description = "Attendance events"),
        (name = "Logsheet", description = "Daily logsheet submission"),
        (name = "Manager", description = "Logsheet approval"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
