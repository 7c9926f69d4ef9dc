use actix_web::{HttpResponse, web};
use chrono::Local;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::service::TimesheetService;
use crate::errors::AppResult;
use crate::model::principal::Principal;

#[derive(Deserialize, ToSchema)]
pub struct SubmitLogsheetReq {
    #[schema(example = "HR-142")]
    pub jira_key: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct LogsheetStatusResponse {
    pub has_submitted: bool,
}

/// Submit (or resubmit while pending) today's logsheet
#[utoipa::path(
    post,
    path = "/api/submit-logsheet",
    request_body = SubmitLogsheetReq,
    responses(
        (status = 201, description = "Pending logsheet entry", body = LogsheetEntry),
        (status = 400, description = "MissingField, InvalidBody or IncompleteDay"),
        (status = 401, description = "Unauthenticated"),
        (status = 409, description = "AlreadyDecided")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Logsheet"
)]
pub async fn submit_logsheet(
    principal: Principal,
    service: web::Data<TimesheetService>,
    payload: web::Json<SubmitLogsheetReq>,
) -> AppResult<HttpResponse> {
    let today = Local::now().date_naive();
    let entry = service
        .submit_logsheet(&principal, today, payload.jira_key.as_deref())
        .await?;

    Ok(HttpResponse::Created().json(entry))
}

/// Whether a logsheet was submitted today, whatever its status
#[utoipa::path(
    get,
    path = "/api/logsheet-status",
    responses(
        (status = 200, description = "Submission flag", body = LogsheetStatusResponse),
        (status = 401, description = "Unauthenticated")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Logsheet"
)]
pub async fn logsheet_status(
    principal: Principal,
    service: web::Data<TimesheetService>,
) -> AppResult<HttpResponse> {
    let has_submitted = service
        .logsheet_status(&principal, Local::now().date_naive())
        .await?;

    Ok(HttpResponse::Ok().json(LogsheetStatusResponse { has_submitted }))
}

/// One user's events and hours for a given day
#[utoipa::path(
    get,
    path = "/api/time-logs/{user_id}/{date}",
    params(
        ("user_id" = u64, Path, description = "Owner of the events"),
        ("date" = String, Path, description = "Calendar day, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Events and rounded total hours", body = DailyDetail),
        (status = 400, description = "InvalidDate", body = Object, example = json!({
            "kind": "InvalidDate",
            "detail": "Invalid date format. Use YYYY-MM-DD."
        })),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Logsheet"
)]
pub async fn user_time_logs(
    principal: Principal,
    service: web::Data<TimesheetService>,
    path: web::Path<(u64, String)>,
) -> AppResult<HttpResponse> {
    let (user_id, date) = path.into_inner();
    let detail = service.daily_detail(&principal, user_id, &date).await?;
    Ok(HttpResponse::Ok().json(detail))
}
