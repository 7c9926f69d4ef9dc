use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::service::TimesheetService;
use crate::errors::AppResult;
use crate::model::logsheet::{LogsheetEntry, LogsheetStatus};
use crate::model::principal::{Capability, Principal};

#[derive(Deserialize, ToSchema)]
pub struct DecisionReq {
    /// `approve` or `reject`
    #[schema(example = "approve")]
    pub action: Option<String>,
    /// 1.0 or 0.5, required on approval
    #[schema(example = 1.0)]
    pub work_day_credit: Option<f64>,
}

#[derive(Serialize, ToSchema)]
pub struct DecisionResponse {
    #[schema(example = "Logsheet approved.")]
    pub detail: String,
    pub logsheet: LogsheetEntry,
}

/// Pending logsheets, newest date first
#[utoipa::path(
    get,
    path = "/api/manager/logsheets",
    responses(
        (status = 200, description = "Pending logsheets", body = Vec<LogsheetEntry>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Manager"
)]
pub async fn pending_logsheets(
    principal: Principal,
    service: web::Data<TimesheetService>,
) -> AppResult<HttpResponse> {
    let entries = service.list_pending_for_manager(&principal).await?;
    Ok(HttpResponse::Ok().json(entries))
}

/// Approve or reject a pending logsheet
#[utoipa::path(
    post,
    path = "/api/manager/logsheets/{id}",
    params(
        ("id" = u64, Path, description = "Logsheet id")
    ),
    request_body = DecisionReq,
    responses(
        (status = 200, description = "Logsheet decided", body = DecisionResponse),
        (status = 400, description = "InvalidAction, InvalidCredit, MissingField or InvalidBody"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "NotFoundOrAlreadyDecided")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Manager"
)]
#[instrument(skip(principal, service, payload), fields(manager_id = principal.user_id))]
pub async fn decide_logsheet(
    principal: Principal,
    service: web::Data<TimesheetService>,
    path: web::Path<u64>,
    payload: Result<web::Json<DecisionReq>, actix_web::Error>,
) -> actix_web::Result<HttpResponse> {
    // role first: a non-manager is refused whatever the body holds
    principal.authorize(Capability::Manager)?;
    let payload = payload?;

    let id = path.into_inner();
    let logsheet = service
        .decide(&principal, id, payload.action.as_deref(), payload.work_day_credit)
        .await?;

    let detail = match logsheet.status {
        LogsheetStatus::Approved => "Logsheet approved.",
        _ => "Logsheet rejected.",
    };

    Ok(HttpResponse::Ok().json(DecisionResponse {
        detail: detail.to_string(),
        logsheet,
    }))
}
