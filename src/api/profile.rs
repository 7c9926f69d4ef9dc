use actix_web::{HttpResponse, web};

use crate::service::TimesheetService;
use crate::errors::{AppError, AppResult};
use crate::model::principal::Principal;

/// The caller's own profile
#[utoipa::path(
    get,
    path = "/api/user/profile",
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 401, description = "Unauthenticated")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "User"
)]
pub async fn profile(
    principal: Principal,
    service: web::Data<TimesheetService>,
) -> AppResult<HttpResponse> {
    let profile = service
        .store()
        .get_user(principal.user_id)
        .await?
        .ok_or(AppError::Unauthenticated)?;

    Ok(HttpResponse::Ok().json(profile))
}
