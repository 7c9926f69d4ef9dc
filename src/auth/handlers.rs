use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{debug, info, instrument};

use crate::{
    auth::{
        jwt::{generate_access_token, generate_refresh_token, verify_token},
        password::verify_password,
    },
    config::Config,
    service::TimesheetService,
    errors::{AppError, AppResult},
    models::{LoginReqDto, LoginResponse, TokenType},
};

fn issue_pair(
    user_id: u64,
    username: String,
    is_manager: bool,
    config: &Config,
) -> AppResult<LoginResponse> {
    let access_token = generate_access_token(
        user_id,
        username.clone(),
        is_manager,
        &config.jwt_secret,
        config.access_token_ttl,
    )?;

    let (refresh_token, _) = generate_refresh_token(
        user_id,
        username,
        is_manager,
        &config.jwt_secret,
        config.refresh_token_ttl,
    )?;

    Ok(LoginResponse {
        access_token,
        refresh_token,
        is_manager,
    })
}

/// Exchange credentials for an access/refresh token pair
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Tokens issued", body = LoginResponse),
        (status = 400, description = "Username or password missing"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(service, config, user), fields(username = %user.username))]
pub async fn login(
    user: web::Json<LoginReqDto>,
    service: web::Data<TimesheetService>,
    config: web::Data<Config>,
) -> AppResult<HttpResponse> {
    info!("Login request received");

    if user.username.trim().is_empty() {
        return Err(AppError::MissingField("username"));
    }
    if user.password.is_empty() {
        return Err(AppError::MissingField("password"));
    }

    let db_user = match service.store().find_user_by_username(user.username.trim()).await? {
        Some(u) => u,
        None => {
            info!("Invalid credentials: user not found");
            return Err(AppError::Unauthenticated);
        }
    };

    debug!(user_id = db_user.id, "Verifying password");
    if let Err(e) = verify_password(&user.password, &db_user.password) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return Err(AppError::Unauthenticated);
    }

    let pair = issue_pair(db_user.id, db_user.username, db_user.is_manager, &config)?;

    info!(user_id = db_user.id, "Login successful");
    Ok(HttpResponse::Ok().json(pair))
}

/// Trade a refresh token for a fresh pair
#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "Tokens issued", body = LoginResponse),
        (status = 401, description = "Missing, invalid or non-refresh token")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Auth"
)]
pub async fn refresh_token(req: HttpRequest, config: web::Data<Config>) -> AppResult<HttpResponse> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthenticated)?;

    let claims = verify_token(token, &config.jwt_secret).map_err(|_| AppError::Unauthenticated)?;

    if claims.token_type != TokenType::Refresh {
        return Err(AppError::Unauthenticated);
    }

    let pair = issue_pair(claims.user_id, claims.sub, claims.is_manager, &config)?;
    Ok(HttpResponse::Ok().json(pair))
}
