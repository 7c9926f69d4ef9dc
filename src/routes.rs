use crate::{
    api::{attendance, logsheet, manager, profile},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
    errors::json_error,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Option<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        60_000 / requests_per_min as u64
    };
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms.max(1))
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()?;
    Some(Governor::new(&cfg))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let (Some(login_limiter), Some(refresh_limiter), Some(protected_limiter)) = (
        build_limiter(config.rate_login_per_min),
        build_limiter(config.rate_refresh_per_min),
        build_limiter(config.rate_protected_per_min),
    ) else {
        tracing::error!("Invalid rate limit configuration, routes not mounted");
        return;
    };
    let login_limiter = Arc::new(login_limiter);

    // Public routes
    cfg.service(
        web::scope("/auth")
            .app_data(json_config())
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(Arc::new(refresh_limiter))
                    .route(web::post().to(handlers::refresh_token)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(Arc::new(protected_limiter)) // rate limiting
            .configure(api_routes),
    );
}

/// Malformed or missing JSON bodies answer as `AppError`s.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error)
}

/// Everything behind the bearer middleware, relative to the API prefix.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());
    cfg.service(web::resource("/user/profile").route(web::get().to(profile::profile)))
        // employee attendance
        .service(web::resource("/check-in").route(web::post().to(attendance::check_in)))
        .service(web::resource("/break-start").route(web::post().to(attendance::break_start)))
        .service(web::resource("/break-end").route(web::post().to(attendance::break_end)))
        .service(web::resource("/check-out").route(web::post().to(attendance::check_out)))
        .service(web::resource("/time-logs").route(web::get().to(attendance::time_logs)))
        .service(
            web::resource("/attendance-status").route(web::get().to(attendance::attendance_status)),
        )
        // /time-logs/{user_id}/{date}
        .service(
            web::resource("/time-logs/{user_id}/{date}")
                .route(web::get().to(logsheet::user_time_logs)),
        )
        // logsheets
        .service(web::resource("/submit-logsheet").route(web::post().to(logsheet::submit_logsheet)))
        .service(web::resource("/logsheet-status").route(web::get().to(logsheet::logsheet_status)))
        .service(
            web::scope("/manager")
                // /manager/logsheets
                .service(
                    web::resource("/logsheets").route(web::get().to(manager::pending_logsheets)),
                )
                // /manager/logsheets/{id}
                .service(
                    web::resource("/logsheets/{id}")
                        .route(web::post().to(manager::decide_logsheet)),
                ),
        );
}

