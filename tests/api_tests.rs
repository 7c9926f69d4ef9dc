mod common;

use actix_web::{
    App,
    http::StatusCode,
    middleware::{NormalizePath, from_fn},
    test,
    web::{self, Data},
};
use common::{COLLEAGUE_ID, EMPLOYEE_ID, MANAGER_ID, SECRET, setup, test_config};
use serde_json::{Value, json};
use timesheet::auth::{handlers, jwt, middleware::auth_middleware};
use timesheet::routes;

fn token_for(user_id: u64, username: &str, is_manager: bool) -> String {
    jwt::generate_access_token(user_id, username.to_string(), is_manager, SECRET, 900).unwrap()
}

fn employee_token() -> String {
    token_for(EMPLOYEE_ID, "jdoe", false)
}

fn manager_token() -> String {
    token_for(MANAGER_ID, "boss", true)
}

macro_rules! app {
    () => {{
        let (_, service) = setup();
        test::init_service(
            App::new()
                .wrap(NormalizePath::trim())
                .app_data(Data::new(service))
                .app_data(Data::new(test_config()))
                .service(
                    web::scope("/auth")
                        .app_data(routes::json_config())
                        .route("/login", web::post().to(handlers::login))
                        .route("/refresh", web::post().to(handlers::refresh_token)),
                )
                .service(
                    web::scope("/api")
                        .wrap(from_fn(auth_middleware))
                        .configure(routes::api_routes),
                ),
        )
        .await
    }};
}

/// Sends the request and returns the status with the parsed JSON body.
macro_rules! call {
    ($app:expr, $req:expr $(,)?) => {{
        let resp = test::call_service($app, $req.to_request()).await;
        let status = resp.status();
        let body = test::read_body(resp).await;
        let value: Value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(Value::Null)
        };
        (status, value)
    }};
}

fn post(path: &str, token: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri(path)
        .insert_header(("Authorization", format!("Bearer {token}")))
}

fn get(path: &str, token: &str) -> test::TestRequest {
    test::TestRequest::get()
        .uri(path)
        .insert_header(("Authorization", format!("Bearer {token}")))
}

#[actix_web::test]
async fn test_missing_or_bad_token_is_unauthenticated() {
    let app = app!();

    let (status, body) = call!(&app, test::TestRequest::post().uri("/api/check-in/"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "Unauthenticated");

    let (status, _) = call!(&app, post("/api/check-in/", "not-a-jwt"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // refresh tokens are not accepted as access tokens
    let (refresh, _) = jwt::generate_refresh_token(EMPLOYEE_ID, "jdoe".into(), false, SECRET, 900).unwrap();
    let (status, _) = call!(&app, get("/api/time-logs/", &refresh));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_profile() {
    let app = app!();

    let (status, body) = call!(&app, get("/api/user/profile/", &manager_token()));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": MANAGER_ID, "username": "boss", "is_manager": true}));
}

#[actix_web::test]
async fn test_login_issues_usable_tokens() {
    let app = app!();

    let (status, body) = call!(
        &app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({"username": "jdoe", "password": "password"})),
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_manager"], false);

    let access = body["access_token"].as_str().unwrap().to_string();
    let refresh = body["refresh_token"].as_str().unwrap().to_string();

    let (status, profile) = call!(&app, get("/api/user/profile", &access));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["id"], EMPLOYEE_ID);

    let (status, renewed) = call!(&app, post("/auth/refresh", &refresh));
    assert_eq!(status, StatusCode::OK);
    assert!(renewed["access_token"].is_string());

    // an access token cannot be used to refresh
    let (status, _) = call!(&app, post("/auth/refresh", &access));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_login_rejects_bad_credentials() {
    let app = app!();

    let (status, _) = call!(
        &app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({"username": "jdoe", "password": "nope"})),
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call!(
        &app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({"username": "", "password": "x"})),
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "MissingField");
}

#[actix_web::test]
async fn test_attendance_flow_over_http() {
    let app = app!();
    let token = employee_token();

    let (status, body) = call!(&app, post("/api/check-in/", &token));
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["event"]["kind"], "check_in");

    let (status, body) = call!(&app, post("/api/check-in/", &token));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "InvalidTransition");

    let (status, body) = call!(&app, post("/api/break-end/", &token));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "InvalidTransition");

    let (status, body) = call!(&app, get("/api/attendance-status/", &token));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "checked_in");

    let (status, body) = call!(
        &app,
        post("/api/submit-logsheet/", &token).set_json(json!({"jira_key": "HR-1"})),
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "IncompleteDay");

    for path in ["/api/break-start/", "/api/break-end/", "/api/check-out/"] {
        let (status, _) = call!(&app, post(path, &token));
        assert_eq!(status, StatusCode::CREATED, "{path}");
    }

    let (status, body) = call!(&app, get("/api/time-logs/", &token));
    assert_eq!(status, StatusCode::OK);
    let kinds: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["check_in", "break_start", "break_end", "check_out"]);

    let (status, body) = call!(&app, get("/api/logsheet-status/", &token));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"has_submitted": false}));

    let (status, body) = call!(&app, post("/api/submit-logsheet/", &token).set_json(json!({})));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "MissingField");

    let (status, body) = call!(
        &app,
        post("/api/submit-logsheet/", &token).set_json(json!({"jira_key": "HR-1"})),
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["jira_key"], "HR-1");

    let (_, body) = call!(&app, get("/api/logsheet-status/", &token));
    assert_eq!(body, json!({"has_submitted": true}));
}

#[actix_web::test]
async fn test_manager_decision_over_http() {
    let app = app!();
    let token = employee_token();
    for path in ["/api/check-in", "/api/check-out"] {
        call!(&app, post(path, &token));
    }
    let (_, entry) = call!(
        &app,
        post("/api/submit-logsheet", &token).set_json(json!({"jira_key": "HR-9"})),
    );
    let id = entry["id"].as_u64().unwrap();
    let decide_path = format!("/api/manager/logsheets/{id}/");

    // employees are turned away
    let (status, body) = call!(&app, get("/api/manager/logsheets/", &token));
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "Forbidden");
    let (status, _) = call!(
        &app,
        post(&decide_path, &token).set_json(json!({"action": "approve", "work_day_credit": 1.0})),
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let boss = manager_token();
    let (status, body) = call!(&app, get("/api/manager/logsheets/", &boss));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = call!(
        &app,
        post(&decide_path, &boss).set_json(json!({"action": "approve", "work_day_credit": 0.75})),
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "InvalidCredit");

    let (status, body) = call!(
        &app,
        post(&decide_path, &boss).set_json(json!({"action": "archive"})),
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "InvalidAction");

    let (status, body) = call!(
        &app,
        post(&decide_path, &boss).set_json(json!({"action": "approve", "work_day_credit": 0.5})),
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["logsheet"]["status"], "approved");
    assert_eq!(body["logsheet"]["work_day_credit"], 0.5);
    assert_eq!(body["logsheet"]["manager_id"], MANAGER_ID);

    let (status, body) = call!(
        &app,
        post(&decide_path, &boss).set_json(json!({"action": "reject"})),
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "NotFoundOrAlreadyDecided");

    let (_, body) = call!(&app, get("/api/manager/logsheets/", &boss));
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn test_user_time_logs_access() {
    let app = app!();
    let token = employee_token();
    call!(&app, post("/api/check-in/", &token));

    let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
    let own = format!("/api/time-logs/{EMPLOYEE_ID}/{today}/");

    let (status, body) = call!(&app, get(&own, &token));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["logs"].as_array().unwrap().len(), 1);
    assert_eq!(body["total_hours"], 0.0);

    let (status, _) = call!(&app, get(&own, &manager_token()));
    assert_eq!(status, StatusCode::OK);

    let colleague = token_for(COLLEAGUE_ID, "asmith", false);
    let (status, body) = call!(&app, get(&own, &colleague));
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "Forbidden");

    let (status, body) = call!(&app, get(&format!("/api/time-logs/{EMPLOYEE_ID}/yesterday/"), &token));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "InvalidDate");
}

#[actix_web::test]
async fn test_bad_bodies_answer_with_a_kind() {
    let app = app!();
    let token = employee_token();
    for path in ["/api/check-in", "/api/check-out"] {
        call!(&app, post(path, &token));
    }

    let (status, body) = call!(&app, post("/api/submit-logsheet/", &token));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "MissingField");

    let (status, body) = call!(
        &app,
        post("/api/submit-logsheet/", &token).set_json(json!({"jira_key": 42})),
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "InvalidBody");

    let (status, body) = call!(
        &app,
        test::TestRequest::post()
            .uri("/auth/login")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json"),
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "InvalidBody");
}

#[actix_web::test]
async fn test_decide_checks_role_before_body() {
    let app = app!();
    let token = employee_token();
    for path in ["/api/check-in", "/api/check-out"] {
        call!(&app, post(path, &token));
    }
    let (_, entry) = call!(
        &app,
        post("/api/submit-logsheet", &token).set_json(json!({"jira_key": "HR-3"})),
    );
    let decide_path = format!("/api/manager/logsheets/{}/", entry["id"]);

    // employees are refused whatever they send
    let (status, body) = call!(&app, post(&decide_path, &token));
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "Forbidden");
    let (status, _) = call!(
        &app,
        post(&decide_path, &token).set_json(json!({"work_day_credit": "1.0"})),
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let boss = manager_token();
    let (status, body) = call!(&app, post(&decide_path, &boss));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "MissingField");

    let (status, body) = call!(
        &app,
        post(&decide_path, &boss).set_json(json!({"action": "approve", "work_day_credit": "1.0"})),
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "InvalidBody");

    // still pending after the bad attempts
    let (_, pending) = call!(&app, get("/api/manager/logsheets", &boss));
    assert_eq!(pending.as_array().unwrap().len(), 1);
}
