#![allow(dead_code)]
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use timesheet::auth::password::hash_password;
use timesheet::config::Config;
use timesheet::model::principal::Principal;
use timesheet::model::user::UserCredentials;
use timesheet::service::{TimesheetService, locks::DayLocks};
use timesheet::store::memory::MemoryStore;

pub const SECRET: &str = "integration-test-secret";
pub const EMPLOYEE_ID: u64 = 1;
pub const COLLEAGUE_ID: u64 = 2;
pub const MANAGER_ID: u64 = 3;

pub fn employee() -> Principal {
    Principal {
        user_id: EMPLOYEE_ID,
        username: "jdoe".into(),
        is_manager: false,
    }
}

pub fn colleague() -> Principal {
    Principal {
        user_id: COLLEAGUE_ID,
        username: "asmith".into(),
        is_manager: false,
    }
}

pub fn manager() -> Principal {
    Principal {
        user_id: MANAGER_ID,
        username: "boss".into(),
        is_manager: true,
    }
}

/// Seeded accounts; every password is "password".
pub fn users() -> Vec<UserCredentials> {
    let hashed = hash_password("password").expect("hash");
    [employee(), colleague(), manager()]
        .into_iter()
        .map(|p| UserCredentials {
            id: p.user_id,
            username: p.username,
            password: hashed.clone(),
            is_manager: p.is_manager,
        })
        .collect()
}

pub fn setup() -> (Arc<MemoryStore>, TimesheetService) {
    let store = Arc::new(MemoryStore::with_users(users()));
    let service = TimesheetService::new(store.clone(), DayLocks::default());
    (store, service)
}

pub fn test_config() -> Config {
    Config {
        database_url: None,
        jwt_secret: SECRET.to_string(),
        server_addr: "127.0.0.1:0".to_string(),
        access_token_ttl: 900,
        refresh_token_ttl: 3600,
        rate_login_per_min: 60,
        rate_refresh_per_min: 30,
        rate_protected_per_min: 1000,
        api_prefix: "/api".to_string(),
        log_dir: "logs".to_string(),
        day_lock_idle_secs: 3600,
        dev_users: Vec::new(),
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Local wall-clock instant on 2026-01-05 (a Monday).
pub fn at(h: u32, m: u32) -> DateTime<Local> {
    on(date(2026, 1, 5), h, m)
}

pub fn on(day: NaiveDate, h: u32, m: u32) -> DateTime<Local> {
    use chrono::Datelike;
    Local
        .with_ymd_and_hms(day.year(), day.month(), day.day(), h, m, 0)
        .single()
        .expect("unambiguous local time")
}
