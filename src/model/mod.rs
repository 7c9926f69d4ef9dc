pub mod logsheet;
pub mod principal;
pub mod time_log;
pub mod user;
