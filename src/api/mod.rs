pub mod attendance;
pub mod logsheet;
pub mod manager;
pub mod profile;
