pub mod attendance;
pub mod hours;
pub mod locks;
pub mod logsheet;

use std::sync::Arc;

use crate::service::locks::DayLocks;
use crate::store::Store;

/// Entry point for every attendance and logsheet operation. Cheap to clone;
/// the HTTP layer keeps one in `web::Data`.
#[derive(Clone)]
pub struct TimesheetService {
    store: Arc<dyn Store>,
    locks: DayLocks,
}

impl TimesheetService {
    pub fn new(store: Arc<dyn Store>, locks: DayLocks) -> Self {
        Self { store, locks }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}
