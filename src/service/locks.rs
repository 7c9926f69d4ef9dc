use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use futures::lock::Mutex;
use moka::future::Cache;

pub type DayKey = (u64, NaiveDate);

/// Shortest idle time a day lock may be configured with.
pub const MIN_IDLE: Duration = Duration::from_secs(60);

/// One async mutex per (user, calendar day). Read-validate-write sequences
/// hold it so two requests can never both pass validation on the same state.
///
/// Entries are evicted after sitting idle for at least [`MIN_IDLE`]; a request
/// holds its lock for a handful of store calls, far below that.
#[derive(Clone)]
pub struct DayLocks {
    locks: Cache<DayKey, Arc<Mutex<()>>>,
}

impl DayLocks {
    /// `idle` below [`MIN_IDLE`] is raised to it.
    pub fn new(idle: Duration) -> Self {
        Self {
            locks: Cache::builder().time_to_idle(idle.max(MIN_IDLE)).build(),
        }
    }

    pub async fn for_day(&self, user_id: u64, date: NaiveDate) -> Arc<Mutex<()>> {
        self.locks
            .get_with((user_id, date), async { Arc::new(Mutex::new(())) })
            .await
    }
}

impl Default for DayLocks {
    fn default() -> Self {
        Self::new(Duration::from_secs(3600))
    }
}
