//! Activity notifications for UI indicators.

use std::sync::Arc;

/// Told when a network operation starts and ends.
///
/// Every `enter_busy` is matched by exactly one `leave_busy`, on success and
/// on failure alike. Calls may come from any task.
pub trait BusynessObserver: Send + Sync {
    fn enter_busy(&self);
    fn leave_busy(&self);
}

/// Scoped enter/leave pair around one operation.
#[must_use = "the operation is only marked busy while the guard is alive"]
pub struct BusyGuard {
    observer: Option<Arc<dyn BusynessObserver>>,
}

impl BusyGuard {
    pub fn new(observer: Option<Arc<dyn BusynessObserver>>) -> Self {
        if let Some(observer) = &observer {
            observer.enter_busy();
        }
        Self { observer }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.leave_busy();
        }
    }
}
