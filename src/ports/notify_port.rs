//! Notification sink port trait.

use crate::domain::error::TrendsigError;

/// Delivery target for signal messages. Failures are reported, not thrown
/// across the batch: callers log and continue.
pub trait NotifyPort {
    fn notify(&self, text: &str) -> Result<(), TrendsigError>;
}
