//! Console notification adapter.
//!
//! Local stand-in for a chat-service sink: messages go to stdout and the
//! log. Swapping in a real delivery channel means implementing
//! [`NotifyPort`](crate::ports::notify_port::NotifyPort) elsewhere; the
//! engine does not care.

use log::info;

use crate::domain::error::TrendsigError;
use crate::ports::notify_port::NotifyPort;

#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        ConsoleNotifier
    }
}

impl NotifyPort for ConsoleNotifier {
    fn notify(&self, text: &str) -> Result<(), TrendsigError> {
        println!("{}", text);
        info!("notification: {}", text);
        Ok(())
    }
}
