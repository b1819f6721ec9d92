//! Logging infrastructure for structured console and file output.

mod logger;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use subscriber::init_subscriber;
pub use types::{Log, UnitEntry, UnitStatus};

/// In-memory [`Log`] implementation for unit tests.
///
/// Captures warnings and recorded unit outcomes so tests can assert on the
/// engine's logging behaviour without a tracing subscriber.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryLog {
    /// Warning messages, in emission order.
    pub warnings: std::sync::Mutex<Vec<String>>,
    /// Recorded unit outcomes, in emission order.
    pub units: std::sync::Mutex<Vec<UnitEntry>>,
}

#[cfg(test)]
impl MemoryLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Clone of all recorded unit entries.
    pub(crate) fn unit_entries(&self) -> Vec<UnitEntry> {
        self.units.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Clone of all warning messages.
    pub(crate) fn warning_messages(&self) -> Vec<String> {
        self.warnings.lock().map_or_else(|_| vec![], |g| g.clone())
    }
}

#[cfg(test)]
impl Log for MemoryLog {
    fn stage(&self, _msg: &str) {}
    fn info(&self, _msg: &str) {}
    fn debug(&self, _msg: &str) {}

    fn warn(&self, msg: &str) {
        if let Ok(mut guard) = self.warnings.lock() {
            guard.push(msg.to_string());
        }
    }

    fn error(&self, msg: &str) {
        self.warn(msg);
    }

    fn dry_run(&self, _msg: &str) {}

    fn record_unit(&self, name: &str, status: UnitStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.units.lock() {
            guard.push(UnitEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }
}
