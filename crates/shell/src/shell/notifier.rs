use taskmuse_core::{Notification, NotificationSink, SinkError};

use super::console::Console;
use crate::render;

/// Prints toasts to the console.
#[derive(Clone)]
pub struct TerminalSink {
    console: Console,
}

impl TerminalSink {
    pub fn new(console: Console) -> Self {
        Self { console }
    }
}

impl NotificationSink for TerminalSink {
    fn notify(&mut self, notification: Notification) -> Result<(), SinkError> {
        self.console
            .lines(render::notification_lines(&notification))
            .map_err(|err| SinkError(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::console::testing::SharedBuffer;

    #[test]
    fn prints_title_and_body() {
        let buffer = SharedBuffer::default();
        let mut sink = TerminalSink::new(buffer.console());
        sink.notify(Notification::error("🚨 Overdue").with_body("reschedule"))
            .unwrap();
        assert_eq!(buffer.contents(), "🔔 [error] 🚨 Overdue\n    reschedule\n");
    }
}
