//! Chat panel with simulated thinking time.
//!
//! The reply is computed from the snapshot at submit time, then held back for
//! a random delay by a spawned task. Every pending reply hangs off one
//! [`CancellationToken`]; cancelling it (or dropping the panel) turns the
//! delayed delivery into a no-op.

use std::sync::Arc;
use std::time::Duration;

use taskmuse_core::chat::{ChatLog, ChatMessage};
use taskmuse_core::{Assistant, Clock, RandomSource, Response, Task};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub struct ChatPanel {
    log: ChatLog,
    assistant: Assistant,
    clock: Arc<dyn Clock>,
    random: Box<dyn RandomSource>,
    delay_min: Duration,
    delay_max: Duration,
    cancel: CancellationToken,
    replies_tx: mpsc::UnboundedSender<Response>,
    replies_rx: mpsc::UnboundedReceiver<Response>,
}

impl ChatPanel {
    pub fn new(
        assistant: Assistant,
        clock: Arc<dyn Clock>,
        random: Box<dyn RandomSource>,
        delay_min: Duration,
        delay_max: Duration,
    ) -> Self {
        let (replies_tx, replies_rx) = mpsc::unbounded_channel();
        Self {
            log: ChatLog::new(clock.now()),
            assistant,
            clock,
            random,
            delay_min,
            delay_max: delay_max.max(delay_min),
            cancel: CancellationToken::new(),
            replies_tx,
            replies_rx,
        }
    }

    pub fn log(&self) -> &ChatLog {
        &self.log
    }

    /// Queue a reply to `text`. Returns the thinking delay, or `None` for blank input.
    /// Must be called from within a tokio runtime.
    pub fn submit(&mut self, text: &str, tasks: &[Task]) -> Option<Duration> {
        self.log.submit(text, self.clock.now())?;
        let response = self.assistant.respond(text, tasks);
        let delay = self.thinking_delay();

        let token = self.cancel.child_token();
        let tx = self.replies_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!("chat reply cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    let _ = tx.send(response);
                }
            }
        });
        Some(delay)
    }

    /// Wait for the next delayed reply and append it to the log.
    pub async fn next_reply(&mut self) -> Option<ChatMessage> {
        let response = self.replies_rx.recv().await?;
        let now = self.clock.now();
        Some(self.log.push_reply(response, now).clone())
    }

    /// Drop every reply still thinking. Later submissions are unaffected.
    pub fn cancel_pending(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.log.abandon_pending();
    }

    pub(crate) fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn thinking_delay(&mut self) -> Duration {
        let span = self.delay_max.saturating_sub(self.delay_min).as_millis() as usize;
        let extra = self.random.pick(span + 1) as u64;
        self.delay_min + Duration::from_millis(extra)
    }
}

impl Drop for ChatPanel {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use taskmuse_core::{ManualClock, ScriptedRandom};
    use tokio::time::timeout;

    fn panel(delay_picks: Vec<usize>) -> ChatPanel {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 6, 11, 12, 0, 0).unwrap(),
        ));
        let assistant = Assistant::new(clock.clone(), Box::new(ScriptedRandom::new()));
        ChatPanel::new(
            assistant,
            clock,
            Box::new(ScriptedRandom::new().with_picks(delay_picks)),
            Duration::from_millis(1000),
            Duration::from_millis(2000),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn reply_arrives_after_thinking_delay() {
        let mut panel = panel(vec![250]);
        let delay = panel.submit("how am I doing", &[]).unwrap();
        assert_eq!(delay, Duration::from_millis(1250));
        assert!(panel.log().is_typing());

        assert!(timeout(Duration::from_millis(1200), panel.next_reply())
            .await
            .is_err());

        let reply = panel.next_reply().await.unwrap();
        assert!(reply.text.contains("0%"));
        assert_eq!(reply.suggestions.len(), 3);
        assert!(!panel.log().is_typing());
        assert_eq!(panel.log().messages().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn blank_input_is_not_answered() {
        let mut panel = panel(vec![]);
        assert!(panel.submit("   ", &[]).is_none());
        assert!(timeout(Duration::from_secs(5), panel.next_reply())
            .await
            .is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_replies_never_land() {
        let mut panel = panel(vec![0, 0]);
        panel.submit("help", &[]);
        panel.cancel_pending();
        assert!(!panel.log().is_typing());
        assert!(timeout(Duration::from_secs(5), panel.next_reply())
            .await
            .is_err());

        panel.submit("help", &[]);
        let reply = timeout(Duration::from_secs(5), panel.next_reply())
            .await
            .unwrap()
            .unwrap();
        assert!(reply.text.starts_with("I can help you with"));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_panel_cancels_pending_replies() {
        let mut panel = panel(vec![0]);
        panel.submit("motivate me", &[]);
        let token = panel.cancellation();
        drop(panel);
        assert!(token.is_cancelled());
    }
}
