//! Message log behind the chat panel.

use chrono::{DateTime, Utc};

use crate::assistant::{Response, GREETING, GREETING_SUGGESTIONS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "you",
            Sender::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub suggestions: Vec<String>,
}

/// Ordered conversation plus the count of replies still being "typed".
#[derive(Debug, Clone)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    next_id: u64,
    pending_replies: usize,
}

impl ChatLog {
    pub fn new(now: DateTime<Utc>) -> Self {
        let mut log = Self {
            messages: Vec::new(),
            next_id: 1,
            pending_replies: 0,
        };
        log.push(
            Sender::Assistant,
            GREETING.to_string(),
            GREETING_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
            now,
        );
        log
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn is_typing(&self) -> bool {
        self.pending_replies > 0
    }

    /// Record a user message and mark a reply as pending. Blank input is ignored.
    pub fn submit(&mut self, text: &str, now: DateTime<Utc>) -> Option<&ChatMessage> {
        if text.trim().is_empty() {
            return None;
        }
        self.pending_replies += 1;
        let index = self.push(Sender::User, text.to_string(), Vec::new(), now);
        self.messages.get(index)
    }

    pub fn push_reply(&mut self, response: Response, now: DateTime<Utc>) -> &ChatMessage {
        self.pending_replies = self.pending_replies.saturating_sub(1);
        let index = self.push(
            Sender::Assistant,
            response.text,
            response.suggested_follow_ups.unwrap_or_default(),
            now,
        );
        &self.messages[index]
    }

    /// Forget replies that will never arrive.
    pub fn abandon_pending(&mut self) {
        self.pending_replies = 0;
    }

    fn push(
        &mut self,
        sender: Sender,
        text: String,
        suggestions: Vec<String>,
        now: DateTime<Utc>,
    ) -> usize {
        self.messages.push(ChatMessage {
            id: self.next_id,
            text,
            sender,
            timestamp: now,
            suggestions,
        });
        self.next_id += 1;
        self.messages.len() - 1
    }
}
