//! Lightweight in-process event log for the shell, mirrored to tracing.

use parking_lot::Mutex;

#[derive(Debug, Clone)]
pub enum Event {
    AppStarted,
    ChatSubmitted,
    ChatReplied,
    VoiceToggled { listening: bool },
    VoiceHandled(String),
    MutationApplied(String),
    MutationFailed { action: String, error: String },
    SchedulerTicked { emitted: usize, dropped: usize },
    WelcomeShown,
}

pub struct Handle {
    #[cfg(feature = "telemetry")]
    events: Mutex<Vec<Event>>,
}

impl Default for Handle {
    fn default() -> Self {
        Self::new()
    }
}

impl Handle {
    pub fn new() -> Self {
        Self {
            #[cfg(feature = "telemetry")]
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn record(&self, event: Event) {
        #[cfg(feature = "telemetry")]
        {
            match &event {
                Event::AppStarted => tracing::debug!("shell telemetry app started"),
                Event::ChatSubmitted => tracing::debug!("shell telemetry chat submitted"),
                Event::ChatReplied => tracing::debug!("shell telemetry chat replied"),
                Event::VoiceToggled { listening } => {
                    tracing::debug!(listening, "shell telemetry voice toggled")
                }
                Event::VoiceHandled(intent) => {
                    tracing::debug!(intent = intent.as_str(), "shell telemetry voice handled")
                }
                Event::MutationApplied(action) => tracing::debug!(
                    action = action.as_str(),
                    "shell telemetry mutation applied"
                ),
                Event::MutationFailed { action, error } => tracing::debug!(
                    action = action.as_str(),
                    error = %error,
                    "shell telemetry mutation failed"
                ),
                Event::SchedulerTicked { emitted, dropped } => {
                    tracing::debug!(emitted, dropped, "shell telemetry scheduler ticked")
                }
                Event::WelcomeShown => tracing::debug!("shell telemetry welcome shown"),
            }
            self.events.lock().push(event);
        }
        #[cfg(not(feature = "telemetry"))]
        {
            let _ = event;
        }
    }

    pub fn is_enabled(&self) -> bool {
        cfg!(feature = "telemetry")
    }

    pub fn events_len(&self) -> usize {
        #[cfg(feature = "telemetry")]
        {
            self.events.lock().len()
        }
        #[cfg(not(feature = "telemetry"))]
        {
            0
        }
    }
}
