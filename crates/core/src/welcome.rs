use crate::error::PreferencesError;
use crate::notify::{deliver, Notification, NotificationSink};
use crate::preferences::Preferences;

pub const WELCOME_TITLE: &str = "🎉 Welcome to TaskMuse AI!";
const WELCOME_BODY: &str =
    "Your intelligent task management companion is ready to help you stay productive.";

pub fn welcome_notification() -> Notification {
    Notification::success(WELCOME_TITLE)
        .with_body(WELCOME_BODY)
        .with_action("Got it!")
}

/// Emit the first-run welcome once. The flag is written before the
/// notification goes out, so a failed delivery is not repeated on restart.
///
/// A flag that cannot be written does not hold the welcome back; the error is
/// returned after delivery and the welcome shows again on the next run.
pub fn announce_welcome(
    prefs: &mut Preferences,
    sink: &mut dyn NotificationSink,
) -> Result<bool, PreferencesError> {
    if prefs.welcome_shown() {
        return Ok(false);
    }
    let persisted = prefs.mark_welcome_shown();
    deliver(sink, welcome_notification());
    tracing::debug!("welcome announced");
    persisted.map(|()| true)
}
