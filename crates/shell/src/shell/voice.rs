use taskmuse_core::{VoiceBackend, VoiceError};

use super::console::Console;

/// Terminal stand-in for speech: the next typed line is the recognized utterance
/// and spoken replies are printed.
pub struct ConsoleSpeech {
    console: Console,
    active: bool,
}

impl ConsoleSpeech {
    pub fn new(console: Console) -> Self {
        Self {
            console,
            active: false,
        }
    }
}

impl VoiceBackend for ConsoleSpeech {
    fn is_supported(&self) -> bool {
        true
    }

    fn start(&mut self) -> Result<(), VoiceError> {
        self.active = true;
        self.console
            .line("🎙  Speak now (type your command and press Enter)")
            .map_err(|err| VoiceError::Recognition(err.to_string()))
    }

    fn stop(&mut self) {
        if self.active {
            self.active = false;
            let _ = self.console.line("🎙  Stopped listening");
        }
    }

    fn speak(&mut self, text: &str) {
        self.active = false;
        if let Err(err) = self.console.line(format!("🔊 {text}")) {
            tracing::warn!(error = %err, "failed to speak");
        }
    }
}
