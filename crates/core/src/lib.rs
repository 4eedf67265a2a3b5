pub mod assistant;
pub mod capture;
pub mod chat;
pub mod clock;
pub mod config;
pub mod error;
pub mod model;
pub mod notify;
pub mod parser;
pub mod preferences;
pub mod queries;
pub mod random;
pub mod scheduler;
pub mod seeding;
pub mod services;
pub mod store;
pub mod voice;
pub mod welcome;

pub use assistant::{Assistant, Interpretation, Response};
pub use capture::TaskInput;
pub use chat::{ChatLog, ChatMessage, Sender};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::AppConfig;
pub use error::{PreferencesError, SinkError, TaskError, VoiceError};
pub use model::*;
pub use notify::{MemorySink, Notification, NotificationKind, NotificationSink};
pub use preferences::{Preferences, UserProfile};
pub use random::{RandomSource, ScriptedRandom, StdRandom};
pub use scheduler::{NotificationScheduler, SchedulerConfig, TickReport};
pub use services::{TaskMutation, TasksService};
pub use store::{TaskSnapshot, TaskStore};
pub use voice::{VoiceBackend, VoiceEvent, VoiceSession};
