pub use taskmuse_shell::cli;
pub use taskmuse_shell::commands;
pub use taskmuse_shell::config;
pub use taskmuse_shell::logging;
pub use taskmuse_shell::shell;
pub use taskmuse_shell::AppConfig;
pub use taskmuse_shell::ShellOptions;

pub use taskmuse_core as core;
pub use taskmuse_core::capture;
pub use taskmuse_core::model;
pub use taskmuse_core::parser;
