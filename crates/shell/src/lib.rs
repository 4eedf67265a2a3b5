pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod render;
pub mod shell;
pub mod telemetry;

pub use taskmuse_core as core;
pub use taskmuse_core::capture;
pub use taskmuse_core::model;
pub use taskmuse_core::parser;

pub use taskmuse_core::AppConfig;
pub use config::ShellOptions;
