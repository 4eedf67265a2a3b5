pub mod tasks;

pub use tasks::{next_task_id, TaskMutation, TasksService};
