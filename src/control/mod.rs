pub mod evaluator;
pub mod schedule;
mod service;

pub use service::{ControlService, SettingsUpdate};
