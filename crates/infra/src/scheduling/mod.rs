//! Background scheduling

mod error;
mod reminder_scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use reminder_scheduler::{ReminderJob, ReminderScheduler, ReminderSchedulerConfig};
