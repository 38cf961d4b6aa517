//! Notification queue and study reminders

pub mod ports;
mod service;

pub use service::NotificationService;
