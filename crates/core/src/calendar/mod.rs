//! Calendar queries over the daily activity ledger

mod service;

pub use service::CalendarService;
