//! Progress and streak bookkeeping

pub mod ports;
mod service;

pub use service::{compute_streaks, ProgressService, ProgressUpdate};
