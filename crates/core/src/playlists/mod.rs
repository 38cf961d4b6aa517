//! Playlist management

pub mod ports;
mod service;

pub use service::PlaylistService;
