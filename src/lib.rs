//! Resolves Deezer track, album and playlist links into tracks a
//! Lavalink-style audio player can queue.

pub mod config;
pub mod core;
pub mod error;
pub mod host;
pub mod models;
pub mod plugin;
pub mod sources;
