//! Development server with live reload for sutradocs.
//!
//! Renders pages on demand from the loaded [`sutradocs_static::Site`], serves
//! the API data routes, and reloads connected browsers when content or the
//! sidebar changes.

mod api;
pub mod server;
pub mod watcher;
pub mod websocket;

pub use server::{DevServer, DevServerConfig, ServerError};
pub use watcher::{FileWatcher, WatchEvent, WatchTargets};
pub use websocket::{ReloadHub, ReloadMessage};
