//! Core module: configuration, state, and the HTTP server
//!
//! # Structure
//!
//! - [`Config`] - server configuration
//! - [`ServerState`] - shared state cloned into handlers
//! - [`Server`] - HTTP server lifecycle

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;
