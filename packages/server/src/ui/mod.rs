//! Game coordination server: WebSocket gateway and HTTP API.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
