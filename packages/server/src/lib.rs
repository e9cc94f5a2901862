//! Authoritative tic-tac-toe game coordination server.
//!
//! Two players share a room identified by a short code. The server owns the
//! board, validates every move and pushes the resulting state to both players
//! over WebSocket.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
