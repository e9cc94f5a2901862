//! Request handlers for the WebSocket gateway and the HTTP API.

mod http;
mod reply;
mod websocket;

pub use http::{get_room_detail, get_rooms, health_check};
pub use websocket::websocket_handler;
