//! Client-facing replies for failed requests.
//!
//! Every use case error becomes an alert for the requester, plus a redirect home
//! when the room they referred to no longer exists.

use crate::{
    domain::{Notification, Severity},
    usecase::{CreateRoomError, JoinRoomError, RestartGameError, SubmitMoveError},
};

const NO_CAPACITY: &str = "No room is available right now, please try again later";
const ALREADY_SEATED: &str = "You are already seated in a room";

/// Notifications sent back to the connection whose request failed
pub trait Reply {
    fn replies(&self) -> Vec<Notification>;
}

fn warning(message: impl Into<String>) -> Vec<Notification> {
    vec![Notification::alert(message, Severity::Warning)]
}

fn gone(message: impl Into<String>) -> Vec<Notification> {
    vec![
        Notification::alert(message, Severity::Danger),
        Notification::redirect_home(),
    ]
}

impl Reply for CreateRoomError {
    fn replies(&self) -> Vec<Notification> {
        match self {
            Self::InvalidInput(e) => warning(capitalize(&e.to_string())),
            Self::AlreadyInRoom => warning(ALREADY_SEATED),
            Self::Capacity => vec![Notification::alert(NO_CAPACITY, Severity::Danger)],
        }
    }
}

impl Reply for JoinRoomError {
    fn replies(&self) -> Vec<Notification> {
        match self {
            Self::InvalidInput(e) => warning(capitalize(&e.to_string())),
            Self::AlreadyInRoom => warning(ALREADY_SEATED),
            Self::NotFound(room_id) => gone(format!("Room {room_id} does not exist")),
            Self::Full(room_id) => warning(format!("Room {room_id} is full")),
            Self::Superseded => {
                let mut replies = warning("This seat was taken over by a newer connection");
                replies.push(Notification::redirect_home());
                replies
            }
            Self::Capacity => vec![Notification::alert(NO_CAPACITY, Severity::Danger)],
        }
    }
}

impl Reply for SubmitMoveError {
    fn replies(&self) -> Vec<Notification> {
        match self {
            Self::InvalidInput(e) => warning(capitalize(&e.to_string())),
            Self::NotFound(room_id) => gone(format!("Room {room_id} does not exist")),
            Self::Rejected(rejection) => warning(capitalize(&rejection.to_string())),
        }
    }
}

impl Reply for RestartGameError {
    fn replies(&self) -> Vec<Notification> {
        match self {
            Self::InvalidInput(e) => warning(capitalize(&e.to_string())),
            Self::NotFound(room_id) => gone(format!("Room {room_id} does not exist")),
            Self::Forbidden => warning("Only the room owner can restart the game"),
        }
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
