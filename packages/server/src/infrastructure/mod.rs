//! Infrastructure 層
//!
//! ドメイン層の trait（Repository, MessagePusher）の具体的な実装と DTO。

pub mod dto;
pub mod message_pusher;
pub mod repository;
