//! Utilities shared by the Sanmoku packages.

pub mod logger;
pub mod time;
