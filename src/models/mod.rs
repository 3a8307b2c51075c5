//! Data models and DTOs

pub mod booking;
pub mod comment;
pub mod item;
pub mod request;
pub mod user;
