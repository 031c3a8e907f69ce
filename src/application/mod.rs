//! Application services layer.

pub mod about;
pub mod admin;
pub mod error;
pub mod feed;
pub mod pagination;
pub mod posts;
pub mod repos;
pub mod subscriptions;
