//! Ambient message feed

pub mod client;
pub mod log;
pub mod service;

pub use client::{FeedError, HttpCollaborator, OfflineCollaborator, TextCollaborator};
pub use log::{FeedMessage, MessageLog};
pub use service::{AmbientFeed, FeedSettings};
