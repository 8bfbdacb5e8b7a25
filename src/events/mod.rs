//! # Event Publishing
//!
//! Topic-addressed publication of feed payloads. The scheduler talks to a
//! [`TopicPublisher`]; [`EventPublisher`] is the in-process implementation
//! that fans out over a tokio broadcast channel.

pub mod publisher;
pub mod topics;

pub use publisher::{
    publish_json, EventPublisher, EventPublisherSnapshot, EventPublisherStats, PublishError,
    PublishedEvent, TopicPublisher,
};
pub use topics::Topic;
