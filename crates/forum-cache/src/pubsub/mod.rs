//! Redis Pub/Sub - the change-notification feed

mod channels;
mod publisher;
mod subscriber;

pub use channels::{PubSubChannel, EVENTS_CHANNEL, TARGET_CHANNEL_PREFIX, USER_CHANNEL_PREFIX};
pub use publisher::{PubSubEvent, Publisher};
pub use subscriber::{
    FeedMessage, Subscriber, SubscriberBuilder, SubscriberConfig, SubscriberError,
    SubscriberResult,
};
