//! Background tasks
//!
//! Every API instance runs two loops: one subscriber feeding the event feed
//! into the invalidation service, and one sweeper trimming expired entries
//! from the flag cache on the fallback poll interval.

use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use forum_cache::{PubSubChannel, SubscriberBuilder, SubscriberResult};
use forum_service::InvalidationService;

use crate::state::AppState;

/// Subscribe to the event feed and apply invalidation fan-outs as they
/// arrive. Events published by this instance loop back here too; applying
/// them twice is harmless since invalidation only deletes.
pub async fn spawn_invalidation_listener(state: AppState) -> SubscriberResult<()> {
    let subscriber = SubscriberBuilder::new()
        .redis_url(state.config().redis.url.clone())
        .subscribe(PubSubChannel::events())
        .build()
        .await?;
    let mut receiver = subscriber.receiver();

    tokio::spawn(async move {
        // Keep the subscriber alive for as long as the loop runs
        let _subscriber = subscriber;
        loop {
            match receiver.recv().await {
                Ok(message) => {
                    if let Some(event) = &message.forum_event {
                        InvalidationService::new(state.service_context())
                            .handle_event(event)
                            .await;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped = skipped, "Event feed lagged; flags repair via TTL");
                }
                Err(RecvError::Closed) => {
                    info!("Event feed closed; stopping invalidation listener");
                    break;
                }
            }
        }
    });

    Ok(())
}

/// Periodically drop expired flag cache entries.
///
/// Expiry already happens lazily on read; the sweep keeps memory bounded for
/// keys nobody asks about again.
pub fn spawn_flag_sweeper(state: AppState) {
    let interval_seconds = state.config().presence.poll_interval_seconds.max(1);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_seconds));
        loop {
            ticker.tick().await;
            state.service_context().flag_cache().sweep();
        }
    });
}
