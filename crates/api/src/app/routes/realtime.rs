//! Real-time catalog channel over Server-Sent Events.
//!
//! Each connection registers one subscriber. The SSE body owns the
//! [`Subscription`](catalog_events::Subscription); when the client goes away axum
//! drops the body and the subscription unregisters itself.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::Extension,
    response::sse::{Event as SseEvent, KeepAlive, Sse},
};
use tokio_stream::{Stream, StreamExt};

use catalog_events::ChangeEvent;

use crate::app::services::AppServices;

pub const STREAM_PATH: &str = "/realtimeproducts/stream";
pub const EVENT_NAME: &str = "products.changed";

/// GET /realtimeproducts/stream
pub async fn stream(
    Extension(services): Extension<Arc<AppServices>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let subscription = services.registry().register();
    tracing::info!(
        connection_id = %subscription.handle().id(),
        subscribers = services.registry().len(),
        "real-time client connected"
    );

    let events = subscription.map(|event| Ok(to_sse(&event)));

    Sse::new(events).keep_alive(KeepAlive::new().interval(services.config().keep_alive))
}

fn to_sse(event: &ChangeEvent) -> SseEvent {
    // No `id:` field: the channel cannot resume from a Last-Event-ID.
    let sse = SseEvent::default().event(EVENT_NAME);
    match event.to_json() {
        Ok(json) => sse.data(json),
        Err(e) => {
            tracing::warn!(event_type = event.event_type(), "change event serialization failed: {e}");
            sse.data("{}")
        }
    }
}
