use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream, StreamExt};

use crate::api::state::AppState;
use crate::domain::auction::AuctionEvent;
use crate::events::Subscription;

/// Live auction events as server-sent events
///
/// GET /auction/events
pub async fn stream_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = state
        .auction
        .bus()
        .subscribe_with_limit(state.config.stream.max_backlog);
    tracing::debug!(subscription = %subscription.id(), "event stream connected");

    Sse::new(event_stream(subscription)).keep_alive(
        KeepAlive::new()
            .interval(state.config.stream.heartbeat)
            .text("keep-alive"),
    )
}

/// `: connected`, then one frame per event until the bus closes or the
/// subscription is cut off for falling behind
///
/// The backlog limit is enforced by the bus at publish time, so a consumer
/// that stops reading is detached even while this stream is not polled.
/// Dropping the stream drops the subscription, which unsubscribes it.
pub fn event_stream(subscription: Subscription) -> impl Stream<Item = Result<Event, Infallible>> {
    let connected = stream::once(async { Ok(Event::default().comment("connected")) });

    let events = stream::unfold(subscription, |mut subscription| async move {
        if subscription.overflowed() {
            tracing::warn!(
                subscription = %subscription.id(),
                backlog = subscription.backlog(),
                "event stream consumer too slow, disconnecting"
            );
            return None;
        }

        let event = subscription.recv().await?;
        Some((Ok(to_sse(&event)), subscription))
    });

    connected.chain(events)
}

fn to_sse(event: &AuctionEvent) -> Event {
    Event::default()
        .event(event.event_type())
        .json_data(event)
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to encode auction event");
            Event::default().comment("encoding-error")
        })
}
