use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use tokio::sync::broadcast;
use tracing::{debug, warn};
use water_app::AggregateEvent;

use crate::state::HttpState;

/// Streams aggregate events as they are committed. Each SSE event is named
/// after the event type and carries the JSON-encoded event as data.
pub async fn stream(
    State(state): State<HttpState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.context.app_state.services.store().subscribe();
    debug!("event stream opened");

    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => yield Ok(Event::default().event(event_name(&event)).data(json)),
                    Err(err) => warn!(error = %err, "failed to serialize aggregate event"),
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event stream lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn event_name(event: &AggregateEvent) -> &'static str {
    match event {
        AggregateEvent::Updated(_) => "updated",
        AggregateEvent::Reset => "reset",
    }
}
