//! Server-Sent Events (SSE) streaming of per-user updates.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::Stream;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::auth::AuthUser;
use crate::state::SharedState;

/// GET /events. Only the caller's own events are sent.
pub async fn sse_handler(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let user_id = auth.user_id;
    let stream = BroadcastStream::new(state.subscribe()).filter_map(move |result| {
        // Lagged receivers skip what they missed.
        let event = result.ok().filter(|e| e.user_id() == user_id)?;
        serde_json::to_string(&event).ok().map(|data| Ok(Event::default().data(data)))
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
