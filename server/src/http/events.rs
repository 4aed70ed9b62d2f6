//! Live query over Server-Sent Events
//!
//! Every event carries the full ordered collection. The current snapshot is
//! sent on connect; the stream ends when the client disconnects or the server
//! begins shutting down.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};
use std::time::Duration;
use tokio_stream::wrappers::WatchStream;

use crate::repository::LiveQuery;
use crate::AppState;

pub const SNAPSHOT_EVENT: &str = "snapshot";
const KEEP_ALIVE: Duration = Duration::from_secs(15);

/// `/api/events`
pub async fn todo_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    tracing::debug!("live query subscriber connected");

    let stream = WatchStream::new(state.store.subscribe())
        .map(|snapshot| Event::default().event(SNAPSHOT_EVENT).json_data(&snapshot))
        .take_until(state.shutdown_requested());

    Sse::new(stream).keep_alive(KeepAlive::new().interval(KEEP_ALIVE))
}
