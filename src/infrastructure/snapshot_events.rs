// Server-sent event streaming of live snapshots
use crate::domain::snapshot::LiveSnapshot;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Stream the current snapshot, then one event per published change.
/// Ends when the sync is stopped or its engine dropped.
pub fn snapshot_events(
    mut rx: watch::Receiver<LiveSnapshot>,
    stopped: CancellationToken,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let stream = async_stream::stream! {
        loop {
            let snapshot = rx.borrow_and_update().clone();
            yield Event::default().event("snapshot").json_data(&snapshot);

            let open = tokio::select! {
                changed = rx.changed() => changed.is_ok(),
                _ = stopped.cancelled() => false,
            };
            if !open {
                break;
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
