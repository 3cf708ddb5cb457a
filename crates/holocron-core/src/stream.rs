// ── Observable listing channels ──
//
// Subscription handles for the values a DataSource publishes.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// A subscription to one published value.
///
/// Replays the latest value on creation, then reports every change via
/// [`changed()`](Self::changed) or as a `Stream`. Once the publisher is torn
/// down the handle still answers [`latest()`](Self::latest) with the final
/// value, but `changed()` returns `None`.
#[derive(Debug)]
pub struct Observed<T: Clone + Send + Sync + 'static> {
    current: T,
    receiver: watch::Receiver<T>,
}

impl<T: Clone + Send + Sync + 'static> Observed<T> {
    pub(crate) fn new(receiver: watch::Receiver<T>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// A handle whose publisher is already gone, replaying `value`.
    pub(crate) fn closed(value: T) -> Self {
        let (tx, receiver) = watch::channel(value.clone());
        drop(tx);
        Self {
            current: value,
            receiver,
        }
    }

    /// The value captured at creation or at the last `changed()`.
    pub fn current(&self) -> &T {
        &self.current
    }

    /// The latest published value (may have changed since creation).
    pub fn latest(&self) -> T {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new value.
    /// Returns `None` once the publisher has been torn down.
    pub async fn changed(&mut self) -> Option<T> {
        self.receiver.changed().await.ok()?;
        let value = self.receiver.borrow_and_update().clone();
        self.current = value.clone();
        Some(value)
    }

    /// Wait until the published value satisfies `predicate`, checking the
    /// current value first. Returns `None` if the publisher goes away first.
    pub async fn wait_for(&mut self, predicate: impl FnMut(&T) -> bool) -> Option<T> {
        let value = self.receiver.wait_for(predicate).await.ok()?.clone();
        self.current = value.clone();
        Some(value)
    }

    /// `true` once the publisher has been torn down.
    pub fn is_closed(&self) -> bool {
        self.receiver.has_changed().is_err()
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    ///
    /// The stream yields the current value first, then each change.
    pub fn into_stream(self) -> ObservedStream<T> {
        ObservedStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct ObservedStream<T: Clone + Send + Sync + 'static> {
    inner: WatchStream<T>,
}

impl<T: Clone + Send + Sync + 'static> Stream for ObservedStream<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // WatchStream is Unpin, so projecting through `Pin::new` is fine.
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use futures_util::StreamExt;

    use super::*;

    #[tokio::test]
    async fn replays_latest_value() {
        let (tx, rx) = watch::channel(1u32);
        tx.send_replace(2);
        let observed = Observed::new(rx);
        assert_eq!(*observed.current(), 2);
    }

    #[tokio::test]
    async fn changed_tracks_updates_until_close() {
        let (tx, rx) = watch::channel(false);
        let mut observed = Observed::new(rx);

        tx.send_replace(true);
        assert_eq!(observed.changed().await, Some(true));
        assert!(*observed.current());

        drop(tx);
        assert_eq!(observed.changed().await, None);
        assert!(observed.is_closed());
        assert!(observed.latest());
    }

    #[tokio::test]
    async fn closed_handle_replays_final_value() {
        let mut observed = Observed::closed(7u64);
        assert_eq!(observed.latest(), 7);
        assert!(observed.is_closed());
        assert_eq!(observed.changed().await, None);
    }

    #[tokio::test]
    async fn stream_yields_current_then_changes() {
        let (tx, rx) = watch::channel(0u32);
        let mut stream = Observed::new(rx).into_stream();

        assert_eq!(stream.next().await, Some(0));
        tx.send_replace(5);
        assert_eq!(stream.next().await, Some(5));
        drop(tx);
        assert_eq!(stream.next().await, None);
    }
}
