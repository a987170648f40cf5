//! Bounded multi-consumer FIFO queue between the producer and the writers.
//!
//! The queue is the only coupling between the two sides of the pipeline:
//! writers hold a [`Receiver`] and never see the producer. It moves through
//! three states:
//!
//! - [`ChannelState::Open`]: the producer may still send. `send` suspends
//!   while the queue is full and `recv` suspends while it is empty.
//! - [`ChannelState::Draining`]: the producer closed the queue but items are
//!   left. `recv` keeps handing them out in order.
//! - [`ChannelState::Drained`]: closed and empty. `recv` returns `None`
//!   immediately, to every receiver.
//!
//! The sender is deliberately not `Clone`: there is exactly one producer.

use core::fmt;

/// Creates a queue holding at most `capacity` items.
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn bounded<T>(capacity: usize) -> (Sender<T>, Receiver<T>) {
    let (tx, rx) = async_channel::bounded(capacity);
    (Sender { inner: tx }, Receiver { inner: rx })
}

/// Observable lifecycle of the queue.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChannelState {
    Open,
    Draining,
    Drained,
}

/// Outcome of a non-blocking receive.
#[derive(Debug, PartialEq, Eq)]
pub enum TryRecv<T> {
    /// The next item in FIFO order.
    Item(T),
    /// Nothing queued yet, but the producer may still send.
    Empty,
    /// Closed and fully drained; no item will ever arrive.
    Closed,
}

/// Returned by [`Sender::send`] when every receiver is gone. Hands the
/// unsent item back.
pub struct SendError<T>(pub T);

impl<T> fmt::Debug for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SendError(..)")
    }
}

impl<T> fmt::Display for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("sending into a channel with no receivers")
    }
}

impl<T> std::error::Error for SendError<T> {}

/// Producer half of the queue.
pub struct Sender<T> {
    inner: async_channel::Sender<T>,
}

impl<T> Sender<T> {
    /// Enqueues `item`, suspending while the queue is full.
    ///
    /// # Errors
    ///
    /// Fails if every receiver has been dropped or the queue was closed.
    pub async fn send(&self, item: T) -> Result<(), SendError<T>> {
        self.inner
            .send(item)
            .await
            .map_err(|async_channel::SendError(item)| SendError(item))
    }

    /// Signals end-of-stream. Items already queued stay available to
    /// receivers. Returns `false` if the queue was already closed.
    pub fn close(&self) -> bool {
        self.inner.close()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.inner.is_full()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.inner.capacity()
    }
}

impl<T> fmt::Debug for Sender<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sender")
            .field("len", &self.inner.len())
            .field("closed", &self.inner.is_closed())
            .finish()
    }
}

/// Consumer half of the queue. Cloning yields another consumer of the same
/// queue; each item is delivered to exactly one of them.
pub struct Receiver<T> {
    inner: async_channel::Receiver<T>,
}

impl<T> Receiver<T> {
    /// Dequeues the next item, suspending while the queue is empty and open.
    ///
    /// Returns `None` once the queue is closed and drained.
    pub async fn recv(&self) -> Option<T> {
        self.inner.recv().await.ok()
    }

    /// Dequeues the next item without suspending.
    pub fn try_recv(&self) -> TryRecv<T> {
        match self.inner.try_recv() {
            Ok(item) => TryRecv::Item(item),
            Err(async_channel::TryRecvError::Empty) => TryRecv::Empty,
            Err(async_channel::TryRecvError::Closed) => TryRecv::Closed,
        }
    }

    pub fn state(&self) -> ChannelState {
        if !self.inner.is_closed() {
            ChannelState::Open
        } else if self.inner.is_empty() {
            ChannelState::Drained
        } else {
            ChannelState::Draining
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<T> Clone for Receiver<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for Receiver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Receiver")
            .field("len", &self.inner.len())
            .field("state", &self.state())
            .finish()
    }
}
