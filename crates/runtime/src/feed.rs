//! Asynchronous single-consumer feeds.
//!
//! A producer task publishes payloads; the event loop drains them without
//! blocking (`try_next`) or awaits the next one (`next`). Unsubscribing closes
//! the channel so later publishes fail and nothing further is delivered.

use std::task::{Context, Poll};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::debug;

/// One message on a feed. `Invalid` carries the producer's reason when the
/// upstream reported no payload or an unusable one.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery<T> {
    Payload(T),
    Invalid(String),
}

pub fn channel<T>(name: &'static str) -> (FeedPublisher<T>, FeedSubscription<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        FeedPublisher { name, tx },
        FeedSubscription {
            name,
            rx,
            active: true,
            disconnected: false,
        },
    )
}

#[derive(Debug)]
pub struct FeedPublisher<T> {
    name: &'static str,
    tx: mpsc::UnboundedSender<Delivery<T>>,
}

impl<T> Clone for FeedPublisher<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            tx: self.tx.clone(),
        }
    }
}

impl<T> FeedPublisher<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `false` if the subscriber is gone.
    pub fn publish(&self, payload: T) -> bool {
        self.tx.send(Delivery::Payload(payload)).is_ok()
    }

    pub fn publish_invalid(&self, reason: impl Into<String>) -> bool {
        self.tx.send(Delivery::Invalid(reason.into())).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[derive(Debug)]
pub struct FeedSubscription<T> {
    name: &'static str,
    rx: mpsc::UnboundedReceiver<Delivery<T>>,
    active: bool,
    disconnected: bool,
}

impl<T> FeedSubscription<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// `true` once unsubscribed, or once every publisher is dropped and the
    /// queue has been drained.
    pub fn is_finished(&self) -> bool {
        !self.active || self.disconnected
    }

    pub fn try_next(&mut self) -> Option<Delivery<T>> {
        if !self.active {
            return None;
        }
        match self.rx.try_recv() {
            Ok(delivery) => Some(delivery),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.disconnected = true;
                None
            }
        }
    }

    /// Polls for the next delivery. `Ready(None)` once the feed is finished,
    /// so several feeds can be awaited together.
    pub fn poll_next(&mut self, cx: &mut Context<'_>) -> Poll<Option<Delivery<T>>> {
        if self.is_finished() {
            return Poll::Ready(None);
        }
        let polled = self.rx.poll_recv(cx);
        if let Poll::Ready(None) = polled {
            self.disconnected = true;
        }
        polled
    }

    pub async fn next(&mut self) -> Option<Delivery<T>> {
        std::future::poll_fn(|cx| self.poll_next(cx)).await
    }

    /// Stops delivery. Anything still queued is discarded. Idempotent.
    pub fn unsubscribe(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.rx.close();
        while self.rx.try_recv().is_ok() {}
        debug!(feed = self.name, "unsubscribed");
    }
}
