//! Reply queues (glossary): multi-producer FIFOs of completion operations,
//! tagged with an epoch so a handler can detect that the requester has moved
//! on and drop a stale delivery (§4.F, testable property "Epoch drop").

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

/// A reply op posted by the dispatcher once a request is resolved.
#[derive(Debug)]
pub struct ReplyOp<T> {
    pub cookie: u64,
    pub payload: T,
}

/// Producer-side handle to a reply queue, carrying the epoch the sender
/// observed when the request was built.
#[derive(Clone)]
pub struct ReplyQueueHandle<T> {
    sender: mpsc::UnboundedSender<ReplyOp<T>>,
    epoch: Arc<AtomicU64>,
    /// Epoch captured when this handle was handed to a request builder.
    captured_epoch: u64,
}

/// Consumer side; owned by the caller thread (consumer group, application, ...).
pub struct ReplyQueue<T> {
    receiver: mpsc::UnboundedReceiver<ReplyOp<T>>,
    epoch: Arc<AtomicU64>,
}

/// Creates a linked producer/consumer pair at epoch 0.
pub fn channel<T>() -> (ReplyQueueHandle<T>, ReplyQueue<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let epoch = Arc::new(AtomicU64::new(0));
    (
        ReplyQueueHandle {
            sender: tx,
            epoch: epoch.clone(),
            captured_epoch: 0,
        },
        ReplyQueue { receiver: rx, epoch },
    )
}

impl<T> ReplyQueueHandle<T> {
    /// Re-captures a handle at the queue's *current* epoch. Callers do this
    /// each time they build a new request so a later `post` can detect
    /// whether the queue moved on in the meantime.
    pub fn rebind(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            epoch: self.epoch.clone(),
            captured_epoch: self.epoch.load(Ordering::Acquire),
        }
    }

    pub fn captured_epoch(&self) -> u64 {
        self.captured_epoch
    }

    /// Posts a reply op, unless the queue's epoch has advanced past what this
    /// handle captured — in that case the op is silently dropped and `false`
    /// is returned. Never blocks (§5).
    pub fn post(&self, cookie: u64, payload: T) -> bool {
        if self.epoch.load(Ordering::Acquire) != self.captured_epoch {
            return false;
        }
        self.sender.send(ReplyOp { cookie, payload }).is_ok()
    }
}

impl<T> ReplyQueue<T> {
    /// Advances the epoch, making every outstanding handle captured at an
    /// older epoch drop its next `post` instead of delivering it.
    pub fn advance_epoch(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn current_epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    pub async fn recv(&mut self) -> Option<ReplyOp<T>> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Option<ReplyOp<T>> {
        self.receiver.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_delivers_at_matching_epoch() {
        let (handle, mut queue) = channel::<&'static str>();
        let bound = handle.rebind();
        assert!(bound.post(1, "ok"));
        assert_eq!(queue.try_recv().unwrap().payload, "ok");
    }

    #[test]
    fn post_dropped_after_epoch_advance() {
        let (handle, mut queue) = channel::<&'static str>();
        let bound = handle.rebind();
        queue.advance_epoch();
        assert!(!bound.post(1, "stale"));
        assert!(queue.try_recv().is_none());
    }
}
