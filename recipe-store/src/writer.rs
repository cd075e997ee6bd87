//! Ordered, fire-and-forget persistence
//!
//! Snapshots are applied by a background thread in the order they were
//! sent. Senders never wait for the write to happen. Whatever piles up
//! while a write is in progress is collapsed so only the newest snapshot
//! of each key gets written. Failures are logged and the most recent
//! [`MAX_FAILURES`] are kept until someone takes them; nothing is retried.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, PoisonError},
    thread,
};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use crate::{error::PersistenceError, storage::Storage};

/// Failures kept before the oldest ones are dropped
pub const MAX_FAILURES: usize = 32;

enum Message {
    Write { key: &'static str, value: String },
    Flush(Sender<()>),
}

type Failures = Arc<Mutex<VecDeque<PersistenceError>>>;

pub(crate) struct Writer {
    tx: Option<Sender<Message>>,
    handle: Option<thread::JoinHandle<()>>,
    failures: Failures,
}

impl Writer {
    pub fn spawn(storage: Box<dyn Storage>) -> Result<Self, PersistenceError> {
        let (tx, rx) = unbounded::<Message>();
        let failures = Failures::default();
        let thread_failures = Arc::clone(&failures);

        let handle = thread::Builder::new()
            .name("recipe-writer".into())
            .spawn(move || run(storage, rx, thread_failures))
            .map_err(|_| PersistenceError::WriterStopped)?;

        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
            failures,
        })
    }

    /// Queues a full overwrite of `key`
    pub fn send(&self, key: &'static str, value: String) {
        let sent = self
            .tx
            .as_ref()
            .map(|tx| tx.send(Message::Write { key, value }).is_ok())
            .unwrap_or(false);
        if !sent {
            tracing::warn!("writer is gone, recipes were not saved");
            self.record(PersistenceError::WriterStopped);
        }
    }

    /// Blocks until everything queued so far has been written
    pub fn flush(&self) {
        let (done_tx, done_rx) = bounded(1);
        let queued = self
            .tx
            .as_ref()
            .is_some_and(|tx| tx.send(Message::Flush(done_tx)).is_ok());
        if !queued || done_rx.recv().is_err() {
            self.record(PersistenceError::WriterStopped);
        }
    }

    pub fn take_failures(&self) -> Vec<PersistenceError> {
        std::mem::take(
            &mut *self
                .failures
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
        .into()
    }

    pub fn record(&self, err: PersistenceError) {
        push_failure(&self.failures, err);
    }
}

fn run(mut storage: Box<dyn Storage>, rx: Receiver<Message>, failures: Failures) {
    while let Ok(first) = rx.recv() {
        let mut pending: Vec<(&'static str, String)> = Vec::new();
        let mut flushes = Vec::new();
        for message in std::iter::once(first).chain(rx.try_iter()) {
            match message {
                Message::Write { key, value } => {
                    match pending.iter_mut().find(|(k, _)| *k == key) {
                        Some(slot) => slot.1 = value,
                        None => pending.push((key, value)),
                    }
                }
                Message::Flush(done) => flushes.push(done),
            }
        }

        for (key, value) in pending {
            if let Err(err) = storage.set(key, &value) {
                tracing::warn!(error = %err, "could not save recipes");
                push_failure(&failures, err);
            }
        }
        for done in flushes {
            let _ = done.send(());
        }
    }
    tracing::trace!("writer stopped");
}

fn push_failure(failures: &Mutex<VecDeque<PersistenceError>>, err: PersistenceError) {
    let mut failures = failures.lock().unwrap_or_else(PoisonError::into_inner);
    if failures.len() == MAX_FAILURES {
        failures.pop_front();
    }
    failures.push_back(err);
}

impl Drop for Writer {
    fn drop(&mut self) {
        // closing the channel lets the thread drain the queue and exit
        drop(self.tx.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("recipe writer panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::storage::{MemoryStorage, SlowStorage, RECIPES_KEY};

    #[test]
    fn test_writes_in_order() {
        let storage = MemoryStorage::new();
        let writer = Writer::spawn(Box::new(storage.clone())).unwrap();
        for i in 0..100 {
            writer.send(RECIPES_KEY, i.to_string());
        }
        writer.flush();
        assert_eq!(storage.value(RECIPES_KEY).as_deref(), Some("99"));
        assert!(writer.take_failures().is_empty());
    }

    #[test]
    fn test_drop_drains_queue() {
        let storage = MemoryStorage::new();
        let writer = Writer::spawn(Box::new(storage.clone())).unwrap();
        writer.send(RECIPES_KEY, "last".into());
        drop(writer);
        assert_eq!(storage.value(RECIPES_KEY).as_deref(), Some("last"));
    }

    #[test]
    fn test_failures_are_kept() {
        let storage = MemoryStorage::new();
        storage.set_read_only(true);
        let writer = Writer::spawn(Box::new(storage.clone())).unwrap();
        writer.send(RECIPES_KEY, "a".into());
        writer.send(RECIPES_KEY, "b".into());
        writer.flush();

        let failures = writer.take_failures();
        assert_eq!(failures.len(), 2);
        assert!(matches!(failures[0], PersistenceError::ReadOnly(_)));
        assert!(writer.take_failures().is_empty());
        assert!(storage.value(RECIPES_KEY).is_none());
    }

    #[test]
    fn test_failures_are_capped() {
        let writer = Writer::spawn(Box::new(MemoryStorage::new())).unwrap();
        for i in 0..MAX_FAILURES + 10 {
            writer.record(PersistenceError::ReadOnly(i.to_string()));
        }
        let failures = writer.take_failures();
        assert_eq!(failures.len(), MAX_FAILURES);
        assert!(matches!(&failures[0], PersistenceError::ReadOnly(k) if k == "10"));
        let last = (MAX_FAILURES + 9).to_string();
        assert!(matches!(failures.last(), Some(PersistenceError::ReadOnly(k)) if *k == last));
    }

    #[test]
    fn test_burst_keeps_only_latest() {
        let storage = SlowStorage::new(Duration::from_millis(50));
        let writer = Writer::spawn(Box::new(storage.clone())).unwrap();
        for i in 0..50 {
            writer.send(RECIPES_KEY, i.to_string());
        }
        writer.flush();
        assert_eq!(storage.inner.value(RECIPES_KEY).as_deref(), Some("49"));
        assert!(storage.writes() < 50);
    }
}
