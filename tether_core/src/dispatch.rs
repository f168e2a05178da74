// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Serial task dispatch from producer threads to the render thread.
//!
//! [`channel`] creates a connected pair:
//!
//! - [`Dispatcher`]: a `Send + Sync` handle that any thread can use to post
//!   work. Cloning is cheap (a channel sender clone).
//! - [`RenderQueue`]: the single consumer. Whichever thread owns it and calls
//!   [`run`](RenderQueue::run) or [`drain`](RenderQueue::drain) is the render
//!   thread; tasks execute there one at a time, in FIFO order, with mutable
//!   access to the [`Presenter`].

use core::fmt;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use log::{debug, trace};

use crate::backend::Presenter;

/// A unit of render-thread work.
pub type Task = Box<dyn FnOnce(&mut dyn Presenter) + Send + 'static>;

/// Errors surfaced by [`Dispatcher::dispatch`].
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// The [`RenderQueue`] was dropped; no thread will run the task.
    #[error("render queue disconnected")]
    Disconnected,
}

/// Creates a dispatcher and its render queue.
///
/// With `capacity == None` the queue is unbounded. With `Some(n)`,
/// [`Dispatcher::dispatch`] blocks the producer while `n` tasks are waiting.
#[must_use]
pub fn channel(capacity: Option<usize>) -> (Dispatcher, RenderQueue) {
    let (sender, receiver) = match capacity {
        Some(n) => crossbeam_channel::bounded(n.max(1)),
        None => crossbeam_channel::unbounded(),
    };
    (Dispatcher { sender }, RenderQueue { receiver })
}

/// Posts tasks to the render thread.
///
/// Obtained from [`channel`].
#[derive(Clone)]
pub struct Dispatcher {
    sender: Sender<Task>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("queued", &self.sender.len())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Enqueues `task` to run on the render thread.
    ///
    /// Never runs the task inline. Safe to call from any thread, including
    /// the render thread itself (the task then runs after the current one).
    pub fn dispatch<F>(&self, task: F) -> Result<(), DispatchError>
    where
        F: FnOnce(&mut dyn Presenter) + Send + 'static,
    {
        self.sender
            .send(Box::new(task))
            .map_err(|_| DispatchError::Disconnected)
    }
}

/// The render-thread end of a [`channel`].
pub struct RenderQueue {
    receiver: Receiver<Task>,
}

impl fmt::Debug for RenderQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderQueue")
            .field("queued", &self.receiver.len())
            .finish_non_exhaustive()
    }
}

impl RenderQueue {
    /// Runs tasks as they arrive until every [`Dispatcher`] has been dropped
    /// and the queue is empty.
    ///
    /// Returns the number of tasks run.
    pub fn run(&self, presenter: &mut dyn Presenter) -> usize {
        let mut count = 0;
        while let Ok(task) = self.receiver.recv() {
            task(presenter);
            count += 1;
        }
        debug!(count; "render queue disconnected");
        count
    }

    /// Runs every task queued so far without blocking, including tasks that
    /// those tasks enqueue.
    ///
    /// Returns the number of tasks run.
    pub fn drain(&self, presenter: &mut dyn Presenter) -> usize {
        let mut count = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(task) => {
                    task(presenter);
                    count += 1;
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        trace!(count; "render queue drained");
        count
    }

    /// Returns the number of tasks waiting to run.
    #[must_use]
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Returns whether no task is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::testing::RecordingPresenter;

    #[test]
    fn tasks_run_in_fifo_order() {
        let (dispatcher, queue) = channel(None);
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        for i in 0..3 {
            let order = Arc::clone(&order);
            dispatcher
                .dispatch(move |_| order.lock().unwrap().push(i))
                .unwrap();
        }
        assert_eq!(queue.len(), 3);

        let mut presenter = RecordingPresenter::default();
        assert_eq!(queue.drain(&mut presenter), 3);
        assert!(queue.is_empty());
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn dispatch_after_queue_drop_is_disconnected() {
        let (dispatcher, queue) = channel(None);
        drop(queue);
        assert_eq!(dispatcher.dispatch(|_| {}), Err(DispatchError::Disconnected));
    }

    #[test]
    fn run_returns_once_dispatchers_are_gone() {
        let (dispatcher, queue) = channel(Some(4));
        let ran = Arc::new(AtomicUsize::new(0));
        let producer = {
            let ran = Arc::clone(&ran);
            std::thread::spawn(move || {
                for _ in 0..10 {
                    let ran = Arc::clone(&ran);
                    dispatcher
                        .dispatch(move |_| {
                            ran.fetch_add(1, Ordering::Relaxed);
                        })
                        .unwrap();
                }
            })
        };

        let mut presenter = RecordingPresenter::default();
        assert_eq!(queue.run(&mut presenter), 10);
        producer.join().unwrap();
        assert_eq!(ran.load(Ordering::Relaxed), 10);
    }

    #[test]
    fn drain_picks_up_tasks_queued_by_tasks() {
        let (dispatcher, queue) = channel(None);
        let inner = dispatcher.clone();
        dispatcher
            .dispatch(move |_| inner.dispatch(|_| {}).unwrap())
            .unwrap();

        let mut presenter = RecordingPresenter::default();
        assert_eq!(queue.drain(&mut presenter), 2);
    }
}
