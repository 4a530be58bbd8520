//! Background task dispatch.
//!
//! Tasks run on the tokio runtime and only ever write back by posting an
//! [`AppEvent`] to the owner's queue. The owner drains the queue in FIFO order
//! and is the only place where app state changes.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::FutureExt;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::events::AppEvent;

/// Sending half, cloned into every task
#[derive(Clone)]
pub struct Dispatcher {
    tx: UnboundedSender<AppEvent>,
    outstanding: Arc<AtomicUsize>,
}

/// Receiving half, owned by the app loop
pub struct EventQueue {
    rx: UnboundedReceiver<AppEvent>,
    outstanding: Arc<AtomicUsize>,
}

pub fn channel() -> (Dispatcher, EventQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    let outstanding = Arc::new(AtomicUsize::new(0));
    (
        Dispatcher {
            tx,
            outstanding: Arc::clone(&outstanding),
        },
        EventQueue { rx, outstanding },
    )
}

/// Decrements the task counter when the task ends, even by panic
struct TaskGuard(Arc<AtomicUsize>);

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Dispatcher {
    /// Enqueue an event for the owner
    pub fn post(&self, event: AppEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("Event queue closed, dropping event");
        }
    }

    /// Run `future` in the background and post its result
    pub fn spawn<F>(&self, task: &'static str, future: F)
    where
        F: Future<Output = AppEvent> + Send + 'static,
    {
        let dispatcher = self.clone();
        self.spawn_with(task, move |_| async move {
            let event = future.await;
            dispatcher.post(event);
        });
    }

    /// Run a task that posts its own events (progress, streamed results)
    pub fn spawn_with<F, Fut>(&self, task: &'static str, make: F)
    where
        F: FnOnce(Dispatcher) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.spawn_tagged(task, None, make);
    }

    /// Like [`spawn_with`](Self::spawn_with) for a page of listing
    /// `generation`; a panic reports the generation it belonged to
    pub fn spawn_listing<F, Fut>(&self, task: &'static str, generation: u64, make: F)
    where
        F: FnOnce(Dispatcher) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.spawn_tagged(task, Some(generation), make);
    }

    fn spawn_tagged<F, Fut>(&self, task: &'static str, generation: Option<u64>, make: F)
    where
        F: FnOnce(Dispatcher) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        let guard = TaskGuard(Arc::clone(&self.outstanding));
        let dispatcher = self.clone();
        let future = make(self.clone());

        tokio::spawn(async move {
            let _guard = guard;
            if let Err(error) = catch_task_panic(future).await {
                tracing::error!(task, ?generation, error = %error, "Background task panicked");
                dispatcher.post(AppEvent::TaskFailed {
                    task,
                    generation,
                    error,
                });
            }
        });
    }
}

impl EventQueue {
    /// Every event queued right now, without waiting
    pub fn drain(&mut self) -> Vec<AppEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Wait for the next event
    pub async fn recv(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }

    /// Background tasks that have not finished yet
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// True when no task is running and nothing is queued
    pub fn is_idle(&self) -> bool {
        self.outstanding() == 0 && self.rx.is_empty()
    }
}

/// Run a future, turning a panic into an error message
async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| panic_message(panic.as_ref()))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
