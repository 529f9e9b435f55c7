//! Simple stateless pub-sub event handler
//!
//! Components publish events into a bounded channel; a single background task drains the channel and runs the
//! handler for each event in its own task. Handlers have no access to the internal state of the system, only to the
//! event itself.
//!
//! Handlers can be async, and can be time-boxed with [`EventHandler::with_timeout`]. A handler that runs over its
//! time limit is dropped. It is not retried.
use std::{
    future::Future,
    pin::Pin,
    sync::{atomic::AtomicI64, Arc},
    time::Duration,
};

use log::*;
use tokio::sync::{mpsc, mpsc::error::TrySendError};

pub type Handler<E> = Arc<dyn Fn(E) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

pub struct EventHandler<E: Send + Sync + 'static> {
    listener: mpsc::Receiver<E>,
    sender: mpsc::Sender<E>,
    handler: Handler<E>,
    timeout: Option<Duration>,
}

impl<E: Send + Sync + 'static> EventHandler<E> {
    pub fn new(buffer_size: usize, handler: Handler<E>) -> Self {
        let (sender, receiver) = mpsc::channel(buffer_size);
        Self { listener: receiver, sender, handler, timeout: None }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn subscribe(&self) -> EventProducer<E> {
        EventProducer::new(self.sender.clone())
    }

    pub async fn start_handler(mut self) {
        debug!("📬️ Starting event handler");
        // drop the internal sender so that when the last subscriber is dropped, we can automatically shut down the
        // handler
        drop(self.sender);
        let jobs = Arc::new(AtomicI64::new(0));
        while let Some(ev) = self.listener.recv().await {
            trace!("📬️ Handling event");
            let handler = Arc::clone(&self.handler);
            let timeout = self.timeout;
            jobs.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            let job = jobs.clone();
            tokio::spawn(async move {
                match timeout {
                    Some(limit) => {
                        if tokio::time::timeout(limit, (handler)(ev)).await.is_err() {
                            warn!("📬️ Event handler did not complete within {}ms. Abandoning it.", limit.as_millis());
                        }
                    },
                    None => (handler)(ev).await,
                }
                job.fetch_sub(1, std::sync::atomic::Ordering::SeqCst);
                trace!("📬️ Event handled");
            });
        }
        match tokio::spawn(async move {
            while jobs.load(std::sync::atomic::Ordering::SeqCst) > 0 {
                debug!("📬️ Waiting for jobs to complete");
                tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
            }
        })
        .await
        {
            Ok(_) => {
                debug!("📬️ Event handler shutting down gracefully");
            },
            Err(e) => {
                warn!("📬️ Event handler shutdown process failed: {e}.");
            },
        }
        debug!("📬️ Event handler has shut down");
    }
}

#[derive(Clone)]
pub struct EventProducer<E: Send + Sync> {
    sender: mpsc::Sender<E>,
}

impl<E: Send + Sync> EventProducer<E> {
    pub fn new(sender: mpsc::Sender<E>) -> Self {
        Self { sender }
    }

    /// Publishes the event, waiting for space in the channel if it is full.
    pub async fn publish_event(&self, event: E) {
        if let Err(e) = self.sender.send(event).await {
            error!("📬️ Failed to send event: {e}");
        }
    }

    /// Publishes the event without waiting. If the channel is full or closed, the event is dropped and logged.
    pub fn try_publish_event(&self, event: E) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                error!("📬️ Event queue is full. Event dropped.");
                false
            },
            Err(TrySendError::Closed(_)) => {
                error!("📬️ Event queue is closed. Event dropped.");
                false
            },
        }
    }
}
