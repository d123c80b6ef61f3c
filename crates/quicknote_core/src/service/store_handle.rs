//! Asynchronous facade over [`NoteStore`].
//!
//! # Responsibility
//! - Run every store call on one dedicated worker thread that owns the store.
//! - Deliver exactly one completion (a future resolving to a result) per call.
//!
//! # Invariants
//! - Commands execute one at a time in the order the worker receives them.
//! - A command whose caller stopped waiting still runs to completion.
//! - The worker exits once every handle has been dropped.

use super::note_store::{NoteStore, StoreError, StoreResult};
use crate::model::note::{Note, NoteId};
use log::{error, info};
use tokio::sync::{mpsc, oneshot};

const WORKER_THREAD_NAME: &str = "quicknote-store";

type Reply<T> = oneshot::Sender<StoreResult<T>>;

enum Command {
    Initialize(Reply<()>),
    IsReady(oneshot::Sender<bool>),
    List(Reply<Vec<Note>>),
    Get(NoteId, Reply<Option<Note>>),
    Create(String, Reply<NoteId>),
    Update(NoteId, String, Reply<()>),
    Delete(NoteId, Reply<()>),
}

/// Cloneable, async entry point to a store running on its own thread.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl StoreHandle {
    /// Moves `store` onto a new worker thread and returns a handle to it.
    ///
    /// # Errors
    /// - Returns the OS error when the worker thread cannot be spawned.
    pub fn spawn(store: NoteStore) -> std::io::Result<Self> {
        let (commands, receiver) = mpsc::unbounded_channel();
        std::thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run_worker(store, receiver))?;
        Ok(Self { commands })
    }

    pub async fn initialize(&self) -> StoreResult<()> {
        self.request(Command::Initialize).await
    }

    /// Reports whether the store is Ready. A stopped worker reports `false`.
    pub async fn is_ready(&self) -> bool {
        self.send(Command::IsReady).await.unwrap_or(false)
    }

    pub async fn list(&self) -> StoreResult<Vec<Note>> {
        self.request(Command::List).await
    }

    pub async fn get(&self, id: NoteId) -> StoreResult<Option<Note>> {
        self.request(|reply| Command::Get(id, reply)).await
    }

    pub async fn create(&self, text: impl Into<String>) -> StoreResult<NoteId> {
        let text = text.into();
        self.request(|reply| Command::Create(text, reply)).await
    }

    pub async fn update(&self, id: NoteId, text: impl Into<String>) -> StoreResult<()> {
        let text = text.into();
        self.request(|reply| Command::Update(id, text, reply)).await
    }

    pub async fn delete(&self, id: NoteId) -> StoreResult<()> {
        self.request(|reply| Command::Delete(id, reply)).await
    }

    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> Command) -> StoreResult<T> {
        // A vanished worker can never become Ready again.
        self.send(build).await.unwrap_or(Err(StoreError::NotReady))
    }

    async fn send<R>(&self, build: impl FnOnce(oneshot::Sender<R>) -> Command) -> Option<R> {
        let (reply, completion) = oneshot::channel();
        if self.commands.send(build(reply)).is_err() {
            error!("event=store_dispatch module=store status=error error_code=worker_stopped");
            return None;
        }
        match completion.await {
            Ok(value) => Some(value),
            Err(_) => {
                error!("event=store_dispatch module=store status=error error_code=worker_dropped_reply");
                None
            }
        }
    }
}

fn run_worker(mut store: NoteStore, mut receiver: mpsc::UnboundedReceiver<Command>) {
    info!("event=store_worker module=store status=start");
    while let Some(command) = receiver.blocking_recv() {
        // Send failures only mean the caller stopped waiting.
        match command {
            Command::Initialize(reply) => {
                let _ = reply.send(store.initialize());
            }
            Command::IsReady(reply) => {
                let _ = reply.send(store.is_ready());
            }
            Command::List(reply) => {
                let _ = reply.send(store.list());
            }
            Command::Get(id, reply) => {
                let _ = reply.send(store.get(id));
            }
            Command::Create(text, reply) => {
                let _ = reply.send(store.create(&text));
            }
            Command::Update(id, text, reply) => {
                let _ = reply.send(store.update(id, &text));
            }
            Command::Delete(id, reply) => {
                let _ = reply.send(store.delete(id));
            }
        }
    }
    info!("event=store_worker module=store status=stopped");
}

#[cfg(test)]
mod tests {
    use super::{Command, StoreHandle};
    use crate::service::note_store::StoreError;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn stopped_worker_resolves_to_not_ready() {
        let (commands, receiver) = mpsc::unbounded_channel::<Command>();
        drop(receiver);
        let handle = StoreHandle { commands };

        assert!(matches!(handle.list().await, Err(StoreError::NotReady)));
        assert!(matches!(handle.create("lost").await, Err(StoreError::NotReady)));
        assert!(!handle.is_ready().await);
    }

    #[tokio::test]
    async fn dropped_reply_resolves_to_not_ready() {
        let (commands, mut receiver) = mpsc::unbounded_channel::<Command>();
        let worker = std::thread::spawn(move || {
            // Receives each command and drops it without replying.
            while let Some(command) = receiver.blocking_recv() {
                drop(command);
            }
        });
        let handle = StoreHandle { commands };

        assert!(matches!(handle.delete(1).await, Err(StoreError::NotReady)));
        assert!(matches!(handle.initialize().await, Err(StoreError::NotReady)));

        drop(handle);
        worker.join().unwrap();
    }
}
