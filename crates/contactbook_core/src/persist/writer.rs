//! Background writer owning the durable key-value store.
//!
//! # Responsibility
//! - Apply snapshot writes off the caller's thread (fire-and-forget).
//! - Serve reads and flush barriers in queue order.
//!
//! # Invariants
//! - Commands are applied strictly in send order by a single thread, so a
//!   later snapshot always supersedes an earlier one.
//! - Write failures are logged and dropped; they never reach the caller.

use crate::persist::kv_store::KeyValueStore;
use crate::persist::{PersistError, PersistResult};
use log::{debug, error, info, warn};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

const WRITER_THREAD_NAME: &str = "contactbook-writer";

enum WriterCommand {
    Read {
        key: String,
        reply: Sender<PersistResult<Option<String>>>,
    },
    Write {
        key: String,
        value: String,
    },
    Remove {
        key: String,
    },
    Flush {
        reply: Sender<()>,
    },
    Shutdown,
}

/// Handle to the writer thread.
pub(crate) struct SnapshotWriter {
    commands: Sender<WriterCommand>,
    handle: Option<JoinHandle<()>>,
}

impl SnapshotWriter {
    /// Moves `store` onto a dedicated writer thread.
    pub(crate) fn spawn(store: Box<dyn KeyValueStore>) -> PersistResult<Self> {
        let (commands, inbox) = mpsc::channel();
        let handle = thread::Builder::new()
            .name(WRITER_THREAD_NAME.to_string())
            .spawn(move || run_writer(store, inbox))?;

        Ok(Self {
            commands,
            handle: Some(handle),
        })
    }

    /// Reads `key` after every previously queued command has been applied.
    pub(crate) fn read(&self, key: &str) -> PersistResult<Option<String>> {
        let (reply, answer) = mpsc::channel();
        self.send(WriterCommand::Read {
            key: key.to_string(),
            reply,
        })?;
        answer.recv().map_err(|_| PersistError::WriterClosed)?
    }

    /// Queues a whole-value overwrite of `key`. Returns before the write lands.
    pub(crate) fn write(&self, key: &str, value: String) -> PersistResult<()> {
        self.send(WriterCommand::Write {
            key: key.to_string(),
            value,
        })
    }

    /// Queues removal of `key`.
    pub(crate) fn remove(&self, key: &str) -> PersistResult<()> {
        self.send(WriterCommand::Remove {
            key: key.to_string(),
        })
    }

    /// Blocks until every command queued before this call has been applied.
    pub(crate) fn flush(&self) -> PersistResult<()> {
        let (reply, done) = mpsc::channel();
        self.send(WriterCommand::Flush { reply })?;
        done.recv().map_err(|_| PersistError::WriterClosed)
    }

    /// Drains the queue and joins the writer thread.
    pub(crate) fn shutdown(mut self) {
        self.stop();
    }

    fn send(&self, command: WriterCommand) -> PersistResult<()> {
        self.commands
            .send(command)
            .map_err(|_| PersistError::WriterClosed)
    }

    fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let _ = self.commands.send(WriterCommand::Shutdown);
        if handle.join().is_err() {
            error!("event=writer_stop module=persist status=error error_code=writer_panicked");
        }
    }
}

impl Drop for SnapshotWriter {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_writer(mut store: Box<dyn KeyValueStore>, inbox: Receiver<WriterCommand>) {
    info!("event=writer_start module=persist status=ok");

    for command in inbox {
        match command {
            WriterCommand::Read { key, reply } => {
                let _ = reply.send(store.get(&key));
            }
            WriterCommand::Write { key, value } => {
                let started_at = Instant::now();
                match store.set(&key, &value) {
                    Ok(()) => debug!(
                        "event=snapshot_write module=persist status=ok key={} bytes={} duration_ms={}",
                        key,
                        value.len(),
                        started_at.elapsed().as_millis()
                    ),
                    Err(err) => warn!(
                        "event=snapshot_write module=persist status=error key={} error_code=write_failed error={}",
                        key, err
                    ),
                }
            }
            WriterCommand::Remove { key } => match store.remove(&key) {
                Ok(removed) => info!(
                    "event=snapshot_remove module=persist status=ok key={} removed={}",
                    key, removed
                ),
                Err(err) => warn!(
                    "event=snapshot_remove module=persist status=error key={} error_code=remove_failed error={}",
                    key, err
                ),
            },
            WriterCommand::Flush { reply } => {
                let _ = reply.send(());
            }
            WriterCommand::Shutdown => break,
        }
    }

    info!("event=writer_stop module=persist status=ok");
}
