use std::{future::Future, sync::Arc};

use anyhow::{Context, Result};
use tokio::{
    runtime::{Builder, Runtime},
    sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
};
use tracing::trace;

use crate::api::Backend;

use super::runtime::Console;

/// A finished network call, applied to the console on the UI thread.
pub(crate) type Completion = Box<dyn FnOnce(&mut Console) + Send>;

/// Runs backend calls off the UI thread. Results come back as completions
/// that the event loop drains once per tick; nothing is ever cancelled.
pub(crate) struct Tasks {
    runtime: Runtime,
    backend: Arc<dyn Backend>,
    sender: UnboundedSender<Completion>,
    receiver: UnboundedReceiver<Completion>,
}

impl Tasks {
    pub(crate) fn new(backend: Arc<dyn Backend>) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("moon-console-io")
            .enable_all()
            .build()
            .context("failed to start the network runtime")?;
        let (sender, receiver) = unbounded_channel();
        Ok(Self {
            runtime,
            backend,
            sender,
            receiver,
        })
    }

    /// Starts `call` and queues `apply` with its output.
    pub(crate) fn spawn<T, F, Fut, A>(&self, call: F, apply: A)
    where
        F: FnOnce(Arc<dyn Backend>) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
        A: FnOnce(&mut Console, T) + Send + 'static,
    {
        let sender = self.sender.clone();
        let future = call(Arc::clone(&self.backend));
        self.runtime.spawn(async move {
            let output = future.await;
            let completion: Completion = Box::new(move |console| apply(console, output));
            if sender.send(completion).is_err() {
                trace!("console gone, dropping completion");
            }
        });
    }

    pub(crate) fn drain(&mut self) -> Vec<Completion> {
        let mut ready = Vec::new();
        while let Ok(completion) = self.receiver.try_recv() {
            ready.push(completion);
        }
        ready
    }

    #[cfg(test)]
    pub(crate) fn wait(&mut self) -> Option<Completion> {
        let receiver = &mut self.receiver;
        self.runtime.block_on(async {
            tokio::time::timeout(std::time::Duration::from_secs(5), receiver.recv())
                .await
                .ok()
                .flatten()
        })
    }
}
