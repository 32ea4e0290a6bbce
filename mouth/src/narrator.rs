use crate::Mouth;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

enum NarrationItem {
    Say(String),
    Close,
}

/// Handle to the narration pipeline.
///
/// `say` enqueues text without ever blocking the caller; a single background
/// worker drains the queue and speaks one item at a time through the
/// [`Mouth`] it was spawned with. Items are spoken in insertion order and a
/// failed playback never stops the loop.
pub struct Narrator {
    queue: mpsc::UnboundedSender<NarrationItem>,
    narrating: Arc<AtomicBool>,
    worker: JoinHandle<()>,
}

impl Narrator {
    /// Start the worker task speaking through `mouth`.
    pub fn spawn(mouth: Arc<dyn Mouth>) -> Self {
        let (queue, mut rx) = mpsc::unbounded_channel();
        let narrating = Arc::new(AtomicBool::new(false));
        let flag = narrating.clone();
        let worker = tokio::spawn(async move {
            while let Some(item) = rx.recv().await {
                let text = match item {
                    NarrationItem::Say(text) => text,
                    NarrationItem::Close => break,
                };
                // The flag is owned here: set strictly around playback and
                // cleared even when the mouth errors.
                flag.store(true, Ordering::SeqCst);
                if let Err(err) = mouth.speak(&text).await {
                    warn!(%text, ?err, "narration failed, continuing");
                }
                flag.store(false, Ordering::SeqCst);
            }
            debug!("narration worker stopped");
        });
        Self {
            queue,
            narrating,
            worker,
        }
    }

    /// Queue `text` for speech. Never blocks and never drops the item.
    pub fn say(&self, text: impl Into<String>) {
        let text = text.into();
        debug!(%text, "narration queued");
        let _ = self.queue.send(NarrationItem::Say(text));
    }

    /// Whether the worker is speaking right now. Informational only.
    pub fn narrating(&self) -> bool {
        self.narrating.load(Ordering::SeqCst)
    }

    /// Enqueue the shutdown sentinel and wait for the worker to finish.
    ///
    /// The sentinel queues behind anything already pending, so every item
    /// enqueued before `close` is spoken before this returns.
    pub async fn close(self) {
        let _ = self.queue.send(NarrationItem::Close);
        if let Err(err) = self.worker.await {
            warn!(?err, "narration worker did not shut down cleanly");
        }
    }
}
