//! Background model loading.
//!
//! Each request becomes a task on a small thread pool. Finished loads, whether
//! they succeeded or not, come back through an unbounded channel that the frame
//! loop drains between ticks. Nothing is cancelled, retried or timed out.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use futures::{
    channel::mpsc::{self, UnboundedReceiver, UnboundedSender},
    executor::ThreadPool,
    StreamExt,
};

use super::loader::{load_model, ModelData};
use crate::error::AssetLoadError;

/// What a loaded model is used for in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetRole {
    /// The bobbing centerpiece
    Main,
    /// Static backdrop with a fixed pose
    Background,
    /// Template cloned into the floating props
    Floating,
}

impl fmt::Display for AssetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetRole::Main => write!(f, "main"),
            AssetRole::Background => write!(f, "background"),
            AssetRole::Floating => write!(f, "floating"),
        }
    }
}

/// Outcome of one load request.
#[derive(Debug)]
pub struct AssetEvent {
    pub role: AssetRole,
    pub path: PathBuf,
    pub result: Result<ModelData, AssetLoadError>,
}

pub struct AssetQueue {
    pool: ThreadPool,
    sender: UnboundedSender<AssetEvent>,
    receiver: UnboundedReceiver<AssetEvent>,
    pending: usize,
}

impl AssetQueue {
    pub fn new() -> std::io::Result<Self> {
        let pool = ThreadPool::builder()
            .pool_size(2)
            .name_prefix("asset-loader-")
            .create()?;
        let (sender, receiver) = mpsc::unbounded();

        Ok(Self {
            pool,
            sender,
            receiver,
            pending: 0,
        })
    }

    /// Starts loading `path` in the background.
    pub fn request(&mut self, role: AssetRole, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let sender = self.sender.clone();
        self.pending += 1;

        log::debug!("Requesting {} model '{}'", role, path.display());

        self.pool.spawn_ok(async move {
            let result = load_model(&path);
            // The receiver only goes away when the app shuts down
            let _ = sender.unbounded_send(AssetEvent { role, path, result });
        });
    }

    /// Returns every load that finished since the last call, without blocking.
    pub fn drain(&mut self) -> Vec<AssetEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) = self.receiver.try_next() {
            self.pending = self.pending.saturating_sub(1);
            events.push(event);
        }
        events
    }

    /// Waits for the next finished load.
    pub async fn next_event(&mut self) -> Option<AssetEvent> {
        let event = self.receiver.next().await;
        if event.is_some() {
            self.pending = self.pending.saturating_sub(1);
        }
        event
    }

    /// Number of requests whose result has not been collected yet.
    pub fn pending(&self) -> usize {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_failed_load_is_delivered() {
        let mut queue = AssetQueue::new().unwrap();
        queue.request(AssetRole::Background, "./missing/barn.glb");
        assert_eq!(queue.pending(), 1);

        let event = block_on(queue.next_event()).unwrap();
        assert_eq!(event.role, AssetRole::Background);
        assert!(matches!(event.result, Err(AssetLoadError::Io { .. })));
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn test_drain_is_empty_without_requests() {
        let mut queue = AssetQueue::new().unwrap();
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_each_request_reports_once() {
        let mut queue = AssetQueue::new().unwrap();
        queue.request(AssetRole::Main, "./missing/a.glb");
        queue.request(AssetRole::Floating, "./missing/b.obj");

        let mut roles = vec![
            block_on(queue.next_event()).unwrap().role,
            block_on(queue.next_event()).unwrap().role,
        ];
        roles.sort_by_key(|role| *role as u8);
        assert_eq!(roles, vec![AssetRole::Main, AssetRole::Floating]);
        assert!(queue.drain().is_empty());
    }
}
