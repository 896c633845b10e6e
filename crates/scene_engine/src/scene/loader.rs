//! Background scene loading
//!
//! The file is read on a worker thread; the caller polls once per frame
//! (or blocks) and parses the text on its own thread when it arrives.
//! Every load produces a fresh [`SceneGraph`]; there is no incremental
//! reload.

use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::{bounded, Receiver, TryRecvError};

use super::error::{SceneError, SceneResult};
use super::graph::SceneGraph;
use super::parser;
use crate::config::SceneConfig;

/// Starts scene loads using one configuration
#[derive(Debug, Clone, Default)]
pub struct SceneLoader {
    config: SceneConfig,
}

impl SceneLoader {
    /// Create a loader
    pub const fn new(config: SceneConfig) -> Self {
        Self { config }
    }

    /// Loader configuration
    pub const fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Start reading `file_name` (resolved against the scene directory)
    pub fn load(&self, file_name: impl AsRef<Path>) -> SceneResult<PendingScene> {
        let path = self.config.resolve(file_name);
        log::info!("Loading scene {}", path.display());

        let (sender, receiver) = bounded(1);
        let worker_path = path.clone();
        thread::Builder::new()
            .name("scene-loader".to_string())
            .spawn(move || {
                // The receiver may already be gone; nothing to report then.
                let _ = sender.send(std::fs::read_to_string(&worker_path));
            })
            .map_err(|source| SceneError::Io {
                path: path.clone(),
                source,
            })?;

        Ok(PendingScene {
            path,
            config: self.config.clone(),
            receiver,
            finished: false,
        })
    }

    /// Read and parse on the calling thread
    pub fn load_blocking(&self, file_name: impl AsRef<Path>) -> SceneResult<SceneGraph> {
        self.load(file_name)?.wait()
    }
}

/// A load in flight
#[derive(Debug)]
pub struct PendingScene {
    path: PathBuf,
    config: SceneConfig,
    receiver: Receiver<std::io::Result<String>>,
    finished: bool,
}

impl PendingScene {
    /// File being loaded
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the result has already been delivered
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Non-blocking check
    ///
    /// Returns `Some` exactly once, when the file has been read and parsed
    /// (or failed); `None` while still reading and after delivery.
    pub fn poll(&mut self) -> Option<SceneResult<SceneGraph>> {
        if self.finished {
            return None;
        }
        match self.receiver.try_recv() {
            Ok(read) => Some(self.finish(read)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(self.abort()),
        }
    }

    /// Block until the scene is ready
    pub fn wait(mut self) -> SceneResult<SceneGraph> {
        if self.finished {
            return Err(SceneError::LoadAborted(self.path));
        }
        match self.receiver.recv() {
            Ok(read) => self.finish(read),
            Err(_) => self.abort(),
        }
    }

    fn finish(&mut self, read: std::io::Result<String>) -> SceneResult<SceneGraph> {
        self.finished = true;
        let result = read
            .map_err(|source| SceneError::Io {
                path: self.path.clone(),
                source,
            })
            .and_then(|src| parser::parse_str(&src, &self.config));

        match &result {
            Ok(_) => log::info!("Scene {} ready", self.path.display()),
            Err(err) => log::error!("Failed to load scene {}: {err}", self.path.display()),
        }
        result
    }

    fn abort(&mut self) -> SceneResult<SceneGraph> {
        self.finished = true;
        log::error!("Scene loader for {} stopped without a result", self.path.display());
        Err(SceneError::LoadAborted(self.path.clone()))
    }
}
