//! Folder watching and decode dispatch.
//!
//! One watch loop (driven by `notify`) filters file-creation events and
//! hands accepted paths to a bounded worker pool. The watch callback only
//! filters and registers; everything that can block (the settle delay, the
//! decode itself) happens on a pool worker, so bursts of events queue
//! instead of stalling the loop or spawning unbounded threads.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use crate::core::{ConfigValidator, MrzError, MrzResult, WatcherConfig};
use crate::domain::GuestRecord;
use crate::pipeline::{
    DecodeOrchestrator, MrzDecoder, ScanOutcome, has_image_extension, is_derived_artifact,
};

/// Set of absolute paths already dispatched.
///
/// Owned by the dispatcher and dropped with it; grows monotonically for the
/// dispatcher's lifetime and is never evicted. Membership check and insert
/// are one atomic step, which is what keeps duplicate filesystem events for
/// the same path from dispatching twice.
#[derive(Debug, Default)]
pub struct WatchedFileRegistry {
    seen: Mutex<HashSet<PathBuf>>,
}

impl WatchedFileRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `path`, returning `true` if it was not already present.
    pub fn try_register(&self, path: &Path) -> bool {
        self.seen
            .lock()
            .expect("registry mutex poisoned")
            .insert(path.to_path_buf())
    }

    /// Number of registered paths.
    pub fn len(&self) -> usize {
        self.seen.lock().expect("registry mutex poisoned").len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// State shared between the watch callback and the worker pool.
struct DispatchContext<D> {
    orchestrator: DecodeOrchestrator<D>,
    registry: WatchedFileRegistry,
    pool: rayon::ThreadPool,
    records: Sender<GuestRecord>,
    settle_delay: Duration,
}

impl<D: MrzDecoder + 'static> DispatchContext<D> {
    /// Filters one creation event and, if accepted, schedules the
    /// settle-wait plus decode on the pool. Never blocks.
    fn handle_created(ctx: &Arc<Self>, path: PathBuf) {
        if !has_image_extension(&path) {
            return;
        }
        if is_derived_artifact(&path) {
            debug!(path = %path.display(), "ignoring derived artifact");
            return;
        }
        if !ctx.registry.try_register(&path) {
            debug!(path = %path.display(), "duplicate event for already dispatched path");
            return;
        }

        info!(path = %path.display(), "detected new image");
        let worker = Arc::clone(ctx);
        ctx.pool.spawn(move || {
            // Give the writer time to finish before reading.
            std::thread::sleep(worker.settle_delay);
            if !path.exists() {
                warn!(path = %path.display(), "file vanished before settle delay elapsed");
                return;
            }
            worker.run_batch(vec![path]);
        });
    }

    /// Schedules an explicit batch (drag-drop or directory sweep) as one
    /// worker unit.
    fn dispatch_batch(ctx: &Arc<Self>, paths: Vec<PathBuf>) {
        if paths.is_empty() {
            return;
        }
        let worker = Arc::clone(ctx);
        ctx.pool.spawn(move || worker.run_batch(paths));
    }

    /// Runs on a pool worker: scans each item and forwards completed
    /// records in completion order.
    fn run_batch(&self, paths: Vec<PathBuf>) {
        for outcome in self.orchestrator.scan_batch(&paths) {
            match outcome {
                ScanOutcome::Decoded(record) => {
                    if self.records.send(record).is_err() {
                        debug!("record receiver dropped, discarding result");
                    }
                }
                ScanOutcome::NotDecodable { source_image } => {
                    warn!(source = %source_image, "image not decodable");
                }
            }
        }
    }
}

/// Observes one directory for newly created images and feeds them through
/// the decode orchestrator on a bounded worker pool.
///
/// Completed [`GuestRecord`]s arrive on the channel passed at construction,
/// in completion order (not input order); records from concurrent batches
/// interleave. Undecodable items are logged and skipped.
pub struct FolderWatchDispatcher<D> {
    context: Arc<DispatchContext<D>>,
    config: WatcherConfig,
    watcher: Option<RecommendedWatcher>,
    watch_dir: Option<PathBuf>,
}

impl<D: MrzDecoder + 'static> FolderWatchDispatcher<D> {
    /// Creates a dispatcher around an orchestrator and a record sink.
    pub fn new(
        orchestrator: DecodeOrchestrator<D>,
        config: WatcherConfig,
        records: Sender<GuestRecord>,
    ) -> MrzResult<Self> {
        config.validate()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.max_workers)
            .thread_name(|i| format!("mrz-decode-{}", i))
            .build()
            .map_err(|e| MrzError::config_error(format!("failed to build worker pool: {}", e)))?;

        Ok(Self {
            context: Arc::new(DispatchContext {
                orchestrator,
                registry: WatchedFileRegistry::new(),
                pool,
                records,
                settle_delay: Duration::from_millis(config.settle_delay_ms),
            }),
            config,
            watcher: None,
            watch_dir: None,
        })
    }

    /// Starts watching `dir` (non-recursive) for file-creation events.
    ///
    /// Replaces any previous watch. The registry is not reset: paths
    /// dispatched earlier in this dispatcher's lifetime stay dispatched.
    pub fn start(&mut self, dir: &Path) -> MrzResult<()> {
        let ctx = Arc::clone(&self.context);

        let mut watcher =
            notify::recommended_watcher(move |res: notify::Result<notify::Event>| match res {
                Ok(event) if event.kind.is_create() => {
                    for path in event.paths {
                        DispatchContext::handle_created(&ctx, path);
                    }
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "watch error"),
            })?;

        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        info!(dir = %dir.display(), settle_ms = self.config.settle_delay_ms, "watching directory");

        self.watcher = Some(watcher);
        self.watch_dir = Some(dir.to_path_buf());
        Ok(())
    }

    /// Stops watching. Batches already dispatched run to completion.
    pub fn stop(&mut self) {
        if self.watcher.take().is_some() {
            info!("stopped watching");
        }
        self.watch_dir = None;
    }

    /// Whether a watch is currently active.
    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    /// Sweeps the watched directory for images already present, dispatching
    /// the accepted ones as a single batch. Returns how many were accepted.
    ///
    /// Applies the same filters as the event path, including the registry,
    /// so a sweep never double-dispatches files the watcher has seen.
    pub fn scan_existing(&self) -> MrzResult<usize> {
        let dir = self
            .watch_dir
            .as_ref()
            .ok_or_else(|| MrzError::invalid_input("no directory is being watched"))?;

        let mut batch = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() || !has_image_extension(&path) || is_derived_artifact(&path) {
                continue;
            }
            if self.context.registry.try_register(&path) {
                batch.push(path);
            }
        }

        let count = batch.len();
        info!(dir = %dir.display(), count, "sweeping existing images");
        DispatchContext::dispatch_batch(&self.context, batch);
        Ok(count)
    }

    /// Dispatches an externally supplied batch (drag-drop) as one worker
    /// unit, filtering out non-image paths. Returns how many were accepted.
    pub fn dispatch_batch(&self, paths: Vec<PathBuf>) -> usize {
        let batch: Vec<PathBuf> = paths.into_iter().filter(|p| has_image_extension(p)).collect();
        let count = batch.len();
        DispatchContext::dispatch_batch(&self.context, batch);
        count
    }

    /// The registry of already dispatched paths.
    pub fn registry(&self) -> &WatchedFileRegistry {
        &self.context.registry
    }

    /// Test seam mirroring one creation event from the filesystem source.
    #[cfg(test)]
    fn simulate_created(&self, path: PathBuf) {
        DispatchContext::handle_created(&self.context, path);
    }
}

impl<D> Drop for FolderWatchDispatcher<D> {
    fn drop(&mut self) {
        self.watcher.take();
    }
}
