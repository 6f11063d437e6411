//! Storage collaborators consumed by the trim engine.
//!
//! The engine only needs two things from the outside world: a way to
//! overwrite a keyframe's placement fields, and a way to tell the preview
//! pipeline its cached composition is stale. Writes are full-field
//! overwrites, so replaying or reordering identical writes is harmless.

use crossbeam_channel::{Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use reelgen_core::{ReelgenError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::keyframe::{ClipPatch, Keyframe};
use crate::project::Project;

/// Persistent keyframe storage.
pub trait ClipStore {
    /// Overwrite the fields present in `patch` on keyframe `clip_id`.
    fn update_clip_fields(&self, clip_id: Uuid, patch: ClipPatch) -> Result<()>;

    /// Remove keyframe `clip_id`.
    fn delete_keyframe(&self, clip_id: Uuid) -> Result<()>;
}

/// Cached composition preview, keyed by project.
pub trait PreviewCache {
    /// Mark the preview of `project_id` stale.
    fn invalidate_preview(&self, project_id: Uuid);
}

// ── In-memory store ─────────────────────────────────────────────

/// Store backed by a project held in memory.
///
/// Records every write and invalidation so callers can inspect what the
/// engine emitted.
pub struct InMemoryStore {
    project: RwLock<Project>,
    writes: Mutex<Vec<(Uuid, ClipPatch)>>,
    invalidations: Mutex<HashMap<Uuid, u64>>,
    read_only: AtomicBool,
}

impl InMemoryStore {
    pub fn new(project: Project) -> Self {
        Self {
            project: RwLock::new(project),
            writes: Mutex::new(Vec::new()),
            invalidations: Mutex::new(HashMap::new()),
            read_only: AtomicBool::new(false),
        }
    }

    /// Run `f` against the current project.
    pub fn with_project<R>(&self, f: impl FnOnce(&Project) -> R) -> R {
        f(&self.project.read())
    }

    /// Copy of the current project.
    pub fn snapshot(&self) -> Project {
        self.project.read().clone()
    }

    pub fn keyframe(&self, id: Uuid) -> Option<Keyframe> {
        self.project.read().keyframe(id).cloned()
    }

    /// Every patch written so far, in arrival order.
    pub fn write_log(&self) -> Vec<(Uuid, ClipPatch)> {
        self.writes.lock().clone()
    }

    /// How many times the preview of `project_id` was invalidated.
    pub fn invalidation_count(&self, project_id: Uuid) -> u64 {
        self.invalidations
            .lock()
            .get(&project_id)
            .copied()
            .unwrap_or(0)
    }

    /// Reject all writes while set.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(ReelgenError::Storage("store is read-only".into()));
        }
        Ok(())
    }
}

impl ClipStore for InMemoryStore {
    fn update_clip_fields(&self, clip_id: Uuid, patch: ClipPatch) -> Result<()> {
        self.check_writable()?;
        let mut project = self.project.write();
        let keyframe = project
            .keyframe_mut(clip_id)
            .ok_or_else(|| ReelgenError::NotFound(format!("keyframe {clip_id}")))?;
        keyframe.apply_patch(&patch);
        self.writes.lock().push((clip_id, patch));
        Ok(())
    }

    fn delete_keyframe(&self, clip_id: Uuid) -> Result<()> {
        self.check_writable()?;
        self.project
            .write()
            .delete_keyframe(clip_id)
            .map(|_| ())
            .ok_or_else(|| ReelgenError::NotFound(format!("keyframe {clip_id}")))
    }
}

impl PreviewCache for InMemoryStore {
    fn invalidate_preview(&self, project_id: Uuid) {
        *self.invalidations.lock().entry(project_id).or_insert(0) += 1;
    }
}

// ── Queued store ────────────────────────────────────────────────

/// A write that could not be applied by the background writer.
#[derive(Debug, Clone)]
pub struct StoreFailure {
    pub clip_id: Uuid,
    pub message: String,
}

enum StoreOp {
    Update { clip_id: Uuid, patch: ClipPatch },
    Delete { clip_id: Uuid },
    Invalidate { project_id: Uuid },
    Flush(Sender<()>),
}

/// Fire-and-forget front for another store.
///
/// Calls return as soon as the operation is queued. A single writer thread
/// applies operations in the order they were issued; failures are reported on
/// [`QueuedStore::failures`] and never retried.
pub struct QueuedStore<S> {
    inner: Arc<S>,
    sender: Option<Sender<StoreOp>>,
    failures: Receiver<StoreFailure>,
    worker: Option<JoinHandle<()>>,
}

impl<S> QueuedStore<S>
where
    S: ClipStore + PreviewCache + Send + Sync + 'static,
{
    /// Start the writer thread in front of `inner`.
    pub fn new(inner: S) -> Result<Self> {
        let inner = Arc::new(inner);
        let (sender, ops) = crossbeam_channel::unbounded();
        let (failure_tx, failures) = crossbeam_channel::unbounded();
        let writer_inner = Arc::clone(&inner);
        let worker = std::thread::Builder::new()
            .name("reelgen-store-writer".into())
            .spawn(move || run_writer(writer_inner, ops, failure_tx))?;
        Ok(Self {
            inner,
            sender: Some(sender),
            failures,
            worker: Some(worker),
        })
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Block until every operation queued so far has been applied.
    pub fn flush(&self) -> Result<()> {
        let (ack, done) = crossbeam_channel::bounded(1);
        self.send(StoreOp::Flush(ack))?;
        done.recv()
            .map_err(|_| ReelgenError::Storage("store writer stopped".into()))
    }

    /// Drain failures reported since the last call.
    pub fn failures(&self) -> Vec<StoreFailure> {
        self.failures.try_iter().collect()
    }

    fn send(&self, op: StoreOp) -> Result<()> {
        self.sender
            .as_ref()
            .ok_or_else(|| ReelgenError::Storage("store writer stopped".into()))?
            .send(op)
            .map_err(|_| ReelgenError::Storage("store writer stopped".into()))
    }
}

fn run_writer<S: ClipStore + PreviewCache>(
    inner: Arc<S>,
    ops: Receiver<StoreOp>,
    failures: Sender<StoreFailure>,
) {
    for op in ops.iter() {
        let (clip_id, result) = match op {
            StoreOp::Update { clip_id, patch } => {
                (clip_id, inner.update_clip_fields(clip_id, patch))
            }
            StoreOp::Delete { clip_id } => (clip_id, inner.delete_keyframe(clip_id)),
            StoreOp::Invalidate { project_id } => {
                inner.invalidate_preview(project_id);
                continue;
            }
            StoreOp::Flush(ack) => {
                let _ = ack.send(());
                continue;
            }
        };
        if let Err(e) = result {
            warn!("Store write for keyframe {} failed: {}", clip_id, e);
            let _ = failures.send(StoreFailure {
                clip_id,
                message: e.to_string(),
            });
        }
    }
    debug!("Store writer exiting");
}

impl<S> ClipStore for QueuedStore<S>
where
    S: ClipStore + PreviewCache + Send + Sync + 'static,
{
    fn update_clip_fields(&self, clip_id: Uuid, patch: ClipPatch) -> Result<()> {
        self.send(StoreOp::Update { clip_id, patch })
    }

    fn delete_keyframe(&self, clip_id: Uuid) -> Result<()> {
        self.send(StoreOp::Delete { clip_id })
    }
}

impl<S> PreviewCache for QueuedStore<S>
where
    S: ClipStore + PreviewCache + Send + Sync + 'static,
{
    fn invalidate_preview(&self, project_id: Uuid) {
        if let Err(e) = self.send(StoreOp::Invalidate { project_id }) {
            warn!("Dropping preview invalidation for {}: {}", project_id, e);
        }
    }
}

impl<S> Drop for QueuedStore<S> {
    fn drop(&mut self) {
        // Closing the channel ends the writer loop after it drains.
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Store writer panicked; queued writes may be lost");
            }
        }
    }
}
