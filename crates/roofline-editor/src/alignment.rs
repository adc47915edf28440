//! Registration of the base imagery layer under a fixed drawing surface.
//!
//! The controller owns an [`AlignmentTransform`] that is applied to the
//! image layer only. Press-and-hold controls repeat their single step on a
//! tokio interval until released; the repeating task is aborted on release
//! and when the controller is dropped.

use roofline_core::models::AlignmentTransform;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Cadence of press-and-hold repeats
pub const REPEAT_INTERVAL: Duration = Duration::from_millis(100);

pub type Listener = Arc<dyn Fn(AlignmentTransform) + Send + Sync>;

/// One single-step adjustment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlignmentAction {
    Move { dx: f64, dy: f64 },
    Rotate { degrees: f64 },
}

impl AlignmentAction {
    pub fn apply(&self, transform: AlignmentTransform) -> AlignmentTransform {
        match *self {
            AlignmentAction::Move { dx, dy } => transform.translated(dx, dy),
            AlignmentAction::Rotate { degrees } => transform.rotated(degrees),
        }
    }
}

#[derive(Default)]
struct Shared {
    transform: AlignmentTransform,
    listeners: Vec<Listener>,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    // State is a plain value; a panicking listener cannot leave it half-written
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

fn apply_shared(shared: &Mutex<Shared>, action: AlignmentAction) -> AlignmentTransform {
    let (transform, listeners) = {
        let mut guard = lock(shared);
        guard.transform = action.apply(guard.transform);
        (guard.transform, guard.listeners.clone())
    };
    for listener in &listeners {
        listener(transform);
    }
    transform
}

/// Cancels the repeating task when stopped or dropped
#[derive(Debug)]
pub struct RepeatHandle {
    task: JoinHandle<()>,
}

impl Drop for RepeatHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[derive(Default)]
pub struct AlignmentController {
    shared: Arc<Mutex<Shared>>,
    active: Option<RepeatHandle>,
}

impl AlignmentController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform(&self) -> AlignmentTransform {
        lock(&self.shared).transform
    }

    /// Register a listener called after every change with the new transform
    pub fn subscribe(&self, listener: impl Fn(AlignmentTransform) + Send + Sync + 'static) {
        lock(&self.shared).listeners.push(Arc::new(listener));
    }

    pub fn apply(&self, action: AlignmentAction) -> AlignmentTransform {
        apply_shared(&self.shared, action)
    }

    pub fn move_by(&self, dx: f64, dy: f64) -> AlignmentTransform {
        self.apply(AlignmentAction::Move { dx, dy })
    }

    pub fn rotate_by(&self, degrees: f64) -> AlignmentTransform {
        self.apply(AlignmentAction::Rotate { degrees })
    }

    /// Back to the identity transform
    pub fn reset(&self) -> AlignmentTransform {
        let listeners = {
            let mut guard = lock(&self.shared);
            guard.transform = AlignmentTransform::identity();
            guard.listeners.clone()
        };
        let transform = AlignmentTransform::identity();
        for listener in &listeners {
            listener(transform);
        }
        transform
    }

    /// Start a press-and-hold: one step now, then one every [`REPEAT_INTERVAL`].
    /// Replaces any repeat already running. Must be called within a tokio runtime.
    pub fn press(&mut self, action: AlignmentAction) {
        self.release();
        self.apply(action);

        let shared = Arc::clone(&self.shared);
        let task = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + REPEAT_INTERVAL;
            let mut ticker = tokio::time::interval_at(start, REPEAT_INTERVAL);
            loop {
                ticker.tick().await;
                apply_shared(&shared, action);
            }
        });
        self.active = Some(RepeatHandle { task });
    }

    /// Stop the current press-and-hold, if any
    pub fn release(&mut self) -> bool {
        self.active.take().is_some()
    }

    pub fn is_repeating(&self) -> bool {
        self.active.is_some()
    }
}
