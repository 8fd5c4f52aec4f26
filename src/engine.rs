mod graph;
mod process;

use crate::{
    callback::{Callback, CallbackArgs},
    config::Config,
    engine::graph::DependencyGraph,
    sync::{AtomicBool, Condvar, Mutex, MutexGuard, Ordering},
    types::{HashMap, HashSet, PointName, PointPair},
};
use derive_more::Debug;
use std::sync::{Arc, PoisonError};

/// Synchronization point engine.
///
/// Code under test calls [`SyncPoint::process`] at named points (usually
/// through the [`sync_point!`](crate::sync_point) family of macros). A test
/// harness loads happens-after edges between those points, and optionally
/// markers and callbacks, to force a particular thread interleaving:
/// - a point blocks until each of its predecessors has been processed at least
///   once since the last load,
/// - a marker edge binds its successor to the thread that processed the
///   predecessor; on every other thread the successor becomes a no-op,
/// - a callback registered for a point runs once the point is unblocked, with
///   the engine lock released, and receives the call site's arguments.
///
/// One engine is meant to be shared (by reference or [`Arc`]) between the
/// harness and the code under test for the duration of a test process. State
/// is only reset by [`SyncPoint::load_dependency_and_markers`],
/// [`SyncPoint::clear_trace`] and the callback clearing operations.
///
/// A cyclic or unsatisfiable graph is not an error: threads reaching the
/// affected points block until the graph is reloaded.
#[must_use]
#[derive(Debug)]
pub struct SyncPoint {
    enabled: AtomicBool,
    state: Mutex<State>,
    /// Signalled whenever a point passes, the graph is reloaded or a callback
    /// finishes.
    #[debug(skip)]
    cv: Condvar,
}

#[derive(Debug, Default)]
struct State {
    graph: DependencyGraph,
    /// Points processed since the graph was last loaded or the trace cleared.
    passed: HashSet<PointName>,
    #[debug(skip)]
    callbacks: HashMap<PointName, Callback>,
    /// Number of callbacks currently executing outside of the lock.
    callbacks_running: usize,
}

impl Default for SyncPoint {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncPoint {
    /// Create an engine with processing disabled.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create an engine from `config`.
    pub fn with_config(config: Config) -> Self {
        let Config { enabled } = config;
        Self {
            enabled: AtomicBool::new(enabled),
            state: Mutex::new(State::default()),
            cv: Condvar::new(),
        }
    }

    /// Create an engine ready to be shared between threads.
    pub fn shared(config: Config) -> Arc<Self> {
        Arc::new(Self::with_config(config))
    }

    /// Enable processing: points block, bind markers and run callbacks.
    pub fn enable_processing(&self) {
        self.enabled.store(true, Ordering::Release);
    }

    /// Disable processing: every point becomes a no-op.
    ///
    /// Threads already blocked inside [`SyncPoint::process`] keep waiting.
    pub fn disable_processing(&self) {
        self.enabled.store(false, Ordering::Release);
    }

    /// Whether processing is currently enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Replace the whole graph.
    ///
    /// Clears every edge, the passed points and all marker bindings, then
    /// loads `dependencies` and `markers`. A marker edge also acts as a
    /// dependency edge. Threads blocked in [`SyncPoint::process`] are woken
    /// and re-evaluate against the new graph; a callback already running is
    /// left alone.
    pub fn load_dependency_and_markers(&self, dependencies: &[PointPair], markers: &[PointPair]) {
        let mut state = self.lock();
        let State { graph, passed, .. } = &mut *state;
        graph.load(dependencies, markers);
        passed.clear();
        let blocked = graph.blocked_points();
        drop(state);

        tracing::debug!(
            dependencies = dependencies.len(),
            markers = markers.len(),
            "sync point graph loaded"
        );
        if !blocked.is_empty() {
            tracing::warn!(
                ?blocked,
                "sync point graph has a cycle, threads reaching these points will block"
            );
        }
        self.cv.notify_all();
    }

    /// Replace the graph with `dependencies` and no markers.
    pub fn load_dependency(&self, dependencies: &[PointPair]) {
        self.load_dependency_and_markers(dependencies, &[]);
    }

    /// Register `callback` for `point`, replacing any previous one.
    ///
    /// Does not wait for running callbacks; an invocation of the replaced
    /// callback that already started runs to completion.
    pub fn set_callback<F>(&self, point: impl Into<PointName>, callback: F)
    where
        F: Fn(&mut CallbackArgs<'_>) + Send + Sync + 'static,
    {
        let point = point.into();
        tracing::debug!(%point, "sync point callback set");
        self.lock().callbacks.insert(point, Arc::new(callback));
    }

    /// Remove the callback of `point`.
    ///
    /// Blocks until no callback is executing, so whatever the removed callback
    /// captured may be released as soon as this returns. Must not be called
    /// from inside a callback.
    pub fn clear_callback(&self, point: &str) {
        let mut state = self.wait_callbacks_idle();
        if state.callbacks.remove(point).is_some() {
            tracing::debug!(point, "sync point callback cleared");
        }
    }

    /// Remove every callback.
    ///
    /// Blocks until no callback is executing. Must not be called from inside
    /// a callback.
    pub fn clear_all_callbacks(&self) {
        let mut state = self.wait_callbacks_idle();
        let cleared = state.callbacks.len();
        state.callbacks.clear();
        tracing::debug!(cleared, "sync point callbacks cleared");
    }

    /// Forget which points have passed, keeping the graph and callbacks.
    ///
    /// Lets a loaded scenario be driven again from the start.
    pub fn clear_trace(&self) {
        self.lock().passed.clear();
        tracing::debug!("sync point trace cleared");
    }

    /// Whether `point` has passed since the graph was loaded or the trace
    /// cleared.
    #[must_use]
    pub fn has_passed(&self, point: &str) -> bool {
        self.lock().passed.contains(point)
    }

    /// Number of callbacks executing right now.
    #[must_use]
    pub fn callbacks_running(&self) -> usize {
        self.lock().callbacks_running
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, State>) -> MutexGuard<'a, State> {
        self.cv.wait(guard).unwrap_or_else(PoisonError::into_inner)
    }

    fn wait_callbacks_idle(&self) -> MutexGuard<'_, State> {
        let mut state = self.lock();
        while state.callbacks_running > 0 {
            state = self.wait(state);
        }
        state
    }
}
