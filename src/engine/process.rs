use crate::{
    callback::CallbackArgs,
    engine::SyncPoint,
    sync::{Ordering, current_thread_id},
    types::PointName,
};
use std::panic::{self, AssertUnwindSafe};

impl SyncPoint {
    /// Reach `point` on the calling thread.
    ///
    /// When processing is enabled:
    /// 1. every point marked by `point` is bound to this thread,
    /// 2. if `point` itself is bound to another thread, returns at once
    ///    without waiting, running the callback or recording the pass,
    /// 3. blocks until each predecessor of `point` has passed, re-checking the
    ///    marker binding after every wake-up,
    /// 4. runs the callback of `point`, if any, with `args` and the engine
    ///    lock released,
    /// 5. records `point` as passed and wakes every waiting thread.
    ///
    /// When processing is disabled this is a no-op and does not lock.
    ///
    /// A panic raised by the callback is propagated after the engine has
    /// accounted for the finished callback; the point is not recorded as
    /// passed in that case.
    pub fn process(&self, point: &str, args: &mut CallbackArgs<'_>) {
        if !self.enabled.load(Ordering::Acquire) {
            return;
        }
        let thread = current_thread_id();
        let mut state = self.lock();
        state.graph.bind_markers(point, thread);
        if state.graph.disabled_by_marker(point, thread) {
            tracing::trace!(point, "sync point disabled by marker");
            return;
        }

        while !state.graph.predecessors_passed(point, &state.passed) {
            tracing::trace!(
                point,
                pending = ?state.graph.pending_predecessors(point, &state.passed).collect::<Vec<_>>(),
                "sync point waiting"
            );
            state = self.wait(state);
            // The graph may have been reloaded while we slept.
            if state.graph.disabled_by_marker(point, thread) {
                tracing::trace!(point, "sync point disabled by marker");
                return;
            }
        }

        if let Some(callback) = state.callbacks.get(point).cloned() {
            state.callbacks_running += 1;
            drop(state);
            let result = panic::catch_unwind(AssertUnwindSafe(|| callback(args)));
            state = self.lock();
            state.callbacks_running -= 1;
            if let Err(payload) = result {
                drop(state);
                self.cv.notify_all();
                panic::resume_unwind(payload);
            }
        }

        state.passed.insert(PointName::from(point));
        tracing::trace!(
            point,
            successors = ?state.graph.successors_of(point),
            "sync point passed"
        );
        drop(state);
        self.cv.notify_all();
    }

    /// [`SyncPoint::process`] without arguments.
    pub fn process_point(&self, point: &str) {
        self.process(point, &mut CallbackArgs::empty());
    }
}
