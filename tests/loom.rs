#![allow(missing_docs)]
#![cfg(feature = "loom")]

use loom::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    thread,
};
use syncpoint::{config::Config, engine::SyncPoint, types::PointPair};

fn engine() -> Arc<SyncPoint> {
    Arc::new(SyncPoint::with_config(Config::enabled()))
}

#[test]
fn loom_successor_waits_for_predecessor() {
    loom::model(|| {
        // First -> Second: whichever thread gets scheduled first, the callback
        // of Second must observe First's callback.
        let engine = engine();
        engine.load_dependency(&[PointPair::new("First", "Second")]);
        let order = Arc::new(Mutex::new(Vec::new()));
        for point in ["First", "Second"] {
            let order = order.clone();
            engine.set_callback(point, move |_| order.lock().unwrap().push(point));
        }

        let second = {
            let engine = engine.clone();
            thread::spawn(move || engine.process_point("Second"))
        };
        engine.process_point("First");
        second.join().unwrap();

        assert_eq!(*order.lock().unwrap(), ["First", "Second"]);
        assert!(engine.has_passed("Second"));
    });
}

#[test]
fn loom_clear_waits_for_running_callback() {
    loom::model(|| {
        // The callback touches state the harness "frees" right after clearing.
        let engine = engine();
        let alive = Arc::new(AtomicBool::new(true));
        {
            let alive = alive.clone();
            engine.set_callback("Use", move |_| {
                assert!(alive.load(Ordering::SeqCst), "callback ran after clear");
            });
        }

        let user = {
            let engine = engine.clone();
            thread::spawn(move || engine.process_point("Use"))
        };
        engine.clear_all_callbacks();
        alive.store(false, Ordering::SeqCst);
        user.join().unwrap();

        assert_eq!(engine.callbacks_running(), 0);
    });
}

#[test]
fn loom_marker_binds_single_thread() {
    loom::model(|| {
        let engine = engine();
        engine.load_dependency_and_markers(&[], &[PointPair::new("Marker", "Marked")]);
        let calls = Arc::new(AtomicUsize::new(0));
        {
            let calls = calls.clone();
            engine.set_callback("Marked", move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            });
        }

        let other = {
            let engine = engine.clone();
            thread::spawn(move || engine.process_point("Marked"))
        };
        engine.process_point("Marker");
        engine.process_point("Marked");
        other.join().unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    });
}
