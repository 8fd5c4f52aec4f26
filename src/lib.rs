//! Deterministic thread interleaving for concurrent tests.
//!
//! Code under test is instrumented with named synchronization points. A test
//! harness then drives the interleaving at run time:
//! - Happens-after edges between points make a thread reaching a point block
//!   until every predecessor of that point has been processed.
//! - Marker edges bind a point to the thread that processed the marker; on
//!   every other thread the marked point becomes a no-op.
//! - Callbacks attached to points observe or mutate the call site's state,
//!   e.g. to inject faults or force early returns.
//!
//! Key modules:
//! - `engine`: the [`SyncPoint`](engine::SyncPoint) engine, a monitor over the
//!   dependency graph, the passed points and the callback registry.
//! - `callback`: the callback type and the type-erased arguments it receives.
//! - `config`: construction-time settings, optionally read from the
//!   environment.
//! - `types`: point names and edges.
//!
//! Quick start:
//! 1. Share one [`SyncPoint`](engine::SyncPoint) between the harness and the
//!    code under test.
//! 2. Instrument the code with [`sync_point!`] and friends.
//! 3. In the test, load edges with
//!    [`load_dependency_and_markers`](engine::SyncPoint::load_dependency_and_markers),
//!    register callbacks, then call
//!    [`enable_processing`](engine::SyncPoint::enable_processing).
//!
//! Processing is disabled until enabled, so instrumented code runs untouched
//! otherwise. Building without the `instrument` feature turns the macros into
//! no-ops altogether.

/// Callbacks attached to points and the arguments they receive.
///
/// Arguments are borrowed from the call site for the duration of a single
/// invocation and recovered with runtime type checks.
pub mod callback;
/// Construction-time settings of the engine.
pub mod config;
/// The synchronization point engine.
///
/// Holds the happens-after graph, marker bindings, passed points and callback
/// registry behind a single lock, with callbacks running outside of it.
pub mod engine;
mod macros;
mod sync;
/// Point names and happens-after edges.
pub mod types;
