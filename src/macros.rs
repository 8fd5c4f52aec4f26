//! Call-site macros.
//!
//! Every macro takes the engine first: anything that dereferences to a
//! [`SyncPoint`](crate::engine::SyncPoint) (a `SyncPoint`, a reference or an
//! `Arc`). Point names are anything implementing `AsRef<str>`.
//!
//! Without the `instrument` feature every macro expands to `()` and none of
//! its operands is evaluated, so instrumented code costs nothing.

/// Reach a point without arguments.
#[cfg(feature = "instrument")]
#[macro_export]
macro_rules! sync_point {
    ($engine:expr, $point:expr $(,)?) => {
        $crate::engine::SyncPoint::process_point(&$engine, ::core::convert::AsRef::<str>::as_ref(&$point))
    };
}

/// Reach the point named `point` followed by `index`, e.g. `Worker:3`.
#[cfg(feature = "instrument")]
#[macro_export]
macro_rules! sync_point_idx {
    ($engine:expr, $point:expr, $index:expr $(,)?) => {
        $crate::engine::SyncPoint::process_point(
            &$engine,
            &::std::format!("{}{}", ::core::convert::AsRef::<str>::as_ref(&$point), $index),
        )
    };
}

/// Reach a point, handing `&mut` references to the callback.
///
/// Each argument must evaluate to `&mut T` for some `T: 'static`; the callback
/// sees them in order through [`CallbackArgs`](crate::callback::CallbackArgs).
#[cfg(feature = "instrument")]
#[macro_export]
macro_rules! sync_point_args {
    ($engine:expr, $point:expr, $($arg:expr),+ $(,)?) => {
        $crate::engine::SyncPoint::process(
            &$engine,
            ::core::convert::AsRef::<str>::as_ref(&$point),
            &mut $crate::callback::CallbackArgs::new(::std::vec![
                $($arg as &mut dyn ::core::any::Any),+
            ]),
        )
    };
}

/// Reach a point and return from the enclosing `()` function if the callback
/// sets its `bool` argument 0.
#[cfg(feature = "instrument")]
#[macro_export]
macro_rules! sync_point_return {
    ($engine:expr, $point:expr $(,)?) => {{
        let mut injected = false;
        $crate::sync_point_args!($engine, $point, &mut injected);
        if injected {
            return;
        }
    }};
}

/// Reach a point and return `value` from the enclosing function if the
/// callback sets its `bool` argument 0.
///
/// `value` must be a mutable place of the function's return type; the
/// callback receives it as argument 1 and may overwrite it first.
#[cfg(feature = "instrument")]
#[macro_export]
macro_rules! sync_point_return_value {
    ($engine:expr, $point:expr, $value:expr $(,)?) => {{
        let mut injected = false;
        $crate::sync_point_args!($engine, $point, &mut injected, &mut $value);
        if injected {
            return $value;
        }
    }};
}

/// Reach a point without arguments.
#[cfg(not(feature = "instrument"))]
#[macro_export]
macro_rules! sync_point {
    ($($tt:tt)*) => {
        ()
    };
}

/// Reach the point named `point` followed by `index`, e.g. `Worker:3`.
#[cfg(not(feature = "instrument"))]
#[macro_export]
macro_rules! sync_point_idx {
    ($($tt:tt)*) => {
        ()
    };
}

/// Reach a point, handing `&mut` references to the callback.
#[cfg(not(feature = "instrument"))]
#[macro_export]
macro_rules! sync_point_args {
    ($($tt:tt)*) => {
        ()
    };
}

/// Reach a point and return from the enclosing `()` function if the callback
/// sets its `bool` argument 0.
#[cfg(not(feature = "instrument"))]
#[macro_export]
macro_rules! sync_point_return {
    ($($tt:tt)*) => {
        ()
    };
}

/// Reach a point and return `value` from the enclosing function if the
/// callback sets its `bool` argument 0.
#[cfg(not(feature = "instrument"))]
#[macro_export]
macro_rules! sync_point_return_value {
    ($($tt:tt)*) => {
        ()
    };
}
