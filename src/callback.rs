use core::any::{Any, type_name};
use std::sync::Arc;
use thiserror::Error;

/// A callback attached to a synchronization point.
///
/// Runs on the thread that reached the point, after all of the point's
/// predecessors have passed, with the engine lock released. It may call back
/// into the engine for other points.
pub type Callback = Arc<dyn Fn(&mut CallbackArgs<'_>) + Send + Sync>;

/// Error returned when a callback reads an argument it was not given.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ArgError {
    /// The call site supplied fewer arguments.
    #[error("argument {index} requested but only {len} supplied")]
    OutOfRange {
        /// Requested position.
        index: usize,
        /// Number of supplied arguments.
        len: usize,
    },
    /// The argument at `index` has a different type.
    #[error("argument {index} is not a `{expected}`")]
    TypeMismatch {
        /// Requested position.
        index: usize,
        /// Type the callback asked for.
        expected: &'static str,
    },
}

/// Caller-owned state handed to a callback.
///
/// The engine only forwards these borrows for the duration of one synchronous
/// callback invocation; it never copies or keeps them. Callbacks recover the
/// concrete types with [`CallbackArgs::get`] and [`CallbackArgs::get_mut`].
#[derive(Default)]
pub struct CallbackArgs<'a> {
    args: Vec<&'a mut dyn Any>,
}

impl<'a> CallbackArgs<'a> {
    /// No arguments.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap an ordered list of borrowed arguments.
    #[must_use]
    pub fn new(args: Vec<&'a mut dyn Any>) -> Self {
        Self { args }
    }

    /// Append one more argument.
    #[must_use]
    pub fn with(mut self, arg: &'a mut dyn Any) -> Self {
        self.args.push(arg);
        self
    }

    /// Number of arguments supplied by the call site.
    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Whether the call site supplied no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Shared access to argument `index` as a `T`.
    ///
    /// # Errors
    /// [`ArgError::OutOfRange`] if there is no such argument,
    /// [`ArgError::TypeMismatch`] if it is not a `T`.
    pub fn get<T: Any>(&self, index: usize) -> Result<&T, ArgError> {
        let len = self.args.len();
        let arg = self
            .args
            .get(index)
            .ok_or(ArgError::OutOfRange { index, len })?;
        arg.downcast_ref::<T>().ok_or(ArgError::TypeMismatch {
            index,
            expected: type_name::<T>(),
        })
    }

    /// Exclusive access to argument `index` as a `T`.
    ///
    /// # Errors
    /// Same as [`CallbackArgs::get`].
    pub fn get_mut<T: Any>(&mut self, index: usize) -> Result<&mut T, ArgError> {
        let len = self.args.len();
        let arg = self
            .args
            .get_mut(index)
            .ok_or(ArgError::OutOfRange { index, len })?;
        arg.downcast_mut::<T>().ok_or(ArgError::TypeMismatch {
            index,
            expected: type_name::<T>(),
        })
    }
}

impl core::fmt::Debug for CallbackArgs<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CallbackArgs")
            .field("len", &self.args.len())
            .finish_non_exhaustive()
    }
}

impl<'a> FromIterator<&'a mut dyn Any> for CallbackArgs<'a> {
    fn from_iter<I: IntoIterator<Item = &'a mut dyn Any>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_access() {
        let mut num = 1234_i32;
        let mut text = String::from("Hello");
        {
            let mut args = CallbackArgs::empty().with(&mut num).with(&mut text);
            assert_eq!(args.len(), 2);
            assert_eq!(*args.get::<i32>(0).unwrap(), 1234);
            *args.get_mut::<i32>(0).unwrap() = 10086;
            args.get_mut::<String>(1).unwrap().replace_range(.., "World");
        }
        assert_eq!(num, 10086);
        assert_eq!(text, "World");
    }

    #[test]
    fn wrong_type_or_position() {
        let mut flag = false;
        let mut args = CallbackArgs::empty().with(&mut flag);
        assert_eq!(
            args.get::<i32>(0).unwrap_err(),
            ArgError::TypeMismatch {
                index: 0,
                expected: "i32"
            }
        );
        assert_eq!(
            args.get_mut::<bool>(3).unwrap_err(),
            ArgError::OutOfRange { index: 3, len: 1 }
        );
        assert!(CallbackArgs::empty().is_empty());
    }
}
