use derive_more::{Deref, Display};
use indexmap::{IndexMap as _IndexMap, IndexSet as _IndexSet};
use rustc_hash::FxBuildHasher;
use std::{
    borrow::Borrow,
    collections::{HashMap as _HashMap, HashSet as _HashSet},
    sync::Arc,
};

/// Name of a synchronization point.
///
/// Names carry no structure: two points are the same point iff their names are
/// equal byte for byte. Cloning is cheap, the string is shared.
#[derive(Debug, Display, Deref, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("{_0}")]
pub struct PointName(Arc<str>);

impl PointName {
    /// Create a point name from anything string-like.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PointName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for PointName {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&String> for PointName {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl Borrow<str> for PointName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A happens-after edge between two points.
///
/// `successor` may not pass until `predecessor` has been processed at least
/// once since the graph was last loaded. When used as a marker, the successor
/// is additionally bound to the thread that processed the predecessor.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash)]
#[display("{predecessor} -> {successor}")]
pub struct PointPair {
    /// Point that must be processed first.
    pub predecessor: PointName,
    /// Point that waits for `predecessor`.
    pub successor: PointName,
}

impl PointPair {
    /// Build an edge `predecessor -> successor`.
    pub fn new(predecessor: impl Into<PointName>, successor: impl Into<PointName>) -> Self {
        Self {
            predecessor: predecessor.into(),
            successor: successor.into(),
        }
    }
}

impl<P: Into<PointName>, S: Into<PointName>> From<(P, S)> for PointPair {
    fn from((predecessor, successor): (P, S)) -> Self {
        Self::new(predecessor, successor)
    }
}

pub(crate) type HashMap<K, V> = _HashMap<K, V, FxBuildHasher>;
pub(crate) type HashSet<T> = _HashSet<T, FxBuildHasher>;
pub(crate) type IndexMap<K, V> = _IndexMap<K, V, FxBuildHasher>;
pub(crate) type IndexSet<T> = _IndexSet<T, FxBuildHasher>;
