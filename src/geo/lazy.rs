//! Populate-once storage for lazy relations.

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::error::Result;

/// A relation resolved on first access and then fixed for the owner's lifetime.
///
/// Concurrent first accesses run the loader once; the others block until it ends.
/// A failed load leaves the cell empty so the next access tries again.
#[derive(Clone)]
pub(crate) struct Memo<T> {
    cell: OnceCell<T>,
}

impl<T> Memo<T> {
    pub(crate) fn new() -> Self {
        Self { cell: OnceCell::new() }
    }

    pub(crate) fn preloaded(value: T) -> Self {
        Self {
            cell: OnceCell::with_value(value),
        }
    }

    pub(crate) fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub(crate) fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    pub(crate) fn get_or_load<F>(&self, relation: &'static str, load: F) -> Result<&T>
    where
        F: FnOnce() -> Result<T>,
    {
        self.cell.get_or_try_init(|| {
            debug!(relation, "populating lazy relation");
            load()
        })
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}
