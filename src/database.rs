use crate::{adapter::Adapter, sql::registry::FunctionCache, table::Table};
use std::{fmt, sync::Arc};

///
/// Database
///
/// Handle pairing an execution collaborator with the function-existence
/// cache. Cheap to clone; every table created from it shares both.
///

#[derive(Clone)]
pub struct Database {
    adapter: Arc<dyn Adapter>,
    cache: Arc<FunctionCache>,
}

impl Database {
    /// Wrap an adapter, sharing the process-wide function cache.
    #[must_use]
    pub fn new(adapter: Arc<dyn Adapter>) -> Self {
        Self {
            adapter,
            cache: FunctionCache::shared(),
        }
    }

    /// Wrap an adapter with an explicit cache. Useful when cache
    /// lifetime must not span the process, e.g. in tests.
    #[must_use]
    pub fn with_function_cache(adapter: Arc<dyn Adapter>, cache: Arc<FunctionCache>) -> Self {
        Self { adapter, cache }
    }

    /// Table handle; no statement is issued until an operation runs.
    #[must_use]
    pub fn table(&self, name: impl Into<String>) -> Table {
        Table::new(name.into(), self.clone())
    }

    pub(crate) fn adapter(&self) -> &dyn Adapter {
        self.adapter.as_ref()
    }

    pub(crate) fn cache(&self) -> &FunctionCache {
        &self.cache
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}
