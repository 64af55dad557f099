//! Function-existence registry.
//!
//! Extraction functions are created lazily on first use and persist in
//! the engine for the schema's lifetime. A process-wide cache remembers
//! which names have been settled so each one costs at most one catalog
//! probe per process.

use crate::{
    adapter::{Adapter, AdapterError, Param},
    sql::functions::SqlFunction,
};
use log::debug;
use std::{
    collections::HashSet,
    sync::{Arc, LazyLock, Mutex},
};

/// Catalog probe for a function name; one row when present.
const FUNCTION_EXISTS_SQL: &str = "SELECT 1 FROM pg_proc WHERE proname = ?";

///
/// SHARED_CACHE is lazily initiated with a Mutex; one per process, shared
/// by every database handle that does not bring its own.
///

static SHARED_CACHE: LazyLock<Arc<FunctionCache>> =
    LazyLock::new(|| Arc::new(FunctionCache::new()));

///
/// FunctionCache
///
/// Process-wide memo of extraction functions known to exist in the
/// engine. Additive-only, unbounded, never invalidated: a name recorded
/// present is never re-checked by this process. If a function is dropped
/// out-of-band the cache goes stale; that is an operational concern
/// outside this layer.
///

#[derive(Debug, Default)]
pub struct FunctionCache {
    created: Mutex<HashSet<String>>,
}

impl FunctionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache shared by every database handle in this process.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::clone(&SHARED_CACHE)
    }

    fn contains(&self, name: &str) -> bool {
        self.created
            .lock()
            .expect("function cache mutex poisoned")
            .contains(name)
    }

    fn mark_created(&self, name: &str) {
        self.created
            .lock()
            .expect("function cache mutex poisoned")
            .insert(name.to_string());
    }
}

/// Make every listed function exist in the engine, creating the missing
/// ones. Cache hits skip the catalog probe entirely; both the probe-hit
/// branch and the create branch mark the cache, so each name is settled
/// at most once per process. The probe and the insert are not atomic —
/// the cache is best-effort memoization, not a lock — and racing cold
/// processes converge because the DDL itself is idempotent.
pub fn ensure_exists<'a>(
    adapter: &dyn Adapter,
    cache: &FunctionCache,
    functions: impl IntoIterator<Item = &'a SqlFunction>,
) -> Result<(), AdapterError> {
    for function in functions {
        if cache.contains(&function.name) {
            continue;
        }

        let present = !adapter
            .execute_query(FUNCTION_EXISTS_SQL, &[Param::Text(function.name.clone())])?
            .is_empty();

        if !present {
            debug!("creating extraction function {}", function.name);
            adapter.execute_update(&function.sql, &[])?;
        }

        cache.mark_created(&function.name);
    }

    Ok(())
}

///
/// TESTS
///
