//! Dossier: a document-query layer over PostgreSQL JSONB tables.
//!
//! Documents are stored as `(id, body)` rows and queried through a small
//! composable filter tree. The tree compiles to a SQL predicate plus the
//! scalar-extraction functions it depends on; those functions are created
//! lazily in the engine and memoized process-wide, which makes nested and
//! array-valued JSON paths indexable and sortable.
//!
//! The crate is a compiler and composer only: storage, transactions, and
//! statement execution live behind the [`adapter::Adapter`] seam.

pub mod adapter;
pub mod database;
pub mod document;
pub mod error;
pub mod filter;
pub mod path;
pub mod sql;
pub mod table;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
///

pub mod prelude {
    pub use crate::{
        adapter::{Adapter, AdapterError, Param},
        database::Database,
        document::{Document, ID_PATH},
        error::Error,
        filter::{Comparator, Filter},
        table::{Patch, Select, SortDirection, Table},
    };
}
