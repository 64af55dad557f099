use thiserror::Error as ThisError;

///
/// Adapter
///
/// Execution collaborator: the driver seam through which every generated
/// statement leaves this crate. Statements use `?` positional
/// placeholders; parameters are supplied in placeholder order.
///
/// Failures raised here (connectivity, constraint violations, malformed
/// statements) propagate to the caller unchanged; this layer adds no
/// retry or recovery.
///

pub trait Adapter: Send + Sync {
    /// Execute a statement and return the affected-row count.
    fn execute_update(&self, sql: &str, params: &[Param]) -> Result<u64, AdapterError>;

    /// Execute a statement and return its result rows.
    fn execute_query(&self, sql: &str, params: &[Param]) -> Result<Vec<Row>, AdapterError>;
}

/// One result row, columns in select-list order.
pub type Row = Vec<String>;

///
/// Param
///
/// A positional statement parameter. Everything binds as text; the array
/// variant backs the collapsed membership predicate, which passes a whole
/// value list as one parameter.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Param {
    Text(String),
    TextArray(Vec<String>),
}

///
/// AdapterError
///
/// Failure raised by the execution collaborator.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct AdapterError {
    pub message: String,
}

impl AdapterError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
