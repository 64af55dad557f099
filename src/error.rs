use crate::adapter::AdapterError;
use thiserror::Error as ThisError;

///
/// Error
///
/// Top-level store error. Everything detectable at this layer is raised
/// synchronously before the collaborator is touched; collaborator
/// failures pass through unchanged.
///

#[derive(Debug, ThisError)]
pub enum Error {
    /// Patch cannot address array elements.
    #[error("patch path '{path}' contains an array segment")]
    ArrayPatchPath { path: String },

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// A body column returned by the engine did not decode as JSON.
    #[error("document body is not valid JSON: {0}")]
    BodyDecode(#[from] serde_json::Error),
}
