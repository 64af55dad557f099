//! Shared fixtures for in-crate tests.

use crate::{
    adapter::{Adapter, AdapterError, Param, Row},
    document::Document,
};
use serde_json::Value;
use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

/// Build a document from a `json!` object literal.
pub fn document(value: Value) -> Document {
    Document::new(value.as_object().cloned().expect("object body"))
}

///
/// RecordingAdapter
///
/// Scripted execution collaborator: records every statement and hands
/// back queued responses. Catalog probes for function existence are
/// answered from a flag instead of the queue so tests can script result
/// rows without counting probes.
///

#[derive(Debug, Default)]
pub struct RecordingAdapter {
    statements: Mutex<Vec<(String, Vec<Param>)>>,
    query_results: Mutex<VecDeque<Vec<Row>>>,
    update_results: Mutex<VecDeque<u64>>,
    functions_exist: AtomicBool,
}

impl RecordingAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every catalog probe as if the function already exists.
    pub fn set_functions_exist(&self, exist: bool) {
        self.functions_exist.store(exist, Ordering::Relaxed);
    }

    pub fn queue_rows(&self, rows: Vec<Row>) {
        self.query_results.lock().unwrap().push_back(rows);
    }

    pub fn queue_count(&self, count: u64) {
        self.update_results.lock().unwrap().push_back(count);
    }

    /// Statements in execution order.
    pub fn executed(&self) -> Vec<String> {
        self.statements
            .lock()
            .unwrap()
            .iter()
            .map(|(sql, _)| sql.clone())
            .collect()
    }

    /// Statements with their bound parameters, in execution order.
    pub fn recorded(&self) -> Vec<(String, Vec<Param>)> {
        self.statements.lock().unwrap().clone()
    }
}

impl Adapter for RecordingAdapter {
    fn execute_update(&self, sql: &str, params: &[Param]) -> Result<u64, AdapterError> {
        self.statements
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));

        // Function-management DDL is answered outside the queue, like
        // the catalog probes, so scripted counts line up with the
        // statements the test actually cares about.
        if sql.starts_with("CREATE OR REPLACE FUNCTION") || sql.starts_with("DO $do$") {
            return Ok(0);
        }

        Ok(self.update_results.lock().unwrap().pop_front().unwrap_or(0))
    }

    fn execute_query(&self, sql: &str, params: &[Param]) -> Result<Vec<Row>, AdapterError> {
        self.statements
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));

        if sql.starts_with("SELECT 1 FROM pg_proc") {
            if self.functions_exist.load(Ordering::Relaxed) {
                return Ok(vec![vec!["1".to_string()]]);
            }

            return Ok(Vec::new());
        }

        Ok(self.query_results.lock().unwrap().pop_front().unwrap_or_default())
    }
}
