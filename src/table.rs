use crate::{
    adapter::{AdapterError, Param, Row},
    database::Database,
    document::{Document, ID_PATH},
    error::Error,
    filter::{Filter, Translation, translate},
    path,
    sql::{
        functions::{self, SqlFunction},
        registry,
    },
};
use log::debug;
use serde::{Deserialize, Serialize};

///
/// SortDirection
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    const fn sql_token(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

///
/// Select
///
/// Options for a select. Defaults: always-true filter, unbounded
/// (`limit == 0`), no sort keys. Sort keys resolve through the same
/// extraction functions as filters, so any queryable path is sortable.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Select {
    pub filter: Filter,
    pub limit: u64,
    pub order_by: Vec<(String, SortDirection)>,
}

impl Select {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn order_by(mut self, path: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by.push((path.into(), direction));
        self
    }
}

///
/// Patch
///
/// Partial update: merge `new_json` at `path` inside the body of every
/// matching row, creating intermediate containers when `create_missing`
/// is set. Paths with array segments are rejected — patching into array
/// elements is unsupported.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Patch {
    pub filter: Filter,
    pub path: String,
    pub new_json: String,
    pub create_missing: bool,
}

impl Patch {
    #[must_use]
    pub fn new(path: impl Into<String>, new_json: impl Into<String>) -> Self {
        Self {
            filter: Filter::True,
            path: path.into(),
            new_json: new_json.into(),
            create_missing: true,
        }
    }

    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub const fn create_missing(mut self, create_missing: bool) -> Self {
        self.create_missing = create_missing;
        self
    }
}

///
/// Table
///
/// Consumer-facing surface over one `(id, body)` table. Stateless beyond
/// the shared function cache; safe to call from multiple threads. Every
/// operation is a single statement — transactional semantics belong to
/// the collaborator and the caller.
///

#[derive(Clone, Debug)]
pub struct Table {
    name: String,
    database: Database,
}

impl Table {
    pub(crate) const fn new(name: String, database: Database) -> Self {
        Self { name, database }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn ensure_functions<'a>(
        &self,
        functions: impl IntoIterator<Item = &'a SqlFunction>,
    ) -> Result<(), AdapterError> {
        registry::ensure_exists(self.database.adapter(), self.database.cache(), functions)
    }

    // ─────────────────────────────────────────────
    // SCHEMA
    // ─────────────────────────────────────────────

    /// Create the backing table if it does not exist.
    pub fn create(&self) -> Result<(), Error> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" (id VARCHAR(255) PRIMARY KEY, body JSONB NOT NULL)",
            self.name
        );
        self.database.adapter().execute_update(&sql, &[])?;

        Ok(())
    }

    /// Drop the backing table if it exists.
    pub fn drop(&self) -> Result<(), Error> {
        let sql = format!("DROP TABLE IF EXISTS \"{}\"", self.name);
        self.database.adapter().execute_update(&sql, &[])?;

        Ok(())
    }

    /// Composite expression index over the given paths. Uses GIN whenever
    /// any path is array-valued so containment lookups can be served;
    /// plain btree otherwise.
    pub fn create_index(&self, paths: &[&str]) -> Result<(), Error> {
        let extractors: Vec<SqlFunction> = paths
            .iter()
            .map(|p| functions::extraction_function(p))
            .collect();
        self.ensure_functions(&extractors)?;

        let index_name = format!(
            "{}_idx",
            extractors
                .iter()
                .map(|f| f.name.trim_start_matches(functions::FUNCTION_PREFIX))
                .collect::<Vec<_>>()
                .join("_")
        );
        let columns = extractors
            .iter()
            .map(|f| format!("({}(body))", f.name))
            .collect::<Vec<_>>()
            .join(", ");
        let using = if paths.iter().any(|p| path::touches_array(p)) {
            " USING GIN"
        } else {
            ""
        };

        let sql = format!(
            "CREATE INDEX IF NOT EXISTS \"{index_name}\" ON \"{}\"{using} ({columns})",
            self.name
        );
        debug!("creating index {index_name} on {}", self.name);
        self.database.adapter().execute_update(&sql, &[])?;

        Ok(())
    }

    // ─────────────────────────────────────────────
    // WRITES
    // ─────────────────────────────────────────────

    /// Insert documents in one multi-row statement. Empty input is a
    /// no-op.
    pub fn insert(&self, documents: &[Document]) -> Result<(), Error> {
        if documents.is_empty() {
            return Ok(());
        }

        let values = documents
            .iter()
            .map(|_| "(?, CAST(? AS JSONB))")
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("INSERT INTO \"{}\" (id, body) VALUES {values}", self.name);

        let mut params = Vec::with_capacity(documents.len() * 2);
        for document in documents {
            params.push(Param::Text(document.id().to_string()));
            params.push(Param::Text(document.body_json()?));
        }

        self.database.adapter().execute_update(&sql, &params)?;

        Ok(())
    }

    /// Replace the stored body for `document.id()`. Returns whether
    /// exactly one row changed.
    pub fn replace(&self, document: &Document) -> Result<bool, Error> {
        self.replace_where(document, Filter::True)
    }

    /// Replace guarded by a filter over the previously observed state —
    /// the optimistic-concurrency primitive. `false` means the guard did
    /// not hold and nothing was written (someone else changed the row
    /// first, or the id is gone).
    pub fn replace_where(&self, document: &Document, filter: Filter) -> Result<bool, Error> {
        let guard = Filter::And(vec![Filter::eq(ID_PATH, document.id()), filter]);
        let translation = translate(&guard);
        self.ensure_functions(&translation.functions)?;

        let sql = format!(
            "UPDATE \"{}\" SET body = CAST(? AS JSONB) WHERE {}",
            self.name, translation.predicate
        );
        let mut params = vec![Param::Text(document.body_json()?)];
        params.extend(translation.params);

        Ok(self.database.adapter().execute_update(&sql, &params)? == 1)
    }

    /// Merge-patch every matching row; returns the affected-row count.
    /// Fails fast, before any statement is generated, if the path
    /// addresses array elements.
    pub fn patch(&self, patch: &Patch) -> Result<u64, Error> {
        if path::touches_array(&patch.path) {
            return Err(Error::ArrayPatchPath {
                path: patch.path.clone(),
            });
        }

        let translation = translate(&patch.filter);
        self.ensure_functions(&translation.functions)?;

        let target = path::split_to_elements(&patch.path)
            .iter()
            .map(|element| element.name.clone())
            .collect::<Vec<_>>()
            .join(",");
        let sql = format!(
            "UPDATE \"{}\" SET body = jsonb_set(body, '{{{target}}}', CAST(? AS JSONB), {}) WHERE {}",
            self.name, patch.create_missing, translation.predicate
        );
        let mut params = vec![Param::Text(patch.new_json.clone())];
        params.extend(translation.params);

        Ok(self.database.adapter().execute_update(&sql, &params)?)
    }

    /// Delete every row.
    pub fn delete(&self) -> Result<u64, Error> {
        self.delete_where(Filter::True)
    }

    /// Delete matching rows; returns the affected-row count.
    pub fn delete_where(&self, filter: Filter) -> Result<u64, Error> {
        let translation = translate(&filter);
        self.ensure_functions(&translation.functions)?;

        let sql = format!("DELETE FROM \"{}\" WHERE {}", self.name, translation.predicate);

        Ok(self
            .database
            .adapter()
            .execute_update(&sql, &translation.params)?)
    }

    /// Sugar for a delete over an id disjunction; two or more ids
    /// collapse into a single membership predicate. Empty input is a
    /// no-op.
    pub fn delete_by_id<I, S>(&self, ids: I) -> Result<u64, Error>
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let children: Vec<Filter> = ids
            .into_iter()
            .map(|id| Filter::eq(ID_PATH, id))
            .collect();
        if children.is_empty() {
            return Ok(0);
        }

        self.delete_where(Filter::Or(children))
    }

    // ─────────────────────────────────────────────
    // READS
    // ─────────────────────────────────────────────

    /// Fetch one document by id; `None` when absent.
    pub fn select_one_by_id(&self, id: &str) -> Result<Option<Document>, Error> {
        let sql = format!(
            "SELECT CAST(body AS TEXT) FROM \"{}\" WHERE id = ?",
            self.name
        );
        let rows = self
            .database
            .adapter()
            .execute_query(&sql, &[Param::Text(id.to_string())])?;

        match rows.first().and_then(|row| row.first()) {
            Some(body) => Ok(Some(Document::from_row(id.to_string(), body)?)),
            None => Ok(None),
        }
    }

    /// All rows, unfiltered and unordered.
    pub fn select_all(&self) -> Result<Vec<Document>, Error> {
        self.select(&Select::new())
    }

    /// Filtered, optionally sorted and capped select.
    pub fn select(&self, select: &Select) -> Result<Vec<Document>, Error> {
        let translation: Translation = translate(&select.filter);

        let mut required = translation.functions.clone();
        let mut order_expressions = Vec::with_capacity(select.order_by.len());
        for (order_path, direction) in &select.order_by {
            let function = functions::extraction_function(order_path);
            order_expressions.push(format!("{}(body) {}", function.name, direction.sql_token()));
            required.insert(function);
        }

        self.ensure_functions(&required)?;

        let mut sql = format!(
            "SELECT id, CAST(body AS TEXT) FROM \"{}\" WHERE {}",
            self.name, translation.predicate
        );
        if !order_expressions.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&order_expressions.join(", "));
        }
        if select.limit > 0 {
            sql.push_str(&format!(" LIMIT {}", select.limit));
        }

        let rows = self
            .database
            .adapter()
            .execute_query(&sql, &translation.params)?;

        rows.iter().map(document_from_row).collect()
    }
}

fn document_from_row(row: &Row) -> Result<Document, Error> {
    let (Some(id), Some(body)) = (row.first(), row.get(1)) else {
        return Err(Error::Adapter(AdapterError::new(
            "select returned a row without id and body columns",
        )));
    };

    Ok(Document::from_row(id.clone(), body)?)
}

///
/// TESTS
///
