//! Extraction function definitions.
//!
//! Every queryable path gets a persisted SQL function mapping a `jsonb`
//! body to the `text` scalar (no array segment on the path) or `text[]`
//! fan-out (any array segment) at that path. Names are a pure function
//! of the path, which is what makes reuse and caching possible.

use crate::path::{self, ARRAY_MARKER};

/// Prefix shared by every generated definition.
pub const FUNCTION_PREFIX: &str = "dossier_fn_";

/// Reversed pattern-match operators: pattern on the left, subject on the
/// right, so pattern comparators keep the same flipped operand order as
/// everything else and compose with ANY/ALL.
pub const LIKE_REV_OPERATOR: &str = "~~~";
pub const ILIKE_REV_OPERATOR: &str = "~~~*";

///
/// SqlFunction
///
/// A persisted engine-side definition: a stable name plus the DDL that
/// creates it. The DDL is idempotent, so racing creators converge on the
/// same definition. Ordered by name so required-function sets stay
/// deterministic.
///

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct SqlFunction {
    pub name: String,
    pub sql: String,
}

/// Deterministic function name for a path: same path, same name, forever.
/// Dots map to `_`, array markers to `$`, lower-cased behind the fixed
/// prefix.
#[must_use]
pub fn function_name(path: &str) -> String {
    let normalized = path
        .replace('.', "_")
        .replace(ARRAY_MARKER, "$")
        .to_lowercase();

    format!("{FUNCTION_PREFIX}{normalized}")
}

/// Build the extraction function for a path by folding its elements left
/// to right, starting from the document body: plain elements narrow into
/// the key, array elements fan out over each element from there on.
#[must_use]
pub fn extraction_function(path: &str) -> SqlFunction {
    let name = function_name(path);
    let elements = path::split_to_elements(path);
    let last = elements.len() - 1;

    let mut expr = "body".to_string();
    for (index, element) in elements.iter().enumerate() {
        let is_last = index == last;
        expr = jsonb_extract_path(&expr, &element.name, is_last && !element.is_array);
        if element.is_array {
            expr = jsonb_array_elements(&expr, is_last);
        }
    }

    let sql = if elements.iter().any(|element| element.is_array) {
        format!(
            "CREATE OR REPLACE FUNCTION {name}(body jsonb) RETURNS text[] AS \
             $$ SELECT ARRAY(SELECT {expr}) $$ LANGUAGE SQL IMMUTABLE;"
        )
    } else {
        format!(
            "CREATE OR REPLACE FUNCTION {name}(body jsonb) RETURNS text AS \
             $$ SELECT {expr} $$ LANGUAGE SQL IMMUTABLE;"
        )
    };

    SqlFunction { name, sql }
}

fn jsonb_extract_path(json: &str, key: &str, as_text: bool) -> String {
    let text = if as_text { "_text" } else { "" };

    format!("jsonb_extract_path{text}({json}, '{key}')")
}

fn jsonb_array_elements(json: &str, as_text: bool) -> String {
    let text = if as_text { "_text" } else { "" };

    format!("jsonb_array_elements{text}({json})")
}

/// Support bundle for the reversed LIKE operator.
#[must_use]
pub fn reversed_like_operator() -> SqlFunction {
    reversed_pattern_operator("dossier_fn_like_rev", LIKE_REV_OPERATOR, "LIKE")
}

/// Support bundle for the reversed ILIKE operator.
#[must_use]
pub fn reversed_ilike_operator() -> SqlFunction {
    reversed_pattern_operator("dossier_fn_ilike_rev", ILIKE_REV_OPERATOR, "ILIKE")
}

// A single DO block keeps creation one idempotent statement; the
// existence probe keys on the helper function name like any other
// SqlFunction.
fn reversed_pattern_operator(name: &str, operator: &str, keyword: &str) -> SqlFunction {
    let sql = format!(
        "DO $do$ BEGIN \
         IF NOT EXISTS (SELECT 1 FROM pg_proc WHERE proname = '{name}') THEN \
         CREATE FUNCTION {name}(pattern text, subject text) RETURNS boolean AS \
         'SELECT $2 {keyword} $1' LANGUAGE SQL IMMUTABLE; \
         CREATE OPERATOR {operator} (LEFTARG = text, RIGHTARG = text, FUNCTION = {name}); \
         END IF; \
         END $do$;"
    );

    SqlFunction {
        name: name.to_string(),
        sql,
    }
}

///
/// TESTS
///
