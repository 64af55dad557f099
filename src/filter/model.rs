use serde::{Deserialize, Serialize};

///
/// Filter AST
///
/// Pure representation of query filters over document paths. This layer
/// carries no SQL knowledge; interpretation happens in `translate`.
///

///
/// Comparator
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Comparator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    Ilike,
}

///
/// MatchFilter
///
/// Compare the value(s) at `path` against a literal. `match_all` is only
/// meaningful when the path touches an array segment: true means every
/// element must satisfy the comparator, false means at least one.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MatchFilter {
    pub path: String,
    pub comparator: Comparator,
    pub value: String,
    pub match_all: bool,
}

///
/// IsEmptyFilter
///
/// Emptiness check: scalar paths test null/absent, array paths test for
/// zero elements.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IsEmptyFilter {
    pub path: String,
    pub is_empty: bool,
}

///
/// Filter
///
/// Closed set of filter variants forming an immutable tree. The
/// translator matches on it exhaustively, so adding a variant is a
/// compile-time obligation to extend translation.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Filter {
    #[default]
    True,
    False,
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Match(MatchFilter),
    IsEmpty(IsEmptyFilter),
}

impl Filter {
    // ─────────────────────────────────────────────
    // CONSTRUCTORS
    // ─────────────────────────────────────────────

    /// Match where at least one value at `path` satisfies the comparator.
    #[must_use]
    pub fn matches(
        path: impl Into<String>,
        comparator: Comparator,
        value: impl ToString,
    ) -> Self {
        Self::Match(MatchFilter {
            path: path.into(),
            comparator,
            value: value.to_string(),
            match_all: false,
        })
    }

    /// Match where every element of an array-valued path satisfies the
    /// comparator.
    #[must_use]
    pub fn matches_all(
        path: impl Into<String>,
        comparator: Comparator,
        value: impl ToString,
    ) -> Self {
        Self::Match(MatchFilter {
            path: path.into(),
            comparator,
            value: value.to_string(),
            match_all: true,
        })
    }

    #[must_use]
    pub fn eq(path: impl Into<String>, value: impl ToString) -> Self {
        Self::matches(path, Comparator::Eq, value)
    }

    #[must_use]
    pub fn neq(path: impl Into<String>, value: impl ToString) -> Self {
        Self::matches(path, Comparator::Neq, value)
    }

    #[must_use]
    pub fn gt(path: impl Into<String>, value: impl ToString) -> Self {
        Self::matches(path, Comparator::Gt, value)
    }

    #[must_use]
    pub fn gte(path: impl Into<String>, value: impl ToString) -> Self {
        Self::matches(path, Comparator::Gte, value)
    }

    #[must_use]
    pub fn lt(path: impl Into<String>, value: impl ToString) -> Self {
        Self::matches(path, Comparator::Lt, value)
    }

    #[must_use]
    pub fn lte(path: impl Into<String>, value: impl ToString) -> Self {
        Self::matches(path, Comparator::Lte, value)
    }

    #[must_use]
    pub fn like(path: impl Into<String>, pattern: impl ToString) -> Self {
        Self::matches(path, Comparator::Like, pattern)
    }

    #[must_use]
    pub fn ilike(path: impl Into<String>, pattern: impl ToString) -> Self {
        Self::matches(path, Comparator::Ilike, pattern)
    }

    /// The value at `path` is null or absent (scalar) or has zero
    /// elements (array).
    #[must_use]
    pub fn is_empty(path: impl Into<String>) -> Self {
        Self::IsEmpty(IsEmptyFilter {
            path: path.into(),
            is_empty: true,
        })
    }

    #[must_use]
    pub fn is_not_empty(path: impl Into<String>) -> Self {
        Self::IsEmpty(IsEmptyFilter {
            path: path.into(),
            is_empty: false,
        })
    }
}
