use crate::{
    adapter::Param,
    document::ID_PATH,
    filter::{Comparator, Filter, IsEmptyFilter, MatchFilter},
    path,
    sql::functions::{self, SqlFunction},
};
use std::collections::BTreeSet;

///
/// Translation
///
/// Compiled form of a filter tree: a predicate fragment, its positional
/// parameters, and the extraction functions the fragment depends on.
/// Parameters align with `?` placeholders in left-to-right traversal
/// order.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Translation {
    pub predicate: String,
    pub params: Vec<Param>,
    pub functions: BTreeSet<SqlFunction>,
}

impl Translation {
    fn leaf(predicate: &str) -> Self {
        Self {
            predicate: predicate.to_string(),
            params: Vec::new(),
            functions: BTreeSet::new(),
        }
    }
}

/// Compile a filter tree into a predicate fragment. Total over the
/// filter variants; never mutates the tree.
#[must_use]
pub fn translate(filter: &Filter) -> Translation {
    match filter {
        Filter::True => Translation::leaf("true"),
        Filter::False => Translation::leaf("false"),
        Filter::And(children) => translate_list(children, " AND ", &Translation::leaf("true")),
        Filter::Or(children) => translate_or(children),
        Filter::Match(matcher) => translate_match(matcher),
        Filter::IsEmpty(emptiness) => translate_is_empty(emptiness),
    }
}

/// Join child translations, pruning children equal to the operator's
/// redundant element (`true` for AND, `false` for OR). Zero children
/// left yields the neutral element itself; a single child is returned
/// verbatim, without wrapping parentheses.
fn translate_list(children: &[Filter], separator: &str, neutral: &Translation) -> Translation {
    let mut translated: Vec<Translation> = children
        .iter()
        .map(translate)
        .filter(|child| child != neutral)
        .collect();

    match translated.len() {
        0 => neutral.clone(),
        1 => translated.remove(0),
        _ => {
            let predicate = format!(
                "({})",
                translated
                    .iter()
                    .map(|child| child.predicate.as_str())
                    .collect::<Vec<_>>()
                    .join(separator)
            );

            let mut params = Vec::new();
            let mut required = BTreeSet::new();
            for child in translated {
                params.extend(child.params);
                required.extend(child.functions);
            }

            Translation {
                predicate,
                params,
                functions: required,
            }
        }
    }
}

fn translate_or(children: &[Filter]) -> Translation {
    if let Some(collapsed) = collapse_membership(children) {
        return collapsed;
    }

    translate_list(children, " OR ", &Translation::leaf("false"))
}

/// Collapse `Or(p = v1, p = v2, …)` over one shared non-array path into a
/// single membership predicate carrying the whole value list as one array
/// parameter, positioned where the first disjunct's parameter would have
/// been. Equivalent to the plain disjunction; emitted only when every
/// child qualifies.
fn collapse_membership(children: &[Filter]) -> Option<Translation> {
    if children.len() < 2 {
        return None;
    }

    let mut shared_path: Option<&str> = None;
    let mut values = Vec::with_capacity(children.len());
    for child in children {
        let Filter::Match(matcher) = child else {
            return None;
        };
        if matcher.comparator != Comparator::Eq || path::touches_array(&matcher.path) {
            return None;
        }

        match shared_path {
            None => shared_path = Some(&matcher.path),
            Some(path) if path == matcher.path => {}
            Some(_) => return None,
        }

        values.push(matcher.value.clone());
    }

    let path = shared_path?;
    let params = vec![Param::TextArray(values)];

    if path == ID_PATH {
        return Some(Translation {
            predicate: "id = ANY(CAST(? AS text[]))".to_string(),
            params,
            functions: BTreeSet::new(),
        });
    }

    let function = functions::extraction_function(path);
    let predicate = format!("{}(body) = ANY(CAST(? AS text[]))", function.name);

    Some(Translation {
        predicate,
        params,
        functions: BTreeSet::from([function]),
    })
}

/// Operator token for a comparator. Operand order is flipped (value
/// placeholder on the left) so the same token serves the scalar form and
/// the ANY/ALL quantifier forms.
const fn comparator_token(comparator: Comparator) -> &'static str {
    match comparator {
        Comparator::Eq => "=",
        Comparator::Neq => "!=",
        Comparator::Gt => "<",
        Comparator::Gte => "<=",
        Comparator::Lt => ">",
        Comparator::Lte => ">=",
        Comparator::Like => functions::LIKE_REV_OPERATOR,
        Comparator::Ilike => functions::ILIKE_REV_OPERATOR,
    }
}

fn translate_match(filter: &MatchFilter) -> Translation {
    let token = comparator_token(filter.comparator);
    let params = vec![Param::Text(filter.value.clone())];

    let mut required = BTreeSet::new();
    match filter.comparator {
        Comparator::Like => {
            required.insert(functions::reversed_like_operator());
        }
        Comparator::Ilike => {
            required.insert(functions::reversed_ilike_operator());
        }
        _ => {}
    }

    // The identifier lives in its own column; no extraction needed.
    if filter.path == ID_PATH {
        return Translation {
            predicate: format!("? {token} id"),
            params,
            functions: required,
        };
    }

    let function = functions::extraction_function(&filter.path);
    let predicate = if path::touches_array(&filter.path) {
        if !filter.match_all && filter.comparator == Comparator::Eq {
            // the common "equals one of the array elements" case goes
            // through containment instead of the quantifier form
            format!("CAST(ARRAY[?] AS text[]) <@ {}(body)", function.name)
        } else {
            let quantifier = if filter.match_all { "ALL" } else { "ANY" };
            format!("? {token} {quantifier}({}(body))", function.name)
        }
    } else {
        format!("? {token} {}(body)", function.name)
    };

    required.insert(function);

    Translation {
        predicate,
        params,
        functions: required,
    }
}

fn translate_is_empty(filter: &IsEmptyFilter) -> Translation {
    let function = functions::extraction_function(&filter.path);

    let predicate = if path::touches_array(&filter.path) {
        let operator = if filter.is_empty { "=" } else { "<>" };
        format!("CAST(ARRAY[] AS text[]) {operator} {}(body)", function.name)
    } else {
        let operator = if filter.is_empty { "IS NULL" } else { "IS NOT NULL" };
        format!("{}(body) {operator}", function.name)
    };

    Translation {
        predicate,
        params: Vec::new(),
        functions: BTreeSet::from([function]),
    }
}
