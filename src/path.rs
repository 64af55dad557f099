//! Path compiler.
//!
//! A path addresses a location inside a document body: dot-separated
//! segment names, where a `[]` suffix marks a segment as array-valued
//! ("this level is an array, apply the remainder to each element").

/// Suffix marking a path segment as array-valued.
pub const ARRAY_MARKER: &str = "[]";

///
/// PathElement
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PathElement {
    pub name: String,
    pub is_array: bool,
}

/// Split a dotted path into its elements, stripping array markers.
///
/// Any string is a valid path; empty segments pass through literally.
#[must_use]
pub fn split_to_elements(path: &str) -> Vec<PathElement> {
    path.split('.')
        .map(|segment| match segment.strip_suffix(ARRAY_MARKER) {
            Some(name) => PathElement {
                name: name.to_string(),
                is_array: true,
            },
            None => PathElement {
                name: segment.to_string(),
                is_array: false,
            },
        })
        .collect()
}

/// Whether any segment of the path is array-valued.
#[must_use]
pub fn touches_array(path: &str) -> bool {
    split_to_elements(path).iter().any(|element| element.is_array)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str, is_array: bool) -> PathElement {
        PathElement {
            name: name.to_string(),
            is_array,
        }
    }

    #[test]
    fn splits_plain_segments() {
        assert_eq!(
            split_to_elements("color.animal.leg"),
            vec![
                element("color", false),
                element("animal", false),
                element("leg", false),
            ]
        );
    }

    #[test]
    fn strips_array_markers() {
        assert_eq!(
            split_to_elements("animals[].organs[]"),
            vec![element("animals", true), element("organs", true)]
        );
        assert_eq!(
            split_to_elements("a.b[].c"),
            vec![element("a", false), element("b", true), element("c", false)]
        );
    }

    #[test]
    fn empty_segments_pass_through() {
        assert_eq!(split_to_elements(""), vec![element("", false)]);
        assert_eq!(
            split_to_elements("a..b"),
            vec![element("a", false), element("", false), element("b", false)]
        );
    }

    #[test]
    fn marker_is_only_recognized_as_suffix() {
        assert_eq!(split_to_elements("a[]b"), vec![element("a[]b", false)]);
    }

    #[test]
    fn touches_array_checks_every_segment() {
        assert!(touches_array("a.b[].c"));
        assert!(touches_array("a[]"));
        assert!(!touches_array("a.b.c"));
    }
}
