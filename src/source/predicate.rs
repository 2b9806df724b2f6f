//! Query predicates for the document search endpoint

use std::fmt;

/// A single search predicate, rendered in the API's `[op(path, value)]` syntax
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `path` equals `value`
    At { path: String, value: String },
    /// `path` equals any of `values`
    Any { path: String, values: Vec<String> },
}

impl Predicate {
    pub fn at(path: &str, value: &str) -> Self {
        Predicate::At {
            path: path.to_string(),
            value: value.to_string(),
        }
    }

    pub fn any(path: &str, values: &[&str]) -> Self {
        Predicate::Any {
            path: path.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::At { path, value } => write!(f, "[at({}, {})]", path, quote(value)),
            Predicate::Any { path, values } => {
                let values: Vec<String> = values.iter().map(|v| quote(v)).collect();
                write!(f, "[any({}, [{}])]", path, values.join(", "))
            }
        }
    }
}

/// A listing query: predicates plus page size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub predicates: Vec<Predicate>,
    pub page_size: u32,
}

impl Query {
    /// Documents whose `document.type` is `doc_type`
    pub fn documents_of_type(doc_type: &str, page_size: u32) -> Self {
        Self {
            predicates: vec![Predicate::at("document.type", doc_type)],
            page_size: page_size.max(1),
        }
    }

    /// Restrict the query to documents carrying any of `tags`
    pub fn with_tags(mut self, tags: &[String]) -> Self {
        if !tags.is_empty() {
            let tags: Vec<&str> = tags.iter().map(String::as_str).collect();
            self.predicates.push(Predicate::any("document.tags", &tags));
        }
        self
    }

    /// The `q` parameter value
    pub fn q(&self) -> String {
        let parts: Vec<String> = self.predicates.iter().map(|p| p.to_string()).collect();
        format!("[{}]", parts.concat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_query() {
        let query = Query::documents_of_type("posts", 1);
        assert_eq!(query.q(), r#"[[at(document.type, "posts")]]"#);
        assert_eq!(query.page_size, 1);
    }

    #[test]
    fn test_page_size_is_at_least_one() {
        assert_eq!(Query::documents_of_type("posts", 0).page_size, 1);
    }

    #[test]
    fn test_tag_filter() {
        let query = Query::documents_of_type("posts", 5)
            .with_tags(&["react".to_string(), "hooks".to_string()]);
        assert_eq!(
            query.q(),
            r#"[[at(document.type, "posts")][any(document.tags, ["react", "hooks"])]]"#
        );

        let untagged = Query::documents_of_type("posts", 5).with_tags(&[]);
        assert_eq!(untagged, Query::documents_of_type("posts", 5));
    }

    #[test]
    fn test_any_predicate_and_quoting() {
        let p = Predicate::any("document.tags", &["rust", "say \"hi\""]);
        assert_eq!(
            p.to_string(),
            r#"[any(document.tags, ["rust", "say \"hi\""])]"#
        );
    }
}
