//! Endpoints whose generated code does not follow the general rules.
//!
//! Every special case lives in [`EXCEPTIONS`] with the reason it exists, so
//! the general resolvers stay free of per-endpoint branches.

use crate::method::{CallerInput, HttpMethod, MethodSelection};
use crate::path_template::PathTemplate;
use crate::selection::{PathBranch, PathSelection};

/// What an exception overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionKind {
    /// The path selection is fixed instead of derived from the alternatives.
    FixedPaths,
    /// PUT when an identifier is supplied, POST otherwise.
    MethodById,
    /// POST when a body is supplied, GET otherwise.
    MethodByBody,
    /// The required-argument set is always empty.
    NoRequiredParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointException {
    pub endpoint: &'static str,
    pub kind: ExceptionKind,
    pub rationale: &'static str,
}

pub const EXCEPTIONS: &[EndpointException] = &[
    EndpointException {
        endpoint: "termvectors",
        kind: ExceptionKind::FixedPaths,
        rationale: "older endpoint files still declare the deprecated `{type}` routes next to \
                    the typeless ones; the selection is pinned to the typeless routes so a \
                    document type never becomes a branch",
    },
    EndpointException {
        endpoint: "index",
        kind: ExceptionKind::MethodById,
        rationale: "indexing with an explicit id is an idempotent PUT, without one the server \
                    assigns the id and the request must be a POST",
    },
    EndpointException {
        endpoint: "count",
        kind: ExceptionKind::MethodByBody,
        rationale: "a query body cannot be sent with GET by every client, so a body switches \
                    the request to POST",
    },
    EndpointException {
        endpoint: "tasks.get",
        kind: ExceptionKind::NoRequiredParams,
        rationale: "the task id is declared as a path part but the endpoint also lists tasks \
                    when called without one",
    },
];

/// Looks up the exception registered for `endpoint`.
pub fn lookup(endpoint: &str) -> Option<&'static EndpointException> {
    EXCEPTIONS.iter().find(|e| e.endpoint == endpoint)
}

fn lookup_kind(endpoint: &str, kind: ExceptionKind) -> Option<&'static EndpointException> {
    lookup(endpoint).filter(|e| e.kind == kind)
}

/// Fixed path selection, if `endpoint` has one.
pub fn path_selection_for(endpoint: &str) -> Option<PathSelection> {
    lookup_kind(endpoint, ExceptionKind::FixedPaths)?;
    match endpoint {
        "termvectors" => Some(PathSelection::Conditional {
            branches: vec![PathBranch::new("/{index}/_termvectors/{id}")],
            fallback: Some(PathTemplate::new("/{index}/_termvectors")),
        }),
        _ => None,
    }
}

/// Method selection override, if `endpoint` has one.
pub fn method_for(endpoint: &str) -> Option<MethodSelection> {
    let exception = lookup(endpoint)?;
    match exception.kind {
        ExceptionKind::MethodById => Some(MethodSelection::WhenSupplied {
            input: CallerInput::Variable("id".to_string()),
            then: HttpMethod::Put,
            otherwise: HttpMethod::Post,
        }),
        ExceptionKind::MethodByBody => Some(MethodSelection::WhenSupplied {
            input: CallerInput::Body,
            then: HttpMethod::Post,
            otherwise: HttpMethod::Get,
        }),
        ExceptionKind::FixedPaths | ExceptionKind::NoRequiredParams => None,
    }
}

/// Whether `endpoint` never has required arguments.
pub fn requires_nothing(endpoint: &str) -> bool {
    lookup_kind(endpoint, ExceptionKind::NoRequiredParams).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{build_selection, resolve_paths};
    use crate::spec::PathAlternative;
    use std::collections::{BTreeMap, HashSet};

    #[test]
    fn endpoints_are_unique() {
        let names: HashSet<_> = EXCEPTIONS.iter().map(|e| e.endpoint).collect();
        assert_eq!(names.len(), EXCEPTIONS.len());
    }

    #[test]
    fn every_entry_has_a_rationale() {
        assert!(EXCEPTIONS.iter().all(|e| !e.rationale.trim().is_empty()));
    }

    #[test]
    fn termvectors_uses_fixed_paths() {
        let selection = path_selection_for("termvectors").unwrap();
        let both = BTreeMap::from([("index", "books"), ("id", "1")]);
        let index_only = BTreeMap::from([("index", "books")]);
        assert_eq!(selection.select(&both).unwrap(), "/books/_termvectors/1");
        assert_eq!(selection.select(&index_only).unwrap(), "/books/_termvectors");
    }

    #[test]
    fn termvectors_ignores_declared_type_routes() {
        let alternatives: Vec<PathAlternative> = [
            "/{index}/_termvectors/{id}",
            "/{index}/_termvectors",
            "/{index}/{type}/{id}/_termvectors",
            "/{index}/{type}/_termvectors",
        ]
        .into_iter()
        .map(|p| PathAlternative {
            template: PathTemplate::new(p),
            methods: vec![HttpMethod::Get, HttpMethod::Post],
            parts: vec![],
            deprecation: None,
        })
        .collect();

        let derived = build_selection("termvectors", &alternatives).unwrap();
        assert!(
            derived
                .templates()
                .iter()
                .any(|t| t.variables().contains(&"type"))
        );

        let pinned = resolve_paths("termvectors", &alternatives).unwrap();
        assert_eq!(pinned, path_selection_for("termvectors").unwrap());
        let all = BTreeMap::from([("index", "books"), ("type", "_doc"), ("id", "1")]);
        assert_eq!(pinned.select(&all).unwrap(), "/books/_termvectors/1");
    }

    #[test]
    fn lookups_are_exact_matches() {
        assert!(lookup("indices.termvectors").is_none());
        assert!(path_selection_for("index").is_none());
        assert!(method_for("termvectors").is_none());
        assert!(!requires_nothing("tasks.list"));
        assert!(requires_nothing("tasks.get"));
    }
}
