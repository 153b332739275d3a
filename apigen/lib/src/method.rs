//! HTTP methods and per-call method selection.

use std::fmt;

use strum::{Display, EnumIter, EnumString};

use crate::exceptions;
use crate::spec::PathAlternative;

/// HTTP methods an endpoint can be called with.
///
/// ## Examples
///
/// ```rust
/// use apigen_lib::HttpMethod;
///
/// let parsed: HttpMethod = "PUT".parse().unwrap();
/// assert_eq!(parsed, HttpMethod::Put);
/// assert_eq!(HttpMethod::Head.to_string(), "HEAD");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    /// Variant name used by generated code (`Method::Get`).
    pub fn variant_name(self) -> &'static str {
        match self {
            Self::Get => "Get",
            Self::Post => "Post",
            Self::Put => "Put",
            Self::Patch => "Patch",
            Self::Delete => "Delete",
            Self::Head => "Head",
            Self::Options => "Options",
        }
    }
}

/// Caller-supplied data a method choice can depend on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallerInput {
    /// A path variable, by name.
    Variable(String),
    /// The request body.
    Body,
}

impl fmt::Display for CallerInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable(name) => write!(f, "`{name}`"),
            Self::Body => f.write_str("a request body"),
        }
    }
}

/// How the HTTP method of a call is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodSelection {
    /// Always the same method.
    Fixed(HttpMethod),
    /// `then` when `input` was supplied, `otherwise` when it was not.
    WhenSupplied {
        input: CallerInput,
        then: HttpMethod,
        otherwise: HttpMethod,
    },
}

impl MethodSelection {
    /// Picks the method for a call, given which inputs the caller supplied.
    pub fn select(&self, variable_supplied: impl Fn(&str) -> bool, body_supplied: bool) -> HttpMethod {
        match self {
            Self::Fixed(method) => *method,
            Self::WhenSupplied {
                input,
                then,
                otherwise,
            } => {
                let supplied = match input {
                    CallerInput::Variable(name) => variable_supplied(name),
                    CallerInput::Body => body_supplied,
                };
                if supplied { *then } else { *otherwise }
            }
        }
    }
}

/// Resolves the method selection for an endpoint.
///
/// Uses the exception table first; otherwise the first method declared on the
/// first path alternative. Returns `None` only when there are no alternatives.
pub fn resolve_method(endpoint: &str, alternatives: &[PathAlternative]) -> Option<MethodSelection> {
    if let Some(selection) = exceptions::method_for(endpoint) {
        return Some(selection);
    }
    alternatives
        .first()
        .and_then(|alt| alt.methods.first())
        .map(|method| MethodSelection::Fixed(*method))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_template::PathTemplate;
    use strum::IntoEnumIterator;

    fn alternative(path: &str, methods: &[HttpMethod]) -> PathAlternative {
        PathAlternative {
            template: PathTemplate::new(path),
            methods: methods.to_vec(),
            parts: vec![],
            deprecation: None,
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("post".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
        assert_eq!("HEAD".parse::<HttpMethod>().unwrap(), HttpMethod::Head);
        assert!("FETCH".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_variant_names_round_trip_display() {
        for method in HttpMethod::iter() {
            assert_eq!(method.variant_name().to_uppercase(), method.to_string());
        }
    }

    #[test]
    fn default_uses_first_method_of_first_alternative() {
        let alternatives = vec![
            alternative("/{index}/_search", &[HttpMethod::Get, HttpMethod::Post]),
            alternative("/_search", &[HttpMethod::Post]),
        ];
        assert_eq!(
            resolve_method("search", &alternatives),
            Some(MethodSelection::Fixed(HttpMethod::Get))
        );
    }

    #[test]
    fn index_puts_with_id_and_posts_without() {
        let alternatives = vec![
            alternative("/{index}/_doc/{id}", &[HttpMethod::Put, HttpMethod::Post]),
            alternative("/{index}/_doc", &[HttpMethod::Post]),
        ];
        let selection = resolve_method("index", &alternatives).unwrap();
        assert_eq!(selection.select(|name| name == "id", false), HttpMethod::Put);
        assert_eq!(selection.select(|_| false, false), HttpMethod::Post);
    }

    #[test]
    fn count_posts_with_body_and_gets_without() {
        let alternatives = vec![alternative("/_count", &[HttpMethod::Get, HttpMethod::Post])];
        let selection = resolve_method("count", &alternatives).unwrap();
        assert_eq!(selection.select(|_| false, true), HttpMethod::Post);
        assert_eq!(selection.select(|_| true, false), HttpMethod::Get);
    }

    #[test]
    fn no_alternatives_has_no_method() {
        assert_eq!(resolve_method("search", &[]), None);
    }
}
