//! A fully resolved endpoint: everything a renderer needs.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::Overrides;
use crate::error::{GeneratorError, PathError};
use crate::method::{CallerInput, HttpMethod, MethodSelection, resolve_method};
use crate::namespace::{ApiSurface, Namespace};
use crate::params::{BODY, ClassifiedParams, classify};
use crate::selection::{PathSelection, resolve_paths};
use crate::spec::{EndpointSpec, Param, ParamInfo};

/// A path variable the generated function accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct PathArgument {
    pub name: String,
    pub info: ParamInfo,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEndpoint {
    pub spec: EndpointSpec,
    pub namespace: Namespace,
    pub paths: PathSelection,
    pub method: MethodSelection,
    pub params: ClassifiedParams,
}

impl ResolvedEndpoint {
    /// Runs every resolver over a loaded spec.
    pub fn resolve(
        spec: EndpointSpec,
        surface: ApiSurface,
        overrides: &Overrides,
    ) -> Result<Self, GeneratorError> {
        let namespace = Namespace::resolve(&spec.name, surface)?;
        let paths = resolve_paths(&spec.name, &spec.paths)?;
        let method = resolve_method(&spec.name, &spec.paths)
            .ok_or_else(|| PathError::NoAlternatives(spec.name.clone()))?;
        let params = classify(&spec, overrides.for_endpoint(&spec.name))?;

        debug!(
            endpoint = %spec.name,
            namespace = %namespace.qualified(),
            conditional = paths.is_conditional(),
            required = ?params.required,
            "resolved endpoint"
        );

        Ok(Self {
            spec,
            namespace,
            paths,
            method,
            params,
        })
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Path variables, declared parts first, then any variable only the
    /// selected templates use.
    pub fn path_arguments(&self) -> Vec<PathArgument> {
        let mut arguments: Vec<PathArgument> = self
            .spec
            .all_parts()
            .into_iter()
            .map(|Param { name, info }| PathArgument {
                name: name.clone(),
                info: info.clone(),
                required: self.params.is_required(name),
            })
            .collect();

        for template in self.paths.templates() {
            for variable in template.variables() {
                if !arguments.iter().any(|a| a.name == variable) {
                    arguments.push(PathArgument {
                        name: variable.to_string(),
                        info: ParamInfo::default(),
                        required: self.params.is_required(variable),
                    });
                }
            }
        }

        arguments
    }

    /// Whether the generated function takes a body.
    pub fn accepts_body(&self) -> bool {
        self.spec.body.is_some()
            || matches!(
                self.method,
                MethodSelection::WhenSupplied {
                    input: CallerInput::Body,
                    ..
                }
            )
    }

    pub fn body_required(&self) -> bool {
        self.params.is_required(BODY)
    }

    /// Method and path of a call that supplies every argument, using each
    /// argument's name as its value.
    pub fn expected_call(&self) -> Result<(HttpMethod, String), PathError> {
        let arguments = self.path_arguments();
        let values: BTreeMap<&str, &str> = arguments
            .iter()
            .map(|a| (a.name.as_str(), a.name.as_str()))
            .collect();
        let method = self
            .method
            .select(|name| values.contains_key(name), self.accepts_body());
        let path = self.paths.select(&values)?;
        Ok((method, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(json: &str) -> ResolvedEndpoint {
        let spec = EndpointSpec::from_json_str("test.json", json).unwrap();
        ResolvedEndpoint::resolve(spec, ApiSurface::Standard, &Overrides::default()).unwrap()
    }

    #[test]
    fn arguments_cover_all_alternatives() {
        let endpoint = resolve(
            r#"{ "get_source": { "url": { "paths": [
                { "path": "/{index}/_source/{id}", "methods": ["GET"] },
                { "path": "/{index}/{type}/{id}/_source", "methods": ["GET"] }
            ] } } }"#,
        );
        let args: Vec<_> = endpoint
            .path_arguments()
            .into_iter()
            .map(|a| (a.name, a.required))
            .collect();
        assert_eq!(
            args,
            vec![
                ("index".to_string(), true),
                ("id".to_string(), true),
                ("type".to_string(), false)
            ]
        );
    }

    #[test]
    fn expected_call_supplies_everything() {
        let endpoint = resolve(
            r#"{ "index": { "url": { "paths": [
                { "path": "/{index}/_doc/{id}", "methods": ["PUT", "POST"] },
                { "path": "/{index}/_doc", "methods": ["POST"] }
            ] }, "body": { "required": true } } }"#,
        );
        assert!(endpoint.accepts_body());
        assert!(endpoint.body_required());
        assert_eq!(
            endpoint.expected_call().unwrap(),
            (HttpMethod::Put, "/index/_doc/id".to_string())
        );
    }

    #[test]
    fn count_accepts_body_without_declaring_one() {
        let endpoint = resolve(
            r#"{ "count": { "url": { "paths": [
                { "path": "/_count", "methods": ["GET", "POST"] },
                { "path": "/{index}/_count", "methods": ["GET", "POST"] }
            ] } } }"#,
        );
        assert!(endpoint.accepts_body());
        assert_eq!(
            endpoint.expected_call().unwrap(),
            (HttpMethod::Post, "/index/_count".to_string())
        );
    }

    #[test]
    fn malformed_name_is_rejected() {
        let spec = EndpointSpec::from_json_str(
            "bad.json",
            r#"{ "indices..create": { "url": { "paths": [ { "path": "/", "methods": ["GET"] } ] } } }"#,
        )
        .unwrap();
        let err = ResolvedEndpoint::resolve(spec, ApiSurface::Standard, &Overrides::default())
            .unwrap_err();
        assert!(matches!(err, GeneratorError::Namespace(_)));
    }
}
