//! Parameter classification: override merging and the required set.

use serde_json::{Map, Value};
use tracing::trace;

use crate::error::LoadError;
use crate::exceptions;
use crate::spec::{EndpointSpec, Param, ParamInfo};

/// Marker for a required request body in the required set.
pub const BODY: &str = "body";

/// Merged parameters and required argument names.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedParams {
    /// Query parameters after applying overrides, in declared order.
    pub params: Vec<Param>,
    /// Required arguments: `body` first when required, then path variables.
    pub required: Vec<String>,
}

impl ClassifiedParams {
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

/// Merges `overlay` into `base`.
///
/// Objects are merged key by key, recursively. Any other overlay value
/// replaces the base value.
///
/// ## Examples
///
/// ```
/// use apigen_lib::params::deep_merge;
/// use serde_json::json;
///
/// let mut base = json!({ "type": "enum", "options": ["a"], "meta": { "since": "7.0" } });
/// deep_merge(&mut base, json!({ "options": ["b"], "meta": { "until": "8.0" } }));
/// assert_eq!(
///     base,
///     json!({ "type": "enum", "options": ["b"], "meta": { "since": "7.0", "until": "8.0" } })
/// );
/// ```
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Merges declared parameters with their overrides and computes the
/// required set.
///
/// Overrides for parameters the endpoint does not declare are appended after the
/// declared ones.
pub fn classify(
    spec: &EndpointSpec,
    overrides: Option<&Map<String, Value>>,
) -> Result<ClassifiedParams, LoadError> {
    let mut params = Vec::with_capacity(spec.params.len());

    for param in &spec.params {
        let info = match overrides.and_then(|o| o.get(&param.name)) {
            Some(overlay) => merge_param(&spec.name, &param.name, &param.info, overlay)?,
            None => param.info.clone(),
        };
        params.push(Param {
            name: param.name.clone(),
            info,
        });
    }

    if let Some(overrides) = overrides {
        for (name, overlay) in overrides {
            if spec.params.iter().any(|p| &p.name == name) {
                continue;
            }
            trace!(endpoint = %spec.name, param = %name, "adding parameter from overrides");
            params.push(Param {
                name: name.clone(),
                info: merge_param(&spec.name, name, &ParamInfo::default(), overlay)?,
            });
        }
    }

    Ok(ClassifiedParams {
        params,
        required: required_set(spec),
    })
}

/// Required arguments of an endpoint.
///
/// `body` when the body is declared required, followed by the path variables
/// every alternative declares, in the first alternative's order. Endpoints in
/// the exception table may have no required arguments at all.
pub fn required_set(spec: &EndpointSpec) -> Vec<String> {
    if exceptions::requires_nothing(&spec.name) {
        return Vec::new();
    }

    let mut required = Vec::new();
    if spec.body_required() {
        required.push(BODY.to_string());
    }

    if let Some((first, rest)) = spec.paths.split_first() {
        for name in first.variable_names() {
            if rest.iter().all(|alt| alt.variable_names().contains(&name)) {
                required.push(name.to_string());
            }
        }
    }

    required
}

fn merge_param(
    endpoint: &str,
    name: &str,
    declared: &ParamInfo,
    overlay: &Value,
) -> Result<ParamInfo, LoadError> {
    let origin = || format!("overrides for {endpoint} ({name})");
    let mut merged = serde_json::to_value(declared).map_err(|source| LoadError::Json {
        origin: origin(),
        source,
    })?;
    deep_merge(&mut merged, overlay.clone());
    serde_json::from_value(merged).map_err(|source| LoadError::Json {
        origin: origin(),
        source,
    })
}
