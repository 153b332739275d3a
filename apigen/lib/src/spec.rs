//! Endpoint specification documents.
//!
//! Each input file is a JSON object with a single key, the dotted endpoint
//! name, mapping to its definition:
//!
//! ```json
//! {
//!   "indices.create": {
//!     "documentation": { "url": "https://…", "description": "Creates an index." },
//!     "url": { "paths": [ { "path": "/{index}", "methods": ["PUT"], "parts": { "index": {} } } ] },
//!     "body": { "required": false },
//!     "params": { "timeout": { "type": "time", "description": "Explicit operation timeout" } }
//!   }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::error::LoadError;
use crate::method::HttpMethod;
use crate::path_template::PathTemplate;

/// Description used when a parameter documents nothing.
pub const DEFAULT_DESCRIPTION: &str = "No description provided";

/// Declared metadata for one query parameter or path part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamInfo {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, deserialize_with = "flag_or_details")]
    pub deprecated: bool,
    #[serde(
        default,
        deserialize_with = "literals",
        skip_serializing_if = "Option::is_none"
    )]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ParamInfo {
    /// Type shown in documentation; `enum` is presented as `string`.
    pub fn doc_type(&self) -> &str {
        match self.kind.as_deref() {
            None | Some("enum") => "string",
            Some(other) => other,
        }
    }

    /// The description, or a placeholder when none was declared.
    pub fn description(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(DEFAULT_DESCRIPTION)
    }
}

/// A named parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub info: ParamInfo,
}

/// Request body declaration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BodySpec {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
}

/// Where an endpoint is documented.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Documentation {
    pub url: Option<String>,
    pub description: Option<String>,
}

/// One URL route of an endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct PathAlternative {
    pub template: PathTemplate,
    pub methods: Vec<HttpMethod>,
    /// Declared path parts, in declaration order.
    pub parts: Vec<Param>,
    pub deprecation: Option<String>,
}

impl PathAlternative {
    /// Names of the variables this route needs.
    pub fn variable_names(&self) -> Vec<&str> {
        self.parts.iter().map(|p| p.name.as_str()).collect()
    }
}

/// A loaded endpoint definition.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointSpec {
    pub name: String,
    pub documentation: Documentation,
    pub stability: Option<String>,
    pub paths: Vec<PathAlternative>,
    pub body: Option<BodySpec>,
    pub params: Vec<Param>,
}

impl EndpointSpec {
    /// Whether the body is declared and required.
    pub fn body_required(&self) -> bool {
        self.body.as_ref().is_some_and(|b| b.required)
    }

    /// Deprecation note of the last path alternative.
    pub fn deprecation_note(&self) -> Option<&str> {
        self.paths.last().and_then(|p| p.deprecation.as_deref())
    }

    /// Every path part across all alternatives, first declaration wins.
    pub fn all_parts(&self) -> Vec<&Param> {
        let mut parts: Vec<&Param> = Vec::new();
        for alternative in &self.paths {
            for part in &alternative.parts {
                if !parts.iter().any(|p| p.name == part.name) {
                    parts.push(part);
                }
            }
        }
        parts
    }

    /// Parses a JSON document; `origin` names it in errors.
    pub fn from_json_str(origin: &str, json: &str) -> Result<Self, LoadError> {
        let document: Map<String, Value> =
            serde_json::from_str(json).map_err(|source| LoadError::Json {
                origin: origin.to_string(),
                source,
            })?;

        if document.len() != 1 {
            return Err(LoadError::TopLevelKeys {
                origin: origin.to_string(),
                found: document.len(),
            });
        }
        let Some((name, definition)) = document.into_iter().next() else {
            return Err(LoadError::TopLevelKeys {
                origin: origin.to_string(),
                found: 0,
            });
        };

        let raw: RawEndpoint =
            serde_json::from_value(definition).map_err(|source| LoadError::Json {
                origin: origin.to_string(),
                source,
            })?;

        raw.into_spec(name)
    }
}

/// Loads one endpoint specification file.
pub fn load_endpoint(path: &Path) -> Result<EndpointSpec, LoadError> {
    let json = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let spec = EndpointSpec::from_json_str(&path.display().to_string(), &json)?;
    debug!(endpoint = %spec.name, paths = spec.paths.len(), "loaded endpoint spec");
    Ok(spec)
}

/// Lists endpoint specification files under `dir`, sorted by path.
///
/// Only `.json` files count. Files whose name starts with `_` (shared
/// definitions such as `_common.json`) or `.` are skipped.
pub fn discover_spec_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|source| LoadError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('_') || name.starts_with('.') {
            trace!(file = %name, "skipping non-endpoint file");
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        files.push(entry.into_path());
    }

    Ok(files)
}

#[derive(Debug, Deserialize)]
struct RawEndpoint {
    #[serde(default)]
    documentation: Option<RawDocumentation>,
    #[serde(default)]
    stability: Option<String>,
    url: RawUrl,
    #[serde(default)]
    body: Option<BodySpec>,
    #[serde(default)]
    params: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawUrl {
    #[serde(default)]
    paths: Vec<RawPath>,
}

#[derive(Debug, Deserialize)]
struct RawPath {
    path: String,
    #[serde(default)]
    methods: Vec<String>,
    #[serde(default)]
    parts: Option<Map<String, Value>>,
    #[serde(default)]
    deprecated: Option<RawDeprecation>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDocumentation {
    Url(String),
    Detailed {
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        description: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDeprecation {
    Note(String),
    Detailed {
        #[serde(default)]
        version: Option<String>,
        #[serde(default)]
        description: Option<String>,
    },
}

impl RawDeprecation {
    fn into_note(self) -> String {
        match self {
            Self::Note(note) => note,
            Self::Detailed {
                version: Some(version),
                description: Some(description),
            } => format!("Deprecated since {version}: {description}"),
            Self::Detailed {
                version: None,
                description: Some(description),
            } => description,
            Self::Detailed {
                version: Some(version),
                description: None,
            } => format!("Deprecated since {version}"),
            Self::Detailed {
                version: None,
                description: None,
            } => "Deprecated".to_string(),
        }
    }
}

impl RawEndpoint {
    fn into_spec(self, name: String) -> Result<EndpointSpec, LoadError> {
        if self.url.paths.is_empty() {
            return Err(LoadError::NoPaths { endpoint: name });
        }

        let mut paths = Vec::with_capacity(self.url.paths.len());
        for raw in self.url.paths {
            if raw.methods.is_empty() {
                return Err(LoadError::NoMethods {
                    endpoint: name,
                    path: raw.path,
                });
            }
            let methods = raw
                .methods
                .iter()
                .map(|m| {
                    HttpMethod::from_str(m).map_err(|_| LoadError::UnknownMethod {
                        endpoint: name.clone(),
                        method: m.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let template = PathTemplate::new(raw.path);
            let parts = match raw.parts {
                Some(parts) => to_params(&name, parts)?,
                None => template
                    .variables()
                    .into_iter()
                    .map(|v| Param {
                        name: v.to_string(),
                        info: ParamInfo::default(),
                    })
                    .collect(),
            };

            paths.push(PathAlternative {
                template,
                methods,
                parts,
                deprecation: raw.deprecated.map(RawDeprecation::into_note),
            });
        }

        let documentation = match self.documentation {
            Some(RawDocumentation::Url(url)) => Documentation {
                url: Some(url),
                description: None,
            },
            Some(RawDocumentation::Detailed { url, description }) => {
                Documentation { url, description }
            }
            None => Documentation::default(),
        };

        let params = to_params(&name, self.params)?;

        Ok(EndpointSpec {
            name,
            documentation,
            stability: self.stability,
            paths,
            body: self.body,
            params,
        })
    }
}

fn to_params(endpoint: &str, raw: Map<String, Value>) -> Result<Vec<Param>, LoadError> {
    raw.into_iter()
        .map(|(name, value)| {
            let info = serde_json::from_value(value).map_err(|source| LoadError::Json {
                origin: format!("{endpoint} ({name})"),
                source,
            })?;
            Ok(Param { name, info })
        })
        .collect()
}

/// Accepts `true`/`false`, or any object/string (treated as deprecated).
fn flag_or_details<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(flag) => flag,
        Value::Null => false,
        _ => true,
    })
}

/// Accepts a list of literals of any scalar type, keeping their text.
fn literals<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(values.map(|values| {
        values
            .into_iter()
            .map(|v| match v {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect()
    }))
}
