//! Endpoint name → module path and method name.

use std::path::{Path, PathBuf};

use strum::{Display, EnumString};

use crate::error::NamespaceError;

/// Segment that marks the extended API surface.
pub const EXTENDED_MARKER: &str = "xpack";

/// Whole-segment renames applied on the extended surface.
const EXTENDED_RENAMES: &[(&str, &str)] = &[
    ("ml", "machine_learning"),
    ("ilm", "index_lifecycle_management"),
];

/// Which API surface endpoints belong to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ApiSurface {
    #[default]
    Standard,
    /// Endpoints live under the `xpack` namespace, with abbreviated
    /// segments spelled out.
    Extended,
}

/// A resolved endpoint namespace.
///
/// ## Examples
///
/// ```
/// use apigen_lib::{ApiSurface, Namespace};
///
/// let ns = Namespace::resolve("ml.get_jobs", ApiSurface::Extended).unwrap();
/// assert_eq!(ns.modules(), ["xpack", "machine_learning"]);
/// assert_eq!(ns.method(), "get_jobs");
/// assert_eq!(ns.output_dirs(), ["machine_learning"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    modules: Vec<String>,
    method: String,
}

impl Namespace {
    /// Resolves a dotted endpoint name.
    ///
    /// ## Errors
    ///
    /// Returns [`NamespaceError::MalformedEndpointName`] for an empty name or
    /// any empty segment (`a..b`, `.a`, `a.`).
    pub fn resolve(name: &str, surface: ApiSurface) -> Result<Self, NamespaceError> {
        let mut segments: Vec<&str> = name.split('.').collect();
        if segments.iter().any(|s| s.trim().is_empty()) {
            return Err(NamespaceError::MalformedEndpointName(name.to_string()));
        }

        if surface == ApiSurface::Extended && segments.first() != Some(&EXTENDED_MARKER) {
            segments.insert(0, EXTENDED_MARKER);
        }

        let mut segments: Vec<String> = segments
            .into_iter()
            .map(|segment| match surface {
                ApiSurface::Extended => rename(segment).to_string(),
                ApiSurface::Standard => segment.to_string(),
            })
            .collect();

        let Some(method) = segments.pop() else {
            return Err(NamespaceError::MalformedEndpointName(name.to_string()));
        };

        Ok(Self {
            modules: segments,
            method,
        })
    }

    /// Module path segments, excluding the method name.
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Module path as it appears on disk: the extended marker is dropped.
    pub fn output_dirs(&self) -> &[String] {
        match self.modules.split_first() {
            Some((first, rest)) if first == EXTENDED_MARKER => rest,
            _ => &self.modules,
        }
    }

    /// Joins the on-disk module path and `file_name` under `root`.
    pub fn output_path(&self, root: &Path, file_name: &str) -> PathBuf {
        let mut path = root.to_path_buf();
        path.extend(self.output_dirs());
        path.push(file_name);
        path
    }

    /// `a::b::method`
    pub fn qualified(&self) -> String {
        let mut parts: Vec<&str> = self.modules.iter().map(String::as_str).collect();
        parts.push(&self.method);
        parts.join("::")
    }
}

fn rename(segment: &str) -> &str {
    EXTENDED_RENAMES
        .iter()
        .find(|(from, _)| *from == segment)
        .map_or(segment, |(_, to)| to)
}
