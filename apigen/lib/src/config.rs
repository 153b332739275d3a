//! Generator configuration.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::lint::LintCommand;
use crate::namespace::ApiSurface;

/// Crate name generated code imports its runtime support from.
pub const DEFAULT_CRATE_NAME: &str = "client";

/// Per-endpoint parameter corrections, keyed by endpoint name then
/// parameter name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    endpoints: Map<String, Value>,
}

impl Overrides {
    /// Parses an overrides document; `origin` names it in errors.
    pub fn from_json_str(origin: &Path, json: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::Invalid {
            path: origin.to_path_buf(),
            reason,
        };

        let value: Value = serde_json::from_str(json).map_err(|e| invalid(e.to_string()))?;
        let Value::Object(endpoints) = value else {
            return Err(invalid("expected a JSON object keyed by endpoint name".to_string()));
        };

        for (endpoint, params) in &endpoints {
            let Some(params) = params.as_object() else {
                return Err(invalid(format!("overrides for '{endpoint}' must be an object")));
            };
            if let Some((param, _)) = params.iter().find(|(_, v)| !v.is_object()) {
                return Err(invalid(format!(
                    "override for '{endpoint}.{param}' must be an object"
                )));
            }
        }

        Ok(Self { endpoints })
    }

    /// Reads an overrides file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(path, &json)
    }

    /// Parameter overrides for one endpoint.
    pub fn for_endpoint(&self, endpoint: &str) -> Option<&Map<String, Value>> {
        self.endpoints.get(endpoint).and_then(Value::as_object)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

/// Everything one generation run needs.
///
/// ## Examples
///
/// ```
/// use apigen_lib::{ApiSurface, GeneratorConfig};
///
/// let config = GeneratorConfig::new("rest-api-spec/api", "src/api")
///     .with_tests("tests/api")
///     .with_surface(ApiSurface::Extended);
/// assert!(config.generate_tests());
/// ```
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Where test stubs go; `None` disables test generation.
    pub tests_dir: Option<PathBuf>,
    pub surface: ApiSurface,
    pub overrides: Overrides,
    pub crate_name: String,
    /// Formatter run over generated files; `None` skips it.
    pub lint: Option<LintCommand>,
    pub dry_run: bool,
}

impl GeneratorConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            tests_dir: None,
            surface: ApiSurface::Standard,
            overrides: Overrides::default(),
            crate_name: DEFAULT_CRATE_NAME.to_string(),
            lint: Some(LintCommand::default()),
            dry_run: false,
        }
    }

    pub fn with_tests(mut self, tests_dir: impl Into<PathBuf>) -> Self {
        self.tests_dir = Some(tests_dir.into());
        self
    }

    pub fn with_surface(mut self, surface: ApiSurface) -> Self {
        self.surface = surface;
        self
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_crate_name(mut self, crate_name: impl Into<String>) -> Self {
        self.crate_name = crate_name.into();
        self
    }

    pub fn with_lint(mut self, lint: Option<LintCommand>) -> Self {
        self.lint = lint;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn generate_tests(&self) -> bool {
        self.tests_dir.is_some()
    }

    /// Checks the configuration before a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.input_dir.is_dir() {
            return Err(ConfigError::InputDirNotFound(self.input_dir.clone()));
        }
        if self.crate_name.is_empty()
            || !self
                .crate_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ConfigError::Invalid {
                path: self.input_dir.clone(),
                reason: format!("'{}' is not a valid crate identifier", self.crate_name),
            });
        }
        Ok(())
    }
}
