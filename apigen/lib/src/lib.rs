//! REST API client generator library.
//!
//! Reads one JSON document per endpoint and generates a Rust request builder
//! function plus test stubs for each, laid out by the endpoint's dotted name,
//! along with the module files that declare them.
//!
//! ## Modules
//!
//! - [`spec`] - Loading endpoint spec files
//! - [`path_template`] - `{variable}` placeholders in URL templates
//! - [`namespace`] - Dotted names to module paths
//! - [`selection`] - Choosing a URL template from the supplied variables
//! - [`method`] - Choosing the HTTP method
//! - [`exceptions`] - Endpoints with hand-written rules
//! - [`params`] - Override merging and required arguments
//! - [`endpoint`] - Everything resolved for one endpoint
//! - [`render`] - Rendering resolved endpoints to source text
//! - [`modules`] - Module files tying generated files into one hierarchy
//! - [`output`] - Validation, formatting and atomic writes
//! - [`lint`] - Running an external formatter
//! - [`config`] - Run configuration and overrides
//! - [`generator`] - The generation run
//! - [`error`] - Error types
//!
//! ## Example Usage
//!
//! ```no_run
//! use apigen_lib::{ApiSurface, Generator, GeneratorConfig};
//!
//! let config = GeneratorConfig::new("rest-api-spec/api", "src/api")
//!     .with_tests("tests/api")
//!     .with_surface(ApiSurface::Standard);
//!
//! let report = Generator::new(config).run()?;
//! for endpoint in &report.endpoints {
//!     println!("{} -> {}", endpoint.name, endpoint.source.path.display());
//! }
//! # Ok::<(), apigen_lib::GeneratorError>(())
//! ```
//!
//! ## Path selection
//!
//! ```
//! use apigen_lib::{PathAlternative, HttpMethod, build_selection};
//! use apigen_lib::path_template::PathTemplate;
//! use std::collections::BTreeMap;
//!
//! let alternatives: Vec<PathAlternative> = ["/{index}/_doc", "/{index}/_doc/{id}"]
//!     .into_iter()
//!     .map(|p| PathAlternative {
//!         template: PathTemplate::new(p),
//!         methods: vec![HttpMethod::Get],
//!         parts: vec![],
//!         deprecation: None,
//!     })
//!     .collect();
//!
//! let selection = build_selection("get", &alternatives).unwrap();
//! let values = BTreeMap::from([("index", "books"), ("id", "1")]);
//! assert_eq!(selection.select(&values).unwrap(), "/books/_doc/1");
//! ```

pub mod config;
pub mod endpoint;
pub mod error;
pub mod exceptions;
pub mod generator;
pub mod lint;
pub mod method;
pub mod modules;
pub mod namespace;
pub mod output;
pub mod params;
pub mod path_template;
pub mod render;
pub mod selection;
pub mod spec;

pub use config::{GeneratorConfig, Overrides};
pub use endpoint::ResolvedEndpoint;
pub use error::{ConfigError, GeneratorError, LintError, LoadError, NamespaceError, PathError};
pub use generator::{GeneratedEndpoint, GeneratedFile, GenerationReport, Generator, LintOutcome};
pub use lint::LintCommand;
pub use method::{CallerInput, HttpMethod, MethodSelection, resolve_method};
pub use modules::{ModuleFile, ModuleTree};
pub use namespace::{ApiSurface, Namespace};
pub use render::{Renderer, RustRenderer, TemplateName};
pub use selection::{PathBranch, PathSelection, build_selection, resolve_paths};
pub use spec::{EndpointSpec, ParamInfo, PathAlternative};
