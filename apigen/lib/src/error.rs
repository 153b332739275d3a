//! Error types for the generator.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading an endpoint specification file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read endpoint spec '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or does not match the expected shape.
    #[error("malformed endpoint spec '{origin}': {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// The document must hold exactly one top-level key, the endpoint name.
    #[error("malformed endpoint spec '{origin}': expected exactly one top-level key, found {found}")]
    TopLevelKeys { origin: String, found: usize },

    /// The endpoint declares no URL paths.
    #[error("malformed endpoint spec '{endpoint}': `url.paths` is missing or empty")]
    NoPaths { endpoint: String },

    /// A path alternative declares no HTTP methods.
    #[error("malformed endpoint spec '{endpoint}': path '{path}' declares no HTTP methods")]
    NoMethods { endpoint: String, path: String },

    /// A path alternative declares an HTTP method we do not know.
    #[error("malformed endpoint spec '{endpoint}': unknown HTTP method '{method}'")]
    UnknownMethod { endpoint: String, method: String },

    /// The input directory could not be traversed.
    #[error("failed to list endpoint specs under '{path}': {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Errors raised while resolving an endpoint name into a namespace.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NamespaceError {
    /// The dotted name is empty or contains an empty segment.
    #[error("malformed endpoint name '{0}': expected non-empty dot-separated segments")]
    MalformedEndpointName(String),
}

/// Errors raised while building or evaluating a path selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// The alternatives cannot be expressed as an if/else-if/else chain.
    #[error(
        "cannot resolve paths for '{endpoint}': template '{template}' is unreachable after unconditional template '{fallback}'"
    )]
    UnresolvablePathSignature {
        endpoint: String,
        template: String,
        fallback: String,
    },

    /// An endpoint declared no path alternatives at all.
    #[error("cannot resolve paths for '{0}': no path alternatives")]
    NoAlternatives(String),

    /// No branch matched the supplied variables.
    #[error("no path template matches the supplied variables {supplied:?}")]
    NoMatchingPath { supplied: Vec<String> },

    /// The chosen template needs a variable that was not supplied.
    #[error("path template '{template}' requires variable '{variable}'")]
    MissingVariable { template: String, variable: String },
}

/// Errors raised while reading generator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The overrides file could not be read.
    #[error("failed to read overrides file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The overrides file is not a JSON object of objects.
    #[error("invalid overrides file '{path}': {reason}")]
    Invalid { path: PathBuf, reason: String },

    /// The input directory does not exist.
    #[error("input directory does not exist: {0}")]
    InputDirNotFound(PathBuf),
}

/// Errors raised by the external formatter invocation.
///
/// These never fail a run; the generator logs them and carries on.
#[derive(Debug, Error)]
pub enum LintError {
    /// The formatter binary could not be spawned.
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The formatter exited unsuccessfully.
    #[error("'{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
}

/// Errors that can occur during code generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Failed to load an endpoint specification.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Failed to resolve an endpoint namespace.
    #[error(transparent)]
    Namespace(#[from] NamespaceError),

    /// Failed to resolve path selection for an endpoint.
    #[error(transparent)]
    Path(#[from] PathError),

    /// Invalid generator configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A renderer could not produce output for an endpoint.
    #[error("failed to render {template} for '{endpoint}': {reason}")]
    Render {
        endpoint: String,
        template: String,
        reason: String,
    },

    /// Two generated files map to the same module, or a module is both a
    /// file and a directory.
    #[error("generated module '{module}' is declared more than once")]
    ModuleConflict { module: String },

    /// Generated code did not parse.
    #[error("generated code for '{endpoint}' is invalid: {source}")]
    InvalidCode {
        endpoint: String,
        #[source]
        source: syn::Error,
    },

    /// Failed to write output file
    #[error("failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
