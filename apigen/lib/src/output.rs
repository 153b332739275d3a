//! Validating, formatting and writing generated files.
//!
//! - **Validation**: generated tokens are parsed with `syn` before anything
//!   is written
//! - **Formatting**: output is pretty-printed with `prettyplease`
//! - **Atomic writes**: temp file + rename, so a failed run never leaves a
//!   half-written file

use std::fs;
use std::io::Write;
use std::path::Path;

use proc_macro2::TokenStream;

use crate::error::GeneratorError;

/// First line of every generated file.
pub const GENERATED_BANNER: &str =
    "// This code was automatically generated by apigen. Do not edit manually.";

/// Parses generated tokens as a Rust file.
///
/// ## Errors
///
/// Returns [`GeneratorError::InvalidCode`] if the tokens do not form a valid
/// Rust file.
pub fn validate_code(endpoint: &str, tokens: &TokenStream) -> Result<syn::File, GeneratorError> {
    syn::parse2(tokens.clone()).map_err(|source| GeneratorError::InvalidCode {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// Pretty-prints a parsed file and prepends the generated-code banner.
pub fn format_code(file: &syn::File) -> String {
    let formatted = prettyplease::unparse(file);
    format!("{GENERATED_BANNER}\n\n{formatted}")
}

/// Validates and formats tokens in one step.
pub fn render_tokens(endpoint: &str, tokens: &TokenStream) -> Result<String, GeneratorError> {
    let file = validate_code(endpoint, tokens)?;
    Ok(format_code(&file))
}

/// Writes content to a file atomically using temp file + rename.
///
/// The temp file gets a unique name in the target directory, so existing
/// files are never clobbered, and it is removed whenever the write or the
/// rename fails. Parent directories are created as needed.
///
/// ## Errors
///
/// Returns [`GeneratorError::WriteError`] if:
/// - Parent directories cannot be created
/// - The temp file cannot be created or written
/// - The rename operation fails
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
        path: parent.display().to_string(),
        source: e,
    })?;

    let write_error = |source| GeneratorError::WriteError {
        path: path.display().to_string(),
        source,
    };

    let mut temp = tempfile::Builder::new()
        .prefix(".apigen-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(write_error)?;
    temp.write_all(content.as_bytes()).map_err(write_error)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(write_error)?;
    }
    temp.persist(path).map_err(|e| write_error(e.error))?;

    Ok(())
}
