//! Rendering resolved endpoints into source files.
//!
//! A [`Renderer`] turns a [`ResolvedEndpoint`] into file contents for each
//! [`TemplateName`], and prints the module files that declare them. The
//! resolvers decide the logic; renderers only print it.
//!
//! ## Submodules
//!
//! - [`docs`] - Doc comment text shared by renderers
//! - [`rust`] - [`RustRenderer`], the shipped implementation

pub mod docs;
pub mod rust;

use std::path::PathBuf;

use strum::Display;

use crate::endpoint::ResolvedEndpoint;
use crate::error::GeneratorError;
use crate::modules::ModuleFile;

pub use rust::RustRenderer;

/// The files produced per endpoint, and the tree each one belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum TemplateName {
    /// The client function.
    Source,
    /// Test stubs for the client function.
    Test,
}

/// Produces generated file contents for a target language.
pub trait Renderer {
    /// Renders one template for an endpoint.
    fn render(
        &self,
        template: TemplateName,
        endpoint: &ResolvedEndpoint,
    ) -> Result<String, GeneratorError>;

    /// Module name of an endpoint's generated file, e.g. `create_test`.
    fn module_name(&self, template: TemplateName, method: &str) -> String;

    /// File name for an endpoint's method, e.g. `create.rs`.
    fn file_name(&self, template: TemplateName, method: &str) -> String;

    /// Renders the module file declaring one directory's children.
    fn render_module(
        &self,
        template: TemplateName,
        module: &ModuleFile,
    ) -> Result<String, GeneratorError>;

    /// Location of a directory's module file relative to its tree root.
    fn module_path(&self, template: TemplateName, module: &ModuleFile) -> PathBuf;

    /// Helper file shared by all generated tests, written verbatim.
    fn test_support(&self) -> &'static str;

    /// Location of the support file relative to the tests directory.
    fn test_support_path(&self) -> &'static str;
}
