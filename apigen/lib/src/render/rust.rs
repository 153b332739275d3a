//! Rust client functions and test stubs.
//!
//! Generated sources live inside the client crate and import a small runtime
//! surface from its root with `use crate::{…}`:
//!
//! - `Method` with one variant per HTTP method
//! - `Params` with `only(&[&str]) -> Params`
//! - `Body`, convertible from `&str`
//! - `RequestParts::new(method, path, params, body)` with public `method`
//!   and `path` fields
//! - `Error::missing_argument(&str)` and `Error::no_matching_path(&str)`
//! - `escape(&str)`, percent-encoding one path segment
//!
//! The source root module is mounted from the crate root and re-exported,
//! e.g. `mod api; pub use api::*;`, so `<crate>::indices::create` names the
//! generated function. The test tree root is `main.rs`, which Cargo builds as
//! an integration test that imports from the client crate by name.
//!
//! ## Generated source
//!
//! ```ignore
//! pub const VALID_PARAMS: &[&str] = &["routing", "version"];
//!
//! pub fn get(index: Option<&str>, id: Option<&str>, params: &Params) -> Result<RequestParts, Error> {
//!     if index.is_none() {
//!         return Err(Error::missing_argument("index"));
//!     }
//!     let method = Method::Get;
//!     let path = {
//!         let Some(index) = index else { return Err(Error::missing_argument("index")); };
//!         let Some(id) = id else { return Err(Error::missing_argument("id")); };
//!         format!("/{}/_doc/{}", escape(index), escape(id))
//!     };
//!     Ok(RequestParts::new(method, path, params.only(VALID_PARAMS), None))
//! }
//! ```

use std::path::PathBuf;

use proc_macro2::{Ident, Span, TokenStream};
use quote::{format_ident, quote};

use crate::config::DEFAULT_CRATE_NAME;
use crate::endpoint::{PathArgument, ResolvedEndpoint};
use crate::error::GeneratorError;
use crate::method::{CallerInput, HttpMethod, MethodSelection};
use crate::modules::ModuleFile;
use crate::namespace::EXTENDED_MARKER;
use crate::output::render_tokens;
use crate::params::BODY;
use crate::path_template::{PathTemplate, Segment};
use crate::render::docs::FunctionDocBuilder;
use crate::render::{Renderer, TemplateName};
use crate::selection::PathSelection;

const TEST_SUPPORT: &str = include_str!("../../assets/test_support.rs");

const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe",
    "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const RESERVED: &[&str] = &["crate", "self", "Self", "super", "_"];

/// Replaces characters that cannot appear in an identifier with `_`.
pub fn sanitize(name: &str) -> String {
    let mut sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if sanitized.is_empty() || sanitized.starts_with(|c: char| c.is_ascii_digit()) {
        sanitized.insert(0, '_');
    }
    sanitized
}

/// Identifier for `name`, raw (`r#type`) when it is a keyword.
pub fn ident(name: &str) -> Ident {
    let name = sanitize(name);
    if RESERVED.contains(&name.as_str()) {
        format_ident!("{}_", name)
    } else if RUST_KEYWORDS.contains(&name.as_str()) {
        Ident::new_raw(&name, Span::call_site())
    } else {
        Ident::new(&name, Span::call_site())
    }
}

fn method_variant(method: HttpMethod) -> Ident {
    format_ident!("{}", method.variant_name())
}

/// Renders endpoints as Rust functions returning request parts.
#[derive(Debug, Clone)]
pub struct RustRenderer {
    crate_name: String,
}

impl Default for RustRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_CRATE_NAME)
    }
}

impl RustRenderer {
    pub fn new(crate_name: impl Into<String>) -> Self {
        Self {
            crate_name: crate_name.into(),
        }
    }

    /// Tokens of the client function file.
    pub fn source_tokens(&self, endpoint: &ResolvedEndpoint) -> TokenStream {
        let name = endpoint.name();
        let fn_name = ident(endpoint.namespace.method());
        let arguments = endpoint.path_arguments();
        let accepts_body = endpoint.accepts_body();

        let imports = self.source_imports(endpoint);
        let module_doc = format!(" Request builder for the `{name}` endpoint.");
        let valid_params_doc = format!(" Query parameters `{name}` accepts.");
        let valid_params: Vec<&str> = endpoint.params.params.iter().map(|p| p.name.as_str()).collect();
        let docs = FunctionDocBuilder::new(endpoint).build();

        let arg_idents: Vec<Ident> = arguments.iter().map(|a| ident(&a.name)).collect();
        let body_param = if accepts_body {
            quote! { body: Option<Body>, }
        } else {
            quote! {}
        };
        let body_value = if accepts_body {
            quote! { body }
        } else {
            quote! { None }
        };

        let required_checks = required_checks(endpoint, &arguments);
        let method_expr = method_tokens(&endpoint.method, &arguments);
        let path_expr = path_tokens(name, &endpoint.paths);

        quote! {
            #![doc = #module_doc]

            use crate::{#(#imports),*};

            #[doc = #valid_params_doc]
            pub const VALID_PARAMS: &[&str] = &[#(#valid_params),*];

            #(#[doc = #docs])*
            pub fn #fn_name(
                #(#arg_idents: Option<&str>,)*
                #body_param
                params: &Params,
            ) -> Result<RequestParts, Error> {
                #(#required_checks)*
                let method = #method_expr;
                let path = #path_expr;
                Ok(RequestParts::new(method, path, params.only(VALID_PARAMS), #body_value))
            }
        }
    }

    /// Tokens of the test stub file.
    pub fn test_tokens(&self, endpoint: &ResolvedEndpoint) -> Result<TokenStream, GeneratorError> {
        let name = endpoint.name();
        let krate = ident(&self.crate_name);
        let method_name = endpoint.namespace.method();
        let fn_name = ident(method_name);
        let modules: Vec<Ident> = endpoint.namespace.modules().iter().map(|m| ident(m)).collect();
        let arguments = endpoint.path_arguments();
        let accepts_body = endpoint.accepts_body();

        let (expected_method, expected_path) =
            endpoint
                .expected_call()
                .map_err(|e| GeneratorError::Render {
                    endpoint: name.to_string(),
                    template: TemplateName::Test.to_string(),
                    reason: e.to_string(),
                })?;
        let expected_method = method_variant(expected_method);

        let call = |omit: Option<&str>| {
            let args = arguments.iter().map(|a| {
                if omit == Some(a.name.as_str()) {
                    quote! { None }
                } else {
                    let value = a.name.as_str();
                    quote! { Some(#value) }
                }
            });
            let body = match (accepts_body, omit == Some(BODY)) {
                (false, _) => quote! {},
                (true, true) => quote! { None, },
                (true, false) => quote! { Some("{}".into()), },
            };
            quote! { #fn_name(#(#args,)* #body &Params::default()) }
        };

        let stem = sanitize(method_name);
        let builds_test = format_ident!("{}_builds_request_with_all_arguments", stem);
        let full_call = call(None);

        let missing: Vec<&str> = endpoint
            .params
            .required
            .iter()
            .map(String::as_str)
            .filter(|r| {
                (*r == BODY && accepts_body) || arguments.iter().any(|a| a.name == *r)
            })
            .collect();
        let missing_tests = missing.iter().map(|&argument| {
            let test_name = format_ident!("{}_requires_{}", stem, sanitize(argument));
            let partial_call = call(Some(argument));
            quote! {
                #[test]
                fn #test_name() {
                    assert_missing_argument!(#partial_call, #argument);
                }
            }
        });

        let support_imports = if missing.is_empty() {
            quote! { assert_request }
        } else {
            quote! { assert_missing_argument, assert_request }
        };
        let module_doc = format!(" Generated tests for the `{name}` endpoint.");

        Ok(quote! {
            #![doc = #module_doc]

            use crate::support::{#support_imports};
            use #krate::#(#modules::)*#fn_name;
            use #krate::{Method, Params};

            #[test]
            fn #builds_test() {
                assert_request!(#full_call, Method::#expected_method, #expected_path);
            }

            #(#missing_tests)*
        })
    }

    /// Tokens of a directory's module file.
    ///
    /// Source modules are public; at the source root, extended entries are
    /// declared inside an inline marker module whose `#[path = "."]` keeps
    /// their files at the root. The test root also declares `support`.
    pub fn module_tokens(&self, template: TemplateName, module: &ModuleFile) -> TokenStream {
        let children: Vec<Ident> = module.children.iter().map(|c| ident(c)).collect();
        let scope = if module.is_root() {
            "the generated API".to_string()
        } else {
            format!("`{}`", module.dir.join("::"))
        };

        match template {
            TemplateName::Source => {
                let doc = format!(" Endpoint modules of {scope}.");
                let extended = (!module.extended.is_empty()).then(|| {
                    let marker = ident(EXTENDED_MARKER);
                    let entries = module.extended.iter().map(|e| ident(e));
                    quote! {
                        #[path = "."]
                        pub mod #marker {
                            #(pub mod #entries;)*
                        }
                    }
                });
                quote! {
                    #![doc = #doc]

                    #(pub mod #children;)*
                    #extended
                }
            }
            TemplateName::Test => {
                let doc = format!(" Generated tests for {scope}.");
                let support = module.is_root().then(|| quote! { mod support; });
                quote! {
                    #![doc = #doc]

                    #support
                    #(mod #children;)*
                }
            }
        }
    }

    fn source_imports(&self, endpoint: &ResolvedEndpoint) -> Vec<Ident> {
        let mut imports = Vec::new();
        if endpoint.accepts_body() {
            imports.push(format_ident!("Body"));
        }
        imports.extend(["Error", "Method", "Params", "RequestParts"].map(|i| format_ident!("{}", i)));
        let uses_variables = endpoint
            .paths
            .templates()
            .iter()
            .any(|t| !t.variables().is_empty());
        if uses_variables {
            imports.push(format_ident!("escape"));
        }
        imports
    }
}

impl Renderer for RustRenderer {
    fn render(
        &self,
        template: TemplateName,
        endpoint: &ResolvedEndpoint,
    ) -> Result<String, GeneratorError> {
        let tokens = match template {
            TemplateName::Source => self.source_tokens(endpoint),
            TemplateName::Test => self.test_tokens(endpoint)?,
        };
        render_tokens(endpoint.name(), &tokens)
    }

    fn module_name(&self, template: TemplateName, method: &str) -> String {
        let stem = sanitize(method);
        match template {
            TemplateName::Source => stem,
            TemplateName::Test => format!("{stem}_test"),
        }
    }

    fn file_name(&self, template: TemplateName, method: &str) -> String {
        format!("{}.rs", self.module_name(template, method))
    }

    fn render_module(
        &self,
        template: TemplateName,
        module: &ModuleFile,
    ) -> Result<String, GeneratorError> {
        let label = if module.is_root() {
            format!("{template} root module")
        } else {
            format!("{template} module {}", module.dir.join("::"))
        };
        render_tokens(&label, &self.module_tokens(template, module))
    }

    fn module_path(&self, template: TemplateName, module: &ModuleFile) -> PathBuf {
        let mut path: PathBuf = module.dir.iter().collect();
        path.push(match template {
            TemplateName::Test if module.is_root() => "main.rs",
            _ => "mod.rs",
        });
        path
    }

    fn test_support(&self) -> &'static str {
        TEST_SUPPORT
    }

    fn test_support_path(&self) -> &'static str {
        "support/mod.rs"
    }
}

fn required_checks(endpoint: &ResolvedEndpoint, arguments: &[PathArgument]) -> Vec<TokenStream> {
    endpoint
        .params
        .required
        .iter()
        .filter_map(|required| {
            let target = if required == BODY {
                endpoint.accepts_body().then(|| format_ident!("body"))
            } else {
                arguments
                    .iter()
                    .any(|a| &a.name == required)
                    .then(|| ident(required))
            }?;
            let name = required.as_str();
            Some(quote! {
                if #target.is_none() {
                    return Err(Error::missing_argument(#name));
                }
            })
        })
        .collect()
}

fn method_tokens(selection: &MethodSelection, arguments: &[PathArgument]) -> TokenStream {
    match selection {
        MethodSelection::Fixed(method) => {
            let variant = method_variant(*method);
            quote! { Method::#variant }
        }
        MethodSelection::WhenSupplied {
            input,
            then,
            otherwise,
        } => {
            let then = method_variant(*then);
            let otherwise = method_variant(*otherwise);
            let supplied = match input {
                CallerInput::Variable(name) if arguments.iter().any(|a| &a.name == name) => {
                    let arg = ident(name);
                    quote! { #arg.is_some() }
                }
                CallerInput::Variable(_) => return quote! { Method::#otherwise },
                CallerInput::Body => quote! { body.is_some() },
            };
            quote! {
                if #supplied { Method::#then } else { Method::#otherwise }
            }
        }
    }
}

/// `format!` call (or string literal) producing a template's path. Variables
/// must already be bound as `&str`.
fn format_tokens(template: &PathTemplate) -> TokenStream {
    let mut fmt = String::new();
    let mut args = Vec::new();
    for segment in template.segments() {
        match segment {
            Segment::Literal(text) => fmt.push_str(&text.replace('{', "{{").replace('}', "}}")),
            Segment::Variable(name) => {
                fmt.push_str("{}");
                args.push(ident(name));
            }
        }
    }

    if args.is_empty() {
        let raw = template.as_str();
        quote! { #raw.to_string() }
    } else {
        quote! { format!(#fmt, #(escape(#args)),*) }
    }
}

/// Statements unwrapping every variable of `template`, followed by the path
/// expression.
fn unwrap_and_format(template: &PathTemplate) -> TokenStream {
    let lets = template.variables().into_iter().map(|name| {
        let var = ident(name);
        quote! {
            let Some(#var) = #var else {
                return Err(Error::missing_argument(#name));
            };
        }
    });
    let path = format_tokens(template);
    quote! {
        #(#lets)*
        #path
    }
}

/// Path expression for an unconditional template.
fn bound_tokens(template: &PathTemplate) -> TokenStream {
    if template.variables().is_empty() {
        return format_tokens(template);
    }
    let body = unwrap_and_format(template);
    quote! {
        { #body }
    }
}

fn path_tokens(endpoint: &str, selection: &PathSelection) -> TokenStream {
    match selection {
        PathSelection::Unconditional(template) => bound_tokens(template),
        PathSelection::Conditional { branches, fallback } => {
            let arms = branches.iter().enumerate().map(|(idx, branch)| {
                let vars: Vec<Ident> = branch.signature.iter().map(|v| ident(v)).collect();
                let pattern = match vars.as_slice() {
                    [single] => quote! { Some(#single) = #single },
                    _ => quote! { (#(Some(#vars)),*) = (#(#vars),*) },
                };
                let path = format_tokens(&branch.template);
                let keyword = if idx == 0 { quote! { if } } else { quote! { else if } };
                quote! {
                    #keyword let #pattern {
                        #path
                    }
                }
            });
            let otherwise = match fallback {
                Some(template) => unwrap_and_format(template),
                None => quote! {
                    return Err(Error::no_matching_path(#endpoint));
                },
            };
            quote! {
                #(#arms)* else { #otherwise }
            }
        }
    }
}
