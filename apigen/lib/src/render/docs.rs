//! Doc comment text for generated endpoint functions.

use crate::endpoint::ResolvedEndpoint;
use crate::selection::PathSelection;
use crate::spec::ParamInfo;

/// Builds the doc comment lines of one endpoint function.
///
/// Each returned line already carries the leading space `prettyplease`
/// keeps after `///`.
pub struct FunctionDocBuilder<'a> {
    endpoint: &'a ResolvedEndpoint,
}

impl<'a> FunctionDocBuilder<'a> {
    pub fn new(endpoint: &'a ResolvedEndpoint) -> Self {
        Self { endpoint }
    }

    pub fn build(&self) -> Vec<String> {
        let mut lines = vec![format!(" {}", self.summary())];

        for section in [
            self.arguments_section(),
            self.query_section(),
            self.routes_section(),
            self.notes_section(),
        ] {
            if !section.is_empty() {
                lines.push(String::new());
                lines.extend(section);
            }
        }

        if let Some(url) = &self.endpoint.spec.documentation.url {
            lines.push(String::new());
            lines.push(format!(" [Documentation]({url})"));
        }

        lines
    }

    fn summary(&self) -> String {
        match &self.endpoint.spec.documentation.description {
            Some(description) if !description.trim().is_empty() => description.trim().to_string(),
            _ => format!("Builds a `{}` request.", self.endpoint.name()),
        }
    }

    fn arguments_section(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for argument in self.endpoint.path_arguments() {
            lines.push(format!(
                " * `{}` - {}",
                argument.name,
                describe(&argument.info, argument.required)
            ));
        }
        if self.endpoint.accepts_body() {
            let description = self
                .endpoint
                .spec
                .body
                .as_ref()
                .and_then(|b| b.description.as_deref())
                .unwrap_or("The request body");
            let required = if self.endpoint.body_required() {
                "*Required* "
            } else {
                ""
            };
            lines.push(format!(" * `body` - {required}{description}"));
        }
        with_heading(" ## Arguments", lines)
    }

    fn query_section(&self) -> Vec<String> {
        let lines = self
            .endpoint
            .params
            .params
            .iter()
            .map(|p| format!(" * `{}` - {}", p.name, describe(&p.info, p.info.required)))
            .collect();
        with_heading(" ## Query parameters", lines)
    }

    fn routes_section(&self) -> Vec<String> {
        let lines = match &self.endpoint.paths {
            PathSelection::Unconditional(template) => vec![format!(" - `{template}`")],
            PathSelection::Conditional { branches, fallback } => {
                let mut lines: Vec<String> = branches
                    .iter()
                    .map(|b| {
                        let given = b
                            .signature
                            .iter()
                            .map(|v| format!("`{v}`"))
                            .collect::<Vec<_>>()
                            .join(", ");
                        format!(" - `{}` when {given} given", b.template)
                    })
                    .collect();
                if let Some(template) = fallback {
                    lines.push(format!(" - `{template}` otherwise"));
                }
                lines
            }
        };
        with_heading(" ## Routes", lines)
    }

    fn notes_section(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(note) = self.endpoint.spec.deprecation_note() {
            lines.push(format!(" **Deprecated**: {note}"));
        }
        match self.endpoint.spec.stability.as_deref() {
            Some("stable") | None => {}
            Some(stability) => {
                if !lines.is_empty() {
                    lines.push(String::new());
                }
                lines.push(format!(
                    " **Stability**: {stability}. This API may change in incompatible ways in a future release."
                ));
            }
        }
        lines
    }
}

fn with_heading(heading: &str, lines: Vec<String>) -> Vec<String> {
    if lines.is_empty() {
        return lines;
    }
    let mut section = vec![heading.to_string(), String::new()];
    section.extend(lines);
    section
}

/// `*Required* (type) description. Options: a, b. Default: x. *Deprecated*`
fn describe(info: &ParamInfo, required: bool) -> String {
    let mut text = String::new();
    if required {
        text.push_str("*Required* ");
    }
    text.push_str(&format!("({}) {}", info.doc_type(), info.description()));
    if let Some(options) = info.options.as_ref().filter(|o| !o.is_empty()) {
        let options = options
            .iter()
            .map(|o| format!("`{o}`"))
            .collect::<Vec<_>>()
            .join(", ");
        text.push_str(&format!(" Options: {options}."));
    }
    if let Some(default) = &info.default {
        let default = match default {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        text.push_str(&format!(" Default: `{default}`."));
    }
    if info.deprecated {
        text.push_str(" *Deprecated*");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Overrides;
    use crate::namespace::ApiSurface;
    use crate::spec::EndpointSpec;

    fn docs(json: &str) -> String {
        let spec = EndpointSpec::from_json_str("test.json", json).unwrap();
        let endpoint =
            ResolvedEndpoint::resolve(spec, ApiSurface::Standard, &Overrides::default()).unwrap();
        FunctionDocBuilder::new(&endpoint).build().join("\n")
    }

    #[test]
    fn documents_arguments_params_and_routes() {
        let text = docs(
            r#"{ "exists": {
                "documentation": { "url": "https://example.test/exists", "description": "Checks a document." },
                "url": { "paths": [ { "path": "/{index}/_doc/{id}", "methods": ["HEAD"],
                    "parts": { "index": { "type": "string", "description": "The index" },
                               "id": { "type": "string", "description": "The id" } } } ] },
                "params": { "refresh": { "type": "enum", "options": ["true", "false", "wait_for"], "default": "false" } }
            } }"#,
        );

        assert!(text.starts_with(" Checks a document."));
        assert!(text.contains(" * `index` - *Required* (string) The index"));
        assert!(text.contains(
            " * `refresh` - (string) No description provided Options: `true`, `false`, `wait_for`. Default: `false`."
        ));
        assert!(text.contains(" - `/{index}/_doc/{id}`"));
        assert!(text.ends_with(" [Documentation](https://example.test/exists)"));
    }

    #[test]
    fn documents_deprecation_and_stability() {
        let text = docs(
            r#"{ "indices.get_type": {
                "stability": "experimental",
                "url": { "paths": [
                    { "path": "/_mapping", "methods": ["GET"] },
                    { "path": "/{index}/_mapping", "methods": ["GET"], "deprecated": "Use get_mapping" }
                ] }
            } }"#,
        );

        assert!(text.contains(" Builds a `indices.get_type` request."));
        assert!(text.contains(" - `/{index}/_mapping` when `index` given"));
        assert!(text.contains(" - `/_mapping` otherwise"));
        assert!(text.contains(" **Deprecated**: Use get_mapping"));
        assert!(text.contains(" **Stability**: experimental."));
    }
}
