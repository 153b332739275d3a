//! URL path templates with `{variable}` placeholders.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::PathError;

/// Extracts placeholder names from a path template, in order of appearance.
///
/// ## Examples
///
/// ```
/// use apigen_lib::path_template::extract_path_params;
///
/// assert_eq!(extract_path_params("/_search"), vec![] as Vec<&str>);
/// assert_eq!(extract_path_params("/{index}/_doc/{id}"), vec!["index", "id"]);
/// ```
pub fn extract_path_params(path: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = None;

    for (idx, c) in path.char_indices() {
        if c == '{' {
            start = Some(idx + 1);
        } else if c == '}' {
            if let Some(pos) = start.take() {
                let param = &path[pos..idx];
                if !param.is_empty() && !params.contains(&param) {
                    params.push(param);
                }
            }
        }
    }

    params
}

/// A raw URL template such as `/{index}/_doc/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathTemplate {
    raw: String,
}

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Variable(&'a str),
}

impl PathTemplate {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The template exactly as declared.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Length of the raw template, used to order alternatives.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Placeholder names in order of appearance, without duplicates.
    pub fn variables(&self) -> Vec<&str> {
        extract_path_params(&self.raw)
    }

    /// Splits the template into literal text and variables.
    ///
    /// Braces follow [`extract_path_params`]: a later `{` restarts the
    /// placeholder, and unterminated, unopened or empty (`{}`) braces stay
    /// literal text.
    pub fn segments(&self) -> Vec<Segment<'_>> {
        let raw = self.raw.as_str();
        let mut segments = Vec::new();
        let mut literal_start = 0;
        let mut open = None;

        for (idx, c) in raw.char_indices() {
            if c == '{' {
                open = Some(idx);
            } else if c == '}'
                && let Some(start) = open.take()
                && idx > start + 1
            {
                if start > literal_start {
                    segments.push(Segment::Literal(&raw[literal_start..start]));
                }
                segments.push(Segment::Variable(&raw[start + 1..idx]));
                literal_start = idx + 1;
            }
        }
        if literal_start < raw.len() {
            segments.push(Segment::Literal(&raw[literal_start..]));
        }

        segments
    }

    /// Substitutes every placeholder with its supplied value.
    ///
    /// ## Errors
    ///
    /// Returns [`PathError::MissingVariable`] when a placeholder has no value.
    pub fn substitute(&self, values: &BTreeMap<&str, &str>) -> Result<String, PathError> {
        let mut path = String::with_capacity(self.raw.len());
        for segment in self.segments() {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Variable(name) => {
                    let value = values.get(name).ok_or_else(|| PathError::MissingVariable {
                        template: self.raw.clone(),
                        variable: name.to_string(),
                    })?;
                    path.push_str(value);
                }
            }
        }
        Ok(path)
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for PathTemplate {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}
