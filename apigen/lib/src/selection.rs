//! Path selection: which URL template a call uses, decided by which path
//! variables the caller supplied.
//!
//! The result is data, not code. A [`PathSelection`] is either a single
//! template or an ordered branch list plus an optional fallback, so any
//! renderer can print it as an `if`/`else if`/`else` chain and
//! [`PathSelection::select`] can evaluate it directly.
//!
//! ## Resolution
//!
//! 1. A single alternative is used unconditionally.
//! 2. Otherwise alternatives are stable-sorted by raw template length,
//!    longest first.
//! 3. Each alternative's signature is its ordered placeholder list. An
//!    alternative whose signature equals the one emitted immediately before
//!    it is skipped.
//! 4. The first emitted alternative opens the chain. An alternative with an
//!    empty signature, or the last one walked, becomes the fallback. Anything
//!    emitted after the fallback is unreachable and reported as
//!    [`PathError::UnresolvablePathSignature`].

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, trace};

use crate::error::PathError;
use crate::exceptions;
use crate::path_template::PathTemplate;
use crate::spec::PathAlternative;

/// Prefix marking a variable as caller-supplied in rendered conditions.
pub const SUPPLIED_MARKER: char = '_';

/// A conditional branch: taken when every variable in `signature` was
/// supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathBranch {
    pub signature: Vec<String>,
    pub template: PathTemplate,
}

impl PathBranch {
    pub fn new(template: impl Into<String>) -> Self {
        let template = PathTemplate::new(template);
        let signature = template.variables().into_iter().map(str::to_string).collect();
        Self {
            signature,
            template,
        }
    }

    /// Condition as marker names, e.g. `_index && _id`.
    pub fn condition(&self) -> String {
        self.signature
            .iter()
            .map(|v| format!("{SUPPLIED_MARKER}{v}"))
            .collect::<Vec<_>>()
            .join(" && ")
    }

    fn matches(&self, supplied: &impl Fn(&str) -> bool) -> bool {
        self.signature.iter().all(|v| supplied(v))
    }
}

/// Structured outcome of path resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSelection {
    /// One template, no branching.
    Unconditional(PathTemplate),
    /// Branches tried in order, then the fallback if any.
    Conditional {
        branches: Vec<PathBranch>,
        fallback: Option<PathTemplate>,
    },
}

impl PathSelection {
    pub fn is_conditional(&self) -> bool {
        matches!(self, Self::Conditional { .. })
    }

    /// Every template the selection can produce, in evaluation order.
    pub fn templates(&self) -> Vec<&PathTemplate> {
        match self {
            Self::Unconditional(template) => vec![template],
            Self::Conditional { branches, fallback } => branches
                .iter()
                .map(|b| &b.template)
                .chain(fallback.iter())
                .collect(),
        }
    }

    /// Picks the template for a call.
    pub fn choose(&self, supplied: impl Fn(&str) -> bool) -> Option<&PathTemplate> {
        match self {
            Self::Unconditional(template) => Some(template),
            Self::Conditional { branches, fallback } => branches
                .iter()
                .find(|b| b.matches(&supplied))
                .map(|b| &b.template)
                .or(fallback.as_ref()),
        }
    }

    /// Picks the template for the supplied values and substitutes them.
    ///
    /// ## Errors
    ///
    /// [`PathError::NoMatchingPath`] when no branch matches and there is no
    /// fallback; [`PathError::MissingVariable`] when the chosen template needs
    /// a value that was not supplied.
    pub fn select(&self, values: &BTreeMap<&str, &str>) -> Result<String, PathError> {
        let template = self
            .choose(|name| values.contains_key(name))
            .ok_or_else(|| PathError::NoMatchingPath {
                supplied: values.keys().map(|k| k.to_string()).collect(),
            })?;
        template.substitute(values)
    }
}

impl fmt::Display for PathSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconditional(template) => write!(f, "{template}"),
            Self::Conditional { branches, fallback } => {
                for (idx, branch) in branches.iter().enumerate() {
                    let keyword = if idx == 0 { "if" } else { "elif" };
                    writeln!(f, "{keyword} {} => {}", branch.condition(), branch.template)?;
                }
                match fallback {
                    Some(template) => write!(f, "else => {template}"),
                    None => write!(f, "else => <no path>"),
                }
            }
        }
    }
}

/// Resolves the path selection for an endpoint, consulting the exception
/// table first.
pub fn resolve_paths(
    endpoint: &str,
    alternatives: &[PathAlternative],
) -> Result<PathSelection, PathError> {
    if let Some(selection) = exceptions::path_selection_for(endpoint) {
        debug!(endpoint, "using fixed path selection from exception table");
        return Ok(selection);
    }
    build_selection(endpoint, alternatives)
}

/// Builds a selection with the general algorithm only.
pub fn build_selection(
    endpoint: &str,
    alternatives: &[PathAlternative],
) -> Result<PathSelection, PathError> {
    match alternatives {
        [] => return Err(PathError::NoAlternatives(endpoint.to_string())),
        [only] => return Ok(PathSelection::Unconditional(only.template.clone())),
        _ => {}
    }

    let mut sorted: Vec<&PathTemplate> = alternatives.iter().map(|a| &a.template).collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()));

    let last = sorted.len() - 1;
    let mut previous: Option<Vec<&str>> = None;
    let mut branches: Vec<PathBranch> = Vec::new();
    let mut fallback: Option<PathTemplate> = None;

    for (idx, template) in sorted.into_iter().enumerate() {
        let signature = template.variables();
        if previous.as_ref() == Some(&signature) {
            trace!(endpoint, template = %template, "skipping duplicate signature");
            continue;
        }

        if let Some(taken) = &fallback {
            return Err(PathError::UnresolvablePathSignature {
                endpoint: endpoint.to_string(),
                template: template.to_string(),
                fallback: taken.to_string(),
            });
        }

        let opens_chain = branches.is_empty();
        if signature.is_empty() || (idx == last && !opens_chain) {
            fallback = Some(template.clone());
        } else {
            branches.push(PathBranch {
                signature: signature.iter().map(|v| v.to_string()).collect(),
                template: template.clone(),
            });
        }
        previous = Some(signature);
    }

    let selection = match (branches.len(), fallback) {
        (0, Some(template)) => PathSelection::Unconditional(template),
        (1, None) => {
            let branch = branches.remove(0);
            PathSelection::Unconditional(branch.template)
        }
        (_, fallback) => PathSelection::Conditional { branches, fallback },
    };
    trace!(endpoint, selection = %selection, "resolved path selection");
    Ok(selection)
}
