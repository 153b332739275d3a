//! Module declaration files that tie generated files into one hierarchy.
//!
//! Every directory of a generated tree gets a module file listing its
//! children. In the source tree, endpoints under the extended marker are
//! declared inside an inline `xpack` module at the root while their files
//! stay where [`Namespace::output_path`] puts them, so
//! `xpack::machine_learning::get_jobs` is backed by
//! `machine_learning/get_jobs.rs`.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::GeneratorError;
use crate::namespace::Namespace;

/// The module file of one generated directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFile {
    /// Directory relative to the tree root; empty for the root.
    pub dir: Vec<String>,
    /// Children backed by a file or directory next to the module file.
    pub children: Vec<String>,
    /// Root children declared inside the inline extended-surface module.
    pub extended: Vec<String>,
}

impl ModuleFile {
    pub fn is_root(&self) -> bool {
        self.dir.is_empty()
    }
}

#[derive(Debug, Default)]
struct Node {
    dirs: BTreeMap<String, Node>,
    files: BTreeSet<String>,
}

impl Node {
    fn is_empty(&self) -> bool {
        self.dirs.is_empty() && self.files.is_empty()
    }
}

/// Directory layout of one generated tree, built up endpoint by endpoint.
///
/// ## Examples
///
/// ```
/// use apigen_lib::modules::ModuleTree;
/// use apigen_lib::{ApiSurface, Namespace};
///
/// let mut tree = ModuleTree::new();
/// let ns = Namespace::resolve("ml.get_jobs", ApiSurface::Extended).unwrap();
/// tree.insert(&ns, "get_jobs", true).unwrap();
///
/// let files = tree.files();
/// assert_eq!(files[0].extended, ["machine_learning"]);
/// assert_eq!(files[1].dir, ["machine_learning"]);
/// assert_eq!(files[1].children, ["get_jobs"]);
/// ```
#[derive(Debug, Default)]
pub struct ModuleTree {
    root: Node,
    extended: BTreeSet<String>,
    plain: BTreeSet<String>,
}

impl ModuleTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the generated file `module` of an endpoint in `namespace`.
    ///
    /// With `wrap_extended`, the root entry of a namespace under the
    /// extended marker is declared inside the inline extended module.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::ModuleConflict`] when the module was already
    /// recorded, when a name is both a file and a directory, or when a root
    /// entry is needed both inside and outside the extended module.
    pub fn insert(
        &mut self,
        namespace: &Namespace,
        module: &str,
        wrap_extended: bool,
    ) -> Result<(), GeneratorError> {
        let dirs = namespace.output_dirs();
        let mut path: Vec<&str> = dirs.iter().map(String::as_str).collect();
        path.push(module);
        let conflict = |depth: usize| GeneratorError::ModuleConflict {
            module: path[..=depth].join("::"),
        };

        if wrap_extended {
            let root_entry = path[0].to_string();
            let (own, other) = if dirs.len() < namespace.modules().len() {
                (&mut self.extended, &self.plain)
            } else {
                (&mut self.plain, &self.extended)
            };
            if other.contains(&root_entry) {
                return Err(conflict(0));
            }
            own.insert(root_entry);
        }

        let mut node = &mut self.root;
        for (depth, dir) in dirs.iter().enumerate() {
            if node.files.contains(dir) {
                return Err(conflict(depth));
            }
            node = node.dirs.entry(dir.clone()).or_default();
        }
        if node.dirs.contains_key(module) || !node.files.insert(module.to_string()) {
            return Err(conflict(dirs.len()));
        }
        Ok(())
    }

    /// One module file per directory, root first. Empty when nothing was
    /// recorded.
    pub fn files(&self) -> Vec<ModuleFile> {
        let mut files = Vec::new();
        if !self.root.is_empty() {
            self.collect(&self.root, &mut Vec::new(), &mut files);
        }
        files
    }

    fn collect(&self, node: &Node, dir: &mut Vec<String>, files: &mut Vec<ModuleFile>) {
        let names: BTreeSet<&String> = node.dirs.keys().chain(node.files.iter()).collect();
        let (extended, children): (Vec<String>, Vec<String>) = names
            .into_iter()
            .cloned()
            .partition(|name| dir.is_empty() && self.extended.contains(name));
        files.push(ModuleFile {
            dir: dir.clone(),
            children,
            extended,
        });

        for (name, child) in &node.dirs {
            dir.push(name.clone());
            self.collect(child, dir, files);
            dir.pop();
        }
    }
}
