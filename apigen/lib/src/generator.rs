//! The generation run: discover, resolve, render, write, declare modules,
//! format.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::GeneratorConfig;
use crate::endpoint::ResolvedEndpoint;
use crate::error::GeneratorError;
use crate::modules::ModuleTree;
use crate::namespace::Namespace;
use crate::output::write_atomic;
use crate::render::{Renderer, RustRenderer, TemplateName};
use crate::spec::{EndpointSpec, discover_spec_files, load_endpoint};

/// One rendered file and where it belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Files rendered for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedEndpoint {
    pub name: String,
    pub namespace: Namespace,
    pub source: GeneratedFile,
    pub test: Option<GeneratedFile>,
}

/// What happened to the formatter step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintOutcome {
    /// Disabled, dry run, or nothing to format.
    Skipped,
    Passed,
    /// The formatter failed; the run still succeeded.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub endpoints: Vec<GeneratedEndpoint>,
    /// `mod.rs` (and test `main.rs`) files declaring the generated modules.
    pub module_files: Vec<GeneratedFile>,
    /// Shared test support file, when tests were generated.
    pub support_file: Option<GeneratedFile>,
    pub lint: LintOutcome,
    pub dry_run: bool,
}

impl GenerationReport {
    /// Every file of the run: endpoint files in generation order, then
    /// module files, support file last.
    pub fn files(&self) -> Vec<&GeneratedFile> {
        self.endpoints
            .iter()
            .flat_map(|e| std::iter::once(&e.source).chain(e.test.iter()))
            .chain(self.module_files.iter())
            .chain(self.support_file.iter())
            .collect()
    }
}

/// Runs generation for one configuration.
///
/// ## Examples
///
/// ```no_run
/// use apigen_lib::{Generator, GeneratorConfig};
///
/// let config = GeneratorConfig::new("rest-api-spec/api", "src/api").with_tests("tests/api");
/// let report = Generator::new(config).run()?;
/// println!("generated {} endpoints", report.endpoints.len());
/// # Ok::<(), apigen_lib::GeneratorError>(())
/// ```
pub struct Generator<R: Renderer = RustRenderer> {
    config: GeneratorConfig,
    renderer: R,
}

impl Generator<RustRenderer> {
    pub fn new(config: GeneratorConfig) -> Self {
        let renderer = RustRenderer::new(config.crate_name.clone());
        Self { config, renderer }
    }
}

impl<R: Renderer> Generator<R> {
    pub fn with_renderer(config: GeneratorConfig, renderer: R) -> Self {
        Self { config, renderer }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Processes every endpoint spec under the input directory.
    ///
    /// Stops at the first failing endpoint. Files already written by earlier
    /// endpoints stay in place; no file is ever left half-written. Formatter
    /// failures are logged and reported, never returned as errors.
    pub fn run(&self) -> Result<GenerationReport, GeneratorError> {
        self.config.validate()?;

        let files = discover_spec_files(&self.config.input_dir)?;
        info!(
            input = %self.config.input_dir.display(),
            specs = files.len(),
            surface = %self.config.surface,
            tests = self.config.generate_tests(),
            dry_run = self.config.dry_run,
            "starting generation"
        );

        let mut endpoints = Vec::with_capacity(files.len());
        let mut source_tree = ModuleTree::new();
        let mut test_tree = self.config.tests_dir.as_ref().map(|_| ModuleTree::new());
        for file in &files {
            let generated = self.generate_file(file, &mut source_tree, test_tree.as_mut())?;
            endpoints.push(generated);
        }

        let mut module_files =
            self.module_files(TemplateName::Source, &self.config.output_dir, &source_tree)?;
        if let (Some(tests_dir), Some(tree)) = (&self.config.tests_dir, &test_tree) {
            module_files.extend(self.module_files(TemplateName::Test, tests_dir, tree)?);
        }
        for file in &module_files {
            self.write(file)?;
        }

        let support_file = match &self.config.tests_dir {
            Some(tests_dir) => {
                let file = GeneratedFile {
                    path: tests_dir.join(self.renderer.test_support_path()),
                    contents: self.renderer.test_support().to_string(),
                };
                self.write(&file)?;
                Some(file)
            }
            None => None,
        };

        let mut report = GenerationReport {
            endpoints,
            module_files,
            support_file,
            lint: LintOutcome::Skipped,
            dry_run: self.config.dry_run,
        };
        report.lint = self.lint(&report);

        info!(
            endpoints = report.endpoints.len(),
            files = report.files().len(),
            "generation finished"
        );
        Ok(report)
    }

    /// Resolves and renders one endpoint without touching the filesystem.
    pub fn generate_endpoint(&self, spec: EndpointSpec) -> Result<GeneratedEndpoint, GeneratorError> {
        let endpoint =
            ResolvedEndpoint::resolve(spec, self.config.surface, &self.config.overrides)?;
        let method = endpoint.namespace.method();

        let source = GeneratedFile {
            path: endpoint.namespace.output_path(
                &self.config.output_dir,
                &self.renderer.file_name(TemplateName::Source, method),
            ),
            contents: self.renderer.render(TemplateName::Source, &endpoint)?,
        };

        let test = match &self.config.tests_dir {
            Some(tests_dir) => Some(GeneratedFile {
                path: endpoint.namespace.output_path(
                    tests_dir,
                    &self.renderer.file_name(TemplateName::Test, method),
                ),
                contents: self.renderer.render(TemplateName::Test, &endpoint)?,
            }),
            None => None,
        };

        Ok(GeneratedEndpoint {
            name: endpoint.spec.name.clone(),
            namespace: endpoint.namespace.clone(),
            source,
            test,
        })
    }

    fn generate_file(
        &self,
        file: &Path,
        source_tree: &mut ModuleTree,
        test_tree: Option<&mut ModuleTree>,
    ) -> Result<GeneratedEndpoint, GeneratorError> {
        let spec = load_endpoint(file)?;
        let generated = self.generate_endpoint(spec)?;

        let method = generated.namespace.method();
        source_tree.insert(
            &generated.namespace,
            &self.renderer.module_name(TemplateName::Source, method),
            true,
        )?;
        if let Some(tree) = test_tree {
            tree.insert(
                &generated.namespace,
                &self.renderer.module_name(TemplateName::Test, method),
                false,
            )?;
        }

        self.write(&generated.source)?;
        if let Some(test) = &generated.test {
            self.write(test)?;
        }

        debug!(
            endpoint = %generated.name,
            source = %generated.source.path.display(),
            "generated endpoint"
        );
        Ok(generated)
    }

    fn module_files(
        &self,
        template: TemplateName,
        root: &Path,
        tree: &ModuleTree,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        tree.files()
            .iter()
            .map(|module| {
                Ok(GeneratedFile {
                    path: root.join(self.renderer.module_path(template, module)),
                    contents: self.renderer.render_module(template, module)?,
                })
            })
            .collect()
    }

    fn write(&self, file: &GeneratedFile) -> Result<(), GeneratorError> {
        if self.config.dry_run {
            debug!(path = %file.path.display(), "dry run, not writing");
            return Ok(());
        }
        write_atomic(&file.path, &file.contents)
    }

    fn lint(&self, report: &GenerationReport) -> LintOutcome {
        let Some(command) = &self.config.lint else {
            return LintOutcome::Skipped;
        };
        if self.config.dry_run || report.endpoints.is_empty() {
            return LintOutcome::Skipped;
        }

        let files: Vec<PathBuf> = report.files().into_iter().map(|f| f.path.clone()).collect();
        match command.run(&files) {
            Ok(()) => LintOutcome::Passed,
            Err(e) => {
                warn!(error = %e, "formatter failed, generated files are left unformatted");
                LintOutcome::Failed(e.to_string())
            }
        }
    }
}
