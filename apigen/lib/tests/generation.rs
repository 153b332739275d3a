//! End-to-end generation over the fixture spec directory.

use std::fs;
use std::path::{Path, PathBuf};

use apigen_lib::{
    ApiSurface, GeneratorConfig, GeneratorError, Generator, LintOutcome, Overrides, RustRenderer,
    Renderer,
};
use syn::{Item, UseTree};
use tempfile::TempDir;

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn relative_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .display()
                .to_string()
        })
        .collect();
    files.sort();
    files
}

#[test]
fn writes_sources_tests_and_support_file() {
    let out = TempDir::new().unwrap();
    let config = GeneratorConfig::new(fixtures().join("api"), out.path().join("src"))
        .with_tests(out.path().join("tests"))
        .with_lint(None);

    let report = Generator::new(config).run().unwrap();

    let names: Vec<_> = report.endpoints.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "indices.create",
            "index",
            "ml.get_jobs",
            "search",
            "tasks.get",
            "termvectors"
        ]
    );
    assert_eq!(report.lint, LintOutcome::Skipped);

    assert_eq!(
        relative_files(&out.path().join("src")),
        vec![
            "indices/create.rs",
            "indices/mod.rs",
            "index.rs",
            "ml/get_jobs.rs",
            "ml/mod.rs",
            "mod.rs",
            "search.rs",
            "tasks/get.rs",
            "tasks/mod.rs",
            "termvectors.rs"
        ]
    );
    assert_eq!(
        relative_files(&out.path().join("tests")),
        vec![
            "indices/create_test.rs",
            "indices/mod.rs",
            "index_test.rs",
            "main.rs",
            "ml/get_jobs_test.rs",
            "ml/mod.rs",
            "search_test.rs",
            "support/mod.rs",
            "tasks/get_test.rs",
            "tasks/mod.rs",
            "termvectors_test.rs"
        ]
    );

    let support = fs::read_to_string(out.path().join("tests/support/mod.rs")).unwrap();
    assert_eq!(support, RustRenderer::default().test_support());
}

#[test]
fn generated_files_parse_as_rust() {
    let out = TempDir::new().unwrap();
    let config = GeneratorConfig::new(fixtures().join("api"), out.path().join("src"))
        .with_tests(out.path().join("tests"))
        .with_lint(None);

    let report = Generator::new(config).run().unwrap();

    for file in report.files() {
        let written = fs::read_to_string(&file.path).unwrap();
        assert_eq!(written, file.contents);
        if let Err(e) = syn::parse_file(&written) {
            panic!("{} does not parse: {e}\n{written}", file.path.display());
        }
    }
}

#[test]
fn extended_surface_relabels_namespaces() {
    let out = TempDir::new().unwrap();
    let config = GeneratorConfig::new(fixtures().join("api"), out.path())
        .with_surface(ApiSurface::Extended)
        .with_lint(None)
        .with_dry_run(true);

    let report = Generator::new(config).run().unwrap();
    let jobs = report
        .endpoints
        .iter()
        .find(|e| e.name == "ml.get_jobs")
        .unwrap();

    assert_eq!(jobs.namespace.modules(), ["xpack", "machine_learning"]);
    assert_eq!(jobs.source.path, out.path().join("machine_learning/get_jobs.rs"));
    assert!(relative_files(out.path()).is_empty());
}

#[test]
fn generated_tests_embed_expected_requests() {
    let out = TempDir::new().unwrap();
    let config = GeneratorConfig::new(fixtures().join("api"), out.path().join("src"))
        .with_tests(out.path().join("tests"))
        .with_crate_name("elasticsearch")
        .with_lint(None);

    Generator::new(config).run().unwrap();

    let index_test: String = fs::read_to_string(out.path().join("tests/index_test.rs"))
        .unwrap()
        .split_whitespace()
        .collect();
    assert!(index_test.contains(r#"Method::Put,"/index/_doc/id")"#));
    assert!(index_test.contains("fnindex_requires_body()"));
    assert!(index_test.contains("fnindex_requires_index()"));

    let tasks_test: String = fs::read_to_string(out.path().join("tests/tasks/get_test.rs"))
        .unwrap()
        .split_whitespace()
        .collect();
    assert!(tasks_test.contains("useelasticsearch::tasks::get;"));
    assert!(!tasks_test.contains("requires_"));
}

#[test]
fn overrides_reach_generated_docs() {
    let out = TempDir::new().unwrap();
    let overrides = Overrides::load(&fixtures().join("overrides.json")).unwrap();
    let config = GeneratorConfig::new(fixtures().join("api"), out.path())
        .with_overrides(overrides)
        .with_lint(None)
        .with_dry_run(true);

    let report = Generator::new(config).run().unwrap();
    let search = report.endpoints.iter().find(|e| e.name == "search").unwrap();

    assert!(search.source.contents.contains("Number of hits to return (default: 10)"));
    assert!(search.source.contents.contains(r#""track_total_hits""#));
}

#[test]
fn failing_formatter_does_not_fail_the_run() {
    let out = TempDir::new().unwrap();
    let config = GeneratorConfig::new(fixtures().join("api"), out.path())
        .with_lint(apigen_lib::LintCommand::parse("apigen-formatter-that-does-not-exist"));

    let report = Generator::new(config).run().unwrap();

    assert!(matches!(report.lint, LintOutcome::Failed(_)));
    assert!(out.path().join("search.rs").exists());
}

#[test]
fn missing_input_directory_is_a_config_error() {
    let out = TempDir::new().unwrap();
    let config = GeneratorConfig::new(out.path().join("nope"), out.path());

    let err = Generator::new(config).run().unwrap_err();
    assert!(matches!(err, GeneratorError::Config(_)));
}

#[test]
fn unresolvable_paths_fail_the_run() {
    let input = TempDir::new().unwrap();
    fs::write(
        input.path().join("cluster.health.json"),
        r#"{ "cluster.health": { "url": { "paths": [
            { "path": "/_cluster/health", "methods": ["GET"] },
            { "path": "/{index}", "methods": ["GET"] }
        ] } } }"#,
    )
    .unwrap();
    let out = TempDir::new().unwrap();
    let config = GeneratorConfig::new(input.path(), out.path()).with_lint(None);

    let err = Generator::new(config).run().unwrap_err();

    assert!(matches!(err, GeneratorError::Path(_)));
    assert!(relative_files(out.path()).is_empty());
}

fn parse_items(file: &Path) -> Vec<Item> {
    let source = fs::read_to_string(file).unwrap();
    syn::parse_file(&source).unwrap().items
}

fn path_attribute(attrs: &[syn::Attribute]) -> Option<String> {
    let attr = attrs.iter().find(|a| a.path().is_ident("path"))?;
    match &attr.meta {
        syn::Meta::NameValue(syn::MetaNameValue {
            value:
                syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(value),
                    ..
                }),
            ..
        }) => Some(value.value()),
        _ => None,
    }
}

/// Follows `mod` declarations from the mod-rs file `root` the way rustc
/// does and returns the file backing the module at `path`.
fn module_file(root: &Path, path: &[String]) -> Option<PathBuf> {
    let mut file = root.to_path_buf();
    let mut dir = root.parent()?.to_path_buf();
    let mut items = parse_items(&file);

    for segment in path {
        let module = items.iter().find_map(|item| match item {
            Item::Mod(module) if module.ident == segment => Some(module.clone()),
            _ => None,
        })?;
        match module.content {
            Some((_, inline)) => {
                dir = dir.join(path_attribute(&module.attrs).unwrap_or_else(|| segment.clone()));
                items = inline;
            }
            None => {
                let flat = dir.join(format!("{segment}.rs"));
                let nested = dir.join(segment).join("mod.rs");
                file = if flat.is_file() {
                    flat
                } else if nested.is_file() {
                    nested
                } else {
                    return None;
                };
                dir = dir.join(segment);
                items = parse_items(&file);
            }
        }
    }
    Some(file)
}

fn use_paths(file: &Path) -> Vec<Vec<String>> {
    fn segments(tree: &UseTree) -> Vec<String> {
        match tree {
            UseTree::Path(path) => {
                let mut names = vec![path.ident.to_string()];
                names.extend(segments(&path.tree));
                names
            }
            UseTree::Name(name) => vec![name.ident.to_string()],
            _ => vec![],
        }
    }
    parse_items(file)
        .into_iter()
        .filter_map(|item| match item {
            Item::Use(item) => Some(segments(&item.tree)),
            _ => None,
        })
        .collect()
}

fn assert_same_file(found: Option<PathBuf>, expected: &Path) {
    let found = found.unwrap_or_else(|| panic!("no module declares {}", expected.display()));
    assert_eq!(
        fs::canonicalize(&found).unwrap(),
        fs::canonicalize(expected).unwrap()
    );
}

#[test]
fn generated_trees_form_one_module_hierarchy() {
    for surface in [ApiSurface::Standard, ApiSurface::Extended] {
        let out = TempDir::new().unwrap();
        let config = GeneratorConfig::new(fixtures().join("api"), out.path().join("src"))
            .with_tests(out.path().join("tests"))
            .with_surface(surface)
            .with_lint(None);

        let report = Generator::new(config).run().unwrap();
        let source_root = out.path().join("src/mod.rs");
        let test_root = out.path().join("tests/main.rs");

        assert_same_file(
            module_file(&test_root, &["support".to_string()]),
            &out.path().join("tests/support/mod.rs"),
        );

        for endpoint in &report.endpoints {
            let test = endpoint.test.as_ref().unwrap();
            let mut test_module = endpoint.namespace.output_dirs().to_vec();
            test_module.push(format!("{}_test", endpoint.namespace.method()));
            assert_same_file(module_file(&test_root, &test_module), &test.path);

            let import = use_paths(&test.path)
                .into_iter()
                .find(|path| path.len() > 1 && path[0] == "client")
                .unwrap();
            assert_eq!(import.last().map(String::as_str), Some(endpoint.namespace.method()));
            assert_same_file(module_file(&source_root, &import[1..]), &endpoint.source.path);

            for path in use_paths(&endpoint.source.path) {
                assert_eq!(path.first().map(String::as_str), Some("crate"));
            }
        }
    }
}
