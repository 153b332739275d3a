//! Terminal presentation of a generation report.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use apigen_lib::{GeneratedFile, GenerationReport, LintOutcome};
use color_eyre::eyre::{Result, eyre};
use owo_colors::OwoColorize;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::{LinesWithEndings, as_24_bit_terminal_escaped};
use walkdir::WalkDir;

const THEME: &str = "base16-ocean.dark";

/// Highlights Rust source with 24-bit terminal escapes.
pub fn highlight_rust(code: &str) -> Result<String> {
    let syntax_set = SyntaxSet::load_defaults_newlines();
    let theme_set = ThemeSet::load_defaults();
    let syntax = syntax_set
        .find_syntax_by_extension("rs")
        .unwrap_or_else(|| syntax_set.find_syntax_plain_text());
    let theme = theme_set
        .themes
        .get(THEME)
        .ok_or_else(|| eyre!("syntax theme '{THEME}' is not available"))?;

    let mut hl = HighlightLines::new(syntax, theme);
    let mut output = String::with_capacity(code.len() * 2);
    for line in LinesWithEndings::from(code) {
        let ranges = hl
            .highlight_line(line, &syntax_set)
            .map_err(|e| eyre!("syntax highlighting failed: {e}"))?;
        output.push_str(&as_24_bit_terminal_escaped(&ranges, false));
    }
    output.push_str("\x1b[0m");
    Ok(output)
}

/// Prints every generated file with a header, highlighted when `color` is set.
pub fn print_sources(report: &GenerationReport, color: bool) -> Result<()> {
    for file in report.files() {
        print_file(file, color)?;
    }
    Ok(())
}

fn print_file(file: &GeneratedFile, color: bool) -> Result<()> {
    let header = format!("── {} ", file.path.display());
    if color {
        println!("{}", header.bold());
        println!("{}", highlight_rust(&file.contents)?);
    } else {
        println!("{header}");
        println!("{}", file.contents);
    }
    Ok(())
}

/// Lists files under `root` as an indented tree.
///
/// In a dry run nothing exists on disk, so the tree is built from the report.
pub fn print_tree(root: &Path, report: &GenerationReport, color: bool) {
    let files: Vec<PathBuf> = if report.dry_run {
        report
            .files()
            .into_iter()
            .filter_map(|f| f.path.strip_prefix(root).ok().map(Path::to_path_buf))
            .collect()
    } else {
        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| e.path().strip_prefix(root).ok().map(Path::to_path_buf))
            .collect()
    };

    let title = root.display().to_string();
    if color {
        println!("{}", title.bold());
    } else {
        println!("{title}");
    }
    for line in tree_lines(&files) {
        if color && line.is_dir {
            println!("{}{}", line.prefix, line.name.blue().bold());
        } else {
            println!("{}{}", line.prefix, line.name);
        }
    }
}

/// Final status line for the run.
pub fn print_summary(report: &GenerationReport, color: bool) {
    let verb = if report.dry_run { "rendered" } else { "generated" };
    let summary = format!(
        "{verb} {} endpoints ({} files)",
        report.endpoints.len(),
        report.files().len()
    );
    let lint = match &report.lint {
        LintOutcome::Skipped => None,
        LintOutcome::Passed => Some("formatted".to_string()),
        LintOutcome::Failed(reason) => Some(format!("formatter failed: {reason}")),
    };

    if color {
        println!("{}", summary.green());
        if let Some(lint) = lint {
            println!("{}", lint.dimmed());
        }
    } else {
        println!("{summary}");
        if let Some(lint) = lint {
            println!("{lint}");
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct TreeLine {
    prefix: String,
    name: String,
    is_dir: bool,
}

#[derive(Default)]
struct Node {
    children: BTreeMap<String, Node>,
}

fn tree_lines(files: &[PathBuf]) -> Vec<TreeLine> {
    let mut root = Node::default();
    for file in files {
        let mut node = &mut root;
        for component in file.components() {
            let name = component.as_os_str().to_string_lossy().into_owned();
            node = node.children.entry(name).or_default();
        }
    }

    let mut lines = Vec::new();
    walk(&root, "", &mut lines);
    lines
}

fn walk(node: &Node, indent: &str, lines: &mut Vec<TreeLine>) {
    let count = node.children.len();
    for (idx, (name, child)) in node.children.iter().enumerate() {
        let last = idx + 1 == count;
        let branch = if last { "└── " } else { "├── " };
        lines.push(TreeLine {
            prefix: format!("{indent}{branch}"),
            name: name.clone(),
            is_dir: !child.children.is_empty(),
        });
        let next = format!("{indent}{}", if last { "    " } else { "│   " });
        walk(child, &next, lines);
    }
}
