//! apigen - generate REST API client modules from JSON endpoint specs.

mod output;

use std::io::IsTerminal;
use std::path::PathBuf;

use apigen_lib::config::DEFAULT_CRATE_NAME;
use apigen_lib::{ApiSurface, Generator, GeneratorConfig, LintCommand, Overrides};
use clap::Parser;
use color_eyre::eyre::{Context, Result};
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Generate REST API client modules and test stubs from JSON endpoint specs
#[derive(Parser, Debug)]
#[command(name = "apigen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory of endpoint spec files (one JSON document per endpoint)
    #[arg(short, long, env = "APIGEN_INPUT", default_value = "rest-api-spec/api")]
    input: PathBuf,

    /// Directory generated client modules are written to
    #[arg(short, long, env = "APIGEN_OUTPUT", default_value = "src/api")]
    output: PathBuf,

    /// Also generate test stubs
    #[arg(long)]
    tests: bool,

    /// Directory generated test stubs are written to
    #[arg(long, env = "APIGEN_TESTS_OUTPUT", default_value = "tests/api")]
    tests_output: PathBuf,

    /// Generate the extended (xpack) API surface
    #[arg(long)]
    xpack: bool,

    /// JSON file with per-endpoint parameter overrides
    #[arg(long, env = "APIGEN_OVERRIDES")]
    overrides: Option<PathBuf>,

    /// Client crate name that generated tests import from
    #[arg(long, env = "APIGEN_CRATE_NAME", default_value = DEFAULT_CRATE_NAME)]
    crate_name: String,

    /// Skip running the formatter over generated files
    #[arg(long)]
    no_lint: bool,

    /// Formatter command run over generated files
    #[arg(
        long,
        env = "APIGEN_LINT_COMMAND",
        conflicts_with = "no_lint",
        value_parser = parse_lint_command
    )]
    lint_command: Option<LintCommand>,

    /// Print generated code without writing files
    #[arg(long)]
    dry_run: bool,

    /// Increase verbosity (-v prints the output tree, -vv also prints sources)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> Result<GeneratorConfig> {
        let mut config = GeneratorConfig::new(self.input, self.output)
            .with_surface(if self.xpack {
                ApiSurface::Extended
            } else {
                ApiSurface::Standard
            })
            .with_crate_name(self.crate_name)
            .with_dry_run(self.dry_run);

        if self.tests {
            config = config.with_tests(self.tests_output);
        }

        if let Some(path) = &self.overrides {
            let overrides = Overrides::load(path)
                .wrap_err_with(|| format!("failed to load overrides from {}", path.display()))?;
            config = config.with_overrides(overrides);
        }

        let lint = if self.no_lint {
            None
        } else {
            Some(self.lint_command.unwrap_or_default())
        };

        Ok(config.with_lint(lint))
    }
}

/// An empty command is rejected; `--no-lint` is the way to skip formatting.
fn parse_lint_command(value: &str) -> Result<LintCommand, String> {
    LintCommand::parse(value).ok_or_else(|| {
        "formatter command must not be empty (use --no-lint to skip formatting)".to_string()
    })
}

/// Initializes the tracing subscriber; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,apigen_lib=info".to_string(),
            2 => "info,apigen_lib=debug".to_string(),
            _ => "debug,apigen_lib=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_file(verbose >= 3)
                .with_line_number(verbose >= 3)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!(?cli, "parsed arguments");

    let verbose = cli.verbose;
    let color = std::io::stdout().is_terminal();
    let config = cli.into_config()?;

    let generator = Generator::new(config);
    let report = generator.run().wrap_err("code generation failed")?;
    let config = generator.config();

    if verbose >= 2 || report.dry_run {
        output::print_sources(&report, color)?;
    }
    if verbose >= 1 {
        output::print_tree(&config.output_dir, &report, color);
        if let Some(tests_dir) = &config.tests_dir {
            output::print_tree(tests_dir, &report, color);
        }
    }
    output::print_summary(&report, color);

    Ok(())
}
