//! CLI entry point for depseval.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, logging setup, and exit
//! codes. All business logic lives in the `depseval-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use depseval_app::{
    CheckInput, CheckOutcome, EvalInput, ManifestSource, ValidateInput, parse_report_json,
    render_annotations, render_markdown, run_check, run_eval, run_validate, runtime_error_report,
    serialize_report, to_renderable, verdict_exit_code,
};
use depseval_domain::ConsistencyError;
use depseval_settings::{Overrides, parse_var_assignment};
use depseval_types::DepsevalReport;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "depseval",
    version,
    about = "Sandboxed evaluator, schema validator and consistency checker for DEPS manifests"
)]
struct Cli {
    /// Path to depseval config TOML (a missing file means defaults).
    #[arg(long, global = true, default_value = "depseval.toml")]
    config: Utf8PathBuf,

    /// Override profile (strict|warn|compat).
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Override maximum findings to emit.
    #[arg(long, global = true)]
    max_findings: Option<u32>,

    /// Override a manifest var as name=value (repeatable; True/False become booleans).
    #[arg(long = "var", global = true, value_name = "NAME=VALUE")]
    vars: Vec<String>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute a manifest and print its scope as JSON.
    Eval {
        /// Path to the DEPS manifest.
        manifest: Utf8PathBuf,
    },

    /// Evaluate manifests, run schema and policy checks, and write artifacts.
    Validate {
        /// Paths to DEPS manifests.
        #[arg(required = true)]
        manifests: Vec<Utf8PathBuf>,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/depseval/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/depseval/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Compare a manifest's scope with an expected scope, then validate it.
    Check {
        /// Path to the DEPS manifest.
        manifest: Utf8PathBuf,

        /// JSON file holding the expected scope.
        #[arg(long)]
        expected: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/depseval/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/depseval/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.cmd {
        Commands::Eval { manifest } => cmd_eval(&cli, manifest),
        Commands::Validate {
            manifests,
            report_out,
            write_markdown,
            markdown_out,
        } => cmd_validate(&cli, manifests, report_out, *write_markdown, markdown_out),
        Commands::Check { manifest, expected } => cmd_check(&cli, manifest, expected),
        Commands::Md { report, output } => cmd_md(report, output.as_deref()),
        Commands::Annotations { report, max } => cmd_annotations(report, *max),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("depseval error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// Config text and overrides shared by every evaluating subcommand.
fn load_settings(cli: &Cli) -> anyhow::Result<(String, Overrides)> {
    // Missing config file is allowed (defaults apply).
    let config_text = std::fs::read_to_string(&cli.config).unwrap_or_default();

    let vars = cli
        .vars
        .iter()
        .map(|raw| parse_var_assignment(raw))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let overrides = Overrides {
        profile: cli.profile.clone(),
        max_findings: cli.max_findings,
        vars,
    };
    Ok((config_text, overrides))
}

fn read_text(path: &Utf8Path, what: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read {what}: {path}"))
}

fn cmd_eval(cli: &Cli, manifest: &Utf8Path) -> anyhow::Result<i32> {
    let (config_text, overrides) = load_settings(cli)?;
    let source = read_text(manifest, "manifest")?;

    let scope = run_eval(EvalInput {
        path: manifest.as_str(),
        source: &source,
        config_text: &config_text,
        overrides,
    })?;

    let json = serde_json::to_string_pretty(&scope).context("serialize scope")?;
    println!("{json}");
    Ok(0)
}

fn cmd_validate(
    cli: &Cli,
    manifests: &[Utf8PathBuf],
    report_out: &Utf8Path,
    write_markdown: bool,
    markdown_out: &Utf8Path,
) -> anyhow::Result<i32> {
    let result = (|| -> anyhow::Result<i32> {
        let (config_text, overrides) = load_settings(cli)?;
        let sources = manifests
            .iter()
            .map(|path| -> anyhow::Result<ManifestSource> {
                Ok(ManifestSource {
                    path: path.as_str().to_string(),
                    text: read_text(path, "manifest")?,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let output = run_validate(ValidateInput {
            manifests: &sources,
            config_text: &config_text,
            overrides,
        })?;

        write_report_file(report_out, &output.report).context("write report json")?;

        if write_markdown {
            let md = render_markdown(&to_renderable(&output.report));
            write_text_file(markdown_out, &md).context("write markdown")?;
        }

        Ok(verdict_exit_code(output.report.verdict))
    })();

    result.or_else(|err| {
        let report = runtime_error_report(&format!("{err:#}"));
        if let Err(write_err) = write_report_file(report_out, &report) {
            tracing::warn!(error = %write_err, "could not write runtime error report");
        }
        Err(err)
    })
}

fn cmd_check(cli: &Cli, manifest: &Utf8Path, expected: &Utf8Path) -> anyhow::Result<i32> {
    let (config_text, overrides) = load_settings(cli)?;
    let source = read_text(manifest, "manifest")?;
    let expected_json = read_text(expected, "expected scope")?;

    let outcome = run_check(CheckInput {
        path: manifest.as_str(),
        source: &source,
        expected_json: &expected_json,
        config_text: &config_text,
        overrides,
    })?;

    match outcome {
        CheckOutcome::Passed(scope) => {
            println!("ok: {manifest} ({} names)", scope.len());
            Ok(0)
        }
        CheckOutcome::Failed(ConsistencyError::Mismatch(failure)) => {
            eprintln!("{}", failure.message);
            eprintln!("  path:     {}", failure.path);
            eprintln!("  expected: {}", failure.expected);
            eprintln!("  actual:   {}", failure.actual);
            Ok(2)
        }
        CheckOutcome::Failed(other) => {
            eprintln!("{manifest}: {other}");
            Ok(2)
        }
    }
}

fn write_report_file(path: &Utf8Path, report: &DepsevalReport) -> anyhow::Result<()> {
    let data = serialize_report(report)?;
    write_bytes(path, &data).with_context(|| format!("write report: {path}"))
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    write_bytes(path, text.as_bytes()).with_context(|| format!("write text: {path}"))
}

fn write_bytes(path: &Utf8Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, data)?;
    Ok(())
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<i32> {
    let report = parse_report_json(&read_text(report_path, "report")?)?;
    let md = render_markdown(&to_renderable(&report));

    match output {
        Some(out_path) => write_text_file(out_path, &md).context("write markdown output")?,
        None => print!("{md}"),
    }

    Ok(0)
}

fn cmd_annotations(report_path: &Utf8Path, max: usize) -> anyhow::Result<i32> {
    let report = parse_report_json(&read_text(report_path, "report")?)?;
    for annotation in render_annotations(&to_renderable(&report), max) {
        println!("{annotation}");
    }
    Ok(0)
}
