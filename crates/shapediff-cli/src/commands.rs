use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context};
use colored::Colorize;
use tracing::debug;

use shapediff_diff::Changeset;
use shapediff_types::{Collection, Value};

use crate::cli::*;
use crate::config::RenderConfig;
use crate::output::render_text;

pub fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    match cli.command {
        Command::Diff(args) => cmd_diff(args, cli.format, &config),
        Command::Config(_) => cmd_config(&config),
    }
}

/// Whether a diff found anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiffOutcome {
    Unchanged,
    Changed,
}

impl DiffOutcome {
    /// Process status: 1 for changes under `--exit-code`, otherwise 0.
    pub fn status(self, exit_code: bool) -> u8 {
        match (self, exit_code) {
            (Self::Changed, true) => 1,
            _ => 0,
        }
    }
}

fn cmd_diff(args: DiffArgs, format: OutputFormat, config: &RenderConfig) -> anyhow::Result<ExitCode> {
    let mut stdout = std::io::stdout().lock();
    let outcome = write_diff(&args, format, config, &mut stdout)?;
    Ok(ExitCode::from(outcome.status(args.exit_code)))
}

/// Diff the two files named in `args` and write the result to `out`.
pub fn write_diff(
    args: &DiffArgs,
    format: OutputFormat,
    config: &RenderConfig,
    out: &mut impl Write,
) -> anyhow::Result<DiffOutcome> {
    let changeset = diff_files(&args.old, &args.new)?;
    debug!(changed = changeset.len(), leaves = changeset.leaf_count(), "diff complete");

    match format {
        OutputFormat::Text => writeln!(out, "{}", render_text(&changeset, config))?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&changeset)?)?,
    }

    Ok(if changeset.is_empty() {
        DiffOutcome::Unchanged
    } else {
        DiffOutcome::Changed
    })
}

fn cmd_config(config: &RenderConfig) -> anyhow::Result<ExitCode> {
    println!("{}", "# effective render configuration".dimmed());
    print!("{}", config.to_toml()?);
    Ok(ExitCode::SUCCESS)
}

/// Load both documents and compare them.
pub fn diff_files(old: &Path, new: &Path) -> anyhow::Result<Changeset> {
    let old_doc = load_collection(old)?;
    let new_doc = load_collection(new)?;
    Changeset::new(&old_doc, &new_doc).with_context(|| {
        format!(
            "{} and {} do not have the same top-level keys",
            old.display(),
            new.display()
        )
    })
}

/// Read a JSON document whose top level is an object or array.
pub fn load_collection(path: &Path) -> anyhow::Result<Collection> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing {} as JSON", path.display()))?;
    match Value::from(json) {
        Value::Collection(c) => Ok(c),
        other => bail!(
            "{}: top-level value must be an object or array, got {}",
            path.display(),
            other.category()
        ),
    }
}
