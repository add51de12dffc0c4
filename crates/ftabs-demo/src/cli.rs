#![forbid(unsafe_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use ftabs::widgets::text::display_title;
use ftabs::{Config, GroupSummary, LogFormat, RecoveryAction, TabEditor};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{DemoError, Result};
use crate::script::{self, ScriptOp};

#[derive(Debug, Parser)]
#[command(
    name = "ftabs-demo",
    about = "Inspect, create and script tab groups in ftabs markup files",
    version
)]
pub struct Cli {
    /// TOML config with optional [host] and [tabs] sections.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON objects.
    #[cfg(feature = "tracing-json")]
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the tab groups of a markup file.
    Show(ShowArgs),

    /// Write a new document holding one tab group.
    New(NewArgs),

    /// Apply scripted edits to a markup file.
    Edit(EditArgs),
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub file: PathBuf,

    /// Print a JSON report instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Number of tabs in the group.
    #[arg(long, default_value_t = 1)]
    pub tabs: usize,

    /// Tab titles, in order. Missing titles keep the default.
    #[arg(long = "title", value_name = "TITLE")]
    pub titles: Vec<String>,

    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub file: PathBuf,

    /// insert-group | create:G | select:G:T | rename:G:T:TITLE | delete:G:T
    #[arg(long = "op", value_name = "OP", required = true)]
    pub ops: Vec<ScriptOp>,

    #[arg(short, long, value_name = "FILE", conflicts_with = "in_place")]
    pub output: Option<PathBuf>,

    /// Overwrite the input file.
    #[arg(long)]
    pub in_place: bool,
}

#[derive(Debug, Serialize)]
struct ShowReport<'a> {
    file: &'a Path,
    groups: Vec<GroupSummary>,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    ftabs::logging::init(cli.verbose, log_format(&cli));
    let stdout = std::io::stdout();
    run(cli, &mut stdout.lock())
}

fn log_format(cli: &Cli) -> LogFormat {
    #[cfg(feature = "tracing-json")]
    if cli.log_json {
        return LogFormat::Json;
    }
    let _ = cli;
    LogFormat::Compact
}

pub fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Show(args) => run_show(config, &args, out),
        Commands::New(args) => run_new(config, &args, out),
        Commands::Edit(args) => run_edit(config, &args, out),
    }
}

/// Load `path`, falling back to defaults when the file is unusable.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let loaded = Config::from_toml_file(path)
        .and_then(Config::validated)
        .map_err(ftabs::Error::from);
    match loaded {
        Ok(config) => {
            debug!(path = %path.display(), "config loaded");
            Ok(config)
        }
        Err(err) if err.recovery() == RecoveryAction::UseDefaults => {
            warn!(
                path = %path.display(),
                error = %err,
                error_type = err.error_type(),
                "config unusable, using defaults"
            );
            Ok(Config::default())
        }
        Err(err) => Err(err.into()),
    }
}

fn read_editor(config: Config, path: &Path) -> Result<TabEditor> {
    let source = std::fs::read_to_string(path).map_err(|e| DemoError::io(path, e))?;
    Ok(TabEditor::with_markup(config, &source)?)
}

fn write_markup(editor: &TabEditor, target: Option<&Path>, out: &mut impl Write) -> Result<()> {
    let markup = editor.to_markup();
    match target {
        Some(path) => std::fs::write(path, markup + "\n").map_err(|e| DemoError::io(path, e)),
        None => Ok(writeln!(out, "{markup}")?),
    }
}

fn run_show(config: Config, args: &ShowArgs, out: &mut impl Write) -> Result<()> {
    let editor = read_editor(config, &args.file)?;
    let groups = editor.groups();
    if args.json {
        let report = ShowReport {
            file: &args.file,
            groups,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    if groups.is_empty() {
        writeln!(out, "no tab groups")?;
        return Ok(());
    }
    let width = editor.host().extension().config().max_title_width;
    for (index, group) in groups.iter().enumerate() {
        writeln!(out, "group {index} at {}", group.path)?;
        for (ordinal, tab) in group.tabs.iter().enumerate() {
            let marker = if tab.active { '*' } else { ' ' };
            writeln!(
                out,
                "  {marker} {ordinal} {} {}",
                tab.id,
                display_title(&tab.title, width)
            )?;
        }
    }
    Ok(())
}

fn run_new(config: Config, args: &NewArgs, out: &mut impl Write) -> Result<()> {
    if args.tabs == 0 {
        return Err(DemoError::invalid("--tabs must be at least 1"));
    }
    if args.titles.len() > args.tabs {
        return Err(DemoError::invalid(format!(
            "{} titles given for {} tabs",
            args.titles.len(),
            args.tabs
        )));
    }
    let mut editor = TabEditor::new(config);
    let group = editor.insert_tab_group()?;
    for _ in 1..args.tabs {
        editor.create_tab(&group)?;
    }
    for (ordinal, title) in args.titles.iter().enumerate() {
        editor.rename_tab(&group, ordinal, title)?;
    }
    write_markup(&editor, args.output.as_deref(), out)
}

fn run_edit(config: Config, args: &EditArgs, out: &mut impl Write) -> Result<()> {
    let mut editor = read_editor(config, &args.file)?;
    let mut changed = 0usize;
    for op in &args.ops {
        changed += usize::from(script::apply(&mut editor, op)?);
    }
    debug!(ops = args.ops.len(), changed, "script finished");
    let target = if args.in_place {
        Some(args.file.as_path())
    } else {
        args.output.as_deref()
    };
    write_markup(&editor, target, out)
}
