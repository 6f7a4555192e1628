mod commands;
mod core;
mod graph;

use crate::core::context::WorkspaceContext;
use crate::core::error::{RailError, RailResult, print_error};
use crate::graph::AffectedOptions;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt};

/// Find the apps and libs of a monorepo affected by a change
#[derive(Parser)]
#[command(name = "affected-projects")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Workspace root (default: current directory)
  #[arg(long, global = true)]
  root: Option<PathBuf>,

  /// Workspace config file, relative to the root (default: nx.json, affected.toml, .config/affected.toml)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Enable debug logging (RUST_LOG takes precedence)
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Diff base..head with git and show affected projects
  Run {
    #[command(flatten)]
    refs: RefsArgs,
    #[command(flatten)]
    analysis: AnalysisArgs,
    /// Only list the changed files
    #[arg(long)]
    dry_run: bool,
  },

  /// Classify an explicit list of changed files (`-` reads stdin)
  Files {
    /// Changed paths, relative to the workspace root
    #[arg(required = true)]
    files: Vec<String>,
    /// JSON array of project names to leave out of the result
    #[arg(long)]
    ignore: Option<String>,
    #[command(flatten)]
    analysis: AnalysisArgs,
  },

  /// Resolve the base/head pair without diffing
  Refs {
    #[command(flatten)]
    refs: RefsArgs,
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Show discovered apps, libs and implicit dependencies
  Projects {
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },
}

#[derive(Args)]
struct RefsArgs {
  /// Base revision (only used for non pull_request/push events)
  #[arg(long)]
  base: Option<String>,
  /// Head revision (only used for non pull_request/push events)
  #[arg(long)]
  head: Option<String>,
  /// JSON array of project names to leave out of the result
  #[arg(long)]
  ignore: Option<String>,
  /// Trigger kind: pull_request, pull_request_target, push, or anything else
  #[arg(long, env = "GITHUB_EVENT_NAME", default_value = "manual")]
  event_name: String,
  /// JSON event payload carrying the PR or push commit ids
  #[arg(long, env = "GITHUB_EVENT_PATH")]
  event_path: Option<PathBuf>,
}

#[derive(Args)]
struct AnalysisArgs {
  /// Let apps propagate to the projects that declared them as implicit dependencies
  #[arg(long)]
  apps_fan_out: bool,
  /// Follow implicit-dependency fan-out transitively
  #[arg(long)]
  transitive: bool,
  /// Output format: text (default), json, names-only, github
  #[arg(long, default_value = "text")]
  format: String,
  /// Append key=value outputs to this file
  #[arg(long, env = "GITHUB_OUTPUT")]
  github_output: Option<PathBuf>,
}

impl RefsArgs {
  fn into_input(self) -> commands::RefsInput {
    commands::RefsInput {
      event_name: self.event_name,
      event_path: self.event_path,
      base: self.base,
      head: self.head,
      ignore: self.ignore,
    }
  }
}

impl AnalysisArgs {
  fn split(self) -> (AffectedOptions, commands::ReportOptions) {
    (
      AffectedOptions {
        apps_fan_out: self.apps_fan_out,
        transitive: self.transitive,
      },
      commands::ReportOptions {
        format: self.format,
        github_output: self.github_output,
      },
    )
  }
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn init_tracing(verbose: bool) {
  let default_level = if verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  // Logs on stderr; stdout carries results
  fmt()
    .with_env_filter(filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let workspace_root = match cli.root {
    Some(root) => root,
    None => match std::env::current_dir() {
      Ok(dir) => dir,
      Err(e) => {
        eprintln!("Error: Failed to get current directory: {}", e);
        std::process::exit(1);
      }
    },
  };
  let config = cli.config.as_deref();

  let result = match cli.command {
    Commands::Run {
      refs,
      analysis,
      dry_run,
    } => load_context(&workspace_root, config).and_then(|ctx| {
      let (options, report) = analysis.split();
      commands::run_affected(&ctx, refs.into_input(), options, report, dry_run)
    }),
    Commands::Files {
      files,
      ignore,
      analysis,
    } => load_context(&workspace_root, config).and_then(|ctx| {
      let (options, report) = analysis.split();
      commands::run_files(&ctx, files, ignore, options, report)
    }),
    Commands::Refs { refs, json } => commands::run_refs(refs.into_input(), json),
    Commands::Projects { json } => {
      load_context(&workspace_root, config).and_then(|ctx| commands::run_projects(&ctx, json))
    }
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

/// Build the workspace context (config + project listing)
fn load_context(workspace_root: &Path, config: Option<&Path>) -> RailResult<WorkspaceContext> {
  WorkspaceContext::build(workspace_root, config)
}

fn handle_error(err: RailError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
