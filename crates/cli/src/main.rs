mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use bp2build_lib::plan::CodegenMode;

use crate::cmd::{cmd_check, cmd_generate};
use crate::output::{OutputFormat, print_error};

/// bp2build - convert a build-module graph into Bazel build files
#[derive(Parser)]
#[command(name = "bp2build")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Convert the module graph and write the output trees
  Generate {
    #[command(flatten)]
    inputs: InputArgs,

    /// Remove previously generated files before writing
    #[arg(long)]
    clean: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
  },

  /// Report whether the output trees are up to date, without writing
  Check {
    #[command(flatten)]
    inputs: InputArgs,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
  },
}

/// Inputs shared by every conversion command.
#[derive(Args)]
pub struct InputArgs {
  /// Module graph JSON file
  #[arg(short, long)]
  pub graph: PathBuf,

  /// Conversion config JSON file
  #[arg(short, long)]
  pub config: Option<PathBuf>,

  /// Conversion mode
  #[arg(short, long, value_enum, default_value_t = ModeArg::Bp2build)]
  pub mode: ModeArg,

  /// Root of the output trees
  #[arg(long, default_value = "out/soong")]
  pub out: PathBuf,

  /// Source tree holding handcrafted BUILD files
  #[arg(long, default_value = ".")]
  pub src_root: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
  Bp2build,
  Queryview,
}

impl From<ModeArg> for CodegenMode {
  fn from(mode: ModeArg) -> Self {
    match mode {
      ModeArg::Bp2build => CodegenMode::Bp2Build,
      ModeArg::Queryview => CodegenMode::QueryView,
    }
  }
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .without_time()
    .with_writer(std::io::stderr)
    .init();

  let result: Result<bool> = match cli.command {
    Commands::Generate { inputs, clean, json } => {
      cmd_generate(&inputs, clean, OutputFormat::from_json_flag(json)).map(|()| true)
    }
    Commands::Check { inputs, json } => cmd_check(&inputs, OutputFormat::from_json_flag(json)),
  };

  match result {
    Ok(true) => {}
    Ok(false) => std::process::exit(1),
    Err(err) => {
      print_error(&format!("{:#}", err));
      std::process::exit(1);
    }
  }
}
