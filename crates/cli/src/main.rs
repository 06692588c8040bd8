mod cmd;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::{EnvArgs, Session};
use crate::output::{OutputFormat, print_error};

/// pkgdef - Evaluate package manifests and their environment activation
#[derive(Parser)]
#[command(name = "pkgdef")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Manifest file (TOML); the built-in hdcycles manifest when omitted
    #[arg(short, long, global = true)]
    manifest: Option<PathBuf>,

    /// Host platform identifier to evaluate for (e.g. win32, linux)
    #[arg(long, global = true)]
    platform: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the package declaration
    Info,

    /// Show the values frozen for the host platform
    Config,

    /// Show the ordered environment activation plan
    Plan,

    /// Print a shell script that activates the package environment
    Env(EnvArgs),
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    if let Err(e) = run(cli) {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let session = Session::load(cli.manifest.as_deref(), cli.platform, cli.format)?;

    match cli.command {
        Commands::Info => cmd::cmd_info(&session),
        Commands::Config => cmd::cmd_config(&session),
        Commands::Plan => cmd::cmd_plan(&session),
        Commands::Env(args) => cmd::cmd_env(&session, &args),
    }
}
