// vaudit - network audit reconciliation (master CIQ vs. site dump)

mod audit;
mod exit_codes;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use vaudit_recon::{AuditError, AuditModule};

use audit::{RunArgs, Sources};
use exit_codes::{audit_exit_code, EXIT_EXPORT, EXIT_SUCCESS};
use settings::ConfigCommands;

#[derive(Parser)]
#[command(name = "vaudit")]
#[command(about = "Reconcile a master cell inventory against a network site dump")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// More log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load both sources and show record counts, sheets and columns
    #[command(after_help = "\
Examples:
  vaudit inspect --master ciq.xlsx --system dump.xlsx
  vaudit inspect --master ciq.csv --system dump.xlsx --json")]
    Inspect {
        #[command(flatten)]
        sources: Sources,

        /// Output JSON to stdout instead of text
        #[arg(long)]
        json: bool,
    },

    /// Run one audit module
    #[command(after_help = "\
Modules:
  element-ids (m1)  managed element IDs present in master vs. dump
  cell-names  (m2)  cell names present in master vs. dump
  integrity   (m3)  name + cell ID consistency
  frequency   (m4)  EARFCN DL per cell, NR rows excluded
  mapping     (m5)  master cell ID vs. dump ID for the same name
  key-join          outer join on any two columns (--master-key/--system-key)

Examples:
  vaudit run element-ids --master ciq.xlsx --system dump.xlsx
  vaudit run mapping --master ciq.xlsx --system dump.xlsx --export mapping.xlsx
  vaudit run frequency --master ciq.xlsx --system dump.xlsx --json
  vaudit run key-join --master ciq.xlsx --system dump.xlsx --master-key SITE --system-key site")]
    Run {
        /// Module to run
        module: AuditModule,

        #[command(flatten)]
        sources: Sources,

        /// Config file (default: <config dir>/vaudit/audit.toml, else built-in)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output JSON to stdout instead of the text table
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Export the report table (.xlsx or .csv)
        #[arg(long)]
        export: Option<PathBuf>,

        /// Master column for the key-join audit
        #[arg(long, requires = "system_key")]
        master_key: Option<String>,

        /// System column for the key-join audit
        #[arg(long, requires = "master_key")]
        system_key: Option<String>,
    },

    /// Run every audit module; one failing module does not stop the rest
    #[command(after_help = "\
Examples:
  vaudit all --master ciq.xlsx --system dump.xlsx
  vaudit all --master ciq.xlsx --system dump.xlsx --output audit.json")]
    All {
        #[command(flatten)]
        sources: Sources,

        /// Config file (default: <config dir>/vaudit/audit.toml, else built-in)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Inspect or check audit config files
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  vaudit-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Inspect { sources, json } => audit::cmd_inspect(sources, json),
        Commands::Run {
            module,
            sources,
            config,
            json,
            output,
            export,
            master_key,
            system_key,
        } => audit::cmd_run(RunArgs {
            module,
            sources,
            config,
            json,
            output,
            export,
            master_key,
            system_key,
        }),
        Commands::All { sources, config, json, output } => audit::cmd_all(sources, config, json, output),
        Commands::Config(cmd) => settings::cmd_config(cmd),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    /// Engine/io failure with its registered exit code.
    pub fn audit(err: &AuditError) -> Self {
        Self { code: audit_exit_code(err), message: err.to_string(), hint: None }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self { code: EXIT_EXPORT, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
