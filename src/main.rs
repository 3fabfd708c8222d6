use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use sloth_ledger::cli::record::RecordOptions;
use sloth_ledger::settings::LedgerSettings;
use sloth_ledger::Result;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "sloth-ledger")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Deployment ledger for multi-cloud Kubernetes clusters", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(short = 'C', long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record an applied deployment in the ledger
    Record {
        /// Node count after the apply (default: sum of node pool counts)
        #[arg(short, long, allow_negative_numbers = true)]
        nodes: Option<i64>,

        /// Cluster definition file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Rendered manifest to hash (default: the cluster definition text)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Print the new record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the current ledger record
    Show {
        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// List past deployments, newest first
    History,

    /// Print the cluster definition with credentials redacted
    Sanitize {
        /// Cluster definition file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Checksum a file
    Checksum {
        file: PathBuf,

        /// Use the legacy positional hash instead of SHA-256
        #[arg(long)]
        legacy: bool,
    },

    /// Verify the stored record against a manifest
    Verify {
        /// Manifest file (default: the cluster definition)
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let project_root = match cli.project {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    let settings = LedgerSettings::load(&project_root)?;
    init_tracing(&settings);

    match cli.command {
        Commands::Record {
            nodes,
            config,
            manifest,
            json,
        } => {
            let opts = RecordOptions {
                config: config.as_deref(),
                manifest: manifest.as_deref(),
                nodes,
                json,
            };
            sloth_ledger::cli::record::run(&project_root, &settings, opts)?;
        }

        Commands::Show { json } => {
            sloth_ledger::cli::show::run(&project_root, &settings, json)?;
        }

        Commands::History => {
            sloth_ledger::cli::show::run_history(&project_root, &settings)?;
        }

        Commands::Sanitize { config } => {
            sloth_ledger::cli::sanitize::run(&project_root, &settings, config.as_deref())?;
        }

        Commands::Checksum { file, legacy } => {
            sloth_ledger::cli::checksum::run(&project_root.join(file), legacy)?;
        }

        Commands::Verify { manifest } => {
            sloth_ledger::cli::verify::run(&project_root, &settings, manifest.as_deref())?;
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "sloth-ledger", &mut io::stdout());
        }
    }

    Ok(())
}

/// Log to stderr so JSON output on stdout stays clean
fn init_tracing(settings: &LedgerSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
