//! Bookalope CLI - Command-line interface for the Bookalope conversion service

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{ConvertArgs, Server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bookalope")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Bookalope API token (32 hex characters)
    #[arg(long, env = "BOOKALOPE_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Server base URL, overrides --beta
    #[arg(long, env = "BOOKALOPE_HOST", global = true)]
    host: Option<String>,

    /// Use the beta server
    #[arg(long, global = true)]
    beta: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a document into books of every export format
    Convert(ConvertArgs),

    /// List the import and export formats of the server
    Formats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the design styles available for a format
    Styles {
        /// Target format, e.g. epub3
        format: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List books and their bookflows
    Books {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the profile of the token's user
    Profile {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "bookalope_cli=debug,bookalope_core=debug"
    } else {
        "bookalope_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let server = Server {
        token: cli.token,
        host: cli.host,
        beta: cli.beta,
    };

    match cli.command {
        Commands::Convert(args) => commands::convert(&server, &args).await,

        Commands::Formats { json } => commands::formats(&server, json).await,

        Commands::Styles { format, json } => commands::styles(&server, &format, json).await,

        Commands::Books { json } => commands::books(&server, json).await,

        Commands::Profile { json } => commands::profile(&server, json).await,
    }
}
