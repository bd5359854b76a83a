//! # News Archive CLI (`newsarc`)
//!
//! ## Usage
//!
//! ```bash
//! newsarc --config ./config/archive.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `newsarc init` | Create the SQLite database and run schema migrations |
//! | `newsarc import <file>` | Load headline rows from JSON or JSON lines |
//! | `newsarc search [term]` | Search headlines (latest issues without a term) |
//! | `newsarc archives` | List configured archives and check their locations |
//! | `newsarc index build <root>` | Generate an archive index script |
//! | `newsarc serve` | Start the HTTP server |

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use news_archive::index_build::IndexKind;
use news_archive::{archives, config, import, index_build, migrate, search, server};

/// News Archive CLI: headline search and archive browsing for translated
/// newspapers.
#[derive(Parser)]
#[command(
    name = "newsarc",
    about = "Headline search API and archive browser for translated newspapers",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/archive.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the headline table, its FTS5 index and the triggers that keep
    /// them in sync. Safe to run repeatedly.
    Init,

    /// Import headline rows.
    Import {
        /// JSON array or JSON-lines file of headline rows.
        file: PathBuf,

        /// Delete existing rows before importing.
        #[arg(long)]
        replace: bool,
    },

    /// Search headlines.
    Search {
        /// Full-text term. Omit to list the latest issues.
        term: Option<String>,

        /// Page number (invalid values fall back to 1).
        #[arg(long)]
        page: Option<String>,

        /// Rows per page (invalid values fall back to 30).
        #[arg(long)]
        limit: Option<String>,
    },

    /// List configured archives and whether their locations are reachable.
    Archives,

    /// Archive index tools.
    Index {
        #[command(subcommand)]
        action: IndexAction,
    },

    /// Start the HTTP server.
    Serve,
}

#[derive(Subcommand)]
enum IndexAction {
    /// Scan a data directory and write `window.ARCHIVE_INDEX = {...};`.
    Build {
        /// Directory to scan.
        root: PathBuf,

        #[arg(long, value_enum, default_value = "months")]
        kind: IndexKind,

        /// Output file. Prints to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "news_archive=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // Commands that don't require config
    if let Commands::Index {
        action: IndexAction::Build { root, kind, output },
    } = &cli.command
    {
        index_build::run_index_build(root, *kind, output.as_deref())?;
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Import { file, replace } => {
            import::run_import(&cfg, &file, replace).await?;
        }
        Commands::Search { term, page, limit } => {
            search::run_search(&cfg, term.as_deref(), page.as_deref(), limit.as_deref()).await?;
        }
        Commands::Archives => {
            archives::list_archives(&cfg).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Index { .. } => {
            // Handled above (before config loading)
        }
    }

    Ok(())
}
