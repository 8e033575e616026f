//! # uki CLI
//!
//! Command-line interface for the uki micro-wiki.

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "uki")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a page inside the main template
    Render {
        /// Wiki root directory
        wiki: PathBuf,

        /// Article path below pages/, without extension
        page: String,

        /// Keep partial output when a variable is undefined
        #[arg(long)]
        lenient: bool,

        /// Write the page to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render an article body alone with asset paths rewritten
    Preview {
        /// Wiki root directory
        wiki: PathBuf,

        /// Article path below pages/, without extension
        page: String,

        /// Keep partial output when a variable is undefined
        #[arg(long)]
        lenient: bool,
    },

    /// List indexed content or loaded definitions
    List {
        /// Wiki root directory
        wiki: PathBuf,

        #[arg(value_enum, default_value_t = ListTarget::Articles)]
        what: ListTarget,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print articles and templates grouped by directory
    Tree {
        /// Wiki root directory
        wiki: PathBuf,
    },

    /// Render every article and report failures
    Check {
        /// Wiki root directory
        wiki: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Create a new wiki skeleton
    Init {
        /// Target directory (defaults to current directory)
        path: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ListTarget {
    Articles,
    Templates,
    Variables,
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so rendered pages can be piped
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Render {
            wiki,
            page,
            lenient,
            output,
        } => commands::render_page(&wiki, &page, lenient, output.as_deref()),
        Commands::Preview {
            wiki,
            page,
            lenient,
        } => commands::preview_article(&wiki, &page, lenient),
        Commands::List { wiki, what, json } => commands::list_content(&wiki, what, json),
        Commands::Tree { wiki } => commands::print_tree(&wiki),
        Commands::Check { wiki, json } => commands::check_wiki(&wiki, json),
        Commands::Init { path } => commands::init_wiki(path.as_deref()),
    }
}
