//! CLI entry point for comet-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "comet-rs")]
#[command(version)]
#[command(about = "A fast static blog generator backed by a headless CMS", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new Comet site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Generate static files from the CMS
    #[command(alias = "g")]
    Generate {
        /// Render draft content at this preview ref instead of the published ref
        #[arg(long)]
        preview_ref: Option<String>,
    },

    /// Start a local server with fallback rendering for ungenerated posts
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// Clean the public folder
    Clean,

    /// List all posts known to the CMS
    List,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "comet_rs=debug,info"
    } else {
        "comet_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = cli.cwd.unwrap_or_else(|| std::env::current_dir().unwrap());

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing Comet site in {:?}", target_dir);
            comet_rs::commands::init::run(&target_dir)?;
            println!("Initialized empty Comet site in {:?}", target_dir);
        }

        Commands::Generate { preview_ref } => {
            let comet = comet_rs::Comet::new(&base_dir)?;
            tracing::info!("Generating static files...");
            comet.generate(preview_ref.as_deref()).await?;
            println!("Generated successfully!");
        }

        Commands::Server { port, ip, open } => {
            let comet = comet_rs::Comet::new(&base_dir)?;

            // Generate first
            tracing::info!("Generating static files...");
            comet.generate(None).await?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            comet_rs::server::start(&comet, &ip, port, open).await?;
        }

        Commands::Clean => {
            let comet = comet_rs::Comet::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            comet.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List => {
            let comet = comet_rs::Comet::new(&base_dir)?;
            comet_rs::commands::list::run(&comet).await?;
        }

        Commands::Version => {
            println!("comet-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
