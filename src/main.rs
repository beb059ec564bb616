//! CLI entry point for pagefill

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pagefill")]
#[command(version)]
#[command(about = "Fetch blog content and render it into HTML pages", long_about = None)]
struct Cli {
    /// Set the site directory (defaults to current directory)
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
    /// Fetch the posts list and Markdown documents into the page
    #[command(alias = "r")]
    Render {
        /// Base URL to fetch from (overrides `url` in _config.yml)
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Build the posts index from the posts directory
    Index,

    /// Print an HTML file converted to Markdown
    Convert {
        /// HTML file to convert
        file: PathBuf,
    },

    /// Serve the site directory
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to
        #[arg(short, long)]
        ip: Option<String>,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "pagefill=debug,info"
    } else {
        "pagefill=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Render { url } => {
            let site = pagefill::Site::new(&base_dir)?;
            let report = site.render(url.as_deref()).await?;
            if !report.failures.is_empty() {
                anyhow::bail!(
                    "{} of {} pipelines failed",
                    report.failures.len(),
                    report.failures.len() + report.rendered
                );
            }
            println!("Rendered {:?}", report.output);
        }

        Commands::Index => {
            let site = pagefill::Site::new(&base_dir)?;
            let count = site.index()?;
            println!("Indexed {} posts", count);
        }

        Commands::Convert { file } => {
            let path = if file.is_absolute() {
                file
            } else {
                base_dir.join(file)
            };
            println!("{}", pagefill::commands::convert::run(&path)?);
        }

        Commands::Server { port, ip, open } => {
            let site = pagefill::Site::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| site.config.server.ip.clone());
            let port = port.unwrap_or(site.config.server.port);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            pagefill::server::start(site.base_dir.clone(), &ip, port, open).await?;
        }

        Commands::Version => {
            println!("pagefill version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
