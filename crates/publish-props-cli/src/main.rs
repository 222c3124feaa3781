mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::OutputFormat;

#[derive(Parser)]
#[command(
    name = "publish-props",
    about = "Propagate local publish and signing properties across a multi-module build"
)]
#[command(version)]
struct Cli {
    /// Project root holding publish.properties
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load publish.properties and show what every module receives
    Propagate {
        /// Declare modules instead of discovering the Cargo workspace
        #[arg(long = "module", short = 'm')]
        modules: Vec<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show which build variants stay enabled for packaging
    Variants {
        /// Variant names (default: [variants].declared from publish-props.toml)
        names: Vec<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Check signing and upload readiness
    Doctor,
    /// Create a publish.properties template and keep it out of git
    Init,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    load_dotenv(&cli.root)?;

    match cli.command {
        Commands::Propagate { modules, format } => {
            commands::propagate(&cli.root, &modules, format)?
        }
        Commands::Variants { names, format } => commands::variants(&cli.root, &names, format)?,
        Commands::Doctor => commands::doctor(&cli.root)?,
        Commands::Init => commands::init(&cli.root)?,
    }

    Ok(())
}

/// Pick up `CENTRAL_PORTAL_*` fallbacks from `<root>/.env`. Variables
/// already set in the environment win.
fn load_dotenv(root: &std::path::Path) -> anyhow::Result<()> {
    let path = root.join(".env");
    match dotenvy::from_path(&path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "loaded .env");
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(anyhow::Error::new(e).context(format!("failed to load {}", path.display()))),
    }
}
