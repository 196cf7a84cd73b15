use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use vlens::{DependencyRequest, Resolver, VlensConfig, VlensError};

#[derive(Parser, Debug)]
#[command(name = "vlens")]
#[command(version, about = "Resolve declared package versions against their registries")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a JSON array of `{name, version, ecosystem}` dependencies
    Resolve {
        /// Path to the dependency list
        deps: PathBuf,
        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Log at debug level unless RUST_LOG is set
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Resolve {
            deps,
            config,
            verbose,
        } => {
            init_tracing(verbose);
            match resolve(&deps, config.as_deref()).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    tracing::error!("{}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn resolve(deps: &Path, config: Option<&Path>) -> vlens::Result<()> {
    let config = match config {
        Some(path) => VlensConfig::load(path).await?,
        None => VlensConfig::default(),
    };

    let content = tokio::fs::read_to_string(deps).await?;
    let requests: Vec<DependencyRequest> = serde_json::from_str(&content)
        .map_err(|e| VlensError::parse_error(format!("dependency list {}", deps.display()), e))?;

    let resolver = Resolver::from_config(&config).await?;
    let results = resolver.resolve_all(&requests).await;

    for (request, result) in requests.iter().zip(results) {
        let line = match result {
            Ok(document) => json!({ "name": request.name, "document": document }),
            Err(e) => json!({ "name": request.name, "error": e.report() }),
        };
        println!("{}", line);
    }

    Ok(())
}
