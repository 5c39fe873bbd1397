//! CLI binary for the imds-tree crate.

use std::process::ExitCode;

use clap::Parser;
use imds_tree::{ImdsError, ImdsSession};

#[derive(Parser)]
#[command(name = "imds-tree")]
#[command(
    author,
    version,
    about = "Dump EC2 instance metadata as a nested JSON tree"
)]
struct Cli {
    /// Metadata category to resolve (e.g. "network/"). Resolves the whole
    /// namespace when omitted.
    #[arg(long)]
    category: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ImdsError> {
    let session = ImdsSession::connect().await?;

    let tree = match cli.category {
        Some(category) => session.resolve(&category).await?,
        None => session.resolve_all().await?,
    };

    println!("{}", serde_json::to_string_pretty(&tree)?);
    Ok(())
}
