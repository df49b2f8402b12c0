//! Write the gateway's OpenAPI document as JSON
//!
//!   export_openapi                      # to stdout
//!   export_openapi --output openapi.json

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use utoipa::OpenApi;

use trade_settlement::gateway::openapi::ApiDoc;

#[derive(Parser, Debug)]
#[command(name = "export_openapi", about = "Export the trade API's OpenAPI document")]
struct Cli {
    /// Destination file; stdout when omitted
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let json = ApiDoc::openapi()
        .to_pretty_json()
        .context("Failed to serialize OpenAPI document")?;

    match cli.output {
        Some(path) => {
            std::fs::write(&path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("OpenAPI document written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
