mod cli;

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Commands};
use terafetch::api::{self, models::ResolveResponse, services::resolve_share_link};
use terafetch::config::Config;
use terafetch::observability::{Metrics, init_tracing};
use terafetch::pipeline::Pipeline;

type AnyError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<ExitCode, AnyError> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Server(args) => {
            api::run(args.address).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Resolve(args) => resolve_once(args.url).await,
    }
}

async fn resolve_once(url: String) -> Result<ExitCode, AnyError> {
    let config = Config::load()?;
    let pipeline = Pipeline::from_config(&config)?;
    let metrics = Metrics::new();

    match resolve_share_link(&pipeline, &metrics, Some(url)).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&ResolveResponse::from(result))?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            println!("{}", serde_json::to_string_pretty(&err.body())?);
            Ok(ExitCode::FAILURE)
        }
    }
}
