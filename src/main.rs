//! webpcut entry point

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use webpcut::adapters::Config;
use webpcut::cli::{commands, Cli, Commands};
use webpcut::WebpcutError;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = Config::load(cli.config.as_deref())?;

    let outcome = match cli.command {
        Commands::Convert(args) => commands::convert(args, config).await,
        Commands::Preview(args) => commands::preview(args, config).await,
        Commands::Estimate(args) => commands::estimate(args, config).await,
        Commands::Recommend(args) => commands::recommend(args, config).await,
        Commands::Probe(args) => commands::probe(args, config).await,
    };

    // An interrupt is not a fault; exit quietly with the conventional code.
    if let Err(err) = outcome {
        if err
            .downcast_ref::<WebpcutError>()
            .is_some_and(WebpcutError::is_cancelled)
        {
            eprintln!("cancelled");
            std::process::exit(130);
        }
        return Err(err);
    }
    Ok(())
}
