use clap::Parser;
use policy_config::PolicyConfig;
use policy_main::{Cli, Command, serve, validate};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "policy_bot=info,policy_main=info,policy_server=info,\
policy_config=info,policy_verdict=warn,policy_provider=warn";

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = PolicyConfig::from_env()?;

    match cli.command {
        Command::Validate(args) => {
            validate(args, config).await?;
        }
        Command::Serve(args) => serve(args, config).await?,
    }

    Ok(())
}
