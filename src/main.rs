use anyhow::Result;
use clap::Parser;

/// adamus-contact - Adamus Capital landing page and contact form relay
#[derive(Parser)]
#[command(name = "adamus-contact")]
#[command(about = "Serves the Adamus Capital landing page and relays inquiries by email", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long)]
    config: Option<String>,

    /// Server host address (overrides config file)
    #[arg(long)]
    host: Option<String>,

    /// Server port (overrides config file)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the process environment may already be set
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config = adamus_contact::Config::load(cli.config)?;
    config.validate()?;

    adamus_contact::observability::init_observability(
        "adamus-contact",
        env!("CARGO_PKG_VERSION"),
        config.environment,
        config.log_level(),
    )?;

    adamus_contact::server::serve(config, cli.host, cli.port).await
}
