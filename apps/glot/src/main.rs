mod cli;

use clap::Parser;
use glot_config::AppConfig;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("glot: {}", e);
            std::process::exit(2);
        }
    };
    glot_config::logging::initialize(&config);

    if let Err(e) = cli::run(cli, &config).await {
        tracing::error!(error = %e, "Command failed");
        eprintln!("glot: {:#}", e);
        std::process::exit(1);
    }
}
