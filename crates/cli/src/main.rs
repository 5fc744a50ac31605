use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_app::Application;
use shelf_kernel::settings::Settings;

/// Operator command line for the shelf book service
#[derive(Debug, Parser)]
#[command(name = "shelf", version, about)]
struct Cli {
    /// Override the database URL from configuration
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server until interrupted
    Serve,
    /// Create the tables of every module, then exit
    InitDb,
    /// Print the resolved configuration as JSON
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load shelf settings")?;
    if let Some(url) = cli.database_url {
        settings.database.url = url;
    }

    match cli.command {
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings)
                .context("failed to render settings")?;
            println!("{}", rendered);
            Ok(())
        }
        Command::InitDb => {
            shelf_telemetry::init(&settings.telemetry)?;
            let app = Application::build(settings).await?;
            tracing::info!("tables ready");
            app.shutdown().await
        }
        Command::Serve => {
            shelf_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "starting shelf server");
            Application::build(settings).await?.run().await
        }
    }
}
