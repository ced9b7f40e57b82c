use anyhow::Context;
use clap::{Parser, Subcommand};

/// Shelf book catalogue service
#[derive(Debug, Parser)]
#[command(name = "shelf", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Listen address, e.g. `:8080` or `127.0.0.1:3000` (overrides API_ADDR)
        #[arg(long)]
        addr: Option<String>,
    },
    /// Print the resolved settings as JSON
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = shelf_kernel::settings::Settings::load()
        .with_context(|| "failed to load Shelf settings")?;

    match cli.command {
        Command::Serve { addr } => {
            if let Some(addr) = addr {
                settings.server.apply_listen_addr(&addr);
            }
            shelf_telemetry::init(&settings.telemetry)?;
            tracing::info!(
                env = ?settings.environment,
                addr = %settings.server.bind_addr(),
                "shelf serve starting"
            );
            shelf_app::run(settings).await
        }
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings)
                .with_context(|| "failed to render settings")?;
            println!("{rendered}");
            Ok(())
        }
    }
}
