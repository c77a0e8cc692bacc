use clap::Parser;
use cyra::core::config::{self, CliOverrides, CyraConfig};
use cyra::tui;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "cyra", about = "CyRA security analysis console")]
struct Args {
    /// Backend root URL; `/api` is appended
    #[arg(long)]
    backend_url: Option<String>,

    /// Where to write the log file
    #[arg(long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Loaded before the logger exists; the outcome is logged once it does.
    let loaded = config::load_config();
    let cli = CliOverrides {
        backend_url: args.backend_url,
        log_file: args.log_file,
    };
    let resolved = match &loaded {
        Ok(file_config) => config::resolve(file_config, &cli),
        Err(_) => config::resolve(&CyraConfig::default(), &cli),
    };

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    if let Err(e) = &loaded {
        log::warn!("{}; falling back to defaults", e);
    }
    log::info!(
        "CyRA starting up against backend '{}'",
        resolved.backend_url
    );

    tui::run(resolved)
}
