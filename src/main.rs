use clap::Parser;
use dotenvy::dotenv;
use tokio::sync::mpsc;

use bridgechat::api::{ApiWorker, HttpApi};
use bridgechat::config;
use bridgechat::ui::BridgeApp;

#[derive(Parser)]
#[command(
    name = "bridgechat",
    version,
    about = "Desktop client for a WhatsApp-bridge backend"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Backend base URL, e.g. http://127.0.0.1:3000 (overrides env and config)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let app_config = config::load_config(&cli.config);
    let api_url = config::resolve_api_url(
        cli.api_url,
        std::env::var(config::API_URL_ENV).ok(),
        &app_config,
    )
    .unwrap_or_else(|| {
        log::error!(
            "No backend URL configured (--api-url, {} or {}); requests will fail until one is set",
            config::API_URL_ENV,
            cli.config
        );
        String::new()
    });
    log::info!("Using backend at `{api_url}`");

    // UI -> worker
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // worker -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    tokio::spawn(async move {
        ApiWorker::new(HttpApi::new(&api_url), event_tx, cmd_rx)
            .run()
            .await;
    });

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([960.0, 640.0]),
        ..Default::default()
    };
    let mut event_rx = Some(event_rx);

    eframe::run_native(
        "BridgeChat",
        options,
        Box::new(move |cc| {
            let event_receiver = event_rx
                .take()
                .expect("BridgeApp should only be initialized once");
            Ok(Box::new(BridgeApp::new(cc, cmd_tx.clone(), event_receiver)))
        }),
    )
}
