use std::sync::Arc;

mod backend_bridge;
mod config;
mod controller;
mod ui;

use anyhow::{anyhow, Context};
use backend_bridge::commands::BackendCommand;
use clap::Parser;
use client_core::ConversionClient;
use controller::events::UiEvent;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;
use ui::DesktopGuiApp;

#[derive(Parser, Debug)]
#[command(name = "doc-converter", about = "Drop a document, get its text back")]
struct Args {
    /// Base URL of the conversion service (overrides converter.toml and env).
    #[arg(long)]
    service_url: Option<String>,
    /// Seconds to wait for a conversion response before giving up.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let mut settings = config::load_settings();
    settings.apply_overrides(args.service_url, args.timeout_secs);

    let client = ConversionClient::new(&settings.service_url, settings.request_timeout())
        .with_context(|| format!("invalid conversion service '{}'", settings.service_url))?;
    let service_url = client.service_url().to_string();
    tracing::info!(
        service_url = %service_url,
        timeout_secs = settings.request_timeout().as_secs(),
        "starting document converter"
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, Arc::new(client));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("OCR Document Converter")
            .with_inner_size([860.0, 720.0])
            .with_min_inner_size([520.0, 420.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "OCR Document Converter",
        options,
        Box::new(move |_cc| {
            let mut app = DesktopGuiApp::new(cmd_tx, ui_rx, service_url);
            app.check_service_health();
            Ok(Box::new(app))
        }),
    )
    .map_err(|err| anyhow!("desktop GUI exited with error: {err}"))
}
