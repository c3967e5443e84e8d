mod boot;
mod cli;
mod controller;
mod surface;

use std::path::Path;
use std::process::ExitCode;
use std::sync::mpsc;
use std::sync::Arc;

use pdfchat_api::{ChatPdfClient, DocumentChat};
use pdfchat_common::{ConfigError, PdfChatError};

use controller::{Controller, EventSink, Worker};
use surface::SurfaceEvent;

fn main() -> ExitCode {
    // Load .env file before anything else
    boot::load_dotenv(Path::new(".env"));

    let args = cli::parse();

    let (config, config_err) = boot::load_configuration(&args);
    // RUST_LOG beats the config file, but not --log-level.
    let rust_log_set = std::env::var_os("RUST_LOG").is_some_and(|v| !v.is_empty());
    if args.log_level.is_some() || !rust_log_set {
        boot::init_logging(&boot::log_directive(&args, &config));
    } else {
        boot::init_logging("");
    }

    tracing::info!("pdfchat v{} starting...", env!("CARGO_PKG_VERSION"));
    match config_err {
        Some(e @ ConfigError::ValidationError(_)) => {
            tracing::warn!("Invalid config values reset to defaults: {e}");
        }
        Some(e) => tracing::warn!("Config load failed, using defaults: {e}"),
        None => {}
    }
    tracing::debug!("Effective config: {}", pdfchat_config::config_to_json(&config));

    let credential = match pdfchat_api::resolve(&config.api.key_env) {
        Ok(credential) => credential,
        Err(e @ PdfChatError::MissingCredential(_)) => {
            tracing::error!("{e}");
            eprintln!("{e}; set it in the environment or in .env");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            tracing::error!("Credential resolution failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let client = match ChatPdfClient::new(boot::client_config(&config.api, credential)) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {e}");
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(base_url = %config.api.base_url, "ChatPDF client ready");

    let (event_tx, event_rx) = mpsc::channel::<SurfaceEvent>();
    let sink_tx = event_tx.clone();
    let sink: EventSink = Arc::new(move |event| {
        let _ = sink_tx.send(SurfaceEvent::Worker(event));
    });

    let client: Arc<dyn DocumentChat> = Arc::new(client);
    let (worker, requests) = match Worker::start(client, sink) {
        Ok(started) => started,
        Err(e) => {
            tracing::error!("Failed to start background worker: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut controller = Controller::new(requests, config.export.clone());
    let mut stdout = std::io::stdout();

    if let Some(path) = args.file {
        let mut notices = controller.select_document(path);
        match controller.analyze() {
            Ok(more) => notices.extend(more),
            Err(e) => eprintln!("error: {e}"),
        }
        if let Err(e) = surface::render(&notices, &mut stdout) {
            tracing::warn!("Failed to write output: {e}");
        }
    }

    if let Err(e) = surface::spawn_stdin_reader(event_tx) {
        tracing::error!("Failed to start input reader: {e}");
        return ExitCode::FAILURE;
    }

    let outcome = surface::run(&mut controller, &event_rx, &mut stdout);

    // Dropping the controller closes the request channel and ends the
    // worker's dispatch loop.
    drop(controller);
    worker.shutdown();

    match outcome {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Terminal I/O failed: {e}");
            ExitCode::FAILURE
        }
    }
}
