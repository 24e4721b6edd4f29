// RAG Chat GUI - Main Entry Point
// Desktop chat window over an external retrieval-augmented query command

mod app;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::Context as _;
use eframe::egui;
use rag_chat_backend::{Config, ScriptBackend, TaskRunner};
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::RagChatApp;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env();
    info!("Configuration loaded: {:?}", config);

    let backend = ScriptBackend::from_config(&config.collaborators)?;

    // Worker runtime for queries, database refreshes and file copies
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("rag-worker")
        .build()
        .context("failed to start background runtime")?;
    let handle = runtime.handle().clone();
    let data_dir = config.data.data_dir.clone();

    // Configure window options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("RAG Chat GUI")
            .with_inner_size([900.0, 600.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "RAG Chat GUI",
        options,
        Box::new(move |cc| {
            ui::theme::apply_dark_theme(&cc.egui_ctx);

            // Finished tasks wake the UI so results show without input events
            let repaint_ctx = cc.egui_ctx.clone();
            let (runner, events) = TaskRunner::new(
                handle,
                Arc::new(backend),
                data_dir,
                Arc::new(move || repaint_ctx.request_repaint()),
            );
            Box::new(RagChatApp::new(runner, events))
        }),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {}", e))?;

    info!("Window closed, shutting down");
    runtime.shutdown_background();
    Ok(())
}
