mod audio;
mod config;
mod fft;
mod gui;
mod spectrum;
mod state;

use audio::capture::CaptureHandle;
use config::{WINDOW_SIZE, WINDOW_TITLE};
use gui::VisualizerApp;
use state::{AppState, CaptureStatus};
use std::sync::Arc;

fn main() -> Result<(), eframe::Error> {
    //
    // Initialize logging with default filter set to "info".
    //
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting loopback spectrum visualizer...");

    //
    // Sound-server PCMs record the default monitor; set before any thread exists.
    //
    audio::route_pulse_to_monitor();

    //
    // Start the capture thread. A device failure leaves the window up with a
    // flat spectrum and an error overlay.
    //
    let state = Arc::new(AppState::new());
    log::info!("Initializing audio capture...");
    let capture = match CaptureHandle::spawn(state.clone()) {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::error!("Could not start capture thread: {}", e);
            state.set_status(CaptureStatus::Failed(e.to_string()));
            None
        }
    };

    //
    // Initialize GUI configuration.
    //
    log::info!("Initializing GUI...");
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size(WINDOW_SIZE)
            .with_resizable(true)
            .with_title(WINDOW_TITLE),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |cc| {
            gui::theme::setup_global_style(&cc.egui_ctx);
            Ok(Box::new(VisualizerApp::new(cc, state, capture)))
        }),
    )
}
