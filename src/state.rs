use crate::spectrum::{Spectrum, SpectrumBuffer};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// What the capture thread is currently doing, as shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureStatus {
    Starting,
    Running { device: String },
    Failed(String),
    Stopped,
}

/// State shared between the capture thread and the UI.
pub struct AppState {
    spectrum: SpectrumBuffer,
    running: AtomicBool,
    status: Mutex<CaptureStatus>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            spectrum: SpectrumBuffer::new(),
            running: AtomicBool::new(true),
            status: Mutex::new(CaptureStatus::Starting),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Clears the running flag. Taken under the spectrum lock, so no
    /// `publish` can land after this returns.
    pub fn stop(&self) {
        let _guard = self.spectrum.lock();
        self.running.store(false, Ordering::Release);
    }

    /// Replaces the spectrum unless the app is shutting down.
    /// Returns whether the write happened.
    pub fn publish(&self, values: &Spectrum) -> bool {
        let mut guard = self.spectrum.lock();
        if !self.is_running() {
            return false;
        }
        *guard = *values;
        true
    }

    pub fn spectrum(&self) -> Spectrum {
        self.spectrum.snapshot()
    }

    pub fn status(&self) -> CaptureStatus {
        self.status.lock().clone()
    }

    pub fn set_status(&self, status: CaptureStatus) {
        *self.status.lock() = status;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
