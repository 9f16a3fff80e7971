//! Capture thread: pulls mono frames off the ring buffer, turns them into
//! bar magnitudes and publishes them to the shared state.

use super::{open_loopback, CaptureError, LoopbackStream, SampleConsumer};
use crate::config::{CAPTURE_POLL, FRAME_SIZE};
use crate::spectrum::SpectrumAnalyzer;
use crate::state::{AppState, CaptureStatus};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Owns the capture thread. Dropping the handle clears the running flag.
pub struct CaptureHandle {
    state: Arc<AppState>,
    thread: Option<JoinHandle<()>>,
}

impl CaptureHandle {
    /// Spawns the capture thread. Device failures are reported through
    /// `CaptureStatus`, not here; only a failed spawn is an error.
    pub fn spawn(state: Arc<AppState>) -> Result<Self, CaptureError> {
        Self::spawn_with(state, |state| run_capture(state, open_loopback))
    }

    fn spawn_with<F>(state: Arc<AppState>, body: F) -> Result<Self, CaptureError>
    where
        F: FnOnce(&AppState) + Send + 'static,
    {
        let thread_state = state.clone();
        let thread = thread::Builder::new()
            .name("audio-capture".to_string())
            .spawn(move || body(&thread_state))
            .map_err(|e| CaptureError::Thread(e.to_string()))?;

        Ok(Self {
            state,
            thread: Some(thread),
        })
    }

    /// Signals the thread to stop and gives it `grace` to notice.
    /// The thread is joined only if it already finished; returns whether it was.
    pub fn shutdown(&mut self, grace: Duration) -> bool {
        self.state.stop();
        thread::sleep(grace);

        match self.thread.take() {
            Some(handle) if handle.is_finished() => {
                let _ = handle.join();
                true
            }
            Some(_) => {
                log::warn!("Capture thread still busy after {:?}, detaching", grace);
                false
            }
            None => false,
        }
    }
}

impl Drop for CaptureHandle {
    fn drop(&mut self) {
        self.state.stop();
    }
}

fn run_capture<F>(state: &AppState, open: F)
where
    F: FnOnce() -> Result<LoopbackStream, CaptureError>,
{
    let mut source = match open() {
        Ok(source) => source,
        Err(e) => {
            log::error!("Audio capture unavailable: {}", e);
            state.set_status(CaptureStatus::Failed(e.to_string()));
            return;
        }
    };

    let mut analyzer = SpectrumAnalyzer::new(FRAME_SIZE);
    log::info!(
        "Audio capture started on {} ({}, {} channel(s) @ {}Hz)",
        source.device_name,
        analyzer.plan_name(),
        source.config.channels,
        source.config.sample_rate.0
    );
    state.set_status(CaptureStatus::Running {
        device: source.device_name.clone(),
    });

    capture_frames(state, &mut source.consumer, &mut analyzer);

    // The stream stops when `source` drops at the end of this scope.
    state.set_status(CaptureStatus::Stopped);
    log::info!("Audio capture stopped");
}

/// Reads whole frames until the running flag clears.
fn capture_frames(state: &AppState, consumer: &mut SampleConsumer, analyzer: &mut SpectrumAnalyzer) {
    let mut frame = vec![0.0f32; FRAME_SIZE];
    let mut last_stats_time = Instant::now();
    let mut frames_processed = 0usize;
    let mut max_input_peak = 0.0f32;

    while state.is_running() {
        if consumer.len() < FRAME_SIZE {
            thread::sleep(CAPTURE_POLL);
            continue;
        }
        consumer.pop_slice(&mut frame);

        let peak = frame.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        max_input_peak = max_input_peak.max(peak);

        let spectrum = analyzer.analyze(&frame);
        if !state.publish(&spectrum) {
            break;
        }
        frames_processed += 1;

        //
        // Periodic capture statistics.
        //
        if last_stats_time.elapsed() > Duration::from_secs(1) {
            log::debug!(
                "Capture | Frames: {} | Max Peak: {:.5}",
                frames_processed,
                max_input_peak
            );
            frames_processed = 0;
            max_input_peak = 0.0;
            last_stats_time = Instant::now();
        }
    }
}
